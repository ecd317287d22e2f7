use anyhow::{anyhow, Result};
use log::*;
use renderer::Renderer;
use winit::dpi::LogicalSize;
use winit::event::{Event, WindowEvent};
use winit::event_loop::EventLoop;
use winit::window::{Window, WindowBuilder};

pub mod config;
pub mod error;
pub mod input;
mod renderer;
pub mod vulkan;

pub use config::EngineConfig;
use error::InitError;
use input::Input;

#[derive(Debug)]
pub struct Engine {
    window: Window,
    renderer: Renderer,
    event_loop: EventLoop<()>,
}

impl Engine {
    pub fn new(config: EngineConfig) -> Result<Engine> {
        // Window
        let event_loop = EventLoop::new().map_err(|e| InitError::Window(e.to_string()))?;
        let window = WindowBuilder::new()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .build(&event_loop)
            .map_err(|e| InitError::Window(e.to_string()))?;

        let renderer = unsafe { Renderer::create(&window, &config)? };

        Ok(Engine {
            window,
            renderer,
            event_loop,
        })
    }

    /// Runs until quit is requested, then tears the renderer down. A frame
    /// error stops the loop and is returned once teardown has finished.
    pub fn run(self) -> Result<()> {
        let Engine {
            window,
            renderer,
            event_loop,
        } = self;

        let mut renderer = Some(renderer);
        let mut input = Input::new();
        let mut failure = None;

        event_loop.run(|event, elwt| match event {
            // Quit is only honored between frames.
            Event::AboutToWait => {
                if input.quit() {
                    elwt.exit();
                } else {
                    window.request_redraw();
                }
            }
            Event::WindowEvent { event, .. } => {
                input.process_event(&event);
                match event {
                    WindowEvent::Resized(_) => {
                        if let Some(renderer) = renderer.as_mut() {
                            renderer.resized();
                        }
                    }
                    // Render a frame if our Vulkan app is not being destroyed.
                    WindowEvent::RedrawRequested if !elwt.exiting() => {
                        if let Some(renderer) = renderer.as_mut() {
                            if let Err(error) = unsafe { renderer.render(&window) } {
                                failure = Some(error);
                                elwt.exit();
                            }
                        }
                    }
                    _ => {}
                }
            }
            // Destroy our Vulkan app.
            Event::LoopExiting => {
                if let Some(renderer) = renderer.take() {
                    unsafe { renderer.destroy() };
                }
            }
            _ => {}
        })?;

        match failure {
            Some(error) => Err(anyhow!(error).context("Frame rendering failed")),
            None => {
                info!("Engine stopped.");
                Ok(())
            }
        }
    }
}
