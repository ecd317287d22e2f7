use std::collections::HashSet;

use log::*;
use winit::event::{ElementState, KeyEvent, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard state and the quit request, fed from window events.
#[derive(Debug, Default)]
pub struct Input {
    pressed: HashSet<KeyCode>,
    quit: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn process_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::CloseRequested => self.request_quit(),
            WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(code),
                        state,
                        ..
                    },
                ..
            } => self.set_key(*code, *state == ElementState::Pressed),
            _ => {}
        }
    }

    pub fn set_key(&mut self, code: KeyCode, pressed: bool) {
        if pressed {
            self.pressed.insert(code);
            if code == KeyCode::Escape {
                self.request_quit();
            }
        } else {
            self.pressed.remove(&code);
        }
    }

    pub fn is_key_pressed(&self, code: KeyCode) -> bool {
        self.pressed.contains(&code)
    }

    pub fn request_quit(&mut self) {
        if !self.quit {
            debug!("Quit requested.");
        }
        self.quit = true;
    }

    pub fn quit(&self) -> bool {
        self.quit
    }
}
