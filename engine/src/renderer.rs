use vulkanalia::vk;
use winit::window::Window;

use crate::config::EngineConfig;
use crate::error::{FrameError, InitError};
use crate::vulkan::device::DeviceContext;
use crate::vulkan::VulkanRenderer;

#[derive(Debug)]
pub struct Renderer {
    pub vk_renderer: VulkanRenderer<DeviceContext>,
}

impl Renderer {
    /// Creates our Vulkan app.
    pub unsafe fn create(window: &Window, config: &EngineConfig) -> Result<Self, InitError> {
        let device = DeviceContext::initialize(window, &config.app_name, config.validation)?;
        let vk_renderer = VulkanRenderer::new(device, window_extent(window), config)?;

        Ok(Self { vk_renderer })
    }

    pub fn resized(&mut self) {
        self.vk_renderer.request_rebuild();
    }

    /// Renders a frame for our Vulkan app.
    pub unsafe fn render(&mut self, window: &Window) -> Result<(), FrameError> {
        self.vk_renderer.render(window_extent(window))?;
        Ok(())
    }

    /// Destroys our Vulkan app.
    pub unsafe fn destroy(self) {
        self.vk_renderer.destroy();
    }
}

fn window_extent(window: &Window) -> vk::Extent2D {
    let size = window.inner_size();
    vk::Extent2D {
        width: size.width,
        height: size.height,
    }
}
