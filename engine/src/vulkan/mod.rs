use std::time::Duration;

use log::*;
use vulkanalia::vk;

use crate::config::EngineConfig;
use crate::error::{FrameError, InitError, PipelineError};
use backend::RenderDevice;
use command_buffer::clear_color_for_frame;
use pipeline::PipelineState;
use render_pass::RenderTargetLayout;
use shader::ShaderSet;
use swapchain::SwapchainState;
use sync::{FrameOutcome, FrameSubmitter};

pub mod backend;
pub mod command_buffer;
pub mod constants;
pub mod device;
pub mod framebuffer;
pub mod instance;
#[cfg(test)]
pub mod mock;
pub mod pipeline;
pub mod render_pass;
pub mod shader;
pub mod swapchain;
pub mod sync;
pub mod teardown;

/// Everything that depends on the swapchain and is rebuilt with it.
#[derive(Debug)]
pub struct SurfaceResources {
    pub swapchain: SwapchainState,
    pub target: RenderTargetLayout,
    pub pipeline: PipelineState,
}

impl SurfaceResources {
    pub unsafe fn build<D: RenderDevice>(
        device: &D,
        extent: vk::Extent2D,
        shaders: &ShaderSet,
    ) -> Result<SurfaceResources, InitError> {
        let swapchain = SwapchainState::build(device, extent)?;

        let target = match RenderTargetLayout::build(device, &swapchain) {
            Ok(target) => target,
            Err(error) => {
                swapchain.destroy(device);
                return Err(error);
            }
        };

        let pipeline = match PipelineState::build(
            device,
            shaders,
            target.render_pass,
            swapchain.extent,
        ) {
            Ok(pipeline) => pipeline,
            Err(error) => {
                target.destroy(device);
                swapchain.destroy(device);
                return Err(error.into());
            }
        };

        Ok(SurfaceResources {
            swapchain,
            target,
            pipeline,
        })
    }

    pub unsafe fn destroy<D: RenderDevice>(self, device: &D) {
        self.pipeline.destroy(device);
        self.target.destroy(device);
        self.swapchain.destroy(device);
    }
}

/// Owns the device and every object created on it, and renders one frame
/// at a time.
#[derive(Debug)]
pub struct VulkanRenderer<D: RenderDevice> {
    device: D,
    resources: Option<SurfaceResources>,
    frames: FrameSubmitter,
    shaders: ShaderSet,
    frame: u64,
    needs_rebuild: bool,
}

impl<D: RenderDevice> VulkanRenderer<D> {
    /// Loads the configured shaders and builds the renderer. On failure the
    /// device context is destroyed along with anything created on it.
    pub unsafe fn new(
        mut device: D,
        extent: vk::Extent2D,
        config: &EngineConfig,
    ) -> Result<VulkanRenderer<D>, InitError> {
        let shaders = match ShaderSet::load(&config.vertex_shader, &config.fragment_shader) {
            Ok(shaders) => shaders,
            Err(error) => {
                device.destroy_context();
                return Err(PipelineError::from(error).into());
            }
        };

        Self::with_shaders(device, extent, shaders, config.frame_timeout)
    }

    pub unsafe fn with_shaders(
        mut device: D,
        extent: vk::Extent2D,
        shaders: ShaderSet,
        frame_timeout: Duration,
    ) -> Result<VulkanRenderer<D>, InitError> {
        let resources = match SurfaceResources::build(&device, extent, &shaders) {
            Ok(resources) => resources,
            Err(error) => {
                device.destroy_context();
                return Err(error);
            }
        };

        let frames = match FrameSubmitter::create(&device, frame_timeout) {
            Ok(frames) => frames,
            Err(error) => {
                resources.destroy(&device);
                device.destroy_context();
                return Err(error);
            }
        };

        info!("Renderer ready.");

        Ok(VulkanRenderer {
            device,
            resources: Some(resources),
            frames,
            shaders,
            frame: 0,
            needs_rebuild: false,
        })
    }

    pub fn resources(&self) -> Option<&SurfaceResources> {
        self.resources.as_ref()
    }

    /// Number of frames handed to the presentation engine so far.
    pub fn frame_count(&self) -> u64 {
        self.frame
    }

    /// Rebuild the swapchain before the next frame, e.g. after a resize.
    pub fn request_rebuild(&mut self) {
        self.needs_rebuild = true;
    }

    /// Renders one frame. Returns whether an image was presented; a zero
    /// `extent` (minimized window) renders nothing.
    pub unsafe fn render(&mut self, extent: vk::Extent2D) -> Result<bool, FrameError> {
        if extent.width == 0 || extent.height == 0 {
            return Ok(false);
        }

        if self.needs_rebuild || self.resources.is_none() {
            self.rebuild(extent)?;
        }

        let resources = match &self.resources {
            Some(resources) => resources,
            None => return Ok(false),
        };

        let outcome = self.frames.draw(
            &self.device,
            &resources.swapchain,
            &resources.target,
            &resources.pipeline,
            clear_color_for_frame(self.frame),
        )?;

        match outcome {
            FrameOutcome::OutOfDate => {
                self.rebuild(extent)?;
                Ok(false)
            }
            FrameOutcome::Dropped { .. } => {
                self.needs_rebuild = true;
                Ok(false)
            }
            FrameOutcome::Presented { stale, .. } => {
                self.frame += 1;
                self.needs_rebuild = stale;
                Ok(true)
            }
        }
    }

    /// Waits for the device to go idle, destroys the swapchain and everything
    /// derived from it, and builds them again for `extent`.
    pub unsafe fn rebuild(&mut self, extent: vk::Extent2D) -> Result<(), InitError> {
        self.device.wait_idle()?;

        if let Some(resources) = self.resources.take() {
            resources.destroy(&self.device);
        }

        let resources = SurfaceResources::build(&self.device, extent, &self.shaders)?;
        debug!(
            "Rebuilt swapchain with {} images at {}x{}.",
            resources.swapchain.image_count(),
            resources.swapchain.extent.width,
            resources.swapchain.extent.height
        );

        self.resources = Some(resources);
        self.needs_rebuild = false;

        Ok(())
    }

    pub unsafe fn destroy(self) {
        let VulkanRenderer {
            mut device,
            resources,
            frames,
            ..
        } = self;

        teardown::teardown(&mut device, frames, resources);
    }
}
