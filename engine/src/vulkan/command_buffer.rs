use log::*;
use vulkanalia::{vk, VkResult};

use super::backend::{RenderDevice, RenderPassBegin};
use super::constants;
use super::render_pass::RenderTargetLayout;
use crate::error::InitError;

/// The command pool and the single primary command buffer re-recorded every
/// frame. The buffer is freed together with the pool.
#[derive(Debug)]
pub struct FrameCommands {
    pub pool: vk::CommandPool,
    pub buffer: vk::CommandBuffer,
}

impl FrameCommands {
    pub unsafe fn create<D: RenderDevice>(device: &D) -> Result<FrameCommands, InitError> {
        let pool = device.create_command_pool()?;

        let buffer = match device.allocate_command_buffer(pool) {
            Ok(buffer) => buffer,
            Err(error) => {
                device.destroy_command_pool(pool);
                return Err(error.into());
            }
        };

        Ok(FrameCommands { pool, buffer })
    }

    /// Records one frame targeting the framebuffer at `image_index`: clear to
    /// `clear_color`, then draw the triangle with `pipeline`.
    pub unsafe fn record<D: RenderDevice>(
        &self,
        device: &D,
        target: &RenderTargetLayout,
        image_index: usize,
        pipeline: vk::Pipeline,
        clear_color: [f32; 4],
    ) -> VkResult<()> {
        device.reset_command_buffer(self.buffer)?;
        device.begin_command_buffer(self.buffer)?;

        let begin = RenderPassBegin {
            render_pass: target.render_pass,
            framebuffer: target.framebuffer(image_index),
            extent: target.extent,
            clear_color,
        };
        device.cmd_begin_render_pass(self.buffer, &begin);

        device.cmd_bind_pipeline(self.buffer, pipeline);
        device.cmd_draw(self.buffer, constants::TRIANGLE_VERTEX_COUNT);

        device.cmd_end_render_pass(self.buffer);
        device.end_command_buffer(self.buffer)?;

        trace!("Recorded frame for image {}.", image_index);

        Ok(())
    }

    pub unsafe fn destroy<D: RenderDevice>(self, device: &D) {
        device.destroy_command_pool(self.pool);
    }
}

/// Black with a blue channel pulsing over time.
pub fn clear_color_for_frame(frame: u64) -> [f32; 4] {
    let flash = (frame as f32 / 120.0).sin().abs();
    [0.0, 0.0, flash, 1.0]
}
