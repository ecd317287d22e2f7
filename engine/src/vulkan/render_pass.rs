use log::*;
use vulkanalia::vk;

use super::backend::{ColorAttachmentDesc, RenderDevice};
use super::framebuffer;
use super::swapchain::SwapchainState;
use crate::error::InitError;

/// The render pass plus one framebuffer per swapchain image.
///
/// Framebuffers bind specific image views, so this is rebuilt every time the
/// swapchain is.
#[derive(Debug)]
pub struct RenderTargetLayout {
    pub render_pass: vk::RenderPass,
    pub attachment: ColorAttachmentDesc,
    pub framebuffers: Vec<vk::Framebuffer>,
    pub extent: vk::Extent2D,
}

/// Cleared on load, stored for presentation.
pub fn color_attachment(format: vk::Format) -> ColorAttachmentDesc {
    ColorAttachmentDesc {
        format,
        load_op: vk::AttachmentLoadOp::CLEAR,
        store_op: vk::AttachmentStoreOp::STORE,
        initial_layout: vk::ImageLayout::UNDEFINED,
        subpass_layout: vk::ImageLayout::COLOR_ATTACHMENT_OPTIMAL,
        final_layout: vk::ImageLayout::PRESENT_SRC_KHR,
    }
}

impl RenderTargetLayout {
    pub unsafe fn build<D: RenderDevice>(
        device: &D,
        swapchain: &SwapchainState,
    ) -> Result<RenderTargetLayout, InitError> {
        let attachment = color_attachment(swapchain.format());

        let render_pass = device
            .create_render_pass(&attachment)
            .map_err(InitError::RenderPassCreationFailed)?;

        let framebuffers = match framebuffer::create_framebuffers(
            device,
            render_pass,
            &swapchain.image_views,
            swapchain.extent,
        ) {
            Ok(framebuffers) => framebuffers,
            Err(error) => {
                device.destroy_render_pass(render_pass);
                return Err(error);
            }
        };

        debug!("Built render pass with {} framebuffers.", framebuffers.len());

        Ok(RenderTargetLayout {
            render_pass,
            attachment,
            framebuffers,
            extent: swapchain.extent,
        })
    }

    pub fn framebuffer(&self, image_index: usize) -> vk::Framebuffer {
        self.framebuffers[image_index]
    }

    pub unsafe fn destroy<D: RenderDevice>(self, device: &D) {
        framebuffer::destroy_framebuffers(device, &self.framebuffers);
        device.destroy_render_pass(self.render_pass);
    }
}
