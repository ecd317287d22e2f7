use vulkanalia::vk;

use super::backend::RenderDevice;
use crate::error::InitError;

/// One framebuffer per image view, in image-index order.
///
/// On failure the framebuffers created so far are destroyed again.
pub unsafe fn create_framebuffers<D: RenderDevice>(
    device: &D,
    render_pass: vk::RenderPass,
    image_views: &[vk::ImageView],
    extent: vk::Extent2D,
) -> Result<Vec<vk::Framebuffer>, InitError> {
    let mut framebuffers = Vec::with_capacity(image_views.len());

    for view in image_views {
        match device.create_framebuffer(render_pass, *view, extent) {
            Ok(framebuffer) => framebuffers.push(framebuffer),
            Err(error) => {
                destroy_framebuffers(device, &framebuffers);
                return Err(InitError::FramebufferCreationFailed(error));
            }
        }
    }

    Ok(framebuffers)
}

pub unsafe fn destroy_framebuffers<D: RenderDevice>(device: &D, framebuffers: &[vk::Framebuffer]) {
    framebuffers
        .iter()
        .rev()
        .for_each(|f| device.destroy_framebuffer(*f));
}
