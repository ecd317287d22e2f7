use log::*;
use vulkanalia::vk;

use super::backend::{RenderDevice, SwapchainDesc};
use crate::error::InitError;

/// The presentable image chain.
///
/// `images` belong to the swapchain and are released with it; `image_views`
/// are owned here and destroyed one by one. Both are indexed by the image
/// index returned from acquire.
#[derive(Debug)]
pub struct SwapchainState {
    pub swapchain: vk::SwapchainKHR,
    pub surface_format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub images: Vec<vk::Image>,
    pub image_views: Vec<vk::ImageView>,
}

impl SwapchainState {
    pub unsafe fn build<D: RenderDevice>(
        device: &D,
        window_extent: vk::Extent2D,
    ) -> Result<SwapchainState, InitError> {
        let support = device.swapchain_support()?;
        if !support.is_adequate() {
            return Err(InitError::NoSuitableDevice);
        }

        let desc = SwapchainDesc {
            surface_format: choose_surface_format(&support.formats),
            present_mode: choose_present_mode(&support.present_modes),
            extent: choose_extent(&support.capabilities, window_extent),
            image_count: choose_image_count(&support.capabilities),
            pre_transform: support.capabilities.current_transform,
        };

        let swapchain = device.create_swapchain(&desc)?;

        let images = match device.swapchain_images(swapchain) {
            Ok(images) => images,
            Err(error) => {
                device.destroy_swapchain(swapchain);
                return Err(error.into());
            }
        };

        let mut image_views = Vec::with_capacity(images.len());
        for image in &images {
            match device.create_image_view(*image, desc.surface_format.format) {
                Ok(view) => image_views.push(view),
                Err(error) => {
                    image_views.iter().rev().for_each(|v| device.destroy_image_view(*v));
                    device.destroy_swapchain(swapchain);
                    return Err(error.into());
                }
            }
        }

        info!(
            "Built swapchain: {} images, {:?}, {:?}, {}x{}.",
            images.len(),
            desc.surface_format.format,
            desc.present_mode,
            desc.extent.width,
            desc.extent.height
        );

        Ok(SwapchainState {
            swapchain,
            surface_format: desc.surface_format,
            present_mode: desc.present_mode,
            extent: desc.extent,
            images,
            image_views,
        })
    }

    pub fn format(&self) -> vk::Format {
        self.surface_format.format
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    /// Views go first; the swapchain releases its own images.
    pub unsafe fn destroy<D: RenderDevice>(self, device: &D) {
        self.image_views
            .iter()
            .rev()
            .for_each(|v| device.destroy_image_view(*v));
        device.destroy_swapchain(self.swapchain);
    }
}

pub fn choose_surface_format(formats: &[vk::SurfaceFormatKHR]) -> vk::SurfaceFormatKHR {
    formats
        .iter()
        .cloned()
        .find(|f| {
            f.format == vk::Format::B8G8R8A8_SRGB
                && f.color_space == vk::ColorSpaceKHR::SRGB_NONLINEAR
        })
        .unwrap_or_else(|| formats[0])
}

/// Mailbox when available, otherwise FIFO which every implementation supports.
pub fn choose_present_mode(present_modes: &[vk::PresentModeKHR]) -> vk::PresentModeKHR {
    present_modes
        .iter()
        .cloned()
        .find(|m| *m == vk::PresentModeKHR::MAILBOX)
        .unwrap_or(vk::PresentModeKHR::FIFO)
}

pub fn choose_extent(
    capabilities: &vk::SurfaceCapabilitiesKHR,
    window_extent: vk::Extent2D,
) -> vk::Extent2D {
    if capabilities.current_extent.width != u32::MAX {
        capabilities.current_extent
    } else {
        vk::Extent2D {
            width: window_extent.width.clamp(
                capabilities.min_image_extent.width,
                capabilities.max_image_extent.width,
            ),
            height: window_extent.height.clamp(
                capabilities.min_image_extent.height,
                capabilities.max_image_extent.height,
            ),
        }
    }
}

pub fn choose_image_count(capabilities: &vk::SurfaceCapabilitiesKHR) -> u32 {
    let desired = capabilities.min_image_count + 1;
    if capabilities.max_image_count != 0 && desired > capabilities.max_image_count {
        capabilities.max_image_count
    } else {
        desired
    }
}
