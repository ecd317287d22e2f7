use std::time::Duration;

use vulkanalia::{vk, Version};

pub const PORTABILITY_MACOS_VERSION: Version = Version::new(1, 3, 216);
pub const MIN_API_VERSION: Version = Version::new(1, 1, 0);
pub const VALIDATION_LAYER: vk::ExtensionName =
    vk::ExtensionName::from_bytes(b"VK_LAYER_KHRONOS_validation");
pub const DEVICE_EXTENSIONS: &[vk::ExtensionName] = &[vk::KHR_SWAPCHAIN_EXTENSION.name];

/// Upper bound for the render fence wait and the image acquire.
pub const FRAME_TIMEOUT: Duration = Duration::from_secs(1);

pub const SHADER_ENTRY_POINT: &[u8] = b"main\0";

/// Vertices emitted by the built-in triangle shaders.
pub const TRIANGLE_VERTEX_COUNT: u32 = 3;
