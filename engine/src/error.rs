use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;
use vulkanalia::vk;

/// Fatal failures while bringing the engine up.
#[derive(Debug, Error)]
pub enum InitError {
    #[error("Failed to load the Vulkan library: {0}")]
    Loader(String),
    #[error("Window error: {0}")]
    Window(String),
    #[error("Validation layer `{0}` requested but not supported.")]
    MissingLayer(String),
    #[error("Required extension `{0}` is not available.")]
    MissingExtension(String),
    #[error("Failed to find suitable physical device.")]
    NoSuitableDevice,
    #[error("Render pass creation rejected by the device: {0}")]
    RenderPassCreationFailed(vk::ErrorCode),
    #[error("Framebuffer creation rejected by the device: {0}")]
    FramebufferCreationFailed(vk::ErrorCode),
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::ErrorCode),
}

/// Swapchain conditions reported by acquire and present.
///
/// `OutOfDate` never leaves the frame loop: it is turned into a rebuild.
/// Everything else is fatal.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SwapchainError {
    #[error("Swapchain is out of date.")]
    OutOfDate,
    #[error("Timed out acquiring the next swapchain image.")]
    Timeout,
    #[error("Swapchain error: {0}")]
    Vulkan(vk::ErrorCode),
}

#[derive(Debug, Error)]
pub enum ShaderLoadError {
    #[error("Shader file `{}` not found.", .0.display())]
    NotFound(PathBuf),
    #[error("Shader file `{}` is not valid SPIR-V: {reason}", path.display())]
    InvalidBytecode { path: PathBuf, reason: String },
    #[error("Failed to read shader file `{}`: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// The render-completion fence did not signal in time. This means the GPU is
/// hung and is never retried.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("Render fence was not signaled within {timeout:?}.")]
pub struct SyncTimeoutError {
    pub timeout: Duration,
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Shader(#[from] ShaderLoadError),
    #[error("Pipeline creation failed: {0}")]
    Vulkan(#[from] vk::ErrorCode),
}

/// Any failure while producing a frame.
#[derive(Debug, Error)]
pub enum FrameError {
    #[error(transparent)]
    Sync(#[from] SyncTimeoutError),
    #[error(transparent)]
    Swapchain(#[from] SwapchainError),
    #[error("Failed to rebuild the swapchain: {0}")]
    Rebuild(#[from] InitError),
    #[error("Vulkan error: {0}")]
    Vulkan(#[from] vk::ErrorCode),
}
