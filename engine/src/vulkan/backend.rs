use vulkanalia::{vk, VkResult, VkSuccessResult};

use super::pipeline::PipelineConfig;

/// Surface properties reported by the physical device.
#[derive(Clone, Debug)]
pub struct SwapchainSupport {
    pub capabilities: vk::SurfaceCapabilitiesKHR,
    pub formats: Vec<vk::SurfaceFormatKHR>,
    pub present_modes: Vec<vk::PresentModeKHR>,
}

impl SwapchainSupport {
    pub fn is_adequate(&self) -> bool {
        !self.formats.is_empty() && !self.present_modes.is_empty()
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SwapchainDesc {
    pub surface_format: vk::SurfaceFormatKHR,
    pub present_mode: vk::PresentModeKHR,
    pub extent: vk::Extent2D,
    pub image_count: u32,
    pub pre_transform: vk::SurfaceTransformFlagsKHR,
}

/// The single color attachment of a render pass.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ColorAttachmentDesc {
    pub format: vk::Format,
    pub load_op: vk::AttachmentLoadOp,
    pub store_op: vk::AttachmentStoreOp,
    pub initial_layout: vk::ImageLayout,
    pub subpass_layout: vk::ImageLayout,
    pub final_layout: vk::ImageLayout,
}

#[derive(Copy, Clone, Debug)]
pub struct RenderPassBegin {
    pub render_pass: vk::RenderPass,
    pub framebuffer: vk::Framebuffer,
    pub extent: vk::Extent2D,
    pub clear_color: [f32; 4],
}

#[derive(Copy, Clone, Debug)]
pub struct SubmitDesc {
    pub command_buffer: vk::CommandBuffer,
    pub wait_semaphore: vk::Semaphore,
    pub wait_stage: vk::PipelineStageFlags,
    pub signal_semaphore: vk::Semaphore,
    pub fence: vk::Fence,
}

/// Every device-level operation issued by the core after the logical device
/// exists.
///
/// Implemented by [`DeviceContext`](super::device::DeviceContext) for real
/// hardware. Callers must uphold the usual Vulkan validity rules: handles
/// passed in were created by this device and are not in use by the GPU when
/// destroyed.
pub trait RenderDevice {
    unsafe fn swapchain_support(&self) -> VkResult<SwapchainSupport>;
    unsafe fn create_swapchain(&self, desc: &SwapchainDesc) -> VkResult<vk::SwapchainKHR>;
    unsafe fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>>;
    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR);

    unsafe fn create_image_view(&self, image: vk::Image, format: vk::Format)
        -> VkResult<vk::ImageView>;
    unsafe fn destroy_image_view(&self, view: vk::ImageView);

    unsafe fn create_render_pass(&self, attachment: &ColorAttachmentDesc)
        -> VkResult<vk::RenderPass>;
    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass);

    unsafe fn create_framebuffer(
        &self,
        render_pass: vk::RenderPass,
        view: vk::ImageView,
        extent: vk::Extent2D,
    ) -> VkResult<vk::Framebuffer>;
    unsafe fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer);

    unsafe fn create_shader_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule>;
    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule);

    unsafe fn create_pipeline_layout(&self) -> VkResult<vk::PipelineLayout>;
    unsafe fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout);

    unsafe fn create_graphics_pipeline(
        &self,
        config: &PipelineConfig,
        render_pass: vk::RenderPass,
    ) -> VkResult<vk::Pipeline>;
    unsafe fn destroy_pipeline(&self, pipeline: vk::Pipeline);

    unsafe fn create_command_pool(&self) -> VkResult<vk::CommandPool>;
    unsafe fn allocate_command_buffer(&self, pool: vk::CommandPool)
        -> VkResult<vk::CommandBuffer>;
    unsafe fn destroy_command_pool(&self, pool: vk::CommandPool);

    unsafe fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence>;
    unsafe fn destroy_fence(&self, fence: vk::Fence);
    unsafe fn create_semaphore(&self) -> VkResult<vk::Semaphore>;
    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore);

    /// Returns `SuccessCode::TIMEOUT` when the fence did not signal in time.
    unsafe fn wait_for_fence(&self, fence: vk::Fence, timeout_ns: u64)
        -> VkResult<vk::SuccessCode>;
    unsafe fn reset_fence(&self, fence: vk::Fence) -> VkResult<()>;

    unsafe fn acquire_next_image(
        &self,
        swapchain: vk::SwapchainKHR,
        timeout_ns: u64,
        signal: vk::Semaphore,
    ) -> VkSuccessResult<u32>;

    unsafe fn reset_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()>;
    unsafe fn begin_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()>;
    unsafe fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        begin: &RenderPassBegin,
    );
    unsafe fn cmd_bind_pipeline(&self, command_buffer: vk::CommandBuffer, pipeline: vk::Pipeline);
    unsafe fn cmd_draw(&self, command_buffer: vk::CommandBuffer, vertex_count: u32);
    unsafe fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer);
    unsafe fn end_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()>;

    unsafe fn queue_submit(&self, submit: &SubmitDesc) -> VkResult<()>;
    unsafe fn queue_present(
        &self,
        swapchain: vk::SwapchainKHR,
        image_index: u32,
        wait: vk::Semaphore,
    ) -> VkResult<vk::SuccessCode>;

    unsafe fn wait_idle(&self) -> VkResult<()>;

    /// Destroys the logical device, surface, debug messenger and instance,
    /// in that order.
    unsafe fn destroy_context(&mut self);
}
