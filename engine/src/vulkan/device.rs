use log::*;
use std::collections::HashSet;
use thiserror::Error;
use vulkanalia::loader::{LibloadingLoader, LIBRARY};
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::{ExtDebugUtilsExtension, Handle, KhrSurfaceExtension, KhrSwapchainExtension};
use vulkanalia::window as vk_window;
use vulkanalia::{Version, VkResult, VkSuccessResult};
use winit::window::Window;

use super::backend::{
    ColorAttachmentDesc, RenderDevice, RenderPassBegin, SubmitDesc, SwapchainDesc,
    SwapchainSupport,
};
use super::constants;
use super::instance::{self, InstanceParts};
use super::pipeline::PipelineConfig;
use crate::error::InitError;

#[derive(Debug, Error, Clone)]
pub enum SuitabilityError {
    #[error("API version {0:?} is below the required minimum.")]
    ApiVersion(Version),
    #[error("Missing device extension `{0}`.")]
    MissingExtension(String),
    #[error("Missing a queue family supporting both graphics and presentation.")]
    MissingQueueFamily,
    #[error("Surface exposes no formats or present modes.")]
    InadequateSwapchain,
}

/// Owns the instance, debug messenger, surface, physical and logical device,
/// and the single graphics+present queue.
pub struct DeviceContext {
    _entry: Entry,
    instance: Instance,
    messenger: Option<vk::DebugUtilsMessengerEXT>,
    surface: vk::SurfaceKHR,
    physical_device: vk::PhysicalDevice,
    device: Device,
    graphics_queue: vk::Queue,
    queue_family: u32,
}

impl std::fmt::Debug for DeviceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceContext")
            .field("surface", &self.surface)
            .field("physical_device", &self.physical_device)
            .field("queue_family", &self.queue_family)
            .finish_non_exhaustive()
    }
}

impl DeviceContext {
    pub unsafe fn initialize(
        window: &Window,
        app_name: &str,
        validation: bool,
    ) -> Result<DeviceContext, InitError> {
        let loader = LibloadingLoader::new(LIBRARY)
            .map_err(|e| InitError::Loader(e.to_string()))?;
        let entry = Entry::new(loader).map_err(|e| InitError::Loader(e.to_string()))?;

        let InstanceParts {
            instance,
            messenger,
        } = instance::create_instance(window, &entry, app_name, validation)?;

        let surface = match vk_window::create_surface(&instance, window, window) {
            Ok(surface) => surface,
            Err(error) => {
                destroy_instance(&instance, messenger);
                return Err(error.into());
            }
        };

        let selected =
            pick_physical_device(&instance, surface).and_then(|(physical_device, queue_family)| {
                create_logical_device(&entry, &instance, physical_device, queue_family, validation)
                    .map(|device| (physical_device, queue_family, device))
            });

        let (physical_device, queue_family, device) = match selected {
            Ok(selected) => selected,
            Err(error) => {
                instance.destroy_surface_khr(surface, None);
                destroy_instance(&instance, messenger);
                return Err(error);
            }
        };

        let graphics_queue = device.get_device_queue(queue_family, 0);

        Ok(DeviceContext {
            _entry: entry,
            instance,
            messenger,
            surface,
            physical_device,
            device,
            graphics_queue,
            queue_family,
        })
    }
}

unsafe fn destroy_instance(instance: &Instance, messenger: Option<vk::DebugUtilsMessengerEXT>) {
    if let Some(messenger) = messenger {
        instance.destroy_debug_utils_messenger_ext(messenger, None);
    }
    instance.destroy_instance(None);
}

/// Ranks device types; discrete GPUs win.
pub fn device_type_score(device_type: vk::PhysicalDeviceType) -> u32 {
    match device_type {
        vk::PhysicalDeviceType::DISCRETE_GPU => 3,
        vk::PhysicalDeviceType::INTEGRATED_GPU => 2,
        vk::PhysicalDeviceType::VIRTUAL_GPU => 1,
        _ => 0,
    }
}

/// Picks the first queue family that supports both graphics and presentation.
pub fn select_queue_family(families: &[(vk::QueueFlags, bool)]) -> Option<u32> {
    families
        .iter()
        .position(|(flags, present)| flags.contains(vk::QueueFlags::GRAPHICS) && *present)
        .map(|i| i as u32)
}

unsafe fn pick_physical_device(
    instance: &Instance,
    surface: vk::SurfaceKHR,
) -> Result<(vk::PhysicalDevice, u32), InitError> {
    let mut candidates = Vec::new();
    let mut failures = Vec::new();

    for physical_device in instance.enumerate_physical_devices()? {
        let properties = instance.get_physical_device_properties(physical_device);

        match check_physical_device(instance, surface, physical_device, &properties) {
            Ok(queue_family) => {
                let score = device_type_score(properties.device_type);
                candidates.push((score, physical_device, queue_family, properties));
            }
            Err(error) => {
                warn!("Skipping physical device (`{}`): {}", properties.device_name, error);
                failures.push(error);
            }
        }
    }

    // Stable sort keeps enumeration order among equally ranked devices.
    candidates.sort_by_key(|(score, ..)| std::cmp::Reverse(*score));

    match candidates.into_iter().next() {
        Some((_, physical_device, queue_family, properties)) => {
            info!("Selected physical device (`{}`).", properties.device_name);
            Ok((physical_device, queue_family))
        }
        None => Err(no_device_error(&failures)),
    }
}

/// A missing extension is only reported when it is the reason every device was rejected.
fn no_device_error(failures: &[SuitabilityError]) -> InitError {
    let mut missing = failures.iter().filter_map(|f| match f {
        SuitabilityError::MissingExtension(name) => Some(name.clone()),
        _ => None,
    });

    let only_extensions = failures
        .iter()
        .all(|f| matches!(f, SuitabilityError::MissingExtension(_)));

    match missing.next() {
        Some(name) if only_extensions => InitError::MissingExtension(name),
        _ => InitError::NoSuitableDevice,
    }
}

unsafe fn check_physical_device(
    instance: &Instance,
    surface: vk::SurfaceKHR,
    physical_device: vk::PhysicalDevice,
    properties: &vk::PhysicalDeviceProperties,
) -> Result<u32, SuitabilityError> {
    let version = Version::from(properties.api_version);
    if version < constants::MIN_API_VERSION {
        return Err(SuitabilityError::ApiVersion(version));
    }

    let extensions = instance
        .enumerate_device_extension_properties(physical_device, None)
        .map_err(|_| {
            SuitabilityError::MissingExtension(vk::KHR_SWAPCHAIN_EXTENSION.name.to_string())
        })?
        .iter()
        .map(|e| e.extension_name)
        .collect::<HashSet<_>>();

    if let Some(missing) = constants::DEVICE_EXTENSIONS.iter().find(|e| !extensions.contains(*e)) {
        return Err(SuitabilityError::MissingExtension(missing.to_string()));
    }

    let families = instance
        .get_physical_device_queue_family_properties(physical_device)
        .iter()
        .enumerate()
        .map(|(index, properties)| {
            let present = instance
                .get_physical_device_surface_support_khr(physical_device, index as u32, surface)
                .unwrap_or(false);
            (properties.queue_flags, present)
        })
        .collect::<Vec<_>>();

    let queue_family = select_queue_family(&families).ok_or(SuitabilityError::MissingQueueFamily)?;

    let support = query_swapchain_support(instance, physical_device, surface)
        .map_err(|_| SuitabilityError::InadequateSwapchain)?;
    if !support.is_adequate() {
        return Err(SuitabilityError::InadequateSwapchain);
    }

    Ok(queue_family)
}

unsafe fn query_swapchain_support(
    instance: &Instance,
    physical_device: vk::PhysicalDevice,
    surface: vk::SurfaceKHR,
) -> VkResult<SwapchainSupport> {
    Ok(SwapchainSupport {
        capabilities: instance
            .get_physical_device_surface_capabilities_khr(physical_device, surface)?,
        formats: instance.get_physical_device_surface_formats_khr(physical_device, surface)?,
        present_modes: instance
            .get_physical_device_surface_present_modes_khr(physical_device, surface)?,
    })
}

unsafe fn create_logical_device(
    entry: &Entry,
    instance: &Instance,
    physical_device: vk::PhysicalDevice,
    queue_family: u32,
    validation: bool,
) -> Result<Device, InitError> {
    let queue_priorities = &[1.0];
    let queue_info = vk::DeviceQueueCreateInfo::builder()
        .queue_family_index(queue_family)
        .queue_priorities(queue_priorities);

    let layers = if validation {
        vec![constants::VALIDATION_LAYER.as_ptr()]
    } else {
        vec![]
    };

    let mut extensions = constants::DEVICE_EXTENSIONS
        .iter()
        .map(|n| n.as_ptr())
        .collect::<Vec<_>>();

    // Required by Vulkan SDK on macOS since 1.3.216.
    if cfg!(target_os = "macos") && entry.version()? >= constants::PORTABILITY_MACOS_VERSION {
        extensions.push(vk::KHR_PORTABILITY_SUBSET_EXTENSION.name.as_ptr());
    }

    let features = vk::PhysicalDeviceFeatures::builder();

    let queue_infos = &[queue_info];
    let info = vk::DeviceCreateInfo::builder()
        .queue_create_infos(queue_infos)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&extensions)
        .enabled_features(&features);

    Ok(instance.create_device(physical_device, &info, None)?)
}

impl RenderDevice for DeviceContext {
    unsafe fn swapchain_support(&self) -> VkResult<SwapchainSupport> {
        query_swapchain_support(&self.instance, self.physical_device, self.surface)
    }

    unsafe fn create_swapchain(&self, desc: &SwapchainDesc) -> VkResult<vk::SwapchainKHR> {
        let info = vk::SwapchainCreateInfoKHR::builder()
            .surface(self.surface)
            .min_image_count(desc.image_count)
            .image_format(desc.surface_format.format)
            .image_color_space(desc.surface_format.color_space)
            .image_extent(desc.extent)
            .image_array_layers(1)
            .image_usage(vk::ImageUsageFlags::COLOR_ATTACHMENT)
            .image_sharing_mode(vk::SharingMode::EXCLUSIVE)
            .pre_transform(desc.pre_transform)
            .composite_alpha(vk::CompositeAlphaFlagsKHR::OPAQUE)
            .present_mode(desc.present_mode)
            .clipped(true)
            .old_swapchain(vk::SwapchainKHR::null());

        self.device.create_swapchain_khr(&info, None)
    }

    unsafe fn swapchain_images(&self, swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        self.device.get_swapchain_images_khr(swapchain)
    }

    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        self.device.destroy_swapchain_khr(swapchain, None);
    }

    unsafe fn create_image_view(
        &self,
        image: vk::Image,
        format: vk::Format,
    ) -> VkResult<vk::ImageView> {
        let components = vk::ComponentMapping::builder()
            .r(vk::ComponentSwizzle::IDENTITY)
            .g(vk::ComponentSwizzle::IDENTITY)
            .b(vk::ComponentSwizzle::IDENTITY)
            .a(vk::ComponentSwizzle::IDENTITY);

        let subresource_range = vk::ImageSubresourceRange::builder()
            .aspect_mask(vk::ImageAspectFlags::COLOR)
            .base_mip_level(0)
            .level_count(1)
            .base_array_layer(0)
            .layer_count(1);

        let info = vk::ImageViewCreateInfo::builder()
            .image(image)
            .view_type(vk::ImageViewType::_2D)
            .format(format)
            .components(components)
            .subresource_range(subresource_range);

        self.device.create_image_view(&info, None)
    }

    unsafe fn destroy_image_view(&self, view: vk::ImageView) {
        self.device.destroy_image_view(view, None);
    }

    unsafe fn create_render_pass(
        &self,
        attachment: &ColorAttachmentDesc,
    ) -> VkResult<vk::RenderPass> {
        let color_attachment = vk::AttachmentDescription::builder()
            .format(attachment.format)
            .samples(vk::SampleCountFlags::_1)
            .load_op(attachment.load_op)
            .store_op(attachment.store_op)
            .stencil_load_op(vk::AttachmentLoadOp::DONT_CARE)
            .stencil_store_op(vk::AttachmentStoreOp::DONT_CARE)
            .initial_layout(attachment.initial_layout)
            .final_layout(attachment.final_layout);

        let color_attachment_ref = vk::AttachmentReference::builder()
            .attachment(0)
            .layout(attachment.subpass_layout);

        let color_attachments = &[color_attachment_ref];
        let subpass = vk::SubpassDescription::builder()
            .pipeline_bind_point(vk::PipelineBindPoint::GRAPHICS)
            .color_attachments(color_attachments);

        // The layout transition must wait until the acquired image is available.
        let dependency = vk::SubpassDependency::builder()
            .src_subpass(vk::SUBPASS_EXTERNAL)
            .dst_subpass(0)
            .src_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
            .src_access_mask(vk::AccessFlags::empty())
            .dst_stage_mask(vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT)
            .dst_access_mask(vk::AccessFlags::COLOR_ATTACHMENT_WRITE);

        let attachments = &[color_attachment];
        let subpasses = &[subpass];
        let dependencies = &[dependency];
        let info = vk::RenderPassCreateInfo::builder()
            .attachments(attachments)
            .subpasses(subpasses)
            .dependencies(dependencies);

        self.device.create_render_pass(&info, None)
    }

    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.device.destroy_render_pass(render_pass, None);
    }

    unsafe fn create_framebuffer(
        &self,
        render_pass: vk::RenderPass,
        view: vk::ImageView,
        extent: vk::Extent2D,
    ) -> VkResult<vk::Framebuffer> {
        let attachments = &[view];
        let info = vk::FramebufferCreateInfo::builder()
            .render_pass(render_pass)
            .attachments(attachments)
            .width(extent.width)
            .height(extent.height)
            .layers(1);

        self.device.create_framebuffer(&info, None)
    }

    unsafe fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.device.destroy_framebuffer(framebuffer, None);
    }

    unsafe fn create_shader_module(&self, code: &[u32]) -> VkResult<vk::ShaderModule> {
        let info = vk::ShaderModuleCreateInfo::builder()
            .code_size(code.len() * 4)
            .code(code);

        self.device.create_shader_module(&info, None)
    }

    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.device.destroy_shader_module(module, None);
    }

    unsafe fn create_pipeline_layout(&self) -> VkResult<vk::PipelineLayout> {
        let info = vk::PipelineLayoutCreateInfo::builder();
        self.device.create_pipeline_layout(&info, None)
    }

    unsafe fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        self.device.destroy_pipeline_layout(layout, None);
    }

    unsafe fn create_graphics_pipeline(
        &self,
        config: &PipelineConfig,
        render_pass: vk::RenderPass,
    ) -> VkResult<vk::Pipeline> {
        let stages = config
            .shader_stages
            .iter()
            .map(|s| {
                vk::PipelineShaderStageCreateInfo::builder()
                    .stage(s.stage)
                    .module(s.module)
                    .name(constants::SHADER_ENTRY_POINT)
            })
            .collect::<Vec<_>>();

        let bindings = config
            .vertex_input
            .bindings
            .iter()
            .map(|b| {
                vk::VertexInputBindingDescription::builder()
                    .binding(b.binding)
                    .stride(b.stride)
                    .input_rate(b.input_rate)
                    .build()
            })
            .collect::<Vec<_>>();

        let attributes = config
            .vertex_input
            .attributes
            .iter()
            .map(|a| {
                vk::VertexInputAttributeDescription::builder()
                    .location(a.location)
                    .binding(a.binding)
                    .format(a.format)
                    .offset(a.offset)
                    .build()
            })
            .collect::<Vec<_>>();

        let vertex_input_state = vk::PipelineVertexInputStateCreateInfo::builder()
            .vertex_binding_descriptions(&bindings)
            .vertex_attribute_descriptions(&attributes);

        let input_assembly_state = vk::PipelineInputAssemblyStateCreateInfo::builder()
            .topology(config.topology)
            .primitive_restart_enable(false);

        let viewport = vk::Viewport::builder()
            .x(config.viewport.x)
            .y(config.viewport.y)
            .width(config.viewport.width)
            .height(config.viewport.height)
            .min_depth(config.viewport.min_depth)
            .max_depth(config.viewport.max_depth);

        let scissor = vk::Rect2D::builder()
            .offset(vk::Offset2D {
                x: config.scissor.x,
                y: config.scissor.y,
            })
            .extent(vk::Extent2D {
                width: config.scissor.width,
                height: config.scissor.height,
            });

        let viewports = &[viewport];
        let scissors = &[scissor];
        let viewport_state = vk::PipelineViewportStateCreateInfo::builder()
            .viewports(viewports)
            .scissors(scissors);

        let rasterization_state = vk::PipelineRasterizationStateCreateInfo::builder()
            .depth_clamp_enable(false)
            .rasterizer_discard_enable(false)
            .polygon_mode(config.rasterization.polygon_mode)
            .line_width(config.rasterization.line_width)
            .cull_mode(config.rasterization.cull_mode)
            .front_face(config.rasterization.front_face)
            .depth_bias_enable(false);

        let multisample_state = vk::PipelineMultisampleStateCreateInfo::builder()
            .sample_shading_enable(config.multisample.sample_shading)
            .rasterization_samples(config.multisample.samples);

        let blend = &config.color_blend_attachment;
        let attachment = vk::PipelineColorBlendAttachmentState::builder()
            .color_write_mask(blend.color_write_mask)
            .blend_enable(blend.blend_enable)
            .src_color_blend_factor(blend.src_color_blend_factor)
            .dst_color_blend_factor(blend.dst_color_blend_factor)
            .color_blend_op(blend.color_blend_op)
            .src_alpha_blend_factor(blend.src_alpha_blend_factor)
            .dst_alpha_blend_factor(blend.dst_alpha_blend_factor)
            .alpha_blend_op(blend.alpha_blend_op);

        let attachments = &[attachment];
        let color_blend_state = vk::PipelineColorBlendStateCreateInfo::builder()
            .logic_op_enable(false)
            .logic_op(vk::LogicOp::COPY)
            .attachments(attachments)
            .blend_constants([0.0, 0.0, 0.0, 0.0]);

        let info = vk::GraphicsPipelineCreateInfo::builder()
            .stages(&stages)
            .vertex_input_state(&vertex_input_state)
            .input_assembly_state(&input_assembly_state)
            .viewport_state(&viewport_state)
            .rasterization_state(&rasterization_state)
            .multisample_state(&multisample_state)
            .color_blend_state(&color_blend_state)
            .layout(config.layout)
            .render_pass(render_pass)
            .subpass(0);

        Ok(self
            .device
            .create_graphics_pipelines(vk::PipelineCache::null(), &[info], None)?
            .0[0])
    }

    unsafe fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.device.destroy_pipeline(pipeline, None);
    }

    unsafe fn create_command_pool(&self) -> VkResult<vk::CommandPool> {
        // Individual reset, the single command buffer is re-recorded every frame.
        let info = vk::CommandPoolCreateInfo::builder()
            .flags(vk::CommandPoolCreateFlags::RESET_COMMAND_BUFFER)
            .queue_family_index(self.queue_family);

        self.device.create_command_pool(&info, None)
    }

    unsafe fn allocate_command_buffer(&self, pool: vk::CommandPool) -> VkResult<vk::CommandBuffer> {
        let info = vk::CommandBufferAllocateInfo::builder()
            .command_pool(pool)
            .level(vk::CommandBufferLevel::PRIMARY)
            .command_buffer_count(1);

        Ok(self.device.allocate_command_buffers(&info)?[0])
    }

    unsafe fn destroy_command_pool(&self, pool: vk::CommandPool) {
        self.device.destroy_command_pool(pool, None);
    }

    unsafe fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence> {
        let flags = if signaled {
            vk::FenceCreateFlags::SIGNALED
        } else {
            vk::FenceCreateFlags::empty()
        };
        let info = vk::FenceCreateInfo::builder().flags(flags);

        self.device.create_fence(&info, None)
    }

    unsafe fn destroy_fence(&self, fence: vk::Fence) {
        self.device.destroy_fence(fence, None);
    }

    unsafe fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        let info = vk::SemaphoreCreateInfo::builder();
        self.device.create_semaphore(&info, None)
    }

    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        self.device.destroy_semaphore(semaphore, None);
    }

    unsafe fn wait_for_fence(
        &self,
        fence: vk::Fence,
        timeout_ns: u64,
    ) -> VkResult<vk::SuccessCode> {
        self.device.wait_for_fences(&[fence], true, timeout_ns)
    }

    unsafe fn reset_fence(&self, fence: vk::Fence) -> VkResult<()> {
        self.device.reset_fences(&[fence])
    }

    unsafe fn acquire_next_image(
        &self,
        swapchain: vk::SwapchainKHR,
        timeout_ns: u64,
        signal: vk::Semaphore,
    ) -> VkSuccessResult<u32> {
        self.device
            .acquire_next_image_khr(swapchain, timeout_ns, signal, vk::Fence::null())
    }

    unsafe fn reset_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()> {
        self.device
            .reset_command_buffer(command_buffer, vk::CommandBufferResetFlags::empty())
    }

    unsafe fn begin_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()> {
        let info = vk::CommandBufferBeginInfo::builder()
            .flags(vk::CommandBufferUsageFlags::ONE_TIME_SUBMIT);

        self.device.begin_command_buffer(command_buffer, &info)
    }

    unsafe fn cmd_begin_render_pass(
        &self,
        command_buffer: vk::CommandBuffer,
        begin: &RenderPassBegin,
    ) {
        let render_area = vk::Rect2D::builder()
            .offset(vk::Offset2D::default())
            .extent(begin.extent);

        let color_clear_value = vk::ClearValue {
            color: vk::ClearColorValue {
                float32: begin.clear_color,
            },
        };

        let clear_values = &[color_clear_value];
        let info = vk::RenderPassBeginInfo::builder()
            .render_pass(begin.render_pass)
            .framebuffer(begin.framebuffer)
            .render_area(render_area)
            .clear_values(clear_values);

        self.device
            .cmd_begin_render_pass(command_buffer, &info, vk::SubpassContents::INLINE);
    }

    unsafe fn cmd_bind_pipeline(&self, command_buffer: vk::CommandBuffer, pipeline: vk::Pipeline) {
        self.device
            .cmd_bind_pipeline(command_buffer, vk::PipelineBindPoint::GRAPHICS, pipeline);
    }

    unsafe fn cmd_draw(&self, command_buffer: vk::CommandBuffer, vertex_count: u32) {
        self.device.cmd_draw(command_buffer, vertex_count, 1, 0, 0);
    }

    unsafe fn cmd_end_render_pass(&self, command_buffer: vk::CommandBuffer) {
        self.device.cmd_end_render_pass(command_buffer);
    }

    unsafe fn end_command_buffer(&self, command_buffer: vk::CommandBuffer) -> VkResult<()> {
        self.device.end_command_buffer(command_buffer)
    }

    unsafe fn queue_submit(&self, submit: &SubmitDesc) -> VkResult<()> {
        let wait_semaphores = &[submit.wait_semaphore];
        let wait_stages = &[submit.wait_stage];
        let command_buffers = &[submit.command_buffer];
        let signal_semaphores = &[submit.signal_semaphore];
        let submit_info = vk::SubmitInfo::builder()
            .wait_semaphores(wait_semaphores)
            .wait_dst_stage_mask(wait_stages)
            .command_buffers(command_buffers)
            .signal_semaphores(signal_semaphores);

        self.device
            .queue_submit(self.graphics_queue, &[submit_info], submit.fence)
    }

    unsafe fn queue_present(
        &self,
        swapchain: vk::SwapchainKHR,
        image_index: u32,
        wait: vk::Semaphore,
    ) -> VkResult<vk::SuccessCode> {
        let wait_semaphores = &[wait];
        let swapchains = &[swapchain];
        let image_indices = &[image_index];
        let present_info = vk::PresentInfoKHR::builder()
            .wait_semaphores(wait_semaphores)
            .swapchains(swapchains)
            .image_indices(image_indices);

        self.device.queue_present_khr(self.graphics_queue, &present_info)
    }

    unsafe fn wait_idle(&self) -> VkResult<()> {
        self.device.device_wait_idle()
    }

    unsafe fn destroy_context(&mut self) {
        self.device.destroy_device(None);
        self.instance.destroy_surface_khr(self.surface, None);
        destroy_instance(&self.instance, self.messenger.take());
        debug!("Destroyed device context.");
    }
}
