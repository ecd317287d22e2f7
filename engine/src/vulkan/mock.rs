//! A recording stand-in for the GPU used by the component tests.
//!
//! Every create and destroy is logged with a fresh handle value, fences
//! follow a simple signaled/pending model, and acquire, present and fence
//! waits replay scripted results before falling back to success.

use std::cell::RefCell;
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use vulkanalia::vk::{self, Handle};
use vulkanalia::{VkResult, VkSuccessResult};

use super::backend::{
    ColorAttachmentDesc, RenderDevice, RenderPassBegin, SubmitDesc, SwapchainDesc,
    SwapchainSupport,
};
use super::pipeline::PipelineConfig;
use super::render_pass;
use super::shader::{ShaderBytecode, ShaderSet};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Instance,
    Messenger,
    Surface,
    Device,
    Swapchain,
    ImageView,
    RenderPass,
    Framebuffer,
    PipelineLayout,
    ShaderModule,
    Pipeline,
    CommandPool,
    Fence,
    Semaphore,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    Create(ResourceKind, u64),
    Destroy(ResourceKind, u64),
    AllocateCommandBuffer,
    WaitForFence,
    ResetFence,
    Acquire,
    ResetCommandBuffer,
    BeginCommandBuffer,
    BeginRenderPass {
        framebuffer: vk::Framebuffer,
        clear_color: [f32; 4],
    },
    BindPipeline(vk::Pipeline),
    Draw(u32),
    EndRenderPass,
    EndCommandBuffer,
    Submit,
    Present(u32),
    WaitIdle,
}

#[derive(Copy, Clone, Debug, Default)]
struct FenceState {
    signaled: bool,
    pending: bool,
}

#[derive(Debug, Default)]
struct MockState {
    next_id: u64,
    image_count: u32,
    calls: Vec<Call>,
    live: HashMap<u64, ResourceKind>,
    failures: HashMap<ResourceKind, (usize, vk::ErrorCode)>,

    swapchain_extents: HashMap<u64, vk::Extent2D>,
    framebuffer_views: HashMap<u64, vk::ImageView>,
    render_pass_attachments: HashMap<u64, ColorAttachmentDesc>,
    pipelines: HashMap<u64, (PipelineConfig, vk::RenderPass)>,
    fences: HashMap<u64, FenceState>,

    acquire_results: VecDeque<VkSuccessResult<u32>>,
    present_results: VecDeque<VkResult<vk::SuccessCode>>,
    fence_results: VecDeque<vk::SuccessCode>,
    acquire_counter: u32,

    in_flight: usize,
    max_in_flight: usize,
    recorded_while_in_flight: usize,
    submits: usize,
    presents: usize,
}

impl MockState {
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn create(&mut self, kind: ResourceKind) -> VkResult<u64> {
        if let Some((remaining, error)) = self.failures.get(&kind).copied() {
            if remaining == 0 {
                self.failures.remove(&kind);
                return Err(error);
            }
            self.failures.insert(kind, (remaining - 1, error));
        }

        let id = self.next_id();
        self.live.insert(id, kind);
        self.calls.push(Call::Create(kind, id));
        Ok(id)
    }

    fn destroy(&mut self, kind: ResourceKind, id: u64) {
        match self.live.remove(&id) {
            Some(live) if live == kind => self.calls.push(Call::Destroy(kind, id)),
            Some(live) => panic!("destroyed {:?} {} as {:?}", live, id, kind),
            None => panic!("destroyed {:?} {} which is not live", kind, id),
        }
    }
}

#[allow(unused_unsafe)]
fn handle<H: Handle<Repr = u64>>(id: u64) -> H {
    unsafe { H::from_raw(id) }
}

/// Clones share state, so a test can keep a probe after handing the device
/// to the renderer.
#[derive(Clone, Debug)]
pub struct MockDevice {
    state: Rc<RefCell<MockState>>,
}

impl MockDevice {
    pub const EXTENT: vk::Extent2D = vk::Extent2D {
        width: 1280,
        height: 720,
    };

    /// Instance, messenger, surface and logical device.
    pub const CONTEXT_HANDLES: usize = 4;

    pub fn new(image_count: u32) -> MockDevice {
        let _ = pretty_env_logger::try_init();

        let mut state = MockState {
            image_count,
            ..Default::default()
        };
        for kind in [
            ResourceKind::Instance,
            ResourceKind::Messenger,
            ResourceKind::Surface,
            ResourceKind::Device,
        ] {
            let _ = state.create(kind);
        }

        MockDevice {
            state: Rc::new(RefCell::new(state)),
        }
    }

    /// Placeholder bytecode for both stages; the mock never inspects it.
    pub fn shaders() -> ShaderSet {
        let bytecode = |name: &str| ShaderBytecode {
            path: name.into(),
            words: vec![0x0723_0203, 0x0001_0000, 0, 1, 0],
        };
        ShaderSet {
            vertex: bytecode("vert.spv"),
            fragment: bytecode("frag.spv"),
        }
    }

    pub fn set_image_count(&self, image_count: u32) {
        self.state.borrow_mut().image_count = image_count;
    }

    /// Lets the next `count` creations of `kind` succeed, then fails one with
    /// `error`.
    pub fn fail_create_after(&self, kind: ResourceKind, count: usize, error: vk::ErrorCode) {
        self.state.borrow_mut().failures.insert(kind, (count, error));
    }

    pub fn push_acquire(&self, result: VkSuccessResult<u32>) {
        self.state.borrow_mut().acquire_results.push_back(result);
    }

    pub fn push_present(&self, result: VkResult<vk::SuccessCode>) {
        self.state.borrow_mut().present_results.push_back(result);
    }

    pub fn push_fence_wait(&self, code: vk::SuccessCode) {
        self.state.borrow_mut().fence_results.push_back(code);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.borrow().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.borrow_mut().calls.clear();
    }

    pub fn created(&self) -> Vec<(ResourceKind, u64)> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Create(kind, id) => Some((*kind, *id)),
                _ => None,
            })
            .collect()
    }

    pub fn destroyed(&self) -> Vec<(ResourceKind, u64)> {
        self.state
            .borrow()
            .calls
            .iter()
            .filter_map(|c| match c {
                Call::Destroy(kind, id) => Some((*kind, *id)),
                _ => None,
            })
            .collect()
    }

    pub fn created_count(&self, kind: ResourceKind) -> usize {
        self.created().iter().filter(|(k, _)| *k == kind).count()
    }

    pub fn live_count(&self, kind: ResourceKind) -> usize {
        self.state.borrow().live.values().filter(|k| **k == kind).count()
    }

    pub fn live_total(&self) -> usize {
        self.state.borrow().live.len()
    }

    pub fn swapchain_extent(&self, swapchain: vk::SwapchainKHR) -> Option<vk::Extent2D> {
        self.state.borrow().swapchain_extents.get(&swapchain.as_raw()).copied()
    }

    pub fn framebuffer_view(&self, framebuffer: vk::Framebuffer) -> Option<vk::ImageView> {
        self.state.borrow().framebuffer_views.get(&framebuffer.as_raw()).copied()
    }

    pub fn render_pass_attachment(
        &self,
        render_pass: vk::RenderPass,
    ) -> Option<ColorAttachmentDesc> {
        self.state
            .borrow()
            .render_pass_attachments
            .get(&render_pass.as_raw())
            .copied()
    }

    pub fn pipeline_config(&self, pipeline: vk::Pipeline) -> Option<PipelineConfig> {
        self.state
            .borrow()
            .pipelines
            .get(&pipeline.as_raw())
            .map(|(config, _)| config.clone())
    }

    pub fn pipeline_render_pass(&self, pipeline: vk::Pipeline) -> Option<vk::RenderPass> {
        self.state
            .borrow()
            .pipelines
            .get(&pipeline.as_raw())
            .map(|(_, render_pass)| *render_pass)
    }

    pub fn fence_signaled(&self, fence: vk::Fence) -> bool {
        self.state
            .borrow()
            .fences
            .get(&fence.as_raw())
            .map_or(false, |f| f.signaled)
    }

    pub fn submit_count(&self) -> usize {
        self.state.borrow().submits
    }

    pub fn present_count(&self) -> usize {
        self.state.borrow().presents
    }

    pub fn max_in_flight(&self) -> usize {
        self.state.borrow().max_in_flight
    }

    pub fn recorded_while_in_flight(&self) -> usize {
        self.state.borrow().recorded_while_in_flight
    }

    pub fn standalone_render_pass(&self) -> vk::RenderPass {
        let attachment = render_pass::color_attachment(vk::Format::B8G8R8A8_SRGB);
        unsafe { self.create_render_pass(&attachment) }.unwrap()
    }

    pub fn standalone_pipeline(&self, render_pass: vk::RenderPass) -> vk::Pipeline {
        unsafe {
            let layout = self.create_pipeline_layout().unwrap();
            let config = PipelineConfig::triangle(vec![], layout, Self::EXTENT);
            self.create_graphics_pipeline(&config, render_pass).unwrap()
        }
    }
}

impl RenderDevice for MockDevice {
    unsafe fn swapchain_support(&self) -> VkResult<SwapchainSupport> {
        let image_count = self.state.borrow().image_count;
        let capabilities = vk::SurfaceCapabilitiesKHR {
            min_image_count: image_count,
            max_image_count: image_count,
            current_extent: vk::Extent2D {
                width: u32::MAX,
                height: u32::MAX,
            },
            min_image_extent: vk::Extent2D {
                width: 1,
                height: 1,
            },
            max_image_extent: vk::Extent2D {
                width: 4096,
                height: 4096,
            },
            current_transform: vk::SurfaceTransformFlagsKHR::IDENTITY,
            ..Default::default()
        };

        Ok(SwapchainSupport {
            capabilities,
            formats: vec![vk::SurfaceFormatKHR {
                format: vk::Format::B8G8R8A8_SRGB,
                color_space: vk::ColorSpaceKHR::SRGB_NONLINEAR,
            }],
            present_modes: vec![vk::PresentModeKHR::FIFO],
        })
    }

    unsafe fn create_swapchain(&self, desc: &SwapchainDesc) -> VkResult<vk::SwapchainKHR> {
        let mut state = self.state.borrow_mut();
        let id = state.create(ResourceKind::Swapchain)?;
        state.swapchain_extents.insert(id, desc.extent);
        Ok(handle(id))
    }

    unsafe fn swapchain_images(&self, _swapchain: vk::SwapchainKHR) -> VkResult<Vec<vk::Image>> {
        let mut state = self.state.borrow_mut();
        let count = state.image_count;
        Ok((0..count).map(|_| handle(state.next_id())).collect())
    }

    unsafe fn destroy_swapchain(&self, swapchain: vk::SwapchainKHR) {
        let mut state = self.state.borrow_mut();
        state.destroy(ResourceKind::Swapchain, swapchain.as_raw());
        state.swapchain_extents.remove(&swapchain.as_raw());
    }

    unsafe fn create_image_view(
        &self,
        _image: vk::Image,
        _format: vk::Format,
    ) -> VkResult<vk::ImageView> {
        Ok(handle(self.state.borrow_mut().create(ResourceKind::ImageView)?))
    }

    unsafe fn destroy_image_view(&self, view: vk::ImageView) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::ImageView, view.as_raw());
    }

    unsafe fn create_render_pass(
        &self,
        attachment: &ColorAttachmentDesc,
    ) -> VkResult<vk::RenderPass> {
        let mut state = self.state.borrow_mut();
        let id = state.create(ResourceKind::RenderPass)?;
        state.render_pass_attachments.insert(id, *attachment);
        Ok(handle(id))
    }

    unsafe fn destroy_render_pass(&self, render_pass: vk::RenderPass) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::RenderPass, render_pass.as_raw());
    }

    unsafe fn create_framebuffer(
        &self,
        _render_pass: vk::RenderPass,
        view: vk::ImageView,
        _extent: vk::Extent2D,
    ) -> VkResult<vk::Framebuffer> {
        let mut state = self.state.borrow_mut();
        let id = state.create(ResourceKind::Framebuffer)?;
        state.framebuffer_views.insert(id, view);
        Ok(handle(id))
    }

    unsafe fn destroy_framebuffer(&self, framebuffer: vk::Framebuffer) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::Framebuffer, framebuffer.as_raw());
    }

    unsafe fn create_shader_module(&self, _code: &[u32]) -> VkResult<vk::ShaderModule> {
        Ok(handle(self.state.borrow_mut().create(ResourceKind::ShaderModule)?))
    }

    unsafe fn destroy_shader_module(&self, module: vk::ShaderModule) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::ShaderModule, module.as_raw());
    }

    unsafe fn create_pipeline_layout(&self) -> VkResult<vk::PipelineLayout> {
        Ok(handle(self.state.borrow_mut().create(ResourceKind::PipelineLayout)?))
    }

    unsafe fn destroy_pipeline_layout(&self, layout: vk::PipelineLayout) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::PipelineLayout, layout.as_raw());
    }

    unsafe fn create_graphics_pipeline(
        &self,
        config: &PipelineConfig,
        render_pass: vk::RenderPass,
    ) -> VkResult<vk::Pipeline> {
        let mut state = self.state.borrow_mut();
        let id = state.create(ResourceKind::Pipeline)?;
        state.pipelines.insert(id, (config.clone(), render_pass));
        Ok(handle(id))
    }

    unsafe fn destroy_pipeline(&self, pipeline: vk::Pipeline) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::Pipeline, pipeline.as_raw());
    }

    unsafe fn create_command_pool(&self) -> VkResult<vk::CommandPool> {
        Ok(handle(self.state.borrow_mut().create(ResourceKind::CommandPool)?))
    }

    unsafe fn allocate_command_buffer(
        &self,
        _pool: vk::CommandPool,
    ) -> VkResult<vk::CommandBuffer> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::AllocateCommandBuffer);
        let id = state.next_id();
        Ok(vk::CommandBuffer::from_raw(id as usize))
    }

    unsafe fn destroy_command_pool(&self, pool: vk::CommandPool) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::CommandPool, pool.as_raw());
    }

    unsafe fn create_fence(&self, signaled: bool) -> VkResult<vk::Fence> {
        let mut state = self.state.borrow_mut();
        let id = state.create(ResourceKind::Fence)?;
        state.fences.insert(
            id,
            FenceState {
                signaled,
                pending: false,
            },
        );
        Ok(handle(id))
    }

    unsafe fn destroy_fence(&self, fence: vk::Fence) {
        let mut state = self.state.borrow_mut();
        if let Some(f) = state.fences.remove(&fence.as_raw()) {
            assert!(!f.pending, "destroyed fence {} with work pending", fence.as_raw());
        }
        state.destroy(ResourceKind::Fence, fence.as_raw());
    }

    unsafe fn create_semaphore(&self) -> VkResult<vk::Semaphore> {
        Ok(handle(self.state.borrow_mut().create(ResourceKind::Semaphore)?))
    }

    unsafe fn destroy_semaphore(&self, semaphore: vk::Semaphore) {
        self.state
            .borrow_mut()
            .destroy(ResourceKind::Semaphore, semaphore.as_raw());
    }

    unsafe fn wait_for_fence(
        &self,
        fence: vk::Fence,
        _timeout_ns: u64,
    ) -> VkResult<vk::SuccessCode> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::WaitForFence);

        if let Some(code) = state.fence_results.pop_front() {
            return Ok(code);
        }

        let mut fence_state = state.fences.get(&fence.as_raw()).copied().unwrap_or_default();
        if fence_state.pending {
            fence_state = FenceState {
                signaled: true,
                pending: false,
            };
            state.in_flight -= 1;
        }
        state.fences.insert(fence.as_raw(), fence_state);

        // An unsignaled fence with nothing submitted never signals.
        if fence_state.signaled {
            Ok(vk::SuccessCode::SUCCESS)
        } else {
            Ok(vk::SuccessCode::TIMEOUT)
        }
    }

    unsafe fn reset_fence(&self, fence: vk::Fence) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::ResetFence);
        if let Some(f) = state.fences.get_mut(&fence.as_raw()) {
            assert!(!f.pending, "reset fence {} with work pending", fence.as_raw());
            f.signaled = false;
        }
        Ok(())
    }

    unsafe fn acquire_next_image(
        &self,
        _swapchain: vk::SwapchainKHR,
        _timeout_ns: u64,
        _signal: vk::Semaphore,
    ) -> VkSuccessResult<u32> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Acquire);

        if let Some(result) = state.acquire_results.pop_front() {
            return result;
        }

        let index = state.acquire_counter % state.image_count.max(1);
        state.acquire_counter += 1;
        Ok((index, vk::SuccessCode::SUCCESS))
    }

    unsafe fn reset_command_buffer(&self, _command_buffer: vk::CommandBuffer) -> VkResult<()> {
        self.state.borrow_mut().calls.push(Call::ResetCommandBuffer);
        Ok(())
    }

    unsafe fn begin_command_buffer(&self, _command_buffer: vk::CommandBuffer) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::BeginCommandBuffer);
        if state.in_flight > 0 {
            state.recorded_while_in_flight += 1;
        }
        Ok(())
    }

    unsafe fn cmd_begin_render_pass(
        &self,
        _command_buffer: vk::CommandBuffer,
        begin: &RenderPassBegin,
    ) {
        self.state.borrow_mut().calls.push(Call::BeginRenderPass {
            framebuffer: begin.framebuffer,
            clear_color: begin.clear_color,
        });
    }

    unsafe fn cmd_bind_pipeline(&self, _command_buffer: vk::CommandBuffer, pipeline: vk::Pipeline) {
        self.state.borrow_mut().calls.push(Call::BindPipeline(pipeline));
    }

    unsafe fn cmd_draw(&self, _command_buffer: vk::CommandBuffer, vertex_count: u32) {
        self.state.borrow_mut().calls.push(Call::Draw(vertex_count));
    }

    unsafe fn cmd_end_render_pass(&self, _command_buffer: vk::CommandBuffer) {
        self.state.borrow_mut().calls.push(Call::EndRenderPass);
    }

    unsafe fn end_command_buffer(&self, _command_buffer: vk::CommandBuffer) -> VkResult<()> {
        self.state.borrow_mut().calls.push(Call::EndCommandBuffer);
        Ok(())
    }

    unsafe fn queue_submit(&self, submit: &SubmitDesc) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Submit);

        let fence = state.fences.entry(submit.fence.as_raw()).or_default();
        assert!(!fence.signaled, "submitted with a signaled fence");
        fence.pending = true;

        state.submits += 1;
        state.in_flight += 1;
        state.max_in_flight = state.max_in_flight.max(state.in_flight);
        Ok(())
    }

    unsafe fn queue_present(
        &self,
        _swapchain: vk::SwapchainKHR,
        image_index: u32,
        _wait: vk::Semaphore,
    ) -> VkResult<vk::SuccessCode> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::Present(image_index));
        state.presents += 1;
        state
            .present_results
            .pop_front()
            .unwrap_or(Ok(vk::SuccessCode::SUCCESS))
    }

    unsafe fn wait_idle(&self) -> VkResult<()> {
        let mut state = self.state.borrow_mut();
        state.calls.push(Call::WaitIdle);
        for fence in state.fences.values_mut() {
            if fence.pending {
                fence.pending = false;
                fence.signaled = true;
            }
        }
        state.in_flight = 0;
        Ok(())
    }

    unsafe fn destroy_context(&mut self) {
        let mut state = self.state.borrow_mut();
        let context = [
            ResourceKind::Device,
            ResourceKind::Surface,
            ResourceKind::Messenger,
            ResourceKind::Instance,
        ];
        for kind in context {
            let id = state
                .live
                .iter()
                .find(|(_, k)| **k == kind)
                .map(|(id, _)| *id);
            if let Some(id) = id {
                state.destroy(kind, id);
            }
        }
    }
}
