use std::time::Duration;

use log::*;
use vulkanalia::{vk, VkResult, VkSuccessResult};

use super::backend::{RenderDevice, SubmitDesc};
use super::command_buffer::FrameCommands;
use super::pipeline::PipelineState;
use super::render_pass::RenderTargetLayout;
use super::swapchain::SwapchainState;
use crate::error::{FrameError, InitError, SwapchainError, SyncTimeoutError};

/// The fence and semaphore pair guarding the single frame in flight.
#[derive(Debug)]
pub struct FrameSync {
    pub render_fence: vk::Fence,
    pub image_acquired: vk::Semaphore,
    pub render_finished: vk::Semaphore,
}

impl FrameSync {
    /// The fence starts signaled so the first frame does not wait.
    pub unsafe fn create<D: RenderDevice>(device: &D) -> Result<FrameSync, InitError> {
        let render_fence = device.create_fence(true)?;

        let image_acquired = match device.create_semaphore() {
            Ok(semaphore) => semaphore,
            Err(error) => {
                device.destroy_fence(render_fence);
                return Err(error.into());
            }
        };

        let render_finished = match device.create_semaphore() {
            Ok(semaphore) => semaphore,
            Err(error) => {
                device.destroy_semaphore(image_acquired);
                device.destroy_fence(render_fence);
                return Err(error.into());
            }
        };

        Ok(FrameSync {
            render_fence,
            image_acquired,
            render_finished,
        })
    }

    pub unsafe fn destroy<D: RenderDevice>(self, device: &D) {
        device.destroy_semaphore(self.render_finished);
        device.destroy_semaphore(self.image_acquired);
        device.destroy_fence(self.render_fence);
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameState {
    Idle,
    Acquiring,
    Recording,
    Submitted,
    Presenting,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FrameOutcome {
    /// The image was handed to the presentation engine. `stale` is set when
    /// acquire or present reported the swapchain as suboptimal.
    Presented { image_index: u32, stale: bool },
    /// The frame was submitted but present reported the swapchain out of
    /// date, so the image never reached the screen.
    Dropped { image_index: u32 },
    /// Acquire reported the swapchain out of date; nothing was submitted.
    OutOfDate,
}

/// Splits an acquire result into the image index and whether the swapchain
/// is suboptimal.
pub fn acquired_image(result: VkSuccessResult<u32>) -> Result<(u32, bool), SwapchainError> {
    match result {
        Ok((index, vk::SuccessCode::SUBOPTIMAL_KHR)) => Ok((index, true)),
        Ok((_, vk::SuccessCode::TIMEOUT | vk::SuccessCode::NOT_READY)) => {
            Err(SwapchainError::Timeout)
        }
        Ok((index, _)) => Ok((index, false)),
        Err(vk::ErrorCode::OUT_OF_DATE_KHR) => Err(SwapchainError::OutOfDate),
        Err(error) => Err(SwapchainError::Vulkan(error)),
    }
}

/// Returns whether a successful present reported the swapchain suboptimal.
pub fn presented_image(result: VkResult<vk::SuccessCode>) -> Result<bool, SwapchainError> {
    match result {
        Ok(vk::SuccessCode::SUBOPTIMAL_KHR) => Ok(true),
        Ok(_) => Ok(false),
        Err(vk::ErrorCode::OUT_OF_DATE_KHR) => Err(SwapchainError::OutOfDate),
        Err(error) => Err(SwapchainError::Vulkan(error)),
    }
}

/// Drives acquire, record, submit and present with one frame in flight.
#[derive(Debug)]
pub struct FrameSubmitter {
    commands: FrameCommands,
    sync: FrameSync,
    timeout: Duration,
    state: FrameState,
}

impl FrameSubmitter {
    pub unsafe fn create<D: RenderDevice>(
        device: &D,
        timeout: Duration,
    ) -> Result<FrameSubmitter, InitError> {
        let commands = FrameCommands::create(device)?;

        let sync = match FrameSync::create(device) {
            Ok(sync) => sync,
            Err(error) => {
                commands.destroy(device);
                return Err(error);
            }
        };

        Ok(FrameSubmitter {
            commands,
            sync,
            timeout,
            state: FrameState::Idle,
        })
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    pub unsafe fn draw<D: RenderDevice>(
        &mut self,
        device: &D,
        swapchain: &SwapchainState,
        target: &RenderTargetLayout,
        pipeline: &PipelineState,
        clear_color: [f32; 4],
    ) -> Result<FrameOutcome, FrameError> {
        let result = self.step(device, swapchain, target, pipeline, clear_color);
        self.transition(FrameState::Idle);
        result
    }

    unsafe fn step<D: RenderDevice>(
        &mut self,
        device: &D,
        swapchain: &SwapchainState,
        target: &RenderTargetLayout,
        pipeline: &PipelineState,
        clear_color: [f32; 4],
    ) -> Result<FrameOutcome, FrameError> {
        let timeout_ns = u64::try_from(self.timeout.as_nanos()).unwrap_or(u64::MAX);

        // Wait
        if device.wait_for_fence(self.sync.render_fence, timeout_ns)? == vk::SuccessCode::TIMEOUT {
            return Err(SyncTimeoutError {
                timeout: self.timeout,
            }
            .into());
        }

        // Acquire
        self.transition(FrameState::Acquiring);
        let acquired = device.acquire_next_image(
            swapchain.swapchain,
            timeout_ns,
            self.sync.image_acquired,
        );
        let (image_index, acquire_stale) = match acquired_image(acquired) {
            Ok(acquired) => acquired,
            Err(SwapchainError::OutOfDate) => {
                debug!("Swapchain out of date on acquire.");
                return Ok(FrameOutcome::OutOfDate);
            }
            Err(error) => return Err(error.into()),
        };

        // The fence is only reset once a submission that signals it is certain.
        device.reset_fence(self.sync.render_fence)?;

        // Record
        self.transition(FrameState::Recording);
        self.commands.record(
            device,
            target,
            image_index as usize,
            pipeline.pipeline,
            clear_color,
        )?;

        // Submit
        let submit = SubmitDesc {
            command_buffer: self.commands.buffer,
            wait_semaphore: self.sync.image_acquired,
            wait_stage: vk::PipelineStageFlags::COLOR_ATTACHMENT_OUTPUT,
            signal_semaphore: self.sync.render_finished,
            fence: self.sync.render_fence,
        };
        device.queue_submit(&submit)?;
        self.transition(FrameState::Submitted);

        // Present
        self.transition(FrameState::Presenting);
        let presented =
            device.queue_present(swapchain.swapchain, image_index, self.sync.render_finished);
        let present_stale = match presented_image(presented) {
            Ok(stale) => stale,
            Err(SwapchainError::OutOfDate) => {
                debug!("Swapchain out of date on present.");
                return Ok(FrameOutcome::Dropped { image_index });
            }
            Err(error) => return Err(error.into()),
        };

        Ok(FrameOutcome::Presented {
            image_index,
            stale: acquire_stale || present_stale,
        })
    }

    fn transition(&mut self, next: FrameState) {
        trace!("Frame state {:?} -> {:?}.", self.state, next);
        self.state = next;
    }

    pub unsafe fn destroy<D: RenderDevice>(self, device: &D) {
        self.sync.destroy(device);
        self.commands.destroy(device);
    }
}
