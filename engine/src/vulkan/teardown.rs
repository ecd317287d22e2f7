use log::*;

use super::backend::RenderDevice;
use super::sync::FrameSubmitter;
use super::SurfaceResources;

/// Destroys everything the renderer owns once the device is idle, in exact
/// reverse order of creation: sync objects, command pool, pipeline, render
/// target, swapchain, then the device context itself.
pub unsafe fn teardown<D: RenderDevice>(
    device: &mut D,
    frames: FrameSubmitter,
    resources: Option<SurfaceResources>,
) {
    info!("Tearing down renderer.");

    if let Err(error) = device.wait_idle() {
        warn!("Device did not go idle before teardown: {}", error);
    }

    frames.destroy(&*device);

    if let Some(resources) = resources {
        resources.destroy(&*device);
    }

    device.destroy_context();

    info!("Teardown complete.");
}
