use log::*;
use std::collections::HashSet;
use std::ffi::{CStr, CString};
use std::os::raw::c_void;
use vulkanalia::prelude::v1_0::*;
use vulkanalia::vk::ExtDebugUtilsExtension;
use vulkanalia::window as vk_window;
use winit::window::Window;

use super::constants;
use crate::error::InitError;

/// The instance together with its optional validation messenger.
pub struct InstanceParts {
    pub instance: Instance,
    pub messenger: Option<vk::DebugUtilsMessengerEXT>,
}

pub unsafe fn create_instance(
    window: &Window,
    entry: &Entry,
    app_name: &str,
    validation: bool,
) -> Result<InstanceParts, InitError> {
    let app_name = CString::new(app_name).unwrap_or_default();

    // Application Info
    let application_info = vk::ApplicationInfo::builder()
        .application_name(app_name.as_bytes_with_nul())
        .application_version(vk::make_version(0, 1, 0))
        .engine_name(b"Ember\0")
        .engine_version(vk::make_version(0, 1, 0))
        .api_version(vk::make_version(1, 1, 0));

    // Layers
    let available_layers = entry
        .enumerate_instance_layer_properties()?
        .iter()
        .map(|l| l.layer_name)
        .collect::<HashSet<_>>();

    let layers = if validation {
        vec![constants::VALIDATION_LAYER.as_ptr()]
    } else {
        Vec::new()
    };

    // Extensions
    let mut required = vk_window::get_required_instance_extensions(window).to_vec();

    // Required by Vulkan SDK on macOS since 1.3.216.
    let portability =
        cfg!(target_os = "macos") && entry.version()? >= constants::PORTABILITY_MACOS_VERSION;
    let flags = if portability {
        info!("Enabling extensions for macOS portability.");
        required.push(&vk::KHR_GET_PHYSICAL_DEVICE_PROPERTIES2_EXTENSION.name);
        required.push(&vk::KHR_PORTABILITY_ENUMERATION_EXTENSION.name);
        vk::InstanceCreateFlags::ENUMERATE_PORTABILITY_KHR
    } else {
        vk::InstanceCreateFlags::empty()
    };

    let available_extensions = entry
        .enumerate_instance_extension_properties(None)?
        .iter()
        .map(|e| e.extension_name)
        .collect::<HashSet<_>>();

    check_instance_support(&available_layers, &available_extensions, &required, validation)?;

    if validation {
        required.push(&vk::EXT_DEBUG_UTILS_EXTENSION.name);
    }

    let extensions = required.iter().map(|e| e.as_ptr()).collect::<Vec<_>>();

    // Create
    let mut info = vk::InstanceCreateInfo::builder()
        .application_info(&application_info)
        .enabled_layer_names(&layers)
        .enabled_extension_names(&extensions)
        .flags(flags);

    let mut debug_info = vk::DebugUtilsMessengerCreateInfoEXT::builder()
        .message_severity(vk::DebugUtilsMessageSeverityFlagsEXT::all())
        .message_type(
            vk::DebugUtilsMessageTypeFlagsEXT::GENERAL
                | vk::DebugUtilsMessageTypeFlagsEXT::VALIDATION
                | vk::DebugUtilsMessageTypeFlagsEXT::PERFORMANCE,
        )
        .user_callback(Some(debug_callback));

    if validation {
        info = info.push_next(&mut debug_info);
    }

    let instance = entry.create_instance(&info, None)?;
    debug!("Created instance.");

    // Messenger
    let messenger = if validation {
        match instance.create_debug_utils_messenger_ext(&debug_info, None) {
            Ok(messenger) => Some(messenger),
            Err(error) => {
                instance.destroy_instance(None);
                return Err(error.into());
            }
        }
    } else {
        None
    };

    Ok(InstanceParts {
        instance,
        messenger,
    })
}

/// Checks that every `required` instance extension is available. With
/// `validation` on, the validation layer and debug-utils extension must be
/// available too.
pub fn check_instance_support(
    available_layers: &HashSet<vk::ExtensionName>,
    available_extensions: &HashSet<vk::ExtensionName>,
    required: &[&vk::ExtensionName],
    validation: bool,
) -> Result<(), InitError> {
    if validation && !available_layers.contains(&constants::VALIDATION_LAYER) {
        return Err(InitError::MissingLayer(constants::VALIDATION_LAYER.to_string()));
    }

    let debug_utils = validation.then_some(&vk::EXT_DEBUG_UTILS_EXTENSION.name);
    match required
        .iter()
        .copied()
        .chain(debug_utils)
        .find(|e| !available_extensions.contains(*e))
    {
        Some(missing) => Err(InitError::MissingExtension(missing.to_string())),
        None => Ok(()),
    }
}

/// Logs driver and validation messages. Never aborts the triggering call.
extern "system" fn debug_callback(
    severity: vk::DebugUtilsMessageSeverityFlagsEXT,
    type_: vk::DebugUtilsMessageTypeFlagsEXT,
    data: *const vk::DebugUtilsMessengerCallbackDataEXT,
    _: *mut c_void,
) -> vk::Bool32 {
    let data = unsafe { *data };
    let message = unsafe { CStr::from_ptr(data.message) }.to_string_lossy();

    if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::ERROR {
        error!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::WARNING {
        warn!("({:?}) {}", type_, message);
    } else if severity >= vk::DebugUtilsMessageSeverityFlagsEXT::INFO {
        debug!("({:?}) {}", type_, message);
    } else {
        trace!("({:?}) {}", type_, message);
    }

    vk::FALSE
}
