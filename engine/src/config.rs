use std::env;
use std::path::PathBuf;
use std::time::Duration;

use log::*;

use crate::vulkan::constants;

/// Environment variable overriding [`EngineConfig::validation`].
pub const VALIDATION_ENV: &str = "EMBER_VALIDATION";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineConfig {
    pub app_name: String,
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub validation: bool,
    pub vertex_shader: PathBuf,
    pub fragment_shader: PathBuf,
    pub frame_timeout: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            app_name: "Ember".to_string(),
            title: "Ember Engine".to_string(),
            width: 1080,
            height: 720,
            validation: cfg!(debug_assertions),
            vertex_shader: PathBuf::from("shaders/vert.spv"),
            fragment_shader: PathBuf::from("shaders/frag.spv"),
            frame_timeout: constants::FRAME_TIMEOUT,
        }
    }
}

impl EngineConfig {
    /// Defaults, with validation taken from `EMBER_VALIDATION` when set.
    pub fn from_env() -> Self {
        let config = Self::default();
        match env::var(VALIDATION_ENV) {
            Ok(value) => match parse_flag(&value) {
                Some(validation) => config.with_validation(validation),
                None => {
                    warn!("Ignoring {}={:?}, expected 0 or 1.", VALIDATION_ENV, value);
                    config
                }
            },
            Err(_) => config,
        }
    }

    pub fn with_app_name(mut self, app_name: impl Into<String>) -> Self {
        self.app_name = app_name.into();
        self
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_size(mut self, width: u32, height: u32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_validation(mut self, validation: bool) -> Self {
        self.validation = validation;
        self
    }

    pub fn with_shaders(
        mut self,
        vertex: impl Into<PathBuf>,
        fragment: impl Into<PathBuf>,
    ) -> Self {
        self.vertex_shader = vertex.into();
        self.fragment_shader = fragment.into();
        self
    }

    pub fn with_frame_timeout(mut self, frame_timeout: Duration) -> Self {
        self.frame_timeout = frame_timeout;
        self
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" => Some(false),
        _ => None,
    }
}
