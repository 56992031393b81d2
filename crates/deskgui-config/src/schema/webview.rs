//! Webview configuration types.

use serde::{Deserialize, Serialize};

/// Settings applied to every webview on creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebviewConfig {
    pub devtools: bool,
    pub zoom: bool,
    pub context_menu: bool,
    pub accelerator_keys: bool,
    pub disable_gpu: bool,
    pub remote_debugging_port: Option<u16>,
}

impl Default for WebviewConfig {
    fn default() -> Self {
        Self {
            devtools: cfg!(debug_assertions),
            zoom: true,
            context_menu: true,
            accelerator_keys: true,
            disable_gpu: false,
            remote_debugging_port: None,
        }
    }
}
