//! In-process stand-in for a platform web view.
//!
//! Holds the state a real engine would own. It is only ever touched on the
//! main thread; [`Webview`](super::Webview) guarantees that by marshalling.

use deskgui_common::ViewRect;
use deskgui_config::WebviewConfig;

pub const BLANK_URL: &str = "about:blank";

#[derive(Debug)]
pub(crate) struct NativeWebview {
    pub url: String,
    pub html: Option<String>,
    pub bounds: ViewRect,
    pub visible: bool,
    pub dev_tools: bool,
    pub context_menu: bool,
    pub zoom: bool,
    pub accelerator_keys: bool,
    pub injected_scripts: Vec<String>,
    pub executed_scripts: Vec<String>,
    pub destroyed: bool,
}

impl NativeWebview {
    pub fn new(bounds: ViewRect, config: &WebviewConfig) -> Self {
        Self {
            url: BLANK_URL.to_string(),
            html: None,
            bounds,
            visible: true,
            dev_tools: config.devtools,
            context_menu: config.context_menu,
            zoom: config.zoom,
            accelerator_keys: config.accelerator_keys,
            injected_scripts: Vec::new(),
            executed_scripts: Vec::new(),
            destroyed: false,
        }
    }
}
