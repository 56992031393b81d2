//! In-process stand-in for a platform top-level window.

use deskgui_common::{Color, ViewSize};
use deskgui_config::WindowConfig;

/// Work area the headless backend centers windows in.
pub const SCREEN_SIZE: ViewSize = ViewSize::new(1920, 1080);

#[derive(Debug)]
pub(crate) struct NativeWindow {
    pub title: String,
    pub left: u32,
    pub top: u32,
    pub size: ViewSize,
    pub min_size: Option<ViewSize>,
    pub max_size: Option<ViewSize>,
    pub resizable: bool,
    pub decorations: bool,
    pub visible: bool,
    pub enabled: bool,
    pub background: Option<Color>,
    pub scale_factor: f64,
    pub destroyed: bool,
}

impl NativeWindow {
    pub fn new(config: &WindowConfig) -> Self {
        Self {
            title: config.title.clone(),
            left: 0,
            top: 0,
            size: config.size(),
            min_size: None,
            max_size: None,
            resizable: config.resizable,
            decorations: config.decorations,
            visible: false,
            enabled: true,
            background: config.background_color(),
            scale_factor: 1.0,
            destroyed: false,
        }
    }

    /// Apply a size, honoring the min/max hints.
    pub fn apply_size(&mut self, size: ViewSize) -> ViewSize {
        self.size = size.clamp(self.min_size, self.max_size);
        self.size
    }
}
