//! Window configuration types.

use deskgui_common::{Color, ViewSize, DEFAULT_WINDOW_RECT};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Defaults applied to every window the application creates.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub resizable: bool,
    pub decorations: bool,
    /// Minimum spacing between resize events in milliseconds (valid range: 0-1000).
    pub resize_throttle_ms: u64,
    /// Background color as `#rrggbb`.
    pub background: Option<String>,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "deskgui".into(),
            width: DEFAULT_WINDOW_RECT.width(),
            height: DEFAULT_WINDOW_RECT.height(),
            resizable: false,
            decorations: true,
            resize_throttle_ms: 15,
            background: None,
        }
    }
}

impl WindowConfig {
    pub fn size(&self) -> ViewSize {
        ViewSize::new(self.width, self.height)
    }

    pub fn resize_throttle(&self) -> Duration {
        Duration::from_millis(self.resize_throttle_ms)
    }

    /// Parsed background color; `None` when unset or malformed.
    pub fn background_color(&self) -> Option<Color> {
        self.background.as_deref().and_then(Color::from_hex)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_config_defaults() {
        let config = WindowConfig::default();
        assert_eq!(config.title, "deskgui");
        assert_eq!(config.size(), ViewSize::new(600, 600));
        assert!(!config.resizable);
        assert!(config.decorations);
        assert_eq!(config.resize_throttle(), Duration::from_millis(15));
        assert!(config.background_color().is_none());
    }

    #[test]
    fn window_config_partial_toml() {
        let config: WindowConfig = toml::from_str(
            r##"
title = "Editor"
width = 1024
background = "#102030"
"##,
        )
        .unwrap();
        assert_eq!(config.title, "Editor");
        assert_eq!(config.size(), ViewSize::new(1024, 600));
        assert_eq!(config.background_color(), Some(Color::from_rgb(16, 32, 48)));
        // Defaults preserved
        assert!(config.decorations);
        assert_eq!(config.resize_throttle_ms, 15);
    }
}
