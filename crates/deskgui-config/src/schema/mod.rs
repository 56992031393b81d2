//! Configuration schema types for deskgui.
//!
//! All structs use `serde(default)` so partial configs work correctly.

mod system;
mod webview;
mod window;

pub use system::*;
pub use webview::*;
pub use window::*;

use serde::{Deserialize, Serialize};

/// Current config schema version.
pub const CONFIG_SCHEMA_VERSION: u32 = 1;

/// Root configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeskguiConfig {
    pub app: AppConfig,
    pub window: WindowConfig,
    pub webview: WebviewConfig,
    pub logging: LoggingConfig,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_gives_defaults() {
        let config: DeskguiConfig = toml::from_str("").unwrap();
        assert_eq!(config.app.name, "deskgui");
        assert_eq!(config.window.title, "deskgui");
        assert!(config.webview.zoom);
        assert_eq!(config.logging.level, LogLevel::Info);
    }

    #[test]
    fn partial_toml_keeps_other_sections() {
        let config: DeskguiConfig = toml::from_str(
            r#"
[app]
name = "notes"

[logging]
level = "debug"
"#,
        )
        .unwrap();
        assert_eq!(config.app.name, "notes");
        assert_eq!(config.logging.level, LogLevel::Debug);
        assert_eq!(config.window.width, 600);
    }

    #[test]
    fn unknown_log_level_is_rejected() {
        let result: Result<DeskguiConfig, _> = toml::from_str("[logging]\nlevel = \"loud\"\n");
        assert!(result.is_err());
    }
}
