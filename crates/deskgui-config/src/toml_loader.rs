//! TOML config file loading and creation.

use crate::schema::DeskguiConfig;
use deskgui_common::ConfigError;
use std::path::{Path, PathBuf};
use tracing::info;

/// Load config from a specific TOML file path.
///
/// Missing fields fall back to serde defaults. Validation is left to the
/// caller so a partially broken file can still be inspected.
pub fn load_from_path(path: &Path) -> Result<DeskguiConfig, ConfigError> {
    if !path.exists() {
        return Err(ConfigError::FileNotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path).map_err(|e| {
        ConfigError::ParseError(format!("failed to read {}: {e}", path.display()))
    })?;

    let config: DeskguiConfig = toml::from_str(&content)
        .map_err(|e| ConfigError::ParseError(format!("failed to parse TOML: {e}")))?;

    info!("loaded config from {}", path.display());
    Ok(config)
}

/// Load config from the platform-specific default path.
///
/// On Linux: `~/.config/deskgui/config.toml`
/// On macOS: `~/Library/Application Support/deskgui/config.toml`
/// On Windows: `%APPDATA%\deskgui\config.toml`
///
/// If the file does not exist, creates a default config file and returns defaults.
pub fn load_default() -> Result<DeskguiConfig, ConfigError> {
    let path = default_config_path()?;

    if !path.exists() {
        info!("no config found at {}, creating default", path.display());
        create_default_config(&path)?;
        return Ok(DeskguiConfig::default());
    }

    load_from_path(&path)
}

/// Get the platform-specific default config file path.
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    let config_dir = dirs::config_dir().ok_or_else(|| {
        ConfigError::ParseError("could not determine config directory".into())
    })?;
    Ok(config_dir.join("deskgui").join("config.toml"))
}

/// Create a default TOML config file with documentation comments.
pub fn create_default_config(path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ConfigError::ParseError(format!(
                "failed to create config directory {}: {e}",
                parent.display()
            ))
        })?;
    }

    std::fs::write(path, DEFAULT_CONFIG_TOML).map_err(|e| {
        ConfigError::ParseError(format!(
            "failed to write default config to {}: {e}",
            path.display()
        ))
    })?;

    info!("created default config at {}", path.display());
    Ok(())
}

const DEFAULT_CONFIG_TOML: &str = r##"# deskgui configuration
# Schema version 1
# Only override what you want to change -- missing fields use defaults.

[app]
# name = "deskgui"

[window]
# title = "deskgui"
# width = 600
# height = 600
# resizable = false
# decorations = true
# resize_throttle_ms = 15   # 0-1000
# background = "#ffffff"

[webview]
# devtools = false
# zoom = true
# context_menu = true
# accelerator_keys = true
# disable_gpu = false
# remote_debugging_port = 9222

[logging]
# level = "info"            # trace, debug, info, warn, error
"##;
