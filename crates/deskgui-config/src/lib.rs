//! deskgui configuration.
//!
//! TOML-based configuration for the application shell: window defaults,
//! webview settings and logging. Every section uses serde defaults so a
//! partial file (or none at all) works out of the box.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use deskgui_config::load_config;
//!
//! let config = load_config().expect("failed to load config");
//! println!("{}", config.window.title);
//! ```

pub mod schema;
pub mod toml_loader;
pub mod validation;

pub use schema::{
    AppConfig, DeskguiConfig, LogLevel, LoggingConfig, WebviewConfig, WindowConfig,
    CONFIG_SCHEMA_VERSION,
};

use deskgui_common::ConfigError;
use std::path::Path;

/// Load config from the platform default path, creating it if missing.
pub fn load_config() -> Result<DeskguiConfig, ConfigError> {
    let config = toml_loader::load_default()?;
    validation::validate(&config)?;
    Ok(config)
}

/// Load config from an explicit path and validate it.
pub fn load_config_from(path: &Path) -> Result<DeskguiConfig, ConfigError> {
    let config = toml_loader::load_from_path(path)?;
    validation::validate(&config)?;
    Ok(config)
}

/// Serialize a config to a pretty-printed JSON string.
pub fn config_to_json(config: &DeskguiConfig) -> String {
    serde_json::to_string_pretty(config)
        .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize config: {e}\"}}"))
}
