//! Configuration validation.
//!
//! Collects every violation before failing so the user sees them all at once.

use crate::schema::DeskguiConfig;
use deskgui_common::ConfigError;

/// Run all validations on a config, collecting all errors.
pub fn validate(config: &DeskguiConfig) -> Result<(), ConfigError> {
    let mut errors: Vec<String> = Vec::new();

    if config.app.name.trim().is_empty() {
        errors.push("app.name must not be empty".into());
    }

    validate_range(&mut errors, "window.width", config.window.width, 1, 16384);
    validate_range(&mut errors, "window.height", config.window.height, 1, 16384);
    validate_range(
        &mut errors,
        "window.resize_throttle_ms",
        config.window.resize_throttle_ms,
        0,
        1000,
    );

    if let Some(ref background) = config.window.background {
        if config.window.background_color().is_none() {
            errors.push(format!(
                "window.background = {background:?} is not a #rrggbb color"
            ));
        }
    }

    if config.webview.remote_debugging_port == Some(0) {
        errors.push("webview.remote_debugging_port must not be 0".into());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::ValidationError(errors.join("; ")))
    }
}

fn validate_range<T>(errors: &mut Vec<String>, name: &str, value: T, min: T, max: T)
where
    T: PartialOrd + std::fmt::Display,
{
    if value < min || value > max {
        errors.push(format!("{name} = {value} is out of range [{min}, {max}]"));
    }
}
