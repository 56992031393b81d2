//! Creation-time options for a webview.
//!
//! A small string-keyed map of booleans and integers. Backends read the keys
//! they understand and ignore the rest.

use std::collections::HashMap;

use deskgui_common::{DeskError, Result};
use deskgui_config::WebviewConfig;
use serde::{Deserialize, Serialize};

pub const REMOTE_DEBUGGING_PORT: &str = "remote-debugging-port";
pub const DISABLE_GPU: &str = "disable-gpu";
pub const ALLOW_FILE_ACCESS_FROM_FILES: &str = "allow-file-access-from-files";
pub const ACTIVATE_NATIVE_DRAG_AND_DROP: &str = "activate-native-drag-and-drop";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OptionValue {
    Bool(bool),
    Int(i64),
}

impl From<bool> for OptionValue {
    fn from(value: bool) -> Self {
        OptionValue::Bool(value)
    }
}

impl From<i64> for OptionValue {
    fn from(value: i64) -> Self {
        OptionValue::Int(value)
    }
}

impl From<u16> for OptionValue {
    fn from(value: u16) -> Self {
        OptionValue::Int(i64::from(value))
    }
}

/// Types an option can be read back as.
pub trait FromOptionValue: Sized + Default {
    fn from_option(value: OptionValue) -> Option<Self>;
}

impl FromOptionValue for bool {
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Bool(b) => Some(b),
            OptionValue::Int(_) => None,
        }
    }
}

impl FromOptionValue for i64 {
    fn from_option(value: OptionValue) -> Option<Self> {
        match value {
            OptionValue::Int(n) => Some(n),
            OptionValue::Bool(_) => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WebviewOptions {
    options: HashMap<String, OptionValue>,
}

impl WebviewOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> &mut Self {
        self.options.insert(key.into(), value.into());
        self
    }

    /// Builder form of [`WebviewOptions::set`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.set(key, value);
        self
    }

    pub fn has(&self, key: &str) -> bool {
        self.options.contains_key(key)
    }

    /// Read `key` as `T`. A missing key yields `T::default()`; a value of the
    /// other type is [`DeskError::OptionType`].
    pub fn get<T: FromOptionValue>(&self, key: &str) -> Result<T> {
        match self.options.get(key) {
            None => Ok(T::default()),
            Some(&value) => {
                T::from_option(value).ok_or_else(|| DeskError::OptionType(key.to_string()))
            }
        }
    }

    pub fn len(&self) -> usize {
        self.options.len()
    }

    pub fn is_empty(&self) -> bool {
        self.options.is_empty()
    }
}

impl From<&WebviewConfig> for WebviewOptions {
    fn from(config: &WebviewConfig) -> Self {
        let mut options = WebviewOptions::new();
        if config.disable_gpu {
            options.set(DISABLE_GPU, true);
        }
        if let Some(port) = config.remote_debugging_port {
            options.set(REMOTE_DEBUGGING_PORT, port);
        }
        options
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_key_yields_default() {
        let options = WebviewOptions::new();
        assert!(!options.has(DISABLE_GPU));
        assert!(!options.get::<bool>(DISABLE_GPU).unwrap());
        assert_eq!(options.get::<i64>(REMOTE_DEBUGGING_PORT).unwrap(), 0);
    }

    #[test]
    fn typed_reads() {
        let options = WebviewOptions::new()
            .with(DISABLE_GPU, true)
            .with(REMOTE_DEBUGGING_PORT, 9222_i64);

        assert!(options.get::<bool>(DISABLE_GPU).unwrap());
        assert_eq!(options.get::<i64>(REMOTE_DEBUGGING_PORT).unwrap(), 9222);
        assert_eq!(options.len(), 2);
    }

    #[test]
    fn wrong_type_is_an_error() {
        let options = WebviewOptions::new().with(DISABLE_GPU, true);
        let err = options.get::<i64>(DISABLE_GPU).unwrap_err();
        assert!(matches!(err, DeskError::OptionType(ref key) if key == DISABLE_GPU));
    }

    #[test]
    fn set_overwrites() {
        let mut options = WebviewOptions::new();
        options.set(ALLOW_FILE_ACCESS_FROM_FILES, false);
        options.set(ALLOW_FILE_ACCESS_FROM_FILES, true);
        assert!(options.get::<bool>(ALLOW_FILE_ACCESS_FROM_FILES).unwrap());
        assert_eq!(options.len(), 1);
    }

    #[test]
    fn from_config() {
        let config = WebviewConfig {
            disable_gpu: true,
            remote_debugging_port: Some(9333),
            ..WebviewConfig::default()
        };
        let options = WebviewOptions::from(&config);
        assert!(options.get::<bool>(DISABLE_GPU).unwrap());
        assert_eq!(options.get::<i64>(REMOTE_DEBUGGING_PORT).unwrap(), 9333);
        assert!(!options.has(ACTIVATE_NATIVE_DRAG_AND_DROP));
    }

    #[test]
    fn default_config_sets_nothing() {
        let options = WebviewOptions::from(&WebviewConfig::default());
        assert!(options.is_empty());
    }

    #[test]
    fn json_representation_is_untagged() {
        let options = WebviewOptions::new().with(DISABLE_GPU, true);
        let json = serde_json::to_value(&options).unwrap();
        assert_eq!(json["options"][DISABLE_GPU], serde_json::json!(true));
    }
}
