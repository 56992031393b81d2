//! Message protocol between page script and the host.
//!
//! - **JS -> host**: page code calls `window.webview.postMessage(...)`. When
//!   the payload is a JSON object with a `name` key, the host dispatches its
//!   `message` to the callback registered under that name.
//! - **host -> JS**: the host evaluates script in the page, either to deliver
//!   a message or to install and remove callback bindings.

use serde::Deserialize;
use serde_json::Value;

/// Envelope sent by a bound callback stub: `{"name": ..., "message": ...}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallbackEnvelope {
    pub name: Option<String>,
    #[serde(default)]
    pub message: Value,
}

impl CallbackEnvelope {
    /// Serialized `message` as handed to the callback. A missing message is
    /// `null`.
    pub fn payload(&self) -> String {
        self.message.to_string()
    }
}

/// Parse a raw page message.
///
/// Errors when `raw` is not JSON. Returns `None` for valid JSON that is not
/// a callback envelope (not an object, or carrying neither `name` nor
/// `message`).
pub fn parse_envelope(raw: &str) -> Result<Option<CallbackEnvelope>, serde_json::Error> {
    let value: Value = serde_json::from_str(raw)?;
    let is_envelope = value
        .as_object()
        .is_some_and(|map| map.contains_key("name") || map.contains_key("message"));
    if !is_envelope {
        return Ok(None);
    }
    serde_json::from_value(value).map(Some)
}

/// Encode a string as a JS string literal.
fn js_string(value: &str) -> String {
    // Serializing a &str cannot fail.
    serde_json::to_string(value).unwrap_or_else(|_| String::from("\"\""))
}

/// Script that installs `window.<name>(message)` in the page, forwarding
/// to the host as a callback envelope.
pub fn callback_binding_script(name: &str) -> String {
    let key = js_string(name);
    format!(
        "window[{key}] = function(message) {{ \
         window.webview.postMessage({{ name: {key}, message: message }}); }};"
    )
}

pub fn callback_removal_script(name: &str) -> String {
    format!("delete window[{}];", js_string(name))
}

/// Script that delivers `message` to the page's message listeners.
pub fn post_message_script(message: &str) -> String {
    format!(
        "window.webview && window.webview.dispatch && window.webview.dispatch({});",
        js_string(message)
    )
}

/// Bridge injected into every page before its own scripts run.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    window.webview = window.webview || {};
    window.webview._listeners = [];
    window.webview.postMessage = function(message) {
        var raw = typeof message === 'string' ? message : JSON.stringify(message);
        window.__deskgui_post(raw);
    };
    window.webview.onMessage = function(listener) {
        window.webview._listeners.push(listener);
    };
    window.webview.dispatch = function(message) {
        window.webview._listeners.forEach(function(listener) { listener(message); });
    };
})();
"#;
