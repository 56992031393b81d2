//! Embedded browser surface hosted inside a [`Window`](crate::Window).
//!
//! Every public method may be called from any thread. Off the main thread
//! the call is marshalled through the owning [`AppHandler`] and the caller
//! blocks until it has run.

mod content;
mod native;
pub mod options;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use deskgui_common::events::WebviewOnMessage;
use deskgui_common::{DeskError, EventBus, Result, ViewRect, ViewSize};
use deskgui_config::WebviewConfig;
use parking_lot::{Mutex, MutexGuard, RwLock};
use tracing::{debug, trace};

use crate::handler::AppHandler;
use crate::ipc;

pub use native::BLANK_URL;
pub use options::{OptionValue, WebviewOptions};

use native::NativeWebview;

/// Host-side handler for messages a page sends through a bound callback.
pub type MessageCallback = Arc<dyn Fn(String) + Send + Sync>;

pub struct Webview {
    name: String,
    handler: Arc<AppHandler>,
    options: WebviewOptions,
    events: EventBus,
    native: Mutex<NativeWebview>,
    callbacks: RwLock<HashMap<String, MessageCallback>>,
    this: Weak<Webview>,
}

impl Webview {
    pub(crate) fn new(
        name: String,
        handler: Arc<AppHandler>,
        bounds: ViewRect,
        options: WebviewOptions,
        config: &WebviewConfig,
    ) -> Arc<Self> {
        let mut native = NativeWebview::new(bounds, config);
        native
            .injected_scripts
            .push(ipc::BRIDGE_INIT_SCRIPT.to_string());

        debug!(webview = %name, ?bounds, options = options.len(), "webview created");
        Arc::new_cyclic(|this| Self {
            name,
            handler,
            options,
            events: EventBus::new(),
            native: Mutex::new(native),
            callbacks: RwLock::new(HashMap::new()),
            this: this.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn options(&self) -> &WebviewOptions {
        &self.options
    }

    /// Listeners for `Webview*` events.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Re-invoke `f` on the main thread against this webview.
    fn marshal<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Webview) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let this = self
            .this
            .upgrade()
            .ok_or_else(|| DeskError::WebviewNotFound(self.name.clone()))?;
        self.handler.run_on_main_thread(move || f(&this))?
    }

    fn native(&self) -> Result<MutexGuard<'_, NativeWebview>> {
        let native = self.native.lock();
        if native.destroyed {
            return Err(DeskError::WebviewNotFound(self.name.clone()));
        }
        Ok(native)
    }

    // =========================================================================
    // SETTINGS
    // =========================================================================

    pub fn enable_dev_tools(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.enable_dev_tools(state));
        }
        self.native()?.dev_tools = state;
        Ok(())
    }

    pub fn is_dev_tools_enabled(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.is_dev_tools_enabled());
        }
        Ok(self.native()?.dev_tools)
    }

    pub fn enable_context_menu(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.enable_context_menu(state));
        }
        self.native()?.context_menu = state;
        Ok(())
    }

    pub fn is_context_menu_enabled(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.is_context_menu_enabled());
        }
        Ok(self.native()?.context_menu)
    }

    pub fn enable_zoom(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.enable_zoom(state));
        }
        self.native()?.zoom = state;
        Ok(())
    }

    pub fn is_zoom_enabled(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.is_zoom_enabled());
        }
        Ok(self.native()?.zoom)
    }

    pub fn enable_accelerator_keys(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.enable_accelerator_keys(state));
        }
        self.native()?.accelerator_keys = state;
        Ok(())
    }

    pub fn are_accelerator_keys_enabled(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.are_accelerator_keys_enabled());
        }
        Ok(self.native()?.accelerator_keys)
    }

    // =========================================================================
    // GEOMETRY
    // =========================================================================

    /// Place the webview at `rect` inside its window.
    pub fn set_position(&self, rect: ViewRect) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.set_position(rect));
        }
        self.native()?.bounds = rect;
        Ok(())
    }

    pub fn position(&self) -> Result<ViewRect> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.position());
        }
        Ok(self.native()?.bounds)
    }

    /// Resize in place, keeping the top-left corner. Edges that would pass
    /// `u32::MAX` stop there.
    pub fn resize(&self, size: ViewSize) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.resize(size));
        }
        let mut native = self.native()?;
        let ViewRect { left, top, .. } = native.bounds;
        native.bounds = ViewRect::new(
            left,
            top,
            left.saturating_add(size.width),
            top.saturating_add(size.height),
        );
        Ok(())
    }

    pub fn size(&self) -> Result<ViewSize> {
        Ok(self.position()?.size())
    }

    pub fn show(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.show(state));
        }
        self.native()?.visible = state;
        Ok(())
    }

    pub fn is_visible(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|webview| webview.is_visible());
        }
        Ok(self.native()?.visible)
    }

    // =========================================================================
    // CALLBACKS
    // =========================================================================

    /// Bind `window.<key>(message)` in the page to `callback`.
    ///
    /// Binding a key that is already bound replaces the previous callback.
    pub fn add_callback<F>(&self, key: impl Into<String>, callback: F) -> Result<()>
    where
        F: Fn(String) + Send + Sync + 'static,
    {
        let key = key.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.add_callback(key, callback));
        }

        let script = ipc::callback_binding_script(&key);
        self.inject_script(script.clone())?;
        self.execute_script(script)?;
        self.callbacks.write().insert(key.clone(), Arc::new(callback));
        debug!(webview = %self.name, callback = %key, "callback bound");
        Ok(())
    }

    /// Unbind `key`. Unknown keys are ignored.
    pub fn remove_callback(&self, key: impl Into<String>) -> Result<()> {
        let key = key.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.remove_callback(key));
        }

        if self.callbacks.write().remove(&key).is_none() {
            return Ok(());
        }
        self.execute_script(ipc::callback_removal_script(&key))?;
        debug!(webview = %self.name, callback = %key, "callback removed");
        Ok(())
    }

    pub fn has_callback(&self, key: &str) -> bool {
        self.callbacks.read().contains_key(key)
    }

    /// Entry point for a message posted by page script.
    ///
    /// Only JSON objects carrying a `name` or a `message` are handled. One
    /// with a `name` is dispatched to the callback bound under that name with
    /// its serialized `message`. Every such object, bound or not, is then
    /// emitted as [`WebviewOnMessage`] with the raw text. Other JSON is
    /// ignored. Text that is not JSON is rejected with
    /// [`DeskError::InvalidMessage`].
    pub fn on_message(&self, raw: impl Into<String>) -> Result<()> {
        let raw = raw.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |webview| webview.on_message(raw));
        }
        drop(self.native()?);

        let envelope =
            ipc::parse_envelope(&raw).map_err(|e| DeskError::InvalidMessage(e.to_string()))?;
        let Some(envelope) = envelope else {
            trace!(webview = %self.name, "message is not a callback envelope, ignored");
            return Ok(());
        };
        if let Some(name) = envelope.name.as_deref() {
            // Cloned out so the callback may bind or unbind callbacks.
            let callback = self.callbacks.read().get(name).cloned();
            match callback {
                Some(callback) => callback(envelope.payload()),
                None => trace!(webview = %self.name, callback = %name, "no callback bound"),
            }
        }

        let mut event = WebviewOnMessage::new(raw);
        self.events.emit(&mut event);
        Ok(())
    }

    /// Release listeners and callbacks and drop the native view.
    /// Later calls fail with [`DeskError::WebviewNotFound`].
    pub(crate) fn teardown(&self) {
        self.events.clear_connections();
        self.callbacks.write().clear();
        self.native.lock().destroyed = true;
        debug!(webview = %self.name, "webview destroyed");
    }
}

impl fmt::Debug for Webview {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Webview")
            .field("name", &self.name)
            .field("options", &self.options)
            .field("callbacks", &self.callbacks.read().len())
            .finish_non_exhaustive()
    }
}
