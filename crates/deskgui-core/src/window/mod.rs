//! Top-level native window owning a set of named webviews.
//!
//! Like [`Webview`], every public method may be called from any thread and
//! is marshalled onto the main thread when needed. `request_close`,
//! `notify_resized` and `notify_shown` are the entry points the platform
//! side calls when the user acts on the window.

mod native;
mod style;

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Weak};

use deskgui_common::events::{WindowClose, WindowResize, WindowShow};
use deskgui_common::{DeskError, Event, EventBus, Result, Throttle, ViewRect, ViewSize};
use deskgui_config::{WebviewConfig, WindowConfig};
use parking_lot::{Mutex, MutexGuard};
use tracing::{debug, info, trace};

use crate::app::App;
use crate::handler::AppHandler;
use crate::webview::{Webview, WebviewOptions};

pub use native::SCREEN_SIZE;

use native::NativeWindow;

pub struct Window {
    name: String,
    handler: Arc<AppHandler>,
    app: Weak<App>,
    webview_config: WebviewConfig,
    events: EventBus,
    native: Mutex<NativeWindow>,
    resize_throttle: Mutex<Throttle>,
    webviews: Mutex<HashMap<String, Arc<Webview>>>,
    this: Weak<Window>,
}

impl Window {
    pub(crate) fn new(
        name: String,
        handler: Arc<AppHandler>,
        app: Weak<App>,
        config: &WindowConfig,
        webview_config: WebviewConfig,
    ) -> Arc<Self> {
        debug!(window = %name, size = %config.size(), "window created");
        Arc::new_cyclic(|this| Self {
            name,
            handler,
            app,
            webview_config,
            events: EventBus::new(),
            native: Mutex::new(NativeWindow::new(config)),
            resize_throttle: Mutex::new(Throttle::new(config.resize_throttle())),
            webviews: Mutex::new(HashMap::new()),
            this: this.clone(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Listeners for `Window*` events.
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    fn marshal<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Window) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let this = self
            .this
            .upgrade()
            .ok_or_else(|| DeskError::WindowNotFound(self.name.clone()))?;
        self.handler.run_on_main_thread(move || f(&this))?
    }

    fn native(&self) -> Result<MutexGuard<'_, NativeWindow>> {
        let native = self.native.lock();
        if native.destroyed {
            return Err(DeskError::WindowNotFound(self.name.clone()));
        }
        Ok(native)
    }

    // =========================================================================
    // WEBVIEWS
    // =========================================================================

    /// Create a webview filling the window's client area.
    pub fn create_webview(
        &self,
        name: impl Into<String>,
        options: WebviewOptions,
    ) -> Result<Arc<Webview>> {
        let name = name.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.create_webview(name, options));
        }

        let size = self.native()?.size;
        let mut webviews = self.webviews.lock();
        if webviews.contains_key(&name) {
            return Err(DeskError::WebviewExists(name));
        }
        let webview = Webview::new(
            name.clone(),
            Arc::clone(&self.handler),
            ViewRect::new(0, 0, size.width, size.height),
            options,
            &self.webview_config,
        );
        webviews.insert(name, Arc::clone(&webview));
        Ok(webview)
    }

    /// Destroy the named webview. Unknown names are ignored.
    pub fn destroy_webview(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.destroy_webview(name));
        }

        let removed = self.webviews.lock().remove(&name);
        match removed {
            Some(webview) => webview.teardown(),
            None => debug!(window = %self.name, webview = %name, "no such webview"),
        }
        Ok(())
    }

    pub fn webview(&self, name: &str) -> Option<Arc<Webview>> {
        self.webviews.lock().get(name).cloned()
    }

    /// Names of live webviews, sorted.
    pub fn webview_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.webviews.lock().keys().cloned().collect();
        names.sort();
        names
    }

    // =========================================================================
    // NATIVE ENTRY POINTS
    // =========================================================================

    /// The user asked to close the window.
    ///
    /// Emits [`WindowClose`]. Unless a listener cancels it, the window is
    /// destroyed through its application, which terminates once no windows
    /// remain. Returns whether the window closed.
    pub fn request_close(&self) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(|window| window.request_close());
        }
        drop(self.native()?);

        let mut event = WindowClose::new();
        self.events.emit(&mut event);
        if event.is_cancelled() {
            info!(window = %self.name, "close cancelled by listener");
            return Ok(false);
        }

        match self.app.upgrade() {
            Some(app) => app.destroy_window(self.name.clone())?,
            None => self.teardown(),
        }
        Ok(true)
    }

    /// The window was resized to `size` by the platform.
    ///
    /// The new size always applies. [`WindowResize`] is emitted at most once
    /// per throttle period; notifications inside the period are dropped.
    /// Returns whether an event was emitted.
    pub fn notify_resized(&self, size: ViewSize) -> Result<bool> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.notify_resized(size));
        }

        let size = self.native()?.apply_size(size);
        if !self.resize_throttle.lock().ready() {
            trace!(window = %self.name, %size, "resize notification throttled");
            return Ok(false);
        }
        self.events.emit(&mut WindowResize::new(size));
        Ok(true)
    }

    /// The window was shown (`true`) or hidden (`false`).
    pub fn notify_shown(&self, state: bool) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(move |window| window.notify_shown(state));
        }
        self.native()?.visible = state;
        self.events.emit(&mut WindowShow::new(state));
        Ok(())
    }

    /// Release listeners, destroy every webview, then drop the native
    /// window. Later calls fail with [`DeskError::WindowNotFound`].
    pub(crate) fn teardown(&self) {
        self.events.clear_connections();
        let webviews: Vec<Arc<Webview>> = self.webviews.lock().drain().map(|(_, w)| w).collect();
        for webview in webviews {
            webview.teardown();
        }
        self.native.lock().destroyed = true;
        debug!(window = %self.name, "window destroyed");
    }

    pub fn is_destroyed(&self) -> bool {
        self.native.lock().destroyed
    }
}

impl fmt::Debug for Window {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Window")
            .field("name", &self.name)
            .field("webviews", &self.webview_names())
            .field("events", &self.events)
            .finish_non_exhaustive()
    }
}
