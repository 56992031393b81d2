//! Application: owns the main loop and every window.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Weak};

use deskgui_common::{DeskError, Result};
use deskgui_config::DeskguiConfig;
use parking_lot::Mutex;
use tracing::{debug, info, warn};

use crate::handler::{AppHandler, HandlerState};
use crate::window::Window;

pub struct App {
    handler: Arc<AppHandler>,
    config: DeskguiConfig,
    running: AtomicBool,
    windows: Mutex<HashMap<String, Arc<Window>>>,
    this: Weak<App>,
}

impl App {
    /// Create an application on the calling thread with default settings.
    pub fn new(name: impl Into<String>) -> Arc<Self> {
        let mut config = DeskguiConfig::default();
        config.app.name = name.into();
        Self::with_config(config)
    }

    /// Create an application whose windows and webviews start from `config`.
    pub fn with_config(config: DeskguiConfig) -> Arc<Self> {
        let handler = Arc::new(AppHandler::new(config.app.name.clone()));
        info!(app = %config.app.name, "application created");
        Arc::new_cyclic(|this| Self {
            handler,
            config,
            running: AtomicBool::new(false),
            windows: Mutex::new(HashMap::new()),
            this: this.clone(),
        })
    }

    pub fn name(&self) -> &str {
        self.handler.name()
    }

    pub fn handler(&self) -> &Arc<AppHandler> {
        &self.handler
    }

    pub fn config(&self) -> &DeskguiConfig {
        &self.config
    }

    fn marshal<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&App) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let this = self
            .this
            .upgrade()
            .ok_or_else(|| DeskError::Other(format!("application {} dropped", self.name())))?;
        self.handler.run_on_main_thread(move || f(&this))?
    }

    /// Run the main loop on the calling thread until [`App::terminate`].
    ///
    /// The calling thread becomes the main thread. Returns immediately if
    /// the loop is already running or the application has terminated.
    pub fn run(&self) {
        if self.handler.state() == HandlerState::Terminated {
            warn!(app = %self.name(), "run called after terminate");
            return;
        }
        if self.running.swap(true, Ordering::SeqCst) {
            debug!(app = %self.name(), "main loop already running");
            return;
        }

        self.handler.capture_main_thread();
        self.handler.mark_running();
        info!(app = %self.name(), "main loop started");

        while self.running.load(Ordering::SeqCst) {
            self.handler.pump(None);
            if self.handler.state() == HandlerState::Terminated {
                break;
            }
        }
        self.running.store(false, Ordering::SeqCst);
        info!(app = %self.name(), "main loop exited");
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Stop the main loop.
    ///
    /// Remaining windows are destroyed and work still queued for the main
    /// thread is dropped. Terminating twice is a no-op.
    pub fn terminate(&self) -> Result<()> {
        if !self.handler.is_main_thread() {
            return self.marshal(|app| app.terminate());
        }
        if self.handler.state() == HandlerState::Terminated {
            return Ok(());
        }

        self.running.store(false, Ordering::SeqCst);
        let windows: Vec<Arc<Window>> = self.windows.lock().drain().map(|(_, w)| w).collect();
        for window in windows {
            self.handler.window_closed();
            window.teardown();
        }
        self.handler.terminate();
        Ok(())
    }

    // =========================================================================
    // WINDOWS
    // =========================================================================

    pub fn create_window(&self, name: impl Into<String>) -> Result<Arc<Window>> {
        let name = name.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |app| app.create_window(name));
        }

        let mut windows = self.windows.lock();
        if windows.contains_key(&name) {
            return Err(DeskError::WindowExists(name));
        }
        let window = Window::new(
            name.clone(),
            Arc::clone(&self.handler),
            self.this.clone(),
            &self.config.window,
            self.config.webview.clone(),
        );
        windows.insert(name, Arc::clone(&window));
        drop(windows);

        let open = self.handler.window_opened();
        debug!(app = %self.name(), window = %window.name(), open, "window registered");
        Ok(window)
    }

    /// Destroy the named window. When it was the last one, the application
    /// terminates. Unknown names are ignored.
    pub fn destroy_window(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        if !self.handler.is_main_thread() {
            return self.marshal(move |app| app.destroy_window(name));
        }

        let Some(window) = self.windows.lock().remove(&name) else {
            debug!(app = %self.name(), window = %name, "no such window");
            return Ok(());
        };
        let open = self.handler.window_closed();
        window.teardown();
        debug!(app = %self.name(), window = %name, open, "window unregistered");
        if open == 0 {
            info!(app = %self.name(), "last window closed");
            self.terminate()?;
        }
        Ok(())
    }

    pub fn window(&self, name: &str) -> Option<Arc<Window>> {
        self.windows.lock().get(name).cloned()
    }

    /// Names of live windows, sorted.
    pub fn window_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.windows.lock().keys().cloned().collect();
        names.sort();
        names
    }
}

impl fmt::Debug for App {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("App")
            .field("name", &self.name())
            .field("state", &self.handler.state())
            .field("windows", &self.window_names())
            .finish_non_exhaustive()
    }
}
