//! Event kinds emitted by windows and webviews.
//!
//! Each kind is its own type; the [`EventBus`](crate::EventBus) dispatches on
//! that type, so a listener for [`WindowResize`] never sees a [`WindowClose`].
//! Events are deliberately not `Clone`: one instance lives on the emitter's
//! stack and is lent to every listener in turn.

use crate::types::ViewSize;

/// Cancellation record embedded in every event kind.
#[derive(Debug, Default)]
pub struct Cancellation {
    cancellable: bool,
    cancelled: bool,
}

impl Cancellation {
    pub const fn new(cancellable: bool) -> Self {
        Self {
            cancellable,
            cancelled: false,
        }
    }

    /// Marks the event as cancelled. No-op when the event is not cancellable.
    pub fn prevent_default(&mut self) {
        if self.cancellable {
            self.cancelled = true;
        }
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }

    pub fn is_cancellable(&self) -> bool {
        self.cancellable
    }
}

/// Something that happened, or is about to happen, on a window or webview.
///
/// Cancellation is cooperative: listeners call [`Event::prevent_default`] and
/// the emitting call site checks [`Event::is_cancelled`] once `emit` returns.
pub trait Event: 'static {
    fn cancellation(&self) -> &Cancellation;

    fn cancellation_mut(&mut self) -> &mut Cancellation;

    fn prevent_default(&mut self) {
        self.cancellation_mut().prevent_default();
    }

    fn is_cancelled(&self) -> bool {
        self.cancellation().is_cancelled()
    }

    fn is_cancellable(&self) -> bool {
        self.cancellation().is_cancellable()
    }
}

macro_rules! impl_event {
    ($($kind:ty),+ $(,)?) => {
        $(
            impl Event for $kind {
                fn cancellation(&self) -> &Cancellation {
                    &self.cancellation
                }

                fn cancellation_mut(&mut self) -> &mut Cancellation {
                    &mut self.cancellation
                }
            }
        )+
    };
}

#[cfg(test)]
pub(crate) use impl_event;

// =============================================================================
// WINDOW EVENTS
// =============================================================================

/// Window visibility changed. `state` is true when shown.
#[derive(Debug)]
pub struct WindowShow {
    cancellation: Cancellation,
    state: bool,
}

impl WindowShow {
    pub fn new(state: bool) -> Self {
        Self {
            cancellation: Cancellation::new(true),
            state,
        }
    }

    pub fn state(&self) -> bool {
        self.state
    }
}

/// Window was resized to `size`.
#[derive(Debug)]
pub struct WindowResize {
    cancellation: Cancellation,
    size: ViewSize,
}

impl WindowResize {
    pub fn new(size: ViewSize) -> Self {
        Self {
            cancellation: Cancellation::new(true),
            size,
        }
    }

    pub fn size(&self) -> ViewSize {
        self.size
    }
}

/// The user asked to close the window. Cancel to keep it open.
#[derive(Debug)]
pub struct WindowClose {
    cancellation: Cancellation,
}

impl WindowClose {
    pub fn new() -> Self {
        Self {
            cancellation: Cancellation::new(true),
        }
    }
}

impl Default for WindowClose {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// WEBVIEW EVENTS
// =============================================================================

/// Raw message posted from page script.
#[derive(Debug)]
pub struct WebviewOnMessage {
    cancellation: Cancellation,
    message: String,
}

impl WebviewOnMessage {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            cancellation: Cancellation::new(true),
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

/// Top-level navigation is about to start. Cancel to block it.
#[derive(Debug)]
pub struct WebviewNavigationStarting {
    cancellation: Cancellation,
    url: String,
}

impl WebviewNavigationStarting {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            cancellation: Cancellation::new(true),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// A sub-frame navigation is about to start. Cancel to block it.
#[derive(Debug)]
pub struct WebviewFrameNavigationStarting {
    cancellation: Cancellation,
    url: String,
}

impl WebviewFrameNavigationStarting {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            cancellation: Cancellation::new(true),
            url: url.into(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

/// The committed source URL changed.
#[derive(Debug)]
pub struct WebviewSourceChanged {
    cancellation: Cancellation,
    source: String,
}

impl WebviewSourceChanged {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            cancellation: Cancellation::new(false),
            source: source.into(),
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }
}

/// Page content finished (or restarted) loading.
#[derive(Debug)]
pub struct WebviewContentLoaded {
    cancellation: Cancellation,
    state: bool,
}

impl WebviewContentLoaded {
    pub fn new(state: bool) -> Self {
        Self {
            cancellation: Cancellation::new(false),
            state,
        }
    }

    pub fn state(&self) -> bool {
        self.state
    }
}

impl_event!(
    WindowShow,
    WindowResize,
    WindowClose,
    WebviewOnMessage,
    WebviewNavigationStarting,
    WebviewFrameNavigationStarting,
    WebviewSourceChanged,
    WebviewContentLoaded,
);
