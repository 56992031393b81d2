//! deskgui runtime: applications, windows and webviews.
//!
//! An [`App`] owns the main loop and its [`Window`]s; each window owns named
//! [`Webview`]s. All three can be driven from any thread: calls made off
//! the main thread are marshalled through the app's [`AppHandler`] and the
//! caller blocks until the main loop has run them.
//!
//! This crate ships an in-process backend that keeps window and webview
//! state in memory, which is what the demo binary and the tests run against.
//!
//! ```rust,no_run
//! use deskgui_core::App;
//!
//! let app = App::new("hello");
//! let window = app.create_window("main").unwrap();
//! window.set_title("Hello").unwrap();
//! window.show().unwrap();
//! app.run();
//! ```

pub mod app;
pub mod handler;
pub mod ipc;
pub mod queue;
pub mod webview;
pub mod window;

pub use app::App;
pub use handler::{AppHandler, HandlerState};
pub use queue::{MainThreadTask, TaskQueue};
pub use webview::{MessageCallback, OptionValue, Webview, WebviewOptions};
pub use window::Window;

pub use deskgui_common::events;

#[cfg(test)]
mod tests;
