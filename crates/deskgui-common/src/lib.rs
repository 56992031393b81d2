//! Shared building blocks for deskgui.
//!
//! Holds the pieces every platform backend relies on regardless of OS:
//! - Typed, cancellable events and the per-object [`EventBus`]
//! - Process-wide unique ids for listener registrations
//! - View geometry value types
//! - The lossy [`Throttle`] used to rate-limit resize notifications
//! - The error taxonomy shared by the workspace

pub mod errors;
pub mod event_bus;
pub mod events;
pub mod id;
pub mod throttle;
pub mod types;

pub use errors::{ConfigError, DeskError, MarshalError};
pub use event_bus::EventBus;
pub use events::{Cancellation, Event};
pub use id::UniqueId;
pub use throttle::{Throttle, RESIZE_THROTTLE};
pub use types::{Color, ViewRect, ViewSize, DEFAULT_WINDOW_RECT};

pub type Result<T> = std::result::Result<T, DeskError>;
