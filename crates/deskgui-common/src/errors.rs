use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Failure to hand a task to the main thread.
///
/// A task that panics is not reported here: the panic is resumed on the
/// calling thread as if the task had run locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MarshalError {
    #[error("application handler has terminated")]
    Terminated,

    #[error("main thread shut down before running the task")]
    Abandoned,
}

#[derive(Debug, thiserror::Error)]
pub enum DeskError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Marshal(#[from] MarshalError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("window already exists: {0}")]
    WindowExists(String),

    #[error("window not found: {0}")]
    WindowNotFound(String),

    #[error("webview already exists: {0}")]
    WebviewExists(String),

    #[error("webview not found: {0}")]
    WebviewNotFound(String),

    #[error("invalid webview message: {0}")]
    InvalidMessage(String),

    #[error("option '{0}' is not of the requested type")]
    OptionType(String),

    #[error("{0}")]
    Other(String),
}
