//! Error types for the logger system

use std::sync::Arc;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, LoggerError>;

/// Callback receiving failures that happen after a log call has returned
///
/// Remote pushes complete in the background, so their errors cannot be
/// returned to the caller. They are handed to this callback instead.
pub type DiagnosticCallback = Arc<dyn Fn(&LoggerError) + Send + Sync>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Remote endpoint unreachable or not ready at construction time
    #[error("Remote endpoint '{url}' is not reachable: {message}")]
    Connectivity { url: String, message: String },

    /// Local render failure
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Entry could not be encoded for the wire
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// Network failure after dispatch
    #[error("Transport error while pushing to '{url}': {message}")]
    Transport { url: String, message: String },

    /// Remote endpoint answered with a status other than 200/204
    #[error("Unexpected status {status} from '{url}', response: {body}")]
    Status { url: String, status: u16, body: String },

    /// Drain deadline elapsed with pushes still in flight
    #[error("Timed out after {waited:?} with {in_flight} pushes still in flight")]
    Timeout { waited: Duration, in_flight: usize },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl LoggerError {
    /// Create a connectivity error
    pub fn connectivity(url: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Connectivity {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create an encoding error
    pub fn encoding(message: impl Into<String>) -> Self {
        LoggerError::Encoding(message.into())
    }

    /// Create a transport error
    pub fn transport(url: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::Transport {
            url: url.into(),
            message: message.into(),
        }
    }

    /// Create a status error; the body is trimmed
    pub fn status(url: impl Into<String>, status: u16, body: &str) -> Self {
        LoggerError::Status {
            url: url.into(),
            status,
            body: body.trim().to_string(),
        }
    }

    /// Create a drain timeout error
    pub fn timeout(waited: Duration, in_flight: usize) -> Self {
        LoggerError::Timeout { waited, in_flight }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        LoggerError::Other(msg.into())
    }
}

impl From<serde_json::Error> for LoggerError {
    fn from(err: serde_json::Error) -> Self {
        LoggerError::Encoding(err.to_string())
    }
}

/// Default diagnostic channel: one line on stderr per failure
pub fn stderr_diagnostics() -> DiagnosticCallback {
    Arc::new(|err: &LoggerError| eprintln!("[LOKI ERROR] {}", err))
}
