//! Logging macros for ergonomic log message formatting.
//!
//! These macros format the message like `format!` and optionally take a
//! bracketed list of fields first. Each expands to a call returning
//! `Result<()>`.
//!
//! # Examples
//!
//! ```
//! use rust_loki_logger::prelude::*;
//! use rust_loki_logger::info;
//!
//! # fn main() -> Result<()> {
//! let logger = Logger::noop();
//!
//! // Basic logging
//! info!(logger, "Server started")?;
//!
//! // With format arguments
//! let port = 8080;
//! info!(logger, "Server listening on port {}", port)?;
//!
//! // With fields
//! info!(logger, [Field::int("port", 8080)], "Listener ready")?;
//! # Ok(())
//! # }
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use rust_loki_logger::prelude::*;
/// # fn main() -> Result<()> {
/// # let logger = Logger::noop();
/// use rust_loki_logger::log;
/// log!(logger, LogLevel::Info, "Simple message")?;
/// log!(logger, LogLevel::Error, [Field::int("code", 500)], "Error code: {}", 500)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, [$($field:expr),* $(,)?], $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[$($field),*])
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+), &[])
    };
}

/// Log a trace-level message.
#[macro_export]
macro_rules! trace {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Trace, $($arg)+)
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_loki_logger::prelude::*;
/// # fn main() -> Result<()> {
/// # let logger = Logger::noop();
/// use rust_loki_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5)?;
/// # Ok(())
/// # }
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message.
///
/// Only the severity differs from `error!`; the process keeps running.
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Fatal, $($arg)+)
    };
}
