//! # Rust Loki Logger
//!
//! Structured, leveled logging that renders every entry locally and forwards
//! it asynchronously to Grafana Loki.
//!
//! ## Features
//!
//! - **Six Levels**: TRACE and FATAL extend the usual DEBUG..ERROR range
//! - **Derived Loggers**: `with` fields and `with_group` namespaces, copied on derivation
//! - **Non-blocking Delivery**: one background push per entry, never awaited by the caller
//! - **Drain on Shutdown**: wait for in-flight pushes with a bounded timeout
//!
//! ```no_run
//! use rust_loki_logger::prelude::*;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<()> {
//! let client = LokiClient::connect("http://localhost:3100", "checkout").await?;
//! let logger = Logger::builder()
//!     .min_level(LogLevel::Debug)
//!     .remote(Arc::new(client))
//!     .build();
//!
//! logger.with_group("cart").info("item added", &[Field::int("qty", 2)])?;
//! logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).await?;
//! # Ok(())
//! # }
//! ```

pub mod appenders;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{ConsoleAppender, LokiClient};
    pub use crate::core::{
        Appender, DeliveryContext, DeliveryMetrics, Field, FieldMap, FieldValue, Handler,
        LocalHandler, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
        LoggerError, OutputFormat, RemoteClient, RemoteHandler, Result, TimestampFormat,
        DEFAULT_SHUTDOWN_TIMEOUT,
    };
}

pub use appenders::{ConsoleAppender, LokiClient};
pub use core::{
    Appender, DeliveryContext, DeliveryMetrics, Field, FieldMap, FieldValue, Handler,
    LocalHandler, LogContext, LogEntry, LogLevel, Logger, LoggerBuilder, LoggerConfig,
    LoggerError, OutputFormat, RemoteClient, RemoteHandler, Result, TimestampFormat,
    DEFAULT_SHUTDOWN_TIMEOUT,
};
