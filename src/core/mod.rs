//! Core logger types and traits

pub mod appender;
pub mod config;
pub mod error;
pub mod handler;
pub mod in_flight;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod remote;
pub mod timestamp;

pub use appender::Appender;
pub use config::LoggerConfig;
pub use error::{DiagnosticCallback, LoggerError, Result};
pub use handler::{Handler, LocalHandler, NoopHandler, RemoteHandler};
pub use in_flight::{InFlight, InFlightGuard};
pub use log_context::{Field, FieldMap, FieldValue, LogContext};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder, DEFAULT_SHUTDOWN_TIMEOUT};
pub use metrics::DeliveryMetrics;
pub use output_format::OutputFormat;
pub use remote::{DeliveryContext, RemoteClient};
pub use timestamp::TimestampFormat;
