//! Appender trait for local log output destinations

use super::{error::Result, log_entry::LogEntry};

/// Synchronous local sink
///
/// Appenders are shared by every logger derived from the same root, so
/// implementations serialize concurrent writes internally.
pub trait Appender: Send + Sync {
    fn append(&self, entry: &LogEntry) -> Result<()>;
    fn flush(&self) -> Result<()>;
    fn name(&self) -> &str;
}
