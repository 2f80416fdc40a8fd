//! Log entry structure

use super::log_context::FieldMap;
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};

/// Normalized representation of one log event, independent of any backend
#[derive(Debug, Clone, PartialEq)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub fields: FieldMap,
}

impl LogEntry {
    /// The message is kept verbatim; local renderers escape control
    /// characters when writing lines.
    pub fn new(level: LogLevel, message: impl Into<String>) -> Self {
        Self {
            level,
            message: message.into(),
            timestamp: Utc::now(),
            fields: FieldMap::new(),
        }
    }

    #[must_use]
    pub fn with_fields(mut self, fields: FieldMap) -> Self {
        self.fields = fields;
        self
    }

    #[must_use]
    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }

    /// Nanoseconds since the Unix epoch
    ///
    /// Saturates outside the range representable in an `i64`
    /// (roughly years 1677 to 2262).
    pub fn unix_nanos(&self) -> i64 {
        self.timestamp
            .timestamp_nanos_opt()
            .unwrap_or(if self.timestamp.timestamp() < 0 {
                i64::MIN
            } else {
                i64::MAX
            })
    }
}
