//! Timestamp formatting for locally rendered entries

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Timestamp format options for local output
///
/// Remote pushes always carry Unix nanoseconds regardless of this setting.
///
/// # Examples
///
/// ```
/// use rust_loki_logger::core::TimestampFormat;
/// use chrono::Utc;
///
/// let timestamp = TimestampFormat::Iso8601.format(&Utc::now());
/// assert!(timestamp.ends_with('Z'));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// ISO 8601 with milliseconds: `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// ISO 8601 with microseconds: `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// RFC 3339 with nanoseconds: `2025-01-08T10:30:45.123456789Z`
    Rfc3339Nanos,

    /// Unix timestamp in nanoseconds: `1736332245123456789`
    UnixNanos,

    /// Custom strftime format
    ///
    /// An invalid format string falls back to RFC 3339 with milliseconds.
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::Rfc3339Nanos => datetime.to_rfc3339_opts(SecondsFormat::Nanos, true),
            TimestampFormat::UnixNanos => datetime
                .timestamp_nanos_opt()
                .map(|n| n.to_string())
                .unwrap_or_else(|| datetime.timestamp().to_string()),
            TimestampFormat::Custom(format_str) => {
                let mut out = String::new();
                match write!(out, "{}", datetime.format(format_str)) {
                    Ok(()) => out,
                    // invalid strftime specifiers
                    Err(_) => datetime.to_rfc3339_opts(SecondsFormat::Millis, true),
                }
            }
        }
    }

    #[must_use]
    pub fn is_numeric(&self) -> bool {
        matches!(self, TimestampFormat::UnixNanos)
    }
}
