//! Output format configuration for log entries
//!
//! Provides different output formats for local rendering:
//! - Text: Human-readable format (default)
//! - Json: Machine-readable JSON format
//! - Logfmt: Key-value format compatible with log aggregation tools

use super::error::Result;
use super::log_context::FieldValue;
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Output format for log entries
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable text format (default)
    ///
    /// Example: `[2025-01-08T10:30:45.123Z] [INFO ] Request processed status=200`
    #[default]
    Text,

    /// JSON format for machine processing
    ///
    /// Example: `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","message":"Request processed"}`
    Json,

    /// Logfmt format (key=value pairs)
    ///
    /// Example: `timestamp=2025-01-08T10:30:45.123Z level=INFO message="Request processed"`
    Logfmt,
}

impl OutputFormat {
    /// Format a log entry according to this output format
    ///
    /// # Errors
    ///
    /// JSON output fails on field values JSON cannot represent.
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
        match self {
            OutputFormat::Text => Ok(self.format_text(entry, timestamp_format)),
            OutputFormat::Json => self.format_json(entry, timestamp_format),
            OutputFormat::Logfmt => Ok(self.format_logfmt(entry, timestamp_format)),
        }
    }

    fn format_text(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let base = format!(
            "[{}] [{:5}] {}",
            timestamp_format.format(&entry.timestamp),
            entry.level,
            escape_control(&entry.message)
        );

        if entry.fields.is_empty() {
            base
        } else {
            format!("{} {}", base, entry.fields.format_fields())
        }
    }

    fn format_json(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> Result<String> {
        let mut json_obj = serde_json::Map::new();

        let timestamp = if timestamp_format.is_numeric() {
            serde_json::Value::Number(entry.unix_nanos().into())
        } else {
            serde_json::Value::String(timestamp_format.format(&entry.timestamp))
        };
        json_obj.insert("timestamp".to_string(), timestamp);
        json_obj.insert(
            "level".to_string(),
            serde_json::Value::String(entry.level.to_str().to_string()),
        );
        json_obj.insert(
            "message".to_string(),
            serde_json::Value::String(entry.message.clone()),
        );

        for (key, value) in entry.fields.iter() {
            json_obj.insert(key.to_string(), value.to_json_value()?);
        }

        Ok(serde_json::to_string(&serde_json::Value::Object(json_obj))?)
    }

    fn format_logfmt(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut parts = vec![
            format!(
                "timestamp={}",
                escape_logfmt_value(&timestamp_format.format(&entry.timestamp))
            ),
            format!("level={}", entry.level.to_str()),
            // message is always quoted
            format!("message={}", quote_logfmt_value(&entry.message)),
        ];

        for (key, value) in entry.fields.iter() {
            let formatted_value = match value {
                FieldValue::String(s) => quote_logfmt_value(s),
                FieldValue::Json(v) => quote_logfmt_value(&v.to_string()),
                other => escape_logfmt_value(&other.to_string()),
            };
            parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
        }

        parts.join(" ")
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "logfmt" => Ok(OutputFormat::Logfmt),
            _ => Err(format!("Invalid output format: '{}'", s)),
        }
    }
}

/// Strip characters logfmt keys cannot carry; dots survive for group paths
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || matches!(c, '_' | '-' | '.'))
        .collect()
}

/// Escape newline, carriage return and tab so one entry stays on one line
pub(crate) fn escape_control(value: &str) -> String {
    value
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn escape_logfmt_value(value: &str) -> String {
    if value.contains(&[' ', '"', '=', '\n', '\r', '\t'][..]) {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", escape_control(&escaped))
}
