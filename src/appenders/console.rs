//! Console appender implementation

use crate::core::output_format::escape_control;
use crate::core::{Appender, LogEntry, OutputFormat, Result, TimestampFormat};
use colored::Colorize;
use parking_lot::Mutex;
use std::io::Write;

/// Line-per-entry renderer over stdout or any `Write` sink
///
/// # Example
///
/// ```
/// use rust_loki_logger::appenders::ConsoleAppender;
/// use rust_loki_logger::OutputFormat;
///
/// let appender = ConsoleAppender::new()
///     .with_output_format(OutputFormat::Json);
/// ```
pub struct ConsoleAppender {
    writer: Mutex<Box<dyn Write + Send>>,
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleAppender {
    pub fn new() -> Self {
        Self {
            writer: Mutex::new(Box::new(std::io::stdout())),
            use_colors: true,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Render into an arbitrary sink, without colors
    pub fn with_writer<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            use_colors: false,
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    /// Set the timestamp format for this appender
    ///
    /// # Examples
    ///
    /// ```
    /// use rust_loki_logger::appenders::ConsoleAppender;
    /// use rust_loki_logger::TimestampFormat;
    ///
    /// let appender = ConsoleAppender::new()
    ///     .with_timestamp_format(TimestampFormat::Iso8601Micros);
    /// ```
    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    fn render(&self, entry: &LogEntry) -> Result<String> {
        if self.output_format != OutputFormat::Text || !self.use_colors {
            return self.output_format.format(entry, &self.timestamp_format);
        }

        let level_str = format!("{:5}", entry.level)
            .color(entry.level.color_code())
            .to_string();
        let base = format!(
            "[{}] [{}] {}",
            self.timestamp_format.format(&entry.timestamp),
            level_str,
            escape_control(&entry.message)
        );

        if entry.fields.is_empty() {
            Ok(base)
        } else {
            Ok(format!("{} {}", base, entry.fields.format_fields()))
        }
    }
}

impl Default for ConsoleAppender {
    fn default() -> Self {
        Self::new()
    }
}

impl Appender for ConsoleAppender {
    fn append(&self, entry: &LogEntry) -> Result<()> {
        let line = self.render(entry)?;
        writeln!(self.writer.lock(), "{}", line)?;
        Ok(())
    }

    fn flush(&self) -> Result<()> {
        self.writer.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
