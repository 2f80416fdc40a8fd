//! Main logger implementation

use super::{
    appender::Appender,
    error::Result,
    handler::{Handler, LocalHandler, NoopHandler, RemoteHandler},
    log_context::Field,
    log_level::LogLevel,
    remote::{DeliveryContext, RemoteClient},
};
use crate::appenders::ConsoleAppender;
use std::sync::Arc;
use std::time::Duration;

/// Default time `shutdown` callers are expected to allow for draining
pub const DEFAULT_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Cheap-to-clone logging handle
///
/// Every logging call returns `Result<()>`: a failed local write is the
/// caller's to handle. Remote delivery never blocks the call and never
/// fails it after dispatch. `fatal` is a severity only; it does not exit.
#[derive(Clone)]
pub struct Logger {
    handler: Arc<dyn Handler>,
}

impl Logger {
    pub fn new<H: Handler + 'static>(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub fn from_handler(handler: Arc<dyn Handler>) -> Self {
        Self { handler }
    }

    /// A logger that ignores all calls
    pub fn noop() -> Self {
        Self::new(NoopHandler)
    }

    pub fn handler(&self) -> &Arc<dyn Handler> {
        &self.handler
    }

    pub fn enabled(&self, level: LogLevel) -> bool {
        self.handler.enabled(level)
    }

    pub fn log(&self, level: LogLevel, message: impl AsRef<str>, fields: &[Field]) -> Result<()> {
        self.log_with(&DeliveryContext::background(), level, message, fields)
    }

    /// Log with a deadline or cancellation token for the remote push
    pub fn log_with(
        &self,
        ctx: &DeliveryContext,
        level: LogLevel,
        message: impl AsRef<str>,
        fields: &[Field],
    ) -> Result<()> {
        self.handler.handle(ctx, level, message.as_ref(), fields)
    }

    #[inline]
    pub fn trace(&self, message: impl AsRef<str>, fields: &[Field]) -> Result<()> {
        self.log(LogLevel::Trace, message, fields)
    }

    #[inline]
    pub fn debug(&self, message: impl AsRef<str>, fields: &[Field]) -> Result<()> {
        self.log(LogLevel::Debug, message, fields)
    }

    #[inline]
    pub fn info(&self, message: impl AsRef<str>, fields: &[Field]) -> Result<()> {
        self.log(LogLevel::Info, message, fields)
    }

    #[inline]
    pub fn warn(&self, message: impl AsRef<str>, fields: &[Field]) -> Result<()> {
        self.log(LogLevel::Warn, message, fields)
    }

    #[inline]
    pub fn error(&self, message: impl AsRef<str>, fields: &[Field]) -> Result<()> {
        self.log(LogLevel::Error, message, fields)
    }

    #[inline]
    pub fn fatal(&self, message: impl AsRef<str>, fields: &[Field]) -> Result<()> {
        self.log(LogLevel::Fatal, message, fields)
    }

    /// Derive a logger attaching `fields` to every entry
    #[must_use]
    pub fn with<I>(&self, fields: I) -> Logger
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        let fields = fields.into_iter().map(Into::into).collect();
        Self::from_handler(self.handler.with_fields(fields))
    }

    /// Derive a logger nesting subsequent field keys under `name`
    #[must_use]
    pub fn with_group(&self, name: &str) -> Logger {
        Self::from_handler(self.handler.with_group(name))
    }

    pub fn flush(&self) -> Result<()> {
        self.handler.flush()
    }

    /// Flush local output and wait for remote deliveries
    ///
    /// # Example
    ///
    /// ```no_run
    /// use rust_loki_logger::{Logger, DEFAULT_SHUTDOWN_TIMEOUT};
    ///
    /// # async fn example(logger: Logger) {
    /// if let Err(e) = logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).await {
    ///     eprintln!("Warning: {}", e);
    /// }
    /// # }
    /// ```
    pub async fn shutdown(&self, timeout: Duration) -> Result<()> {
        self.flush()?;
        self.handler.drain(timeout).await
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use rust_loki_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .min_level(LogLevel::Debug)
    ///     .build();
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Without a remote client the logger renders locally only.
///
/// # Example
/// ```
/// use rust_loki_logger::prelude::*;
///
/// let logger = Logger::builder()
///     .min_level(LogLevel::Trace)
///     .appender(ConsoleAppender::new().with_output_format(OutputFormat::Logfmt))
///     .fields([Field::string("service", "api")])
///     .build();
/// ```
pub struct LoggerBuilder {
    min_level: LogLevel,
    appender: Option<Arc<dyn Appender>>,
    remote: Option<Arc<dyn RemoteClient>>,
    fields: Vec<Field>,
}

impl LoggerBuilder {
    pub fn new() -> Self {
        Self {
            min_level: LogLevel::Info,
            appender: None,
            remote: None,
            fields: Vec::new(),
        }
    }

    #[must_use = "builder methods return a new value"]
    pub fn min_level(mut self, level: LogLevel) -> Self {
        self.min_level = level;
        self
    }

    /// Set the local appender (default: colored console on stdout)
    #[must_use = "builder methods return a new value"]
    pub fn appender<A: Appender + 'static>(mut self, appender: A) -> Self {
        self.appender = Some(Arc::new(appender));
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn shared_appender(mut self, appender: Arc<dyn Appender>) -> Self {
        self.appender = Some(appender);
        self
    }

    /// Forward entries to a remote client
    #[must_use = "builder methods return a new value"]
    pub fn remote(mut self, client: Arc<dyn RemoteClient>) -> Self {
        self.remote = Some(client);
        self
    }

    /// Fields attached to every entry
    #[must_use = "builder methods return a new value"]
    pub fn fields<I>(mut self, fields: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Field>,
    {
        self.fields.extend(fields.into_iter().map(Into::into));
        self
    }

    pub fn build(self) -> Logger {
        let appender = self
            .appender
            .unwrap_or_else(|| Arc::new(ConsoleAppender::new()));

        let logger = match self.remote {
            Some(client) => Logger::new(RemoteHandler::new(appender, client, self.min_level)),
            None => Logger::new(LocalHandler::new(appender, self.min_level)),
        };

        if self.fields.is_empty() {
            logger
        } else {
            logger.with(self.fields)
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
