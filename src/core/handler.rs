//! Handlers: per-entry processing behind the `Logger` facade
//!
//! A handler owns a minimum level, a local appender and an immutable
//! `LogContext`. Deriving a handler (`with_fields` / `with_group`) shares the
//! appender and remote client and copies the context.

use super::{
    appender::Appender,
    error::Result,
    log_context::{Field, LogContext},
    log_entry::LogEntry,
    log_level::LogLevel,
    remote::{DeliveryContext, RemoteClient},
};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

#[async_trait]
pub trait Handler: Send + Sync {
    /// Whether entries at `level` pass the configured threshold
    fn enabled(&self, level: LogLevel) -> bool;

    /// Process one log call
    ///
    /// Returns once local output is written and any remote delivery has
    /// been scheduled.
    fn handle(
        &self,
        ctx: &DeliveryContext,
        level: LogLevel,
        message: &str,
        fields: &[Field],
    ) -> Result<()>;

    fn with_fields(&self, fields: Vec<Field>) -> Arc<dyn Handler>;

    fn with_group(&self, name: &str) -> Arc<dyn Handler>;

    fn flush(&self) -> Result<()>;

    /// Wait for outstanding remote deliveries
    async fn drain(&self, _timeout: Duration) -> Result<()> {
        Ok(())
    }
}

/// Renders entries through a local appender only
#[derive(Clone)]
pub struct LocalHandler {
    min_level: LogLevel,
    appender: Arc<dyn Appender>,
    context: LogContext,
}

impl LocalHandler {
    pub fn new(appender: Arc<dyn Appender>, min_level: LogLevel) -> Self {
        Self {
            min_level,
            appender,
            context: LogContext::new(),
        }
    }

    pub fn context(&self) -> &LogContext {
        &self.context
    }

    pub fn min_level(&self) -> LogLevel {
        self.min_level
    }

    /// Build the entry and write it locally
    ///
    /// `None` when the level is filtered out.
    fn render(&self, level: LogLevel, message: &str, fields: &[Field]) -> Result<Option<LogEntry>> {
        if level < self.min_level {
            return Ok(None);
        }

        let entry = LogEntry::new(level, message).with_fields(self.context.flatten(fields));
        self.appender.append(&entry)?;
        Ok(Some(entry))
    }

    fn derive(&self, context: LogContext) -> Self {
        Self {
            min_level: self.min_level,
            appender: Arc::clone(&self.appender),
            context,
        }
    }
}

#[async_trait]
impl Handler for LocalHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        level >= self.min_level
    }

    fn handle(
        &self,
        _ctx: &DeliveryContext,
        level: LogLevel,
        message: &str,
        fields: &[Field],
    ) -> Result<()> {
        self.render(level, message, fields).map(|_| ())
    }

    fn with_fields(&self, fields: Vec<Field>) -> Arc<dyn Handler> {
        Arc::new(self.derive(self.context.with_fields(fields)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.derive(self.context.with_group(name)))
    }

    fn flush(&self) -> Result<()> {
        self.appender.flush()
    }
}

/// Renders entries locally, then forwards them to a remote client
///
/// # Example
///
/// ```no_run
/// use rust_loki_logger::prelude::*;
/// use std::sync::Arc;
///
/// # async fn example() -> Result<()> {
/// let client = Arc::new(LokiClient::connect("http://localhost:3100", "billing").await?);
/// let handler = RemoteHandler::new(Arc::new(ConsoleAppender::new()), client, LogLevel::Info);
///
/// let logger = Logger::new(handler).with_group("invoice");
/// logger.info("invoice sent", &[Field::string("id", "inv-1")])?;
/// logger.shutdown(DEFAULT_SHUTDOWN_TIMEOUT).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RemoteHandler {
    local: LocalHandler,
    client: Arc<dyn RemoteClient>,
}

impl RemoteHandler {
    pub fn new(
        appender: Arc<dyn Appender>,
        client: Arc<dyn RemoteClient>,
        min_level: LogLevel,
    ) -> Self {
        Self {
            local: LocalHandler::new(appender, min_level),
            client,
        }
    }

    pub fn context(&self) -> &LogContext {
        self.local.context()
    }

    fn derive(&self, context: LogContext) -> Self {
        Self {
            local: self.local.derive(context),
            client: Arc::clone(&self.client),
        }
    }
}

#[async_trait]
impl Handler for RemoteHandler {
    fn enabled(&self, level: LogLevel) -> bool {
        self.local.enabled(level)
    }

    fn handle(
        &self,
        ctx: &DeliveryContext,
        level: LogLevel,
        message: &str,
        fields: &[Field],
    ) -> Result<()> {
        match self.local.render(level, message, fields)? {
            Some(entry) => self.client.send(ctx, entry),
            None => Ok(()),
        }
    }

    fn with_fields(&self, fields: Vec<Field>) -> Arc<dyn Handler> {
        Arc::new(self.derive(self.context().with_fields(fields)))
    }

    fn with_group(&self, name: &str) -> Arc<dyn Handler> {
        Arc::new(self.derive(self.context().with_group(name)))
    }

    fn flush(&self) -> Result<()> {
        self.local.flush()
    }

    async fn drain(&self, timeout: Duration) -> Result<()> {
        self.client.drain(timeout).await
    }
}

/// Discards everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopHandler;

#[async_trait]
impl Handler for NoopHandler {
    fn enabled(&self, _level: LogLevel) -> bool {
        false
    }

    fn handle(
        &self,
        _ctx: &DeliveryContext,
        _level: LogLevel,
        _message: &str,
        _fields: &[Field],
    ) -> Result<()> {
        Ok(())
    }

    fn with_fields(&self, _fields: Vec<Field>) -> Arc<dyn Handler> {
        Arc::new(NoopHandler)
    }

    fn with_group(&self, _name: &str) -> Arc<dyn Handler> {
        Arc::new(NoopHandler)
    }

    fn flush(&self) -> Result<()> {
        Ok(())
    }
}
