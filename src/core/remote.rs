//! Remote client capability for forwarding entries off-process

use super::{error::Result, log_entry::LogEntry};
use async_trait::async_trait;
use std::time::Duration;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

/// Deadline and cancellation inherited from a log call site
///
/// A push still running when the deadline passes or the token is
/// cancelled is aborted and reported as a transport failure.
#[derive(Debug, Clone, Default)]
pub struct DeliveryContext {
    deadline: Option<Instant>,
    cancel: Option<CancellationToken>,
}

impl DeliveryContext {
    /// Unbounded context: no deadline, never cancelled
    pub fn background() -> Self {
        Self::default()
    }

    /// Context expiring `timeout` from now
    pub fn with_timeout(timeout: Duration) -> Self {
        Self::background().deadline(Instant::now() + timeout)
    }

    #[must_use]
    pub fn deadline(mut self, deadline: Instant) -> Self {
        self.deadline = Some(deadline);
        self
    }

    #[must_use]
    pub fn cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = Some(token);
        self
    }

    pub fn deadline_at(&self) -> Option<Instant> {
        self.deadline
    }

    pub fn cancel_token(&self) -> Option<&CancellationToken> {
        self.cancel.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancellationToken::is_cancelled)
            || self.deadline.is_some_and(|d| Instant::now() >= d)
    }
}

/// Anything able to accept one entry and attempt its delivery
///
/// `send` returns as soon as delivery has been scheduled. Errors it
/// returns are pre-dispatch failures only; later failures go to the
/// implementation's diagnostic channel.
///
/// # Example
///
/// ```no_run
/// use rust_loki_logger::core::{DeliveryContext, LogEntry, RemoteClient, Result};
/// use async_trait::async_trait;
/// use std::time::Duration;
///
/// struct Discard;
///
/// #[async_trait]
/// impl RemoteClient for Discard {
///     fn send(&self, _ctx: &DeliveryContext, _entry: LogEntry) -> Result<()> {
///         Ok(())
///     }
///
///     async fn drain(&self, _timeout: Duration) -> Result<()> {
///         Ok(())
///     }
///
///     fn name(&self) -> &str {
///         "discard"
///     }
/// }
/// ```
#[async_trait]
pub trait RemoteClient: Send + Sync {
    /// Schedule delivery of one entry without waiting for it
    fn send(&self, ctx: &DeliveryContext, entry: LogEntry) -> Result<()>;

    /// Wait until every scheduled delivery has finished, or `timeout` elapses
    async fn drain(&self, timeout: Duration) -> Result<()>;

    fn name(&self) -> &str;
}
