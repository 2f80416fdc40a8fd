//! Tracking of background deliveries
//!
//! A counter of outstanding work units plus a wake-up signal for waiters,
//! so a shutdown path can wait for the count to reach zero.

use super::error::{LoggerError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

#[derive(Debug, Default)]
pub struct InFlight {
    count: AtomicUsize,
    idle: Notify,
}

impl InFlight {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Register one unit of work; it is released when the guard drops
    pub fn acquire(self: &Arc<Self>) -> InFlightGuard {
        self.count.fetch_add(1, Ordering::AcqRel);
        InFlightGuard {
            tracker: Arc::clone(self),
        }
    }

    pub fn count(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    /// Wait until no work is outstanding
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.idle.notified();
            tokio::pin!(notified);
            // register before checking so a release in between is not missed
            notified.as_mut().enable();

            if self.count() == 0 {
                return;
            }
            notified.await;
        }
    }

    /// Wait until no work is outstanding, or fail after `timeout`
    ///
    /// Outstanding work keeps running when this times out.
    pub async fn wait_idle_timeout(&self, timeout: Duration) -> Result<()> {
        match tokio::time::timeout(timeout, self.wait_idle()).await {
            Ok(()) => Ok(()),
            Err(_) => Err(LoggerError::timeout(timeout, self.count())),
        }
    }
}

/// Releases its unit of work on drop, including on panic or abort
#[derive(Debug)]
pub struct InFlightGuard {
    tracker: Arc<InFlight>,
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if self.tracker.count.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.tracker.idle.notify_waiters();
        }
    }
}
