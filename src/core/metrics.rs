//! Delivery metrics for observability
//!
//! Counters for remote pushes: how many were dispatched, how many the
//! remote side accepted, and how many failed after dispatch.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for remote delivery
///
/// # Example
///
/// ```
/// use rust_loki_logger::DeliveryMetrics;
///
/// let metrics = DeliveryMetrics::new();
/// metrics.record_dispatched();
/// metrics.record_delivered();
///
/// assert_eq!(metrics.dispatched(), 1);
/// assert_eq!(metrics.failure_rate(), 0.0);
/// ```
#[derive(Debug)]
pub struct DeliveryMetrics {
    /// Pushes handed to the background runtime
    dispatched: AtomicU64,

    /// Pushes answered with 200 or 204
    delivered: AtomicU64,

    /// Pushes that failed in transport or with a bad status
    failed: AtomicU64,

    /// Entries rejected before dispatch because they could not be encoded
    encoding_errors: AtomicU64,
}

impl DeliveryMetrics {
    pub const fn new() -> Self {
        Self {
            dispatched: AtomicU64::new(0),
            delivered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
            encoding_errors: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn dispatched(&self) -> u64 {
        self.dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn encoding_errors(&self) -> u64 {
        self.encoding_errors.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_encoding_error(&self) -> u64 {
        self.encoding_errors.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed pushes as a percentage (0.0 - 100.0) of completed pushes
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed() as f64;
        let total = self.delivered() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }
}

impl Default for DeliveryMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DeliveryMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            dispatched: AtomicU64::new(self.dispatched()),
            delivered: AtomicU64::new(self.delivered()),
            failed: AtomicU64::new(self.failed()),
            encoding_errors: AtomicU64::new(self.encoding_errors()),
        }
    }
}
