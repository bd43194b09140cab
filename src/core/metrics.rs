//! Dispatch metrics for observability
//!
//! Counters describing what the logger did with the events it was given:
//! how many were dispatched, how many were rejected before fan-out, and how
//! the individual sink deliveries went.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters kept by a [`Logger`](super::Logger)
///
/// # Example
///
/// ```
/// use log_dispatch::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_dispatched();
/// metrics.record_delivery();
/// metrics.record_sink_failure();
///
/// assert_eq!(metrics.events_dispatched(), 1);
/// assert_eq!(metrics.sink_failures(), 1);
/// assert_eq!(metrics.failure_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Events that passed severity validation
    events_dispatched: AtomicU64,

    /// Events refused because their level name was unknown
    invalid_severity: AtomicU64,

    /// Successful `Sink::write` calls
    sink_deliveries: AtomicU64,

    /// `Sink::write` calls that returned an error
    sink_failures: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            events_dispatched: AtomicU64::new(0),
            invalid_severity: AtomicU64::new(0),
            sink_deliveries: AtomicU64::new(0),
            sink_failures: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn events_dispatched(&self) -> u64 {
        self.events_dispatched.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn invalid_severity_count(&self) -> u64 {
        self.invalid_severity.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_deliveries(&self) -> u64 {
        self.sink_deliveries.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn sink_failures(&self) -> u64 {
        self.sink_failures.load(Ordering::Relaxed)
    }

    /// Record an event that reached fan-out; returns the previous count
    #[inline]
    pub fn record_dispatched(&self) -> u64 {
        self.events_dispatched.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_invalid_severity(&self) -> u64 {
        self.invalid_severity.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivery(&self) -> u64 {
        self.sink_deliveries.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_sink_failure(&self) -> u64 {
        self.sink_failures.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed sink writes as a percentage (0.0 - 100.0) of all sink writes
    ///
    /// Returns 0.0 if no sink has been written to.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.sink_failures() as f64;
        let total = self.sink_deliveries() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.events_dispatched.store(0, Ordering::Relaxed);
        self.invalid_severity.store(0, Ordering::Relaxed);
        self.sink_deliveries.store(0, Ordering::Relaxed);
        self.sink_failures.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            events_dispatched: AtomicU64::new(self.events_dispatched()),
            invalid_severity: AtomicU64::new(self.invalid_severity_count()),
            sink_deliveries: AtomicU64::new(self.sink_deliveries()),
            sink_failures: AtomicU64::new(self.sink_failures()),
        }
    }
}
