//! Aggregator metrics
//!
//! Counters are atomic so a metrics handle can be shared between an
//! aggregator and an external observer. Dropped output batches surface here
//! rather than as call failures: the engine trades completeness for
//! liveness under backpressure, and this is where that trade is visible.

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Shared counters for one or more aggregator instances
#[derive(Debug, Default)]
pub struct AggregatorMetrics {
    /// Samples folded into a group after filtering
    samples_admitted: AtomicU64,
    /// Samples excluded by the spatial or temporal filter
    samples_filtered: AtomicU64,
    /// Samples rejected as malformed (non-finite values, pole latitudes)
    samples_rejected: AtomicU64,
    /// Batches delivered to the output sink
    batches_emitted: AtomicU64,
    /// Batches dropped because the output sink was full
    batches_dropped: AtomicU64,
}

impl AggregatorMetrics {
    /// Create a fresh set of counters
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add_admitted(&self, n: u64) {
        self.samples_admitted.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn add_filtered(&self, n: u64) {
        self.samples_filtered.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn add_rejected(&self, n: u64) {
        self.samples_rejected.fetch_add(n, Ordering::Relaxed);
    }

    pub(crate) fn inc_batches_emitted(&self) {
        self.batches_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn inc_batches_dropped(&self) {
        self.batches_dropped.fetch_add(1, Ordering::Relaxed);
    }

    /// Take a point-in-time snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            samples_admitted: self.samples_admitted.load(Ordering::Relaxed),
            samples_filtered: self.samples_filtered.load(Ordering::Relaxed),
            samples_rejected: self.samples_rejected.load(Ordering::Relaxed),
            batches_emitted: self.batches_emitted.load(Ordering::Relaxed),
            batches_dropped: self.batches_dropped.load(Ordering::Relaxed),
        }
    }
}

/// Point-in-time view of [`AggregatorMetrics`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    pub samples_admitted: u64,
    pub samples_filtered: u64,
    pub samples_rejected: u64,
    pub batches_emitted: u64,
    pub batches_dropped: u64,
}
