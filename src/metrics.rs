// Copyright (c) 2025-2026 Adrian Robinson. Licensed under the AGPL-3.0.
// See LICENSE file in the project root for full license text.

//! Metrics instrumentation for the dependency cache.
//!
//! Uses the `metrics` crate for backend-agnostic metrics collection.
//! The embedding application is responsible for choosing the exporter
//! (Prometheus, OTEL, etc.). These mirror the in-process [`StatsLedger`]
//! but are never reset by [`DataCache::reset_stats`].
//!
//! # Metric Naming Convention
//! - `dependency_cache_` prefix for all metrics
//! - `_total` suffix for counters
//! - `_seconds` suffix for duration histograms
//!
//! # Labels
//! - `operation`: get, add, invalidate, peek, clear, snapshot
//! - `outcome`: hit, miss, add, invalidate, noop, rejected, ok
//!
//! [`StatsLedger`]: crate::stats::StatsLedger
//! [`DataCache::reset_stats`]: crate::DataCache::reset_stats

use metrics::{counter, gauge, histogram};
use std::time::{Duration, Instant};

/// Record a completed cache operation
pub fn record_operation(operation: &'static str, outcome: &'static str) {
    counter!(
        "dependency_cache_operations_total",
        "operation" => operation,
        "outcome" => outcome
    )
    .increment(1);
}

/// Record operation latency
pub fn record_latency(operation: &'static str, duration: Duration) {
    histogram!(
        "dependency_cache_operation_seconds",
        "operation" => operation
    )
    .record(duration.as_secs_f64());
}

/// Set current number of populated entries
pub fn set_entries(count: usize) {
    gauge!("dependency_cache_entries").set(count as f64);
}

/// Record populated entries dropped by a cascading invalidation
pub fn record_invalidated_entries(count: usize) {
    counter!("dependency_cache_invalidated_entries_total").increment(count as u64);
}

/// Record a statistics reset
pub fn record_stats_reset() {
    counter!("dependency_cache_stats_resets_total").increment(1);
}

/// A timing guard that records latency on drop
pub struct LatencyTimer {
    operation: &'static str,
    start: Instant,
}

impl LatencyTimer {
    /// Start a new latency timer
    pub fn new(operation: &'static str) -> Self {
        Self {
            operation,
            start: Instant::now(),
        }
    }
}

impl Drop for LatencyTimer {
    fn drop(&mut self) {
        record_latency(self.operation, self.start.elapsed());
    }
}

/// Convenience macro for timing operations
#[macro_export]
macro_rules! time_operation {
    ($op:expr) => {
        $crate::metrics::LatencyTimer::new($op)
    };
}
