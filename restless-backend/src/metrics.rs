//! Response store metrics.
//!
//! Enable the `metrics` feature to emit them; otherwise every recorder is a no-op.
//!
//! - `restless_store_lookup_total{backend, result}` - lookups by outcome
//!   (`hit`, `miss`, `expired`, `error`)
//! - `restless_store_prune_total{backend}` - entries removed because they expired
//! - `restless_store_write_total{backend, result}` - store attempts
//!   (`written`, `skipped`, `error`)

#[cfg(feature = "metrics")]
use lazy_static::lazy_static;

#[cfg(feature = "metrics")]
lazy_static! {
    /// Metric name for lookups counter.
    pub static ref STORE_LOOKUP_TOTAL: &'static str = {
        metrics::describe_counter!(
            "restless_store_lookup_total",
            "Total number of response store lookups by result."
        );
        "restless_store_lookup_total"
    };

    /// Metric name for pruned entries counter.
    pub static ref STORE_PRUNE_TOTAL: &'static str = {
        metrics::describe_counter!(
            "restless_store_prune_total",
            "Total number of expired entries pruned on read."
        );
        "restless_store_prune_total"
    };

    /// Metric name for store attempts counter.
    pub static ref STORE_WRITE_TOTAL: &'static str = {
        metrics::describe_counter!(
            "restless_store_write_total",
            "Total number of response store writes by result."
        );
        "restless_store_write_total"
    };
}

/// Record a lookup outcome.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_lookup(backend: &str, result: &'static str) {
    metrics::counter!(*STORE_LOOKUP_TOTAL, "backend" => backend.to_string(), "result" => result)
        .increment(1);
}

/// Record a lookup outcome (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_lookup(_backend: &str, _result: &'static str) {}

/// Record a pruned entry.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_prune(backend: &str) {
    metrics::counter!(*STORE_PRUNE_TOTAL, "backend" => backend.to_string()).increment(1);
}

/// Record a pruned entry (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_prune(_backend: &str) {}

/// Record a store attempt.
#[cfg(feature = "metrics")]
#[inline]
pub fn record_write(backend: &str, result: &'static str) {
    metrics::counter!(*STORE_WRITE_TOTAL, "backend" => backend.to_string(), "result" => result)
        .increment(1);
}

/// Record a store attempt (no-op when `metrics` feature disabled).
#[cfg(not(feature = "metrics"))]
#[inline]
pub fn record_write(_backend: &str, _result: &'static str) {}
