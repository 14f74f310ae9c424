//! Metrics hooks for cache observability

use std::time::Duration;

use crate::BackendKind;

/// Cache operation for latency and failure tracking
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheOperation {
    Get,
    Set,
    Has,
    Replace,
    Delete,
    FlushGroup,
    HasGroup,
    Flush,
    Stats,
    Close,
}

impl CacheOperation {
    /// Get operation as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheOperation::Get => "get",
            CacheOperation::Set => "set",
            CacheOperation::Has => "has",
            CacheOperation::Replace => "replace",
            CacheOperation::Delete => "delete",
            CacheOperation::FlushGroup => "flush_group",
            CacheOperation::HasGroup => "has_group",
            CacheOperation::Flush => "flush",
            CacheOperation::Stats => "stats",
            CacheOperation::Close => "close",
        }
    }
}

/// Trait for cache metrics/observability
///
/// Implement this to feed cache events into Prometheus, StatsD or logs.
pub trait CacheMetrics: Send + Sync + 'static {
    /// Record a cache hit
    fn record_hit(&self, key: &str, backend: BackendKind);

    /// Record a cache miss
    fn record_miss(&self, key: &str, backend: BackendKind);

    /// Record operation latency
    fn record_latency(&self, operation: CacheOperation, duration: Duration);

    /// Record a backend failure that was downgraded to miss/false
    fn record_failure(&self, operation: CacheOperation, backend: BackendKind, error: &str);
}

/// No-op metrics implementation (default)
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMetrics;

impl CacheMetrics for NoopMetrics {
    #[inline]
    fn record_hit(&self, _key: &str, _backend: BackendKind) {}

    #[inline]
    fn record_miss(&self, _key: &str, _backend: BackendKind) {}

    #[inline]
    fn record_latency(&self, _operation: CacheOperation, _duration: Duration) {}

    #[inline]
    fn record_failure(&self, _operation: CacheOperation, _backend: BackendKind, _error: &str) {}
}

/// Metrics adapter using the `metrics` crate
///
/// # Example
/// ```ignore
/// use wps_cache_core::MetricsCrateAdapter;
///
/// let metrics = MetricsCrateAdapter::new("wps_cache");
/// // Emits: wps_cache_hits_total, wps_cache_misses_total, ...
/// ```
#[cfg(feature = "metrics")]
#[derive(Debug, Clone)]
pub struct MetricsCrateAdapter {
    prefix: String,
}

#[cfg(feature = "metrics")]
impl MetricsCrateAdapter {
    /// Create a new adapter with the given metric name prefix
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn metric_name(&self, name: &str) -> String {
        format!("{}_{}", self.prefix, name)
    }
}

#[cfg(feature = "metrics")]
impl CacheMetrics for MetricsCrateAdapter {
    fn record_hit(&self, _key: &str, backend: BackendKind) {
        metrics::counter!(self.metric_name("hits_total"), "backend" => backend.as_str())
            .increment(1);
    }

    fn record_miss(&self, _key: &str, backend: BackendKind) {
        metrics::counter!(self.metric_name("misses_total"), "backend" => backend.as_str())
            .increment(1);
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        metrics::histogram!(
            self.metric_name("operation_duration_seconds"),
            "operation" => operation.as_str()
        )
        .record(duration.as_secs_f64());
    }

    fn record_failure(&self, operation: CacheOperation, backend: BackendKind, _error: &str) {
        metrics::counter!(
            self.metric_name("failures_total"),
            "operation" => operation.as_str(),
            "backend" => backend.as_str()
        )
        .increment(1);
    }
}
