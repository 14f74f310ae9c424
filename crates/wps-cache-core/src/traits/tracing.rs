use crate::{BackendKind, CacheMetrics, CacheOperation};
use std::time::Duration;
use tracing::{debug, warn};

/// Metrics adapter that logs cache events via `tracing`
#[derive(Debug, Clone, Default)]
pub struct TracingMetrics {
    service_name: Option<String>,
}

impl TracingMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Tag every event with a service name
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = Some(name.into());
        self
    }
}

impl CacheMetrics for TracingMetrics {
    fn record_hit(&self, key: &str, backend: BackendKind) {
        debug!(
            target: "wps_cache",
            event = "hit",
            key = %key,
            backend = %backend,
            service = ?self.service_name,
            "cache hit"
        );
    }

    fn record_miss(&self, key: &str, backend: BackendKind) {
        debug!(
            target: "wps_cache",
            event = "miss",
            key = %key,
            backend = %backend,
            service = ?self.service_name,
            "cache miss"
        );
    }

    fn record_latency(&self, operation: CacheOperation, duration: Duration) {
        tracing::trace!(
            target: "wps_cache",
            event = "latency",
            operation = operation.as_str(),
            duration_us = duration.as_micros() as u64,
            service = ?self.service_name,
            "cache operation latency"
        );
    }

    fn record_failure(&self, operation: CacheOperation, backend: BackendKind, error: &str) {
        warn!(
            target: "wps_cache",
            event = "failure",
            operation = operation.as_str(),
            backend = %backend,
            error = %error,
            service = ?self.service_name,
            "cache backend call failed"
        );
    }
}
