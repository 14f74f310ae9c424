//! High-level cache manager

use std::sync::Arc;
use std::time::Instant;

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use wps_cache_core::{
    BackendKind, CacheError, CacheKey, CacheMetrics, CacheOperation, CacheStats, Expiry,
    GroupCacheBackend, JsonCodec, NoopMetrics, ValueCodec, WriteMode,
};

use crate::backend::AnyBackend;

mod groups;
pub use groups::CacheGroup;

/// Key/group cache with pluggable codec and metrics
///
/// Generic over:
/// - `B`: The backend (defaults to the startup-selected [`AnyBackend`])
/// - `S`: The value codec (JSON, MessagePack, Bincode)
/// - `M`: The metrics collector
///
/// No method returns an error. A failing backend reads as a miss, writes
/// report `false` and `stats` reports zeros; each failure is logged at `warn`
/// and passed to [`CacheMetrics::record_failure`].
pub struct CacheManager<B = AnyBackend, S = JsonCodec, M = NoopMetrics>
where
    B: GroupCacheBackend,
    S: ValueCodec,
    M: CacheMetrics,
{
    backend: Arc<B>,
    codec: S,
    metrics: Arc<M>,
}

impl<B, S, M> Clone for CacheManager<B, S, M>
where
    B: GroupCacheBackend,
    S: ValueCodec,
    M: CacheMetrics,
{
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            codec: self.codec.clone(),
            metrics: Arc::clone(&self.metrics),
        }
    }
}

// Constructors for default codec/metrics
impl<B: GroupCacheBackend> CacheManager<B, JsonCodec, NoopMetrics> {
    /// Create a new CacheManager with the JSON codec and no metrics
    pub fn new(backend: B) -> Self {
        Self::with_codec_and_metrics(backend, JsonCodec, NoopMetrics)
    }
}

impl CacheManager {
    /// A manager on the disabled backend: every read misses, every write fails
    pub fn disabled() -> Self {
        Self::new(AnyBackend::default())
    }
}

// Full generic implementation
impl<B, S, M> CacheManager<B, S, M>
where
    B: GroupCacheBackend,
    S: ValueCodec,
    M: CacheMetrics,
{
    /// Create a CacheManager with custom codec and metrics
    pub fn with_codec_and_metrics(backend: B, codec: S, metrics: M) -> Self {
        Self {
            backend: Arc::new(backend),
            codec,
            metrics: Arc::new(metrics),
        }
    }

    /// Handle scoped to one group
    pub fn group(&self, group: impl Into<String>) -> CacheGroup<'_, B, S, M> {
        CacheGroup::new(self, group.into())
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_kind(&self) -> BackendKind {
        self.backend.kind()
    }

    pub fn metrics(&self) -> &M {
        &self.metrics
    }

    /// Log and count a backend failure
    fn degrade(&self, operation: CacheOperation, error: &CacheError) {
        let kind = self.backend.kind();
        self.metrics.record_failure(operation, kind, &error.to_string());
        if matches!(error, CacheError::Closed | CacheError::Disabled) {
            debug!(target: "wps_cache", op = operation.as_str(), backend = %kind, "cache unavailable");
        } else {
            warn!(
                target: "wps_cache",
                op = operation.as_str(),
                backend = %kind,
                error = %error,
                "cache operation failed, degrading"
            );
        }
    }

    fn finish<T>(
        &self,
        operation: CacheOperation,
        start: Instant,
        result: wps_cache_core::Result<T>,
        fallback: T,
    ) -> T {
        self.metrics.record_latency(operation, start.elapsed());
        match result {
            Ok(value) => value,
            Err(e) => {
                self.degrade(operation, &e);
                fallback
            }
        }
    }

    /// Get a value, or `default` when it is absent, expired, undecodable or
    /// the backend is unavailable
    pub async fn get<T>(&self, key: &str, group: &str, default: T) -> T
    where
        T: DeserializeOwned,
    {
        self.get_opt(key, group).await.unwrap_or(default)
    }

    /// Get a value if present
    pub async fn get_opt<T>(&self, key: &str, group: &str) -> Option<T>
    where
        T: DeserializeOwned,
    {
        let key = CacheKey::new(key, group);
        let start = Instant::now();
        let bytes = self.finish(CacheOperation::Get, start, self.backend.get(&key).await, None);
        let kind = self.backend.kind();

        let Some(bytes) = bytes else {
            self.metrics.record_miss(&key.compose(), kind);
            return None;
        };

        match self.codec.decode::<T>(&bytes) {
            Ok(value) => {
                self.metrics.record_hit(&key.compose(), kind);
                Some(value)
            }
            Err(e) => {
                warn!(
                    target: "wps_cache",
                    key = %key,
                    codec = self.codec.name(),
                    error = %e,
                    "cached value could not be decoded, treating as miss"
                );
                self.metrics.record_miss(&key.compose(), kind);
                None
            }
        }
    }

    /// Store a value
    ///
    /// Without `force` an existing entry is left untouched and `false` is
    /// returned. `expire` of zero means no expiry.
    pub async fn set<T>(
        &self,
        key: &str,
        group: &str,
        value: &T,
        force: bool,
        expire: impl Into<Expiry>,
    ) -> bool
    where
        T: Serialize + ?Sized,
    {
        self.write(
            key,
            group,
            value,
            WriteMode::from_force(force),
            expire.into(),
            CacheOperation::Set,
        )
        .await
    }

    /// Overwrite a value only if it already exists
    pub async fn replace<T>(
        &self,
        key: &str,
        group: &str,
        value: &T,
        expire: impl Into<Expiry>,
    ) -> bool
    where
        T: Serialize + ?Sized,
    {
        self.write(
            key,
            group,
            value,
            WriteMode::IfPresent,
            expire.into(),
            CacheOperation::Replace,
        )
        .await
    }

    async fn write<T>(
        &self,
        key: &str,
        group: &str,
        value: &T,
        mode: WriteMode,
        expiry: Expiry,
        operation: CacheOperation,
    ) -> bool
    where
        T: Serialize + ?Sized,
    {
        let key = CacheKey::new(key, group);
        let start = Instant::now();

        let bytes = match self.codec.encode(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                self.degrade(operation, &e);
                return false;
            }
        };

        let result = self.backend.set(&key, bytes, mode, expiry).await;
        self.finish(operation, start, result, false)
    }

    /// Whether an entry exists, without fetching it
    pub async fn has(&self, key: &str, group: &str) -> bool {
        let key = CacheKey::new(key, group);
        let start = Instant::now();
        let result = self.backend.exists(&key).await;
        self.finish(CacheOperation::Has, start, result, false)
    }

    /// Remove one entry; `true` if it existed
    pub async fn delete(&self, key: &str, group: &str) -> bool {
        let key = CacheKey::new(key, group);
        let start = Instant::now();
        let result = self.backend.delete(&key).await;
        self.finish(CacheOperation::Delete, start, result, false)
    }

    /// Remove every entry of a group, returning how many were removed
    pub async fn flush_group(&self, group: &str) -> u64 {
        let start = Instant::now();
        let result = self.backend.flush_group(group).await;
        self.finish(CacheOperation::FlushGroup, start, result, 0)
    }

    /// Whether a group has at least one live entry
    pub async fn has_group(&self, group: &str) -> bool {
        let start = Instant::now();
        let result = self.backend.has_group(group).await;
        self.finish(CacheOperation::HasGroup, start, result, false)
    }

    /// Remove every entry in every group
    pub async fn flush(&self) -> bool {
        let start = Instant::now();
        let result = self.backend.flush().await.map(|()| true);
        self.finish(CacheOperation::Flush, start, result, false)
    }

    /// Backend hit/miss counters; zeros when unavailable
    pub async fn stats(&self) -> CacheStats {
        let start = Instant::now();
        let result = self.backend.stats().await;
        self.finish(CacheOperation::Stats, start, result, CacheStats::default())
    }

    /// Release the backend connection
    ///
    /// Later calls behave like the disabled backend.
    pub async fn close(&self) {
        let start = Instant::now();
        let result = self.backend.close().await;
        self.finish(CacheOperation::Close, start, result, ());
    }
}
