//! Inert backend used when no store is available

use async_trait::async_trait;
use wps_cache_core::{
    BackendKind, CacheKey, CacheStats, Expiry, GroupCacheBackend, Result, WriteMode,
};

/// Backend that stores nothing
///
/// Every read misses and every write reports failure, so callers can use
/// the cache unconditionally even when no server is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct DisabledBackend;

impl DisabledBackend {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl GroupCacheBackend for DisabledBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Disabled
    }

    async fn get(&self, _key: &CacheKey) -> Result<Option<Vec<u8>>> {
        Ok(None)
    }

    async fn set(
        &self,
        _key: &CacheKey,
        _value: Vec<u8>,
        _mode: WriteMode,
        _expiry: Expiry,
    ) -> Result<bool> {
        Ok(false)
    }

    async fn exists(&self, _key: &CacheKey) -> Result<bool> {
        Ok(false)
    }

    async fn delete(&self, _key: &CacheKey) -> Result<bool> {
        Ok(false)
    }

    async fn flush_group(&self, _group: &str) -> Result<u64> {
        Ok(0)
    }

    async fn has_group(&self, _group: &str) -> Result<bool> {
        Ok(false)
    }

    async fn flush(&self) -> Result<()> {
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        Ok(CacheStats::default())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}
