//! Closed set of backends the manager can run on

use async_trait::async_trait;

use wps_cache_core::{
    BackendKind, CacheKey, CacheStats, Expiry, GroupCacheBackend, Result, WriteMode,
};
use wps_cache_storage::DisabledBackend;

#[cfg(feature = "memcached")]
use wps_cache_storage::MemcachedBackend;
#[cfg(feature = "memory")]
use wps_cache_storage::MemoryBackend;
#[cfg(feature = "redis")]
use wps_cache_storage::RedisBackend;

/// A backend chosen at startup
///
/// Variants exist only for the backends compiled in.
#[derive(Clone)]
pub enum AnyBackend {
    #[cfg(feature = "redis")]
    Redis(RedisBackend),
    #[cfg(feature = "memcached")]
    Memcached(MemcachedBackend),
    #[cfg(feature = "memory")]
    Memory(MemoryBackend),
    Disabled(DisabledBackend),
}

impl Default for AnyBackend {
    fn default() -> Self {
        AnyBackend::Disabled(DisabledBackend)
    }
}

impl std::fmt::Debug for AnyBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("AnyBackend").field(&self.kind()).finish()
    }
}

macro_rules! dispatch {
    ($self:ident, $backend:ident => $call:expr) => {
        match $self {
            #[cfg(feature = "redis")]
            AnyBackend::Redis($backend) => $call,
            #[cfg(feature = "memcached")]
            AnyBackend::Memcached($backend) => $call,
            #[cfg(feature = "memory")]
            AnyBackend::Memory($backend) => $call,
            AnyBackend::Disabled($backend) => $call,
        }
    };
}

#[async_trait]
impl GroupCacheBackend for AnyBackend {
    fn kind(&self) -> BackendKind {
        dispatch!(self, b => b.kind())
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        dispatch!(self, b => b.get(key).await)
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: Vec<u8>,
        mode: WriteMode,
        expiry: Expiry,
    ) -> Result<bool> {
        dispatch!(self, b => b.set(key, value, mode, expiry).await)
    }

    async fn exists(&self, key: &CacheKey) -> Result<bool> {
        dispatch!(self, b => b.exists(key).await)
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        dispatch!(self, b => b.delete(key).await)
    }

    async fn flush_group(&self, group: &str) -> Result<u64> {
        dispatch!(self, b => b.flush_group(group).await)
    }

    async fn has_group(&self, group: &str) -> Result<bool> {
        dispatch!(self, b => b.has_group(group).await)
    }

    async fn flush(&self) -> Result<()> {
        dispatch!(self, b => b.flush().await)
    }

    async fn stats(&self) -> Result<CacheStats> {
        dispatch!(self, b => b.stats().await)
    }

    async fn close(&self) -> Result<()> {
        dispatch!(self, b => b.close().await)
    }
}

impl From<DisabledBackend> for AnyBackend {
    fn from(backend: DisabledBackend) -> Self {
        AnyBackend::Disabled(backend)
    }
}

#[cfg(feature = "memory")]
impl From<MemoryBackend> for AnyBackend {
    fn from(backend: MemoryBackend) -> Self {
        AnyBackend::Memory(backend)
    }
}

#[cfg(feature = "redis")]
impl From<RedisBackend> for AnyBackend {
    fn from(backend: RedisBackend) -> Self {
        AnyBackend::Redis(backend)
    }
}

#[cfg(feature = "memcached")]
impl From<MemcachedBackend> for AnyBackend {
    fn from(backend: MemcachedBackend) -> Self {
        AnyBackend::Memcached(backend)
    }
}
