//! Cache configuration

use serde::Deserialize;

#[cfg(feature = "memcached")]
use wps_cache_storage::MemcachedConfig;
#[cfg(feature = "memory")]
use wps_cache_storage::MemoryConfig;
#[cfg(feature = "redis")]
use wps_cache_storage::RedisConfig;

/// Which backend to run on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// Redis if compiled in, else Memcached, else disabled
    #[default]
    Auto,
    Redis,
    Memcached,
    Memory,
    Disabled,
}

/// Configuration for the cache facade
///
/// Sections for backends that are not compiled in are ignored when
/// deserializing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub backend: BackendChoice,

    #[cfg(feature = "redis")]
    pub redis: RedisConfig,

    #[cfg(feature = "memcached")]
    pub memcached: MemcachedConfig,

    #[cfg(feature = "memory")]
    pub memory: MemoryConfig,
}

impl CacheConfig {
    /// Config selecting `backend` with default connection settings
    pub fn with_backend(backend: BackendChoice) -> Self {
        Self {
            backend,
            ..Default::default()
        }
    }
}
