//! Backend selection at startup

use tracing::{info, warn};

use wps_cache_core::{BackendKind, GroupCacheBackend, Result};
use wps_cache_storage::DisabledBackend;

use crate::backend::AnyBackend;
use crate::config::{BackendChoice, CacheConfig};
use crate::manager::CacheManager;

/// Backends compiled into this build
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Capabilities {
    pub redis: bool,
    pub memcached: bool,
    pub memory: bool,
}

impl Capabilities {
    /// Capabilities of the current build
    pub const fn compiled() -> Self {
        Self {
            redis: cfg!(feature = "redis"),
            memcached: cfg!(feature = "memcached"),
            memory: cfg!(feature = "memory"),
        }
    }

    /// Backend to open for `choice`
    ///
    /// `Auto` never picks the in-process store: it is only used when asked for.
    pub fn resolve(&self, choice: BackendChoice) -> BackendKind {
        match choice {
            BackendChoice::Auto if self.redis => BackendKind::Redis,
            BackendChoice::Auto if self.memcached => BackendKind::Memcached,
            BackendChoice::Redis if self.redis => BackendKind::Redis,
            BackendChoice::Memcached if self.memcached => BackendKind::Memcached,
            BackendChoice::Memory if self.memory => BackendKind::Memory,
            _ => BackendKind::Disabled,
        }
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::compiled()
    }
}

/// Open the configured backend, falling back to [`DisabledBackend`]
///
/// Never fails: an unreachable server or rejected credentials are logged and
/// the cache runs disabled.
pub async fn connect(config: &CacheConfig) -> CacheManager {
    let capabilities = Capabilities::compiled();
    let kind = capabilities.resolve(config.backend);

    if kind == BackendKind::Disabled
        && !matches!(config.backend, BackendChoice::Disabled | BackendChoice::Auto)
    {
        warn!(
            target: "wps_cache",
            requested = ?config.backend,
            "requested cache backend is not compiled in, cache disabled"
        );
    }

    let backend = match open(kind, config).await {
        Ok(backend) => backend,
        Err(e) => {
            warn!(target: "wps_cache", backend = %kind, error = %e, "cache backend unavailable, cache disabled");
            AnyBackend::Disabled(DisabledBackend)
        }
    };

    info!(target: "wps_cache", backend = %backend.kind(), "cache backend selected");
    CacheManager::new(backend)
}

#[cfg_attr(
    not(any(feature = "redis", feature = "memcached", feature = "memory")),
    allow(unused_variables)
)]
async fn open(kind: BackendKind, config: &CacheConfig) -> Result<AnyBackend> {
    match kind {
        #[cfg(feature = "redis")]
        BackendKind::Redis => wps_cache_storage::RedisBackend::new(config.redis.clone())
            .await
            .map(AnyBackend::Redis),
        #[cfg(feature = "memcached")]
        BackendKind::Memcached => {
            wps_cache_storage::MemcachedBackend::new(config.memcached.clone())
                .await
                .map(AnyBackend::Memcached)
        }
        #[cfg(feature = "memory")]
        BackendKind::Memory => Ok(AnyBackend::Memory(wps_cache_storage::MemoryBackend::new(
            config.memory.clone(),
        ))),
        _ => Ok(AnyBackend::Disabled(DisabledBackend)),
    }
}
