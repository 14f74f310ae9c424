//! wps-cache: Key/group cache facade for the WPS toolkit
//!
//! # Features
//!
//! - **Grouped keys** with bulk invalidation per group
//! - **Conditional writes** (add-only, overwrite, replace-only)
//! - **Pluggable backends** (Redis, Memcached, in-process, disabled)
//! - **Never fails the caller**: backend errors degrade to a miss
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use wps_cache::prelude::*;
//!
//! #[tokio::main]
//! async fn main() {
//!     let cache = CacheManager::new(MemoryBackend::new(MemoryConfig::default()));
//!
//!     cache.set("front-page", "posts", &vec![1, 2, 3], false, 300).await;
//!
//!     let ids: Vec<u32> = cache.get("front-page", "posts", Vec::new()).await;
//!     println!("cached ids: {ids:?}");
//!
//!     cache.flush_group("posts").await;
//! }
//! ```

mod backend;
mod config;
mod manager;
mod probe;

// Re-export core
pub use wps_cache_core::*;

// Re-export storage
pub use wps_cache_storage::DisabledBackend;

#[cfg(feature = "memory")]
pub use wps_cache_storage::{MemoryBackend, MemoryConfig};

#[cfg(feature = "redis")]
pub use wps_cache_storage::{RedisBackend, RedisConfig};

#[cfg(feature = "memcached")]
pub use wps_cache_storage::{MemcachedBackend, MemcachedConfig};

pub use backend::AnyBackend;
pub use config::{BackendChoice, CacheConfig};
pub use manager::{CacheGroup, CacheManager};
pub use probe::{connect, Capabilities};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        AnyBackend, BackendChoice, BackendKind, CacheConfig, CacheError, CacheGroup, CacheKey,
        CacheManager, CacheStats, DisabledBackend, Expiry, GroupCacheBackend, JsonCodec, Result,
        ValueCodec, WriteMode,
    };

    #[cfg(feature = "memory")]
    pub use crate::{MemoryBackend, MemoryConfig};

    #[cfg(feature = "redis")]
    pub use crate::{RedisBackend, RedisConfig};

    #[cfg(feature = "memcached")]
    pub use crate::{MemcachedBackend, MemcachedConfig};

    #[cfg(feature = "msgpack")]
    pub use crate::MsgPackCodec;

    #[cfg(feature = "bincode")]
    pub use crate::BincodeCodec;
}
