//! wps-cache-storage: Storage backends for the WPS group cache
//!
//! Each backend is behind its own feature except [`DisabledBackend`], which
//! is always available as the fallback when nothing else can be used.

mod disabled;

pub use disabled::DisabledBackend;

#[cfg(feature = "memory")]
pub mod memory;

#[cfg(feature = "memory")]
pub use memory::{MemoryBackend, MemoryConfig};

#[cfg(feature = "redis")]
pub mod redis;

#[cfg(feature = "redis")]
pub use redis::{RedisBackend, RedisConfig};

#[cfg(feature = "memcached")]
pub mod memcached;

#[cfg(feature = "memcached")]
pub use memcached::{MemcachedBackend, MemcachedConfig};
