//! Memcached backend implementation

mod backend;
mod config;
mod metadump;

pub use backend::MemcachedBackend;
pub use config::MemcachedConfig;
