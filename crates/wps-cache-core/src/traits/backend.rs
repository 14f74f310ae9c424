//! Group cache backend trait

use async_trait::async_trait;
use std::fmt;

use crate::{CacheKey, CacheStats, Expiry, Result, WriteMode};

/// Which concrete store a backend talks to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    Redis,
    Memcached,
    Memory,
    Disabled,
}

impl BackendKind {
    /// Get kind as string label
    pub fn as_str(&self) -> &'static str {
        match self {
            BackendKind::Redis => "redis",
            BackendKind::Memcached => "memcached",
            BackendKind::Memory => "memory",
            BackendKind::Disabled => "disabled",
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operations every key/group store must support
///
/// Values are opaque bytes; encoding is the manager's concern. Backends
/// report failures as [`CacheError`](crate::CacheError) and never panic on
/// transport problems.
#[async_trait]
pub trait GroupCacheBackend: Send + Sync + 'static {
    /// The store this backend talks to
    fn kind(&self) -> BackendKind;

    /// Fetch the raw value stored under `key`
    ///
    /// Returns `None` if the entry is absent or expired.
    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>>;

    /// Write `value` under `key` according to `mode`
    ///
    /// Returns `true` if the value was stored. `IfAbsent` and `IfPresent`
    /// writes that lose their condition return `false`.
    async fn set(
        &self,
        key: &CacheKey,
        value: Vec<u8>,
        mode: WriteMode,
        expiry: Expiry,
    ) -> Result<bool>;

    /// Check whether `key` holds a live entry
    async fn exists(&self, key: &CacheKey) -> Result<bool>;

    /// Remove `key` and its group membership
    ///
    /// Returns `true` if an entry was removed.
    async fn delete(&self, key: &CacheKey) -> Result<bool>;

    /// Remove every entry of `group`, returning how many were removed
    async fn flush_group(&self, group: &str) -> Result<u64>;

    /// True if `group` has at least one live member
    async fn has_group(&self, group: &str) -> Result<bool>;

    /// Remove every entry in every group
    async fn flush(&self) -> Result<()>;

    /// Hit/miss counters as reported by the store
    async fn stats(&self) -> Result<CacheStats>;

    /// Release the connection; later calls fail with `CacheError::Closed`
    async fn close(&self) -> Result<()>;
}
