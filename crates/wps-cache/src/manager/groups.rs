use serde::{de::DeserializeOwned, Serialize};

use wps_cache_core::{CacheKey, CacheMetrics, Expiry, GroupCacheBackend, ValueCodec};

use crate::CacheManager;

/// Handle bound to one group
///
/// Saves repeating the group name on every call when a module owns a group.
pub struct CacheGroup<'a, B, S, M>
where
    B: GroupCacheBackend,
    S: ValueCodec,
    M: CacheMetrics,
{
    manager: &'a CacheManager<B, S, M>,
    group: String,
}

impl<'a, B, S, M> CacheGroup<'a, B, S, M>
where
    B: GroupCacheBackend,
    S: ValueCodec,
    M: CacheMetrics,
{
    pub(crate) fn new(manager: &'a CacheManager<B, S, M>, group: String) -> Self {
        // Normalise once so `name()` reports what backends store.
        let group = CacheKey::new("", group).group().to_string();
        Self { manager, group }
    }

    pub fn name(&self) -> &str {
        &self.group
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &str, default: T) -> T {
        self.manager.get(key, &self.group, default).await
    }

    pub async fn get_opt<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        self.manager.get_opt(key, &self.group).await
    }

    pub async fn set<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        force: bool,
        expire: impl Into<Expiry>,
    ) -> bool {
        self.manager.set(key, &self.group, value, force, expire).await
    }

    pub async fn replace<T: Serialize + ?Sized>(
        &self,
        key: &str,
        value: &T,
        expire: impl Into<Expiry>,
    ) -> bool {
        self.manager.replace(key, &self.group, value, expire).await
    }

    pub async fn has(&self, key: &str) -> bool {
        self.manager.has(key, &self.group).await
    }

    pub async fn delete(&self, key: &str) -> bool {
        self.manager.delete(key, &self.group).await
    }

    /// Whether any entry of this group is live
    pub async fn is_populated(&self) -> bool {
        self.manager.has_group(&self.group).await
    }

    /// Remove every entry of this group
    pub async fn invalidate_all(&self) -> u64 {
        self.manager.flush_group(&self.group).await
    }
}
