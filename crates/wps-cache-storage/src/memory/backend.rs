//! In-memory cache backend using DashMap

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

use wps_cache_core::{
    BackendKind, CacheError, CacheKey, CacheStats, Expiry, GroupCacheBackend, Result, WriteMode,
};

/// Configuration for the memory backend
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemoryConfig {
    /// Maximum number of entries (0 = unlimited)
    pub max_capacity: usize,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            max_capacity: 10_000,
        }
    }
}

impl MemoryConfig {
    /// Create config with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            max_capacity: capacity,
        }
    }

    /// Create config with unlimited capacity
    pub fn unlimited() -> Self {
        Self { max_capacity: 0 }
    }
}

#[derive(Debug, Clone)]
struct StoredEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl StoredEntry {
    fn new(value: Vec<u8>, expiry: Expiry) -> Self {
        Self {
            value,
            expires_at: expiry.as_duration().map(|ttl| Instant::now() + ttl),
        }
    }

    fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|at| Instant::now() >= at)
    }
}

#[derive(Debug, Default)]
struct MemoryStats {
    hits: u64,
    misses: u64,
}

/// Group -> composed keys index
type GroupIndex = DashMap<String, HashSet<String>>;

/// In-memory cache backend
///
/// Expired entries are dropped lazily when touched, or in bulk by
/// [`MemoryBackend::purge_expired`]. Conditional writes go through the map's
/// entry API, so `IfAbsent`/`IfPresent` are atomic per key.
/// Cloning creates a new handle to the SAME underlying store.
#[derive(Clone)]
pub struct MemoryBackend {
    data: Arc<DashMap<String, StoredEntry>>,
    groups: Arc<GroupIndex>,
    stats: Arc<RwLock<MemoryStats>>,
    closed: Arc<AtomicBool>,
    config: MemoryConfig,
}

impl MemoryBackend {
    /// Create a new memory backend
    pub fn new(config: MemoryConfig) -> Self {
        Self {
            data: Arc::new(DashMap::with_capacity(config.max_capacity.min(10_000))),
            groups: Arc::new(DashMap::new()),
            stats: Arc::new(RwLock::new(MemoryStats::default())),
            closed: Arc::new(AtomicBool::new(false)),
            config,
        }
    }

    /// Create with default configuration
    pub fn with_defaults() -> Self {
        Self::new(MemoryConfig::default())
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed.load(Ordering::Acquire) {
            Err(CacheError::Closed)
        } else {
            Ok(())
        }
    }

    /// Evict arbitrary entries other than `keep` while over capacity
    fn evict_over_capacity(&self, keep: &str) {
        let max = self.config.max_capacity;
        if max == 0 || self.data.len() <= max {
            return;
        }

        let keys_to_remove: Vec<String> = self
            .data
            .iter()
            .map(|entry| entry.key().clone())
            .filter(|key| key != keep)
            .take(self.data.len() - max)
            .collect();

        for key in keys_to_remove {
            self.remove_entry(&key);
        }
    }

    /// Remove an entry and its group membership
    fn remove_entry(&self, composed: &str) -> bool {
        let removed = self.data.remove(composed).is_some();
        self.forget_member(composed);
        removed
    }

    /// Drop `composed` from its group index
    fn forget_member(&self, composed: &str) {
        if let Some(key) = CacheKey::parse(composed, None) {
            if let Some(mut members) = self.groups.get_mut(key.group()) {
                members.remove(composed);
            }
        }
    }

    /// Drop every expired entry, returning how many were removed
    pub fn purge_expired(&self) -> usize {
        let expired: Vec<String> = self
            .data
            .iter()
            .filter(|entry| entry.value().is_expired())
            .map(|entry| entry.key().clone())
            .collect();

        expired
            .iter()
            .filter(|key| self.remove_entry(key))
            .count()
    }

    /// Number of stored entries, expired ones included until purged
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

#[async_trait]
impl GroupCacheBackend for MemoryBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memory
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        self.ensure_open()?;
        let composed = key.compose();

        let found = match self.data.get(&composed) {
            Some(entry) if !entry.is_expired() => Some(entry.value.clone()),
            Some(entry) => {
                drop(entry);
                self.remove_entry(&composed);
                None
            }
            None => None,
        };

        let mut stats = self.stats.write();
        match found {
            Some(_) => stats.hits += 1,
            None => stats.misses += 1,
        }
        Ok(found)
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: Vec<u8>,
        mode: WriteMode,
        expiry: Expiry,
    ) -> Result<bool> {
        self.ensure_open()?;

        let composed = key.compose();
        // The entry guard holds a shard lock; group index and eviction work
        // happens after it is released.
        let (stored, inserted, dropped_expired) = match self.data.entry(composed.clone()) {
            Entry::Occupied(mut occupied) => {
                let live = !occupied.get().is_expired();
                match (mode, live) {
                    (WriteMode::IfAbsent, true) => (false, false, false),
                    (WriteMode::IfPresent, false) => {
                        occupied.remove();
                        (false, false, true)
                    }
                    _ => {
                        occupied.insert(StoredEntry::new(value, expiry));
                        (true, false, false)
                    }
                }
            }
            Entry::Vacant(vacant) => {
                if mode == WriteMode::IfPresent {
                    (false, false, false)
                } else {
                    vacant.insert(StoredEntry::new(value, expiry));
                    (true, true, false)
                }
            }
        };

        if dropped_expired {
            self.forget_member(&composed);
        }
        if stored {
            self.groups
                .entry(key.group().to_string())
                .or_default()
                .insert(composed.clone());
        }
        if inserted {
            self.evict_over_capacity(&composed);
        }
        Ok(stored)
    }

    async fn exists(&self, key: &CacheKey) -> Result<bool> {
        self.ensure_open()?;
        Ok(self
            .data
            .get(&key.compose())
            .is_some_and(|entry| !entry.is_expired()))
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        self.ensure_open()?;
        Ok(self.remove_entry(&key.compose()))
    }

    async fn flush_group(&self, group: &str) -> Result<u64> {
        self.ensure_open()?;
        let group = CacheKey::new("", group);
        let Some((_, members)) = self.groups.remove(group.group()) else {
            return Ok(0);
        };

        let mut count = 0;
        for composed in members {
            if self.data.remove(&composed).is_some() {
                count += 1;
            }
        }
        Ok(count)
    }

    async fn has_group(&self, group: &str) -> Result<bool> {
        self.ensure_open()?;
        let group = CacheKey::new("", group);
        // Copy the member list out so no group shard lock is held while
        // reading the data map.
        let members: Vec<String> = match self.groups.get(group.group()) {
            Some(members) => members.iter().cloned().collect(),
            None => return Ok(false),
        };

        Ok(members.iter().any(|composed| {
            self.data
                .get(composed)
                .is_some_and(|entry| !entry.is_expired())
        }))
    }

    async fn flush(&self) -> Result<()> {
        self.ensure_open()?;
        self.data.clear();
        self.groups.clear();
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        self.ensure_open()?;
        let stats = self.stats.read();
        Ok(CacheStats::new(stats.hits, stats.misses))
    }

    async fn close(&self) -> Result<()> {
        self.closed.store(true, Ordering::Release);
        self.data.clear();
        self.groups.clear();
        Ok(())
    }
}
