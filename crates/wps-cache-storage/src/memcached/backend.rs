use async_trait::async_trait;
use memcache::{Client, MemcacheError};
use parking_lot::RwLock;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

use wps_cache_core::{
    BackendKind, CacheError, CacheKey, CacheStats, Expiry, GroupCacheBackend, Result, WriteMode,
};

use super::config::MemcachedConfig;
use super::metadump;

/// Longest relative TTL memcached accepts; larger values are read as a unix timestamp
const MAX_RELATIVE_TTL: u64 = 60 * 60 * 24 * 30;

/// Memcached backend implementation
///
/// The `memcache` client is blocking, so every call runs on the blocking
/// thread pool. Groups have no server-side index: `flush_group` and
/// `has_group` enumerate keys with `lru_crawler metadump` and filter by the
/// `prefix:group#` prefix.
#[derive(Clone)]
pub struct MemcachedBackend {
    client: Arc<RwLock<Option<Arc<Client>>>>,
    addr: String,
    config: MemcachedConfig,
}

fn backend_error(e: MemcacheError) -> CacheError {
    match e {
        MemcacheError::IOError(io) if io.kind() == std::io::ErrorKind::TimedOut => CacheError::Timeout,
        MemcacheError::IOError(io) => CacheError::Connection(io.to_string()),
        other => CacheError::Backend(other.to_string()),
    }
}

/// Memcached expiration argument for an expiry
fn expiration(expiry: Expiry) -> u32 {
    let secs = expiry.as_secs();
    if secs <= MAX_RELATIVE_TTL {
        return secs as u32;
    }
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    u32::try_from(now.saturating_add(secs)).unwrap_or(u32::MAX)
}

impl MemcachedBackend {
    /// Connect and verify the server answers `version`
    pub async fn new(config: MemcachedConfig) -> Result<Self> {
        let addr = config.socket_addr()?;
        let url = config.url.clone();
        let timeout = config.timeout();

        let client = tokio::task::spawn_blocking(move || {
            let client = Client::connect(url.as_str())?;
            client.set_read_timeout(Some(timeout))?;
            client.set_write_timeout(Some(timeout))?;
            client.version()?;
            Ok::<_, MemcacheError>(client)
        })
        .await
        .map_err(|e| CacheError::Internal(e.to_string()))?
        .map_err(|e| CacheError::Connection(e.to_string()))?;

        debug!(url = %config.url, "connected to memcached");
        Ok(Self {
            client: Arc::new(RwLock::new(Some(Arc::new(client)))),
            addr,
            config,
        })
    }

    fn client(&self) -> Result<Arc<Client>> {
        self.client.read().clone().ok_or(CacheError::Closed)
    }

    fn data_key(&self, key: &CacheKey) -> String {
        key.compose_with(self.config.key_prefix.as_deref())
    }

    /// Run a blocking client call off the async runtime
    async fn call<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Client) -> std::result::Result<T, MemcacheError> + Send + 'static,
        T: Send + 'static,
    {
        let client = self.client()?;
        tokio::task::spawn_blocking(move || f(&client))
            .await
            .map_err(|e| CacheError::Internal(e.to_string()))?
            .map_err(backend_error)
    }

    /// Flat keys currently stored under a group
    async fn group_keys(&self, group: &str) -> Result<Vec<String>> {
        self.client()?;
        metadump::list_group_keys(
            &self.addr,
            group,
            self.config.key_prefix.as_deref(),
            self.config.timeout(),
        )
        .await
    }
}

#[async_trait]
impl GroupCacheBackend for MemcachedBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Memcached
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let flat = self.data_key(key);
        self.call(move |client| client.get::<Vec<u8>>(&flat)).await
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: Vec<u8>,
        mode: WriteMode,
        expiry: Expiry,
    ) -> Result<bool> {
        let flat = self.data_key(key);
        let exp = expiration(expiry);

        self.call(move |client| {
            let outcome = match mode {
                WriteMode::Overwrite => client.set(&flat, value.as_slice(), exp),
                WriteMode::IfAbsent => client.add(&flat, value.as_slice(), exp),
                WriteMode::IfPresent => client.replace(&flat, value.as_slice(), exp),
            };
            match outcome {
                Ok(()) => Ok(true),
                // NOT_STORED: add found a key, or replace found none
                Err(MemcacheError::CommandError(_)) => Ok(false),
                Err(e) => Err(e),
            }
        })
        .await
    }

    async fn exists(&self, key: &CacheKey) -> Result<bool> {
        Ok(self.get(key).await?.is_some())
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        let flat = self.data_key(key);
        self.call(move |client| client.delete(&flat)).await
    }

    async fn flush_group(&self, group: &str) -> Result<u64> {
        let keys = self.group_keys(group).await?;
        if keys.is_empty() {
            return Ok(0);
        }

        self.call(move |client| {
            let mut removed = 0u64;
            for key in &keys {
                if client.delete(key)? {
                    removed += 1;
                }
            }
            Ok(removed)
        })
        .await
    }

    async fn has_group(&self, group: &str) -> Result<bool> {
        Ok(!self.group_keys(group).await?.is_empty())
    }

    async fn flush(&self) -> Result<()> {
        self.call(|client| client.flush()).await
    }

    async fn stats(&self) -> Result<CacheStats> {
        let servers = self.call(|client| client.stats()).await?;

        let mut total = CacheStats::default();
        for (_, fields) in &servers {
            let field = |name: &str| {
                fields
                    .get(name)
                    .and_then(|v| v.trim().parse::<u64>().ok())
                    .unwrap_or(0)
            };
            total.merge(&CacheStats::new(field("get_hits"), field("get_misses")));
        }
        Ok(total)
    }

    async fn close(&self) -> Result<()> {
        if self.client.write().take().is_some() {
            debug!(url = %self.config.url, "closed memcached client");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expiration_relative() {
        assert_eq!(expiration(Expiry::Never), 0);
        assert_eq!(expiration(Expiry::secs(60)), 60);
        assert_eq!(expiration(Expiry::secs(MAX_RELATIVE_TTL)), MAX_RELATIVE_TTL as u32);
    }

    #[test]
    fn test_expiration_long_ttl_is_absolute() {
        let exp = expiration(Expiry::secs(MAX_RELATIVE_TTL + 1)) as u64;
        let now = SystemTime::now().duration_since(UNIX_EPOCH).unwrap().as_secs();
        assert!(exp > now);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let config = MemcachedConfig::new("memcache://127.0.0.1:1");
        match MemcachedBackend::new(config).await {
            Err(CacheError::Connection(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connected to a closed port"),
        }
    }

    #[tokio::test]
    #[ignore = "requires a running memcached server (MEMCACHED_URL)"]
    async fn test_group_round_trip() {
        let url =
            std::env::var("MEMCACHED_URL").unwrap_or_else(|_| "memcache://127.0.0.1:11211".into());
        let backend = MemcachedBackend::new(MemcachedConfig::new(url).prefix("wps-test"))
            .await
            .unwrap();
        backend.flush().await.unwrap();

        let k = CacheKey::new("1", "users");
        assert!(backend.set(&k, b"alice".to_vec(), WriteMode::IfAbsent, Expiry::Never).await.unwrap());
        assert!(!backend.set(&k, b"bob".to_vec(), WriteMode::IfAbsent, Expiry::Never).await.unwrap());
        assert_eq!(backend.get(&k).await.unwrap(), Some(b"alice".to_vec()));

        let absent = CacheKey::new("2", "users");
        assert!(!backend.set(&absent, b"x".to_vec(), WriteMode::IfPresent, Expiry::Never).await.unwrap());

        assert!(backend.has_group("users").await.unwrap());
        assert_eq!(backend.flush_group("users").await.unwrap(), 1);
        assert!(!backend.has_group("users").await.unwrap());

        backend.close().await.unwrap();
        assert!(matches!(backend.get(&k).await, Err(CacheError::Closed)));
    }
}
