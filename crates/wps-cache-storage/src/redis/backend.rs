use async_trait::async_trait;
use bb8::Pool;
use bb8_redis::RedisConnectionManager;
use parking_lot::RwLock;
use redis::{AsyncCommands, RedisError, Value};
use std::sync::Arc;
use tracing::debug;

use wps_cache_core::{
    BackendKind, CacheError, CacheKey, CacheStats, Expiry, GroupCacheBackend, Result, WriteMode,
};

use super::config::RedisConfig;
use super::info::parse_keyspace_stats;

/// Redis backend implementation
///
/// Entries live under `prefix:group#key`; each group has a native set at
/// `prefix:__groups__:group` holding the raw keys of its members.
///
/// Writes use `SET NX`/`SET XX` so the condition is checked atomically by
/// the server. Adding the key to its group set is a second command, so a
/// concurrent `delete` landing between the two can leave a stale member.
/// `has_group` checks member liveness and `flush_group` drops the whole set,
/// so stale members never make a group look populated.
#[derive(Clone)]
pub struct RedisBackend {
    pool: Arc<RwLock<Option<Pool<RedisConnectionManager>>>>,
    config: RedisConfig,
}

fn backend_error(e: RedisError) -> CacheError {
    if e.is_timeout() {
        CacheError::Timeout
    } else if e.is_io_error() || e.is_connection_refusal() {
        CacheError::Connection(e.to_string())
    } else {
        CacheError::Backend(e.to_string())
    }
}

impl RedisBackend {
    /// Connect and verify the server answers `PING`
    ///
    /// Authentication failures surface here as `CacheError::Connection`.
    pub async fn new(config: RedisConfig) -> Result<Self> {
        let manager = RedisConnectionManager::new(config.url.as_str())
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let pool = Pool::builder()
            .max_size(config.pool_size.max(1))
            .connection_timeout(config.connection_timeout())
            .build(manager)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let backend = Self {
            pool: Arc::new(RwLock::new(Some(pool))),
            config,
        };
        backend.ping().await?;
        debug!(url = %backend.config.url, "connected to redis");
        Ok(backend)
    }

    /// Round-trip a `PING`
    pub async fn ping(&self) -> Result<()> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        let _: String = redis::cmd("PING")
            .query_async(&mut *conn)
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        Ok(())
    }

    fn pool(&self) -> Result<Pool<RedisConnectionManager>> {
        self.pool.read().clone().ok_or(CacheError::Closed)
    }

    fn prefix(&self) -> Option<&str> {
        self.config.key_prefix.as_deref()
    }

    /// Flat key of an entry
    fn data_key(&self, key: &CacheKey) -> String {
        key.compose_with(self.prefix())
    }

    /// Key of the membership set of a group
    fn group_key(&self, group: &str) -> String {
        let group = CacheKey::new("", group);
        match self.prefix() {
            Some(prefix) => format!("{}:__groups__:{}", prefix, group.escaped_group()),
            None => format!("__groups__:{}", group.escaped_group()),
        }
    }
}

#[async_trait]
impl GroupCacheBackend for RedisBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Redis
    }

    async fn get(&self, key: &CacheKey) -> Result<Option<Vec<u8>>> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let bytes: Option<Vec<u8>> = conn
            .get(self.data_key(key))
            .await
            .map_err(backend_error)?;
        Ok(bytes)
    }

    async fn set(
        &self,
        key: &CacheKey,
        value: Vec<u8>,
        mode: WriteMode,
        expiry: Expiry,
    ) -> Result<bool> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let mut cmd = redis::cmd("SET");
        cmd.arg(self.data_key(key)).arg(value.as_slice());
        match mode {
            WriteMode::IfAbsent => {
                cmd.arg("NX");
            }
            WriteMode::IfPresent => {
                cmd.arg("XX");
            }
            WriteMode::Overwrite => {}
        }
        match expiry {
            Expiry::After(_) => {
                cmd.arg("EX").arg(expiry.as_secs());
            }
            // A fresh NX key has no TTL to keep.
            Expiry::Never if mode != WriteMode::IfAbsent => {
                cmd.arg("KEEPTTL");
            }
            Expiry::Never => {}
        }

        let reply: Value = cmd.query_async(&mut *conn).await.map_err(backend_error)?;
        if matches!(reply, Value::Nil) {
            return Ok(false);
        }

        let _: () = conn
            .sadd(self.group_key(key.group()), key.key())
            .await
            .map_err(backend_error)?;
        Ok(true)
    }

    async fn exists(&self, key: &CacheKey) -> Result<bool> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        conn.exists(self.data_key(key)).await.map_err(backend_error)
    }

    async fn delete(&self, key: &CacheKey) -> Result<bool> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        pipe.del(self.data_key(key));
        pipe.srem(self.group_key(key.group()), key.key());

        let counts: Vec<u64> = pipe.query_async(&mut *conn).await.map_err(backend_error)?;
        Ok(counts.first().copied().unwrap_or(0) > 0)
    }

    async fn flush_group(&self, group: &str) -> Result<u64> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;
        let group_key = self.group_key(group);

        // Members are stored without prefix or group; rebuild the flat keys.
        let members: Vec<String> = conn.smembers(&group_key).await.map_err(backend_error)?;

        let mut pipe = redis::pipe();
        pipe.atomic();
        for member in &members {
            pipe.del(self.data_key(&CacheKey::new(member.as_str(), group)));
        }
        pipe.del(&group_key);

        let counts: Vec<u64> = pipe.query_async(&mut *conn).await.map_err(backend_error)?;
        Ok(counts.iter().take(members.len()).sum())
    }

    async fn has_group(&self, group: &str) -> Result<bool> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let members: Vec<String> = conn
            .smembers(self.group_key(group))
            .await
            .map_err(backend_error)?;
        if members.is_empty() {
            return Ok(false);
        }

        // Members may have expired passively; only live keys count.
        let data_keys: Vec<String> = members
            .iter()
            .map(|member| self.data_key(&CacheKey::new(member.as_str(), group)))
            .collect();
        let live: u64 = redis::cmd("EXISTS")
            .arg(&data_keys)
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        Ok(live > 0)
    }

    async fn flush(&self) -> Result<()> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let Some(prefix) = self.prefix() else {
            let _: () = redis::cmd("FLUSHDB")
                .query_async(&mut *conn)
                .await
                .map_err(backend_error)?;
            return Ok(());
        };

        // Only our namespace: scan and unlink.
        let match_pattern = format!("{}:*", prefix);
        let mut cursor = 0u64;
        loop {
            let (next_cursor, keys): (u64, Vec<String>) = redis::cmd("SCAN")
                .cursor_arg(cursor)
                .arg("MATCH")
                .arg(&match_pattern)
                .arg("COUNT")
                .arg(1000)
                .query_async(&mut *conn)
                .await
                .map_err(backend_error)?;

            if !keys.is_empty() {
                let _: usize = conn.unlink(&keys).await.map_err(backend_error)?;
            }

            cursor = next_cursor;
            if cursor == 0 {
                break;
            }
        }
        Ok(())
    }

    async fn stats(&self) -> Result<CacheStats> {
        let pool = self.pool()?;
        let mut conn = pool
            .get()
            .await
            .map_err(|e| CacheError::Connection(e.to_string()))?;

        let info: String = redis::cmd("INFO")
            .arg("stats")
            .query_async(&mut *conn)
            .await
            .map_err(backend_error)?;
        Ok(parse_keyspace_stats(&info))
    }

    async fn close(&self) -> Result<()> {
        if self.pool.write().take().is_some() {
            debug!(url = %self.config.url, "closed redis pool");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> RedisConfig {
        let url = std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://127.0.0.1:6379".into());
        RedisConfig::new(url).prefix("wps-test")
    }

    #[tokio::test]
    async fn test_unreachable_server_is_connection_error() {
        let config = RedisConfig::new("redis://127.0.0.1:1");

        match RedisBackend::new(config).await {
            Err(CacheError::Connection(_)) | Err(CacheError::Timeout) => {}
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("connected to a closed port"),
        }
    }

    #[tokio::test]
    #[ignore = "requires a running Redis server (REDIS_URL)"]
    async fn test_group_round_trip() {
        let backend = RedisBackend::new(config()).await.unwrap();
        backend.flush().await.unwrap();

        let k = CacheKey::new("1", "users");
        assert!(backend.set(&k, b"alice".to_vec(), WriteMode::IfAbsent, Expiry::Never).await.unwrap());
        assert!(!backend.set(&k, b"bob".to_vec(), WriteMode::IfAbsent, Expiry::Never).await.unwrap());
        assert_eq!(backend.get(&k).await.unwrap(), Some(b"alice".to_vec()));

        let absent = CacheKey::new("2", "users");
        assert!(!backend.set(&absent, b"x".to_vec(), WriteMode::IfPresent, Expiry::Never).await.unwrap());
        assert!(!backend.exists(&absent).await.unwrap());

        assert!(backend.has_group("users").await.unwrap());
        assert_eq!(backend.flush_group("users").await.unwrap(), 1);
        assert!(!backend.has_group("users").await.unwrap());

        backend.close().await.unwrap();
        assert!(matches!(backend.get(&k).await, Err(CacheError::Closed)));
    }
}
