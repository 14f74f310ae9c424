//! Configuration for Memcached backend

use serde::Deserialize;
use std::time::Duration;
use url::Url;

use wps_cache_core::CacheError;

const DEFAULT_PORT: u16 = 11211;

/// Configuration for Memcached backend connection and behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MemcachedConfig {
    /// Server URL (e.g., "memcache://127.0.0.1:11211")
    pub url: String,

    /// Read/write timeout in seconds
    pub timeout_secs: u64,

    /// Optional key prefix for all keys
    pub key_prefix: Option<String>,
}

impl Default for MemcachedConfig {
    fn default() -> Self {
        Self {
            url: "memcache://127.0.0.1:11211".to_string(),
            timeout_secs: 2,
            key_prefix: Some("wps".to_string()),
        }
    }
}

impl MemcachedConfig {
    /// Create new config with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set key prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    /// `host:port` of the server, used for raw protocol commands
    pub fn socket_addr(&self) -> Result<String, CacheError> {
        let url = Url::parse(&self.url).map_err(|e| CacheError::Connection(e.to_string()))?;
        let host = url
            .host_str()
            .ok_or_else(|| CacheError::Connection(format!("no host in {}", self.url)))?;
        Ok(format!("{}:{}", host, url.port().unwrap_or(DEFAULT_PORT)))
    }
}
