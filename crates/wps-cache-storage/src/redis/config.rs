//! Configuration for Redis backend

use serde::Deserialize;
use std::time::Duration;

/// Configuration for Redis backend connection and behavior
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://:password@127.0.0.1:6379/0")
    pub url: String,

    /// Connection pool size
    pub pool_size: u32,

    /// Connection timeout in seconds
    pub connection_timeout_secs: u64,

    /// Optional key prefix for all keys (e.g., "wps")
    pub key_prefix: Option<String>,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379".to_string(),
            pool_size: 4,
            connection_timeout_secs: 2,
            key_prefix: Some("wps".to_string()),
        }
    }
}

impl RedisConfig {
    /// Create new config with URL
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Set pool size
    pub fn pool_size(mut self, size: u32) -> Self {
        self.pool_size = size;
        self
    }

    /// Set key prefix
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.key_prefix = Some(prefix.into());
        self
    }

    /// Store keys without a prefix
    pub fn no_prefix(mut self) -> Self {
        self.key_prefix = None;
        self
    }

    pub fn connection_timeout(&self) -> Duration {
        Duration::from_secs(self.connection_timeout_secs.max(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = RedisConfig::new("redis://cache:6380").pool_size(8).prefix("blog");
        assert_eq!(config.url, "redis://cache:6380");
        assert_eq!(config.pool_size, 8);
        assert_eq!(config.key_prefix.as_deref(), Some("blog"));
        assert!(config.no_prefix().key_prefix.is_none());
    }
}
