//! Process-wide handles, built once and passed explicitly

use std::sync::Arc;
use tracing::info;

use wps_cache::{CacheManager, connect};
use wps_export::Exporter;

use crate::settings::Settings;

/// Shared cache manager plus the settings that built it
///
/// Cheap to clone; clones share the same cache connection.
#[derive(Clone)]
pub struct WpsContext {
    settings: Arc<Settings>,
    cache: CacheManager,
}

impl WpsContext {
    /// Connect the configured cache backend
    ///
    /// Never fails: an unreachable backend leaves the cache disabled.
    pub async fn bootstrap(settings: Settings) -> Self {
        let cache = connect(&settings.cache).await;
        info!(backend = ?cache.backend_kind(), "wps context ready");
        Self::new(settings, cache)
    }

    pub fn new(settings: Settings, cache: CacheManager) -> Self {
        Self {
            settings: Arc::new(settings),
            cache,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn cache(&self) -> &CacheManager {
        &self.cache
    }

    /// A fresh exporter carrying the configured ODS options
    pub fn exporter(&self) -> Exporter {
        Exporter::with_ods_options(self.settings.export.ods_options())
    }

    /// Release the cache connection; later cache calls behave as disabled
    pub async fn shutdown(&self) {
        self.cache.close().await;
    }
}

impl std::fmt::Debug for WpsContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WpsContext")
            .field("backend", &self.cache.backend_kind())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wps_cache::{BackendChoice, BackendKind, CacheConfig, Expiry};

    fn settings(backend: BackendChoice) -> Settings {
        Settings {
            cache: CacheConfig::with_backend(backend),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_bootstrap_disabled() {
        let ctx = WpsContext::bootstrap(settings(BackendChoice::Disabled)).await;
        assert_eq!(ctx.cache().backend_kind(), BackendKind::Disabled);
        assert!(!ctx.cache().set("k", "g", &1u32, true, Expiry::Never).await);
        assert_eq!(ctx.cache().get("k", "g", 7u32).await, 7);
    }

    #[cfg(feature = "memory")]
    #[tokio::test]
    async fn test_bootstrap_memory_shared_between_clones() {
        let ctx = WpsContext::bootstrap(settings(BackendChoice::Memory)).await;
        assert_eq!(ctx.cache().backend_kind(), BackendKind::Memory);

        let other = ctx.clone();
        assert!(ctx.cache().set("post:1", "posts", &"hello", true, Expiry::Never).await);
        assert_eq!(
            other.cache().get_opt::<String>("post:1", "posts").await.as_deref(),
            Some("hello")
        );

        ctx.shutdown().await;
        assert!(!other.cache().has("post:1", "posts").await);
    }

    #[tokio::test]
    async fn test_exporter_uses_export_settings() {
        let dir = tempfile::tempdir().unwrap();
        let mut s = settings(BackendChoice::Disabled);
        s.export.temp_dir = Some(dir.path().to_path_buf());
        let ctx = WpsContext::bootstrap(s).await;

        let mut exporter = ctx.exporter();
        exporter.format("ods").set_data(vec![json!({"id": 1})]);
        let bytes = exporter.export();
        assert!(bytes.starts_with(b"PK"));
        assert_eq!(ctx.settings().export.temp_dir.as_deref(), Some(dir.path()));
    }
}
