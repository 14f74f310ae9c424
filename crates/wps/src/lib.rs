//! wps: group cache and tabular export for the WPS toolkit
//!
//! Loads [`Settings`] from an optional `wps.toml` plus `WPS__*` environment
//! variables, installs logging, and hands out a [`WpsContext`] that owns the
//! cache connection.
//!
//! ```rust,no_run
//! use wps::prelude::*;
//!
//! # async fn run() -> Result<(), ContextError> {
//! let settings = Settings::load(None)?;
//! wps::telemetry::init(&settings.logging)?;
//!
//! let ctx = WpsContext::bootstrap(settings).await;
//! ctx.cache().set("greeting", "site", &"hi", true, Expiry::Never).await;
//!
//! let mut exporter = ctx.exporter();
//! exporter.format("json").set_data(serde_json::json!([{"id": 1}]));
//! let download = exporter.download("posts");
//! # ctx.shutdown().await;
//! # Ok(())
//! # }
//! ```

mod context;
mod error;
mod settings;
pub mod telemetry;

pub use context::WpsContext;
pub use error::ContextError;
pub use settings::{ExportSettings, LoggingSettings, Settings};

pub use wps_cache as cache;
pub use wps_export as export;

pub mod prelude {
    pub use crate::{ContextError, Settings, WpsContext};
    pub use wps_cache::{
        BackendChoice, BackendKind, CacheConfig, CacheGroup, CacheManager, CacheStats, Expiry,
    };
    pub use wps_export::{Download, ExportFormat, Exporter};
}
