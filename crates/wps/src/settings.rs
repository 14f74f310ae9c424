//! Layered settings: optional TOML file, then `WPS__SECTION__FIELD` variables

use config::{Config, Environment, File};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::level_filters::LevelFilter;

use wps_cache::CacheConfig;
use wps_export::OdsOptions;

use crate::error::ContextError;

/// Basename of the config file looked up in the working directory
const DEFAULT_CONFIG_BASENAME: &str = "wps";

const ENV_PREFIX: &str = "WPS";

/// Everything a [`WpsContext`](crate::WpsContext) is built from
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub cache: CacheConfig,
    pub export: ExportSettings,
    pub logging: LoggingSettings,
}

/// ODS writer settings; unset fields keep the writer defaults
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub temp_dir: Option<PathBuf>,
    pub generator: Option<String>,
    pub creator: Option<String>,
}

impl ExportSettings {
    pub fn ods_options(&self) -> OdsOptions {
        let mut options = OdsOptions::default();
        if let Some(dir) = &self.temp_dir {
            options.temp_dir = Some(dir.clone());
        }
        if let Some(generator) = &self.generator {
            options.generator = generator.clone();
        }
        if let Some(creator) = &self.creator {
            options.creator = creator.clone();
        }
        options
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// Base level (trace|debug|info|warn|error|off); `RUST_LOG` refines it
    pub level: String,
    /// JSON lines instead of compact text
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl LoggingSettings {
    pub fn level_filter(&self) -> Result<LevelFilter, ContextError> {
        LevelFilter::from_str(self.level.trim())
            .map_err(|err| ContextError::invalid("logging.level", format!("failed to parse: {err}")))
    }
}

impl Settings {
    /// Load settings: `path` (required) or `./wps.toml` (optional), then
    /// environment variables such as `WPS__CACHE__BACKEND=redis`
    pub fn load(path: Option<&Path>) -> Result<Self, ContextError> {
        Self::load_with(
            path,
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        )
    }

    fn load_with(path: Option<&Path>, environment: Environment) -> Result<Self, ContextError> {
        let builder = match path {
            Some(path) => Config::builder().add_source(File::from(path).required(true)),
            None => Config::builder()
                .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false)),
        };

        let settings: Settings = builder
            .add_source(environment)
            .build()?
            .try_deserialize()?;
        settings.logging.level_filter()?;
        Ok(settings)
    }
}
