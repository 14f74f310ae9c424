use tracing_subscriber::{
    EnvFilter, fmt,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::error::ContextError;
use crate::settings::LoggingSettings;

/// Install a global tracing subscriber using the provided logging settings.
///
/// `RUST_LOG` directives refine the configured level. Fails if a global
/// subscriber is already installed.
pub fn init(logging: &LoggingSettings) -> Result<(), ContextError> {
    let level = logging.level_filter()?;
    let env_filter = EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy();

    let fmt_layer = if logging.json {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_target(true)
            .boxed()
    } else {
        fmt::layer().compact().with_target(true).boxed()
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|err| ContextError::Telemetry(err.to_string()))
}
