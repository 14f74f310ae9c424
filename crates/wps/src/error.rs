use thiserror::Error;

/// Errors from building a [`WpsContext`](crate::WpsContext)
#[derive(Debug, Error)]
pub enum ContextError {
    #[error("failed to build configuration: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },

    #[error("failed to install tracing subscriber: {0}")]
    Telemetry(String),
}

impl ContextError {
    pub(crate) fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}
