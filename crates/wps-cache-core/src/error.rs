//! Error types for cache operations

use thiserror::Error;

/// Error returned by cache backends
///
/// Backends report failures through this type; the manager downgrades every
/// variant to miss/failure semantics before anything reaches the caller.
#[derive(Error, Debug, Clone)]
pub enum CacheError {
    /// Backend unreachable or authentication rejected
    #[error("connection error: {0}")]
    Connection(String),

    /// Backend command failed
    #[error("backend error: {0}")]
    Backend(String),

    /// Encoding a value failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Decoding a stored value failed
    #[error("deserialization error: {0}")]
    Deserialization(String),

    /// No usable backend was configured or detected
    #[error("cache backend is disabled")]
    Disabled,

    /// The backend connection was released with `close()`
    #[error("cache backend is closed")]
    Closed,

    /// Operation timed out
    #[error("operation timed out")]
    Timeout,

    /// Internal error
    #[error("internal error: {0}")]
    Internal(String),
}

impl CacheError {
    /// True when the error means the backend cannot serve requests at all,
    /// as opposed to a single failed call.
    pub fn is_unavailable(&self) -> bool {
        matches!(
            self,
            CacheError::Connection(_) | CacheError::Disabled | CacheError::Closed
        )
    }
}

/// Result type alias for cache operations
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CacheError::Connection("refused".to_string());
        assert_eq!(err.to_string(), "connection error: refused");

        let err = CacheError::Disabled;
        assert_eq!(err.to_string(), "cache backend is disabled");
    }

    #[test]
    fn test_unavailable_classification() {
        assert!(CacheError::Closed.is_unavailable());
        assert!(CacheError::Connection("x".into()).is_unavailable());
        assert!(!CacheError::Backend("WRONGTYPE".into()).is_unavailable());
        assert!(!CacheError::Timeout.is_unavailable());
    }
}
