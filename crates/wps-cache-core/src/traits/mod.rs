//! Core traits for cache operations

mod backend;
mod codec;
mod metrics;

#[cfg(feature = "tracing")]
mod tracing;

pub use backend::{BackendKind, GroupCacheBackend};
pub use codec::{JsonCodec, ValueCodec};
pub use metrics::{CacheMetrics, CacheOperation, NoopMetrics};

#[cfg(feature = "metrics")]
pub use metrics::MetricsCrateAdapter;

#[cfg(feature = "tracing")]
pub use self::tracing::TracingMetrics;

#[cfg(feature = "msgpack")]
pub use codec::MsgPackCodec;

#[cfg(feature = "bincode")]
pub use codec::BincodeCodec;
