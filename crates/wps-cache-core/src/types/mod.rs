//! Core types for cache operations

mod key;
mod options;
mod stats;

pub use key::{CacheKey, DEFAULT_GROUP, GROUP_SEPARATOR};
pub use options::{Expiry, WriteMode};
pub use stats::CacheStats;
