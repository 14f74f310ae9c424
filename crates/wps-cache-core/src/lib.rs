//! wps-cache-core: Core traits and types for the WPS group cache
//!
//! Everything a backend needs to satisfy the group cache contract lives
//! here: the [`GroupCacheBackend`] trait, `group#key` composition, write
//! modes, expiry, statistics and the value codecs used by the manager.

mod error;
mod traits;
mod types;

pub use error::{CacheError, Result};
pub use traits::*;
pub use types::*;
