//! Redis backend implementation

mod backend;
mod config;
mod info;

pub use backend::RedisBackend;
pub use config::RedisConfig;
