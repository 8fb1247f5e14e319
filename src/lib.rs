//! TTL Cache - An in-process expiring key/value cache
//!
//! Entries carry a per-entry time-to-live. Expired entries are removed lazily
//! on lookup and actively by a background sweeper task.

pub mod cache;
pub mod config;
pub mod error;
pub mod tasks;

pub use cache::{Cache, CacheStats};
pub use config::CacheConfig;
pub use error::CacheError;
