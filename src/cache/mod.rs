//! Cache Module
//!
//! Provides an in-memory key/value cache with per-entry TTL. Expired entries
//! are removed lazily when looked up and actively by a background sweeper.

mod entry;
mod stats;
mod store;


use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tracing::info;

use crate::config::CacheConfig;
use crate::error::{CacheError, Result};
use crate::tasks::{spawn_sweeper, SweeperHandle};

// Re-export public types
pub use entry::CacheEntry;
pub use stats::CacheStats;
pub use store::CacheStore;

pub(crate) use entry::deadline_after;

// == Cache ==
/// Expiring key/value cache with a background sweeper.
///
/// A `Cache` owns one [`CacheStore`] and one sweeper task. Reads and writes
/// are synchronous and may be issued from any thread; the sweeper runs on the
/// tokio runtime that was current when the cache was built.
///
/// # Stopping
/// [`stop`](Cache::stop) ends the sweeper for good; there is no restart.
/// Calling it again is a no-op that returns `false`. Dropping the cache also
/// stops the sweeper. After a stop the cache still serves reads and writes,
/// and expired entries are still removed lazily by [`get`](Cache::get).
///
/// # Example
/// ```
/// use std::time::Duration;
/// use ttl_cache::Cache;
///
/// # #[tokio::main]
/// # async fn main() -> ttl_cache::error::Result<()> {
/// let cache: Cache<String> = Cache::new(Duration::from_secs(1))?;
/// cache.add("greeting", "hello".to_string(), Duration::from_secs(30));
/// assert_eq!(cache.get("greeting").as_deref(), Some("hello"));
/// cache.stop();
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Cache<V> {
    store: Arc<CacheStore<V>>,
    sweeper: SweeperHandle,
    default_ttl: Duration,
}

impl<V> Cache<V>
where
    V: Clone + Send + Sync + 'static,
{
    // == Constructor ==
    /// Creates a cache and starts its sweeper, using the default TTL from
    /// [`CacheConfig::default`].
    ///
    /// Returns [`CacheError::InvalidInterval`] for a zero interval and
    /// [`CacheError::NoRuntime`] when called outside a tokio runtime. Never
    /// waits for a first sweep pass.
    pub fn new(sweep_interval: Duration) -> Result<Self> {
        Self::from_config(&CacheConfig {
            sweep_interval,
            ..CacheConfig::default()
        })
    }

    /// Creates a cache from a [`CacheConfig`].
    pub fn from_config(config: &CacheConfig) -> Result<Self> {
        config.validate()?;
        Handle::try_current().map_err(|e| CacheError::NoRuntime(e.to_string()))?;

        let store = Arc::new(CacheStore::new());
        let sweeper = spawn_sweeper(store.clone(), config.sweep_interval);
        info!(
            "Cache created: sweep_interval={:?}, default_ttl={:?}",
            config.sweep_interval, config.default_ttl
        );

        Ok(Self {
            store,
            sweeper,
            default_ttl: config.default_ttl,
        })
    }

    /// Retrieves a clone of the value for `key` if it is present and live.
    pub fn get(&self, key: &str) -> Option<V> {
        self.store.get(key)
    }

    /// Remaining time to live for `key`, or `None` if absent or expired.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.store.ttl(key)
    }
}

impl<V> Cache<V> {
    /// Stores `value` under `key` for `ttl`. A zero `ttl` stores an entry
    /// that is already expired.
    pub fn add(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.store.add(key, value, ttl);
    }

    /// Stores `value` under `key` with the configured default TTL.
    pub fn add_default(&self, key: impl Into<String>, value: V) {
        self.store.add(key, value, self.default_ttl);
    }

    /// Removes `key`. No-op if absent.
    pub fn delete(&self, key: &str) {
        self.store.delete(key);
    }

    /// Removes every entry. Not atomic with respect to concurrent writers.
    pub fn clear(&self) {
        self.store.clear();
    }

    // == Lifecycle ==
    /// Signals the sweeper to stop.
    ///
    /// Returns `true` on the first call and `false` on later calls, which do
    /// nothing. Does not wait for an in-flight sweep pass; use
    /// [`stopped`](Cache::stopped) for that.
    pub fn stop(&self) -> bool {
        self.sweeper.stop()
    }

    /// Returns true once [`stop`](Cache::stop) has been called.
    pub fn is_stopped(&self) -> bool {
        self.sweeper.is_stopped()
    }

    /// Waits until the sweeper task has exited.
    pub async fn stopped(&self) {
        self.sweeper.stopped().await;
    }

    /// Number of stored entries, counting expired ones not yet reclaimed.
    pub fn len(&self) -> usize {
        self.store.len()
    }

    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.store.is_empty()
    }

    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.store.stats()
    }
}
