//! Cache Store Module
//!
//! Sharded key/value storage with lazy TTL expiration on lookup.

use std::time::Duration;

use dashmap::DashMap;
use tokio::time::Instant;
use tracing::debug;

use crate::cache::stats::StatsRecorder;
use crate::cache::{CacheEntry, CacheStats};

// == Cache Store ==
/// Concurrency-safe map from keys to expiring entries.
///
/// Every method takes `&self`. Single-key operations lock one shard of the
/// underlying map, so operations on unrelated keys rarely contend.
/// Whole-keyspace operations ([`clear`](Self::clear) and
/// [`cleanup_expired`](Self::cleanup_expired)) walk the shards one at a time
/// and give no atomicity across keys.
#[derive(Debug)]
pub struct CacheStore<V> {
    entries: DashMap<String, CacheEntry<V>>,
    stats: StatsRecorder,
}

impl<V> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> CacheStore<V> {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
            stats: StatsRecorder::default(),
        }
    }

    // == Add ==
    /// Stores `value` under `key`, expiring `ttl` from now.
    ///
    /// Any previous entry for the key is replaced, not merged. A zero `ttl`
    /// stores an entry that is already expired.
    pub fn add(&self, key: impl Into<String>, value: V, ttl: Duration) {
        self.entries.insert(key.into(), CacheEntry::new(value, ttl));
    }

    // == Delete ==
    /// Removes the entry for `key`, returning whether one was present.
    pub fn delete(&self, key: &str) -> bool {
        self.entries.remove(key).is_some()
    }

    // == Clear ==
    /// Removes every entry.
    ///
    /// Keys added concurrently with a clear may or may not survive it.
    pub fn clear(&self) {
        self.entries.clear();
    }

    // == Cleanup Expired ==
    /// Removes all entries expired at scan time.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup_expired(&self) -> usize {
        let now = Instant::now();
        let mut removed = 0;
        self.entries.retain(|_, entry| {
            let keep = !entry.is_expired_at(now);
            if !keep {
                removed += 1;
            }
            keep
        });
        self.stats.record_sweep(removed);
        removed
    }

    // == Length ==
    /// Returns the number of stored entries, including expired entries that
    /// have not been reclaimed yet.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    // == Is Empty ==
    /// Returns true if nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns true if an entry for `key` is physically present, expired or not.
    ///
    /// Unlike [`get`](Self::get) this never evicts.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    // == Stats ==
    /// Returns current cache statistics.
    pub fn stats(&self) -> CacheStats {
        self.stats.snapshot(self.entries.len())
    }

    /// Removes `key` only while it still holds an expired entry, so a fresh
    /// entry written by a concurrent `add` is never dropped.
    fn evict_if_expired(&self, key: &str) {
        if let Some((_, entry)) = self.entries.remove_if(key, |_, entry| entry.is_expired()) {
            self.stats.record_expired();
            debug!(key, age = ?entry.created_at().elapsed(), "Lazily evicted expired entry");
        }
    }
}

impl<V: Clone> CacheStore<V> {
    // == Get ==
    /// Retrieves a clone of the value for `key`.
    ///
    /// Returns `None` if the key is absent or expired. An expired entry is
    /// removed as part of the lookup, so no caller ever sees a stale value.
    pub fn get(&self, key: &str) -> Option<V> {
        let value = match self.entries.get(key) {
            Some(guard) => {
                let entry: &CacheEntry<V> = &guard;
                if entry.is_expired() {
                    None
                } else {
                    Some(entry.value().clone())
                }
            }
            None => {
                self.stats.record_miss();
                return None;
            }
        };
        // The shard read guard is released here, before any removal.

        match value {
            Some(value) => {
                self.stats.record_hit();
                Some(value)
            }
            None => {
                self.evict_if_expired(key);
                self.stats.record_miss();
                None
            }
        }
    }

    // == Time To Live ==
    /// Returns the remaining time to live for a live entry.
    pub fn ttl(&self, key: &str) -> Option<Duration> {
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired())
            .map(|entry| entry.ttl_remaining())
    }
}
