//! Cache Statistics Module
//!
//! Tracks hits, misses and expirations with lock-free counters, and exposes
//! a serializable snapshot.

use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Cache Stats ==
/// Point-in-time view of cache counters.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CacheStats {
    /// Number of lookups that returned a value
    pub hits: u64,
    /// Number of lookups that found nothing (absent or expired)
    pub misses: u64,
    /// Entries removed lazily because a lookup found them expired
    pub expired: u64,
    /// Entries removed by background sweep passes
    pub swept: u64,
    /// Number of completed sweep passes
    pub sweeps: u64,
    /// Current number of stored entries, including expired ones not yet reclaimed
    pub total_entries: usize,
    /// Wall-clock time of the last completed sweep pass
    pub last_sweep_at: Option<DateTime<Utc>>,
}

impl CacheStats {
    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if no lookups have been made.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

// == Stats Recorder ==
/// Shared counters updated concurrently by callers and the sweeper.
#[derive(Debug, Default)]
pub(crate) struct StatsRecorder {
    hits: AtomicU64,
    misses: AtomicU64,
    expired: AtomicU64,
    swept: AtomicU64,
    sweeps: AtomicU64,
    /// Unix milliseconds of the last sweep, 0 = never
    last_sweep_ms: AtomicI64,
}

impl StatsRecorder {
    pub(crate) fn record_hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_expired(&self) {
        self.expired.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_sweep(&self, removed: usize) {
        self.swept.fetch_add(removed as u64, Ordering::Relaxed);
        self.sweeps.fetch_add(1, Ordering::Relaxed);
        self.last_sweep_ms
            .store(Utc::now().timestamp_millis(), Ordering::Relaxed);
    }

    /// Builds a snapshot. Counters are read independently, so a snapshot taken
    /// under load is not a single consistent cut.
    pub(crate) fn snapshot(&self, total_entries: usize) -> CacheStats {
        let last_sweep_ms = self.last_sweep_ms.load(Ordering::Relaxed);
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            expired: self.expired.load(Ordering::Relaxed),
            swept: self.swept.load(Ordering::Relaxed),
            sweeps: self.sweeps.load(Ordering::Relaxed),
            total_entries,
            last_sweep_at: if last_sweep_ms == 0 {
                None
            } else {
                DateTime::from_timestamp_millis(last_sweep_ms)
            },
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = StatsRecorder::default().snapshot(0);
        assert_eq!(stats, CacheStats::default());
        assert!(stats.last_sweep_at.is_none());
    }

    #[test]
    fn test_hit_rate_no_requests() {
        let stats = CacheStats::default();
        assert_eq!(stats.hit_rate(), 0.0);
    }

    #[test]
    fn test_hit_rate_mixed() {
        let recorder = StatsRecorder::default();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_hit();
        recorder.record_miss();
        assert_eq!(recorder.snapshot(0).hit_rate(), 0.75);
    }

    #[test]
    fn test_record_sweep() {
        let recorder = StatsRecorder::default();
        recorder.record_sweep(3);
        recorder.record_sweep(0);

        let stats = recorder.snapshot(7);
        assert_eq!(stats.swept, 3);
        assert_eq!(stats.sweeps, 2);
        assert_eq!(stats.total_entries, 7);
        assert!(stats.last_sweep_at.is_some());
    }

    #[test]
    fn test_stats_serialize() {
        let recorder = StatsRecorder::default();
        recorder.record_expired();
        let json = serde_json::to_value(recorder.snapshot(2)).unwrap();

        assert_eq!(json["expired"], 1);
        assert_eq!(json["total_entries"], 2);
        assert!(json["last_sweep_at"].is_null());
    }
}
