//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use std::time::Duration;

use tokio::time::Instant;

/// Horizon used when `now + ttl` is not representable.
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 86_400);

/// Returns `now + after`, saturating to a far-future instant on overflow.
pub(crate) fn deadline_after(now: Instant, after: Duration) -> Instant {
    now.checked_add(after).unwrap_or_else(|| now + FAR_FUTURE)
}

// == Cache Entry ==
/// A stored value together with its absolute expiry instant.
///
/// Entries are never mutated after construction. Overwriting a key replaces
/// the whole entry.
#[derive(Debug, Clone)]
pub struct CacheEntry<V> {
    value: V,
    created_at: Instant,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    // == Constructor ==
    /// Creates a new cache entry expiring `ttl` from now.
    ///
    /// A zero `ttl` yields an entry that is already expired. A `ttl` too large
    /// to represent (such as `Duration::MAX`) saturates and never expires in
    /// practice.
    pub fn new(value: V, ttl: Duration) -> Self {
        let now = Instant::now();
        Self {
            value,
            created_at: now,
            expires_at: deadline_after(now, ttl),
        }
    }

    /// The stored value.
    pub fn value(&self) -> &V {
        &self.value
    }

    /// When the entry was written.
    pub fn created_at(&self) -> Instant {
        self.created_at
    }

    /// When the entry stops being valid.
    pub fn expires_at(&self) -> Instant {
        self.expires_at
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time is greater than or equal to
    /// its expiration instant.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Instant::now())
    }

    /// Expiry check against a caller-supplied instant, so one scan can use a
    /// single clock reading for every entry.
    pub fn is_expired_at(&self, now: Instant) -> bool {
        now >= self.expires_at
    }

    // == Time To Live ==
    /// Returns the remaining time to live, zero once expired.
    pub fn ttl_remaining(&self) -> Duration {
        self.expires_at.saturating_duration_since(Instant::now())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_entry_creation() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(60));

        assert_eq!(entry.value(), "test_value");
        assert_eq!(entry.expires_at() - entry.created_at(), Duration::from_secs(60));
        assert!(!entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_entry_expiration() {
        let entry = CacheEntry::new("test_value".to_string(), Duration::from_secs(1));
        assert!(!entry.is_expired());

        tokio::time::advance(Duration::from_millis(1100)).await;

        assert!(entry.is_expired());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ttl_remaining() {
        let entry = CacheEntry::new(1u32, Duration::from_secs(10));
        assert_eq!(entry.ttl_remaining(), Duration::from_secs(10));

        tokio::time::advance(Duration::from_secs(4)).await;
        assert_eq!(entry.ttl_remaining(), Duration::from_secs(6));

        tokio::time::advance(Duration::from_secs(10)).await;
        assert_eq!(entry.ttl_remaining(), Duration::ZERO);
    }

    #[test]
    fn test_zero_ttl_is_immediately_expired() {
        let entry = CacheEntry::new("test", Duration::ZERO);
        assert!(entry.is_expired());
    }

    #[test]
    fn test_max_ttl_saturates() {
        let entry = CacheEntry::new("forever", Duration::MAX);

        assert!(!entry.is_expired());
        assert!(entry.ttl_remaining() >= FAR_FUTURE - Duration::from_secs(1));
    }

    #[test]
    fn test_deadline_after_overflow() {
        let now = Instant::now();

        assert_eq!(deadline_after(now, Duration::from_secs(5)), now + Duration::from_secs(5));
        assert_eq!(deadline_after(now, Duration::MAX), now + FAR_FUTURE);
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new("test", Duration::from_secs(5));

        assert!(!entry.is_expired_at(entry.expires_at() - Duration::from_nanos(1)));
        assert!(entry.is_expired_at(entry.expires_at()), "Entry should be expired at boundary");
    }
}
