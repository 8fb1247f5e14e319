//! Error types for the cache
//!
//! Provides unified error handling using thiserror.

use std::time::Duration;

use thiserror::Error;

// == Cache Error Enum ==
/// Errors raised when building a cache.
///
/// Lookups never fail: a missing or expired key is reported as `None`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// Sweep interval must be positive
    #[error("Invalid sweep interval: {0:?} (must be greater than zero)")]
    InvalidInterval(Duration),

    /// The sweeper needs a tokio runtime to run on
    #[error("No tokio runtime available: {0}")]
    NoRuntime(String),

    /// Configuration value could not be used
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

// == Result Type Alias ==
/// Convenience Result type for the cache.
pub type Result<T> = std::result::Result<T, CacheError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        assert_eq!(
            CacheError::InvalidInterval(Duration::ZERO).to_string(),
            "Invalid sweep interval: 0ns (must be greater than zero)"
        );
        assert_eq!(
            CacheError::InvalidConfig("SWEEP_INTERVAL_MS=abc".to_string()).to_string(),
            "Invalid configuration: SWEEP_INTERVAL_MS=abc"
        );
    }
}
