//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::time::Duration;

use crate::error::{CacheError, Result};

const DEFAULT_SWEEP_INTERVAL_MS: u64 = 1000;
const DEFAULT_TTL_SECS: u64 = 300;

/// Cache configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// How often the background sweeper scans for expired entries
    pub sweep_interval: Duration,
    /// TTL applied by `Cache::add_default`
    pub default_ttl: Duration,
}

impl CacheConfig {
    /// Creates a new CacheConfig by loading values from environment variables.
    ///
    /// Unset or unparseable variables fall back to their defaults.
    ///
    /// # Environment Variables
    /// - `SWEEP_INTERVAL_MS` - Sweep frequency in milliseconds (default: 1000)
    /// - `DEFAULT_TTL_SECS` - Default TTL in seconds (default: 300)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a config from an arbitrary variable source, with the same
    /// names and defaults as [`from_env`](Self::from_env).
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str, default: u64| {
            lookup(name)
                .and_then(|v| v.parse().ok())
                .unwrap_or(default)
        };
        Self {
            sweep_interval: Duration::from_millis(read(
                "SWEEP_INTERVAL_MS",
                DEFAULT_SWEEP_INTERVAL_MS,
            )),
            default_ttl: Duration::from_secs(read("DEFAULT_TTL_SECS", DEFAULT_TTL_SECS)),
        }
    }

    /// Checks that the configuration can build a working cache.
    pub fn validate(&self) -> Result<()> {
        if self.sweep_interval.is_zero() {
            return Err(CacheError::InvalidInterval(self.sweep_interval));
        }
        if self.default_ttl.is_zero() {
            return Err(CacheError::InvalidConfig(
                "default_ttl must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            sweep_interval: Duration::from_millis(DEFAULT_SWEEP_INTERVAL_MS),
            default_ttl: Duration::from_secs(DEFAULT_TTL_SECS),
        }
    }
}

/// Reads and parses an environment variable, falling back to `default`.
pub fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
