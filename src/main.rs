//! TTL Cache soak driver
//!
//! Runs concurrent readers and writers against a cache with short TTLs and
//! periodically logs its statistics, until Ctrl+C or SIGTERM.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::signal;
use tokio::task::JoinSet;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use ttl_cache::config::env_or;
use ttl_cache::{Cache, CacheConfig};

/// Load shape for the soak run.
#[derive(Debug, Clone)]
struct SoakConfig {
    /// Number of concurrent writer tasks
    writers: usize,
    /// Size of the keyspace the writers cycle through
    keys: usize,
    /// TTL given to every written entry
    ttl: Duration,
    /// How often statistics are logged
    report_interval: Duration,
}

impl SoakConfig {
    /// # Environment Variables
    /// - `SOAK_WRITERS` - Writer tasks (default: 4)
    /// - `SOAK_KEYS` - Keyspace size (default: 1000)
    /// - `SOAK_TTL_MS` - Entry TTL in milliseconds (default: 500)
    /// - `SOAK_REPORT_SECS` - Reporting interval in seconds (default: 5)
    fn from_env() -> Self {
        Self {
            writers: env_or("SOAK_WRITERS", 4usize).max(1),
            keys: env_or("SOAK_KEYS", 1000usize).max(1),
            ttl: Duration::from_millis(env_or("SOAK_TTL_MS", 500u64)),
            report_interval: Duration::from_secs(env_or("SOAK_REPORT_SECS", 5u64).max(1)),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ttl_cache=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting TTL cache soak run");

    let config = CacheConfig::from_env();
    let soak = SoakConfig::from_env();
    info!(
        "Configuration loaded: sweep_interval={:?}, default_ttl={:?}, writers={}, keys={}, ttl={:?}",
        config.sweep_interval, config.default_ttl, soak.writers, soak.keys, soak.ttl
    );

    let cache: Arc<Cache<String>> =
        Arc::new(Cache::from_config(&config).context("failed to build cache")?);

    let mut workers = JoinSet::new();
    for writer in 0..soak.writers {
        workers.spawn(run_writer(cache.clone(), writer, soak.clone()));
    }
    workers.spawn(run_reporter(cache.clone(), soak.report_interval));

    shutdown_signal().await?;

    workers.shutdown().await;
    cache.stop();
    cache.stopped().await;

    let stats = serde_json::to_string(&cache.stats()).context("failed to encode stats")?;
    info!("Final stats: {}", stats);
    info!("Soak run complete");
    Ok(())
}

/// Writes and reads back keys in a loop, one key per iteration.
async fn run_writer(cache: Arc<Cache<String>>, writer: usize, soak: SoakConfig) {
    let mut i = writer;
    loop {
        let key = format!("key:{}", i % soak.keys);
        cache.add(key.clone(), format!("writer-{}-{}", writer, i), soak.ttl);
        let _ = cache.get(&format!("key:{}", (i * 7) % soak.keys));
        if i % 100 == 0 {
            cache.delete(&key);
        }
        i += soak.writers;
        tokio::task::yield_now().await;
    }
}

/// Logs a JSON statistics snapshot on every interval.
async fn run_reporter(cache: Arc<Cache<String>>, every: Duration) {
    let mut ticker = tokio::time::interval(every);
    ticker.tick().await;
    loop {
        ticker.tick().await;
        match serde_json::to_string(&cache.stats()) {
            Ok(stats) => info!("Cache stats: {}", stats),
            Err(e) => warn!("Failed to encode stats: {}", e),
        }
    }
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() -> Result<()> {
    let ctrl_c = async { signal::ctrl_c().await.context("failed to listen for Ctrl+C") };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .context("failed to install SIGTERM handler")?
            .recv()
            .await;
        Ok::<(), anyhow::Error>(())
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<Result<()>>();

    tokio::select! {
        res = ctrl_c => {
            res?;
            info!("Received Ctrl+C, initiating shutdown...");
        }
        res = terminate => {
            res?;
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
    Ok(())
}
