//! TTL Sweeper Task
//!
//! Background task that periodically removes expired cache entries, and the
//! handle used to stop it.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::cache::{deadline_after, CacheStore};

// == Sweeper Handle ==
/// Owns the running sweep task.
///
/// The task goes from running to stopped exactly once. There is no pause or
/// restart. Dropping the handle stops the task as well.
#[derive(Debug)]
pub struct SweeperHandle {
    stop_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl SweeperHandle {
    // == Stop ==
    /// Signals the sweep loop to exit.
    ///
    /// Does not wait for an in-flight pass. No new pass starts once the loop
    /// has observed the signal. Returns `false` when the sweeper had already
    /// been told to stop; repeated calls are a no-op.
    pub fn stop(&self) -> bool {
        let already_stopped = self.stop_tx.send_replace(true);
        if already_stopped {
            warn!("Sweeper stop requested more than once; ignoring");
        }
        !already_stopped
    }

    /// Returns true once a stop has been requested.
    pub fn is_stopped(&self) -> bool {
        *self.stop_tx.borrow()
    }

    /// Returns true once the task has exited.
    #[cfg(test)]
    pub(crate) fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Waits until the sweep loop has exited. Does not request a stop itself.
    pub async fn stopped(&self) {
        self.stop_tx.closed().await;
    }
}

impl Drop for SweeperHandle {
    fn drop(&mut self) {
        self.stop_tx.send_replace(true);
    }
}

/// Spawns a background task that periodically cleans up expired entries.
///
/// The first pass runs one `interval` after the call, then every `interval`.
/// Must be called from within a tokio runtime.
///
/// # Example
/// ```ignore
/// let store = Arc::new(CacheStore::<String>::new());
/// let sweeper = spawn_sweeper(store.clone(), Duration::from_secs(1));
/// // Later, during shutdown:
/// sweeper.stop();
/// ```
pub fn spawn_sweeper<V>(store: Arc<CacheStore<V>>, interval: Duration) -> SweeperHandle
where
    V: Send + Sync + 'static,
{
    let (stop_tx, stop_rx) = watch::channel(false);
    let task = tokio::spawn(run_sweeper(store, interval, stop_rx));
    SweeperHandle { stop_tx, task }
}

async fn run_sweeper<V>(
    store: Arc<CacheStore<V>>,
    interval: Duration,
    mut stop_rx: watch::Receiver<bool>,
) {
    let mut ticker = interval_at(deadline_after(Instant::now(), interval), interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    info!("Starting TTL sweeper with interval of {:?}", interval);

    loop {
        tokio::select! {
            // Stop wins over a tick that is ready at the same time.
            biased;

            // Err means every sender is gone, which also ends the loop.
            _ = stop_rx.changed() => break,

            _ = ticker.tick() => {
                let removed = store.cleanup_expired();
                if removed > 0 {
                    info!("TTL sweep: removed {} expired entries", removed);
                } else {
                    debug!("TTL sweep: no expired entries found");
                }
            }
        }
    }

    info!("TTL sweeper stopped");
}
