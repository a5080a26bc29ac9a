//! Background refresh scheduler.

use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};
use tracing::{debug, error, info, warn};

use crate::cache::OrderCache;

/// Shortest interval the scheduler will run at.
pub const MIN_INTERVAL: Duration = Duration::from_secs(1);

/// Configuration for the refresh scheduler.
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    /// Interval between refresh attempts.
    pub interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(300),
        }
    }
}

/// Handle for controlling a running refresh scheduler.
///
/// Dropping the handle stops the scheduler.
pub struct RefreshHandle {
    /// Sender to signal shutdown.
    shutdown_tx: watch::Sender<bool>,
    task: Option<JoinHandle<()>>,
}

impl RefreshHandle {
    /// Signals the scheduler to stop.
    pub fn stop(&self) {
        let _ = self.shutdown_tx.send(true);
    }

    /// Stops the scheduler and waits for its task to finish.
    ///
    /// A refresh that is already running completes first. Returns false if
    /// the task had died before it was asked to stop.
    pub async fn shutdown(mut self) -> bool {
        self.stop();
        match self.task.take() {
            Some(task) => match task.await {
                Ok(()) => true,
                Err(e) => {
                    error!(error = %e, "Refresh scheduler task failed");
                    false
                },
            },
            None => true,
        }
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Periodically refreshes an order cache.
///
/// Ticks are skipped while the cache is empty; the first load is left to
/// startup or to the first search.
pub struct RefreshScheduler {
    cache: OrderCache,
    config: RefreshConfig,
}

impl RefreshScheduler {
    /// Creates a new refresh scheduler.
    pub fn new(cache: OrderCache, config: RefreshConfig) -> Self {
        Self { cache, config }
    }

    /// Creates a scheduler with default configuration.
    pub fn with_defaults(cache: OrderCache) -> Self {
        Self::new(cache, RefreshConfig::default())
    }

    /// Starts the background refresh task.
    ///
    /// Returns a handle that can be used to stop the scheduler.
    pub fn start(self) -> RefreshHandle {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let task = tokio::spawn(self.run(shutdown_rx));

        RefreshHandle {
            shutdown_tx,
            task: Some(task),
        }
    }

    /// Runs the scheduler loop.
    async fn run(self, mut shutdown_rx: watch::Receiver<bool>) {
        let mut period = self.config.interval;
        if period < MIN_INTERVAL {
            warn!(requested = ?period, "Refresh interval too short, using {:?}", MIN_INTERVAL);
            period = MIN_INTERVAL;
        }
        let mut interval_timer = interval_at(Instant::now() + period, period);
        interval_timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!("Starting refresh scheduler with interval {:?}", period);

        loop {
            tokio::select! {
                _ = interval_timer.tick() => {
                    self.do_refresh().await;
                }
                result = shutdown_rx.changed() => {
                    if result.is_err() || *shutdown_rx.borrow() {
                        info!("Refresh scheduler shutting down");
                        break;
                    }
                }
            }
        }
    }

    /// Performs a single scheduled refresh.
    async fn do_refresh(&self) {
        if self.cache.is_empty() {
            debug!("Skipping scheduled refresh, cache has not been loaded yet");
            return;
        }

        debug!("Starting scheduled refresh");
        // failures are logged and recorded by the cache; the next tick retries
        let _ = self.cache.refresh().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use ticketdesk_core::OrderRecord;

    use crate::testing::ScriptedSource;

    fn loaded_source() -> Arc<ScriptedSource> {
        Arc::new(ScriptedSource::returning(vec![OrderRecord::new(
            "ORD-1", 1.0, "GBP",
        )]))
    }

    fn every_minute() -> RefreshConfig {
        RefreshConfig {
            interval: Duration::from_secs(60),
        }
    }

    #[test]
    fn test_refresh_config_default() {
        let config = RefreshConfig::default();
        assert_eq!(config.interval, Duration::from_secs(300));
    }

    #[test]
    fn test_refresh_handle_stop() {
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = RefreshHandle {
            shutdown_tx,
            task: None,
        };

        assert!(!*shutdown_rx.borrow());
        handle.stop();
        assert!(*shutdown_rx.borrow());
    }

    #[tokio::test(start_paused = true)]
    async fn test_refreshes_loaded_cache_on_tick() {
        let source = loaded_source();
        let cache = OrderCache::new(source.clone(), Duration::from_secs(60));
        cache.refresh().await.unwrap();

        let handle = RefreshScheduler::new(cache, every_minute()).start();
        tokio::time::sleep(Duration::from_secs(61)).await;

        assert_eq!(source.calls(), 2);
        assert!(handle.shutdown().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_interval_is_clamped() {
        let source = loaded_source();
        let cache = OrderCache::new(source.clone(), Duration::from_secs(60));
        cache.refresh().await.unwrap();

        let config = RefreshConfig {
            interval: Duration::ZERO,
        };
        let handle = RefreshScheduler::new(cache, config).start();
        tokio::time::sleep(MIN_INTERVAL + Duration::from_millis(500)).await;

        assert_eq!(source.calls(), 2);
        assert!(handle.shutdown().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_skips_ticks_while_empty() {
        let source = loaded_source();
        let cache = OrderCache::new(source.clone(), Duration::from_secs(60));

        let handle = RefreshScheduler::new(cache, every_minute()).start();
        tokio::time::sleep(Duration::from_secs(185)).await;

        assert_eq!(source.calls(), 0);
        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_refresh_after_shutdown() {
        let source = loaded_source();
        let cache = OrderCache::new(source.clone(), Duration::from_secs(60));
        cache.refresh().await.unwrap();

        let handle = RefreshScheduler::new(cache, every_minute()).start();
        handle.shutdown().await;
        tokio::time::sleep(Duration::from_secs(300)).await;

        assert_eq!(source.calls(), 1);
    }
}
