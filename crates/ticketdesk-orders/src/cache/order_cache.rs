//! The shared order cache.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::Serialize;
use ticketdesk_core::OrderRecord;
use tracing::{debug, error, info, warn};

use super::snapshot::{SearchHits, Snapshot};
use super::state::CacheState;
use crate::error::OrderSourceError;
use crate::source::OrderSource;

/// Summary of the cache reported alongside responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheInfo {
    pub total_orders: usize,
    pub last_updated: Option<DateTime<Utc>>,
    pub source: String,
}

/// Result of [`OrderCache::search`].
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub hits: SearchHits,
    pub cache_info: CacheInfo,
    pub elapsed: Duration,
}

impl SearchOutcome {
    /// Time spent answering the search, in fractional milliseconds.
    pub fn search_time_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.0
    }
}

/// Result of a completed refresh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshReport {
    /// Number of records fetched.
    pub records: usize,
    /// False when a refresh that started later had already installed its
    /// snapshot, so this one was discarded.
    pub installed: bool,
    pub elapsed: Duration,
}

struct Inner {
    source: Arc<dyn OrderSource>,
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    state: CacheState,
    staleness: Duration,
    next_seq: AtomicU64,
    background_refresh: AtomicBool,
}

/// In-memory copy of the upstream order table.
///
/// Cloning is cheap; all clones share one cache. Lifecycle: empty at
/// creation, populated by the first successful refresh, then replaced
/// wholesale by each later one. A failed refresh leaves the previous
/// snapshot in place.
#[derive(Clone)]
pub struct OrderCache {
    inner: Arc<Inner>,
}

impl OrderCache {
    /// Creates an empty cache over the given source.
    ///
    /// `staleness` is the age after which a search triggers a background
    /// refresh.
    pub fn new(source: Arc<dyn OrderSource>, staleness: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                source,
                snapshot: RwLock::new(None),
                state: CacheState::new(),
                staleness,
                next_seq: AtomicU64::new(0),
                background_refresh: AtomicBool::new(false),
            }),
        }
    }

    /// Returns the name of the underlying source.
    pub fn source_name(&self) -> &str {
        self.inner.source.name()
    }

    /// Returns the underlying source.
    pub fn source(&self) -> &Arc<dyn OrderSource> {
        &self.inner.source
    }

    /// Returns refresh bookkeeping.
    pub fn state(&self) -> &CacheState {
        &self.inner.state
    }

    /// Returns the staleness threshold.
    pub fn staleness(&self) -> Duration {
        self.inner.staleness
    }

    /// Returns the installed snapshot, if any.
    pub fn snapshot(&self) -> Option<Arc<Snapshot>> {
        self.inner.snapshot.read().clone()
    }

    /// Number of cached records.
    pub fn len(&self) -> usize {
        self.inner.snapshot.read().as_ref().map_or(0, |s| s.len())
    }

    /// Returns true when no records are cached.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true when the installed snapshot is older than the staleness
    /// threshold.
    pub fn is_stale(&self) -> bool {
        self.inner.state.is_stale(self.inner.staleness)
    }

    /// Reports the cache size, age and source.
    pub fn cache_info(&self) -> CacheInfo {
        self.info_for(self.snapshot().as_deref())
    }

    fn info_for(&self, snapshot: Option<&Snapshot>) -> CacheInfo {
        CacheInfo {
            total_orders: snapshot.map_or(0, Snapshot::len),
            last_updated: snapshot.map(Snapshot::fetched_at),
            source: self.source_name().to_string(),
        }
    }

    /// Fetches the full row set and installs it as the new snapshot.
    ///
    /// Each call takes a sequence number when it starts. When two refreshes
    /// overlap, the one that started last wins, whatever order they finish in.
    ///
    /// # Errors
    ///
    /// Returns the source error. The previous snapshot stays in place.
    pub async fn refresh(&self) -> Result<RefreshReport, OrderSourceError> {
        let seq = self.inner.next_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let started = Instant::now();

        debug!(seq, source = self.source_name(), "Refreshing order cache");

        let records = match self.inner.source.fetch_orders().await {
            Ok(records) => records,
            Err(e) => {
                self.inner.state.record_failure(e.to_string());
                let failures = self.inner.state.failure_count();
                if e.is_transient() {
                    warn!(
                        seq,
                        source = self.source_name(),
                        error = %e,
                        failures,
                        "Order cache refresh failed, keeping previous snapshot"
                    );
                } else {
                    error!(
                        seq,
                        source = self.source_name(),
                        error = %e,
                        failures,
                        "Order cache refresh failed and will keep failing until the source is fixed"
                    );
                }
                return Err(e);
            },
        };

        let count = records.len();
        let fetched_at = Utc::now();
        let fresh = Arc::new(Snapshot::new(records, fetched_at, seq));

        let installed = {
            let mut slot = self.inner.snapshot.write();
            let superseded = slot.as_ref().is_some_and(|current| current.seq() > seq);
            if !superseded {
                *slot = Some(fresh);
            }
            !superseded
        };

        let elapsed = started.elapsed();
        if installed {
            self.inner.state.record_success();
            info!(
                seq,
                records = count,
                elapsed_ms = elapsed.as_millis() as u64,
                "Order cache refreshed"
            );
        } else {
            debug!(seq, "Discarding refresh result superseded by a later refresh");
        }

        Ok(RefreshReport {
            records: count,
            installed,
            elapsed,
        })
    }

    /// First load at startup: checks the source, then refreshes.
    ///
    /// A failed check is recorded like a failed refresh and the fetch is
    /// skipped; the first search will try again.
    ///
    /// # Errors
    ///
    /// Returns the health check or refresh error.
    pub async fn warm_up(&self) -> Result<RefreshReport, OrderSourceError> {
        if let Err(e) = self.inner.source.health_check().await {
            self.inner.state.record_failure(e.to_string());
            warn!(source = self.source_name(), error = %e, "Order source health check failed");
            return Err(e);
        }
        self.refresh().await
    }

    /// Starts a refresh on the runtime without waiting for it.
    ///
    /// Returns false if a background refresh is already running.
    pub fn refresh_in_background(&self) -> bool {
        if self
            .inner
            .background_refresh
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Background refresh already in flight");
            return false;
        }

        let cache = self.clone();
        tokio::spawn(async move {
            // errors are logged inside refresh()
            let _ = cache.refresh().await;
            cache.inner.background_refresh.store(false, Ordering::Release);
        });
        true
    }

    /// Returns true while a background refresh is running.
    pub fn is_refreshing_in_background(&self) -> bool {
        self.inner.background_refresh.load(Ordering::Acquire)
    }

    /// Searches cached order identifiers.
    ///
    /// An empty cache is loaded first and the caller waits for it. A stale
    /// cache answers immediately and refreshes in the background.
    ///
    /// # Errors
    ///
    /// Only fails when the cache is empty and loading it fails.
    pub async fn search(&self, query: &str, limit: usize) -> Result<SearchOutcome, OrderSourceError> {
        let started = Instant::now();

        let snapshot = match self.snapshot() {
            Some(snapshot) if !snapshot.is_empty() => {
                if self.is_stale() {
                    debug!("Order cache is stale, serving current snapshot");
                    self.refresh_in_background();
                }
                Some(snapshot)
            },
            _ => {
                info!("Order cache is empty, loading before search");
                self.refresh().await?;
                self.snapshot()
            },
        };

        let hits = snapshot
            .as_deref()
            .map(|s| s.search(query, limit))
            .unwrap_or_default();

        Ok(SearchOutcome {
            hits,
            cache_info: self.info_for(snapshot.as_deref()),
            elapsed: started.elapsed(),
        })
    }

    /// Looks up a single cached record. Never triggers a refresh.
    pub fn get_by_id(&self, order_line_id: &str) -> Option<OrderRecord> {
        self.snapshot()?.get(order_line_id).cloned()
    }
}

impl std::fmt::Debug for OrderCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderCache")
            .field("source", &self.source_name())
            .field("records", &self.len())
            .field("staleness", &self.inner.staleness)
            .finish()
    }
}
