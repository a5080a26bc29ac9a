//! Refresh bookkeeping for the order cache.

use std::time::{Duration, Instant};

use parking_lot::RwLock;

/// Tracks refresh outcomes of an order cache.
#[derive(Debug, Default)]
pub struct CacheState {
    /// When the installed snapshot was fetched.
    last_refresh: RwLock<Option<Instant>>,
    /// The last error message, if any.
    last_error: RwLock<Option<String>>,
    /// Number of consecutive failures.
    failure_count: RwLock<u32>,
    /// Lifetime totals.
    totals: RwLock<RefreshTotals>,
}

/// Lifetime refresh counters.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RefreshTotals {
    pub successes: u64,
    pub failures: u64,
}

impl CacheState {
    /// Creates an empty state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns when the installed snapshot was fetched.
    pub fn last_refresh(&self) -> Option<Instant> {
        *self.last_refresh.read()
    }

    /// Returns the age of the installed snapshot.
    pub fn age(&self) -> Option<Duration> {
        self.last_refresh.read().map(|t| t.elapsed())
    }

    /// Records a successful refresh whose snapshot was installed.
    pub fn record_success(&self) {
        *self.last_refresh.write() = Some(Instant::now());
        *self.last_error.write() = None;
        *self.failure_count.write() = 0;
        self.totals.write().successes += 1;
    }

    /// Records a failed refresh.
    pub fn record_failure(&self, error: impl Into<String>) {
        *self.last_error.write() = Some(error.into());
        *self.failure_count.write() += 1;
        self.totals.write().failures += 1;
    }

    /// Returns the last error message.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.read().clone()
    }

    /// Returns the number of consecutive failures.
    pub fn failure_count(&self) -> u32 {
        *self.failure_count.read()
    }

    /// Returns lifetime success and failure counts.
    pub fn totals(&self) -> RefreshTotals {
        *self.totals.read()
    }

    /// Returns true if refresh is needed based on the given threshold.
    pub fn is_stale(&self, threshold: Duration) -> bool {
        match self.age() {
            Some(elapsed) => elapsed > threshold,
            None => true,
        }
    }
}
