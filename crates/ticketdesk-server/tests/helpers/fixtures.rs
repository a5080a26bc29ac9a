//! Order sources and app builders for tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use ticketdesk_core::OrderRecord;
use ticketdesk_orders::{OrderCache, OrderSource, OrderSourceError, UnavailableSource};
use ticketdesk_server::metrics::detached_handle;
use ticketdesk_server::{AppState, Settings, create_router};

use super::TestClient;

/// Returns the same records on every fetch and counts fetches.
pub struct StaticSource {
    records: Vec<OrderRecord>,
    calls: AtomicUsize,
}

impl StaticSource {
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self {
            records,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OrderSource for StaticSource {
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, OrderSourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(self.records.clone())
    }

    async fn health_check(&self) -> Result<(), OrderSourceError> {
        Ok(())
    }

    fn name(&self) -> &str {
        "static"
    }
}

/// ORD-001, ORD-100 and FL-001.
pub fn sample_orders() -> Vec<OrderRecord> {
    vec![
        OrderRecord::new("ORD-001", 120.0, "GBP"),
        OrderRecord::new("ORD-100", 35.5, "EUR"),
        OrderRecord::new("FL-001", 9.99, "GBP"),
    ]
}

pub fn settings(vars: &[(&str, &str)]) -> Settings {
    Settings::from_vars(vars.iter().copied()).expect("test settings")
}

/// Builds a client over `source` with an unloaded cache.
pub fn client_with_source(source: Arc<dyn OrderSource>, settings: Settings) -> (TestClient, OrderCache) {
    let cache = OrderCache::new(source, Duration::from_secs(300));
    let state = AppState::new(cache.clone(), settings);
    let app = create_router(state, detached_handle());
    (TestClient::new(app), cache)
}

/// Client over the sample orders.
pub fn client() -> TestClient {
    let source = Arc::new(StaticSource::new(sample_orders()));
    client_with_source(source, settings(&[])).0
}

/// Client whose order source always fails.
pub fn failing_client() -> TestClient {
    let source = Arc::new(UnavailableSource::new("bigquery", "credentials rejected"));
    client_with_source(source, settings(&[])).0
}
