//! Metrics module for the order proxy.

pub mod cache;
pub mod http;
pub mod setup;

use metrics_exporter_prometheus::PrometheusHandle;
use ticketdesk_orders::OrderCache;

pub use cache::{record_cache_state, record_search, register_cache_metrics};
pub use http::{http_metrics_middleware, register_http_metrics};
pub use setup::{detached_handle, init_metrics};

/// State of the `/metrics` route.
#[derive(Clone)]
pub struct MetricsState {
    pub prometheus: PrometheusHandle,
    pub cache: OrderCache,
}
