//! Metrics endpoint handler.

use axum::{extract::State, response::IntoResponse};

use crate::metrics::{MetricsState, record_cache_state};

/// Handler para el endpoint /metrics
pub async fn metrics_handler(State(metrics): State<MetricsState>) -> impl IntoResponse {
    record_cache_state(&metrics.cache);
    metrics.prometheus.render()
}
