//! Metrics setup and initialization.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tracing::info;

use super::{register_cache_metrics, register_http_metrics};

/// Histogram buckets, in seconds. Order searches sit at the low end,
/// upstream-bound requests at the high end.
const BUCKETS: &[f64] = &[
    0.0001, 0.0005, 0.001, 0.0025, 0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
    30.0,
];

/// Inicializa el sistema de metricas y retorna el handle para el endpoint.
///
/// Installs the global recorder, so it can only succeed once per process.
pub fn init_metrics() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets(BUCKETS)?
        .install_recorder()?;

    register_http_metrics();
    register_cache_metrics();

    info!("Metrics system initialized");
    Ok(handle)
}

/// Builds a handle without installing it globally. Nothing is recorded
/// through it; used where the global recorder is not wanted.
pub fn detached_handle() -> PrometheusHandle {
    PrometheusBuilder::new().build_recorder().handle()
}
