//! Ticketdesk order proxy binary.

use std::sync::Arc;

use anyhow::Context;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};
use ticketdesk_orders::{
    BigQueryOrderSource, JsonFileSource, OrderCache, OrderSource, RefreshConfig, RefreshScheduler,
    UnavailableSource,
};
use ticketdesk_server::metrics::init_metrics;
use ticketdesk_server::{AppState, OrderSourceSettings, Settings, run_server, shutdown_signal};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::from_env().context("invalid configuration")?;
    let addr = settings
        .addr()
        .with_context(|| format!("invalid bind address {}:{}", settings.host, settings.port))?;

    info!("Starting Ticketdesk order proxy v{}", env!("CARGO_PKG_VERSION"));
    info!(?settings, "Loaded settings");

    let prometheus = init_metrics().context("failed to initialize metrics")?;

    let source = build_source(&settings);
    let cache = OrderCache::new(source, settings.cache_duration());

    // A failed warm-up is not fatal: the first search retries the load
    match cache.warm_up().await {
        Ok(report) => info!(records = report.records, "Initial order load complete"),
        Err(e) => warn!(
            error = %e,
            "Initial order load failed; order search will retry on first request"
        ),
    }

    let scheduler = RefreshScheduler::new(
        cache.clone(),
        RefreshConfig {
            interval: settings.cache_duration(),
        },
    )
    .start();

    let state = AppState::new(cache, settings);
    let served = run_server(addr, state, prometheus, shutdown_signal()).await;

    scheduler.shutdown().await;
    info!("Refresh scheduler stopped");

    served.with_context(|| format!("server on {addr} failed"))
}

/// Builds the configured order source. Setup errors leave the service
/// running with a source that reports them on every fetch.
fn build_source(settings: &Settings) -> Arc<dyn OrderSource> {
    match settings.order_source() {
        Ok(OrderSourceSettings::File(path)) => {
            info!(path = %path.display(), "Serving orders from local file");
            Arc::new(JsonFileSource::new(path))
        },
        Ok(OrderSourceSettings::BigQuery(config)) => match BigQueryOrderSource::new(config) {
            Ok(source) => Arc::new(source),
            Err(e) => {
                error!(error = %e, "BigQuery source could not be set up");
                Arc::new(UnavailableSource::new("bigquery", e.to_string()))
            },
        },
        Err(e) => {
            error!(error = %e, "Order source configuration is invalid");
            Arc::new(UnavailableSource::new("bigquery", e.to_string()))
        },
    }
}
