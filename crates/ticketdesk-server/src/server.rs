use std::any::Any;
use std::future::Future;
use std::net::SocketAddr;

use axum::{Router, middleware, response::IntoResponse, response::Response, routing::get};
use metrics_exporter_prometheus::PrometheusHandle;
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::error::AppError;
use crate::handlers::{api_test, get_order, health_check, metrics_handler, search_orders};
use crate::metrics::{MetricsState, http_metrics_middleware};
use crate::middleware::{LoggingLayer, RequestIdLayer};
use crate::state::AppState;

/// Creates the router with the given application state and metrics handle.
pub fn create_router(state: AppState, prometheus_handle: PrometheusHandle) -> Router {
    let middleware_stack = ServiceBuilder::new()
        .layer(RequestIdLayer)
        .layer(LoggingLayer);

    // Router for metrics endpoint (different state)
    let metrics_router = Router::new()
        .route("/metrics", get(metrics_handler))
        .with_state(MetricsState {
            prometheus: prometheus_handle,
            cache: state.cache().clone(),
        });

    let app_router = Router::new()
        .route("/health", get(health_check))
        .route("/api/test", get(api_test))
        .route("/api/search/orders", get(search_orders))
        .route("/api/orders/{order_line_id}", get(get_order))
        .with_state(state);

    Router::new()
        .merge(app_router)
        .merge(metrics_router)
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(CorsLayer::permissive())
        .layer(middleware_stack)
}

async fn route_not_found() -> AppError {
    AppError::NotFound {
        error: "Route not found".to_string(),
    }
}

fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let details = if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else if let Some(msg) = panic.downcast_ref::<&str>() {
        msg.to_string()
    } else {
        "unknown panic".to_string()
    };

    error!(details = %details, "Handler panicked");
    AppError::internal("Request failed", details).into_response()
}

/// Binds `addr` and serves until `shutdown` resolves.
pub async fn run_server<F>(
    addr: SocketAddr,
    state: AppState,
    prometheus_handle: PrometheusHandle,
    shutdown: F,
) -> Result<(), std::io::Error>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = create_router(state, prometheus_handle);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
}

/// Resolves on Ctrl+C or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received");
}
