//! HTTP metrics middleware.

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{Request, StatusCode},
    middleware::Next,
    response::Response,
};
use metrics::{counter, gauge, histogram};
use std::time::Instant;

const REQUESTS_TOTAL: &str = "ticketdesk_http_requests_total";
const REQUEST_SECONDS: &str = "ticketdesk_http_request_duration_seconds";
const IN_FLIGHT: &str = "ticketdesk_http_requests_in_flight";

/// Label de ruta: la plantilla registrada, o `unmatched`.
fn route_label(matched: Option<&MatchedPath>) -> String {
    matched.map_or_else(|| "unmatched".to_string(), |p| p.as_str().to_string())
}

/// Agrupa el status en `2xx`, `4xx`, `5xx`, etc.
fn status_class(status: StatusCode) -> &'static str {
    match status.as_u16() {
        100..=199 => "1xx",
        200..=299 => "2xx",
        300..=399 => "3xx",
        400..=499 => "4xx",
        _ => "5xx",
    }
}

/// Cuenta y mide cada request por ruta, metodo y clase de status.
pub async fn http_metrics_middleware(
    matched_path: Option<MatchedPath>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let route = route_label(matched_path.as_ref());
    let method = request.method().as_str().to_owned();

    let in_flight = gauge!(IN_FLIGHT);
    in_flight.increment(1.0);
    let started = Instant::now();

    let response = next.run(request).await;

    in_flight.decrement(1.0);
    histogram!(REQUEST_SECONDS, "method" => method.clone(), "path" => route.clone())
        .record(started.elapsed().as_secs_f64());
    counter!(
        REQUESTS_TOTAL,
        "method" => method,
        "path" => route,
        "status" => status_class(response.status())
    )
    .increment(1);

    response
}

/// Registra las metricas HTTP.
pub fn register_http_metrics() {
    metrics::describe_counter!(REQUESTS_TOTAL, "HTTP requests by route, method and status class");
    metrics::describe_histogram!(REQUEST_SECONDS, "HTTP request duration in seconds");
    metrics::describe_gauge!(IN_FLIGHT, "HTTP requests currently being served");
}
