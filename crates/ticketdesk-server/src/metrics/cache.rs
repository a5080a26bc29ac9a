//! Order cache and search metrics.

use metrics::{counter, gauge, histogram};
use std::time::Duration;

use ticketdesk_orders::OrderCache;

/// Registra las metricas de cache.
/// Llamar una vez al inicio para registrar las metricas.
pub fn register_cache_metrics() {
    metrics::describe_gauge!("ticketdesk_orders_cached", "Orders held in the cache");
    metrics::describe_gauge!(
        "ticketdesk_orders_cache_age_seconds",
        "Age of the cached order snapshot"
    );
    metrics::describe_counter!(
        "ticketdesk_orders_refresh_total",
        "Order cache refreshes by outcome"
    );
    metrics::describe_counter!("ticketdesk_order_searches_total", "Order searches served");
    metrics::describe_histogram!(
        "ticketdesk_order_search_seconds",
        "Time spent answering order searches"
    );
}

/// Copies cache bookkeeping into the metrics registry. Called at scrape
/// time, since refreshes also happen outside request handling.
pub fn record_cache_state(cache: &OrderCache) {
    let state = cache.state();
    let totals = state.totals();

    gauge!("ticketdesk_orders_cached").set(cache.len() as f64);
    if let Some(age) = state.age() {
        gauge!("ticketdesk_orders_cache_age_seconds").set(age.as_secs_f64());
    }
    counter!("ticketdesk_orders_refresh_total", "outcome" => "success").absolute(totals.successes);
    counter!("ticketdesk_orders_refresh_total", "outcome" => "failure").absolute(totals.failures);
}

/// Registra una busqueda servida.
pub fn record_search(results: usize, duration: Duration) {
    let outcome = if results == 0 { "empty" } else { "hit" };
    counter!("ticketdesk_order_searches_total", "outcome" => outcome).increment(1);
    histogram!("ticketdesk_order_search_seconds").record(duration.as_secs_f64());
}
