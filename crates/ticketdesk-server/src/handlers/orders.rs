//! Order search and lookup handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use tracing::{info, instrument, warn};

use crate::error::AppError;
use crate::extractors::SearchParams;
use crate::handlers::response::{OrderResponse, SearchResponse};
use crate::metrics::record_search;
use crate::state::AppState;

/// Handler for GET /api/search/orders.
#[instrument(skip_all, fields(q = %params.query()))]
pub async fn search_orders(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, AppError> {
    let limit = params.limit_or(state.settings().search_default_limit);

    let outcome = state
        .cache()
        .search(params.query(), limit)
        .await
        .map_err(|e| {
            warn!(error = %e, "Order cache is empty and could not be loaded");
            AppError::upstream_unavailable(&e)
        })?;

    record_search(outcome.hits.records.len(), outcome.elapsed);

    info!(
        results = outcome.hits.records.len(),
        total = outcome.cache_info.total_orders,
        "Order search served"
    );

    Ok(Json(SearchResponse::from(outcome)))
}

/// Handler for GET /api/orders/{order_line_id}.
#[instrument(skip_all, fields(order_line_id = %order_line_id))]
pub async fn get_order(
    State(state): State<AppState>,
    Path(order_line_id): Path<String>,
) -> Result<Json<OrderResponse>, AppError> {
    let order = state
        .cache()
        .get_by_id(&order_line_id)
        .ok_or_else(AppError::order_not_found)?;

    Ok(Json(OrderResponse {
        success: true,
        data: order,
    }))
}
