use axum::{Json, extract::State};

use crate::handlers::response::{HealthResponse, RefreshStatus};
use crate::state::AppState;

/// Liveness. Reports `ok` whatever the state of the upstream; refresh
/// failures show up under `refresh`.
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let cache = state.cache();
    Json(HealthResponse::ok(
        cache.cache_info(),
        RefreshStatus::from(cache.state()),
    ))
}
