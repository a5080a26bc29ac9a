//! Diagnostic endpoint.

use axum::{Json, extract::State};
use chrono::Utc;

use crate::handlers::response::{DiagnosticEnv, DiagnosticResponse};
use crate::state::AppState;

/// Handler for GET /api/test. Never calls the upstream.
pub async fn api_test(State(state): State<AppState>) -> Json<DiagnosticResponse> {
    let settings = state.settings();

    Json(DiagnosticResponse {
        success: true,
        message: "API is working!".to_string(),
        version: crate::version().to_string(),
        timestamp: Utc::now(),
        env: DiagnosticEnv {
            has_project_id: settings.has_project_id(),
            has_credentials: settings.has_credentials(),
            project_id: settings.project_id().to_string(),
            credentials_source: settings.credentials_env_var().to_string(),
            order_source: state.cache().source_name().to_string(),
        },
    })
}
