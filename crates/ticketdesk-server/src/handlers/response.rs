//! Response bodies.

use chrono::{DateTime, Utc};
use serde::Serialize;
use ticketdesk_core::OrderRecord;
use ticketdesk_orders::{CacheInfo, CacheState, SearchOutcome, SearchStats};

/// Body de `/health`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub cache_info: CacheInfo,
    pub refresh: RefreshStatus,
}

impl HealthResponse {
    pub fn ok(cache_info: CacheInfo, refresh: RefreshStatus) -> Self {
        Self {
            status: "ok".to_string(),
            message: "Order proxy is running".to_string(),
            cache_info,
            refresh,
        }
    }
}

/// Resultado de los refrescos del cache.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshStatus {
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    pub successes: u64,
    pub failures: u64,
}

impl From<&CacheState> for RefreshStatus {
    fn from(state: &CacheState) -> Self {
        let totals = state.totals();
        Self {
            consecutive_failures: state.failure_count(),
            last_error: state.last_error(),
            successes: totals.successes,
            failures: totals.failures,
        }
    }
}

/// `cacheInfo` de una busqueda, con el tiempo empleado.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCacheInfo {
    #[serde(flatten)]
    pub info: CacheInfo,
    pub search_time_ms: f64,
}

/// Body de `/api/search/orders`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResponse {
    pub success: bool,
    pub data: Vec<OrderRecord>,
    pub count: usize,
    pub suggestions: Vec<String>,
    pub search_stats: SearchStats,
    pub cache_info: SearchCacheInfo,
}

impl From<SearchOutcome> for SearchResponse {
    fn from(outcome: SearchOutcome) -> Self {
        let search_time_ms = outcome.search_time_ms();
        let hits = outcome.hits;
        Self {
            success: true,
            count: hits.records.len(),
            data: hits.records,
            suggestions: hits.suggestions,
            search_stats: hits.stats,
            cache_info: SearchCacheInfo {
                info: outcome.cache_info,
                search_time_ms,
            },
        }
    }
}

/// Body de `/api/orders/{id}`.
#[derive(Debug, Clone, Serialize)]
pub struct OrderResponse {
    pub success: bool,
    pub data: OrderRecord,
}

/// Body de `/api/test`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticResponse {
    pub success: bool,
    pub message: String,
    pub version: String,
    pub timestamp: DateTime<Utc>,
    pub env: DiagnosticEnv,
}

/// Configuracion visible en `/api/test`. Nunca incluye credenciales.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnosticEnv {
    pub has_project_id: bool,
    pub has_credentials: bool,
    pub project_id: String,
    pub credentials_source: String,
    pub order_source: String,
}
