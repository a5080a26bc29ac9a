//! Ticketdesk Server - HTTP proxy over the order cache
//!
//! Serves order search and lookup from an in-memory copy of the warehouse
//! order table, plus health, diagnostic and Prometheus endpoints.

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod server;
pub mod settings;
pub mod state;

pub use error::AppError;
pub use handlers::{HealthResponse, OrderResponse, SearchResponse};
pub use server::{create_router, run_server, shutdown_signal};
pub use settings::{OrderSourceSettings, Settings};
pub use state::AppState;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
