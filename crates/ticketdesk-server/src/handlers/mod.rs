pub mod health;
pub mod info;
pub mod metrics;
pub mod orders;
pub mod response;

pub use health::health_check;
pub use info::api_test;
pub use metrics::metrics_handler;
pub use orders::{get_order, search_orders};
pub use response::{HealthResponse, OrderResponse, RefreshStatus, SearchResponse};
