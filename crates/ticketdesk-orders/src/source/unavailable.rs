//! Placeholder source used when the real one could not be set up.

use async_trait::async_trait;
use ticketdesk_core::OrderRecord;

use super::OrderSource;
use crate::error::OrderSourceError;

/// Fails every fetch with the setup error, so the service can still start
/// and report why orders are missing.
#[derive(Debug, Clone)]
pub struct UnavailableSource {
    name: String,
    reason: String,
}

impl UnavailableSource {
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }
}

#[async_trait]
impl OrderSource for UnavailableSource {
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, OrderSourceError> {
        Err(OrderSourceError::unavailable(self.reason.clone()))
    }

    async fn health_check(&self) -> Result<(), OrderSourceError> {
        Err(OrderSourceError::unavailable(self.reason.clone()))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
