//! Order source trait definition.

use async_trait::async_trait;
use ticketdesk_core::OrderRecord;

use crate::error::OrderSourceError;

/// A source of order records.
///
/// The cache only ever asks for the full row set; implementors decide how
/// to bound it.
///
/// # Implementors
///
/// - `BigQueryOrderSource` - runs the order query against BigQuery
/// - `JsonFileSource` - reads a JSON array from disk
#[async_trait]
pub trait OrderSource: Send + Sync {
    /// Fetches the complete set of order records.
    ///
    /// # Errors
    ///
    /// - `OrderSourceError::Credentials` if no access token can be obtained
    /// - `OrderSourceError::UpstreamStatus` if the upstream rejects the request
    /// - `OrderSourceError::Decode` if the payload cannot be turned into records
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, OrderSourceError>;

    /// Verifies that the source is reachable and properly configured.
    /// Run by [`OrderCache::warm_up`](crate::OrderCache::warm_up) before the first load.
    async fn health_check(&self) -> Result<(), OrderSourceError>;

    /// Returns the name of this source, used for logging and `cacheInfo`.
    fn name(&self) -> &str;
}
