//! # Ticketdesk Orders
//!
//! Order cache and search for the Ticketdesk order proxy.
//!
//! Order records live in a data warehouse table that is too slow to query
//! interactively. This crate keeps an in-memory copy, refreshed on a timer,
//! and answers substring searches against it.
//!
//! ## Features
//!
//! - Async trait-based order source abstraction
//! - BigQuery REST source with query polling and result paging
//! - JSON file source for local development
//! - Stale-while-refresh cache with ordered snapshot replacement
//! - Background refresh scheduler with a cancellation handle
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use ticketdesk_orders::{JsonFileSource, OrderCache, RefreshScheduler};
//!
//! let source = Arc::new(JsonFileSource::new("orders.json"));
//! let cache = OrderCache::new(source, Duration::from_secs(300));
//! cache.refresh().await?;
//!
//! let handle = RefreshScheduler::with_defaults(cache.clone()).start();
//! let outcome = cache.search("ord", 50).await?;
//! handle.shutdown().await;
//! ```

pub mod bigquery;
pub mod cache;
pub mod error;
pub mod source;
pub mod sync;

#[cfg(test)]
mod testing;

// Re-exports
pub use bigquery::{BigQueryConfig, BigQueryOrderSource, CredentialSource};
pub use cache::{CacheInfo, CacheState, OrderCache, SearchHits, SearchOutcome, SearchStats};
pub use error::OrderSourceError;
pub use source::{JsonFileSource, OrderSource, UnavailableSource};
pub use sync::{RefreshConfig, RefreshHandle, RefreshScheduler};

// Re-export ticketdesk_core for consumers
pub use ticketdesk_core;
