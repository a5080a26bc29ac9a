//! BigQuery-backed order source.

mod client;
mod config;
mod credentials;
mod rows;

pub use client::BigQueryOrderSource;
pub use config::{
    BigQueryConfig, BigQueryConfigBuilder, DEFAULT_API_BASE_URL, DEFAULT_METADATA_URL,
    DEFAULT_ROW_LIMIT,
};
pub use credentials::{CredentialSource, TokenProvider};
pub use rows::{ColumnLayout, QueryResponse};
