//! BigQuery source configuration.

use std::time::Duration;

use super::credentials::CredentialSource;
use crate::error::OrderSourceError;

/// Public REST endpoint of the BigQuery v2 API.
pub const DEFAULT_API_BASE_URL: &str = "https://bigquery.googleapis.com/bigquery/v2";

/// Base URL of the GCE metadata server.
pub const DEFAULT_METADATA_URL: &str = "http://metadata.google.internal";

/// Default cap on the number of rows pulled per refresh.
pub const DEFAULT_ROW_LIMIT: u32 = 10_000;

/// Configuration for the BigQuery order source.
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    project_id: String,
    dataset_id: String,
    table_id: String,
    row_limit: u32,
    timeout: Duration,
    api_base_url: String,
    metadata_url: String,
    credentials: CredentialSource,
}

impl BigQueryConfig {
    /// Creates a new builder for BigQueryConfig.
    pub fn builder() -> BigQueryConfigBuilder {
        BigQueryConfigBuilder::default()
    }

    /// Returns the project the query runs in.
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Returns the dataset holding the order table.
    pub fn dataset_id(&self) -> &str {
        &self.dataset_id
    }

    /// Returns the order table name.
    pub fn table_id(&self) -> &str {
        &self.table_id
    }

    /// Returns the maximum number of rows fetched per refresh.
    pub fn row_limit(&self) -> u32 {
        self.row_limit
    }

    /// Returns the per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Returns the API base URL without a trailing slash.
    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    /// Returns the metadata server base URL.
    pub fn metadata_url(&self) -> &str {
        &self.metadata_url
    }

    /// Returns where access tokens come from.
    pub fn credentials(&self) -> &CredentialSource {
        &self.credentials
    }

    /// Fully qualified table reference, e.g. `project.dataset.table`.
    pub fn table_ref(&self) -> String {
        format!("{}.{}.{}", self.project_id, self.dataset_id, self.table_id)
    }

    /// Builds the order query in standard SQL.
    pub fn query(&self) -> String {
        format!(
            "SELECT DISTINCT order_line_id AS orderLineId, \
             CAST(COALESCE(orderValue, 0) AS FLOAT64) AS orderValue, \
             COALESCE(currency, 'GBP') AS currency \
             FROM `{}` \
             WHERE order_line_id IS NOT NULL \
             LIMIT {}",
            self.table_ref(),
            self.row_limit
        )
    }
}

/// Builder for BigQueryConfig.
#[derive(Debug, Default)]
pub struct BigQueryConfigBuilder {
    project_id: Option<String>,
    dataset_id: Option<String>,
    table_id: Option<String>,
    row_limit: Option<u32>,
    timeout: Option<Duration>,
    api_base_url: Option<String>,
    metadata_url: Option<String>,
    credentials: Option<CredentialSource>,
}

impl BigQueryConfigBuilder {
    /// Sets the project id.
    pub fn project_id(mut self, id: impl Into<String>) -> Self {
        self.project_id = Some(id.into());
        self
    }

    /// Sets the dataset id.
    pub fn dataset_id(mut self, id: impl Into<String>) -> Self {
        self.dataset_id = Some(id.into());
        self
    }

    /// Sets the table id.
    pub fn table_id(mut self, id: impl Into<String>) -> Self {
        self.table_id = Some(id.into());
        self
    }

    /// Sets the row cap.
    pub fn row_limit(mut self, limit: u32) -> Self {
        self.row_limit = Some(limit);
        self
    }

    /// Sets the per-request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Overrides the API base URL.
    pub fn api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = Some(url.into());
        self
    }

    /// Overrides the metadata server URL.
    pub fn metadata_url(mut self, url: impl Into<String>) -> Self {
        self.metadata_url = Some(url.into());
        self
    }

    /// Sets the credential source.
    pub fn credentials(mut self, credentials: CredentialSource) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Builds the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an identifier is missing or contains characters
    /// that are not allowed in a table reference, or if the row limit or
    /// timeout is zero.
    pub fn build(self) -> Result<BigQueryConfig, OrderSourceError> {
        let project_id = required_identifier("project_id", self.project_id)?;
        let dataset_id = required_identifier("dataset_id", self.dataset_id)?;
        let table_id = required_identifier("table_id", self.table_id)?;

        let row_limit = self.row_limit.unwrap_or(DEFAULT_ROW_LIMIT);
        if row_limit == 0 {
            return Err(OrderSourceError::InvalidConfig(
                "row_limit must be greater than zero".to_string(),
            ));
        }

        let timeout = self.timeout.unwrap_or(Duration::from_secs(30));
        if timeout.is_zero() {
            return Err(OrderSourceError::InvalidConfig(
                "timeout must be greater than zero".to_string(),
            ));
        }

        Ok(BigQueryConfig {
            project_id,
            dataset_id,
            table_id,
            row_limit,
            timeout,
            api_base_url: trim_url(self.api_base_url, DEFAULT_API_BASE_URL),
            metadata_url: trim_url(self.metadata_url, DEFAULT_METADATA_URL),
            credentials: self.credentials.unwrap_or(CredentialSource::MetadataServer),
        })
    }
}

fn required_identifier(
    field: &str,
    value: Option<String>,
) -> Result<String, OrderSourceError> {
    let value = value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| OrderSourceError::InvalidConfig(format!("{field} is required")))?;

    let valid = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | ':'));
    if !valid {
        return Err(OrderSourceError::InvalidConfig(format!(
            "{field} contains invalid characters: {value}"
        )));
    }

    Ok(value)
}

fn trim_url(url: Option<String>, default: &str) -> String {
    url.unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
