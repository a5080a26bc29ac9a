//! Order source backed by a JSON file.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use ticketdesk_core::OrderRecord;
use tracing::debug;

use super::OrderSource;
use crate::error::OrderSourceError;

/// Reads order records from a JSON array on disk.
///
/// The file is re-read on every fetch so edits show up on the next refresh.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    /// Creates a source for the given file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the file path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl OrderSource for JsonFileSource {
    async fn fetch_orders(&self) -> Result<Vec<OrderRecord>, OrderSourceError> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|e| OrderSourceError::io(&self.path, e))?;

        let records = OrderRecord::list_from_json(&raw)
            .map_err(|e| OrderSourceError::decode(format!("{}: {e}", self.path.display())))?;

        for record in &records {
            record
                .validate()
                .map_err(|e| OrderSourceError::decode(e.to_string()))?;
        }

        debug!(path = %self.path.display(), count = records.len(), "Loaded orders from file");
        Ok(records)
    }

    async fn health_check(&self) -> Result<(), OrderSourceError> {
        match tokio::fs::metadata(&self.path).await {
            Ok(meta) if meta.is_file() => Ok(()),
            Ok(_) => Err(OrderSourceError::unavailable(format!(
                "{} is not a file",
                self.path.display()
            ))),
            Err(e) => Err(OrderSourceError::io(&self.path, e)),
        }
    }

    fn name(&self) -> &str {
        "json-file"
    }
}
