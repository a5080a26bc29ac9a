//! Order records served by the order proxy.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DeskError, Result};

/// Identifier of a single order line in the warehouse.
///
/// # Example
///
/// ```
/// use ticketdesk_core::OrderLineId;
///
/// let id = OrderLineId::new("  ORD-001 ");
/// assert_eq!(id.normalized(), "ORD-001");
/// assert!(id.contains_folded("ord"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderLineId(String);

impl OrderLineId {
    /// Creates a new identifier. The raw value is kept as-is.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the identifier with surrounding whitespace removed.
    pub fn normalized(&self) -> &str {
        self.0.trim()
    }

    /// Returns true if the identifier is blank.
    pub fn is_blank(&self) -> bool {
        self.normalized().is_empty()
    }

    /// Case-insensitive substring test. `needle` must already be lowercase.
    pub fn contains_folded(&self, needle: &str) -> bool {
        self.0.to_lowercase().contains(needle)
    }
}

impl fmt::Display for OrderLineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for OrderLineId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for OrderLineId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single warehouse row describing a purchase line item.
///
/// Records are immutable once fetched; a cache refresh replaces the whole
/// set rather than patching individual rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRecord {
    /// Warehouse identifier of the order line.
    pub order_line_id: OrderLineId,

    /// Monetary value of the line. Missing upstream values become 0.
    #[serde(default)]
    pub order_value: f64,

    /// ISO currency code. Missing upstream values become `GBP`.
    #[serde(default = "default_currency")]
    pub currency: String,
}

/// Currency assumed when the warehouse has none.
pub const DEFAULT_CURRENCY: &str = "GBP";

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl OrderRecord {
    /// Creates a new record.
    pub fn new(
        order_line_id: impl Into<OrderLineId>,
        order_value: f64,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            order_line_id: order_line_id.into(),
            order_value,
            currency: currency.into(),
        }
    }

    /// Checks that the record is usable by the cache.
    pub fn validate(&self) -> Result<()> {
        if self.order_line_id.is_blank() {
            return Err(DeskError::invalid_order(
                self.order_line_id.as_str(),
                "order line id is empty",
            ));
        }
        if !self.order_value.is_finite() {
            return Err(DeskError::invalid_order(
                self.order_line_id.as_str(),
                "order value is not a finite number",
            ));
        }
        Ok(())
    }

    /// Parses a JSON array of records.
    pub fn list_from_json(json: &str) -> Result<Vec<Self>> {
        Ok(serde_json::from_str(json)?)
    }
}
