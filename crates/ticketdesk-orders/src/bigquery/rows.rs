//! BigQuery REST payloads and row decoding.
//!
//! Query results arrive in the tabular `{"f": [{"v": ...}]}` form with every
//! scalar encoded as a JSON string, so numeric columns have to be parsed.

use serde::Deserialize;
use serde_json::Value;
use ticketdesk_core::order::DEFAULT_CURRENCY;
use ticketdesk_core::OrderRecord;

use crate::error::OrderSourceError;

/// Response of `jobs.query` and `jobs.getQueryResults`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryResponse {
    #[serde(default)]
    pub job_complete: bool,
    #[serde(default)]
    pub job_reference: Option<JobReference>,
    #[serde(default)]
    pub schema: Option<TableSchema>,
    #[serde(default)]
    pub rows: Vec<TableRow>,
    #[serde(default)]
    pub page_token: Option<String>,
}

/// Identifies a query job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobReference {
    pub project_id: String,
    pub job_id: String,
    #[serde(default)]
    pub location: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableSchema {
    #[serde(default)]
    pub fields: Vec<TableField>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TableField {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct TableRow {
    #[serde(default)]
    pub f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
pub struct TableCell {
    #[serde(default)]
    pub v: Value,
}

/// Column positions of the order fields within a row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnLayout {
    id: usize,
    value: Option<usize>,
    currency: Option<usize>,
}

impl Default for ColumnLayout {
    /// The select-list order of the order query.
    fn default() -> Self {
        Self {
            id: 0,
            value: Some(1),
            currency: Some(2),
        }
    }
}

impl ColumnLayout {
    /// Locates the order columns by name, falling back to select-list order
    /// when no schema was sent.
    pub fn from_schema(schema: Option<&TableSchema>) -> Result<Self, OrderSourceError> {
        let Some(schema) = schema else {
            return Ok(Self::default());
        };

        let position = |name: &str| {
            schema
                .fields
                .iter()
                .position(|f| f.name.eq_ignore_ascii_case(name))
        };

        let id = position("orderLineId")
            .ok_or_else(|| OrderSourceError::decode("result schema has no orderLineId column"))?;

        Ok(Self {
            id,
            value: position("orderValue"),
            currency: position("currency"),
        })
    }

    /// Decodes one row. Rows without an identifier yield `None`.
    pub fn decode(&self, row: &TableRow) -> Result<Option<OrderRecord>, OrderSourceError> {
        let cell = |idx: Option<usize>| idx.and_then(|i| row.f.get(i)).map(|c| &c.v);

        let id = match cell(Some(self.id)) {
            Some(Value::String(s)) if !s.trim().is_empty() => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Ok(None),
        };

        let order_value = match cell(self.value) {
            None | Some(Value::Null) => 0.0,
            Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
            Some(Value::String(s)) => s.trim().parse::<f64>().map_err(|_| {
                OrderSourceError::decode(format!("order {id}: orderValue {s:?} is not a number"))
            })?,
            Some(other) => {
                return Err(OrderSourceError::decode(format!(
                    "order {id}: unexpected orderValue {other}"
                )));
            },
        };

        let currency = match cell(self.currency) {
            Some(Value::String(s)) if !s.is_empty() => s.clone(),
            _ => DEFAULT_CURRENCY.to_string(),
        };

        Ok(Some(OrderRecord::new(id, order_value, currency)))
    }

    /// Decodes a page of rows, skipping those without an identifier.
    pub fn decode_all(&self, rows: &[TableRow]) -> Result<Vec<OrderRecord>, OrderSourceError> {
        let mut records = Vec::with_capacity(rows.len());
        for row in rows {
            if let Some(record) = self.decode(row)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}
