//! Error types for Ticketdesk.
//!
//! The domain layer is mostly infallible (filtering never fails), so this
//! enum is small: it covers parsing of enumerated values coming from the
//! outside world and malformed order records.
//!
//! # Example
//!
//! ```
//! use ticketdesk_core::{DeskError, TicketStatus};
//!
//! let err = "archived".parse::<TicketStatus>().unwrap_err();
//! assert!(err.is_unknown_value());
//! ```

use thiserror::Error;

/// Main error type for Ticketdesk domain operations.
#[derive(Debug, Error)]
pub enum DeskError {
    /// A textual value did not match any known variant of an enumeration.
    #[error("Unknown {kind} '{value}'")]
    UnknownValue {
        /// What was being parsed (e.g. "ticket status")
        kind: &'static str,
        /// The offending input
        value: String,
    },

    /// An order record failed validation.
    #[error("Invalid order record '{order_line_id}': {reason}")]
    InvalidOrder {
        /// Identifier of the record, possibly empty
        order_line_id: String,
        /// Why it was rejected
        reason: String,
    },

    /// JSON (de)serialization failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl DeskError {
    /// Creates an UnknownValue error.
    pub fn unknown_value(kind: &'static str, value: impl Into<String>) -> Self {
        Self::UnknownValue {
            kind,
            value: value.into(),
        }
    }

    /// Creates an InvalidOrder error.
    pub fn invalid_order(order_line_id: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            order_line_id: order_line_id.into(),
            reason: reason.into(),
        }
    }

    /// Returns true if this error comes from parsing an enumerated value.
    pub fn is_unknown_value(&self) -> bool {
        matches!(self, Self::UnknownValue { .. })
    }

    /// Returns true if this error describes a rejected order record.
    pub fn is_invalid_order(&self) -> bool {
        matches!(self, Self::InvalidOrder { .. })
    }
}

/// Type alias for Results with DeskError.
pub type Result<T> = std::result::Result<T, DeskError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_value_display() {
        let error = DeskError::unknown_value("priority", "urgent");
        let msg = format!("{}", error);

        assert!(msg.contains("priority"));
        assert!(msg.contains("urgent"));
        assert!(error.is_unknown_value());
    }

    #[test]
    fn test_invalid_order_display() {
        let error = DeskError::invalid_order("", "missing identifier");

        assert!(error.is_invalid_order());
        assert!(!error.is_unknown_value());
        assert!(format!("{}", error).contains("missing identifier"));
    }

    #[test]
    fn test_json_error_conversion() {
        let json_error = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error: DeskError = json_error.into();

        assert!(matches!(error, DeskError::Json(_)));
    }
}
