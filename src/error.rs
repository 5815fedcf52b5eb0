//! Custom error types for pocket-ledger
//!
//! Every public operation returns either a value or exactly one of these
//! kinds, so callers can tell "not found" apart from "validation failed".

use thiserror::Error;

use crate::models::{Money, OperationKind};

/// The main error type for ledger operations
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Generic validation failure (empty name, bad date range, ...)
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation amounts must be strictly positive
    #[error("Validation error: amount must be positive, got {0}")]
    InvalidAmount(Money),

    /// Operation kind does not match the kind of its category
    #[error("Validation error: operation kind {operation} does not match category kind {category}")]
    KindMismatch {
        operation: OperationKind,
        category: OperationKind,
    },

    /// Entity not found errors
    #[error("{entity_type} not found: {identifier}")]
    NotFound {
        entity_type: &'static str,
        identifier: String,
    },

    /// Delete blocked by live references
    #[error("Cannot delete {entity_type} {identifier}: referenced by {references} operation(s)")]
    ReferentialIntegrity {
        entity_type: &'static str,
        identifier: String,
        references: usize,
    },

    /// Unsupported format tag or structurally malformed stream
    #[error("Format error: {0}")]
    Format(String),

    /// File I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Store-internal failures (poisoned locks)
    #[error("Storage error: {0}")]
    Storage(String),
}

impl LedgerError {
    /// Create a "not found" error for accounts
    pub fn account_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Account",
            identifier: identifier.to_string(),
        }
    }

    /// Create a "not found" error for categories
    pub fn category_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Category",
            identifier: identifier.to_string(),
        }
    }

    /// Create a "not found" error for operations
    pub fn operation_not_found(identifier: impl ToString) -> Self {
        Self::NotFound {
            entity_type: "Operation",
            identifier: identifier.to_string(),
        }
    }

    /// A total or balance that no longer fits in the cent range
    pub fn amount_out_of_range(what: &str) -> Self {
        Self::Validation(format!("{} out of range", what))
    }

    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if this is a validation error of any flavour
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            Self::Validation(_) | Self::InvalidAmount(_) | Self::KindMismatch { .. }
        )
    }

    /// Check if this is a blocked delete
    pub fn is_referential(&self) -> bool {
        matches!(self, Self::ReferentialIntegrity { .. })
    }

    /// Check if this is a format error
    pub fn is_format(&self) -> bool {
        matches!(self, Self::Format(_))
    }
}

impl From<std::io::Error> for LedgerError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err.to_string())
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        Self::Format(format!("JSON: {}", err))
    }
}

impl From<serde_yaml::Error> for LedgerError {
    fn from(err: serde_yaml::Error) -> Self {
        Self::Format(format!("YAML: {}", err))
    }
}

/// Result type alias for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
