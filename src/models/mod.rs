//! Core data models for pocket-ledger
//!
//! Accounts, categories and operations are immutable values: an update
//! builds a new value under the same ID and replaces the stored one.

pub mod account;
pub mod category;
pub mod ids;
pub mod kind;
pub mod money;
pub mod operation;

use std::fmt;

pub use account::Account;
pub use category::Category;
pub use ids::{AccountId, CategoryId, OperationId};
pub use kind::OperationKind;
pub use money::{Money, MoneyParseError};
pub use operation::Operation;

/// A value that lives in an `EntityStore` under an integer ID
pub trait Entity: Clone {
    type Id: Copy + Ord + fmt::Debug + fmt::Display + From<u32> + Into<u32>;

    /// Name used in error messages ("Account", "Category", ...)
    const ENTITY_TYPE: &'static str;

    fn id(&self) -> Self::Id;
}

/// Name validation failures shared by accounts and categories
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameValidationError {
    #[error("name cannot be empty")]
    EmptyName,
}

/// Names must be non-empty after trimming
pub fn validate_name(name: &str) -> Result<(), NameValidationError> {
    if name.trim().is_empty() {
        return Err(NameValidationError::EmptyName);
    }
    Ok(())
}
