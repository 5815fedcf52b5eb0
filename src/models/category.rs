//! Category model
//!
//! A category is typed once at creation; its kind never changes afterwards.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::CategoryId;
use super::kind::OperationKind;
use super::Entity;

/// An income or expense category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Income or expense; every operation filed here must share it
    pub kind: OperationKind,

    /// Category name
    pub name: String,
}

impl Category {
    /// Create a new category
    pub fn new(id: CategoryId, kind: OperationKind, name: impl Into<String>) -> Self {
        Self {
            id,
            kind,
            name: name.into(),
        }
    }

    /// Same category under a new name; the kind is carried over unchanged
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;
    const ENTITY_TYPE: &'static str = "Category";

    fn id(&self) -> CategoryId {
        self.id
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.kind)
    }
}
