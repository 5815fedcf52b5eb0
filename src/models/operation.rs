//! Operation model
//!
//! A dated movement of money on one account, filed under one category.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::{AccountId, CategoryId, OperationId};
use super::kind::OperationKind;
use super::money::Money;
use super::Entity;

/// A single income or expense entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Operation {
    /// Unique identifier
    pub id: OperationId,

    /// Income or expense; must equal the category's kind
    pub kind: OperationKind,

    /// Account the money moved on
    pub account_id: AccountId,

    /// Category the operation is filed under
    pub category_id: CategoryId,

    /// Always strictly positive; the kind carries the sign
    pub amount: Money,

    /// Calendar date, serialized as YYYY-MM-DD
    pub date: NaiveDate,

    /// Free text; `None` and `Some("")` are distinct values
    #[serde(default)]
    pub description: Option<String>,
}

impl Operation {
    /// Amount with the sign implied by the kind
    pub fn signed_amount(&self) -> Money {
        match self.kind {
            OperationKind::Income => self.amount,
            OperationKind::Expense => -self.amount,
        }
    }

    /// Inclusive date range check
    pub fn falls_within(&self, from: NaiveDate, to: NaiveDate) -> bool {
        self.date >= from && self.date <= to
    }

    /// Same operation with a new description
    pub fn with_description(&self, description: Option<String>) -> Self {
        Self {
            description,
            ..self.clone()
        }
    }

    /// Same operation filed under another category
    pub fn with_category(&self, category_id: CategoryId) -> Self {
        Self {
            category_id,
            ..self.clone()
        }
    }
}

impl Entity for Operation {
    type Id = OperationId;
    const ENTITY_TYPE: &'static str = "Operation";

    fn id(&self) -> OperationId {
        self.id
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.date, self.kind, self.amount)?;
        if let Some(desc) = &self.description {
            write!(f, " - {}", desc)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lunch() -> Operation {
        Operation {
            id: OperationId::new(1),
            kind: OperationKind::Expense,
            account_id: AccountId::new(1),
            category_id: CategoryId::new(1),
            amount: Money::from_cents(5000),
            date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
            description: None,
        }
    }

    #[test]
    fn test_signed_amount() {
        let op = lunch();
        assert_eq!(op.signed_amount(), Money::from_cents(-5000));

        let income = Operation {
            kind: OperationKind::Income,
            ..lunch()
        };
        assert_eq!(income.signed_amount(), Money::from_cents(5000));
    }

    #[test]
    fn test_falls_within_is_inclusive() {
        let op = lunch();
        let day = NaiveDate::from_ymd_opt(2024, 1, 10).unwrap();
        assert!(op.falls_within(day, day));
        assert!(!op.falls_within(day.succ_opt().unwrap(), day.succ_opt().unwrap()));
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(lunch()).unwrap();
        assert_eq!(json["accountId"], 1);
        assert_eq!(json["categoryId"], 1);
        assert_eq!(json["date"], "2024-01-10");
        assert!(json["description"].is_null());
    }

    #[test]
    fn test_empty_description_survives_json() {
        let op = lunch().with_description(Some(String::new()));
        let json = serde_json::to_string(&op).unwrap();
        let back: Operation = serde_json::from_str(&json).unwrap();
        assert_eq!(back.description, Some(String::new()));
    }
}
