//! Account model
//!
//! An account holds a cached balance that can always be recomputed from its
//! operations. Updates never mutate a stored account; they build a new value
//! under the same ID.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ids::AccountId;
use super::money::Money;
use super::Entity;

/// A bank account, wallet, or any other place money lives
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Unique identifier
    pub id: AccountId,

    /// Display name, non-empty after trimming
    pub name: String,

    /// Cached balance; see `BalanceEngine`
    pub balance: Money,
}

impl Account {
    /// Create a new account with a zero balance
    pub fn new(id: AccountId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            balance: Money::zero(),
        }
    }

    /// Same account under a new name, balance preserved
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..self.clone()
        }
    }

    /// Same account with a different cached balance
    pub fn with_balance(&self, balance: Money) -> Self {
        Self {
            balance,
            ..self.clone()
        }
    }
}

impl Entity for Account {
    type Id = AccountId;
    const ENTITY_TYPE: &'static str = "Account";

    fn id(&self) -> AccountId {
        self.id
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
