//! Operation kind shared by categories and operations

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether money flows into (income) or out of (expense) an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OperationKind {
    Income,
    Expense,
}

impl OperationKind {
    /// The literal token used in every snapshot format
    pub const fn as_token(&self) -> &'static str {
        match self {
            Self::Income => "INCOME",
            Self::Expense => "EXPENSE",
        }
    }

    /// Parse a kind token, case-insensitively
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "INCOME" => Some(Self::Income),
            "EXPENSE" => Some(Self::Expense),
            _ => None,
        }
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_token())
    }
}

impl FromStr for OperationKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown operation kind '{}'", s.trim()))
    }
}
