//! Operation display formatting
//!
//! Operations reference accounts and categories by ID; the list view
//! resolves those IDs to names where it can.

use std::collections::HashMap;

use tabled::Tabled;

use super::render_table;
use crate::models::{Account, AccountId, Category, CategoryId, Money, Operation, OperationKind};

#[derive(Tabled)]
struct OperationRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Date")]
    date: String,
    #[tabled(rename = "Kind")]
    kind: OperationKind,
    #[tabled(rename = "Account")]
    account: String,
    #[tabled(rename = "Category")]
    category: String,
    #[tabled(rename = "Amount")]
    amount: Money,
    #[tabled(rename = "Description")]
    description: String,
}

/// Format operations as a table, newest last
pub fn format_operation_list(
    operations: &[Operation],
    accounts: &[Account],
    categories: &[Category],
) -> String {
    if operations.is_empty() {
        return "No operations found.\n".to_string();
    }

    let account_names: HashMap<AccountId, &str> =
        accounts.iter().map(|a| (a.id, a.name.as_str())).collect();
    let category_names: HashMap<CategoryId, &str> =
        categories.iter().map(|c| (c.id, c.name.as_str())).collect();

    let mut sorted: Vec<&Operation> = operations.iter().collect();
    sorted.sort_by_key(|op| (op.date, op.id));

    let rows = sorted
        .into_iter()
        .map(|op| OperationRow {
            id: op.id.get(),
            date: op.date.format("%Y-%m-%d").to_string(),
            kind: op.kind,
            account: name_or_id(account_names.get(&op.account_id), op.account_id),
            category: name_or_id(category_names.get(&op.category_id), op.category_id),
            amount: op.signed_amount(),
            description: op.description.clone().unwrap_or_default(),
        })
        .collect();

    render_table(rows)
}

fn name_or_id(name: Option<&&str>, id: impl std::fmt::Display) -> String {
    match name {
        Some(name) => name.to_string(),
        None => format!("#{}", id),
    }
}
