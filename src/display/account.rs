//! Account display formatting
//!
//! Formats accounts for terminal output in table and detail views.

use tabled::Tabled;

use super::render_table;
use crate::models::{Account, Money};

#[derive(Tabled)]
struct AccountRow {
    #[tabled(rename = "ID")]
    id: u32,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Balance")]
    balance: Money,
}

/// Format a list of accounts with balances as a table
pub fn format_account_list(accounts: &[Account]) -> String {
    if accounts.is_empty() {
        return "No accounts found.\n".to_string();
    }

    let total = Money::checked_sum(accounts.iter().map(|a| a.balance))
        .map_or_else(|| "out of range".to_string(), |t| t.to_string());
    let rows = accounts
        .iter()
        .map(|a| AccountRow {
            id: a.id.get(),
            name: a.name.clone(),
            balance: a.balance,
        })
        .collect();

    format!("{}Total: {}\n", render_table(rows), total)
}

/// Format a single account's details
pub fn format_account_details(account: &Account, operation_count: usize) -> String {
    let mut output = String::new();

    output.push_str(&format!("Account: {}\n", account.name));
    output.push_str(&format!("  ID:             {}\n", account.id));
    output.push_str(&format!("  Balance:        {}\n", account.balance));
    output.push_str(&format!("  Operations:     {}\n", operation_count));

    output
}
