//! Account CLI commands
//!
//! Implements CLI commands for account management.

use clap::Subcommand;

use crate::display::account::{format_account_details, format_account_list};
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Account, Money};
use crate::services::{AccountService, BalanceEngine, IntegrityGuard};
use crate::storage::Storage;

/// Account subcommands
#[derive(Subcommand)]
pub enum AccountCommands {
    /// Create a new account with a zero balance
    Create {
        /// Account name
        name: String,
    },
    /// List all accounts
    List,
    /// Show account details
    Show {
        /// Account name or ID
        account: String,
    },
    /// Rename an account
    Rename {
        /// Account name or ID
        account: String,
        /// New name
        new_name: String,
    },
    /// Override the stored balance without touching operations
    SetBalance {
        /// Account name or ID
        account: String,
        /// New balance (e.g., "1000.00" or "-25.5")
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Recompute balances from operations
    Recalculate {
        /// Account name or ID (all accounts if omitted)
        account: Option<String>,
    },
    /// Delete an account that has no operations
    Delete {
        /// Account name or ID
        account: String,
    },
}

/// Handle an account command; returns whether the ledger changed
pub fn handle_account_command(storage: &Storage, cmd: AccountCommands) -> LedgerResult<bool> {
    let service = AccountService::new(storage);

    match cmd {
        AccountCommands::Create { name } => {
            let account = service.create(&name)?;
            println!("Created account: {}", account.name);
            println!("  ID: {}", account.id);
            Ok(true)
        }

        AccountCommands::List => {
            print!("{}", format_account_list(&service.list()?));
            Ok(false)
        }

        AccountCommands::Show { account } => {
            let found = find_account(&service, &account)?;
            let references = IntegrityGuard::new(storage).account_references(found.id)?;
            print!("{}", format_account_details(&found, references));
            Ok(false)
        }

        AccountCommands::Rename { account, new_name } => {
            let found = find_account(&service, &account)?;
            let renamed = service.rename(found.id, &new_name)?;
            println!("Renamed account: {} -> {}", found.name, renamed.name);
            Ok(true)
        }

        AccountCommands::SetBalance { account, amount } => {
            let found = find_account(&service, &account)?;
            let balance = Money::parse(&amount).map_err(|e| {
                LedgerError::Validation(format!(
                    "Invalid amount: '{}'. Use format like '1000.00' or '1000'. Error: {}",
                    amount, e
                ))
            })?;

            let updated = service.set_balance(found.id, balance)?;
            println!("Balance of {} set to {}", updated.name, updated.balance);
            Ok(true)
        }

        AccountCommands::Recalculate { account: Some(account) } => {
            let found = find_account(&service, &account)?;
            let balance = service.recalculate(found.id)?;
            println!("Balance of {} recalculated: {}", found.name, balance);
            Ok(true)
        }

        AccountCommands::Recalculate { account: None } => {
            let count = BalanceEngine::new(storage).recalculate_all()?;
            println!("Recalculated {} account(s)", count);
            Ok(true)
        }

        AccountCommands::Delete { account } => {
            let found = find_account(&service, &account)?;
            service.delete(found.id)?;
            println!("Deleted account: {}", found.name);
            Ok(true)
        }
    }
}

pub(crate) fn find_account(service: &AccountService<'_>, identifier: &str) -> LedgerResult<Account> {
    service
        .find(identifier)?
        .ok_or_else(|| LedgerError::account_not_found(identifier))
}
