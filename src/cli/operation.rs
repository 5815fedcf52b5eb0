//! Operation CLI commands
//!
//! Adding or deleting an operation does not update the account's stored
//! balance; run `account recalculate` for that.

use chrono::{Local, NaiveDate};
use clap::{Subcommand, ValueEnum};

use super::account::find_account;
use super::category::find_category;
use super::parse_date;
use crate::display::operation::format_operation_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::{Money, Operation, OperationId, OperationKind};
use crate::services::operation::check_range;
use crate::services::{AccountService, CategoryService, CreateOperationInput, OperationService};
use crate::storage::Storage;

/// Operation kind as typed on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum KindArg {
    Income,
    Expense,
}

impl From<KindArg> for OperationKind {
    fn from(kind: KindArg) -> Self {
        match kind {
            KindArg::Income => OperationKind::Income,
            KindArg::Expense => OperationKind::Expense,
        }
    }
}

/// Operation subcommands
#[derive(Subcommand)]
pub enum OperationCommands {
    /// Record an income or expense
    Add {
        /// income or expense; must match the category
        #[arg(value_enum)]
        kind: KindArg,
        /// Account name or ID
        account: String,
        /// Category name or ID
        category: String,
        /// Positive amount (e.g., "50.00")
        amount: String,
        /// Operation date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        /// Free-text description
        #[arg(short = 'm', long)]
        description: Option<String>,
    },
    /// List operations
    List {
        /// Only operations on this account
        #[arg(short, long)]
        account: Option<String>,
        /// Only operations in this category
        #[arg(short, long)]
        category: Option<String>,
        /// Only income or only expense
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
        /// Earliest date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        from: Option<String>,
        /// Latest date (YYYY-MM-DD, inclusive)
        #[arg(long)]
        to: Option<String>,
    },
    /// Set or clear an operation's description
    Describe {
        /// Operation ID
        id: OperationId,
        /// New description (cleared if omitted)
        description: Option<String>,
    },
    /// Move an operation to another category of the same kind
    Recategorize {
        /// Operation ID
        id: OperationId,
        /// Category name or ID
        category: String,
    },
    /// Delete an operation
    Delete {
        /// Operation ID
        id: OperationId,
    },
}

/// Handle an operation command; returns whether the ledger changed
pub fn handle_operation_command(storage: &Storage, cmd: OperationCommands) -> LedgerResult<bool> {
    let service = OperationService::new(storage);
    let accounts = AccountService::new(storage);
    let categories = CategoryService::new(storage);

    match cmd {
        OperationCommands::Add {
            kind,
            account,
            category,
            amount,
            date,
            description,
        } => {
            let account = find_account(&accounts, &account)?;
            let category = find_category(&categories, &category)?;
            let amount = Money::parse(&amount).map_err(|e| {
                LedgerError::Validation(format!(
                    "Invalid amount: '{}'. Use format like '50.00'. Error: {}",
                    amount, e
                ))
            })?;
            let date = match date {
                Some(value) => parse_date(&value)?,
                None => Local::now().date_naive(),
            };

            let operation = service.create(CreateOperationInput {
                kind: kind.into(),
                account_id: account.id,
                category_id: category.id,
                amount,
                date,
                description,
            })?;

            println!("Recorded operation {}: {}", operation.id, operation);
            Ok(true)
        }

        OperationCommands::List {
            account,
            category,
            kind,
            from,
            to,
        } => {
            let mut operations = match &account {
                Some(account) => service.list_by_account(find_account(&accounts, account)?.id)?,
                None => service.list()?,
            };

            if let Some(category) = &category {
                let category_id = find_category(&categories, category)?.id;
                operations.retain(|op| op.category_id == category_id);
            }
            if let Some(kind) = kind {
                let kind = OperationKind::from(kind);
                operations.retain(|op| op.kind == kind);
            }
            filter_dates(&mut operations, from.as_deref(), to.as_deref())?;

            print!(
                "{}",
                format_operation_list(&operations, &accounts.list()?, &categories.list()?)
            );
            Ok(false)
        }

        OperationCommands::Describe { id, description } => {
            let updated = service.update_description(id, description)?;
            match &updated.description {
                Some(text) => println!("Operation {} description: {}", id, text),
                None => println!("Operation {} description cleared", id),
            }
            Ok(true)
        }

        OperationCommands::Recategorize { id, category } => {
            let category = find_category(&categories, &category)?;
            service.change_category(id, category.id)?;
            println!("Operation {} moved to {}", id, category.name);
            Ok(true)
        }

        OperationCommands::Delete { id } => {
            let deleted = service.delete(id)?;
            println!("Deleted operation {}: {}", id, deleted);
            Ok(true)
        }
    }
}

fn filter_dates(
    operations: &mut Vec<Operation>,
    from: Option<&str>,
    to: Option<&str>,
) -> LedgerResult<()> {
    let from = from.map(parse_date).transpose()?.unwrap_or(NaiveDate::MIN);
    let to = to.map(parse_date).transpose()?.unwrap_or(NaiveDate::MAX);
    check_range(from, to)?;
    operations.retain(|op| op.falls_within(from, to));
    Ok(())
}
