//! Category CLI commands

use clap::Subcommand;

use super::operation::KindArg;
use crate::display::category::format_category_list;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Category;
use crate::services::CategoryService;
use crate::storage::Storage;

/// Category subcommands
#[derive(Subcommand)]
pub enum CategoryCommands {
    /// Create a new category
    Create {
        /// Category name
        name: String,
        /// Income or expense; cannot be changed later
        #[arg(short, long, value_enum)]
        kind: KindArg,
    },
    /// List categories
    List {
        /// Only show categories of this kind
        #[arg(short, long, value_enum)]
        kind: Option<KindArg>,
    },
    /// Rename a category
    Rename {
        /// Category name or ID
        category: String,
        /// New name
        new_name: String,
    },
    /// Delete a category that no operation uses
    Delete {
        /// Category name or ID
        category: String,
    },
}

/// Handle a category command; returns whether the ledger changed
pub fn handle_category_command(storage: &Storage, cmd: CategoryCommands) -> LedgerResult<bool> {
    let service = CategoryService::new(storage);

    match cmd {
        CategoryCommands::Create { name, kind } => {
            let category = service.create(kind.into(), &name)?;
            println!("Created category: {}", category);
            println!("  ID: {}", category.id);
            Ok(true)
        }

        CategoryCommands::List { kind } => {
            let categories = match kind {
                Some(kind) => service.list_by_kind(kind.into())?,
                None => service.list()?,
            };
            print!("{}", format_category_list(&categories));
            Ok(false)
        }

        CategoryCommands::Rename { category, new_name } => {
            let found = find_category(&service, &category)?;
            let renamed = service.rename(found.id, &new_name)?;
            println!("Renamed category: {} -> {}", found.name, renamed.name);
            Ok(true)
        }

        CategoryCommands::Delete { category } => {
            let found = find_category(&service, &category)?;
            service.delete(found.id)?;
            println!("Deleted category: {}", found.name);
            Ok(true)
        }
    }
}

pub(crate) fn find_category(
    service: &CategoryService<'_>,
    identifier: &str,
) -> LedgerResult<Category> {
    service
        .find(identifier)?
        .ok_or_else(|| LedgerError::category_not_found(identifier))
}
