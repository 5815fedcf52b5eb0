//! Display formatting for terminal output
//!
//! List views are rendered as tables; detail views and reports are plain
//! aligned text.

pub mod account;
pub mod category;
pub mod operation;
pub mod report;

pub use account::{format_account_details, format_account_list};
pub use category::format_category_list;
pub use operation::format_operation_list;
pub use report::format_period_report;

use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Render rows with the shared table style
pub(crate) fn render_table<T: Tabled>(rows: Vec<T>) -> String {
    let mut table = Table::new(rows);
    table.with(Style::psql());
    format!("{}\n", table)
}
