//! CLI command for period reports

use chrono::{Datelike, Local, NaiveDate};

use super::account::find_account;
use super::parse_date;
use crate::display::report::format_period_report;
use crate::error::LedgerResult;
use crate::services::{AccountService, AnalyticsService};
use crate::storage::Storage;

/// Print income, expense and category breakdowns for a period
///
/// The period defaults to the current month up to today.
pub fn handle_report_command(
    storage: &Storage,
    from: Option<String>,
    to: Option<String>,
    account: Option<String>,
) -> LedgerResult<()> {
    let today = Local::now().date_naive();
    let from = match from {
        Some(value) => parse_date(&value)?,
        None => first_of_month(today),
    };
    let to = match to {
        Some(value) => parse_date(&value)?,
        None => today,
    };

    let account = account
        .map(|identifier| find_account(&AccountService::new(storage), &identifier))
        .transpose()?;

    let report = AnalyticsService::new(storage).period_report(
        from,
        to,
        account.as_ref().map(|a| a.id),
    )?;

    print!(
        "{}",
        format_period_report(&report, account.as_ref().map(|a| a.name.as_str()))
    );
    Ok(())
}

fn first_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}
