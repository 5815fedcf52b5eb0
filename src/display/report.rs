//! Report formatting for terminal output

use crate::services::{CategoryTotal, PeriodReport};

const WIDTH: usize = 40;

/// Format a period report with per-category breakdowns
pub fn format_period_report(report: &PeriodReport, account_name: Option<&str>) -> String {
    let mut output = String::new();

    let title = match account_name {
        Some(name) => format!("Report for {} ({} to {})", name, report.from, report.to),
        None => format!("Report ({} to {})", report.from, report.to),
    };
    output.push_str(&title);
    output.push('\n');
    output.push_str(&"═".repeat(WIDTH));
    output.push('\n');

    output.push_str(&summary_line("Income", report.income.to_string()));
    output.push_str(&summary_line("Expense", report.expense.to_string()));
    output.push_str(&"─".repeat(WIDTH));
    output.push('\n');
    let net = report
        .net()
        .map_or_else(|| "out of range".to_string(), |n| n.to_string());
    output.push_str(&summary_line("Net", net));

    push_breakdown(&mut output, "Income by category", &report.income_by_category);
    push_breakdown(&mut output, "Expense by category", &report.expense_by_category);

    output
}

fn summary_line(label: &str, amount: String) -> String {
    format!("{:<20}{:>20}\n", label, amount)
}

fn push_breakdown(output: &mut String, title: &str, totals: &[CategoryTotal]) {
    if totals.is_empty() {
        return;
    }

    output.push('\n');
    output.push_str(title);
    output.push('\n');
    for total in totals {
        output.push_str(&format!(
            "  {:<18}{:>20}\n",
            truncate(&total.name, 18),
            total.total.to_string()
        ));
    }
}

/// Truncate a string to a maximum length with ellipsis
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CategoryId, Money};
    use chrono::NaiveDate;

    fn report() -> PeriodReport {
        PeriodReport {
            from: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            to: NaiveDate::from_ymd_opt(2024, 1, 31).unwrap(),
            account: None,
            income: Money::from_cents(100_000),
            expense: Money::from_cents(25_050),
            income_by_category: vec![],
            expense_by_category: vec![CategoryTotal {
                category_id: CategoryId::new(1),
                name: "Groceries and household supplies".into(),
                total: Money::from_cents(25_050),
            }],
        }
    }

    #[test]
    fn test_report_layout() {
        let output = format_period_report(&report(), None);
        assert!(output.starts_with("Report (2024-01-01 to 2024-01-31)\n"));
        assert!(output.contains("Net                               749.50\n"));
        assert!(output.contains("Expense by category\n"));
        assert!(!output.contains("Income by category"));
        assert!(output.contains("Groceries and h..."));
    }

    #[test]
    fn test_report_title_with_account() {
        let output = format_period_report(&report(), Some("Wallet"));
        assert!(output.starts_with("Report for Wallet"));
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("exactly ten", 8), "exact...");
    }
}
