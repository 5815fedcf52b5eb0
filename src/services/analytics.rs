//! Analytics service
//!
//! Read-only aggregations over operations: income and expense totals for a
//! period, net balance, and per-category breakdowns.

use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, CategoryId, Money, Operation, OperationKind};
use crate::storage::Storage;

use super::operation::check_range;

/// Sum of one category's operations within a period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryTotal {
    pub category_id: CategoryId,
    pub name: String,
    pub total: Money,
}

/// Income, expense and their breakdowns for one period
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodReport {
    pub from: NaiveDate,
    pub to: NaiveDate,
    pub account: Option<AccountId>,
    pub income: Money,
    pub expense: Money,
    pub income_by_category: Vec<CategoryTotal>,
    pub expense_by_category: Vec<CategoryTotal>,
}

impl PeriodReport {
    /// Income minus expense; `None` when the difference overflows
    pub fn net(&self) -> Option<Money> {
        self.income.checked_sub(self.expense)
    }
}

/// Service for period reports
pub struct AnalyticsService<'a> {
    storage: &'a Storage,
}

impl<'a> AnalyticsService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Total income across all accounts within `from..=to`
    pub fn total_income(&self, from: NaiveDate, to: NaiveDate) -> LedgerResult<Money> {
        self.total(OperationKind::Income, from, to, None)
    }

    /// Total expense across all accounts within `from..=to`, as a positive amount
    pub fn total_expense(&self, from: NaiveDate, to: NaiveDate) -> LedgerResult<Money> {
        self.total(OperationKind::Expense, from, to, None)
    }

    /// Income minus expense within `from..=to`
    pub fn net_balance(&self, from: NaiveDate, to: NaiveDate) -> LedgerResult<Money> {
        net(self.total_income(from, to)?, self.total_expense(from, to)?)
    }

    /// Income minus expense for one account within `from..=to`
    pub fn net_balance_by_account(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Money> {
        self.ensure_account(account_id)?;
        let income = self.total(OperationKind::Income, from, to, Some(account_id))?;
        let expense = self.total(OperationKind::Expense, from, to, Some(account_id))?;
        net(income, expense)
    }

    pub fn income_by_category(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        account: Option<AccountId>,
    ) -> LedgerResult<Vec<CategoryTotal>> {
        self.by_category(OperationKind::Income, from, to, account)
    }

    pub fn expense_by_category(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        account: Option<AccountId>,
    ) -> LedgerResult<Vec<CategoryTotal>> {
        self.by_category(OperationKind::Expense, from, to, account)
    }

    /// Everything above for one period, optionally limited to one account
    pub fn period_report(
        &self,
        from: NaiveDate,
        to: NaiveDate,
        account: Option<AccountId>,
    ) -> LedgerResult<PeriodReport> {
        if let Some(id) = account {
            self.ensure_account(id)?;
        }

        Ok(PeriodReport {
            from,
            to,
            account,
            income: self.total(OperationKind::Income, from, to, account)?,
            expense: self.total(OperationKind::Expense, from, to, account)?,
            income_by_category: self.income_by_category(from, to, account)?,
            expense_by_category: self.expense_by_category(from, to, account)?,
        })
    }

    fn ensure_account(&self, account_id: AccountId) -> LedgerResult<()> {
        if !self.storage.accounts.exists(account_id)? {
            return Err(LedgerError::account_not_found(account_id));
        }
        Ok(())
    }

    fn matching(
        &self,
        kind: OperationKind,
        from: NaiveDate,
        to: NaiveDate,
        account: Option<AccountId>,
    ) -> LedgerResult<Vec<Operation>> {
        check_range(from, to)?;
        self.storage.operations.filter(|op| {
            op.kind == kind
                && op.falls_within(from, to)
                && account.map_or(true, |id| op.account_id == id)
        })
    }

    fn total(
        &self,
        kind: OperationKind,
        from: NaiveDate,
        to: NaiveDate,
        account: Option<AccountId>,
    ) -> LedgerResult<Money> {
        Money::checked_sum(self.matching(kind, from, to, account)?.iter().map(|op| op.amount))
            .ok_or_else(|| LedgerError::amount_out_of_range("total"))
    }

    fn by_category(
        &self,
        kind: OperationKind,
        from: NaiveDate,
        to: NaiveDate,
        account: Option<AccountId>,
    ) -> LedgerResult<Vec<CategoryTotal>> {
        if let Some(id) = account {
            self.ensure_account(id)?;
        }

        let mut sums: BTreeMap<CategoryId, Money> = BTreeMap::new();
        for op in self.matching(kind, from, to, account)? {
            let sum = sums.entry(op.category_id).or_insert_with(Money::zero);
            *sum = sum
                .checked_add(op.amount)
                .ok_or_else(|| LedgerError::amount_out_of_range("category total"))?;
        }

        let mut totals = Vec::with_capacity(sums.len());
        for (category_id, total) in sums {
            // Operations imported against a missing category are left out
            if let Some(category) = self.storage.categories.get(category_id)? {
                totals.push(CategoryTotal {
                    category_id,
                    name: category.name,
                    total,
                });
            }
        }

        totals.sort_by(|a, b| b.total.cmp(&a.total).then(a.category_id.cmp(&b.category_id)));
        Ok(totals)
    }
}

fn net(income: Money, expense: Money) -> LedgerResult<Money> {
    income
        .checked_sub(expense)
        .ok_or_else(|| LedgerError::amount_out_of_range("net balance"))
}
