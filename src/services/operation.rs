//! Operation service
//!
//! Books income and expense operations against accounts and categories,
//! queries them, and performs the few edits an operation allows: a new
//! description or a move to another category of the same kind.
//!
//! Creating or deleting an operation does not touch the account's cached
//! balance. Call `BalanceEngine::recalculate` to bring it up to date.

use chrono::NaiveDate;
use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{
    AccountId, CategoryId, Money, Operation, OperationId, OperationKind,
};
use crate::storage::Storage;

use super::integrity::IntegrityGuard;

/// Service for operation management
pub struct OperationService<'a> {
    storage: &'a Storage,
}

/// Input for creating a new operation
#[derive(Debug, Clone)]
pub struct CreateOperationInput {
    pub kind: OperationKind,
    pub account_id: AccountId,
    pub category_id: CategoryId,
    pub amount: Money,
    pub date: NaiveDate,
    pub description: Option<String>,
}

impl<'a> OperationService<'a> {
    /// Create a new operation service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new operation after checking its references, kind and amount
    pub fn create(&self, input: CreateOperationInput) -> LedgerResult<Operation> {
        IntegrityGuard::new(self.storage).validate_operation_create(
            input.kind,
            input.account_id,
            input.category_id,
            input.amount,
        )?;

        let operation = self.storage.operations.create(|id| Operation {
            id,
            kind: input.kind,
            account_id: input.account_id,
            category_id: input.category_id,
            amount: input.amount,
            date: input.date,
            description: input.description,
        })?;

        info!(
            id = %operation.id,
            kind = %operation.kind,
            account = %operation.account_id,
            amount = %operation.amount,
            "operation created"
        );
        Ok(operation)
    }

    pub fn get(&self, id: OperationId) -> LedgerResult<Option<Operation>> {
        self.storage.operations.get(id)
    }

    pub fn require(&self, id: OperationId) -> LedgerResult<Operation> {
        self.storage
            .operations
            .get(id)?
            .ok_or_else(|| LedgerError::operation_not_found(id))
    }

    /// All operations, ordered by ID
    pub fn list(&self) -> LedgerResult<Vec<Operation>> {
        self.storage.operations.list()
    }

    /// Operations booked on an account
    pub fn list_by_account(&self, account_id: AccountId) -> LedgerResult<Vec<Operation>> {
        if !self.storage.accounts.exists(account_id)? {
            return Err(LedgerError::account_not_found(account_id));
        }
        self.storage
            .operations
            .filter(|op| op.account_id == account_id)
    }

    /// Operations filed under a category
    pub fn list_by_category(&self, category_id: CategoryId) -> LedgerResult<Vec<Operation>> {
        if !self.storage.categories.exists(category_id)? {
            return Err(LedgerError::category_not_found(category_id));
        }
        self.storage
            .operations
            .filter(|op| op.category_id == category_id)
    }

    /// Operations dated within `from..=to`
    pub fn list_by_date_range(
        &self,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Vec<Operation>> {
        check_range(from, to)?;
        self.storage.operations.filter(|op| op.falls_within(from, to))
    }

    pub fn list_by_kind(&self, kind: OperationKind) -> LedgerResult<Vec<Operation>> {
        self.storage.operations.filter(|op| op.kind == kind)
    }

    /// Replace the description as given; `None` clears it, while `Some("")`
    /// is kept as an explicitly empty description
    pub fn update_description(
        &self,
        id: OperationId,
        description: Option<String>,
    ) -> LedgerResult<Operation> {
        let operation = self.require(id)?;
        let updated = self
            .storage
            .operations
            .replace(operation.with_description(description))?;

        info!(id = %id, "operation description updated");
        Ok(updated)
    }

    /// Move an operation to another category of the same kind
    pub fn change_category(
        &self,
        id: OperationId,
        category_id: CategoryId,
    ) -> LedgerResult<Operation> {
        let operation = self.require(id)?;
        IntegrityGuard::new(self.storage).validate_category_change(&operation, category_id)?;

        let updated = self
            .storage
            .operations
            .replace(operation.with_category(category_id))?;

        info!(
            id = %id,
            from = %operation.category_id,
            to = %category_id,
            "operation recategorized"
        );
        Ok(updated)
    }

    pub fn delete(&self, id: OperationId) -> LedgerResult<Operation> {
        let operation = self.require(id)?;
        self.storage.operations.delete(id)?;

        info!(id = %id, account = %operation.account_id, "operation deleted");
        Ok(operation)
    }

    /// Sum of an account's income within `from..=to`
    pub fn total_income_by_account(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Money> {
        self.total_by_account(account_id, OperationKind::Income, from, to)
    }

    /// Sum of an account's expenses within `from..=to`, as a positive amount
    pub fn total_expense_by_account(
        &self,
        account_id: AccountId,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Money> {
        self.total_by_account(account_id, OperationKind::Expense, from, to)
    }

    fn total_by_account(
        &self,
        account_id: AccountId,
        kind: OperationKind,
        from: NaiveDate,
        to: NaiveDate,
    ) -> LedgerResult<Money> {
        check_range(from, to)?;
        if !self.storage.accounts.exists(account_id)? {
            return Err(LedgerError::account_not_found(account_id));
        }

        let operations = self.storage.operations.filter(|op| {
            op.account_id == account_id && op.kind == kind && op.falls_within(from, to)
        })?;
        Money::checked_sum(operations.iter().map(|op| op.amount))
            .ok_or_else(|| LedgerError::amount_out_of_range("total"))
    }
}

pub(crate) fn check_range(from: NaiveDate, to: NaiveDate) -> LedgerResult<()> {
    if from > to {
        return Err(LedgerError::Validation(format!(
            "start date {} is after end date {}",
            from, to
        )));
    }
    Ok(())
}
