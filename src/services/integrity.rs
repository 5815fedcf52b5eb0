//! Cross-store referential integrity checks
//!
//! Nothing here mutates state. Services call these before touching a store
//! so a failed check never leaves a partial write behind.

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Category, CategoryId, Money, Operation, OperationKind};
use crate::storage::Storage;

/// Read-only view over the stores used to vet mutations
pub struct IntegrityGuard<'a> {
    storage: &'a Storage,
}

impl<'a> IntegrityGuard<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Number of operations booked on an account
    pub fn account_references(&self, id: AccountId) -> LedgerResult<usize> {
        self.storage.operations.count_where(|op| op.account_id == id)
    }

    /// Number of operations filed under a category
    pub fn category_references(&self, id: CategoryId) -> LedgerResult<usize> {
        self.storage.operations.count_where(|op| op.category_id == id)
    }

    pub fn can_delete_account(&self, id: AccountId) -> LedgerResult<bool> {
        Ok(self.account_references(id)? == 0)
    }

    pub fn can_delete_category(&self, id: CategoryId) -> LedgerResult<bool> {
        Ok(self.category_references(id)? == 0)
    }

    /// Fail with ReferentialIntegrity if any operation uses the account
    pub fn ensure_account_deletable(&self, id: AccountId) -> LedgerResult<()> {
        let references = self.account_references(id)?;
        if references > 0 {
            return Err(LedgerError::ReferentialIntegrity {
                entity_type: "Account",
                identifier: id.to_string(),
                references,
            });
        }
        Ok(())
    }

    /// Fail with ReferentialIntegrity if any operation uses the category
    pub fn ensure_category_deletable(&self, id: CategoryId) -> LedgerResult<()> {
        let references = self.category_references(id)?;
        if references > 0 {
            return Err(LedgerError::ReferentialIntegrity {
                entity_type: "Category",
                identifier: id.to_string(),
                references,
            });
        }
        Ok(())
    }

    /// Vet a new operation; returns the category it will be filed under
    pub fn validate_operation_create(
        &self,
        kind: OperationKind,
        account_id: AccountId,
        category_id: CategoryId,
        amount: Money,
    ) -> LedgerResult<Category> {
        if !self.storage.accounts.exists(account_id)? {
            return Err(LedgerError::account_not_found(account_id));
        }

        let category = self
            .storage
            .categories
            .get(category_id)?
            .ok_or_else(|| LedgerError::category_not_found(category_id))?;

        if category.kind != kind {
            return Err(LedgerError::KindMismatch {
                operation: kind,
                category: category.kind,
            });
        }

        if !amount.is_positive() {
            return Err(LedgerError::InvalidAmount(amount));
        }

        Ok(category)
    }

    /// Vet moving an operation to another category
    pub fn validate_category_change(
        &self,
        operation: &Operation,
        new_category_id: CategoryId,
    ) -> LedgerResult<Category> {
        let category = self
            .storage
            .categories
            .get(new_category_id)?
            .ok_or_else(|| LedgerError::category_not_found(new_category_id))?;

        if category.kind != operation.kind {
            return Err(LedgerError::KindMismatch {
                operation: operation.kind,
                category: category.kind,
            });
        }

        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, OperationId};
    use chrono::NaiveDate;

    fn seeded() -> Storage {
        let storage = Storage::new();
        storage
            .accounts
            .create(|id| Account::new(id, "Wallet"))
            .unwrap();
        storage
            .categories
            .create(|id| Category::new(id, OperationKind::Expense, "Food"))
            .unwrap();
        storage
            .categories
            .create(|id| Category::new(id, OperationKind::Income, "Salary"))
            .unwrap();
        storage
    }

    fn expense_on(storage: &Storage) -> Operation {
        storage
            .operations
            .create(|id: OperationId| Operation {
                id,
                kind: OperationKind::Expense,
                account_id: AccountId::new(1),
                category_id: CategoryId::new(1),
                amount: Money::from_cents(5000),
                date: NaiveDate::from_ymd_opt(2024, 1, 10).unwrap(),
                description: None,
            })
            .unwrap()
    }

    #[test]
    fn test_unknown_account_is_not_found() {
        let storage = seeded();
        let guard = IntegrityGuard::new(&storage);
        let err = guard
            .validate_operation_create(
                OperationKind::Expense,
                AccountId::new(9),
                CategoryId::new(1),
                Money::from_cents(100),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_unknown_category_is_not_found() {
        let storage = seeded();
        let guard = IntegrityGuard::new(&storage);
        let err = guard
            .validate_operation_create(
                OperationKind::Expense,
                AccountId::new(1),
                CategoryId::new(9),
                Money::from_cents(100),
            )
            .unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn test_kind_mismatch() {
        let storage = seeded();
        let guard = IntegrityGuard::new(&storage);
        let err = guard
            .validate_operation_create(
                OperationKind::Income,
                AccountId::new(1),
                CategoryId::new(1),
                Money::from_cents(100),
            )
            .unwrap_err();
        assert!(matches!(err, LedgerError::KindMismatch { .. }));
        assert!(err.is_validation());
    }

    #[test]
    fn test_non_positive_amount() {
        let storage = seeded();
        let guard = IntegrityGuard::new(&storage);
        for cents in [0, -100] {
            let err = guard
                .validate_operation_create(
                    OperationKind::Expense,
                    AccountId::new(1),
                    CategoryId::new(1),
                    Money::from_cents(cents),
                )
                .unwrap_err();
            assert!(matches!(err, LedgerError::InvalidAmount(_)));
        }
    }

    #[test]
    fn test_delete_guards() {
        let storage = seeded();
        let guard = IntegrityGuard::new(&storage);
        assert!(guard.can_delete_account(AccountId::new(1)).unwrap());
        assert!(guard.can_delete_category(CategoryId::new(1)).unwrap());

        let op = expense_on(&storage);
        assert!(!guard.can_delete_account(AccountId::new(1)).unwrap());
        assert!(!guard.can_delete_category(CategoryId::new(1)).unwrap());
        assert!(guard.can_delete_category(CategoryId::new(2)).unwrap());

        let err = guard.ensure_account_deletable(AccountId::new(1)).unwrap_err();
        assert!(err.is_referential());

        storage.operations.delete(op.id).unwrap();
        assert!(guard.ensure_account_deletable(AccountId::new(1)).is_ok());
    }

    #[test]
    fn test_category_change_checks_kind() {
        let storage = seeded();
        let guard = IntegrityGuard::new(&storage);
        let op = expense_on(&storage);

        let err = guard
            .validate_category_change(&op, CategoryId::new(2))
            .unwrap_err();
        assert!(matches!(err, LedgerError::KindMismatch { .. }));

        let missing = guard
            .validate_category_change(&op, CategoryId::new(42))
            .unwrap_err();
        assert!(missing.is_not_found());
    }
}
