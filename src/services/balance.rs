//! Balance recomputation
//!
//! An account's stored balance is a cache. `recalculate` derives it from the
//! account's operations; `AccountService::set_balance` overrides it by hand.
//! The two may disagree until the next recalculation.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{AccountId, Money};
use crate::storage::Storage;

/// Derives account balances from operations
pub struct BalanceEngine<'a> {
    storage: &'a Storage,
}

impl<'a> BalanceEngine<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Signed sum of an account's operations, without storing it
    pub fn compute(&self, account_id: AccountId) -> LedgerResult<Money> {
        let operations = self
            .storage
            .operations
            .filter(|op| op.account_id == account_id)?;
        Money::checked_sum(operations.iter().map(|op| op.signed_amount()))
            .ok_or_else(|| LedgerError::amount_out_of_range("balance"))
    }

    /// Recompute the balance, write it to the account and return it
    pub fn recalculate(&self, account_id: AccountId) -> LedgerResult<Money> {
        let account = self
            .storage
            .accounts
            .get(account_id)?
            .ok_or_else(|| LedgerError::account_not_found(account_id))?;

        let balance = self.compute(account_id)?;
        self.storage.accounts.replace(account.with_balance(balance))?;

        info!(account = %account_id, %balance, "balance recalculated");
        Ok(balance)
    }

    /// Recalculate every account; returns how many were updated
    pub fn recalculate_all(&self) -> LedgerResult<usize> {
        let accounts = self.storage.accounts.list()?;
        for account in &accounts {
            self.recalculate(account.id)?;
        }
        Ok(accounts.len())
    }
}
