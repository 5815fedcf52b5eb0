//! Account service
//!
//! Provides business logic for account management: creation, renaming,
//! manual balance overrides, recalculation and guarded deletion.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{validate_name, Account, AccountId, Money};
use crate::storage::Storage;

use super::balance::BalanceEngine;
use super::integrity::IntegrityGuard;

/// Service for account management
pub struct AccountService<'a> {
    storage: &'a Storage,
}

impl<'a> AccountService<'a> {
    /// Create a new account service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new account with a zero balance
    pub fn create(&self, name: &str) -> LedgerResult<Account> {
        let name = clean_name(name, "Account")?;
        let account = self.storage.accounts.create(|id| Account::new(id, name))?;

        info!(id = %account.id, name = %account.name, "account created");
        Ok(account)
    }

    /// Get an account by ID
    pub fn get(&self, id: AccountId) -> LedgerResult<Option<Account>> {
        self.storage.accounts.get(id)
    }

    /// Get an account by ID, failing if absent
    pub fn require(&self, id: AccountId) -> LedgerResult<Account> {
        self.storage
            .accounts
            .get(id)?
            .ok_or_else(|| LedgerError::account_not_found(id))
    }

    /// Find an account by ID string or by name (case-insensitive)
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Account>> {
        if let Ok(id) = identifier.parse::<AccountId>() {
            if let Some(account) = self.storage.accounts.get(id)? {
                return Ok(Some(account));
            }
        }

        let wanted = identifier.trim().to_lowercase();
        Ok(self
            .storage
            .accounts
            .filter(|a| a.name.to_lowercase() == wanted)?
            .into_iter()
            .next())
    }

    /// Get all accounts
    pub fn list(&self) -> LedgerResult<Vec<Account>> {
        self.storage.accounts.list()
    }

    /// Rename an account; the balance is carried over
    pub fn rename(&self, id: AccountId, new_name: &str) -> LedgerResult<Account> {
        let name = clean_name(new_name, "Account")?;
        let account = self.require(id)?;

        let renamed = self.storage.accounts.replace(account.renamed(name))?;
        info!(id = %id, from = %account.name, to = %renamed.name, "account renamed");
        Ok(renamed)
    }

    /// Manually override the cached balance without touching operations
    pub fn set_balance(&self, id: AccountId, balance: Money) -> LedgerResult<Account> {
        let account = self.require(id)?;
        let adjusted = self.storage.accounts.replace(account.with_balance(balance))?;

        info!(id = %id, %balance, "account balance set manually");
        Ok(adjusted)
    }

    /// Recompute the balance from operations
    pub fn recalculate(&self, id: AccountId) -> LedgerResult<Money> {
        BalanceEngine::new(self.storage).recalculate(id)
    }

    /// Delete an account that no operation references
    pub fn delete(&self, id: AccountId) -> LedgerResult<()> {
        if !self.storage.accounts.exists(id)? {
            return Err(LedgerError::account_not_found(id));
        }

        IntegrityGuard::new(self.storage).ensure_account_deletable(id)?;
        self.storage.accounts.delete(id)?;

        info!(id = %id, "account deleted");
        Ok(())
    }

    /// Total of all cached balances
    pub fn total_balance(&self) -> LedgerResult<Money> {
        Money::checked_sum(self.list()?.iter().map(|a| a.balance))
            .ok_or_else(|| LedgerError::amount_out_of_range("total balance"))
    }
}

/// Trim a name and reject it if nothing is left
pub(crate) fn clean_name(name: &str, entity_type: &str) -> LedgerResult<String> {
    validate_name(name)
        .map_err(|e| LedgerError::Validation(format!("{} {}", entity_type, e)))?;
    Ok(name.trim().to_string())
}
