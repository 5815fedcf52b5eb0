//! Storage layer for pocket-ledger
//!
//! Three volatile entity stores plus file helpers for moving snapshot bytes
//! on and off disk. Nothing here survives a restart on its own; the ledger is
//! rebuilt by importing a snapshot.

pub mod file_io;
pub mod store;

pub use file_io::{read_bytes, write_atomic};
pub use store::EntityStore;

use crate::error::LedgerResult;
use crate::models::{Account, Category, Operation};

/// Main storage coordinator that owns one store per entity type
#[derive(Default)]
pub struct Storage {
    pub accounts: EntityStore<Account>,
    pub categories: EntityStore<Category>,
    pub operations: EntityStore<Operation>,
}

impl Storage {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no entity of any type is stored
    pub fn is_empty(&self) -> LedgerResult<bool> {
        Ok(self.accounts.count()? == 0
            && self.categories.count()? == 0
            && self.operations.count()? == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::AccountId;

    #[test]
    fn test_storage_starts_empty() {
        let storage = Storage::new();
        assert!(storage.is_empty().unwrap());

        storage
            .accounts
            .create(|id: AccountId| Account::new(id, "Wallet"))
            .unwrap();
        assert!(!storage.is_empty().unwrap());
    }

    #[test]
    fn test_stores_have_independent_counters() {
        let storage = Storage::new();
        storage
            .accounts
            .insert(Account::new(AccountId::new(40), "Wallet"))
            .unwrap();
        assert_eq!(storage.accounts.next_id().unwrap().get(), 41);
        assert_eq!(storage.categories.next_id().unwrap().get(), 1);
        assert_eq!(storage.operations.next_id().unwrap().get(), 1);
    }
}
