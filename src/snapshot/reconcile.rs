//! Applying a decoded snapshot to live storage
//!
//! Overwrite clears the ledger children-first (operations, categories,
//! accounts) and then inserts parents-first. Merge skips the clearing step;
//! a snapshot entity whose ID already exists replaces the stored one.
//!
//! Records are applied as given. There is no cross-store transaction: if a
//! store fails partway through, the entities applied so far stay applied.

use std::fmt;

use tracing::info;

use super::Snapshot;
use crate::error::{LedgerError, LedgerResult};
use crate::models::Entity;
use crate::storage::{EntityStore, Storage};

/// How a snapshot meets existing data
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ApplyMode {
    /// Replace the whole ledger with the snapshot
    #[default]
    Overwrite,
    /// Insert alongside existing data; matching IDs are replaced
    Merge,
}

impl fmt::Display for ApplyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Overwrite => write!(f, "overwrite"),
            Self::Merge => write!(f, "merge"),
        }
    }
}

/// Counts of what an apply did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ApplySummary {
    pub mode: ApplyMode,
    pub accounts_removed: usize,
    pub categories_removed: usize,
    pub operations_removed: usize,
    pub accounts_applied: usize,
    pub categories_applied: usize,
    pub operations_applied: usize,
    /// Entities that replaced an existing entry with the same ID (merge only)
    pub replaced: usize,
}

impl ApplySummary {
    pub fn total_applied(&self) -> usize {
        self.accounts_applied + self.categories_applied + self.operations_applied
    }
}

impl fmt::Display for ApplySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} account(s), {} category(ies), {} operation(s)",
            self.mode, self.accounts_applied, self.categories_applied, self.operations_applied
        )?;
        if self.replaced > 0 {
            write!(f, ", {} replaced", self.replaced)?;
        }
        Ok(())
    }
}

/// Applies snapshots to a [`Storage`]
pub struct Reconciler<'a> {
    storage: &'a Storage,
}

impl<'a> Reconciler<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    pub fn apply(&self, snapshot: &Snapshot, mode: ApplyMode) -> LedgerResult<ApplySummary> {
        let mut summary = ApplySummary {
            mode,
            ..ApplySummary::default()
        };

        if mode == ApplyMode::Overwrite {
            summary.operations_removed = clear(&self.storage.operations)?;
            summary.categories_removed = clear(&self.storage.categories)?;
            summary.accounts_removed = clear(&self.storage.accounts)?;
        }

        let (applied, replaced) = insert_all(&self.storage.accounts, &snapshot.accounts)?;
        summary.accounts_applied = applied;
        summary.replaced += replaced;

        let (applied, replaced) = insert_all(&self.storage.categories, &snapshot.categories)?;
        summary.categories_applied = applied;
        summary.replaced += replaced;

        let (applied, replaced) = insert_all(&self.storage.operations, &snapshot.operations)?;
        summary.operations_applied = applied;
        summary.replaced += replaced;

        info!(
            %mode,
            accounts = summary.accounts_applied,
            categories = summary.categories_applied,
            operations = summary.operations_applied,
            replaced = summary.replaced,
            "snapshot applied"
        );
        Ok(summary)
    }
}

fn clear<T: Entity>(store: &EntityStore<T>) -> LedgerResult<usize> {
    let existing = store.list()?;
    for entity in &existing {
        if !store.delete(entity.id())? {
            return Err(LedgerError::Storage(format!(
                "{} {} vanished during overwrite",
                T::ENTITY_TYPE,
                entity.id()
            )));
        }
    }
    Ok(existing.len())
}

/// Insert under explicit IDs; returns (inserted, replaced)
fn insert_all<T: Entity>(store: &EntityStore<T>, entities: &[T]) -> LedgerResult<(usize, usize)> {
    let mut replaced = 0;
    for entity in entities {
        if store.exists(entity.id())? {
            replaced += 1;
        }
        store.insert(entity.clone())?;
    }
    Ok((entities.len(), replaced))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Account, AccountId, CategoryId, Money, OperationKind};
    use crate::services::{AccountService, CategoryService};
    use crate::snapshot::{fixtures, CsvCodec, SnapshotCodec};

    fn populated() -> Storage {
        let storage = Storage::new();
        let accounts = AccountService::new(&storage);
        accounts.create("Old A").unwrap();
        accounts.create("Old B").unwrap();
        CategoryService::new(&storage)
            .create(OperationKind::Income, "Old income")
            .unwrap();
        storage
    }

    #[test]
    fn test_overwrite_replaces_everything() {
        let storage = populated();
        let snapshot = fixtures::sample();

        let summary = Reconciler::new(&storage)
            .apply(&snapshot, ApplyMode::Overwrite)
            .unwrap();

        assert_eq!(summary.accounts_removed, 2);
        assert_eq!(summary.categories_removed, 1);
        assert_eq!(summary.total_applied(), 6);
        assert_eq!(Snapshot::from_storage(&storage).unwrap(), snapshot);
    }

    #[test]
    fn test_overwrite_advances_counters_past_snapshot_ids() {
        let storage = Storage::new();
        Reconciler::new(&storage)
            .apply(&fixtures::sample(), ApplyMode::Overwrite)
            .unwrap();

        let created = AccountService::new(&storage).create("New").unwrap();
        assert_eq!(created.id, AccountId::new(4));
        let category = CategoryService::new(&storage)
            .create(OperationKind::Expense, "New")
            .unwrap();
        assert_eq!(category.id, CategoryId::new(3));
    }

    #[test]
    fn test_merge_last_write_wins() {
        let storage = populated();
        let mut snapshot = Snapshot::default();
        snapshot.accounts.push(
            Account::new(AccountId::new(2), "Imported").with_balance(Money::from_cents(4200)),
        );

        let summary = Reconciler::new(&storage)
            .apply(&snapshot, ApplyMode::Merge)
            .unwrap();
        assert_eq!(summary.replaced, 1);
        assert_eq!(summary.accounts_removed, 0);

        let merged = storage.accounts.require(AccountId::new(2)).unwrap();
        assert_eq!(merged.name, "Imported");
        assert_eq!(merged.balance, Money::from_cents(4200));
        assert_eq!(storage.accounts.count().unwrap(), 2);
        assert!(storage.accounts.next_id().unwrap() > AccountId::new(2));
    }

    #[test]
    fn test_merge_keeps_existing_entities() {
        let storage = populated();
        Reconciler::new(&storage)
            .apply(&fixtures::sample(), ApplyMode::Merge)
            .unwrap();

        // Existing 1 and 2 plus snapshot 3; snapshot 1 replaced the old account 1
        assert_eq!(storage.accounts.count().unwrap(), 3);
        assert_eq!(storage.accounts.require(AccountId::new(2)).unwrap().name, "Old B");
        assert_eq!(storage.accounts.require(AccountId::new(1)).unwrap().name, "Wallet");
        assert_eq!(storage.operations.count().unwrap(), 2);
    }

    #[test]
    fn test_records_applied_without_validation() {
        let storage = Storage::new();
        let mut snapshot = fixtures::sample();
        snapshot.operations[0].account_id = AccountId::new(99);

        Reconciler::new(&storage)
            .apply(&snapshot, ApplyMode::Overwrite)
            .unwrap();
        assert_eq!(storage.operations.count().unwrap(), 2);
    }

    #[test]
    fn test_csv_export_then_overwrite_import_preserves_counts() {
        let source = Storage::new();
        Reconciler::new(&source)
            .apply(&fixtures::sample(), ApplyMode::Overwrite)
            .unwrap();
        let bytes = CsvCodec
            .encode(&Snapshot::from_storage(&source).unwrap())
            .unwrap();

        let target = Storage::new();
        let decoded = CsvCodec.decode(&bytes).unwrap();
        Reconciler::new(&target)
            .apply(&decoded, ApplyMode::Overwrite)
            .unwrap();

        assert_eq!(target.accounts.count().unwrap(), source.accounts.count().unwrap());
        assert_eq!(target.categories.count().unwrap(), source.categories.count().unwrap());
        assert_eq!(target.operations.count().unwrap(), source.operations.count().unwrap());
    }

    #[test]
    fn test_summary_display() {
        let summary = ApplySummary {
            mode: ApplyMode::Merge,
            accounts_applied: 1,
            replaced: 1,
            ..ApplySummary::default()
        };
        assert_eq!(
            summary.to_string(),
            "merge: 1 account(s), 0 category(ies), 0 operation(s), 1 replaced"
        );
    }
}
