//! Generic in-memory entity store
//!
//! One store per entity type. The map and the ID counter live behind a
//! single lock so an insert and its counter update are one atomic step.

use std::collections::BTreeMap;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::debug;

use crate::error::{LedgerError, LedgerResult};
use crate::models::Entity;

fn raw_key<I: Into<u32>>(id: I) -> u32 {
    id.into()
}

struct StoreState<T> {
    entries: BTreeMap<u32, T>,
    /// Next ID to hand out; never decreases
    next_id: u32,
}

/// Keyed container with monotonic ID allocation
pub struct EntityStore<T: Entity> {
    state: RwLock<StoreState<T>>,
}

impl<T: Entity> Default for EntityStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Entity> EntityStore<T> {
    /// Create an empty store whose first allocated ID is 1
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState {
                entries: BTreeMap::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> LedgerResult<RwLockReadGuard<'_, StoreState<T>>> {
        self.state
            .read()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire read lock: {}", e)))
    }

    fn write(&self) -> LedgerResult<RwLockWriteGuard<'_, StoreState<T>>> {
        self.state
            .write()
            .map_err(|e| LedgerError::Storage(format!("Failed to acquire write lock: {}", e)))
    }

    /// Allocate the next ID and store the entity built for it
    pub fn create<F>(&self, build: F) -> LedgerResult<T>
    where
        F: FnOnce(T::Id) -> T,
    {
        let mut state = self.write()?;

        let raw = state.next_id;
        let next = raw.checked_add(1).ok_or_else(|| {
            LedgerError::Storage(format!("{} ID space exhausted", T::ENTITY_TYPE))
        })?;

        let entity = build(T::Id::from(raw));
        let built: u32 = entity.id().into();
        if built != raw {
            return Err(LedgerError::Storage(format!(
                "{} built with ID {} instead of allocated ID {}",
                T::ENTITY_TYPE,
                entity.id(),
                raw
            )));
        }

        state.next_id = next;
        state.entries.insert(raw, entity.clone());
        debug!(entity = T::ENTITY_TYPE, id = raw, "created");

        Ok(entity)
    }

    /// Store an entity under its own ID, replacing any existing entry
    ///
    /// The counter advances past the ID so later allocations never collide.
    pub fn insert(&self, entity: T) -> LedgerResult<T> {
        let mut state = self.write()?;

        let raw: u32 = entity.id().into();
        let floor = raw.checked_add(1).ok_or_else(|| {
            LedgerError::Storage(format!("{} ID {} is out of range", T::ENTITY_TYPE, raw))
        })?;

        state.next_id = state.next_id.max(floor);
        let replaced = state.entries.insert(raw, entity.clone()).is_some();
        debug!(entity = T::ENTITY_TYPE, id = raw, replaced, "stored");

        Ok(entity)
    }

    /// Replace an existing entity; fails with NotFound if the ID is unknown
    pub fn replace(&self, entity: T) -> LedgerResult<T> {
        let mut state = self.write()?;

        let raw: u32 = entity.id().into();
        match state.entries.get_mut(&raw) {
            Some(slot) => {
                *slot = entity.clone();
                debug!(entity = T::ENTITY_TYPE, id = raw, "replaced");
                Ok(entity)
            }
            None => Err(LedgerError::NotFound {
                entity_type: T::ENTITY_TYPE,
                identifier: raw.to_string(),
            }),
        }
    }

    /// Get an entity by ID
    pub fn get(&self, id: T::Id) -> LedgerResult<Option<T>> {
        let state = self.read()?;
        Ok(state.entries.get(&raw_key(id)).cloned())
    }

    /// Get an entity by ID, failing with NotFound if absent
    pub fn require(&self, id: T::Id) -> LedgerResult<T> {
        self.get(id)?.ok_or_else(|| LedgerError::NotFound {
            entity_type: T::ENTITY_TYPE,
            identifier: id.to_string(),
        })
    }

    /// All entities, ordered by ID
    pub fn list(&self) -> LedgerResult<Vec<T>> {
        let state = self.read()?;
        Ok(state.entries.values().cloned().collect())
    }

    /// Entities matching a predicate, ordered by ID
    pub fn filter<P>(&self, predicate: P) -> LedgerResult<Vec<T>>
    where
        P: Fn(&T) -> bool,
    {
        let state = self.read()?;
        Ok(state
            .entries
            .values()
            .filter(|e| predicate(e))
            .cloned()
            .collect())
    }

    /// Number of entities matching a predicate
    pub fn count_where<P>(&self, predicate: P) -> LedgerResult<usize>
    where
        P: Fn(&T) -> bool,
    {
        let state = self.read()?;
        Ok(state.entries.values().filter(|e| predicate(e)).count())
    }

    /// Delete an entity; returns whether it was present
    pub fn delete(&self, id: T::Id) -> LedgerResult<bool> {
        let mut state = self.write()?;
        let removed = state.entries.remove(&raw_key(id)).is_some();
        if removed {
            debug!(entity = T::ENTITY_TYPE, id = %id, "deleted");
        }
        Ok(removed)
    }

    /// Check if an entity exists
    pub fn exists(&self, id: T::Id) -> LedgerResult<bool> {
        let state = self.read()?;
        Ok(state.entries.contains_key(&raw_key(id)))
    }

    /// Count entities
    pub fn count(&self) -> LedgerResult<usize> {
        let state = self.read()?;
        Ok(state.entries.len())
    }

    /// The ID the next `create` will hand out
    pub fn next_id(&self) -> LedgerResult<T::Id> {
        let state = self.read()?;
        Ok(T::Id::from(state.next_id))
    }
}
