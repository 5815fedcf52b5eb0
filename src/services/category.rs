//! Category service
//!
//! Creates typed categories, renames them and deletes those that no
//! operation uses. A category's kind cannot be changed.

use tracing::info;

use crate::error::{LedgerError, LedgerResult};
use crate::models::{Category, CategoryId, OperationKind};
use crate::storage::Storage;

use super::account::clean_name;
use super::integrity::IntegrityGuard;

/// Service for category management
pub struct CategoryService<'a> {
    storage: &'a Storage,
}

impl<'a> CategoryService<'a> {
    /// Create a new category service
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// Create a new category of the given kind
    pub fn create(&self, kind: OperationKind, name: &str) -> LedgerResult<Category> {
        let name = clean_name(name, "Category")?;
        let category = self
            .storage
            .categories
            .create(|id| Category::new(id, kind, name))?;

        info!(id = %category.id, %kind, name = %category.name, "category created");
        Ok(category)
    }

    pub fn get(&self, id: CategoryId) -> LedgerResult<Option<Category>> {
        self.storage.categories.get(id)
    }

    pub fn require(&self, id: CategoryId) -> LedgerResult<Category> {
        self.storage
            .categories
            .get(id)?
            .ok_or_else(|| LedgerError::category_not_found(id))
    }

    /// Find a category by ID string or by name (case-insensitive)
    pub fn find(&self, identifier: &str) -> LedgerResult<Option<Category>> {
        if let Ok(id) = identifier.parse::<CategoryId>() {
            if let Some(category) = self.storage.categories.get(id)? {
                return Ok(Some(category));
            }
        }

        let wanted = identifier.trim().to_lowercase();
        Ok(self
            .storage
            .categories
            .filter(|c| c.name.to_lowercase() == wanted)?
            .into_iter()
            .next())
    }

    pub fn list(&self) -> LedgerResult<Vec<Category>> {
        self.storage.categories.list()
    }

    /// Categories of one kind
    pub fn list_by_kind(&self, kind: OperationKind) -> LedgerResult<Vec<Category>> {
        self.storage.categories.filter(|c| c.kind == kind)
    }

    /// Rename a category; its kind is carried over unchanged
    pub fn rename(&self, id: CategoryId, new_name: &str) -> LedgerResult<Category> {
        let name = clean_name(new_name, "Category")?;
        let category = self.require(id)?;

        let renamed = self.storage.categories.replace(category.renamed(name))?;
        info!(id = %id, from = %category.name, to = %renamed.name, "category renamed");
        Ok(renamed)
    }

    /// Delete a category that no operation references
    pub fn delete(&self, id: CategoryId) -> LedgerResult<()> {
        if !self.storage.categories.exists(id)? {
            return Err(LedgerError::category_not_found(id));
        }

        IntegrityGuard::new(self.storage).ensure_category_deletable(id)?;
        self.storage.categories.delete(id)?;

        info!(id = %id, "category deleted");
        Ok(())
    }
}
