use crate::{ChangeSet, Entity, EntityStore, StoreError, Tables};
use std::sync::RwLock;

/// In-process entity store.
///
/// Commits are applied under a single write lock, so readers observe either
/// all of a commit or none of it.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from previously captured tables.
    pub fn from_tables(tables: Tables) -> Self {
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Consistent copy of every table.
    pub fn snapshot(&self) -> Result<Tables, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.clone())
    }

    /// Run `f` against the current tables without copying them.
    pub fn read<T>(&self, f: impl FnOnce(&Tables) -> T) -> Result<T, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(f(&tables))
    }
}

impl EntityStore for MemoryStore {
    async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        let tables = self.tables.read().map_err(|_| StoreError::Poisoned)?;
        Ok(tables.get::<E>(id).cloned())
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), StoreError> {
        let mut tables = self.tables.write().map_err(|_| StoreError::Poisoned)?;
        tables.merge(changes.into_tables());
        Ok(())
    }
}
