//! Staged writes for a single unit of work.
//!
//! A [`Session`] reads through its own staged writes first and the backing
//! store second, so later steps of an event observe earlier ones. Nothing
//! reaches the store until [`Session::commit`]; dropping a session discards
//! everything it staged.

use crate::{Entity, EntityStore, StoreError, Tables};
use tracing::debug;

/// Records written by a unit of work, keyed like the store's tables.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    tables: Tables,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stage a record, replacing any staged record with the same id.
    pub fn set<E: Entity>(&mut self, entity: E) {
        self.tables.insert(entity);
    }

    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        self.tables.get(id)
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    pub const fn tables(&self) -> &Tables {
        &self.tables
    }

    pub fn into_tables(self) -> Tables {
        self.tables
    }
}

/// A read-through, write-behind view over an [`EntityStore`].
pub struct Session<'a, S> {
    store: &'a S,
    staged: ChangeSet,
}

impl<'a, S> Session<'a, S>
where
    S: EntityStore,
{
    pub fn new(store: &'a S) -> Self {
        Self {
            store,
            staged: ChangeSet::new(),
        }
    }

    /// Load a record, preferring this session's staged version.
    pub async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        if let Some(staged) = self.staged.get::<E>(id) {
            return Ok(Some(staged.clone()));
        }
        self.store.get::<E>(id).await
    }

    /// Stage a record for the next commit.
    pub fn set<E: Entity>(&mut self, entity: E) {
        self.staged.set(entity);
    }

    /// Records staged so far.
    pub const fn staged(&self) -> &ChangeSet {
        &self.staged
    }

    /// Write every staged record to the store in one commit.
    ///
    /// Returns the number of records written.
    pub async fn commit(self) -> Result<usize, StoreError> {
        let records = self.staged.len();
        if records == 0 {
            return Ok(0);
        }

        self.store.commit(self.staged).await?;
        debug!(records, "Committed session");

        Ok(records)
    }
}
