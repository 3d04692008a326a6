//! Entity storage for the token indexer.
//!
//! This crate provides:
//! - The entity records and their deterministic ids
//! - The [`EntityStore`] capability: typed reads and all-or-nothing commits
//! - [`Session`], which stages the writes of one event on top of a store
//! - [`MemoryStore`], an in-process store with consistent snapshots

pub mod entity;
pub mod keys;
pub mod memory;
pub mod session;
pub mod volume;

pub use entity::{
    Account, Approval, Entity, EntityKind, MarketData, Portfolio, Project, Tables, Token,
    TokenBalance,
};
pub use memory::MemoryStore;
pub use session::{ChangeSet, Session};
pub use volume::TrailingVolume;

use std::future::Future;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// A read from the backing store failed
    #[error("Failed to read {kind} {id}: {reason}")]
    Read {
        kind: EntityKind,
        id: String,
        reason: String,
    },

    /// A commit was rejected; none of its records were written
    #[error("Failed to commit {records} records: {reason}")]
    Commit { records: usize, reason: String },

    /// The store's internal lock was poisoned by a panicking writer
    #[error("Store lock poisoned")]
    Poisoned,
}

/// Keyed persistence for entity records.
///
/// Writes only happen through [`EntityStore::commit`], which applies a whole
/// [`ChangeSet`] or nothing.
pub trait EntityStore: Send + Sync {
    /// Load a record by id.
    fn get<E: Entity>(
        &self,
        id: &str,
    ) -> impl Future<Output = Result<Option<E>, StoreError>> + Send;

    /// Apply every record in `changes`, or none of them.
    fn commit(&self, changes: ChangeSet) -> impl Future<Output = Result<(), StoreError>> + Send;
}
