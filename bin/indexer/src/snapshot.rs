//! JSON snapshot of the entity tables and indexing progress.

use crate::feed::Position;
use serde::{Deserialize, Serialize};
use std::path::Path;
use store::Tables;
use tracing::info;

/// Everything needed to resume indexing where a previous run stopped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Last block whose events are all reconciled
    pub last_block: Option<u64>,
    /// Last reconciled event
    pub last_event: Option<Position>,
    pub tables: Tables,
}

impl Snapshot {
    /// Load a snapshot. A missing file means a fresh start.
    pub fn load(path: impl AsRef<Path>) -> eyre::Result<Option<Self>> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path)?;
        let snapshot: Self = serde_json::from_str(&contents)?;

        info!(
            path = %path.display(),
            last_block = ?snapshot.last_block,
            records = snapshot.tables.len(),
            "Loaded snapshot"
        );

        Ok(Some(snapshot))
    }

    /// Write the snapshot, replacing any previous one only once it is
    /// fully written.
    pub fn save(&self, path: impl AsRef<Path>) -> eyre::Result<()> {
        let path = path.as_ref();
        let staging = path.with_extension("json.tmp");

        std::fs::write(&staging, serde_json::to_vec_pretty(self)?)?;
        std::fs::rename(&staging, path)?;

        Ok(())
    }
}
