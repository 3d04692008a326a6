//! Drives the ledger from on-chain logs.
//!
//! The [`Indexer`] pulls Transfer and Approval logs chunk by chunk, feeds them
//! to a [`Dispatcher`] strictly in on-chain order, and tracks how far it got
//! so that a retried range never applies an event twice.

pub mod config;
pub mod feed;
pub mod metrics;
pub mod snapshot;

use crate::{
    feed::{chunk_ranges, FeedEntry, LogFeed, Position},
    metrics::Metrics,
    snapshot::Snapshot,
};
use alloy_provider::Provider;
use ::config::LedgerConfig;
use ledger::Dispatcher;
use metadata::{MetadataResolver, MetadataSource};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};
use store::MemoryStore;
use tokio::time;
use tracing::{error, info, warn};

pub struct Indexer<M> {
    dispatcher: Dispatcher<MemoryStore, M>,
    metrics: Metrics,
    last_block: Option<u64>,
    last_event: Option<Position>,
    snapshot_path: Option<PathBuf>,
}

impl<M> Indexer<M>
where
    M: MetadataSource,
{
    pub fn new(resolver: MetadataResolver<M>, config: LedgerConfig, metrics: Metrics) -> Self {
        Self {
            dispatcher: Dispatcher::new(MemoryStore::new(), resolver, config),
            metrics,
            last_block: None,
            last_event: None,
            snapshot_path: None,
        }
    }

    /// Resume from a snapshot taken by a previous run.
    pub fn resume(
        snapshot: Snapshot,
        resolver: MetadataResolver<M>,
        config: LedgerConfig,
        metrics: Metrics,
    ) -> Self {
        Self {
            dispatcher: Dispatcher::new(MemoryStore::from_tables(snapshot.tables), resolver, config),
            metrics,
            last_block: snapshot.last_block,
            last_event: snapshot.last_event,
            snapshot_path: None,
        }
    }

    /// Persist a snapshot here after every fully reconciled chunk.
    pub fn with_snapshot_path(mut self, path: PathBuf) -> Self {
        self.snapshot_path = Some(path);
        self
    }

    pub const fn dispatcher(&self) -> &Dispatcher<MemoryStore, M> {
        &self.dispatcher
    }

    pub const fn last_block(&self) -> Option<u64> {
        self.last_block
    }

    pub const fn last_event(&self) -> Option<Position> {
        self.last_event
    }

    /// First block still to be scanned.
    pub fn next_block(&self, start_block: u64) -> u64 {
        self.last_block
            .map_or(start_block, |block| block.saturating_add(1).max(start_block))
    }

    /// Reconcile entries in order, skipping any at or before the last
    /// reconciled event.
    ///
    /// An event the ledger rejects outright (an amount beyond the balance
    /// range, a strict-mode negative balance) is counted as failed and
    /// passed over, since delivering it again cannot succeed. A storage
    /// failure stops the batch instead: everything before it stays applied
    /// and the failed event is retried by applying the same entries again.
    pub async fn apply(&mut self, entries: &[FeedEntry]) -> eyre::Result<usize> {
        let mut applied = 0;

        for entry in entries {
            if self.last_event.is_some_and(|last| entry.position <= last) {
                continue;
            }

            let kind = entry.event.kind();
            match self.dispatcher.handle(&entry.event).await {
                Ok(receipt) => {
                    self.metrics
                        .record_event(kind, receipt.records_written, receipt.tokens_created);
                    self.last_event = Some(entry.position);
                    applied += 1;
                }
                Err(e) if !e.is_retryable() => {
                    self.metrics.record_failure(kind);
                    warn!(
                        kind,
                        token = %entry.event.token(),
                        block = entry.position.block,
                        log_index = entry.position.log_index,
                        error = %e,
                        "Event rejected, skipping"
                    );
                    self.last_event = Some(entry.position);
                }
                Err(e) => {
                    self.metrics.record_failure(kind);
                    error!(
                        kind,
                        token = %entry.event.token(),
                        block = entry.position.block,
                        log_index = entry.position.log_index,
                        error = %e,
                        "Event aborted"
                    );
                    return Err(e.into());
                }
            }
        }

        Ok(applied)
    }

    /// Mark every block up to `block` as fully reconciled.
    fn complete_block(&mut self, block: u64) -> eyre::Result<()> {
        self.last_block = Some(block);
        self.metrics.set_last_indexed_block(block);

        if let Some(path) = &self.snapshot_path {
            self.snapshot()?.save(path)?;
        }

        Ok(())
    }

    /// Current tables and progress.
    pub fn snapshot(&self) -> eyre::Result<Snapshot> {
        Ok(Snapshot {
            last_block: self.last_block,
            last_event: self.last_event,
            tables: self.dispatcher.store().snapshot()?,
        })
    }

    /// Scan and reconcile `from_block..=to_block`.
    pub async fn index_range<P>(
        &mut self,
        feed: &LogFeed<P>,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<usize>
    where
        P: Provider + Clone,
    {
        let started = Instant::now();
        let mut applied = 0;

        for (from, to) in chunk_ranges(from_block, to_block, feed.chunk_size()) {
            let entries = feed.fetch_with_retry(from, to).await?;
            applied += self.apply(&entries).await?;
            self.complete_block(to)?;
        }

        self.metrics.record_range(started.elapsed());
        info!(
            from = from_block,
            to = to_block,
            events = applied,
            "Indexed block range"
        );

        Ok(applied)
    }

    /// Follow the chain head, polling every `poll_interval`.
    pub async fn follow<P>(
        &mut self,
        feed: &LogFeed<P>,
        start_block: u64,
        poll_interval: Duration,
    ) -> eyre::Result<()>
    where
        P: Provider + Clone,
    {
        let mut interval = time::interval(poll_interval);

        loop {
            interval.tick().await;

            let head = match feed.latest_block().await {
                Ok(head) => head,
                Err(e) => {
                    warn!(error = %e, "Failed to fetch latest block");
                    continue;
                }
            };

            let from = self.next_block(start_block);
            if from > head {
                continue;
            }

            if let Err(e) = self.index_range(feed, from, head).await {
                error!(from, to = head, error = %e, "Indexing failed, will retry");
            }
        }
    }
}
