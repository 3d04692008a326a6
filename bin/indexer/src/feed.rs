//! Transfer and Approval logs pulled from `eth_getLogs`, in on-chain order.

use alloy_primitives::{Address, B256};
use alloy_provider::Provider;
use alloy_rpc_types_eth::{BlockNumberOrTag, Filter, Log};
use alloy_sol_types::SolEvent;
use binding::IERC20::{Approval, Transfer};
use ledger::{ApprovalEvent, LedgerEvent, TransferEvent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tokio_retry::{strategy::ExponentialBackoff, Retry};
use tracing::{debug, warn};

/// Where an event sits on chain. Orders events the way they were emitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub block: u64,
    pub log_index: u64,
}

/// A decoded event and its position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedEntry {
    pub position: Position,
    pub event: LedgerEvent,
}

/// Scans a block range for token events.
pub struct LogFeed<P> {
    provider: P,
    tokens: Vec<Address>,
    chunk_size: u64,
}

impl<P> LogFeed<P>
where
    P: Provider + Clone,
{
    /// `tokens` restricts the scan to these contracts; empty scans all of them.
    pub fn new(provider: P, tokens: Vec<Address>, chunk_size: u64) -> Self {
        Self {
            provider,
            tokens,
            chunk_size: chunk_size.max(1),
        }
    }

    pub async fn latest_block(&self) -> eyre::Result<u64> {
        Ok(self.provider.get_block_number().await?)
    }

    pub const fn chunk_size(&self) -> u64 {
        self.chunk_size
    }

    /// Fetch one chunk with retry logic.
    pub async fn fetch_with_retry(
        &self,
        from_block: u64,
        to_block: u64,
    ) -> eyre::Result<Vec<FeedEntry>> {
        let retry_strategy = ExponentialBackoff::from_millis(100).take(5);

        Retry::spawn(retry_strategy, || async {
            self.fetch(from_block, to_block).await.map_err(|e| {
                warn!(
                    from = from_block,
                    to = to_block,
                    error = %e,
                    "Log scan failed, will retry"
                );
                e
            })
        })
        .await
    }

    /// Fetch and decode the token events of one chunk, sorted by position.
    async fn fetch(&self, from_block: u64, to_block: u64) -> eyre::Result<Vec<FeedEntry>> {
        let mut filter = Filter::new()
            .event_signature(vec![Transfer::SIGNATURE_HASH, Approval::SIGNATURE_HASH])
            .from_block(from_block)
            .to_block(to_block);
        if !self.tokens.is_empty() {
            filter = filter.address(self.tokens.clone());
        }

        let logs = self.provider.get_logs(&filter).await?;
        let mut timestamps: HashMap<u64, u64> = HashMap::new();
        let mut entries = Vec::with_capacity(logs.len());

        for log in &logs {
            let (Some(block), Some(log_index)) = (log.block_number, log.log_index) else {
                debug!(tx = ?log.transaction_hash, "Skipping pending log");
                continue;
            };

            let timestamp = match log.block_timestamp {
                Some(timestamp) => timestamp,
                None => self.block_timestamp(block, &mut timestamps).await?,
            };

            if let Some(event) = decode(log, timestamp) {
                entries.push(FeedEntry {
                    position: Position { block, log_index },
                    event,
                });
            }
        }

        entries.sort_by_key(|entry| entry.position);

        debug!(
            from = from_block,
            to = to_block,
            logs = logs.len(),
            events = entries.len(),
            "Scanned block range"
        );

        Ok(entries)
    }

    /// Block timestamp for endpoints that omit it from logs.
    async fn block_timestamp(
        &self,
        block: u64,
        cache: &mut HashMap<u64, u64>,
    ) -> eyre::Result<u64> {
        if let Some(timestamp) = cache.get(&block) {
            return Ok(*timestamp);
        }

        let timestamp = self
            .provider
            .get_block_by_number(BlockNumberOrTag::Number(block))
            .await?
            .ok_or_else(|| eyre::eyre!("Block {} not found", block))?
            .header
            .timestamp;
        cache.insert(block, timestamp);

        Ok(timestamp)
    }
}

/// Inclusive `(from, to)` ranges of at most `chunk_size` blocks covering
/// `from_block..=to_block`.
pub fn chunk_ranges(from_block: u64, to_block: u64, chunk_size: u64) -> Vec<(u64, u64)> {
    let chunk_size = chunk_size.max(1);
    let mut chunks = Vec::new();
    let mut current = from_block;

    while current <= to_block {
        let chunk_end = current.saturating_add(chunk_size - 1).min(to_block);
        chunks.push((current, chunk_end));
        if chunk_end == u64::MAX {
            break;
        }
        current = chunk_end + 1;
    }

    chunks
}

/// Decode a log into a ledger event.
///
/// Returns `None` for anything that is not an ERC20 Transfer or Approval,
/// including ERC721 transfers, which share the Transfer signature but index
/// the token id.
pub fn decode(log: &Log, timestamp: u64) -> Option<LedgerEvent> {
    let token = log.address();
    let signature: B256 = *log.topic0()?;

    let decoded = if signature == Transfer::SIGNATURE_HASH {
        log.log_decode::<Transfer>().map(|decoded| {
            let event = decoded.inner.data;
            LedgerEvent::from(TransferEvent {
                token,
                from: event.from,
                to: event.to,
                value: event.value,
                timestamp,
            })
        })
    } else if signature == Approval::SIGNATURE_HASH {
        log.log_decode::<Approval>().map(|decoded| {
            let event = decoded.inner.data;
            LedgerEvent::from(ApprovalEvent {
                token,
                owner: event.owner,
                spender: event.spender,
                value: event.value,
            })
        })
    } else {
        return None;
    };

    match decoded {
        Ok(event) => Some(event),
        Err(e) => {
            debug!(token = %token, error = %e, "Skipping undecodable log");
            None
        }
    }
}
