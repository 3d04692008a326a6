//! Token and market counters.
//!
//! These accumulate on every transfer and are never recomputed, so they are
//! not idempotent under replay of the same event.

use crate::{LedgerError, Reconciler};
use alloy_primitives::{Address, U256};
use metadata::MetadataSource;
use store::{EntityStore, MarketData, TrailingVolume};
use tracing::warn;

impl<S, M> Reconciler<'_, S, M>
where
    S: EntityStore,
    M: MetadataSource,
{
    /// Account one transfer of `amount` in `token` at `timestamp`.
    pub(crate) async fn record_transfer(
        &mut self,
        token: Address,
        amount: U256,
        timestamp: u64,
    ) -> Result<(), LedgerError> {
        let capabilities = self.config.capabilities;
        let mut record = self.ensure_token(token).await?;

        if capabilities.popularity_metrics {
            record.transaction_count += 1;
            record.transfer_volume = record.transfer_volume.saturating_add(amount);
        }
        record.updated_at = timestamp;
        self.session.set(record.clone());

        if !capabilities.market_data {
            return Ok(());
        }
        let Some(market_id) = record.market_data else {
            return Ok(());
        };

        let Some(mut market) = self.session.get::<MarketData>(&market_id).await? else {
            warn!(token = %record.id, market = %market_id, "Token references missing market data");
            return Ok(());
        };

        market.volume_24h = market.volume_24h.saturating_add(amount);
        market.updated_at = timestamp;
        if capabilities.trailing_volume {
            market
                .trailing_volume
                .get_or_insert_with(TrailingVolume::new)
                .record(timestamp, amount);
        }
        self.session.set(market);

        Ok(())
    }
}
