//! Incremental state reconciliation for ERC20 events.
//!
//! Each `Transfer` or `Approval` is reconciled into the entity tables as one
//! unit of work:
//! - entities are materialized on first reference (`ensure_*`)
//! - balances move by the signed transfer amount and holder counts follow
//!   the balances across zero
//! - token and market counters accumulate
//!
//! All writes of an event are staged and committed together, so a failed
//! event leaves no trace and can be redelivered. Events of one contract must
//! be fed in on-chain order, one at a time.

mod aggregate;
mod balance;
mod dispatch;
mod error;
mod event;
mod materialize;

pub use balance::HolderTransition;
pub use dispatch::{Dispatcher, Receipt};
pub use error::LedgerError;
pub use event::{ApprovalEvent, LedgerEvent, TransferEvent};

use config::LedgerConfig;
use metadata::{MetadataResolver, MetadataSource};
use store::{EntityStore, Session};

/// State of one unit of work: staged writes plus what it needs to create
/// entities.
pub(crate) struct Reconciler<'a, S, M> {
    session: Session<'a, S>,
    resolver: &'a MetadataResolver<M>,
    config: &'a LedgerConfig,
    tokens_created: usize,
}

impl<'a, S, M> Reconciler<'a, S, M>
where
    S: EntityStore,
    M: MetadataSource,
{
    pub(crate) fn new(
        store: &'a S,
        resolver: &'a MetadataResolver<M>,
        config: &'a LedgerConfig,
    ) -> Self {
        Self {
            session: Session::new(store),
            resolver,
            config,
            tokens_created: 0,
        }
    }

    /// Commit everything staged by this unit of work.
    pub(crate) async fn commit(self) -> Result<Receipt, LedgerError> {
        let tokens_created = self.tokens_created;
        let records_written = self.session.commit().await?;

        Ok(Receipt {
            records_written,
            tokens_created,
        })
    }
}
