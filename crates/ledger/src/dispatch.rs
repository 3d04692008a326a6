//! Entry points: one call per decoded event.

use crate::{
    event::{ApprovalEvent, LedgerEvent, TransferEvent},
    LedgerError, Reconciler,
};
use alloy_primitives::{Address, I256};
use config::LedgerConfig;
use metadata::{MetadataResolver, MetadataSource};
use store::{keys, Account, Approval, EntityStore, Portfolio, Token, TokenBalance};
use tracing::info;

/// Outcome of a committed unit of work.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Receipt {
    /// Records written by the commit, including unchanged re-writes
    pub records_written: usize,
    /// Tokens seen for the first time
    pub tokens_created: usize,
}

/// Reconciles events into an [`EntityStore`].
///
/// Handlers take `&mut self`: a dispatcher processes one event at a time,
/// which the read-modify-write balance updates rely on.
pub struct Dispatcher<S, M> {
    store: S,
    resolver: MetadataResolver<M>,
    config: LedgerConfig,
}

impl<S, M> Dispatcher<S, M>
where
    S: EntityStore,
    M: MetadataSource,
{
    pub const fn new(store: S, resolver: MetadataResolver<M>, config: LedgerConfig) -> Self {
        Self {
            store,
            resolver,
            config,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn reconciler(&self) -> Reconciler<'_, S, M> {
        Reconciler::new(&self.store, &self.resolver, &self.config)
    }

    /// Reconcile any supported event.
    pub async fn handle(&mut self, event: &LedgerEvent) -> Result<Receipt, LedgerError> {
        match event {
            LedgerEvent::Transfer(transfer) => self.on_transfer(transfer).await,
            LedgerEvent::Approval(approval) => self.on_approval(approval).await,
        }
    }

    /// Reconcile a `Transfer`.
    ///
    /// Counters are bumped first, then the sender is debited (unless this is a
    /// mint) and the receiver credited. For a self-transfer the credit sees
    /// the debit, so the balance ends where it started.
    pub async fn on_transfer(&mut self, event: &TransferEvent) -> Result<Receipt, LedgerError> {
        let amount =
            I256::try_from(event.value).map_err(|_| LedgerError::AmountOutOfRange(event.value))?;

        let mut unit = self.reconciler();
        unit.ensure_token(event.token).await?;
        unit.record_transfer(event.token, event.value, event.timestamp)
            .await?;

        if !event.is_mint() {
            unit.apply_delta(event.from, event.token, -amount).await?;
        }
        unit.apply_delta(event.to, event.token, amount).await?;

        let receipt = unit.commit().await?;

        info!(
            token = %event.token,
            from = %event.from,
            to = %event.to,
            amount = %event.value,
            records = receipt.records_written,
            "Processed transfer"
        );

        Ok(receipt)
    }

    /// Reconcile an `Approval`. The new amount replaces the previous one.
    pub async fn on_approval(&mut self, event: &ApprovalEvent) -> Result<Receipt, LedgerError> {
        let mut unit = self.reconciler();
        unit.ensure_token(event.token).await?;
        let owner = unit.ensure_account(event.owner).await?;
        let spender = unit.ensure_account(event.spender).await?;

        unit.session.set(Approval {
            id: keys::approval_id(event.owner, event.spender, event.token),
            owner: owner.id,
            spender: spender.id,
            token: keys::address_id(event.token),
            amount: event.value,
        });

        let receipt = unit.commit().await?;

        info!(
            token = %event.token,
            owner = %event.owner,
            spender = %event.spender,
            amount = %event.value,
            "Processed approval"
        );

        Ok(receipt)
    }

    /// Materialize a token on its own, committing immediately.
    pub async fn ensure_token(&mut self, address: Address) -> Result<Token, LedgerError> {
        let mut unit = self.reconciler();
        let token = unit.ensure_token(address).await?;
        unit.commit().await?;
        Ok(token)
    }

    /// Materialize an account on its own, committing immediately.
    pub async fn ensure_account(&mut self, address: Address) -> Result<Account, LedgerError> {
        let mut unit = self.reconciler();
        let account = unit.ensure_account(address).await?;
        unit.commit().await?;
        Ok(account)
    }

    /// Materialize a portfolio (and its account) on its own, committing
    /// immediately.
    pub async fn ensure_portfolio(&mut self, owner: Address) -> Result<Portfolio, LedgerError> {
        let mut unit = self.reconciler();
        let portfolio = unit.ensure_portfolio(owner).await?;
        unit.commit().await?;
        Ok(portfolio)
    }

    /// Apply a single signed balance change outside of any event.
    pub async fn apply_delta(
        &mut self,
        owner: Address,
        token: Address,
        delta: I256,
    ) -> Result<TokenBalance, LedgerError> {
        let mut unit = self.reconciler();
        let balance = unit.apply_delta(owner, token, delta).await?;
        unit.commit().await?;
        Ok(balance)
    }
}
