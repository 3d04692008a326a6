//! Per-owner balances and the holder count derived from them.

use crate::{LedgerError, Reconciler};
use alloy_primitives::{Address, I256};
use metadata::MetadataSource;
use store::{keys, EntityStore, TokenBalance};
use tracing::warn;

/// Effect of a balance change on the token's holder count.
///
/// A holder is an owner whose balance is strictly positive, so the count
/// moves only when a balance crosses between "positive" and "zero or below".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HolderTransition {
    Joined,
    Left,
    Unchanged,
}

impl HolderTransition {
    pub fn between(previous: I256, current: I256) -> Self {
        match (previous.is_positive(), current.is_positive()) {
            (false, true) => Self::Joined,
            (true, false) => Self::Left,
            _ => Self::Unchanged,
        }
    }
}

impl<S, M> Reconciler<'_, S, M>
where
    S: EntityStore,
    M: MetadataSource,
{
    /// Move the balance of `owner` in `token` by `delta`.
    ///
    /// The holder-count transition is computed from the previously stored
    /// quantity, which includes writes staged earlier in the same event.
    pub(crate) async fn apply_delta(
        &mut self,
        owner: Address,
        token: Address,
        delta: I256,
    ) -> Result<TokenBalance, LedgerError> {
        self.ensure_token(token).await?;
        self.ensure_account(owner).await?;
        self.ensure_portfolio(owner).await?;

        let id = keys::balance_id(owner, token);
        let previous = self
            .session
            .get::<TokenBalance>(&id)
            .await?
            .map_or(I256::ZERO, |balance| balance.quantity);

        let quantity = previous
            .checked_add(delta)
            .ok_or(LedgerError::BalanceOverflow { owner, token })?;

        if quantity.is_negative() {
            if self.config.strict_balances {
                return Err(LedgerError::NegativeBalance {
                    owner,
                    token,
                    quantity,
                });
            }
            warn!(
                owner = %owner,
                token = %token,
                quantity = %quantity,
                "Balance went negative"
            );
        }

        let balance = TokenBalance {
            id,
            owner: keys::address_id(owner),
            token: keys::address_id(token),
            quantity,
        };
        self.session.set(balance.clone());

        if self.config.capabilities.popularity_metrics {
            self.update_holder_count(token, HolderTransition::between(previous, quantity))
                .await?;
        }

        Ok(balance)
    }

    async fn update_holder_count(
        &mut self,
        token: Address,
        transition: HolderTransition,
    ) -> Result<(), LedgerError> {
        let mut record = self.ensure_token(token).await?;
        match transition {
            HolderTransition::Joined => record.holder_count += 1,
            HolderTransition::Left => record.holder_count = record.holder_count.saturating_sub(1),
            HolderTransition::Unchanged => return Ok(()),
        }
        self.session.set(record);

        Ok(())
    }
}
