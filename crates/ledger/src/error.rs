use alloy_primitives::{Address, I256, U256};
use store::StoreError;
use thiserror::Error;

/// Reasons an event could not be reconciled. None of the event's writes are
/// committed when one of these is returned.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Storage failed; the event can be redelivered
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The raw amount does not fit a signed 256-bit balance delta
    #[error("Amount {0} exceeds the signed balance range")]
    AmountOutOfRange(U256),

    /// Applying the delta overflowed the signed balance
    #[error("Balance of {owner} in {token} overflowed")]
    BalanceOverflow { owner: Address, token: Address },

    /// Strict mode: the delta would leave the balance below zero
    #[error("Balance of {owner} in {token} would become {quantity}")]
    NegativeBalance {
        owner: Address,
        token: Address,
        quantity: I256,
    },
}

impl LedgerError {
    /// Whether delivering the same event again can succeed.
    ///
    /// Only storage failures are transient. Every other variant is decided by
    /// the event and the state before it, so a retry fails the same way.
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}
