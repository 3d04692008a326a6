use alloy_primitives::{Address, U256};

/// A decoded `Transfer(from, to, value)` from a token contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEvent {
    /// Emitting contract
    pub token: Address,
    pub from: Address,
    pub to: Address,
    pub value: U256,
    /// Timestamp of the block the event was emitted in
    pub timestamp: u64,
}

impl TransferEvent {
    pub fn is_mint(&self) -> bool {
        self.from == Address::ZERO
    }

    pub fn is_burn(&self) -> bool {
        self.to == Address::ZERO
    }
}

/// A decoded `Approval(owner, spender, value)` from a token contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalEvent {
    /// Emitting contract
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
    pub value: U256,
}

/// Any event the ledger reconciles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    Transfer(TransferEvent),
    Approval(ApprovalEvent),
}

impl LedgerEvent {
    pub const fn token(&self) -> Address {
        match self {
            Self::Transfer(e) => e.token,
            Self::Approval(e) => e.token,
        }
    }

    /// Short label used in logs and metrics.
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Transfer(_) => "transfer",
            Self::Approval(_) => "approval",
        }
    }
}

impl From<TransferEvent> for LedgerEvent {
    fn from(event: TransferEvent) -> Self {
        Self::Transfer(event)
    }
}

impl From<ApprovalEvent> for LedgerEvent {
    fn from(event: ApprovalEvent) -> Self {
        Self::Approval(event)
    }
}
