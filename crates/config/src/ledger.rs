//! Reconciliation engine configuration.

use crate::ChainConfig;
use serde::{Deserialize, Serialize};

/// Optional entity families maintained by the ledger.
///
/// Turning a capability off skips its bookkeeping entirely; the entities that
/// remain are maintained exactly as with the capability on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Capabilities {
    /// Create a MarketData record per token and accumulate its volume
    pub market_data: bool,
    /// Maintain transactionCount, transferVolume and holderCount on Token
    pub popularity_metrics: bool,
    /// Keep a bucketed trailing 24h volume next to the cumulative counter
    pub trailing_volume: bool,
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::all()
    }
}

impl Capabilities {
    /// Every optional entity family enabled.
    pub const fn all() -> Self {
        Self {
            market_data: true,
            popularity_metrics: true,
            trailing_volume: true,
        }
    }

    /// Only accounts, tokens, projects, portfolios, balances and approvals.
    pub const fn minimal() -> Self {
        Self {
            market_data: false,
            popularity_metrics: false,
            trailing_volume: false,
        }
    }
}

/// Configuration for the reconciliation engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Chain ID written to Token.chain
    pub chain_id: u64,
    /// Chain name written to Portfolio.chain
    pub chain_name: String,
    /// Reject any event that would leave a balance below zero
    #[serde(default)]
    pub strict_balances: bool,
    /// Optional entity families
    #[serde(default)]
    pub capabilities: Capabilities,
}

impl LedgerConfig {
    /// Default ledger configuration for a chain.
    pub fn for_chain(chain: &ChainConfig) -> Self {
        Self {
            chain_id: chain.chain_id,
            chain_name: chain.name.clone(),
            strict_balances: false,
            capabilities: Capabilities::default(),
        }
    }

    /// Enable or disable strict balance checking.
    pub const fn strict(mut self, strict_balances: bool) -> Self {
        self.strict_balances = strict_balances;
        self
    }

    /// Replace the capability set.
    pub const fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }
}
