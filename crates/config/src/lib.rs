//! Configuration types for the token indexer.
//!
//! This crate provides:
//! - Chain configuration (chain id, name, RPC endpoint) with presets
//! - Schema capabilities that switch optional entity families on and off
//! - Ledger configuration handed to the reconciliation engine

pub mod chain;
pub mod ledger;

pub use chain::{ChainConfig, ChainConfigBuilder};
pub use ledger::{Capabilities, LedgerConfig};

use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// RPC endpoint is missing
    #[error("RPC URL is empty")]
    EmptyRpcUrl,

    /// Chain id zero is reserved
    #[error("Invalid chain id: {0}")]
    InvalidChainId(u64),

    /// Chain name is used as a stored field and may not be blank
    #[error("Chain name is empty")]
    EmptyChainName,
}
