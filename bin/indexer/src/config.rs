use alloy_primitives::Address;
use config::{Capabilities, ChainConfig, ChainConfigBuilder, LedgerConfig};
use serde::{Deserialize, Serialize};
use std::{path::Path, path::PathBuf, time::Duration};

const fn default_chunk_size() -> u64 {
    9_500
}

const fn default_poll_interval_secs() -> u64 {
    5
}

const fn default_metadata_timeout_ms() -> u64 {
    10_000
}

fn default_chain() -> String {
    "sonic".to_string()
}

/// Top-level indexer configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// RPC endpoint url
    pub rpc_url: String,

    /// Chain preset name, or the name of a custom chain when `chain_id` is set
    #[serde(default = "default_chain")]
    pub chain: String,

    /// Chain id override for chains without a preset
    #[serde(default)]
    pub chain_id: Option<u64>,

    /// Token contracts to index. Empty means every contract emitting
    /// Transfer or Approval.
    #[serde(default)]
    pub tokens: Vec<Address>,

    /// First block to scan when there is no snapshot to resume from
    #[serde(default)]
    pub start_block: u64,

    /// Blocks per `eth_getLogs` request
    #[serde(default = "default_chunk_size")]
    pub chunk_size: u64,

    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,

    /// Per-call timeout for token metadata reads
    #[serde(default = "default_metadata_timeout_ms")]
    pub metadata_timeout_ms: u64,

    /// Reject events that would drive a balance below zero
    #[serde(default)]
    pub strict_balances: bool,

    #[serde(default)]
    pub capabilities: Capabilities,

    /// Where to persist the entity tables between runs
    #[serde(default)]
    pub snapshot_path: Option<PathBuf>,

    /// Port for the Prometheus exporter; disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> eyre::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;

        Ok(config)
    }

    /// Resolve the chain from its preset (or a custom id) and the rpc url.
    pub fn chain_config(&self) -> eyre::Result<ChainConfig> {
        let base = ChainConfig::preset(&self.chain).unwrap_or_else(|| ChainConfig {
            chain_id: 0,
            name: self.chain.clone(),
            rpc_url: String::new(),
        });

        let mut builder = ChainConfigBuilder::from_config(base).rpc_url(&self.rpc_url);
        if let Some(chain_id) = self.chain_id {
            builder = builder.chain_id(chain_id);
        }

        Ok(builder.build()?)
    }

    pub fn ledger_config(&self, chain: &ChainConfig) -> LedgerConfig {
        LedgerConfig::for_chain(chain)
            .strict(self.strict_balances)
            .with_capabilities(self.capabilities)
    }

    pub const fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub const fn metadata_timeout(&self) -> Duration {
        Duration::from_millis(self.metadata_timeout_ms)
    }
}
