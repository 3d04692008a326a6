//! Chain configuration.
//!
//! Network parameters are always passed in explicitly; nothing downstream of
//! this module knows which chain it is indexing.

use crate::ConfigError;
use serde::{Deserialize, Serialize};

/// Parameters of the chain being indexed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Chain ID, stored on every Token
    pub chain_id: u64,
    /// Human readable chain name, stored on every Portfolio
    pub name: String,
    /// JSON-RPC endpoint used for logs and metadata reads
    pub rpc_url: String,
}

impl ChainConfig {
    /// Sonic mainnet.
    pub fn sonic() -> Self {
        Self {
            chain_id: 146,
            name: "sonic".to_string(),
            rpc_url: "https://rpc.soniclabs.com".to_string(),
        }
    }

    /// Ethereum mainnet. The RPC URL must be supplied by the caller.
    pub fn ethereum() -> Self {
        Self {
            chain_id: 1,
            name: "ethereum".to_string(),
            rpc_url: String::new(),
        }
    }

    /// Look up a preset by its chain name.
    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "sonic" => Some(Self::sonic()),
            "ethereum" | "mainnet" => Some(Self::ethereum()),
            _ => None,
        }
    }

    /// Check that the configuration is usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.chain_id == 0 {
            return Err(ConfigError::InvalidChainId(self.chain_id));
        }
        if self.name.trim().is_empty() {
            return Err(ConfigError::EmptyChainName);
        }
        if self.rpc_url.trim().is_empty() {
            return Err(ConfigError::EmptyRpcUrl);
        }
        Ok(())
    }
}

/// Builder for custom chain configurations.
#[derive(Debug, Clone)]
pub struct ChainConfigBuilder {
    chain: ChainConfig,
}

impl ChainConfigBuilder {
    /// Start with Sonic defaults.
    pub fn sonic() -> Self {
        Self {
            chain: ChainConfig::sonic(),
        }
    }

    /// Start from an existing configuration.
    pub const fn from_config(chain: ChainConfig) -> Self {
        Self { chain }
    }

    /// Override the chain id.
    pub const fn chain_id(mut self, chain_id: u64) -> Self {
        self.chain.chain_id = chain_id;
        self
    }

    /// Override the chain name.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.chain.name = name.into();
        self
    }

    /// Override the RPC endpoint.
    pub fn rpc_url(mut self, rpc_url: impl Into<String>) -> Self {
        self.chain.rpc_url = rpc_url.into();
        self
    }

    /// Build and validate the chain configuration.
    pub fn build(self) -> Result<ChainConfig, ConfigError> {
        self.chain.validate()?;
        Ok(self.chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sonic_config() {
        let config = ChainConfig::sonic();
        assert_eq!(config.chain_id, 146);
        assert_eq!(config.name, "sonic");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_ethereum_preset_requires_rpc_url() {
        let config = ChainConfig::preset("mainnet").unwrap();
        assert_eq!(config.chain_id, 1);
        assert_eq!(config.validate(), Err(ConfigError::EmptyRpcUrl));
    }

    #[test]
    fn test_unknown_preset() {
        assert!(ChainConfig::preset("moonbase").is_none());
    }

    #[test]
    fn test_custom_config_builder() {
        let config = ChainConfigBuilder::sonic()
            .rpc_url("http://localhost:8545")
            .chain_id(31337)
            .name("anvil")
            .build()
            .unwrap();

        assert_eq!(config.chain_id, 31337);
        assert_eq!(config.name, "anvil");
        assert_eq!(config.rpc_url, "http://localhost:8545");
    }

    #[test]
    fn test_builder_rejects_zero_chain_id() {
        let result = ChainConfigBuilder::sonic().chain_id(0).build();
        assert_eq!(result, Err(ConfigError::InvalidChainId(0)));
    }

    #[test]
    fn test_builder_rejects_blank_name() {
        let result = ChainConfigBuilder::sonic().name("  ").build();
        assert_eq!(result, Err(ConfigError::EmptyChainName));
    }
}
