//! RPC provider construction for the indexer.

use alloy_provider::{Provider, ProviderBuilder};
use config::ChainConfig;
use thiserror::Error;
use tracing::debug;

#[derive(Error, Debug)]
pub enum ClientError {
    /// Error parsing or validating URLs
    #[error("Invalid RPC URL: {0}")]
    InvalidUrl(String),

    /// Error connecting to the RPC endpoint
    #[error("Connection error: {0}")]
    Connection(String),

    /// The endpoint serves a different chain than the one configured
    #[error("Chain mismatch: configured {expected}, endpoint reports {actual}")]
    ChainMismatch { expected: u64, actual: u64 },
}

/// Convenience function to create an ethereum rpc provider from url.
pub fn create_provider(rpc_url: &str) -> Result<impl Provider + Clone, ClientError> {
    let url = rpc_url
        .parse()
        .map_err(|e| ClientError::InvalidUrl(format!("{}", e)))?;
    let provider = ProviderBuilder::new().connect_http(url);

    Ok(provider)
}

/// Create a provider for the configured chain and check that the endpoint
/// actually serves that chain.
///
/// Indexing the wrong chain would silently materialize foreign state under
/// this chain's id, so a mismatch is a hard error.
pub async fn connect(chain: &ChainConfig) -> Result<impl Provider + Clone, ClientError> {
    let provider = create_provider(&chain.rpc_url)?;

    let actual = provider
        .get_chain_id()
        .await
        .map_err(|e| ClientError::Connection(format!("{}", e)))?;

    if actual != chain.chain_id {
        return Err(ClientError::ChainMismatch {
            expected: chain.chain_id,
            actual,
        });
    }

    debug!(chain_id = actual, chain = %chain.name, "Connected to RPC endpoint");

    Ok(provider)
}
