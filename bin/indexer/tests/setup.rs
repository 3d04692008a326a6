//! Common test setup utilities shared across integration tests.
#![allow(dead_code)] // used in ignored tests

use alloy_provider::Provider;
use indexer::config::Config;

/// Load test configuration. Panics if not found or invalid.
pub fn load_test_config() -> Config {
    Config::from_file("tests/test-config.toml").expect("Failed to load tests/test-config.toml.")
}

/// Provider for the configured chain, checked against its chain id.
pub async fn setup_provider(config: &Config) -> impl Provider + Clone {
    let chain = config.chain_config().expect("Invalid chain config");
    client::connect(&chain)
        .await
        .expect("Failed to connect to RPC endpoint")
}
