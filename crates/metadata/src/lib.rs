//! Token metadata resolution.
//!
//! A token's name, symbol, decimals and total supply are read from the chain
//! the first time the token is seen. Each read is isolated: a revert, RPC
//! error or timeout on one field falls back to that field's default and never
//! blocks the others. Resolution itself never fails, because balance tracking
//! must proceed even for contracts that only half implement ERC20.

pub mod contract;

pub use contract::ContractMetadataSource;

use alloy_primitives::{Address, U256};
use std::{future::Future, time::Duration};
use tracing::warn;

/// Name used when `name()` cannot be read.
pub const DEFAULT_NAME: &str = "Unknown Token";
/// Symbol used when `symbol()` cannot be read.
pub const DEFAULT_SYMBOL: &str = "???";
/// Decimals used when `decimals()` cannot be read.
pub const DEFAULT_DECIMALS: u8 = 18;
/// Total supply used when `totalSupply()` cannot be read.
pub const DEFAULT_TOTAL_SUPPLY: U256 = U256::ZERO;

/// Default bound on a single metadata read.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolved token metadata, with defaults substituted for failed reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenMetadata {
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub total_supply: U256,
}

impl TokenMetadata {
    /// Metadata of a token for which every read failed.
    pub fn fallback() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            symbol: DEFAULT_SYMBOL.to_string(),
            decimals: DEFAULT_DECIMALS,
            total_supply: DEFAULT_TOTAL_SUPPLY,
        }
    }
}

impl Default for TokenMetadata {
    fn default() -> Self {
        Self::fallback()
    }
}

/// Read-only access to a token contract's metadata calls.
///
/// Every method is independently failable.
pub trait MetadataSource: Send + Sync {
    /// Read `name()`.
    fn name(&self, token: Address) -> impl Future<Output = eyre::Result<String>> + Send;

    /// Read `symbol()`.
    fn symbol(&self, token: Address) -> impl Future<Output = eyre::Result<String>> + Send;

    /// Read `decimals()`.
    fn decimals(&self, token: Address) -> impl Future<Output = eyre::Result<u8>> + Send;

    /// Read `totalSupply()`.
    fn total_supply(&self, token: Address) -> impl Future<Output = eyre::Result<U256>> + Send;
}

/// Resolves [`TokenMetadata`] from a [`MetadataSource`], never failing.
#[derive(Debug, Clone)]
pub struct MetadataResolver<S> {
    source: S,
    call_timeout: Duration,
}

impl<S> MetadataResolver<S>
where
    S: MetadataSource,
{
    pub const fn new(source: S) -> Self {
        Self {
            source,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Bound each individual read by `call_timeout`.
    pub const fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub const fn source(&self) -> &S {
        &self.source
    }

    /// Resolve all four fields concurrently, substituting defaults for any
    /// field whose read fails or times out.
    pub async fn resolve(&self, token: Address) -> TokenMetadata {
        let (name, symbol, decimals, total_supply) = tokio::join!(
            self.read(token, "name", self.source.name(token)),
            self.read(token, "symbol", self.source.symbol(token)),
            self.read(token, "decimals", self.source.decimals(token)),
            self.read(token, "totalSupply", self.source.total_supply(token)),
        );

        TokenMetadata {
            name: name.unwrap_or_else(|| DEFAULT_NAME.to_string()),
            symbol: symbol.unwrap_or_else(|| DEFAULT_SYMBOL.to_string()),
            decimals: decimals.unwrap_or(DEFAULT_DECIMALS),
            total_supply: total_supply.unwrap_or(DEFAULT_TOTAL_SUPPLY),
        }
    }

    async fn read<T>(
        &self,
        token: Address,
        field: &'static str,
        call: impl Future<Output = eyre::Result<T>>,
    ) -> Option<T> {
        match tokio::time::timeout(self.call_timeout, call).await {
            Ok(Ok(value)) => Some(value),
            Ok(Err(e)) => {
                warn!(token = %token, field, error = %e, "Metadata read failed, using default");
                None
            }
            Err(_) => {
                warn!(
                    token = %token,
                    field,
                    timeout_ms = self.call_timeout.as_millis() as u64,
                    "Metadata read timed out, using default"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Source with a fixed answer per field; `None` makes that read fail.
    struct FixedSource {
        name: Option<&'static str>,
        symbol: Option<&'static str>,
        decimals: Option<u8>,
        total_supply: Option<u64>,
        stall_name: bool,
    }

    impl FixedSource {
        const fn failing() -> Self {
            Self {
                name: None,
                symbol: None,
                decimals: None,
                total_supply: None,
                stall_name: false,
            }
        }
    }

    impl MetadataSource for FixedSource {
        async fn name(&self, _token: Address) -> eyre::Result<String> {
            if self.stall_name {
                std::future::pending::<()>().await;
            }
            self.name
                .map(str::to_string)
                .ok_or_else(|| eyre::eyre!("execution reverted"))
        }

        async fn symbol(&self, _token: Address) -> eyre::Result<String> {
            self.symbol
                .map(str::to_string)
                .ok_or_else(|| eyre::eyre!("execution reverted"))
        }

        async fn decimals(&self, _token: Address) -> eyre::Result<u8> {
            self.decimals
                .ok_or_else(|| eyre::eyre!("execution reverted"))
        }

        async fn total_supply(&self, _token: Address) -> eyre::Result<U256> {
            self.total_supply
                .map(U256::from)
                .ok_or_else(|| eyre::eyre!("execution reverted"))
        }
    }

    #[tokio::test]
    async fn test_resolve_all_fields() {
        let resolver = MetadataResolver::new(FixedSource {
            name: Some("Wrapped Sonic"),
            symbol: Some("wS"),
            decimals: Some(18),
            total_supply: Some(1_000_000),
            stall_name: false,
        });

        let metadata = resolver.resolve(Address::from([1u8; 20])).await;
        assert_eq!(metadata.name, "Wrapped Sonic");
        assert_eq!(metadata.symbol, "wS");
        assert_eq!(metadata.decimals, 18);
        assert_eq!(metadata.total_supply, U256::from(1_000_000));
    }

    #[tokio::test]
    async fn test_resolve_all_fields_failing() {
        let resolver = MetadataResolver::new(FixedSource::failing());
        let metadata = resolver.resolve(Address::from([1u8; 20])).await;
        assert_eq!(metadata, TokenMetadata::fallback());
        assert_eq!(metadata.name, "Unknown Token");
        assert_eq!(metadata.symbol, "???");
        assert_eq!(metadata.decimals, 18);
        assert_eq!(metadata.total_supply, U256::ZERO);
    }

    #[tokio::test]
    async fn test_partial_failure_is_isolated() {
        let resolver = MetadataResolver::new(FixedSource {
            name: None,
            symbol: Some("USDC"),
            decimals: Some(6),
            total_supply: None,
            stall_name: false,
        });

        let metadata = resolver.resolve(Address::from([2u8; 20])).await;
        assert_eq!(metadata.name, DEFAULT_NAME);
        assert_eq!(metadata.symbol, "USDC");
        assert_eq!(metadata.decimals, 6);
        assert_eq!(metadata.total_supply, DEFAULT_TOTAL_SUPPLY);
    }

    #[tokio::test(start_paused = true)]
    async fn test_stalled_read_times_out_to_default() {
        let resolver = MetadataResolver::new(FixedSource {
            name: Some("never returned"),
            symbol: Some("SLOW"),
            decimals: Some(8),
            total_supply: Some(21),
            stall_name: true,
        })
        .with_call_timeout(Duration::from_millis(50));

        let metadata = resolver.resolve(Address::from([3u8; 20])).await;
        assert_eq!(metadata.name, DEFAULT_NAME);
        assert_eq!(metadata.symbol, "SLOW");
        assert_eq!(metadata.decimals, 8);
        assert_eq!(metadata.total_supply, U256::from(21));
    }
}
