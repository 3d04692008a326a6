use crate::MetadataSource;
use alloy_primitives::{Address, U256};
use alloy_provider::Provider;
use binding::IERC20;
use eyre::Result;
use tracing::debug;

/// Metadata source backed by `eth_call`s against the token contract.
#[derive(Debug, Clone)]
pub struct ContractMetadataSource<P> {
    provider: P,
}

impl<P> ContractMetadataSource<P>
where
    P: Provider + Clone,
{
    pub const fn new(provider: P) -> Self {
        Self { provider }
    }
}

impl<P> MetadataSource for ContractMetadataSource<P>
where
    P: Provider + Clone,
{
    async fn name(&self, token: Address) -> Result<String> {
        debug!("Querying erc20 name: token={}", token);

        let contract = IERC20::new(token, &self.provider);
        Ok(contract.name().call().await?)
    }

    async fn symbol(&self, token: Address) -> Result<String> {
        debug!("Querying erc20 symbol: token={}", token);

        let contract = IERC20::new(token, &self.provider);
        Ok(contract.symbol().call().await?)
    }

    async fn decimals(&self, token: Address) -> Result<u8> {
        debug!("Querying erc20 decimals: token={}", token);

        let contract = IERC20::new(token, &self.provider);
        Ok(contract.decimals().call().await?)
    }

    async fn total_supply(&self, token: Address) -> Result<U256> {
        debug!("Querying erc20 totalSupply: token={}", token);

        let contract = IERC20::new(token, &self.provider);
        Ok(contract.totalSupply().call().await?)
    }
}
