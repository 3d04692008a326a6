//! Create-on-first-reference for tokens, accounts and portfolios.

use crate::{LedgerError, Reconciler};
use alloy_primitives::{Address, U256};
use metadata::MetadataSource;
use store::{
    entity::{DEFAULT_SAFETY_LEVEL, ERC20_STANDARD},
    keys, Account, EntityStore, MarketData, Portfolio, Project, Token, TrailingVolume,
};
use tracing::debug;

impl<S, M> Reconciler<'_, S, M>
where
    S: EntityStore,
    M: MetadataSource,
{
    /// Load the token, creating it together with its Project and MarketData
    /// if this is the first time it is referenced.
    ///
    /// The metadata resolver is only consulted on creation.
    pub(crate) async fn ensure_token(&mut self, address: Address) -> Result<Token, LedgerError> {
        let id = keys::address_id(address);
        if let Some(token) = self.session.get::<Token>(&id).await? {
            return Ok(token);
        }

        let metadata = self.resolver.resolve(address).await;
        let capabilities = self.config.capabilities;

        let project = Project {
            id: keys::project_id(address),
            name: metadata.name.clone(),
            logo_url: String::new(),
            safety_level: DEFAULT_SAFETY_LEVEL.to_string(),
            is_spam: false,
        };

        let market = capabilities.market_data.then(|| MarketData {
            id: keys::market_id(address),
            token: id.clone(),
            total_supply: metadata.total_supply,
            circulating_supply: metadata.total_supply,
            volume_24h: U256::ZERO,
            trailing_volume: capabilities.trailing_volume.then(TrailingVolume::new),
            updated_at: 0,
        });

        let token = Token {
            id: id.clone(),
            address: id,
            chain: self.config.chain_id,
            symbol: metadata.symbol,
            name: metadata.name,
            decimals: metadata.decimals,
            standard: ERC20_STANDARD.to_string(),
            project: project.id.clone(),
            market_data: market.as_ref().map(|m| m.id.clone()),
            transaction_count: 0,
            transfer_volume: U256::ZERO,
            holder_count: 0,
            updated_at: 0,
        };

        self.session.set(project);
        if let Some(market) = market {
            self.session.set(market);
        }
        self.session.set(token.clone());
        self.tokens_created += 1;

        debug!(
            token = %token.id,
            name = %token.name,
            symbol = %token.symbol,
            decimals = token.decimals,
            "Created new token"
        );

        Ok(token)
    }

    /// Load the account, creating it if absent.
    pub(crate) async fn ensure_account(
        &mut self,
        address: Address,
    ) -> Result<Account, LedgerError> {
        let id = keys::address_id(address);
        if let Some(account) = self.session.get::<Account>(&id).await? {
            return Ok(account);
        }

        let account = Account::new(address);
        self.session.set(account.clone());
        debug!(account = %account.id, "Created new account");

        Ok(account)
    }

    /// Load the owner's portfolio, creating it (and its account first) if
    /// absent.
    pub(crate) async fn ensure_portfolio(
        &mut self,
        owner: Address,
    ) -> Result<Portfolio, LedgerError> {
        let id = keys::address_id(owner);
        if let Some(portfolio) = self.session.get::<Portfolio>(&id).await? {
            return Ok(portfolio);
        }

        let account = self.ensure_account(owner).await?;
        let portfolio = Portfolio {
            id: id.clone(),
            owner_address: id,
            chain: self.config.chain_name.clone(),
            account: account.id,
        };
        self.session.set(portfolio.clone());
        debug!(portfolio = %portfolio.id, "Created new portfolio");

        Ok(portfolio)
    }
}
