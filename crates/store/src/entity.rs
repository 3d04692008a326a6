//! Entity records materialized from token events.
//!
//! Records reference each other by id only. No record is ever deleted.

use crate::{keys, volume::TrailingVolume};
use alloy_primitives::{Address, I256, U256};
use serde::{Deserialize, Serialize};
use std::{collections::BTreeMap, fmt};

/// Token standard recorded on every Token.
pub const ERC20_STANDARD: &str = "ERC20";
/// Safety level assigned to a freshly discovered project.
pub const DEFAULT_SAFETY_LEVEL: &str = "unknown";

/// The kinds of entity kept by a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Account,
    Project,
    MarketData,
    Token,
    Portfolio,
    TokenBalance,
    Approval,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Account => "Account",
            Self::Project => "Project",
            Self::MarketData => "MarketData",
            Self::Token => "Token",
            Self::Portfolio => "Portfolio",
            Self::TokenBalance => "TokenBalance",
            Self::Approval => "Approval",
        };
        f.write_str(name)
    }
}

/// A record kept in its own table, addressed by a string id.
pub trait Entity: Clone + Send + Sync + 'static {
    const KIND: EntityKind;

    fn id(&self) -> &str;

    /// The table holding records of this kind.
    fn table(tables: &Tables) -> &BTreeMap<String, Self>;

    fn table_mut(tables: &mut Tables) -> &mut BTreeMap<String, Self>;
}

macro_rules! impl_entity {
    ($ty:ty, $kind:ident, $field:ident) => {
        impl Entity for $ty {
            const KIND: EntityKind = EntityKind::$kind;

            fn id(&self) -> &str {
                &self.id
            }

            fn table(tables: &Tables) -> &BTreeMap<String, Self> {
                &tables.$field
            }

            fn table_mut(tables: &mut Tables) -> &mut BTreeMap<String, Self> {
                &mut tables.$field
            }
        }
    };
}

/// An address that has appeared in any event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    pub id: String,
}

impl Account {
    pub fn new(address: Address) -> Self {
        Self {
            id: keys::address_id(address),
        }
    }
}

/// Presentation data for a token, created alongside it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub logo_url: String,
    pub safety_level: String,
    pub is_spam: bool,
}

/// Supply and volume figures for a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketData {
    pub id: String,
    pub token: String,
    /// `totalSupply()` as read when the token was first seen
    pub total_supply: U256,
    pub circulating_supply: U256,
    /// Cumulative transfer volume since the token was first seen. Despite the
    /// name this is not windowed; see `trailing_volume`.
    pub volume_24h: U256,
    /// Bucketed volume of the trailing 24 hours, when enabled
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trailing_volume: Option<TrailingVolume>,
    pub updated_at: u64,
}

/// An ERC20 contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Token {
    pub id: String,
    pub address: String,
    pub chain: u64,
    pub symbol: String,
    pub name: String,
    pub decimals: u8,
    pub standard: String,
    pub project: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub market_data: Option<String>,
    pub transaction_count: u64,
    pub transfer_volume: U256,
    /// Number of balances of this token that are strictly positive
    pub holder_count: u64,
    pub updated_at: u64,
}

/// The set of balances held by one owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Portfolio {
    pub id: String,
    pub owner_address: String,
    pub chain: String,
    pub account: String,
}

/// Balance of one owner in one token.
///
/// Signed: a non-compliant token, or events delivered out of order, can drive
/// a balance below zero, and that value is kept rather than clamped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenBalance {
    pub id: String,
    pub owner: String,
    pub token: String,
    pub quantity: I256,
}

/// Allowance granted by an owner to a spender, as of the latest event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub id: String,
    pub owner: String,
    pub spender: String,
    pub token: String,
    pub amount: U256,
}

impl_entity!(Account, Account, accounts);
impl_entity!(Project, Project, projects);
impl_entity!(MarketData, MarketData, market_data);
impl_entity!(Token, Token, tokens);
impl_entity!(Portfolio, Portfolio, portfolios);
impl_entity!(TokenBalance, TokenBalance, balances);
impl_entity!(Approval, Approval, approvals);

/// One table per entity kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tables {
    pub accounts: BTreeMap<String, Account>,
    pub projects: BTreeMap<String, Project>,
    pub market_data: BTreeMap<String, MarketData>,
    pub tokens: BTreeMap<String, Token>,
    pub portfolios: BTreeMap<String, Portfolio>,
    pub balances: BTreeMap<String, TokenBalance>,
    pub approvals: BTreeMap<String, Approval>,
}

impl Tables {
    pub fn get<E: Entity>(&self, id: &str) -> Option<&E> {
        E::table(self).get(id)
    }

    /// Insert or replace a record.
    pub fn insert<E: Entity>(&mut self, entity: E) {
        E::table_mut(self).insert(entity.id().to_string(), entity);
    }

    /// Total number of records across all tables.
    pub fn len(&self) -> usize {
        self.accounts.len()
            + self.projects.len()
            + self.market_data.len()
            + self.tokens.len()
            + self.portfolios.len()
            + self.balances.len()
            + self.approvals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Overwrite records in `self` with every record in `other`.
    pub fn merge(&mut self, other: Self) {
        self.accounts.extend(other.accounts);
        self.projects.extend(other.projects);
        self.market_data.extend(other.market_data);
        self.tokens.extend(other.tokens);
        self.portfolios.extend(other.portfolios);
        self.balances.extend(other.balances);
        self.approvals.extend(other.approvals);
    }

    /// Balances held in `token`.
    pub fn balances_of(&self, token: Address) -> impl Iterator<Item = &TokenBalance> {
        let token = keys::address_id(token);
        self.balances.values().filter(move |b| b.token == token)
    }
}
