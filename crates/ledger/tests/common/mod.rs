//! Shared fixtures for ledger integration tests.
#![allow(dead_code)]

use alloy_primitives::{Address, I256, U256};
use config::{Capabilities, ChainConfig, LedgerConfig};
use ledger::{ApprovalEvent, Dispatcher, TransferEvent};
use metadata::{MetadataResolver, MetadataSource};
use store::{ChangeSet, Entity, EntityStore, MemoryStore, StoreError, Tables};
use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    Arc,
};

pub const TOKEN: Address = Address::new([0x70; 20]);
pub const ALICE: Address = Address::new([0xa1; 20]);
pub const BOB: Address = Address::new([0xb0; 20]);
pub const CAROL: Address = Address::new([0xc4; 20]);

/// Metadata source answering from fixed values and counting every read.
#[derive(Clone, Default)]
pub struct ScriptedSource {
    pub name: Option<String>,
    pub symbol: Option<String>,
    pub decimals: Option<u8>,
    pub total_supply: Option<U256>,
    pub reads: Arc<AtomicUsize>,
}

impl ScriptedSource {
    pub fn token(name: &str, symbol: &str, decimals: u8, total_supply: u64) -> Self {
        Self {
            name: Some(name.to_string()),
            symbol: Some(symbol.to_string()),
            decimals: Some(decimals),
            total_supply: Some(U256::from(total_supply)),
            reads: Arc::default(),
        }
    }

    /// Every read reverts.
    pub fn reverting() -> Self {
        Self::default()
    }

    pub fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }

    fn answer<T: Clone>(&self, value: &Option<T>) -> eyre::Result<T> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        value.clone().ok_or_else(|| eyre::eyre!("execution reverted"))
    }
}

impl MetadataSource for ScriptedSource {
    async fn name(&self, _token: Address) -> eyre::Result<String> {
        self.answer(&self.name)
    }

    async fn symbol(&self, _token: Address) -> eyre::Result<String> {
        self.answer(&self.symbol)
    }

    async fn decimals(&self, _token: Address) -> eyre::Result<u8> {
        self.answer(&self.decimals)
    }

    async fn total_supply(&self, _token: Address) -> eyre::Result<U256> {
        self.answer(&self.total_supply)
    }
}

/// Memory store whose commits can be made to fail on demand.
#[derive(Default)]
pub struct FlakyStore {
    inner: MemoryStore,
    fail_commits: AtomicBool,
}

impl FlakyStore {
    pub fn fail_commits(&self, fail: bool) {
        self.fail_commits.store(fail, Ordering::SeqCst);
    }

    pub fn snapshot(&self) -> Tables {
        self.inner.snapshot().unwrap()
    }
}

impl EntityStore for FlakyStore {
    async fn get<E: Entity>(&self, id: &str) -> Result<Option<E>, StoreError> {
        self.inner.get(id).await
    }

    async fn commit(&self, changes: ChangeSet) -> Result<(), StoreError> {
        if self.fail_commits.load(Ordering::SeqCst) {
            return Err(StoreError::Commit {
                records: changes.len(),
                reason: "injected failure".to_string(),
            });
        }
        self.inner.commit(changes).await
    }
}

pub type TestDispatcher = Dispatcher<FlakyStore, ScriptedSource>;

pub fn ledger_config() -> LedgerConfig {
    LedgerConfig::for_chain(&ChainConfig::sonic())
}

pub fn dispatcher_with(source: ScriptedSource, config: LedgerConfig) -> TestDispatcher {
    Dispatcher::new(FlakyStore::default(), MetadataResolver::new(source), config)
}

pub fn dispatcher() -> TestDispatcher {
    dispatcher_with(
        ScriptedSource::token("Wrapped Sonic", "wS", 18, 5_000),
        ledger_config(),
    )
}

pub fn minimal_dispatcher() -> TestDispatcher {
    dispatcher_with(
        ScriptedSource::token("Wrapped Sonic", "wS", 18, 5_000),
        ledger_config().with_capabilities(Capabilities::minimal()),
    )
}

pub fn transfer(from: Address, to: Address, value: u64) -> TransferEvent {
    transfer_at(from, to, value, 1_700_000_000)
}

pub fn transfer_at(from: Address, to: Address, value: u64, timestamp: u64) -> TransferEvent {
    TransferEvent {
        token: TOKEN,
        from,
        to,
        value: U256::from(value),
        timestamp,
    }
}

pub fn approval(owner: Address, spender: Address, value: u64) -> ApprovalEvent {
    ApprovalEvent {
        token: TOKEN,
        owner,
        spender,
        value: U256::from(value),
    }
}

pub fn signed(value: i64) -> I256 {
    let magnitude = I256::from_raw(U256::from(value.unsigned_abs()));
    if value < 0 {
        -magnitude
    } else {
        magnitude
    }
}

pub fn token(tables: &Tables) -> &store::Token {
    tables
        .get(&store::keys::address_id(TOKEN))
        .expect("token materialized")
}

pub fn balance(tables: &Tables, owner: Address) -> I256 {
    tables
        .get::<store::TokenBalance>(&store::keys::balance_id(owner, TOKEN))
        .map_or(I256::ZERO, |b| b.quantity)
}

/// Number of balances of `TOKEN` that are strictly positive.
pub fn positive_balances(tables: &Tables) -> u64 {
    tables
        .balances_of(TOKEN)
        .filter(|b| b.quantity.is_positive())
        .count() as u64
}
