// In-memory collaborators for flow and service tests.

use async_trait::async_trait;
use ethers::types::{Address, H256, U256};
use std::collections::HashMap;

use crate::{
    error::{AppError, Result},
    integrations::{IdentityProvider, PriceOracle, ProfileImageSource, TokenDirectory},
    models::{FanToken, FrameActionPayload, TokenQuery},
    services::onchain::ChainReader,
};

#[derive(Default)]
pub struct FakeChain {
    balances: HashMap<Address, U256>,
    allowance: U256,
    transactions: HashMap<H256, Vec<u8>>,
}

impl FakeChain {
    pub fn with_balance(mut self, owner: Address, balance: U256) -> Self {
        self.balances.insert(owner, balance);
        self
    }

    pub fn with_allowance(mut self, allowance: U256) -> Self {
        self.allowance = allowance;
        self
    }

    pub fn with_transaction(mut self, hash: H256, input: Vec<u8>) -> Self {
        self.transactions.insert(hash, input);
        self
    }
}

#[async_trait]
impl ChainReader for FakeChain {
    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.balances
            .get(&owner)
            .copied()
            .ok_or_else(|| AppError::BlockchainRPC(format!("no balance for {:?}", owner)))
    }

    async fn allowance(&self, _owner: Address, _spender: Address) -> Result<U256> {
        Ok(self.allowance)
    }

    async fn transaction_input(&self, tx_hash: H256) -> Result<Option<Vec<u8>>> {
        Ok(self.transactions.get(&tx_hash).cloned())
    }
}

pub struct FakePrices(Option<f64>);

impl FakePrices {
    pub fn at(rate: f64) -> Self {
        Self(Some(rate))
    }

    pub fn failing() -> Self {
        Self(None)
    }
}

#[async_trait]
impl PriceOracle for FakePrices {
    async fn usd_price(&self) -> Result<f64> {
        self.0
            .ok_or_else(|| AppError::ExternalAPI("price feed offline".to_string()))
    }
}

#[derive(Default)]
pub struct FakeDirectory {
    tokens: HashMap<String, FanToken>,
    offline: bool,
}

impl FakeDirectory {
    pub fn with_token(mut self, token: FanToken) -> Self {
        self.tokens.insert(token.symbol.clone(), token);
        self
    }

    pub fn offline() -> Self {
        Self {
            tokens: HashMap::new(),
            offline: true,
        }
    }
}

#[async_trait]
impl TokenDirectory for FakeDirectory {
    async fn find_by_symbol(&self, symbol: &str) -> Result<Option<FanToken>> {
        if self.offline {
            return Err(AppError::ExternalAPI("subgraph offline".to_string()));
        }
        Ok(self.tokens.get(symbol).cloned())
    }
}

pub struct FakeIdentity(pub Vec<Address>);

#[async_trait]
impl IdentityProvider for FakeIdentity {
    async fn verified_addresses(&self, _payload: &FrameActionPayload) -> Result<Vec<Address>> {
        Ok(self.0.clone())
    }
}

pub struct FakeImages(pub Option<String>);

#[async_trait]
impl ProfileImageSource for FakeImages {
    async fn profile_image(&self, _query: &TokenQuery) -> Option<String> {
        self.0.clone()
    }
}

pub fn fan_token(symbol: &str, name: &str, holders: u64) -> FanToken {
    FanToken {
        id: format!("token-{}", symbol),
        name: name.to_string(),
        symbol: symbol.to_string(),
        holder_count: holders,
        subject_address: Address::repeat_byte(0x5a),
    }
}
