use async_trait::async_trait;
use ethers::{
    providers::{Http, Middleware, Provider},
    types::{Address, H256, U256},
};
use std::str::FromStr;
use std::sync::Arc;

use crate::{
    config::Config,
    error::{AppError, Result},
};

ethers::contract::abigen!(
    MoxieToken,
    r#"[
        function balanceOf(address) view returns (uint256)
        function allowance(address,address) view returns (uint256)
    ]"#
);

/// Read-only view of the reward token and submitted transactions.
#[async_trait]
pub trait ChainReader: Send + Sync {
    async fn balance_of(&self, owner: Address) -> Result<U256>;

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256>;

    /// Call data of a transaction, `None` while the node does not know the hash.
    async fn transaction_input(&self, tx_hash: H256) -> Result<Option<Vec<u8>>>;
}

pub struct EvmChainReader {
    provider: Arc<Provider<Http>>,
    token: MoxieToken<Provider<Http>>,
}

impl EvmChainReader {
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = Provider::<Http>::try_from(config.base_rpc_url.trim())
            .map_err(|e| AppError::Internal(format!("Invalid EVM RPC URL: {}", e)))?;
        let provider = Arc::new(provider);
        let token_address = parse_address(&config.moxie_token_address)?;
        let token = MoxieToken::new(token_address, provider.clone());
        Ok(Self { provider, token })
    }
}

#[async_trait]
impl ChainReader for EvmChainReader {
    async fn balance_of(&self, owner: Address) -> Result<U256> {
        self.token
            .balance_of(owner)
            .call()
            .await
            .map_err(|e| AppError::BlockchainRPC(format!("balanceOf({:?}) failed: {}", owner, e)))
    }

    async fn allowance(&self, owner: Address, spender: Address) -> Result<U256> {
        self.token
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| AppError::BlockchainRPC(format!("allowance({:?}) failed: {}", owner, e)))
    }

    async fn transaction_input(&self, tx_hash: H256) -> Result<Option<Vec<u8>>> {
        let tx = self
            .provider
            .get_transaction(tx_hash)
            .await
            .map_err(|e| AppError::BlockchainRPC(e.to_string()))?;
        Ok(tx.map(|tx| tx.input.to_vec()))
    }
}

pub fn parse_address(value: &str) -> Result<Address> {
    Address::from_str(value.trim())
        .map_err(|_| AppError::BadRequest(format!("Invalid EVM address: {}", value.trim())))
}

pub fn parse_tx_hash(value: &str) -> Result<H256> {
    let trimmed = value.trim();
    let hex_part = trimmed.strip_prefix("0x").unwrap_or(trimmed);
    if hex_part.len() != 64 {
        return Err(AppError::BadRequest(format!(
            "Invalid transaction hash: {}",
            trimmed
        )));
    }
    H256::from_str(hex_part)
        .map_err(|_| AppError::BadRequest(format!("Invalid transaction hash: {}", trimmed)))
}
