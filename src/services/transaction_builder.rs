use ethers::types::{Address, U256};
use ethers::utils::to_checksum;
use std::sync::Arc;

use crate::{
    constants::{MOXIE_DECIMALS, UNLIMITED_ALLOWANCE_EXPONENT, UNLIMITED_APPROVAL_EXPONENT},
    error::{AppError, Result},
    models::{frame::TransactionParams, BurnTransaction, TransactionCall},
    services::{
        contracts::ContractSet,
        onchain::{parse_tx_hash, ChainReader},
    },
    utils::parse_token_amount,
};

/// Builds the approve / burn calls and reads burns back after submission.
pub struct TransactionBuilder {
    chain: Arc<dyn ChainReader>,
    contracts: ContractSet,
}

impl TransactionBuilder {
    pub fn new(chain: Arc<dyn ChainReader>, contracts: ContractSet) -> Self {
        Self { chain, contracts }
    }

    pub fn contracts(&self) -> &ContractSet {
        &self.contracts
    }

    /// True when `owner` has not granted the bonding curve an effectively unlimited allowance.
    ///
    /// Without any owner there is nothing to check and approval is requested.
    pub async fn requires_approval(&self, owner: Option<Address>) -> Result<bool> {
        let Some(owner) = owner else {
            return Ok(true);
        };
        let allowance = self
            .chain
            .allowance(owner, self.contracts.bonding_curve_address)
            .await?;
        tracing::info!("Allowance for {:?}: {}", owner, allowance);
        Ok(allowance < unlimited_allowance_threshold())
    }

    pub fn approve(&self) -> Result<TransactionCall> {
        let data = self
            .contracts
            .encode_approve(self.contracts.bonding_curve_address, unlimited_approval_amount())?;
        self.call(self.contracts.token_address, self.contracts.token_abi_json()?, data)
    }

    /// Burns the caller's whole balance into `subject`'s bonding curve.
    pub async fn burn_all(&self, subject: Address, caller: Address) -> Result<TransactionCall> {
        let balance = self.chain.balance_of(caller).await?;
        tracing::info!("Burn all for {:?}: {} units into {:?}", caller, balance, subject);
        self.burn(BurnTransaction::new(subject, balance))
    }

    /// Burns the amount typed into the frame input.
    pub fn burn_selected(&self, subject: Address, input: Option<&str>) -> Result<TransactionCall> {
        let amount = parse_token_amount(input, MOXIE_DECIMALS);
        tracing::info!("Burn selected {:?} -> {} units into {:?}", input, amount, subject);
        self.burn(BurnTransaction::new(subject, amount))
    }

    /// Deposit amount of a submitted `buySharesFor` transaction.
    ///
    /// Anything short of a decodable burn is reported as still pending.
    pub async fn burned_amount(&self, tx_hash: &str) -> Result<U256> {
        let hash = parse_tx_hash(tx_hash).map_err(pending)?;
        let input = self
            .chain
            .transaction_input(hash)
            .await
            .map_err(pending)?
            .ok_or_else(|| AppError::PendingConfirmation(format!("{} not found yet", tx_hash)))?;
        let burn = self
            .contracts
            .decode_buy_shares_for(&input)
            .map_err(pending)?;
        Ok(burn.deposit_amount)
    }

    fn burn(&self, burn: BurnTransaction) -> Result<TransactionCall> {
        let data = self.contracts.encode_buy_shares_for(&burn)?;
        self.call(
            self.contracts.bonding_curve_address,
            self.contracts.bonding_curve_abi_json()?,
            data,
        )
    }

    fn call(&self, to: Address, abi: serde_json::Value, data: Vec<u8>) -> Result<TransactionCall> {
        Ok(TransactionCall {
            chain_id: self.contracts.caip_chain_id(),
            method: "eth_sendTransaction".to_string(),
            attribution: false,
            params: TransactionParams {
                abi,
                to: to_checksum(&to, None),
                data: format!("0x{}", hex::encode(data)),
                value: "0".to_string(),
            },
        })
    }
}

pub fn unlimited_allowance_threshold() -> U256 {
    U256::exp10(UNLIMITED_ALLOWANCE_EXPONENT)
}

pub fn unlimited_approval_amount() -> U256 {
    U256::exp10(UNLIMITED_APPROVAL_EXPONENT)
}

fn pending(err: AppError) -> AppError {
    AppError::PendingConfirmation(err.to_string())
}
