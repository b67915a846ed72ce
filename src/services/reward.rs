use ethers::types::{Address, U256};
use futures_util::future::try_join_all;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::Decimal;
use std::sync::Arc;

use crate::{
    error::{AppError, Result},
    integrations::PriceOracle,
    models::{AddressBalance, RewardSelection},
    services::onchain::ChainReader,
};

/// Scans a user's verified wallets and sizes the reward from the richest ones.
pub struct RewardCalculator {
    chain: Arc<dyn ChainReader>,
    prices: Arc<dyn PriceOracle>,
}

impl RewardCalculator {
    pub fn new(chain: Arc<dyn ChainReader>, prices: Arc<dyn PriceOracle>) -> Self {
        Self { chain, prices }
    }

    /// Reads every balance, keeps all addresses tied at the maximum and prices their sum.
    pub async fn compute(&self, addresses: &[Address]) -> Result<RewardSelection> {
        let candidates = dedupe_addresses(addresses);
        if candidates.is_empty() {
            return Ok(RewardSelection::empty());
        }

        let balances = try_join_all(candidates.iter().map(|address| async move {
            let balance = self.chain.balance_of(*address).await?;
            Ok::<_, AppError>(AddressBalance {
                address: *address,
                balance,
            })
        }))
        .await?;

        let mut selection = select_max_holders(&balances);
        tracing::info!(
            "Addresses with the highest balance ({}): {:?}",
            selection.max_balance,
            selection.winning_addresses
        );

        if selection.total_balance.is_zero() {
            return Ok(selection);
        }

        let rate = self.prices.usd_price().await?;
        selection.total_fiat_value = fiat_value(selection.total_balance_tokens()?, rate)?;
        Ok(selection)
    }
}

/// Every address whose balance equals the maximum wins; ties are summed.
pub fn select_max_holders(balances: &[AddressBalance]) -> RewardSelection {
    let max_balance = balances
        .iter()
        .map(|entry| entry.balance)
        .fold(U256::zero(), |max, balance| max.max(balance));

    let winners: Vec<&AddressBalance> = balances
        .iter()
        .filter(|entry| entry.balance == max_balance)
        .collect();
    let total_balance = winners
        .iter()
        .fold(U256::zero(), |total, entry| total.saturating_add(entry.balance));

    RewardSelection {
        max_balance,
        winning_addresses: winners.iter().map(|entry| entry.address).collect(),
        total_balance,
        total_fiat_value: Decimal::ZERO,
    }
}

pub fn fiat_value(tokens: Decimal, usd_rate: f64) -> Result<Decimal> {
    let rate = Decimal::from_f64(usd_rate)
        .ok_or_else(|| AppError::ExternalAPI(format!("Unusable USD rate {}", usd_rate)))?;
    tokens
        .checked_mul(rate)
        .ok_or_else(|| AppError::Internal("Fiat value overflow".to_string()))
}

// Internal helper that drops repeated addresses while keeping first-seen order.
fn dedupe_addresses(addresses: &[Address]) -> Vec<Address> {
    let mut unique = Vec::with_capacity(addresses.len());
    for address in addresses {
        if !unique.contains(address) {
            unique.push(*address);
        }
    }
    unique
}
