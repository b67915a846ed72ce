use ethers::types::{Address, U256};
use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use url::Url;

use crate::{
    constants::{FRAME_CREDITS, MOXIE_DECIMALS, MSG_INVALID_SEARCH, SHARE_MENTIONS, WARPCAST_COMPOSE_URL},
    error::{AppError, Result},
    utils::{format_amount, format_usd, path_segment, units_to_decimal},
};

const CHANNEL_PREFIX: &str = "cid:";
const FAN_PREFIX: &str = "fid:";

/// A fan-token symbol: `cid:<channel>` or `fid:<user id>`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TokenQuery {
    Channel(String),
    Fan(String),
}

impl TokenQuery {
    /// Normalizes free-text search input. Bare numbers are treated as user ids.
    pub fn from_search_input(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if !trimmed.is_empty() && trimmed.chars().all(|c| c.is_ascii_digit()) {
            return Ok(Self::Fan(trimmed.to_string()));
        }
        trimmed.parse()
    }

    pub fn symbol(&self) -> String {
        match self {
            Self::Channel(name) => format!("{}{}", CHANNEL_PREFIX, name),
            Self::Fan(id) => format!("{}{}", FAN_PREFIX, id),
        }
    }

    /// Identifier without its prefix.
    pub fn identifier(&self) -> &str {
        match self {
            Self::Channel(name) => name,
            Self::Fan(id) => id,
        }
    }
}

impl FromStr for TokenQuery {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self> {
        let value = value.trim();
        let parsed = if let Some(name) = value.strip_prefix(CHANNEL_PREFIX) {
            Self::Channel(name.trim().to_string())
        } else if let Some(id) = value.strip_prefix(FAN_PREFIX) {
            Self::Fan(id.trim().to_string())
        } else {
            return Err(AppError::BadRequest(MSG_INVALID_SEARCH.to_string()));
        };

        if parsed.identifier().is_empty() {
            return Err(AppError::BadRequest(MSG_INVALID_SEARCH.to_string()));
        }
        Ok(parsed)
    }
}

impl fmt::Display for TokenQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FanToken {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub holder_count: u64,
    pub subject_address: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressBalance {
    pub address: Address,
    pub balance: U256,
}

/// Addresses holding the largest balance and what they add up to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewardSelection {
    pub max_balance: U256,
    pub winning_addresses: Vec<Address>,
    pub total_balance: U256,
    pub total_fiat_value: Decimal,
}

impl RewardSelection {
    pub fn empty() -> Self {
        Self {
            max_balance: U256::zero(),
            winning_addresses: Vec::new(),
            total_balance: U256::zero(),
            total_fiat_value: Decimal::ZERO,
        }
    }

    /// Address whose allowance gates the burn buttons.
    pub fn top_address(&self) -> Option<Address> {
        self.winning_addresses.first().copied()
    }

    pub fn total_balance_tokens(&self) -> Result<Decimal> {
        units_to_decimal(self.total_balance, MOXIE_DECIMALS)
    }

    pub fn total_balance_display(&self) -> Result<String> {
        Ok(format_amount(self.total_balance_tokens()?))
    }

    pub fn total_fiat_display(&self) -> String {
        format_usd(self.total_fiat_value)
    }
}

/// `buySharesFor` arguments for a burn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BurnTransaction {
    pub subject_address: Address,
    pub deposit_amount: U256,
    pub on_behalf_of: Address,
    pub min_return_amount_after_fee: U256,
}

impl BurnTransaction {
    /// Shares are minted to the zero address, with no slippage floor.
    pub fn new(subject_address: Address, deposit_amount: U256) -> Self {
        Self {
            subject_address,
            deposit_amount,
            on_behalf_of: Address::zero(),
            min_return_amount_after_fee: U256::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareCard {
    pub fan_token: FanToken,
    pub token_symbol: String,
    pub total_burned: String,
}

impl ShareCard {
    pub fn share_text(&self) -> String {
        format!(
            "{} I just burned {} @moxie.eth for reward {} {} fan.\n\n{}",
            SHARE_MENTIONS,
            self.total_burned,
            self.fan_token.holder_count,
            self.fan_token.name,
            FRAME_CREDITS
        )
    }

    /// Link back into the read-only share screen.
    pub fn embed_url(&self, frame_url: &str) -> String {
        format!(
            "{}/share-by-user/{}/{}",
            frame_url,
            path_segment(&self.token_symbol),
            path_segment(&self.total_burned)
        )
    }

    /// Compose deep link with the post text and embed pre-filled.
    pub fn compose_url(&self, frame_url: &str) -> Result<String> {
        let embed = self.embed_url(frame_url);
        let text = self.share_text();
        let url = Url::parse_with_params(
            WARPCAST_COMPOSE_URL,
            &[("text", text.as_str()), ("embeds[]", embed.as_str())],
        )
        .map_err(|e| AppError::Internal(format!("Invalid share URL: {}", e)))?;
        Ok(url.to_string())
    }
}
