pub mod airstack;
pub mod coingecko;
pub mod graphql;
pub mod neynar;
pub mod subgraph;

use async_trait::async_trait;
use ethers::types::Address;
use std::time::Duration;

use crate::{
    error::{AppError, Result},
    models::{FanToken, FrameActionPayload, TokenQuery},
};

pub use airstack::AirstackClient;
pub use coingecko::CoinGeckoClient;
pub use neynar::NeynarClient;
pub use subgraph::MoxieSubgraphClient;

// ==================== COLLABORATOR TRAITS ====================

/// Resolves fan-token symbols to token records.
#[async_trait]
pub trait TokenDirectory: Send + Sync {
    async fn find_by_symbol(&self, symbol: &str) -> Result<Option<FanToken>>;
}

/// Current USD value of one reward token.
#[async_trait]
pub trait PriceOracle: Send + Sync {
    async fn usd_price(&self) -> Result<f64>;
}

/// Verified wallet addresses of whoever pressed the button.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn verified_addresses(&self, payload: &FrameActionPayload) -> Result<Vec<Address>>;
}

/// Avatar of the user or channel behind a fan token. Lookups never fail the screen.
#[async_trait]
pub trait ProfileImageSource: Send + Sync {
    async fn profile_image(&self, query: &TokenQuery) -> Option<String>;
}

// ==================== SHARED HELPERS ====================

pub fn http_client(timeout_secs: u64) -> Result<reqwest::Client> {
    reqwest::Client::builder()
        .connect_timeout(Duration::from_secs(4))
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .build()
        .map_err(|e| AppError::Internal(format!("HTTP client init failed: {}", e)))
}

// Internal helper that reads a JSON number or numeric string.
pub(crate) fn json_as_u64(value: &serde_json::Value) -> Option<u64> {
    value
        .as_u64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse::<u64>().ok()))
        .or_else(|| value.as_f64().filter(|v| *v >= 0.0).map(|v| v as u64))
}
