use ethers::types::Address;
use std::env;
use std::str::FromStr;

use crate::constants::{
    DEFAULT_AIRSTACK_API_URL, DEFAULT_FRAME_BASE_PATH, DEFAULT_MOXIE_BONDING_CURVE_ADDRESS,
    DEFAULT_MOXIE_SUBGRAPH_URL, DEFAULT_MOXIE_TOKEN_ADDRESS, DEFAULT_NEYNAR_API_URL,
    DEFAULT_PRICE_API_URL, DEFAULT_PRICE_COIN_ID, DEFAULT_PUBLIC_URL, DEFAULT_RPC_URL,
    BASE_CHAIN_ID,
};

#[derive(Debug, Clone)]
pub struct Config {
    // Server
    pub host: String,
    pub port: u16,
    pub environment: String,

    // Frame
    pub public_url: String,
    pub frame_base_path: String,

    // Blockchain
    pub base_rpc_url: String,
    pub chain_id: u64,

    // Contract Addresses
    pub moxie_token_address: String,
    pub moxie_bonding_curve_address: String,

    // External APIs
    pub moxie_subgraph_url: String,
    pub price_api_url: String,
    pub price_coin_id: String,
    pub price_api_key: Option<String>,
    pub neynar_api_url: String,
    pub neynar_api_key: String,
    pub airstack_api_url: String,
    pub airstack_api_key: Option<String>,
    pub http_timeout_secs: u64,

    // CORS
    pub cors_allowed_origins: String,
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        dotenv::dotenv().ok();

        Ok(Config {
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "3000".to_string())
                .parse()?,
            environment: env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),

            public_url: env::var("PUBLIC_URL").unwrap_or_else(|_| DEFAULT_PUBLIC_URL.to_string()),
            frame_base_path: env::var("FRAME_BASE_PATH")
                .unwrap_or_else(|_| DEFAULT_FRAME_BASE_PATH.to_string()),

            base_rpc_url: env::var("BASE_RPC_URL").unwrap_or_else(|_| DEFAULT_RPC_URL.to_string()),
            chain_id: env::var("CHAIN_ID")
                .unwrap_or_else(|_| BASE_CHAIN_ID.to_string())
                .parse()?,

            moxie_token_address: env::var("MOXIE_TOKEN_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_MOXIE_TOKEN_ADDRESS.to_string()),
            moxie_bonding_curve_address: env::var("MOXIE_BONDING_CURVE_ADDRESS")
                .unwrap_or_else(|_| DEFAULT_MOXIE_BONDING_CURVE_ADDRESS.to_string()),

            moxie_subgraph_url: env::var("MOXIE_SUBGRAPH_URL")
                .unwrap_or_else(|_| DEFAULT_MOXIE_SUBGRAPH_URL.to_string()),
            price_api_url: env::var("PRICE_API_URL")
                .unwrap_or_else(|_| DEFAULT_PRICE_API_URL.to_string()),
            price_coin_id: env::var("PRICE_COIN_ID")
                .unwrap_or_else(|_| DEFAULT_PRICE_COIN_ID.to_string()),
            price_api_key: env::var("CG_API_KEY").ok().filter(|v| !v.trim().is_empty()),
            neynar_api_url: env::var("NEYNAR_API_URL")
                .unwrap_or_else(|_| DEFAULT_NEYNAR_API_URL.to_string()),
            neynar_api_key: env::var("NEYNAR_API_KEY")
                .unwrap_or_else(|_| "NEYNAR_API_DOCS".to_string()),
            airstack_api_url: env::var("AIRSTACK_API_URL")
                .unwrap_or_else(|_| DEFAULT_AIRSTACK_API_URL.to_string()),
            airstack_api_key: env::var("AIRSTACK_API_KEY").ok().filter(|v| !v.trim().is_empty()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "12".to_string())
                .parse()?,

            cors_allowed_origins: env::var("CORS_ALLOWED_ORIGINS")
                .unwrap_or_else(|_| "*".to_string()),
        })
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.public_url.trim().is_empty() {
            anyhow::bail!("PUBLIC_URL is empty");
        }
        if self.base_rpc_url.trim().is_empty() {
            anyhow::bail!("BASE_RPC_URL is empty");
        }
        if self.moxie_subgraph_url.trim().is_empty() {
            anyhow::bail!("MOXIE_SUBGRAPH_URL is empty");
        }
        if self.price_api_url.trim().is_empty() {
            anyhow::bail!("PRICE_API_URL is empty");
        }
        if Address::from_str(self.moxie_token_address.trim()).is_err() {
            anyhow::bail!("MOXIE_TOKEN_ADDRESS is not a valid address");
        }
        if Address::from_str(self.moxie_bonding_curve_address.trim()).is_err() {
            anyhow::bail!("MOXIE_BONDING_CURVE_ADDRESS is not a valid address");
        }
        if self.http_timeout_secs == 0 {
            anyhow::bail!("HTTP_TIMEOUT_SECS must be > 0");
        }

        if self.neynar_api_key == "NEYNAR_API_DOCS" {
            tracing::warn!("Using Neynar docs API key; identity lookups will be rate limited");
        }
        if self.price_api_key.is_none() {
            tracing::warn!("CG_API_KEY not set; price lookups use the keyless tier");
        }
        if self.airstack_api_key.is_none() {
            tracing::warn!("AIRSTACK_API_KEY not set; profile images will be skipped");
        }
        if self.chain_id != BASE_CHAIN_ID {
            tracing::warn!("CHAIN_ID {} differs from Base mainnet", self.chain_id);
        }
        if self.cors_allowed_origins.trim().is_empty() {
            tracing::warn!("CORS_ALLOWED_ORIGINS is empty; requests may be blocked");
        }

        Ok(())
    }

    /// Absolute URL prefix every frame, image and transaction link is built on.
    pub fn frame_url(&self) -> String {
        let base = self.public_url.trim().trim_end_matches('/');
        let path = self.frame_base_path.trim().trim_matches('/');
        if path.is_empty() {
            base.to_string()
        } else {
            format!("{}/{}", base, path)
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.eq_ignore_ascii_case("production")
    }
}

#[cfg(test)]
pub(crate) fn test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 3000,
        environment: "test".to_string(),
        public_url: "https://frame.test".to_string(),
        frame_base_path: "/api/frame".to_string(),
        base_rpc_url: DEFAULT_RPC_URL.to_string(),
        chain_id: BASE_CHAIN_ID,
        moxie_token_address: DEFAULT_MOXIE_TOKEN_ADDRESS.to_string(),
        moxie_bonding_curve_address: DEFAULT_MOXIE_BONDING_CURVE_ADDRESS.to_string(),
        moxie_subgraph_url: DEFAULT_MOXIE_SUBGRAPH_URL.to_string(),
        price_api_url: DEFAULT_PRICE_API_URL.to_string(),
        price_coin_id: DEFAULT_PRICE_COIN_ID.to_string(),
        price_api_key: None,
        neynar_api_url: DEFAULT_NEYNAR_API_URL.to_string(),
        neynar_api_key: "test".to_string(),
        airstack_api_url: DEFAULT_AIRSTACK_API_URL.to_string(),
        airstack_api_key: None,
        http_timeout_secs: 5,
        cors_allowed_origins: "*".to_string(),
    }
}
