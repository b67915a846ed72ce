use async_trait::async_trait;
use ethers::types::Address;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use url::Url;

use super::IdentityProvider;
use crate::{
    config::Config,
    error::{AppError, Result},
    models::FrameActionPayload,
};

/// Neynar hub API: validates signed frame actions and reads verified addresses.
#[derive(Debug, Clone)]
pub struct NeynarClient {
    client: Client,
    api_url: String,
    api_key: String,
}

#[derive(Serialize)]
struct ValidateFrameRequest<'a> {
    message_bytes_in_hex: &'a str,
}

#[derive(Debug, Deserialize)]
struct ValidateFrameResponse {
    valid: bool,
    action: Option<ValidatedAction>,
}

#[derive(Debug, Deserialize)]
struct ValidatedAction {
    interactor: Option<NeynarUser>,
}

#[derive(Debug, Deserialize)]
struct BulkUsersResponse {
    #[serde(default)]
    users: Vec<NeynarUser>,
}

#[derive(Debug, Deserialize)]
struct NeynarUser {
    #[serde(default)]
    verified_addresses: VerifiedAddresses,
}

#[derive(Debug, Default, Deserialize)]
struct VerifiedAddresses {
    #[serde(default)]
    eth_addresses: Vec<String>,
}

impl NeynarClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.neynar_api_url.trim().trim_end_matches('/').to_string(),
            api_key: config.neynar_api_key.clone(),
        }
    }

    async fn validate_frame_action(&self, message_bytes: &str) -> Result<Vec<String>> {
        let url = format!("{}/v2/farcaster/frame/validate", self.api_url);
        let response = self
            .client
            .post(url)
            .header("api_key", self.api_key.as_str())
            .json(&ValidateFrameRequest {
                message_bytes_in_hex: message_bytes,
            })
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Neynar validate failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(AppError::ExternalAPI(format!(
                "Neynar validate returned {}",
                response.status()
            )));
        }

        let body: ValidateFrameResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Neynar validate parse failed: {}", e)))?;
        interactor_addresses(body)
    }

    async fn user_addresses(&self, fid: u64) -> Result<Vec<String>> {
        let mut url = Url::parse(&format!("{}/v2/farcaster/user/bulk", self.api_url))
            .map_err(|e| AppError::Internal(format!("Invalid Neynar URL: {}", e)))?;
        url.query_pairs_mut().append_pair("fids", &fid.to_string());

        let response = self
            .client
            .get(url)
            .header("api_key", self.api_key.as_str())
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Neynar user lookup failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(AppError::ExternalAPI(format!(
                "Neynar user lookup returned {}",
                response.status()
            )));
        }

        let body: BulkUsersResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Neynar user parse failed: {}", e)))?;
        Ok(body
            .users
            .into_iter()
            .next()
            .map(|user| user.verified_addresses.eth_addresses)
            .unwrap_or_default())
    }
}

#[async_trait]
impl IdentityProvider for NeynarClient {
    async fn verified_addresses(&self, payload: &FrameActionPayload) -> Result<Vec<Address>> {
        let raw = if let Some(message_bytes) = payload.message_bytes() {
            self.validate_frame_action(message_bytes).await?
        } else if let Some(fid) = payload.fid() {
            self.user_addresses(fid).await?
        } else {
            tracing::debug!("Frame action carries no identity; no verified addresses");
            Vec::new()
        };
        Ok(parse_verified_addresses(&raw))
    }
}

fn interactor_addresses(body: ValidateFrameResponse) -> Result<Vec<String>> {
    if !body.valid {
        return Err(AppError::InvalidSignature);
    }
    Ok(body
        .action
        .and_then(|action| action.interactor)
        .map(|user| user.verified_addresses.eth_addresses)
        .unwrap_or_default())
}

// Internal helper that parses addresses, skipping anything malformed.
fn parse_verified_addresses(raw: &[String]) -> Vec<Address> {
    raw.iter()
        .filter_map(|candidate| match Address::from_str(candidate.trim()) {
            Ok(address) => Some(address),
            Err(_) => {
                tracing::warn!("Skipping malformed verified address {}", candidate);
                None
            }
        })
        .collect()
}
