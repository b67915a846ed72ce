use async_trait::async_trait;
use ethers::types::Address;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::str::FromStr;

use super::{graphql::GraphQlClient, json_as_u64, TokenDirectory};
use crate::{
    config::Config,
    error::{AppError, Result},
    models::FanToken,
};

const SUBJECT_TOKEN_QUERY: &str = r#"
query GetToken($fanTokenSymbol: String) {
  subjectTokens(where: { symbol: $fanTokenSymbol }) {
    id
    name
    symbol
    uniqueHolders
    subject {
      id
    }
  }
}
"#;

/// Moxie protocol subgraph (fan-token registry).
#[derive(Debug, Clone)]
pub struct MoxieSubgraphClient {
    graph: GraphQlClient,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectTokensData {
    #[serde(default)]
    subject_tokens: Vec<SubjectTokenRow>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SubjectTokenRow {
    id: String,
    name: String,
    symbol: String,
    #[serde(default)]
    unique_holders: serde_json::Value,
    subject: Option<SubjectRef>,
}

#[derive(Debug, Deserialize)]
struct SubjectRef {
    id: String,
}

impl MoxieSubgraphClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            graph: GraphQlClient::new(client, config.moxie_subgraph_url.trim(), "Moxie subgraph"),
        }
    }
}

#[async_trait]
impl TokenDirectory for MoxieSubgraphClient {
    async fn find_by_symbol(&self, symbol: &str) -> Result<Option<FanToken>> {
        let data: SubjectTokensData = self
            .graph
            .query(SUBJECT_TOKEN_QUERY, json!({ "fanTokenSymbol": symbol }))
            .await?;
        data.subject_tokens
            .into_iter()
            .next()
            .map(into_fan_token)
            .transpose()
    }
}

// Internal helper that maps a subgraph row into a `FanToken`.
fn into_fan_token(row: SubjectTokenRow) -> Result<FanToken> {
    let subject_id = row
        .subject
        .map(|subject| subject.id)
        .ok_or_else(|| AppError::ExternalAPI(format!("Fan token {} has no subject", row.symbol)))?;
    let subject_address = Address::from_str(subject_id.trim()).map_err(|_| {
        AppError::ExternalAPI(format!("Fan token {} has invalid subject {}", row.symbol, subject_id))
    })?;

    Ok(FanToken {
        id: row.id,
        name: row.name,
        symbol: row.symbol,
        holder_count: json_as_u64(&row.unique_holders).unwrap_or(0),
        subject_address,
    })
}
