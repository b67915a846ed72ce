use reqwest::Client;
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use serde_json::Value;

use crate::error::{AppError, Result};

/// Minimal GraphQL-over-HTTP client used by the subgraph and Airstack lookups.
#[derive(Debug, Clone)]
pub struct GraphQlClient {
    client: Client,
    endpoint: String,
    auth_header: Option<(&'static str, String)>,
    label: &'static str,
}

#[derive(Serialize)]
struct GraphQlRequest<'a> {
    query: &'a str,
    variables: Value,
}

#[derive(Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Deserialize)]
struct GraphQlError {
    message: String,
}

impl GraphQlClient {
    pub fn new(client: Client, endpoint: impl Into<String>, label: &'static str) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
            auth_header: None,
            label,
        }
    }

    pub fn with_auth_header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.auth_header = Some((name, value.into()));
        self
    }

    pub async fn query<T: DeserializeOwned>(&self, query: &str, variables: Value) -> Result<T> {
        let mut request = self
            .client
            .post(&self.endpoint)
            .json(&GraphQlRequest { query, variables });
        if let Some((name, value)) = &self.auth_header {
            request = request.header(*name, value.as_str());
        }

        let response = request.send().await.map_err(|e| {
            AppError::ExternalAPI(format!("{} request failed: {}", self.label, e))
        })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalAPI(format!(
                "{} returned {}: {}",
                self.label, status, body
            )));
        }

        let body: GraphQlResponse<T> = response.json().await.map_err(|e| {
            AppError::ExternalAPI(format!("{} parse failed: {}", self.label, e))
        })?;
        into_data(self.label, body)
    }
}

fn into_data<T>(label: &str, body: GraphQlResponse<T>) -> Result<T> {
    if !body.errors.is_empty() {
        let messages = body
            .errors
            .iter()
            .map(|e| e.message.as_str())
            .collect::<Vec<_>>()
            .join("; ");
        return Err(AppError::ExternalAPI(format!("{} errors: {}", label, messages)));
    }
    body.data
        .ok_or_else(|| AppError::ExternalAPI(format!("{} returned no data", label)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Ping {
        ok: bool,
    }

    #[test]
    fn into_data_surfaces_graphql_errors() {
        let body: GraphQlResponse<Ping> = serde_json::from_str(
            r#"{"data":null,"errors":[{"message":"bad field"},{"message":"bad arg"}]}"#,
        )
        .unwrap();
        let err = into_data("subgraph", body).unwrap_err();
        assert!(err.to_string().contains("bad field; bad arg"));
    }

    #[test]
    fn into_data_returns_payload() {
        let body: GraphQlResponse<Ping> = serde_json::from_str(r#"{"data":{"ok":true}}"#).unwrap();
        assert_eq!(into_data("subgraph", body).unwrap(), Ping { ok: true });
    }

    #[test]
    fn into_data_requires_data() {
        let body: GraphQlResponse<Ping> = serde_json::from_str(r#"{}"#).unwrap();
        assert!(into_data("subgraph", body).is_err());
    }
}
