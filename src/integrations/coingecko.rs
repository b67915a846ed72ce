use async_trait::async_trait;
use reqwest::Client;
use std::collections::HashMap;
use url::Url;

use super::PriceOracle;
use crate::{
    config::Config,
    error::{AppError, Result},
};

type SimplePriceResponse = HashMap<String, HashMap<String, f64>>;

#[derive(Debug, Clone)]
pub struct CoinGeckoClient {
    client: Client,
    api_url: String,
    coin_id: String,
    api_key: Option<String>,
}

impl CoinGeckoClient {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            api_url: config.price_api_url.trim().to_string(),
            coin_id: config.price_coin_id.trim().to_string(),
            api_key: config.price_api_key.clone(),
        }
    }

    fn simple_price_url(&self) -> Result<Url> {
        let mut url = Url::parse(&format!("{}/simple/price", self.api_url.trim_end_matches('/')))
            .map_err(|e| AppError::Internal(format!("Invalid price API URL: {}", e)))?;
        url.query_pairs_mut()
            .append_pair("ids", &self.coin_id)
            .append_pair("vs_currencies", "usd");
        Ok(url)
    }
}

#[async_trait]
impl PriceOracle for CoinGeckoClient {
    async fn usd_price(&self) -> Result<f64> {
        let mut request = self
            .client
            .get(self.simple_price_url()?)
            .header("accept", "application/json");
        if let Some(key) = &self.api_key {
            request = request.header("x-cg-demo-api-key", key.as_str());
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Price request failed: {}", e)))?;
        if !response.status().is_success() {
            return Err(AppError::ExternalAPI(format!(
                "Price API returned {}",
                response.status()
            )));
        }

        let body: SimplePriceResponse = response
            .json()
            .await
            .map_err(|e| AppError::ExternalAPI(format!("Price parse failed: {}", e)))?;
        extract_usd(&body, &self.coin_id)
    }
}

fn extract_usd(body: &SimplePriceResponse, coin_id: &str) -> Result<f64> {
    let price = body
        .get(coin_id)
        .and_then(|quotes| quotes.get("usd"))
        .copied()
        .ok_or_else(|| AppError::ExternalAPI(format!("No USD price for {}", coin_id)))?;
    if !price.is_finite() || price < 0.0 {
        return Err(AppError::ExternalAPI(format!(
            "Invalid USD price for {}: {}",
            coin_id, price
        )));
    }
    Ok(price)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::test_config;

    #[test]
    fn simple_price_url_has_coin_and_currency() {
        let client = CoinGeckoClient::new(Client::new(), &test_config());
        let url = client.simple_price_url().unwrap();
        assert_eq!(
            url.as_str(),
            "https://api.coingecko.com/api/v3/simple/price?ids=moxie&vs_currencies=usd"
        );
    }

    #[test]
    fn extract_usd_reads_nested_quote() {
        let body: SimplePriceResponse =
            serde_json::from_str(r#"{"moxie":{"usd":0.00213}}"#).unwrap();
        assert!((extract_usd(&body, "moxie").unwrap() - 0.00213).abs() < f64::EPSILON);
        assert!(extract_usd(&body, "degen").is_err());
    }
}
