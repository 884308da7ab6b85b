//! CoinGecko market data provider implementation

use crate::{
    constants::{
        COINGECKO_GLOBAL_ENDPOINT, COINGECKO_MARKETS_ENDPOINT, COIN_LIST_LIMIT, USER_AGENT,
    },
    error::ProviderError,
    provider::MarketDataProvider,
    types::{CoinRecord, Currency, MarketStats},
};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;

/// CoinGecko API response for the global endpoint
#[derive(Debug, Deserialize)]
struct GlobalResponse {
    data: GlobalData,
}

#[derive(Debug, Deserialize)]
struct GlobalData {
    total_market_cap: HashMap<String, f64>,
    total_volume: HashMap<String, f64>,
    market_cap_percentage: HashMap<String, f64>,
}

/// CoinGecko market data provider
pub struct CoinGeckoProvider {
    client: Client,
    base_url: String,
}

impl CoinGeckoProvider {
    /// Creates a provider against `base_url`, normally
    /// [`COINGECKO_API_URL`](crate::constants::COINGECKO_API_URL)
    pub fn with_base_url(base_url: &str, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(ProviderError::NetworkError)?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Builds the URL for aggregate market figures
    fn global_url(&self) -> String {
        format!("{}{}", self.base_url, COINGECKO_GLOBAL_ENDPOINT)
    }

    /// Builds the URL for the coin list in `currency`
    fn markets_url(&self, currency: Currency) -> String {
        format!(
            "{}{}?vs_currency={}&order=market_cap_desc&per_page={}&page=1&sparkline=false",
            self.base_url,
            COINGECKO_MARKETS_ENDPOINT,
            currency.code(),
            COIN_LIST_LIMIT
        )
    }

    /// Issues a GET and returns the body of a successful response
    async fn get_text(&self, url: &str) -> Result<String, ProviderError> {
        tracing::debug!(url = %url, "Fetching from CoinGecko");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout
            } else {
                ProviderError::NetworkError(e)
            }
        })?;

        // Check for rate limiting
        if response.status().as_u16() == 429 {
            return Err(ProviderError::RateLimitExceeded);
        }

        // Check for other errors
        if !response.status().is_success() {
            return Err(ProviderError::ApiError(format!(
                "HTTP {}: {}",
                response.status(),
                response.text().await.unwrap_or_default()
            )));
        }

        response.text().await.map_err(ProviderError::NetworkError)
    }
}

/// Parses the global endpoint body into market stats
fn parse_global(body: &str) -> Result<MarketStats, ProviderError> {
    let response: GlobalResponse = serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!(
            "Failed to parse CoinGecko global response: {}. Response: {}",
            e, body
        ))
    })?;
    let data = response.data;

    let total_market_cap_usd = *data
        .total_market_cap
        .get("usd")
        .ok_or_else(|| ProviderError::InvalidResponse("Missing total_market_cap.usd".to_string()))?;
    let total_volume_usd = *data
        .total_volume
        .get("usd")
        .ok_or_else(|| ProviderError::InvalidResponse("Missing total_volume.usd".to_string()))?;

    let (dominant_symbol, dominant_share) = data
        .market_cap_percentage
        .iter()
        .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
        .map(|(symbol, share)| (symbol.clone(), *share))
        .ok_or_else(|| {
            ProviderError::InvalidResponse("Empty market_cap_percentage".to_string())
        })?;

    Ok(MarketStats {
        total_market_cap_usd,
        total_volume_usd,
        dominant_symbol,
        dominant_share,
        fetched_at: Utc::now(),
    })
}

/// Parses the markets endpoint body into coin records
fn parse_coin_list(body: &str) -> Result<Vec<CoinRecord>, ProviderError> {
    serde_json::from_str(body).map_err(|e| {
        ProviderError::InvalidResponse(format!(
            "Failed to parse CoinGecko markets response: {}. Response: {}",
            e, body
        ))
    })
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_market_stats(&self) -> Result<MarketStats, ProviderError> {
        let body = self.get_text(&self.global_url()).await?;
        let stats = parse_global(&body)?;

        tracing::debug!(
            total_market_cap_usd = stats.total_market_cap_usd,
            dominant = %stats.dominant_symbol,
            "Fetched market stats from CoinGecko"
        );

        Ok(stats)
    }

    async fn fetch_coin_list(&self, currency: Currency) -> Result<Vec<CoinRecord>, ProviderError> {
        let body = self.get_text(&self.markets_url(currency)).await?;
        let coins = parse_coin_list(&body)?;

        tracing::debug!(
            count = coins.len(),
            currency = %currency,
            "Fetched coin list from CoinGecko"
        );

        Ok(coins)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
