//! Provider abstraction for fetching market data from external APIs

use crate::{
    error::ProviderError,
    types::{CoinRecord, Currency, MarketStats},
};
use async_trait::async_trait;

/// Trait for market data providers
///
/// Implementations are read-only and never retry; a failure is returned to
/// the caller as-is.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches aggregate market figures (total market cap, volume, dominance)
    async fn fetch_market_stats(&self) -> Result<MarketStats, ProviderError>;

    /// Fetches the coin list ordered by descending market cap
    ///
    /// # Arguments
    /// * `currency` - Currency the prices and market caps are denominated in
    async fn fetch_coin_list(&self, currency: Currency) -> Result<Vec<CoinRecord>, ProviderError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
