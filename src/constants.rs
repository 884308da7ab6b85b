//! Constants for the crypto dashboard
//!
//! Compile-time defaults for every tunable. `DashboardConfig::from_env`
//! (see `config.rs`) may override a subset of them at startup.

use crate::types::Currency;

/// How often the refresh cycle fires (in seconds)
pub const REFRESH_INTERVAL_SECS: u64 = 60;

/// HTTP request timeout when fetching market data (in seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Number of coins shown per table page
pub const ITEMS_PER_PAGE: usize = 10;

/// Maximum number of coins requested per coin list fetch
pub const COIN_LIST_LIMIT: usize = 250;

/// Currency selected when nothing else is configured
pub const DEFAULT_CURRENCY: Currency = Currency::Usd;

/// Storage key holding the serialized watchlist
pub const WATCHLIST_STORAGE_KEY: &str = "cryptoWatchlist";

/// Directory used by the file store when none is configured
pub const DEFAULT_STORAGE_DIR: &str = ".crypto-dashboard";

/// How long success and info notifications stay visible (in milliseconds)
pub const NOTIFICATION_TTL_MS: u64 = 3000;

/// How long error notifications stay visible (in milliseconds)
pub const ERROR_NOTIFICATION_TTL_MS: u64 = 5000;

/// Capacity of the dashboard event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint for aggregate market figures
pub const COINGECKO_GLOBAL_ENDPOINT: &str = "/global";

/// CoinGecko endpoint for the ranked coin list
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// User agent for HTTP requests
pub const USER_AGENT: &str = "crypto-dashboard/0.1.0";

/// Message shown when the coin list cannot be fetched
pub const COIN_LIST_ERROR_MESSAGE: &str = "Failed to fetch cryptocurrency data. Please try again.";

/// Question asked before the watchlist is cleared
pub const CLEAR_WATCHLIST_PROMPT: &str = "Are you sure you want to clear your entire watchlist?";
