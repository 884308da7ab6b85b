//! Runtime configuration
//!
//! Defaults come from `constants.rs`. A handful of environment variables may
//! override them at startup:
//!
//! - `DASHBOARD_API_URL`: market data API base URL
//! - `DASHBOARD_CURRENCY`: initially selected currency code
//! - `DASHBOARD_REFRESH_SECS`: refresh cycle interval
//! - `DASHBOARD_TIMEOUT_SECS`: HTTP request timeout
//! - `DASHBOARD_STORAGE_DIR`: directory holding the persisted watchlist

use crate::{
    constants::{
        COINGECKO_API_URL, DEFAULT_CURRENCY, DEFAULT_STORAGE_DIR, REFRESH_INTERVAL_SECS,
        REQUEST_TIMEOUT_SECS,
    },
    error::ConfigError,
    types::Currency,
};
use std::path::PathBuf;
use std::time::Duration;

pub const ENV_API_URL: &str = "DASHBOARD_API_URL";
pub const ENV_CURRENCY: &str = "DASHBOARD_CURRENCY";
pub const ENV_REFRESH_SECS: &str = "DASHBOARD_REFRESH_SECS";
pub const ENV_TIMEOUT_SECS: &str = "DASHBOARD_TIMEOUT_SECS";
pub const ENV_STORAGE_DIR: &str = "DASHBOARD_STORAGE_DIR";

/// Dashboard settings
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub api_base_url: String,
    pub default_currency: Currency,
    pub refresh_interval: Duration,
    pub request_timeout: Duration,
    pub storage_dir: PathBuf,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            api_base_url: COINGECKO_API_URL.to_string(),
            default_currency: DEFAULT_CURRENCY,
            refresh_interval: Duration::from_secs(REFRESH_INTERVAL_SECS),
            request_timeout: Duration::from_secs(REQUEST_TIMEOUT_SECS),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
        }
    }
}

impl DashboardConfig {
    /// Builds the configuration from defaults and process environment overrides
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the configuration from defaults and overrides returned by `lookup`
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL).filter(|v| !v.trim().is_empty()) {
            config.api_base_url = url.trim().to_string();
        }

        if let Some(code) = lookup(ENV_CURRENCY) {
            config.default_currency = code
                .parse()
                .map_err(|_| ConfigError::invalid(ENV_CURRENCY, code.clone()))?;
        }

        if let Some(secs) = lookup(ENV_REFRESH_SECS) {
            config.refresh_interval = Duration::from_secs(parse_secs(ENV_REFRESH_SECS, &secs)?);
        }

        if let Some(secs) = lookup(ENV_TIMEOUT_SECS) {
            config.request_timeout = Duration::from_secs(parse_secs(ENV_TIMEOUT_SECS, &secs)?);
        }

        if let Some(dir) = lookup(ENV_STORAGE_DIR).filter(|v| !v.trim().is_empty()) {
            config.storage_dir = PathBuf::from(dir);
        }

        Ok(config)
    }
}

/// Parses a strictly positive number of seconds
fn parse_secs(key: &str, value: &str) -> Result<u64, ConfigError> {
    match value.trim().parse::<u64>() {
        Ok(secs) if secs > 0 => Ok(secs),
        _ => Err(ConfigError::invalid(key, value)),
    }
}
