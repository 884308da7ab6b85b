//! Types for the crypto dashboard

use crate::error::DashboardError;
use crate::notification::Notification;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Currencies the coin list can be denominated in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// British Pound
    Gbp,
    /// Japanese Yen
    Jpy,
    /// Australian Dollar
    Aud,
    /// Canadian Dollar
    Cad,
    /// Indian Rupee
    Inr,
    /// Bitcoin
    Btc,
    /// Ether
    Eth,
}

impl Currency {
    /// Get the lowercase code used by the API
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "usd",
            Currency::Eur => "eur",
            Currency::Gbp => "gbp",
            Currency::Jpy => "jpy",
            Currency::Aud => "aud",
            Currency::Cad => "cad",
            Currency::Inr => "inr",
            Currency::Btc => "btc",
            Currency::Eth => "eth",
        }
    }

    /// Get all supported currencies
    pub fn all() -> &'static [Currency] {
        &[
            Currency::Usd,
            Currency::Eur,
            Currency::Gbp,
            Currency::Jpy,
            Currency::Aud,
            Currency::Cad,
            Currency::Inr,
            Currency::Btc,
            Currency::Eth,
        ]
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = DashboardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_lowercase();
        Currency::all()
            .iter()
            .copied()
            .find(|c| c.code() == code)
            .ok_or(DashboardError::UnsupportedCurrency(code))
    }
}

/// Reads a JSON `null` number as zero
fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

/// Latest market snapshot for one coin, as returned by the coin list endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    /// Unique API identifier (e.g. "bitcoin")
    pub id: String,

    /// Display name
    pub name: String,

    /// Ticker symbol, lowercase as delivered
    pub symbol: String,

    /// Icon URI
    #[serde(default)]
    pub image: String,

    /// Price in the requested currency
    #[serde(default, deserialize_with = "null_as_zero")]
    pub current_price: f64,

    /// 24h price change percentage
    #[serde(default)]
    pub price_change_percentage_24h: Option<f64>,

    /// Market capitalization in the requested currency
    #[serde(default, deserialize_with = "null_as_zero")]
    pub market_cap: f64,
}

impl CoinRecord {
    /// 24h change with a missing figure read as zero
    pub fn change_24h(&self) -> f64 {
        self.price_change_percentage_24h.unwrap_or(0.0)
    }

    /// True when the 24h change is zero or positive
    pub fn is_gainer(&self) -> bool {
        self.change_24h() >= 0.0
    }
}

/// A coin captured into the watchlist
///
/// The coin fields are flattened so a persisted entry is shaped like a coin
/// record. Entries saved without `currency`/`added_at` still load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WatchlistEntry {
    #[serde(flatten)]
    pub coin: CoinRecord,

    /// Currency the snapshot prices are denominated in
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<Currency>,

    /// When the coin was added
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub added_at: Option<DateTime<Utc>>,
}

impl WatchlistEntry {
    /// Captures a coin priced in `currency`
    pub fn capture(coin: CoinRecord, currency: Currency) -> Self {
        Self {
            coin,
            currency: Some(currency),
            added_at: Some(Utc::now()),
        }
    }

    /// Identifier of the captured coin
    pub fn id(&self) -> &str {
        &self.coin.id
    }
}

/// Aggregate market figures, always in USD
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarketStats {
    /// Total market capitalization
    pub total_market_cap_usd: f64,

    /// Total 24h trading volume
    pub total_volume_usd: f64,

    /// Symbol of the asset with the largest market cap share
    pub dominant_symbol: String,

    /// Market cap share of the dominant asset (0 to 100)
    pub dominant_share: f64,

    /// When the figures were fetched
    pub fetched_at: DateTime<Utc>,
}

/// Part of the state touched by a change
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeKind {
    CoinList,
    MarketStats,
    Watchlist,
    View,
    Loading,
}

/// Events broadcast to front ends after every state mutation
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DashboardEvent {
    /// State changed and the view should be redrawn
    StateChanged {
        id: Uuid,
        kind: ChangeKind,
        timestamp: DateTime<Utc>,
    },

    /// A notification was raised
    NotificationRaised {
        id: Uuid,
        notification: Notification,
        timestamp: DateTime<Utc>,
    },

    /// A notification reached the end of its lifetime
    NotificationExpired {
        id: Uuid,
        notification_id: Uuid,
        timestamp: DateTime<Utc>,
    },
}

impl DashboardEvent {
    /// Creates a StateChanged event
    pub fn state_changed(kind: ChangeKind) -> Self {
        Self::StateChanged {
            id: Uuid::new_v4(),
            kind,
            timestamp: Utc::now(),
        }
    }

    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            DashboardEvent::StateChanged { id, .. } => *id,
            DashboardEvent::NotificationRaised { id, .. } => *id,
            DashboardEvent::NotificationExpired { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            DashboardEvent::StateChanged { .. } => "STATE_CHANGED",
            DashboardEvent::NotificationRaised { .. } => "NOTIFICATION_RAISED",
            DashboardEvent::NotificationExpired { .. } => "NOTIFICATION_EXPIRED",
        }
    }
}

impl std::fmt::Display for DashboardEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DashboardEvent::StateChanged { kind, .. } => write!(f, "State changed: {:?}", kind),
            DashboardEvent::NotificationRaised { notification, .. } => {
                write!(f, "Notification: {}", notification.message)
            }
            DashboardEvent::NotificationExpired {
                notification_id, ..
            } => write!(f, "Notification expired: {}", notification_id),
        }
    }
}

/// Overall system health status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum HealthStatus {
    /// Fresh data is available
    Healthy,
    /// Data is available but the last fetch failed
    Degraded,
    /// No data has been fetched yet
    Unhealthy,
}

/// Component health information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentHealth {
    /// Component name
    pub name: String,
    /// Component status
    pub status: HealthStatus,
    /// Optional status message
    pub message: Option<String>,
    /// Component-specific details
    pub details: std::collections::HashMap<String, serde_json::Value>,
    /// Last checked timestamp
    pub last_checked: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_parse_is_case_insensitive() {
        assert_eq!("EUR".parse::<Currency>().unwrap(), Currency::Eur);
        assert_eq!(" usd ".parse::<Currency>().unwrap(), Currency::Usd);
        assert!(matches!(
            "doge".parse::<Currency>(),
            Err(DashboardError::UnsupportedCurrency(code)) if code == "doge"
        ));
    }

    #[test]
    fn test_coin_record_from_api_shape() {
        let json = r#"{
            "id": "bitcoin",
            "symbol": "btc",
            "name": "Bitcoin",
            "image": "https://assets.coingecko.com/coins/images/1/large/bitcoin.png",
            "current_price": 67000.5,
            "market_cap": 1320000000000,
            "market_cap_rank": 1,
            "price_change_percentage_24h": null
        }"#;
        let coin: CoinRecord = serde_json::from_str(json).unwrap();

        assert_eq!(coin.id, "bitcoin");
        assert_eq!(coin.market_cap, 1_320_000_000_000.0);
        assert_eq!(coin.change_24h(), 0.0);
        assert!(coin.is_gainer());
    }

    #[test]
    fn test_null_price_reads_as_zero() {
        let json = r#"{"id":"x","symbol":"x","name":"X","image":"","current_price":null,"market_cap":null}"#;
        let coin: CoinRecord = serde_json::from_str(json).unwrap();
        assert_eq!(coin.current_price, 0.0);
        assert_eq!(coin.market_cap, 0.0);
    }

    #[test]
    fn test_watchlist_entry_accepts_bare_coin_record() {
        let json = r#"{"id":"ethereum","symbol":"eth","name":"Ethereum","image":"",
            "current_price":3200.0,"price_change_percentage_24h":-1.5,"market_cap":380000000000}"#;
        let entry: WatchlistEntry = serde_json::from_str(json).unwrap();

        assert_eq!(entry.id(), "ethereum");
        assert_eq!(entry.currency, None);
        assert!(!entry.coin.is_gainer());
    }

    #[test]
    fn test_watchlist_entry_is_persisted_flat() {
        let coin = CoinRecord {
            id: "solana".to_string(),
            name: "Solana".to_string(),
            symbol: "sol".to_string(),
            image: String::new(),
            current_price: 150.0,
            price_change_percentage_24h: Some(2.0),
            market_cap: 70_000_000_000.0,
        };
        let value = serde_json::to_value(WatchlistEntry::capture(coin, Currency::Eur)).unwrap();

        assert_eq!(value["id"], "solana");
        assert_eq!(value["current_price"], 150.0);
        assert_eq!(value["currency"], "eur");
    }

    #[test]
    fn test_event_type_names() {
        let event = DashboardEvent::state_changed(ChangeKind::Watchlist);
        assert_eq!(event.event_type(), "STATE_CHANGED");
        assert_eq!(event.to_string(), "State changed: Watchlist");
    }
}
