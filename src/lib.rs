//! # Crypto Market Dashboard
//!
//! Polls a public market data API (CoinGecko), keeps a searchable, paginated
//! coin table and a watchlist persisted in local key-value storage.
//!
//! ## Usage
//!
//! ```no_run
//! use crypto_dashboard::{Currency, Dashboard, DashboardConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let dashboard = Dashboard::from_config(DashboardConfig::from_env()?)?;
//! dashboard.load().await;
//! let _refresh = dashboard.start_auto_refresh();
//!
//! dashboard.change_currency(Currency::Eur).await?;
//! dashboard.toggle_watchlist("bitcoin").await?;
//!
//! let view = dashboard.view().await;
//! println!("{} coins on the watchlist", view.watchlist.count);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Dashboard (owns AppState)
//!     ├── MarketDataProvider (CoinGecko)   fetches stats and coin list
//!     ├── WatchlistManager → WatchlistStore → KeyValueStore (file)
//!     └── view::derive → DashboardView → Renderer
//! ```
//!
//! Every mutation broadcasts a `DashboardEvent`; front ends redraw from a
//! fresh `DashboardView` on each one.

pub mod config;
pub mod constants;
pub mod dashboard;
pub mod error;
pub mod filter;
pub mod format;
pub mod metrics;
pub mod notification;
pub mod provider;
pub mod providers;
pub mod render;
pub mod state;
pub mod store;
pub mod types;
pub mod view;
pub mod watchlist;

// Re-export commonly used types
pub use config::DashboardConfig;
pub use dashboard::Dashboard;
pub use error::{ConfigError, DashboardError, ProviderError, StoreError};
pub use metrics::FetchMetrics;
pub use render::{Renderer, TerminalRenderer};
pub use types::{
    ChangeKind, CoinRecord, ComponentHealth, Currency, DashboardEvent, HealthStatus, MarketStats,
    WatchlistEntry,
};
pub use view::DashboardView;
pub use watchlist::{ClearOutcome, Confirm, Toggle};
