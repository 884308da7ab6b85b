//! Dashboard application root
//!
//! Owns the single `AppState`, runs fetches against the market data provider,
//! routes user commands to the watchlist manager and the filter/pagination
//! engine, and broadcasts a `DashboardEvent` after every mutation so front
//! ends can redraw.

use crate::{
    config::DashboardConfig,
    constants::{COIN_LIST_ERROR_MESSAGE, EVENT_CHANNEL_CAPACITY},
    error::{DashboardError, ProviderError},
    metrics::{FetchMetrics, MetricsCollector},
    notification::{Notification, NotificationKind},
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    state::AppState,
    store::{FileStore, KeyValueStore, WatchlistStore},
    types::{ChangeKind, CoinRecord, ComponentHealth, Currency, DashboardEvent, HealthStatus},
    view::{derive, DashboardView},
    watchlist::{Change, ClearOutcome, Confirm, Toggle, WatchlistManager},
};
use chrono::Utc;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::{broadcast, RwLock};
use tokio::task::JoinHandle;
use tokio::time::{interval, sleep, MissedTickBehavior};
use uuid::Uuid;

/// Crypto market dashboard
///
/// Cheap to clone; clones share the same state.
///
/// # Example
/// ```no_run
/// use crypto_dashboard::{Dashboard, DashboardConfig};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let dashboard = Dashboard::from_config(DashboardConfig::from_env()?)?;
/// dashboard.load().await;
/// let _refresh = dashboard.start_auto_refresh();
///
/// dashboard.search("bit").await;
/// for row in dashboard.view().await.rows {
///     println!("{} {} {}", row.rank, row.name, row.price);
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Dashboard {
    state: Arc<RwLock<AppState>>,
    provider: Arc<dyn MarketDataProvider>,
    watchlist: Arc<WatchlistManager>,
    events: broadcast::Sender<DashboardEvent>,
    stats_metrics: Arc<MetricsCollector>,
    coin_metrics: Arc<MetricsCollector>,
    refresh_interval: Duration,
}

impl Dashboard {
    /// Creates a dashboard configured from `DASHBOARD_*` environment variables
    pub fn from_env() -> Result<Self, DashboardError> {
        Self::from_config(DashboardConfig::from_env()?)
    }

    /// Creates a dashboard with the CoinGecko provider and a file store
    pub fn from_config(config: DashboardConfig) -> Result<Self, DashboardError> {
        tracing::info!(
            api = %config.api_base_url,
            storage = %config.storage_dir.display(),
            "Starting crypto dashboard"
        );
        let provider =
            CoinGeckoProvider::with_base_url(&config.api_base_url, config.request_timeout)?;
        let store = FileStore::new(&config.storage_dir)?;

        Ok(Self::new(Arc::new(provider), Arc::new(store), &config))
    }

    /// Creates a dashboard with a custom provider and storage backend
    ///
    /// The watchlist is loaded from `store` once, here.
    pub fn new(
        provider: Arc<dyn MarketDataProvider>,
        store: Arc<dyn KeyValueStore>,
        config: &DashboardConfig,
    ) -> Self {
        let manager = WatchlistManager::new(WatchlistStore::new(store));
        let watchlist = manager.load();
        tracing::info!(
            entries = watchlist.len(),
            provider = provider.provider_name(),
            currency = %config.default_currency,
            "Dashboard initialized"
        );

        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        Self {
            state: Arc::new(RwLock::new(AppState::new(watchlist, config.default_currency))),
            provider,
            watchlist: Arc::new(manager),
            events,
            stats_metrics: Arc::new(MetricsCollector::new("market_stats")),
            coin_metrics: Arc::new(MetricsCollector::new("coin_list")),
            refresh_interval: config.refresh_interval,
        }
    }

    /// Subscribes to state change and notification events
    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: DashboardEvent) {
        // No subscribers is fine
        let _ = self.events.send(event);
    }

    fn emit_change(&self, kind: ChangeKind) {
        self.emit(DashboardEvent::state_changed(kind));
    }

    /// Raises a notification and schedules its removal
    fn notify(&self, state: &mut AppState, kind: NotificationKind, message: impl Into<String>) {
        let notification = state.notifications.push(kind, message);
        self.schedule_expiry(&notification);
        self.emit(DashboardEvent::NotificationRaised {
            id: Uuid::new_v4(),
            notification,
            timestamp: Utc::now(),
        });
    }

    fn schedule_expiry(&self, notification: &Notification) {
        if tokio::runtime::Handle::try_current().is_err() {
            return;
        }

        let state = self.state.clone();
        let events = self.events.clone();
        let notification_id = notification.id;
        let ttl = Duration::from_millis(notification.ttl_ms);

        tokio::spawn(async move {
            sleep(ttl).await;
            let mut state = state.write().await;
            state.notifications.dismiss(notification_id);
            state.notifications.prune(Utc::now());
            drop(state);
            let _ = events.send(DashboardEvent::NotificationExpired {
                id: Uuid::new_v4(),
                notification_id,
                timestamp: Utc::now(),
            });
        });
    }

    /// Initial load: market stats and coin list
    pub async fn load(&self) {
        self.refresh_all().await;
    }

    /// One refresh cycle; both fetches run concurrently
    ///
    /// Failures are handled (logged, notified) by the individual fetches.
    pub async fn refresh_all(&self) {
        let _ = futures::join!(self.refresh_market_stats(), self.refresh_coin_list());
    }

    /// Starts the periodic refresh task
    ///
    /// Each cycle is spawned on its own so a slow fetch never delays the next
    /// one. Abort the returned handle to stop refreshing.
    pub fn start_auto_refresh(&self) -> JoinHandle<()> {
        let dashboard = self.clone();
        let period = self.refresh_interval;

        tokio::spawn(async move {
            tracing::info!(
                refresh_interval_secs = period.as_secs(),
                "Starting dashboard auto-refresh task"
            );

            let mut ticker = interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately; the initial load covers it
            ticker.tick().await;

            loop {
                ticker.tick().await;
                let cycle = dashboard.clone();
                tokio::spawn(async move { cycle.refresh_all().await });
            }
        })
    }

    /// Fetches aggregate market figures
    ///
    /// On failure the previous figures are kept and nothing is shown to the user.
    pub async fn refresh_market_stats(&self) -> Result<(), ProviderError> {
        let seq = self.state.write().await.stats_requests.begin();
        let start = Instant::now();

        let result = self.provider.fetch_market_stats().await;
        self.stats_metrics
            .record_request(start.elapsed(), result.is_ok())
            .await;

        let mut state = self.state.write().await;
        if !state.stats_requests.is_latest(seq) {
            drop(state);
            tracing::debug!(seq, "Discarding superseded market stats response");
            self.stats_metrics.record_discarded().await;
            return Ok(());
        }

        match result {
            Ok(stats) => {
                state.replace_market_stats(stats);
                drop(state);
                self.emit_change(ChangeKind::MarketStats);
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to fetch market stats");
                state.last_stats_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Fetches the coin list in the selected currency
    ///
    /// On failure the previous list is kept and an error notification is raised.
    pub async fn refresh_coin_list(&self) -> Result<(), ProviderError> {
        let (seq, currency) = self.begin_coin_fetch().await;
        let start = Instant::now();

        let result = self.provider.fetch_coin_list(currency).await;
        self.coin_metrics
            .record_request(start.elapsed(), result.is_ok())
            .await;

        self.complete_coin_fetch(seq, currency, result).await
    }

    pub(crate) async fn begin_coin_fetch(&self) -> (u64, Currency) {
        let mut state = self.state.write().await;
        let seq = state.begin_coin_fetch();
        let currency = state.view.currency;
        drop(state);

        self.emit_change(ChangeKind::Loading);
        (seq, currency)
    }

    pub(crate) async fn complete_coin_fetch(
        &self,
        seq: u64,
        currency: Currency,
        result: Result<Vec<CoinRecord>, ProviderError>,
    ) -> Result<(), ProviderError> {
        let mut state = self.state.write().await;
        state.end_coin_fetch();

        if !state.coin_requests.is_latest(seq) {
            drop(state);
            tracing::debug!(seq, "Discarding superseded coin list response");
            self.coin_metrics.record_discarded().await;
            self.emit_change(ChangeKind::Loading);
            return Ok(());
        }

        match result {
            Ok(coins) => {
                tracing::info!(count = coins.len(), currency = %currency, "Coin list updated");
                state.replace_coins(coins, currency, Utc::now());
                drop(state);
                self.emit_change(ChangeKind::CoinList);
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to fetch coin list");
                state.last_coin_error = Some(e.to_string());
                self.notify(&mut state, NotificationKind::Error, COIN_LIST_ERROR_MESSAGE);
                drop(state);
                self.emit_change(ChangeKind::Loading);
                Err(e)
            }
        }
    }

    /// Filters the table by name or symbol and returns to the first page
    pub async fn search(&self, term: &str) {
        self.state.write().await.apply_filter(term);
        self.emit_change(ChangeKind::View);
    }

    /// Moves one page forward (+1) or back (-1); out-of-range moves are ignored
    pub async fn change_page(&self, direction: i32) -> bool {
        let moved = self.state.write().await.change_page(direction);
        if moved {
            self.emit_change(ChangeKind::View);
        }
        moved
    }

    /// Selects a currency and re-fetches the coin list priced in it
    pub async fn change_currency(&self, currency: Currency) -> Result<(), ProviderError> {
        if !self.state.write().await.set_currency(currency) {
            return Ok(());
        }
        tracing::info!(currency = %currency, "Currency changed");
        self.emit_change(ChangeKind::View);
        self.refresh_coin_list().await
    }

    /// Adds the coin with `id` to the watchlist, or removes it if present
    pub async fn toggle_watchlist(&self, id: &str) -> Result<Toggle, DashboardError> {
        let mut state = self.state.write().await;
        let coin = state
            .find_coin(id)
            .cloned()
            .ok_or_else(|| DashboardError::UnknownCoin(id.to_string()))?;
        let currency = state.coins_currency;

        let change = self.watchlist.toggle(&mut state.watchlist, &coin, currency);
        let (kind, message) = match change.outcome {
            Toggle::Added => (
                NotificationKind::Success,
                format!("Added {} to watchlist", coin.name),
            ),
            Toggle::Removed => (
                NotificationKind::Info,
                format!("Removed {} from watchlist", coin.name),
            ),
        };
        self.notify(&mut state, kind, message);
        let outcome = self.finish_watchlist_change(&mut state, change);
        drop(state);

        self.emit_change(ChangeKind::Watchlist);
        Ok(outcome)
    }

    /// Removes every watchlist entry with `id`
    pub async fn remove_from_watchlist(&self, id: &str) -> usize {
        let mut state = self.state.write().await;
        let change = self.watchlist.remove(&mut state.watchlist, id);
        self.notify(&mut state, NotificationKind::Info, "Removed from watchlist");
        let removed = self.finish_watchlist_change(&mut state, change);
        drop(state);

        self.emit_change(ChangeKind::Watchlist);
        removed
    }

    /// Empties the watchlist once `confirm` agrees; an empty watchlist is left alone
    pub async fn clear_watchlist(&self, confirm: &dyn Confirm) -> ClearOutcome {
        let mut state = self.state.write().await;
        let change = self.watchlist.clear(&mut state.watchlist, confirm);
        let cleared = matches!(change.outcome, ClearOutcome::Cleared(_));
        if cleared {
            self.notify(&mut state, NotificationKind::Info, "Watchlist cleared");
        }
        let outcome = self.finish_watchlist_change(&mut state, change);
        drop(state);

        if cleared {
            self.emit_change(ChangeKind::Watchlist);
        }
        outcome
    }

    fn finish_watchlist_change<T>(&self, state: &mut AppState, change: Change<T>) -> T {
        if change.save_error.is_some() {
            self.notify(state, NotificationKind::Error, "Failed to save watchlist");
        }
        change.outcome
    }

    /// Number of coins on the watchlist
    pub async fn watchlist_len(&self) -> usize {
        self.state.read().await.watchlist.len()
    }

    /// Derives the current view
    pub async fn view(&self) -> DashboardView {
        derive(&*self.state.read().await, Utc::now())
    }

    /// Copy of the current state
    pub async fn snapshot(&self) -> AppState {
        self.state.read().await.clone()
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }

    /// Latency and success figures for both fetch categories
    pub async fn fetch_metrics(&self) -> Vec<FetchMetrics> {
        vec![
            self.stats_metrics.get_metrics().await,
            self.coin_metrics.get_metrics().await,
        ]
    }

    /// Perform a health check on the dashboard data
    pub async fn health_check(&self) -> ComponentHealth {
        let mut details = std::collections::HashMap::new();
        let state = self.state.read().await;

        details.insert("coin_count".to_string(), serde_json::json!(state.coins.len()));
        details.insert(
            "watchlist_count".to_string(),
            serde_json::json!(state.watchlist.len()),
        );
        details.insert(
            "provider_name".to_string(),
            serde_json::json!(self.provider_name()),
        );
        details.insert(
            "currency".to_string(),
            serde_json::json!(state.view.currency.code()),
        );
        details.insert(
            "last_updated".to_string(),
            serde_json::json!(state.last_updated.map(|t| t.to_rfc3339())),
        );
        details.insert(
            "has_market_stats".to_string(),
            serde_json::json!(state.market_stats.is_some()),
        );

        let errors: Vec<&String> = state
            .last_coin_error
            .iter()
            .chain(state.last_stats_error.iter())
            .collect();

        let status = if state.coins.is_empty() && state.market_stats.is_none() {
            HealthStatus::Unhealthy
        } else if !errors.is_empty() {
            HealthStatus::Degraded
        } else {
            HealthStatus::Healthy
        };

        let message = match status {
            HealthStatus::Healthy => "Dashboard is operational with fresh data".to_string(),
            HealthStatus::Degraded => format!(
                "Dashboard is showing cached data; last error: {}",
                errors[0]
            ),
            HealthStatus::Unhealthy => "Dashboard has no market data yet".to_string(),
        };

        ComponentHealth {
            name: "crypto_dashboard".to_string(),
            status,
            message: Some(message),
            details,
            last_checked: Utc::now(),
        }
    }
}
