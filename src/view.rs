//! Pure derivation of what the dashboard shows from the application state
//!
//! Nothing here touches a terminal or any other output; renderers consume
//! the `DashboardView` produced by [`derive`].

use crate::{
    format::{format_currency, format_percent_change, format_percentage},
    notification::{Notification, NotificationKind},
    state::AppState,
    types::{CoinRecord, Currency},
};
use chrono::{DateTime, Local, Utc};
use serde::Serialize;

/// Direction of the 24h change; zero counts as up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
}

impl Trend {
    fn of(coin: &CoinRecord) -> Self {
        if coin.is_gainer() {
            Trend::Up
        } else {
            Trend::Down
        }
    }
}

/// One row of the main price table
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CoinRow {
    /// Position in the filtered list, starting at 1
    pub rank: usize,
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub price: String,
    pub change: String,
    pub trend: Trend,
    pub market_cap: String,
    pub in_watchlist: bool,
}

/// One row of the watchlist panel
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistRow {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub image: String,
    pub price: String,
    pub change: String,
    pub trend: Trend,
    /// False when the figures come from the snapshot taken at add time
    pub live: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WatchlistPanel {
    pub rows: Vec<WatchlistRow>,
    pub count: usize,
    pub gainers: usize,
    pub losers: usize,
    pub is_empty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationView {
    pub current_page: usize,
    pub total_pages: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsView {
    pub total_market_cap: String,
    pub total_volume: String,
    pub dominant_symbol: String,
    pub dominance: String,
}

/// Everything a renderer needs to draw one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardView {
    /// Currency the table figures are priced in
    pub currency: Currency,
    /// Currency picked by the user; differs from `currency` until the list
    /// priced in it has been fetched
    pub selected_currency: Currency,
    pub search_term: String,
    pub rows: Vec<CoinRow>,
    pub pagination: PaginationView,
    pub watchlist: WatchlistPanel,
    pub stats: Option<StatsView>,
    pub last_updated: Option<String>,
    pub loading: bool,
    pub notifications: Vec<Notification>,
}

impl DashboardView {
    /// Active error notifications, newest last
    pub fn errors(&self) -> impl Iterator<Item = &Notification> {
        self.notifications
            .iter()
            .filter(|n| n.kind == NotificationKind::Error)
    }
}

/// Builds the view of `state` as of `now`
pub fn derive(state: &AppState, now: DateTime<Utc>) -> DashboardView {
    let currency = state.coins_currency;
    let pagination = &state.view.pagination;
    let offset = pagination.offset();

    let rows = state
        .visible_coins()
        .iter()
        .enumerate()
        .map(|(index, coin)| CoinRow {
            rank: offset + index + 1,
            id: coin.id.clone(),
            name: coin.name.clone(),
            symbol: coin.symbol.to_uppercase(),
            image: coin.image.clone(),
            price: format_currency(coin.current_price, currency.code()),
            change: format_percent_change(coin.change_24h()),
            trend: Trend::of(coin),
            market_cap: format_currency(coin.market_cap, currency.code()),
            in_watchlist: state.watchlist.contains(&coin.id),
        })
        .collect();

    DashboardView {
        currency,
        selected_currency: state.view.currency,
        search_term: state.view.search_term.clone(),
        rows,
        pagination: PaginationView {
            current_page: pagination.current_page,
            total_pages: pagination.total_pages,
            prev_enabled: pagination.has_prev(),
            next_enabled: pagination.has_next(),
        },
        watchlist: derive_watchlist(state),
        stats: state.market_stats.as_ref().map(|stats| StatsView {
            total_market_cap: format_currency(stats.total_market_cap_usd, "usd"),
            total_volume: format_currency(stats.total_volume_usd, "usd"),
            dominant_symbol: stats.dominant_symbol.to_uppercase(),
            dominance: format_percentage(stats.dominant_share),
        }),
        last_updated: state.last_updated.map(|at| {
            format!(
                "Last updated: {}",
                at.with_timezone(&Local).format("%H:%M:%S")
            )
        }),
        loading: state.is_loading(),
        notifications: state.notifications.active(now),
    }
}

/// Watchlist rows show live figures when the coin is in the current list
/// and fall back to the snapshot captured at add time.
fn derive_watchlist(state: &AppState) -> WatchlistPanel {
    let mut gainers = 0;
    let mut losers = 0;

    let rows: Vec<WatchlistRow> = state
        .watchlist
        .entries()
        .iter()
        .map(|entry| {
            let (coin, currency, live) = match state.find_coin(entry.id()) {
                Some(live) => (live, state.coins_currency, true),
                None => (
                    &entry.coin,
                    entry.currency.unwrap_or(state.coins_currency),
                    false,
                ),
            };

            let trend = Trend::of(coin);
            match trend {
                Trend::Up => gainers += 1,
                Trend::Down => losers += 1,
            }

            WatchlistRow {
                id: coin.id.clone(),
                name: coin.name.clone(),
                symbol: coin.symbol.to_uppercase(),
                image: coin.image.clone(),
                price: format_currency(coin.current_price, currency.code()),
                change: format_percent_change(coin.change_24h()),
                trend,
                live,
            }
        })
        .collect();

    WatchlistPanel {
        count: rows.len(),
        is_empty: rows.is_empty(),
        rows,
        gainers,
        losers,
    }
}
