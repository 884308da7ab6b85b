//! In-memory application state
//!
//! `AppState` is the single owner of everything the dashboard shows. It is
//! mutated only through the methods below, each of which keeps the filtered
//! list and the page cursor consistent with the coin list.

use crate::{
    constants::ITEMS_PER_PAGE,
    filter::{filter_coins, paginate, Pagination},
    notification::NotificationCenter,
    types::{CoinRecord, Currency, MarketStats},
    watchlist::Watchlist,
};
use chrono::{DateTime, Utc};

/// Monotonic request counter for one fetch category
///
/// Only the response to the most recently issued request may be applied.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequestSequence {
    issued: u64,
}

impl RequestSequence {
    /// Issues the next sequence number
    pub fn begin(&mut self) -> u64 {
        self.issued += 1;
        self.issued
    }

    pub fn is_latest(&self, seq: u64) -> bool {
        seq == self.issued
    }
}

/// User-controlled view settings
#[derive(Debug, Clone)]
pub struct ViewState {
    pub search_term: String,
    pub pagination: Pagination,
    pub currency: Currency,
}

impl ViewState {
    pub fn new(currency: Currency) -> Self {
        Self {
            search_term: String::new(),
            pagination: Pagination::new(ITEMS_PER_PAGE),
            currency,
        }
    }
}

/// Everything the dashboard knows
#[derive(Debug, Clone)]
pub struct AppState {
    pub coins: Vec<CoinRecord>,
    /// Currency the coin list is priced in; lags `view.currency` until the
    /// list in a newly selected currency arrives
    pub coins_currency: Currency,
    pub filtered: Vec<CoinRecord>,
    pub watchlist: Watchlist,
    pub market_stats: Option<MarketStats>,
    pub view: ViewState,
    pub notifications: NotificationCenter,
    pub last_updated: Option<DateTime<Utc>>,
    pub last_coin_error: Option<String>,
    pub last_stats_error: Option<String>,
    pub coin_requests: RequestSequence,
    pub stats_requests: RequestSequence,
    coin_fetches_in_flight: usize,
}

impl AppState {
    pub fn new(watchlist: Watchlist, currency: Currency) -> Self {
        Self {
            coins: Vec::new(),
            coins_currency: currency,
            filtered: Vec::new(),
            watchlist,
            market_stats: None,
            view: ViewState::new(currency),
            notifications: NotificationCenter::new(),
            last_updated: None,
            last_coin_error: None,
            last_stats_error: None,
            coin_requests: RequestSequence::default(),
            stats_requests: RequestSequence::default(),
            coin_fetches_in_flight: 0,
        }
    }

    /// Sets the search term, re-filters and returns to the first page
    pub fn apply_filter(&mut self, term: &str) {
        self.view.search_term = term.to_string();
        self.filtered = filter_coins(&self.coins, term);
        self.view.pagination.reset();
        self.view.pagination.update(self.filtered.len());
    }

    /// Replaces the coin list wholesale with one priced in `currency`
    ///
    /// The active search is re-applied and the page cursor is clamped to the
    /// new page count.
    pub fn replace_coins(
        &mut self,
        coins: Vec<CoinRecord>,
        currency: Currency,
        fetched_at: DateTime<Utc>,
    ) {
        self.coins = coins;
        self.coins_currency = currency;
        self.filtered = filter_coins(&self.coins, &self.view.search_term);
        self.view.pagination.update(self.filtered.len());
        self.last_updated = Some(fetched_at);
        self.last_coin_error = None;
    }

    pub fn replace_market_stats(&mut self, stats: MarketStats) {
        self.market_stats = Some(stats);
        self.last_stats_error = None;
    }

    /// Coins on the current page
    pub fn visible_coins(&self) -> &[CoinRecord] {
        let pagination = &self.view.pagination;
        paginate(&self.filtered, pagination.current_page, pagination.page_size)
    }

    /// Moves the page cursor; out-of-range moves are ignored
    pub fn change_page(&mut self, direction: i32) -> bool {
        self.view.pagination.change_page(direction)
    }

    /// Selects a currency; returns false when it was already selected
    pub fn set_currency(&mut self, currency: Currency) -> bool {
        if self.view.currency == currency {
            return false;
        }
        self.view.currency = currency;
        true
    }

    pub fn find_coin(&self, id: &str) -> Option<&CoinRecord> {
        self.coins.iter().find(|c| c.id == id)
    }

    pub fn begin_coin_fetch(&mut self) -> u64 {
        self.coin_fetches_in_flight += 1;
        self.coin_requests.begin()
    }

    pub fn end_coin_fetch(&mut self) {
        self.coin_fetches_in_flight = self.coin_fetches_in_flight.saturating_sub(1);
    }

    /// True while any coin list fetch is in flight
    pub fn is_loading(&self) -> bool {
        self.coin_fetches_in_flight > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coins(n: usize) -> Vec<CoinRecord> {
        (1..=n)
            .map(|i| CoinRecord {
                id: format!("coin-{}", i),
                name: format!("Coin {}", i),
                symbol: format!("c{}", i),
                image: String::new(),
                current_price: i as f64,
                price_change_percentage_24h: Some(0.0),
                market_cap: (1000 - i) as f64,
            })
            .collect()
    }

    #[test]
    fn test_twenty_five_coins_paginate_into_three_pages() {
        let mut state = AppState::new(Watchlist::new(), Currency::Usd);
        state.replace_coins(coins(25), Currency::Usd, Utc::now());

        let visible: Vec<_> = state.visible_coins().iter().map(|c| c.id.as_str()).collect();
        assert_eq!(visible.len(), 10);
        assert_eq!(visible[0], "coin-1");
        assert_eq!(visible[9], "coin-10");
        assert_eq!(state.view.pagination.total_pages, 3);
        assert!(state.view.pagination.has_next());
        assert!(!state.view.pagination.has_prev());
    }

    #[test]
    fn test_filter_resets_page() {
        let mut state = AppState::new(Watchlist::new(), Currency::Usd);
        state.replace_coins(coins(25), Currency::Usd, Utc::now());
        state.change_page(1);
        assert_eq!(state.view.pagination.current_page, 2);

        state.apply_filter("coin 2");
        assert_eq!(state.view.pagination.current_page, 1);
        // "Coin 2" and "Coin 20".."Coin 25"
        assert_eq!(state.filtered.len(), 7);
        assert_eq!(state.view.pagination.total_pages, 1);
    }

    #[test]
    fn test_refresh_keeps_search_and_clamps_page() {
        let mut state = AppState::new(Watchlist::new(), Currency::Usd);
        state.replace_coins(coins(25), Currency::Usd, Utc::now());
        state.change_page(1);
        state.change_page(1);

        state.replace_coins(coins(12), Currency::Usd, Utc::now());
        assert_eq!(state.view.pagination.current_page, 2);

        state.apply_filter("coin 1");
        state.replace_coins(coins(25), Currency::Usd, Utc::now());
        // "Coin 1" and "Coin 10".."Coin 19"
        assert_eq!(state.filtered.len(), 11);
        assert_eq!(state.view.search_term, "coin 1");
    }

    #[test]
    fn test_empty_list_has_one_page() {
        let mut state = AppState::new(Watchlist::new(), Currency::Usd);
        state.replace_coins(Vec::new(), Currency::Usd, Utc::now());

        assert!(state.visible_coins().is_empty());
        assert_eq!(state.view.pagination.total_pages, 1);
        assert!(!state.change_page(1));
        assert!(!state.change_page(-1));
    }

    #[test]
    fn test_request_sequence_only_latest_wins() {
        let mut state = AppState::new(Watchlist::new(), Currency::Usd);
        let first = state.begin_coin_fetch();
        let second = state.begin_coin_fetch();

        assert!(state.is_loading());
        assert!(!state.coin_requests.is_latest(first));
        assert!(state.coin_requests.is_latest(second));

        state.end_coin_fetch();
        assert!(state.is_loading());
        state.end_coin_fetch();
        assert!(!state.is_loading());
    }
}
