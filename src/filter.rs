//! Search filtering and pagination over the coin list
//!
//! Everything here is pure: invalid input is clamped or ignored, never raised.

use crate::types::CoinRecord;

/// Returns the coins whose name or symbol contains `term`, ignoring case.
///
/// The term is matched as typed, surrounding whitespace included; only a
/// term that is entirely whitespace counts as blank and matches every coin.
/// Input order is preserved.
///
/// # Arguments
/// * `coins` - The full coin list
/// * `term` - Search text entered by the user
///
/// # Example
/// ```
/// use crypto_dashboard::{filter::filter_coins, CoinRecord};
///
/// let coin = |id: &str, name: &str, symbol: &str| CoinRecord {
///     id: id.to_string(),
///     name: name.to_string(),
///     symbol: symbol.to_string(),
///     image: String::new(),
///     current_price: 1.0,
///     price_change_percentage_24h: None,
///     market_cap: 1.0,
/// };
/// let coins = vec![coin("bitcoin", "Bitcoin", "btc"), coin("tether", "Tether", "usdt")];
///
/// assert_eq!(filter_coins(&coins, "BTC")[0].id, "bitcoin");
/// assert_eq!(filter_coins(&coins, " ").len(), 2);
/// ```
pub fn filter_coins(coins: &[CoinRecord], term: &str) -> Vec<CoinRecord> {
    if term.trim().is_empty() {
        return coins.to_vec();
    }
    let needle = term.to_lowercase();

    coins
        .iter()
        .filter(|coin| {
            coin.name.to_lowercase().contains(&needle)
                || coin.symbol.to_lowercase().contains(&needle)
        })
        .cloned()
        .collect()
}

/// Number of pages needed for `len` items, never less than one.
pub fn total_pages(len: usize, page_size: usize) -> usize {
    if page_size == 0 {
        return 1;
    }
    len.div_ceil(page_size).max(1)
}

/// Returns the `page`-th slice (1-based) of `items`.
///
/// Pages past the end, and page zero, yield an empty slice.
pub fn paginate<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    if page == 0 {
        return &[];
    }
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

/// Page cursor over the filtered list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub current_page: usize,
    pub total_pages: usize,
    pub page_size: usize,
}

impl Pagination {
    pub fn new(page_size: usize) -> Self {
        Self {
            current_page: 1,
            total_pages: 1,
            page_size,
        }
    }

    /// Recomputes the page count for `len` items and pulls the cursor back in range
    pub fn update(&mut self, len: usize) {
        self.total_pages = total_pages(len, self.page_size);
        self.current_page = self.current_page.clamp(1, self.total_pages);
    }

    pub fn reset(&mut self) {
        self.current_page = 1;
    }

    /// Moves one page forward (+1) or back (-1).
    ///
    /// Moves that would leave `[1, total_pages]` are ignored; returns whether
    /// the cursor moved.
    pub fn change_page(&mut self, direction: i32) -> bool {
        let target = self.current_page as i64 + direction as i64;
        if target < 1 || target > self.total_pages as i64 {
            return false;
        }
        let moved = target as usize != self.current_page;
        self.current_page = target as usize;
        moved
    }

    pub fn has_prev(&self) -> bool {
        self.current_page > 1
    }

    pub fn has_next(&self) -> bool {
        self.current_page < self.total_pages
    }

    /// Zero-based index of the first item on the current page
    pub fn offset(&self) -> usize {
        (self.current_page - 1) * self.page_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn coin(id: &str, name: &str, symbol: &str) -> CoinRecord {
        CoinRecord {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
            image: String::new(),
            current_price: 1.0,
            price_change_percentage_24h: None,
            market_cap: 1.0,
        }
    }

    fn sample() -> Vec<CoinRecord> {
        vec![
            coin("bitcoin", "Bitcoin", "btc"),
            coin("ethereum", "Ethereum", "eth"),
            coin("wrapped-bitcoin", "Wrapped Bitcoin", "wbtc"),
            coin("tether", "Tether", "usdt"),
        ]
    }

    #[test]
    fn test_filter_matches_name_or_symbol_case_insensitively() {
        let coins = sample();

        let ids: Vec<_> = filter_coins(&coins, "BiTcOiN").into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["bitcoin", "wrapped-bitcoin"]);

        let ids: Vec<_> = filter_coins(&coins, "USDT").into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["tether"]);

        assert!(filter_coins(&coins, "doge").is_empty());
    }

    #[test]
    fn test_filter_matches_exactly_the_containing_coins() {
        let coins = sample();
        for term in ["e", "th", "btc", "x", "er"] {
            let filtered = filter_coins(&coins, term);
            let expected: Vec<_> = coins
                .iter()
                .filter(|c| c.name.to_lowercase().contains(term) || c.symbol.contains(term))
                .cloned()
                .collect();
            assert_eq!(filtered, expected, "term {:?}", term);
        }
    }

    #[test]
    fn test_surrounding_whitespace_is_part_of_the_term() {
        let mut coins = sample();
        coins.push(coin("coin-1", "Coin 1", "c1"));

        let ids: Vec<_> = filter_coins(&coins, "coin ").into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["coin-1"]);

        let ids: Vec<_> = filter_coins(&coins, " bitcoin").into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["wrapped-bitcoin"]);
    }

    #[test]
    fn test_blank_term_matches_all() {
        let coins = sample();
        assert_eq!(filter_coins(&coins, "").len(), 4);
        assert_eq!(filter_coins(&coins, "   \t").len(), 4);
    }

    #[test]
    fn test_total_pages_has_floor_of_one() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(250, 10), 25);
    }

    #[test]
    fn test_paginate_out_of_range_is_empty() {
        let items: Vec<u32> = (1..=25).collect();

        assert_eq!(paginate(&items, 1, 10), &items[0..10]);
        assert_eq!(paginate(&items, 3, 10), &[21, 22, 23, 24, 25]);
        assert!(paginate(&items, 4, 10).is_empty());
        assert!(paginate(&items, 0, 10).is_empty());
        assert!(paginate(&items, usize::MAX, 10).is_empty());
        assert!(paginate::<u32>(&[], 1, 10).is_empty());
    }

    #[test]
    fn test_change_page_is_clamped_without_wraparound() {
        let mut pagination = Pagination::new(10);
        pagination.update(25);

        assert!(!pagination.has_prev());
        assert!(pagination.has_next());
        assert!(!pagination.change_page(-1));
        assert_eq!(pagination.current_page, 1);

        assert!(pagination.change_page(1));
        assert!(pagination.change_page(1));
        assert_eq!(pagination.current_page, 3);
        assert!(!pagination.has_next());
        assert!(!pagination.change_page(1));
        assert_eq!(pagination.current_page, 3);
        assert_eq!(pagination.offset(), 20);
    }

    #[test]
    fn test_update_pulls_cursor_back_in_range() {
        let mut pagination = Pagination::new(10);
        pagination.update(50);
        pagination.change_page(1);
        pagination.change_page(1);
        pagination.change_page(1);
        assert_eq!(pagination.current_page, 4);

        pagination.update(12);
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(pagination.current_page, 2);
    }
}
