//! Watchlist collection and the manager that persists every mutation

use crate::{
    constants::CLEAR_WATCHLIST_PROMPT,
    error::StoreError,
    store::WatchlistStore,
    types::{CoinRecord, Currency, WatchlistEntry},
};
use std::collections::HashSet;

/// Blocking yes/no question asked before destructive actions
pub trait Confirm {
    fn confirm(&self, message: &str) -> bool;
}

/// A pre-recorded answer
impl Confirm for bool {
    fn confirm(&self, _message: &str) -> bool {
        *self
    }
}

/// Result of toggling a coin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Toggle {
    Added,
    Removed,
}

/// Result of a clear request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClearOutcome {
    /// The watchlist was emptied; holds the number of entries dropped
    Cleared(usize),
    /// The user declined the confirmation
    Declined,
    /// Nothing to clear; no question was asked
    AlreadyEmpty,
}

/// A mutation outcome together with any failure to persist it
///
/// The in-memory mutation stands even when saving failed.
#[derive(Debug)]
pub struct Change<T> {
    pub outcome: T,
    pub save_error: Option<StoreError>,
}

impl<T> Change<T> {
    fn unsaved(outcome: T) -> Self {
        Self {
            outcome,
            save_error: None,
        }
    }
}

/// Ordered watchlist holding at most one entry per coin id
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Watchlist {
    entries: Vec<WatchlistEntry>,
}

impl Watchlist {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a watchlist from stored entries, keeping the first of any duplicates
    pub fn from_entries(entries: Vec<WatchlistEntry>) -> Self {
        let mut seen = HashSet::new();
        let entries = entries
            .into_iter()
            .filter(|e| seen.insert(e.id().to_string()))
            .collect();
        Self { entries }
    }

    pub fn entries(&self) -> &[WatchlistEntry] {
        &self.entries
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.iter().any(|e| e.id() == id)
    }

    pub fn get(&self, id: &str) -> Option<&WatchlistEntry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends `coin` when absent, removes it when present
    pub fn toggle(&mut self, coin: &CoinRecord, currency: Currency) -> Toggle {
        match self.entries.iter().position(|e| e.id() == coin.id) {
            Some(index) => {
                self.entries.remove(index);
                Toggle::Removed
            }
            None => {
                self.entries
                    .push(WatchlistEntry::capture(coin.clone(), currency));
                Toggle::Added
            }
        }
    }

    /// Removes every entry with `id`; returns how many were removed
    pub fn remove(&mut self, id: &str) -> usize {
        let before = self.entries.len();
        self.entries.retain(|e| e.id() != id);
        before - self.entries.len()
    }

    /// Empties the watchlist; returns how many entries were dropped
    pub fn clear(&mut self) -> usize {
        let count = self.entries.len();
        self.entries.clear();
        count
    }
}

/// Applies watchlist mutations and flushes each one to durable storage
pub struct WatchlistManager {
    store: WatchlistStore,
}

impl WatchlistManager {
    pub fn new(store: WatchlistStore) -> Self {
        Self { store }
    }

    /// Loads the persisted watchlist (empty on any read failure)
    pub fn load(&self) -> Watchlist {
        Watchlist::from_entries(self.store.load())
    }

    fn flush<T>(&self, watchlist: &Watchlist, outcome: T) -> Change<T> {
        let save_error = match self.store.save(watchlist.entries()) {
            Ok(()) => None,
            Err(e) => {
                tracing::error!(error = %e, "Failed to save watchlist");
                Some(e)
            }
        };
        Change {
            outcome,
            save_error,
        }
    }

    /// Adds `coin` when it is not on the watchlist, removes it when it is,
    /// then writes the whole watchlist to storage.
    ///
    /// A new entry is a snapshot of `coin` priced in `currency`.
    ///
    /// # Arguments
    /// * `watchlist` - The in-memory watchlist to mutate
    /// * `coin` - The coin as currently listed
    /// * `currency` - Currency the coin's figures are priced in
    ///
    /// # Returns
    /// The toggle outcome plus the save error, if any. A failed save does not
    /// undo the in-memory change.
    pub fn toggle(
        &self,
        watchlist: &mut Watchlist,
        coin: &CoinRecord,
        currency: Currency,
    ) -> Change<Toggle> {
        let outcome = watchlist.toggle(coin, currency);
        tracing::info!(coin = %coin.id, outcome = ?outcome, "Toggled watchlist entry");
        self.flush(watchlist, outcome)
    }

    /// Removes every entry with `id` and saves the result
    pub fn remove(&self, watchlist: &mut Watchlist, id: &str) -> Change<usize> {
        let removed = watchlist.remove(id);
        tracing::info!(coin = %id, removed, "Removed watchlist entry");
        self.flush(watchlist, removed)
    }

    /// Empties the watchlist after confirmation
    ///
    /// An empty watchlist is left alone without asking.
    pub fn clear(&self, watchlist: &mut Watchlist, confirm: &dyn Confirm) -> Change<ClearOutcome> {
        if watchlist.is_empty() {
            return Change::unsaved(ClearOutcome::AlreadyEmpty);
        }
        if !confirm.confirm(CLEAR_WATCHLIST_PROMPT) {
            return Change::unsaved(ClearOutcome::Declined);
        }

        let count = watchlist.clear();
        tracing::info!(count, "Cleared watchlist");
        self.flush(watchlist, ClearOutcome::Cleared(count))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{KeyValueStore, MemoryStore};
    use std::cell::Cell;
    use std::sync::Arc;

    fn coin(id: &str, change: Option<f64>) -> CoinRecord {
        CoinRecord {
            id: id.to_string(),
            name: format!("{} coin", id),
            symbol: id.chars().take(3).collect(),
            image: String::new(),
            current_price: 10.0,
            price_change_percentage_24h: change,
            market_cap: 1_000_000.0,
        }
    }

    fn manager() -> (WatchlistManager, Arc<MemoryStore>) {
        let backend = Arc::new(MemoryStore::new());
        let manager = WatchlistManager::new(WatchlistStore::new(backend.clone()));
        (manager, backend)
    }

    fn saved_ids(backend: &MemoryStore) -> Vec<String> {
        let raw = backend.get("cryptoWatchlist").unwrap().unwrap_or_default();
        let entries: Vec<WatchlistEntry> = serde_json::from_str(&raw).unwrap();
        entries.into_iter().map(|e| e.coin.id).collect()
    }

    struct CountingConfirm {
        answer: bool,
        asked: Cell<usize>,
    }

    impl Confirm for CountingConfirm {
        fn confirm(&self, message: &str) -> bool {
            assert_eq!(message, CLEAR_WATCHLIST_PROMPT);
            self.asked.set(self.asked.get() + 1);
            self.answer
        }
    }

    #[test]
    fn test_toggle_twice_restores_original_state() {
        let (manager, _) = manager();
        let mut watchlist = Watchlist::new();
        manager.toggle(&mut watchlist, &coin("bitcoin", None), Currency::Usd);
        let original = watchlist.clone();

        let added = manager.toggle(&mut watchlist, &coin("solana", None), Currency::Usd);
        assert_eq!(added.outcome, Toggle::Added);
        let removed = manager.toggle(&mut watchlist, &coin("solana", None), Currency::Usd);
        assert_eq!(removed.outcome, Toggle::Removed);

        assert_eq!(watchlist, original);
        assert_eq!(watchlist.len(), 1);
    }

    #[test]
    fn test_every_mutation_is_flushed() {
        let (manager, backend) = manager();
        let mut watchlist = Watchlist::new();

        manager.toggle(&mut watchlist, &coin("bitcoin", None), Currency::Usd);
        manager.toggle(&mut watchlist, &coin("ethereum", None), Currency::Usd);
        assert_eq!(saved_ids(&backend), vec!["bitcoin", "ethereum"]);

        let change = manager.remove(&mut watchlist, "bitcoin");
        assert_eq!(change.outcome, 1);
        assert!(change.save_error.is_none());
        assert_eq!(saved_ids(&backend), vec!["ethereum"]);

        manager.clear(&mut watchlist, &true);
        assert!(saved_ids(&backend).is_empty());
    }

    #[test]
    fn test_no_duplicates_after_mixed_operations() {
        let (manager, _) = manager();
        let mut watchlist = Watchlist::new();
        let ids = ["a", "b", "a", "c", "b", "a", "c", "c", "d"];

        for (i, id) in ids.iter().enumerate() {
            match i % 4 {
                3 => {
                    manager.remove(&mut watchlist, id);
                }
                _ => {
                    manager.toggle(&mut watchlist, &coin(id, None), Currency::Usd);
                }
            }
            let unique: HashSet<_> = watchlist.entries().iter().map(|e| e.id()).collect();
            assert_eq!(unique.len(), watchlist.len());
        }
    }

    #[test]
    fn test_from_entries_drops_duplicates() {
        let entries = vec![
            WatchlistEntry::capture(coin("bitcoin", Some(1.0)), Currency::Usd),
            WatchlistEntry::capture(coin("bitcoin", Some(2.0)), Currency::Usd),
            WatchlistEntry::capture(coin("tron", None), Currency::Usd),
        ];
        let watchlist = Watchlist::from_entries(entries);

        assert_eq!(watchlist.len(), 2);
        assert_eq!(watchlist.get("bitcoin").unwrap().coin.change_24h(), 1.0);
    }

    #[test]
    fn test_clear_asks_only_when_non_empty() {
        let (manager, backend) = manager();
        let mut watchlist = Watchlist::new();
        let confirm = CountingConfirm {
            answer: true,
            asked: Cell::new(0),
        };

        let change = manager.clear(&mut watchlist, &confirm);
        assert_eq!(change.outcome, ClearOutcome::AlreadyEmpty);
        assert_eq!(confirm.asked.get(), 0);
        assert_eq!(backend.get("cryptoWatchlist").unwrap(), None);

        manager.toggle(&mut watchlist, &coin("bitcoin", None), Currency::Usd);
        manager.toggle(&mut watchlist, &coin("ethereum", None), Currency::Usd);
        let change = manager.clear(&mut watchlist, &confirm);
        assert_eq!(change.outcome, ClearOutcome::Cleared(2));
        assert_eq!(confirm.asked.get(), 1);
        assert!(watchlist.is_empty());
    }

    #[test]
    fn test_declined_clear_keeps_entries() {
        let (manager, backend) = manager();
        let mut watchlist = Watchlist::new();
        manager.toggle(&mut watchlist, &coin("bitcoin", None), Currency::Usd);

        let change = manager.clear(&mut watchlist, &false);
        assert_eq!(change.outcome, ClearOutcome::Declined);
        assert_eq!(watchlist.len(), 1);
        assert_eq!(saved_ids(&backend), vec!["bitcoin"]);
    }

    #[test]
    fn test_load_restores_saved_watchlist() {
        let (manager, backend) = manager();
        let mut watchlist = Watchlist::new();
        manager.toggle(&mut watchlist, &coin("bitcoin", Some(3.0)), Currency::Eur);

        let reloaded = WatchlistManager::new(WatchlistStore::new(backend)).load();
        assert_eq!(reloaded, watchlist);
        assert_eq!(reloaded.entries()[0].currency, Some(Currency::Eur));
    }
}
