//! Durable key-value storage and the watchlist adapter on top of it

use crate::{constants::WATCHLIST_STORAGE_KEY, error::StoreError, types::WatchlistEntry};
use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};

/// Synchronous string key-value storage
///
/// Writes must be durable by the time `set` returns.
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, `None` when absent
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Stores `value` under `key`, replacing any previous value
    fn set(&self, key: &str, value: &str) -> Result<(), StoreError>;
}

/// Stores each key as `{dir}/{key}.json`
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Creates a file store rooted at `dir`, creating the directory if needed
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        match fs::read_to_string(self.path_for(key)) {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, value)?;
        fs::rename(&tmp, &path)?;
        Ok(())
    }
}

/// In-memory store, used in tests and for sessions that should not persist
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let values = self
            .values
            .read()
            .map_err(|_| std::io::Error::other("memory store lock poisoned"))?;
        Ok(values.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut values = self
            .values
            .write()
            .map_err(|_| std::io::Error::other("memory store lock poisoned"))?;
        values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Reads and writes the watchlist as a JSON array under a single key
pub struct WatchlistStore {
    backend: Arc<dyn KeyValueStore>,
    key: String,
}

impl WatchlistStore {
    /// Creates an adapter using the default watchlist key
    pub fn new(backend: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(backend, WATCHLIST_STORAGE_KEY)
    }

    pub fn with_key(backend: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
        }
    }

    /// Loads the persisted watchlist
    ///
    /// A missing key, an unreadable slot and a corrupt value all yield an
    /// empty watchlist.
    pub fn load(&self) -> Vec<WatchlistEntry> {
        let raw = match self.backend.get(&self.key) {
            Ok(Some(raw)) => raw,
            Ok(None) => return Vec::new(),
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Failed to read watchlist, starting empty");
                return Vec::new();
            }
        };

        match serde_json::from_str::<Vec<WatchlistEntry>>(&raw) {
            Ok(entries) => {
                tracing::debug!(count = entries.len(), "Loaded watchlist");
                entries
            }
            Err(e) => {
                tracing::warn!(key = %self.key, error = %e, "Stored watchlist is corrupt, starting empty");
                Vec::new()
            }
        }
    }

    /// Writes the full watchlist, replacing what was stored
    pub fn save(&self, entries: &[WatchlistEntry]) -> Result<(), StoreError> {
        let raw = serde_json::to_string(entries)?;
        self.backend.set(&self.key, &raw)?;
        tracing::debug!(count = entries.len(), "Saved watchlist");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CoinRecord, Currency};

    fn entry(id: &str) -> WatchlistEntry {
        WatchlistEntry::capture(
            CoinRecord {
                id: id.to_string(),
                name: id.to_uppercase(),
                symbol: id.to_string(),
                image: format!("https://img.example/{}.png", id),
                current_price: 2.5,
                price_change_percentage_24h: Some(-0.75),
                market_cap: 1_000.0,
            },
            Currency::Usd,
        )
    }

    fn temp_dir() -> PathBuf {
        std::env::temp_dir().join(format!("crypto-dashboard-test-{}", uuid::Uuid::new_v4()))
    }

    #[test]
    fn test_absent_key_is_empty_watchlist() {
        let store = WatchlistStore::new(Arc::new(MemoryStore::new()));
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let store = WatchlistStore::new(Arc::new(MemoryStore::new()));
        let entries = vec![entry("bitcoin"), entry("solana")];

        store.save(&entries).unwrap();
        assert_eq!(store.load(), entries);
    }

    #[test]
    fn test_corrupt_value_is_empty_watchlist() {
        let backend = Arc::new(MemoryStore::new());
        backend.set(WATCHLIST_STORAGE_KEY, "{not json").unwrap();

        let store = WatchlistStore::new(backend);
        assert!(store.load().is_empty());
    }

    #[test]
    fn test_file_store_roundtrip() {
        let dir = temp_dir();
        let store = FileStore::new(&dir).unwrap();

        assert_eq!(store.get("missing").unwrap(), None);
        store.set("cryptoWatchlist", "[]").unwrap();
        assert_eq!(store.get("cryptoWatchlist").unwrap().as_deref(), Some("[]"));
        assert!(dir.join("cryptoWatchlist.json").exists());

        store.set("cryptoWatchlist", r#"[{"id":"bitcoin"}]"#).unwrap();
        assert_eq!(
            store.get("cryptoWatchlist").unwrap().as_deref(),
            Some(r#"[{"id":"bitcoin"}]"#)
        );
        assert!(!dir.join("cryptoWatchlist.json.tmp").exists());

        fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_watchlist_persists_across_file_store_instances() {
        let dir = temp_dir();
        let entries = vec![entry("cardano")];

        WatchlistStore::new(Arc::new(FileStore::new(&dir).unwrap()))
            .save(&entries)
            .unwrap();
        let reloaded = WatchlistStore::new(Arc::new(FileStore::new(&dir).unwrap())).load();
        assert_eq!(reloaded, entries);

        fs::remove_dir_all(dir).unwrap();
    }
}
