//! Keyed asset cache consulted while dealing and written after image generation.

use crate::db::{AssetRepository, DbError, SqliteRepository};
use std::collections::HashMap;
use std::sync::Mutex;

/// Key-value store for generated illustrations.
///
/// Implementations must tolerate concurrent callers; each call is atomic per key.
pub trait AssetCache: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, DbError>;
    fn put(&self, key: &str, value: &str) -> Result<(), DbError>;
    /// Remove every entry, returning how many were removed.
    fn clear(&self) -> Result<usize, DbError>;
}

impl AssetCache for Mutex<SqliteRepository> {
    /// A corrupted entry is dropped and reported as a miss.
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let repo = self.lock().map_err(|_| DbError::LockPoisoned)?;
        match repo.get_asset(key) {
            Ok(asset) => Ok(asset.map(|asset| asset.data)),
            Err(DbError::Corrupted(key)) => {
                tracing::warn!(key = %key, "discarding corrupted asset");
                repo.delete_asset(&key)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn put(&self, key: &str, value: &str) -> Result<(), DbError> {
        let repo = self.lock().map_err(|_| DbError::LockPoisoned)?;
        repo.put_asset(key, value)?;
        Ok(())
    }

    fn clear(&self) -> Result<usize, DbError> {
        let repo = self.lock().map_err(|_| DbError::LockPoisoned)?;
        let removed = repo.clear_assets()?;
        tracing::info!(removed, "cleared asset cache");
        Ok(removed)
    }
}

/// Non-durable cache, used when the database cannot be opened.
#[derive(Default)]
pub struct MemoryAssetCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryAssetCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().map(|e| e.len()).unwrap_or_default()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl AssetCache for MemoryAssetCache {
    fn get(&self, key: &str) -> Result<Option<String>, DbError> {
        let entries = self.entries.lock().map_err(|_| DbError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &str) -> Result<(), DbError> {
        let mut entries = self.entries.lock().map_err(|_| DbError::LockPoisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<usize, DbError> {
        let mut entries = self.entries.lock().map_err(|_| DbError::LockPoisoned)?;
        let removed = entries.len();
        entries.clear();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sqlite_cache_round_trips_payload() {
        let cache = Mutex::new(SqliteRepository::open_in_memory().unwrap());
        assert_eq!(cache.get("img_turn").unwrap(), None);
        cache.put("img_turn", "data:image/png;base64,dHVybg==").unwrap();
        assert_eq!(
            cache.get("img_turn").unwrap().as_deref(),
            Some("data:image/png;base64,dHVybg==")
        );
        assert_eq!(cache.clear().unwrap(), 1);
        assert_eq!(cache.get("img_turn").unwrap(), None);
    }

    #[test]
    fn test_corrupted_entry_is_a_miss_and_removed() {
        let repo = SqliteRepository::open_in_memory().unwrap();
        repo.put_asset("img_under", "payload").unwrap();
        repo.put_asset("img_cross", "other").unwrap();
        repo.connection()
            .execute("UPDATE assets SET data = 'tampered' WHERE key = 'img_under'", [])
            .unwrap();

        let cache = Mutex::new(repo);
        assert_eq!(cache.get("img_under").unwrap(), None);
        let repo = cache.lock().unwrap();
        assert_eq!(repo.count_assets().unwrap(), 1);
        assert!(repo.get_asset("img_under").unwrap().is_none());
    }

    #[test]
    fn test_memory_cache_clear() {
        let cache = MemoryAssetCache::new();
        cache.put("img_go", "go").unwrap();
        cache.put("img_left", "left").unwrap();
        assert_eq!(cache.len(), 2);
        assert_eq!(cache.clear().unwrap(), 2);
        assert!(cache.is_empty());
    }
}
