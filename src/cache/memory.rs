//! Memory Store Module
//!
//! In-process [`Store`] with Redis-compatible TTL semantics. Used when no
//! remote store is configured, and as the backend in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::cache::store::{Store, TTL_MISSING};
use crate::cache::StoreEntry;
use crate::error::{StoreError, StoreResult};

// == Memory Store ==
/// HashMap-backed store; expired entries are dropped lazily and by [`MemoryStore::purge_expired`].
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RwLock<HashMap<String, StoreEntry>>,
}

impl MemoryStore {
    // == Constructor ==
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // == Purge Expired ==
    /// Removes all expired entries.
    ///
    /// Returns the number of entries removed.
    pub async fn purge_expired(&self) -> usize {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.is_expired());
        before - entries.len()
    }

    // == Length ==
    /// Returns the number of entries held, including not-yet-purged expired ones.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    // == Is Empty ==
    /// Returns true if the store holds no entries.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Drops `key` if it has expired, then hands back the live entry, if any.
    fn live_entry<'a>(
        entries: &'a mut HashMap<String, StoreEntry>,
        key: &str,
    ) -> Option<&'a mut StoreEntry> {
        if entries.get(key).is_some_and(StoreEntry::is_expired) {
            entries.remove(key);
        }
        entries.get_mut(key)
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend_name(&self) -> &'static str {
        "memory"
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()> {
        if ttl_secs == 0 {
            return Err(StoreError::Command(
                "invalid expire time in 'set' command".to_string(),
            ));
        }

        let entry = StoreEntry::new(value.to_string(), Some(ttl_secs));
        self.entries.write().await.insert(key.to_string(), entry);
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let mut entries = self.entries.write().await;
        Ok(Self::live_entry(&mut entries, key).map(|entry| entry.value.clone()))
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let mut entries = self.entries.write().await;
        Ok(Self::live_entry(&mut entries, key).is_some())
    }

    async fn ttl(&self, key: &str) -> StoreResult<i64> {
        let mut entries = self.entries.write().await;
        Ok(Self::live_entry(&mut entries, key)
            .map(|entry| entry.ttl_seconds())
            .unwrap_or(TTL_MISSING))
    }

    async fn expire(&self, key: &str, secs: u64) -> StoreResult<bool> {
        let mut entries = self.entries.write().await;
        if Self::live_entry(&mut entries, key).is_none() {
            return Ok(false);
        }

        // EXPIRE with a non-positive timeout deletes the key
        if secs == 0 {
            entries.remove(key);
        } else if let Some(entry) = entries.get_mut(key) {
            entry.expire_in(secs);
        }
        Ok(true)
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        let mut entries = self.entries.write().await;
        let removed = keys
            .iter()
            .filter_map(|key| entries.remove(key))
            .filter(|entry| !entry.is_expired())
            .count();
        Ok(removed as u64)
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let entries = self.entries.read().await;
        Ok(entries
            .iter()
            .filter(|(key, entry)| key.starts_with(prefix) && !entry.is_expired())
            .map(|(key, _)| key.clone())
            .collect())
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::store::TTL_PERSISTENT;
    use std::time::Duration;

    #[tokio::test]
    async fn test_store_new() {
        let store = MemoryStore::new();
        assert_eq!(store.len().await, 0);
        assert!(store.is_empty().await);
        assert_eq!(store.backend_name(), "memory");
    }

    #[tokio::test]
    async fn test_set_and_get() {
        let store = MemoryStore::new();

        store.set_ex("key1", "value1", 300).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("value1"));
        assert!(store.exists("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_get_nonexistent() {
        let store = MemoryStore::new();

        assert!(store.get("nonexistent").await.unwrap().is_none());
        assert!(!store.exists("nonexistent").await.unwrap());
        assert_eq!(store.ttl("nonexistent").await.unwrap(), TTL_MISSING);
    }

    #[tokio::test]
    async fn test_set_rejects_zero_ttl() {
        let store = MemoryStore::new();

        let result = store.set_ex("key1", "value1", 0).await;
        assert!(matches!(result, Err(StoreError::Command(_))));
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_overwrite_resets_ttl() {
        let store = MemoryStore::new();

        store.set_ex("key1", "value1", 10).await.unwrap();
        store.set_ex("key1", "value2", 300).await.unwrap();

        assert_eq!(store.get("key1").await.unwrap().as_deref(), Some("value2"));
        assert_eq!(store.ttl("key1").await.unwrap(), 300);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_ttl_expiration() {
        let store = MemoryStore::new();

        store.set_ex("key1", "value1", 1).await.unwrap();
        assert!(store.get("key1").await.unwrap().is_some());

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert!(store.get("key1").await.unwrap().is_none());
        assert_eq!(store.ttl("key1").await.unwrap(), TTL_MISSING);
        // Lazy removal on access
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_expire_existing_and_missing() {
        let store = MemoryStore::new();
        store.set_ex("key1", "value1", 10).await.unwrap();

        assert!(store.expire("key1", 600).await.unwrap());
        assert_eq!(store.ttl("key1").await.unwrap(), 600);

        assert!(!store.expire("missing", 600).await.unwrap());
        assert_eq!(store.ttl("missing").await.unwrap(), TTL_MISSING);
    }

    #[tokio::test]
    async fn test_expire_zero_deletes() {
        let store = MemoryStore::new();
        store.set_ex("key1", "value1", 10).await.unwrap();

        assert!(store.expire("key1", 0).await.unwrap());
        assert!(!store.exists("key1").await.unwrap());
    }

    #[tokio::test]
    async fn test_persistent_entry_ttl() {
        let store = MemoryStore::new();
        store
            .entries
            .write()
            .await
            .insert("forever".to_string(), StoreEntry::new("v".to_string(), None));

        assert_eq!(store.ttl("forever").await.unwrap(), TTL_PERSISTENT);
    }

    #[tokio::test]
    async fn test_delete_counts_removed_keys() {
        let store = MemoryStore::new();
        store.set_ex("a", "1", 60).await.unwrap();
        store.set_ex("b", "2", 60).await.unwrap();

        let removed = store
            .delete(&["a".to_string(), "b".to_string(), "c".to_string()])
            .await
            .unwrap();

        assert_eq!(removed, 2);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_scan_prefix() {
        let store = MemoryStore::new();
        store.set_ex("leaderboard:1", "a", 60).await.unwrap();
        store.set_ex("leaderboard:2", "b", 60).await.unwrap();
        store.set_ex("session:1", "c", 60).await.unwrap();

        let mut keys = store.scan_prefix("leaderboard:").await.unwrap();
        keys.sort();

        assert_eq!(keys, vec!["leaderboard:1", "leaderboard:2"]);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let store = MemoryStore::new();
        store.set_ex("short", "1", 1).await.unwrap();
        store.set_ex("long", "2", 10).await.unwrap();

        tokio::time::sleep(Duration::from_millis(1100)).await;

        assert_eq!(store.purge_expired().await, 1);
        assert_eq!(store.len().await, 1);
        assert!(store.exists("long").await.unwrap());
    }
}
