//! Leaderboard Cache Module
//!
//! Leaderboard-shaped operations over a [`Store`]. The store is treated as
//! unreliable: every failure is logged and collapsed into an "absent" result,
//! so losing the store never takes the refresh job or the read path down.

use std::sync::Arc;

use serde_json::value::RawValue;
use tracing::{debug, warn};

use crate::cache::store::Store;
use crate::cache::Snapshot;
use crate::error::{StoreError, StoreResult};

/// Namespace for every leaderboard key.
pub const CACHE_PREFIX: &str = "leaderboard:";

/// Write TTL in seconds used when none is given.
pub const DEFAULT_TTL: u64 = 300;

/// `ttl` result for missing keys, keys without expiry, and store failures.
pub const TTL_UNKNOWN: i64 = -1;

/// Store key for a tournament.
pub fn cache_key(tournament_id: &str) -> String {
    format!("{CACHE_PREFIX}{tournament_id}")
}

// == Leaderboard Cache ==
/// Snapshot cache keyed by tournament id. Clones share the same store.
#[derive(Clone)]
pub struct LeaderboardCache {
    store: Arc<dyn Store>,
}

impl LeaderboardCache {
    /// Wraps an already-constructed store.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub fn backend_name(&self) -> &'static str {
        self.store.backend_name()
    }

    // == Set ==
    /// Replaces the tournament's snapshot with a fresh capture of `payload`.
    ///
    /// Best-effort: a store failure is logged and otherwise ignored.
    pub async fn set(&self, tournament_id: &str, payload: &RawValue, ttl_secs: u64) {
        let result = self.try_set(tournament_id, payload, ttl_secs).await;
        absorb("set", tournament_id, result, ());
    }

    /// [`set`](Self::set) with [`DEFAULT_TTL`].
    pub async fn set_default(&self, tournament_id: &str, payload: &RawValue) {
        self.set(tournament_id, payload, DEFAULT_TTL).await;
    }

    // == Get ==
    /// Current snapshot, or `None` when missing, unreadable, or the store is down.
    pub async fn get(&self, tournament_id: &str) -> Option<Snapshot> {
        let result = self.try_get(tournament_id).await;
        absorb("get", tournament_id, result, None)
    }

    // == Has ==
    /// Whether a snapshot exists. `false` on store failure.
    pub async fn has(&self, tournament_id: &str) -> bool {
        let result = self.store.exists(&cache_key(tournament_id)).await;
        absorb("has", tournament_id, result, false)
    }

    // == TTL ==
    /// Remaining seconds before the snapshot expires.
    ///
    /// [`TTL_UNKNOWN`] when the key is missing, has no expiry, or the store failed.
    pub async fn ttl(&self, tournament_id: &str) -> i64 {
        let result = self.store.ttl(&cache_key(tournament_id)).await;
        let ttl = absorb("ttl", tournament_id, result, TTL_UNKNOWN);
        if ttl < 0 {
            TTL_UNKNOWN
        } else {
            ttl
        }
    }

    // == Extend ==
    /// Restarts the expiry countdown at `secs` from now. No-op on failure.
    pub async fn extend(&self, tournament_id: &str, secs: u64) {
        let result = self.store.expire(&cache_key(tournament_id), secs).await;
        if absorb("extend", tournament_id, result, false) {
            debug!(tournament_id, secs, "leaderboard cache expiry extended");
        }
    }

    // == Clear ==
    /// Deletes one tournament's snapshot, or every leaderboard snapshot when `None`.
    pub async fn clear(&self, tournament_id: Option<&str>) {
        let result = match tournament_id {
            Some(id) => self.store.delete(&[cache_key(id)]).await,
            None => self.clear_namespace().await,
        };
        let removed = absorb("clear", tournament_id.unwrap_or("*"), result, 0);
        debug!(removed, "leaderboard cache cleared");
    }

    async fn try_set(
        &self,
        tournament_id: &str,
        payload: &RawValue,
        ttl_secs: u64,
    ) -> StoreResult<()> {
        let snapshot = Snapshot::capture(tournament_id, payload);
        let value = serde_json::to_string(&snapshot)
            .map_err(|err| StoreError::Command(format!("snapshot encoding failed: {err}")))?;
        self.store
            .set_ex(&cache_key(tournament_id), &value, ttl_secs)
            .await
    }

    async fn try_get(&self, tournament_id: &str) -> StoreResult<Option<Snapshot>> {
        let Some(value) = self.store.get(&cache_key(tournament_id)).await? else {
            return Ok(None);
        };
        serde_json::from_str(&value)
            .map(Some)
            .map_err(|err| StoreError::Command(format!("snapshot decoding failed: {err}")))
    }

    async fn clear_namespace(&self) -> StoreResult<u64> {
        let keys = self.store.scan_prefix(CACHE_PREFIX).await?;
        self.store.delete(&keys).await
    }
}

/// Collapses a store outcome into the value callers see.
fn absorb<T>(operation: &str, tournament_id: &str, result: StoreResult<T>, fallback: T) -> T {
    match result {
        Ok(value) => value,
        Err(err) => {
            warn!(operation, tournament_id, error = %err, "leaderboard cache degraded");
            fallback
        }
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::entry::current_timestamp_ms;
    use crate::cache::MemoryStore;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Store whose every command fails.
    struct DownStore;

    #[async_trait]
    impl Store for DownStore {
        fn backend_name(&self) -> &'static str {
            "down"
        }
        async fn set_ex(&self, _: &str, _: &str, _: u64) -> StoreResult<()> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn get(&self, _: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn exists(&self, _: &str) -> StoreResult<bool> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn ttl(&self, _: &str) -> StoreResult<i64> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn expire(&self, _: &str, _: u64) -> StoreResult<bool> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn delete(&self, _: &[String]) -> StoreResult<u64> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
        async fn scan_prefix(&self, _: &str) -> StoreResult<Vec<String>> {
            Err(StoreError::Unavailable("connection refused".into()))
        }
    }

    fn memory_cache() -> (LeaderboardCache, Arc<MemoryStore>) {
        let store = Arc::new(MemoryStore::new());
        (LeaderboardCache::new(store.clone()), store)
    }

    fn raw(value: &Value) -> Box<RawValue> {
        serde_json::value::to_raw_value(value).unwrap()
    }

    #[test]
    fn test_cache_key() {
        assert_eq!(cache_key("121134"), "leaderboard:121134");
    }

    #[tokio::test]
    async fn test_set_then_get() {
        let (cache, _) = memory_cache();
        let payload = json!({"data": [{"rank": 1, "username": "alice"}], "meta": {"total": 1}});

        let before = current_timestamp_ms();
        cache.set("t1", &raw(&payload), 300).await;

        let snapshot = cache.get("t1").await.expect("snapshot should be cached");
        let stored: Value = serde_json::from_str(snapshot.payload().get()).unwrap();
        assert_eq!(stored, payload);
        assert_eq!(snapshot.tournament_id(), "t1");
        assert!(snapshot.captured_at() >= before);
        assert!(snapshot.captured_at() - before < 1000);
    }

    #[tokio::test]
    async fn test_ttl_after_set() {
        let (cache, _) = memory_cache();
        cache.set_default("t1", &raw(&json!({"data": []}))).await;

        let ttl = cache.ttl("t1").await;
        assert!(ttl <= 300 && ttl > 295, "unexpected ttl {ttl}");
    }

    #[tokio::test]
    async fn test_missing_tournament() {
        let (cache, _) = memory_cache();

        assert!(cache.get("never").await.is_none());
        assert!(!cache.has("never").await);
        assert_eq!(cache.ttl("never").await, TTL_UNKNOWN);
    }

    #[tokio::test]
    async fn test_second_set_replaces_first() {
        let (cache, _) = memory_cache();
        cache.set("t1", &raw(&json!({"data": [1, 2, 3]})), 300).await;
        cache.set("t1", &raw(&json!({"data": [4]})), 300).await;

        let snapshot = cache.get("t1").await.unwrap();
        let stored: Value = serde_json::from_str(snapshot.payload().get()).unwrap();
        assert_eq!(stored, json!({"data": [4]}));
    }

    #[tokio::test]
    async fn test_extend() {
        let (cache, _) = memory_cache();
        cache.set("t1", &raw(&json!({})), 30).await;

        cache.extend("t1", 900).await;
        let ttl = cache.ttl("t1").await;
        assert!(ttl <= 900 && ttl > 895);

        // Extending something absent stays absent
        cache.extend("missing", 900).await;
        assert!(!cache.has("missing").await);
    }

    #[tokio::test]
    async fn test_clear_single() {
        let (cache, _) = memory_cache();
        cache.set("t1", &raw(&json!({})), 300).await;
        cache.set("t2", &raw(&json!({})), 300).await;

        cache.clear(Some("t1")).await;

        assert!(!cache.has("t1").await);
        assert_eq!(cache.ttl("t1").await, TTL_UNKNOWN);
        assert!(cache.has("t2").await);
    }

    #[tokio::test]
    async fn test_clear_all_leaves_other_namespaces() {
        let (cache, store) = memory_cache();
        cache.set("t1", &raw(&json!({})), 300).await;
        cache.set("t2", &raw(&json!({})), 300).await;
        store.set_ex("session:abc", "x", 300).await.unwrap();

        cache.clear(None).await;

        assert!(!cache.has("t1").await);
        assert!(!cache.has("t2").await);
        assert!(store.exists("session:abc").await.unwrap());
    }

    #[tokio::test]
    async fn test_corrupt_entry_reads_as_absent() {
        let (cache, store) = memory_cache();
        store
            .set_ex(&cache_key("t1"), "not json at all", 300)
            .await
            .unwrap();

        assert!(cache.get("t1").await.is_none());
        // Still present as far as the store is concerned
        assert!(cache.has("t1").await);
    }

    #[tokio::test]
    async fn test_zero_ttl_write_is_swallowed() {
        let (cache, _) = memory_cache();
        cache.set("t1", &raw(&json!({})), 0).await;

        assert!(cache.get("t1").await.is_none());
    }

    #[tokio::test]
    async fn test_store_down_degrades_silently() {
        let cache = LeaderboardCache::new(Arc::new(DownStore));

        cache.set("t1", &raw(&json!({"data": []})), 300).await;
        assert!(cache.get("t1").await.is_none());
        assert!(!cache.has("t1").await);
        assert_eq!(cache.ttl("t1").await, TTL_UNKNOWN);
        cache.extend("t1", 60).await;
        cache.clear(Some("t1")).await;
        cache.clear(None).await;
    }
}
