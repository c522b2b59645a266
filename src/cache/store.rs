//! Store Module
//!
//! The narrow key-value capability the leaderboard cache is built on. It mirrors
//! the handful of Redis commands the cache needs and nothing more.

use async_trait::async_trait;

use crate::error::StoreResult;

/// `TTL` reply for a key that does not exist.
pub const TTL_MISSING: i64 = -2;

/// `TTL` reply for a key that exists without an expiry.
pub const TTL_PERSISTENT: i64 = -1;

/// A key-value store with per-key expiry.
///
/// Every method may fail; callers decide whether a failure matters.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Backend name, for logging.
    fn backend_name(&self) -> &'static str;

    /// `SET key value EX ttl_secs`: write and (re)start the expiry countdown.
    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()>;

    /// `GET key`.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// `EXISTS key`.
    async fn exists(&self, key: &str) -> StoreResult<bool>;

    /// `TTL key`: seconds left, [`TTL_PERSISTENT`] or [`TTL_MISSING`].
    async fn ttl(&self, key: &str) -> StoreResult<i64>;

    /// `EXPIRE key secs`. Returns whether the key existed.
    async fn expire(&self, key: &str, secs: u64) -> StoreResult<bool>;

    /// `DEL key...`. Returns how many keys were removed.
    async fn delete(&self, keys: &[String]) -> StoreResult<u64>;

    /// All live keys starting with `prefix`.
    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>>;
}
