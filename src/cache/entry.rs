//! Store Entry Module
//!
//! Defines the structure for individual in-memory store entries with TTL support.

use chrono::Utc;

// == Store Entry ==
/// Represents a single stored value with expiry metadata.
#[derive(Debug, Clone)]
pub struct StoreEntry {
    /// The stored value
    pub value: String,
    /// Creation timestamp (Unix milliseconds)
    pub created_at: i64,
    /// Expiration timestamp (Unix milliseconds), None = no expiration
    pub expires_at: Option<i64>,
}

impl StoreEntry {
    // == Constructor ==
    /// Creates a new entry with optional TTL.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_seconds` - Optional TTL in seconds
    pub fn new(value: String, ttl_seconds: Option<u64>) -> Self {
        let now = current_timestamp_ms();
        Self {
            value,
            created_at: now,
            expires_at: ttl_seconds.map(|ttl| deadline_from(now, ttl)),
        }
    }

    // == Is Expired ==
    /// Checks if the entry has expired.
    ///
    /// An entry is expired once the current time reaches its expiration time.
    pub fn is_expired(&self) -> bool {
        match self.expires_at {
            Some(expires) => current_timestamp_ms() >= expires,
            None => false,
        }
    }

    // == Expire ==
    /// Restarts the countdown so the entry expires `ttl_seconds` from now.
    pub fn expire_in(&mut self, ttl_seconds: u64) {
        self.expires_at = Some(deadline_from(current_timestamp_ms(), ttl_seconds));
    }

    // == Time To Live ==
    /// Returns remaining TTL in milliseconds, or None if no expiration is set.
    ///
    /// Returns `Some(0)` once the entry has expired.
    pub fn ttl_remaining_ms(&self) -> Option<i64> {
        self.expires_at
            .map(|expires| (expires - current_timestamp_ms()).max(0))
    }

    /// Returns remaining TTL in whole seconds the way Redis `TTL` reports it.
    ///
    /// Milliseconds are rounded to the nearest second; `-1` means no expiry.
    pub fn ttl_seconds(&self) -> i64 {
        match self.ttl_remaining_ms() {
            Some(ms) => (ms + 500) / 1000,
            None => -1,
        }
    }
}

fn deadline_from(now_ms: i64, ttl_seconds: u64) -> i64 {
    let ttl_ms = i64::try_from(ttl_seconds)
        .unwrap_or(i64::MAX)
        .saturating_mul(1000);
    now_ms.saturating_add(ttl_ms)
}

// == Utility Functions ==
/// Returns current Unix timestamp in milliseconds.
pub fn current_timestamp_ms() -> i64 {
    Utc::now().timestamp_millis()
}
