//! Cache Module
//!
//! Leaderboard snapshot cache over a pluggable key-value store with TTL expiry.

mod entry;
mod leaderboard;
mod memory;
mod snapshot;
mod store;
mod upstash;


// Re-export public types
pub use entry::{current_timestamp_ms, StoreEntry};
pub use leaderboard::{cache_key, LeaderboardCache, CACHE_PREFIX, DEFAULT_TTL, TTL_UNKNOWN};
pub use memory::MemoryStore;
pub use snapshot::Snapshot;
pub use store::{Store, TTL_MISSING, TTL_PERSISTENT};
pub use upstash::UpstashStore;
