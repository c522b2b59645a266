//! Leaderboard Cache - a read-through cache in front of a tournament API
//!
//! A refresh job periodically pulls standings upstream and stores a snapshot
//! with a TTL; a public read endpoint serves that snapshot to any number of
//! browsers without ever touching the upstream API.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod tasks;
pub mod upstream;

pub use api::AppState;
pub use cache::LeaderboardCache;
pub use config::Config;
pub use tasks::{spawn_cleanup_task, spawn_refresh_task};
