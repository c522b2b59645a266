//! Background Tasks Module
//!
//! # Tasks
//! - Leaderboard refresh: fetches standings upstream and replaces the snapshot
//! - TTL Cleanup: purges expired entries from the in-memory store

mod cleanup;
pub mod refresh;

pub use cleanup::spawn_cleanup_task;
pub use refresh::{refresh_leaderboard, spawn_refresh_task, RefreshReport, REFRESH_TTL};
