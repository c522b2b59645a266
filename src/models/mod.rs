//! Request and Response models for the leaderboard API
//!
//! This module defines the DTOs (Data Transfer Objects) used for
//! serializing/deserializing HTTP request and response bodies.

pub mod requests;
pub mod responses;

// Re-export commonly used types
pub use requests::LeaderboardQuery;
pub use responses::{
    is_stale, leaderboard_body, CacheMetadata, ErrorResponse, HealthResponse, RefreshResponse,
    STALE_THRESHOLD_SECS,
};
