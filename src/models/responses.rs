//! Response DTOs for the leaderboard API
//!
//! Defines the structure of outgoing HTTP response bodies.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::cache::Snapshot;
use crate::tasks::RefreshReport;

/// Remaining TTL (seconds) below which a snapshot is reported as stale.
pub const STALE_THRESHOLD_SECS: i64 = 60;

/// Whether a snapshot with `ttl` seconds left should be flagged stale.
pub fn is_stale(ttl: i64) -> bool {
    ttl < STALE_THRESHOLD_SECS
}

/// Freshness fields added to a served snapshot.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheMetadata {
    /// Always true: the read endpoint only ever serves cached data
    pub cached: bool,
    pub stale: bool,
    /// Seconds since the snapshot was captured
    pub cache_age: i64,
    /// Seconds until the store expires the snapshot, -1 if unknown
    pub ttl: i64,
    /// Capture time, RFC 3339
    pub timestamp: String,
}

impl CacheMetadata {
    pub fn new(snapshot: &Snapshot, ttl: i64, now_ms: i64) -> Self {
        Self {
            cached: true,
            stale: is_stale(ttl),
            cache_age: snapshot.age_secs(now_ms),
            ttl,
            timestamp: snapshot.captured_at_rfc3339(),
        }
    }
}

/// Response body for GET /api/leaderboard: the payload with [`CacheMetadata`] merged in.
///
/// Object payloads keep their own fields; anything else is nested under `data`.
pub fn leaderboard_body(
    snapshot: &Snapshot,
    metadata: &CacheMetadata,
) -> serde_json::Result<Value> {
    let mut body = match serde_json::from_str::<Value>(snapshot.payload().get())? {
        Value::Object(fields) => fields,
        other => {
            let mut fields = Map::new();
            fields.insert("data".to_string(), other);
            fields
        }
    };

    if let Value::Object(meta) = serde_json::to_value(metadata)? {
        body.extend(meta);
    }
    Ok(Value::Object(body))
}

/// Response body for a successful refresh (GET|POST /api/cron/fetch-leaderboard)
#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub success: bool,
    /// e.g. "Cached 42 entries"
    pub message: String,
    /// Completion time, RFC 3339
    pub timestamp: String,
}

impl From<&RefreshReport> for RefreshResponse {
    fn from(report: &RefreshReport) -> Self {
        Self {
            success: true,
            message: report.message(),
            timestamp: report.completed_at_rfc3339(),
        }
    }
}

/// Response body for the health endpoint (GET /health)
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    /// Health status (e.g., "healthy")
    pub status: String,
    /// Current timestamp in ISO 8601 format
    pub timestamp: String,
}

impl HealthResponse {
    /// Creates a new HealthResponse with current timestamp
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Error response body for all error conditions
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
    /// Short error label
    pub error: String,
    /// Longer explanation, when there is one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
        }
    }

    pub fn with_message(error: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: Some(message.into()),
        }
    }
}
