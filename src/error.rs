//! Error types for the leaderboard service
//!
//! Each boundary gets its own `thiserror` enum:
//! - [`StoreError`] for the key-value store (always absorbed by the cache layer)
//! - [`UpstreamError`] for the tournament API
//! - [`ServiceError`] for everything that reaches an HTTP caller

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

use crate::models::ErrorResponse;

// == Store Error ==
/// Failure talking to the backing key-value store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Store could not be reached (connection, timeout, non-2xx transport status)
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Store answered, but with an error or a reply we could not understand
    #[error("store command failed: {0}")]
    Command(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(error: reqwest::Error) -> Self {
        StoreError::Unavailable(error.to_string())
    }
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

// == Upstream Error ==
/// Failure fetching standings from the tournament API.
#[derive(Error, Debug)]
pub enum UpstreamError {
    /// Upstream replied with a non-success status
    #[error("Failed to fetch leaderboard: {status} {reason}")]
    Status { status: u16, reason: String },

    /// Request never completed (DNS, connect, timeout, body read)
    #[error("Failed to fetch leaderboard: {0}")]
    Network(#[from] reqwest::Error),

    /// Upstream replied 2xx but the body is not JSON
    #[error("Upstream returned an invalid payload: {0}")]
    InvalidPayload(String),
}

// == Service Error ==
/// Unified error type for the HTTP-facing handlers.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Refresh trigger presented a missing or wrong bearer secret
    #[error("Unauthorized")]
    Unauthorized,

    /// Refresh job has no tournament id to fetch
    #[error("No tournament ID configured")]
    NoTournamentConfigured,

    /// Read request carried no tournament id and there is no default
    #[error("Tournament ID required")]
    TournamentIdRequired,

    /// Nothing cached under the requested tournament id
    #[error("No cached data available")]
    NotCached,

    /// Method other than GET/OPTIONS on the read endpoint
    #[error("Method not allowed")]
    MethodNotAllowed,

    /// Refresh job could not obtain fresh standings
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// Anything else
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ServiceError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized => StatusCode::UNAUTHORIZED,
            ServiceError::NoTournamentConfigured | ServiceError::TournamentIdRequired => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotCached => StatusCode::NOT_FOUND,
            ServiceError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ServiceError::Upstream(_) | ServiceError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

// == IntoResponse Implementation ==
impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let body = match &self {
            ServiceError::NotCached => ErrorResponse::with_message(
                self.to_string(),
                "Leaderboard data not yet cached. Cron job may not have run yet.",
            ),
            ServiceError::Upstream(err) => {
                ErrorResponse::with_message("Failed to fetch leaderboard", err.to_string())
            }
            ServiceError::Internal(msg) => {
                ErrorResponse::with_message("Internal server error", msg.clone())
            }
            _ => ErrorResponse::new(self.to_string()),
        };

        (status, Json(body)).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the HTTP handlers.
pub type Result<T> = std::result::Result<T, ServiceError>;
