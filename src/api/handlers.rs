//! API Handlers
//!
//! HTTP request handlers for the leaderboard endpoints.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use serde_json::Value;
use tracing::{error, warn};

use crate::cache::{current_timestamp_ms, LeaderboardCache};
use crate::config::Config;
use crate::error::{Result, ServiceError};
use crate::models::{
    leaderboard_body, CacheMetadata, HealthResponse, LeaderboardQuery, RefreshResponse,
};
use crate::tasks::refresh_leaderboard;
use crate::upstream::TournamentApi;

/// Application state shared across all handlers.
///
/// Built once at startup; every field is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    /// Snapshot cache over the configured store
    pub cache: LeaderboardCache,
    /// Tournament API, only ever called by the refresh job
    pub upstream: Arc<dyn TournamentApi>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(
        cache: LeaderboardCache,
        upstream: Arc<dyn TournamentApi>,
        config: Config,
    ) -> Self {
        Self {
            cache,
            upstream,
            config: Arc::new(config),
        }
    }
}

/// Checks the `Authorization: Bearer <secret>` header against the configured secret.
///
/// With no secret configured nothing is authorized.
fn authorize(headers: &HeaderMap, secret: Option<&str>) -> Result<()> {
    let Some(secret) = secret else {
        warn!("refresh trigger refused: no CRON_SECRET configured");
        return Err(ServiceError::Unauthorized);
    };

    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match token {
        Some(token) if token == secret => Ok(()),
        _ => Err(ServiceError::Unauthorized),
    }
}

/// Handler for GET|POST /api/cron/fetch-leaderboard
///
/// Runs the refresh job for the configured tournament. Scheduler-facing.
pub async fn refresh_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<RefreshResponse>> {
    authorize(&headers, state.config.cron_secret.as_deref())?;

    let report = refresh_leaderboard(
        &state.cache,
        state.upstream.as_ref(),
        state.config.tournament_id.as_deref(),
    )
    .await
    .inspect_err(|err| error!(error = %err, "leaderboard refresh failed"))?;

    Ok(Json(RefreshResponse::from(&report)))
}

/// Handler for GET /api/leaderboard
///
/// Serves the cached snapshot with freshness metadata. Never calls upstream
/// and never touches the entry's expiry.
pub async fn leaderboard_handler(
    State(state): State<AppState>,
    Query(query): Query<LeaderboardQuery>,
) -> Result<Json<Value>> {
    let tournament_id = query
        .resolve(state.config.tournament_id.as_deref())
        .ok_or(ServiceError::TournamentIdRequired)?;

    let snapshot = state
        .cache
        .get(tournament_id)
        .await
        .ok_or(ServiceError::NotCached)?;
    let ttl = state.cache.ttl(tournament_id).await;

    let metadata = CacheMetadata::new(&snapshot, ttl, current_timestamp_ms());
    let body = leaderboard_body(&snapshot, &metadata)
        .map_err(|err| ServiceError::Internal(err.to_string()))?;

    Ok(Json(body))
}

/// Fallback for any method the read endpoint does not serve.
pub async fn method_not_allowed_handler() -> ServiceError {
    ServiceError::MethodNotAllowed
}

/// Handler for GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::healthy())
}
