//! API Routes
//!
//! Configures the Axum router with all leaderboard endpoints.

use axum::{
    http::{header, Method},
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers::{
    health_handler, leaderboard_handler, method_not_allowed_handler, refresh_handler, AppState,
};

/// Creates the main router with all endpoints configured.
///
/// # Endpoints
/// - `GET /api/leaderboard` - Cached standings, browser-facing
/// - `GET|POST /api/cron/fetch-leaderboard` - Refresh trigger, scheduler-facing
/// - `GET /health` - Health check endpoint
///
/// # Middleware
/// - CORS: open to any origin on the read endpoint only; answers preflights
/// - Tracing: Logs all requests for debugging
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    let leaderboard = get(leaderboard_handler)
        .fallback(method_not_allowed_handler)
        .layer(cors);

    Router::new()
        .route("/api/leaderboard", leaderboard)
        .route(
            "/api/cron/fetch-leaderboard",
            get(refresh_handler).post(refresh_handler),
        )
        .route("/health", get(health_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
