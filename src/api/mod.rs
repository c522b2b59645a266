//! API Module
//!
//! HTTP handlers and routing for the leaderboard service.
//!
//! # Endpoints
//! - `GET /api/leaderboard` - Cached standings with freshness metadata
//! - `GET|POST /api/cron/fetch-leaderboard` - Authenticated refresh trigger
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
