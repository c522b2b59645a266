//! Leaderboard Cache - a read-through cache in front of a tournament API
//!
//! Serves cached tournament standings and refreshes them on demand or on a schedule.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::signal;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use leaderboard_cache::api::{create_router, AppState};
use leaderboard_cache::cache::{LeaderboardCache, MemoryStore, Store, UpstashStore};
use leaderboard_cache::upstream::{HttpTournamentApi, TournamentApi};
use leaderboard_cache::{spawn_cleanup_task, spawn_refresh_task, Config};

/// Main entry point for the leaderboard cache server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Connect the store (Upstash when configured, in-memory otherwise)
/// 4. Build the upstream client and shared application state
/// 5. Start background tasks (memory cleanup, optional scheduled refresh)
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "leaderboard_cache=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Leaderboard Cache Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: api_host={}, tournament_id={:?}, port={}, refresh_interval={}s",
        config.api_host, config.tournament_id, config.server_port, config.refresh_interval
    );
    if config.cron_secret.is_none() {
        warn!("CRON_SECRET is not set; refresh trigger will refuse every request");
    }

    let timeout = Duration::from_secs(config.upstream_timeout);
    let mut background: Vec<JoinHandle<()>> = Vec::new();

    let store: Arc<dyn Store> = match (&config.store_url, &config.store_token) {
        (Some(url), Some(token)) => Arc::new(
            UpstashStore::new(url.as_str(), token.as_str(), timeout)
                .context("failed to build store client")?,
        ),
        _ => {
            warn!("UPSTASH_REDIS_REST_URL/TOKEN not set; using in-memory store");
            let memory = Arc::new(MemoryStore::new());
            background.push(spawn_cleanup_task(memory.clone(), config.cleanup_interval));
            memory
        }
    };
    let cache = LeaderboardCache::new(store);
    info!("Cache store initialized ({})", cache.backend_name());

    let upstream: Arc<dyn TournamentApi> = Arc::new(
        HttpTournamentApi::new(config.api_host.as_str(), timeout)
            .context("failed to build tournament API client")?,
    );

    if config.refresh_interval > 0 {
        background.push(spawn_refresh_task(
            cache.clone(),
            upstream.clone(),
            config.tournament_id.clone(),
            config.refresh_interval,
        ));
        info!("Background refresh task started");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let app = create_router(AppState::new(cache, upstream, config));

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(background))
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
///
/// On shutdown signal, aborts the background tasks and allows graceful shutdown.
async fn shutdown_signal(background: Vec<JoinHandle<()>>) {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }

    for handle in background {
        handle.abort();
    }
    warn!("Background tasks aborted");
}
