//! Configuration Module
//!
//! Handles loading and managing service configuration from environment variables.

use std::env;

/// Upstream host used when `API_HOST` is not set.
pub const DEFAULT_API_HOST: &str = "https://api.wager.com";

/// Service configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the tournament API
    pub api_host: String,
    /// Tournament refreshed by the job and served when a request names none
    pub tournament_id: Option<String>,
    /// Pre-shared secret expected in the refresh trigger's bearer header
    pub cron_secret: Option<String>,
    /// Upstash REST endpoint; the in-memory store is used when unset
    pub store_url: Option<String>,
    /// Upstash REST access token
    pub store_token: Option<String>,
    /// HTTP server port
    pub server_port: u16,
    /// In-process refresh interval in seconds, 0 = triggered externally only
    pub refresh_interval: u64,
    /// Timeout in seconds for outbound HTTP calls
    pub upstream_timeout: u64,
    /// Memory store cleanup interval in seconds
    pub cleanup_interval: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `API_HOST` - Tournament API base URL (default: https://api.wager.com)
    /// - `TOURNAMENT_ID` - Default tournament id (default: unset)
    /// - `CRON_SECRET` - Refresh trigger secret (default: unset, refresh refused)
    /// - `UPSTASH_REDIS_REST_URL` / `UPSTASH_REDIS_REST_TOKEN` - Store connection
    /// - `SERVER_PORT` - HTTP server port (default: 3000)
    /// - `REFRESH_INTERVAL` - In-process refresh interval in seconds (default: 0)
    /// - `UPSTREAM_TIMEOUT` - Outbound HTTP timeout in seconds (default: 10)
    /// - `CLEANUP_INTERVAL` - Memory store cleanup frequency in seconds (default: 1)
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Builds a Config from an arbitrary variable lookup.
    ///
    /// Blank values are treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |name: &str| {
            lookup(name)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let defaults = Self::default();

        Self {
            api_host: var("API_HOST")
                .map(|host| host.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_host),
            tournament_id: var("TOURNAMENT_ID"),
            cron_secret: var("CRON_SECRET"),
            store_url: var("UPSTASH_REDIS_REST_URL"),
            store_token: var("UPSTASH_REDIS_REST_TOKEN"),
            server_port: var("SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.server_port),
            refresh_interval: var("REFRESH_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.refresh_interval),
            upstream_timeout: var("UPSTREAM_TIMEOUT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.upstream_timeout),
            cleanup_interval: var("CLEANUP_INTERVAL")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cleanup_interval),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_host: DEFAULT_API_HOST.to_string(),
            tournament_id: None,
            cron_secret: None,
            store_url: None,
            store_token: None,
            server_port: 3000,
            refresh_interval: 0,
            upstream_timeout: 10,
            cleanup_interval: 1,
        }
    }
}
