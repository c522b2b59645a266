//! Leaderboard Refresh Job
//!
//! Pulls current standings from the tournament API and stores a fresh snapshot.
//! Runs once per trigger (the HTTP cron endpoint) or on an interval when the
//! in-process scheduler is enabled.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::IgnoredAny;
use serde::Deserialize;
use serde_json::value::RawValue;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cache::LeaderboardCache;
use crate::error::{Result, ServiceError};
use crate::upstream::TournamentApi;

/// TTL in seconds for snapshots written by the job.
pub const REFRESH_TTL: u64 = 300;

/// Outcome of a successful refresh.
#[derive(Debug, Clone)]
pub struct RefreshReport {
    pub tournament_id: String,
    /// Entries in the payload's `data` array, 0 when there is none
    pub entries: usize,
    pub completed_at: DateTime<Utc>,
}

impl RefreshReport {
    pub fn message(&self) -> String {
        format!("Cached {} entries", self.entries)
    }

    pub fn completed_at_rfc3339(&self) -> String {
        self.completed_at.to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

/// Counts top-level `data` entries without otherwise reading the payload.
fn count_entries(payload: &RawValue) -> usize {
    #[derive(Deserialize)]
    struct Entries {
        #[serde(default)]
        data: Vec<IgnoredAny>,
    }

    serde_json::from_str::<Entries>(payload.get())
        .map(|entries| entries.data.len())
        .unwrap_or(0)
}

/// Fetches standings for `tournament_id` and replaces its cached snapshot.
///
/// Fails without contacting upstream when no tournament is configured. Any
/// upstream failure is returned as-is and leaves the cache untouched.
pub async fn refresh_leaderboard(
    cache: &LeaderboardCache,
    api: &dyn TournamentApi,
    tournament_id: Option<&str>,
) -> Result<RefreshReport> {
    let tournament_id = tournament_id.ok_or(ServiceError::NoTournamentConfigured)?;

    let payload = api.fetch_leaderboard(tournament_id).await?;
    cache.set(tournament_id, &payload, REFRESH_TTL).await;

    let report = RefreshReport {
        tournament_id: tournament_id.to_string(),
        entries: count_entries(&payload),
        completed_at: Utc::now(),
    };
    info!(
        tournament_id,
        entries = report.entries,
        backend = cache.backend_name(),
        "leaderboard refreshed"
    );
    Ok(report)
}

/// Spawns a background task running [`refresh_leaderboard`] every `interval_secs`.
///
/// The first run happens immediately. Failures are logged and the next tick
/// tries again; the task never exits on its own.
///
/// # Example
/// ```ignore
/// let handle = spawn_refresh_task(cache, api, Some("121134".into()), 60);
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_refresh_task(
    cache: LeaderboardCache,
    api: Arc<dyn TournamentApi>,
    tournament_id: Option<String>,
    interval_secs: u64,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(Duration::from_secs(interval_secs.max(1)));
        info!(
            "Starting leaderboard refresh task with interval of {} seconds",
            interval_secs
        );

        loop {
            interval.tick().await;

            if let Err(err) =
                refresh_leaderboard(&cache, api.as_ref(), tournament_id.as_deref()).await
            {
                error!(error = %err, "scheduled leaderboard refresh failed");
            }
        }
    })
}
