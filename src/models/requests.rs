//! Request DTOs for the leaderboard API
//!
//! Defines the structure of incoming query strings.

use serde::Deserialize;

/// Query string for the read endpoint (GET /api/leaderboard)
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LeaderboardQuery {
    /// Tournament to read; the configured default is used when absent
    #[serde(default, rename = "tournamentId")]
    pub tournament_id: Option<String>,
}

impl LeaderboardQuery {
    /// Picks the requested tournament, falling back to `default`.
    ///
    /// Blank values count as absent.
    pub fn resolve<'a>(&'a self, default: Option<&'a str>) -> Option<&'a str> {
        self.tournament_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .or_else(|| default.filter(|id| !id.is_empty()))
    }
}
