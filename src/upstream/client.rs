//! Tournament API Client
//!
//! Fetches leaderboard standings from the upstream tournament API.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{header, Client};
use serde_json::value::RawValue;
use tracing::debug;

use crate::error::UpstreamError;

/// Entries requested per leaderboard page.
pub const PAGE_SIZE: u32 = 100;

enum Endpoint<'a> {
    Leaderboard(&'a str),
}

impl fmt::Display for Endpoint<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Endpoint::Leaderboard(tournament_id) => write!(
                f,
                "/player/api/v1/tournaments/{}/leaderboard?per_page={}&include_me=true",
                tournament_id, PAGE_SIZE
            ),
        }
    }
}

/// Source of leaderboard standings.
#[async_trait]
pub trait TournamentApi: Send + Sync + 'static {
    /// One page of standings for `tournament_id`, as the raw JSON body upstream sent.
    async fn fetch_leaderboard(&self, tournament_id: &str)
        -> Result<Box<RawValue>, UpstreamError>;
}

// == HTTP Client ==
/// [`TournamentApi`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTournamentApi {
    http_client: Client,
    base_url: String,
}

impl HttpTournamentApi {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UpstreamError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, endpoint: &Endpoint) -> String {
        format!("{}{}", self.base_url, endpoint)
    }
}

#[async_trait]
impl TournamentApi for HttpTournamentApi {
    async fn fetch_leaderboard(
        &self,
        tournament_id: &str,
    ) -> Result<Box<RawValue>, UpstreamError> {
        let url = self.url(&Endpoint::Leaderboard(tournament_id));
        debug!(%url, "fetching leaderboard");

        let response = self
            .http_client
            .get(&url)
            .header(header::ACCEPT, "application/json")
            .header(header::CONTENT_TYPE, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or_default().to_string(),
            });
        }

        let body = response.text().await?;
        RawValue::from_string(body).map_err(|err| UpstreamError::InvalidPayload(err.to_string()))
    }
}
