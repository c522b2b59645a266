//! Upstash Store Module
//!
//! [`Store`] backed by an Upstash Redis database through its REST interface:
//! each command is a JSON array POSTed to the database URL with a bearer token,
//! answered by `{"result": ...}` or `{"error": "..."}`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::store::Store;
use crate::error::{StoreError, StoreResult};

/// Keys requested per `SCAN` round trip.
const SCAN_BATCH: &str = "100";

#[derive(Debug, Deserialize)]
struct UpstashReply {
    #[serde(default)]
    result: Option<Value>,
    #[serde(default)]
    error: Option<String>,
}

// == Upstash Store ==
/// REST client for a single Upstash database.
#[derive(Debug, Clone)]
pub struct UpstashStore {
    http_client: Client,
    url: String,
    token: String,
}

impl UpstashStore {
    /// Creates a client for the database at `url`.
    ///
    /// `timeout` bounds every command round trip.
    pub fn new(
        url: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
    ) -> StoreResult<Self> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            url: url.into().trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn command(&self, args: &[&str]) -> StoreResult<Value> {
        debug!(command = args.first().copied().unwrap_or_default(), "upstash command");

        let response = self
            .http_client
            .post(&self.url)
            .bearer_auth(&self.token)
            .json(args)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        match serde_json::from_str::<UpstashReply>(&body) {
            Ok(UpstashReply {
                error: Some(error), ..
            }) => Err(StoreError::Command(error)),
            _ if !status.is_success() => {
                Err(StoreError::Unavailable(format!("{status}: {body}")))
            }
            Ok(reply) => Ok(reply.result.unwrap_or(Value::Null)),
            Err(err) => Err(StoreError::Command(format!("malformed reply: {err}"))),
        }
    }
}

fn expect_integer(value: Value) -> StoreResult<i64> {
    value
        .as_i64()
        .ok_or_else(|| StoreError::Command(format!("expected integer reply, got {value}")))
}

fn parse_scan_reply(value: Value) -> StoreResult<(String, Vec<String>)> {
    let malformed = || StoreError::Command("malformed SCAN reply".to_string());

    let Value::Array(mut parts) = value else {
        return Err(malformed());
    };
    if parts.len() != 2 {
        return Err(malformed());
    }
    let keys = match parts.pop() {
        Some(Value::Array(keys)) => keys
            .into_iter()
            .map(|key| match key {
                Value::String(key) => Ok(key),
                _ => Err(malformed()),
            })
            .collect::<StoreResult<Vec<_>>>()?,
        _ => return Err(malformed()),
    };
    let cursor = match parts.pop() {
        Some(Value::String(cursor)) => cursor,
        Some(Value::Number(cursor)) => cursor.to_string(),
        _ => return Err(malformed()),
    };
    Ok((cursor, keys))
}

#[async_trait]
impl Store for UpstashStore {
    fn backend_name(&self) -> &'static str {
        "upstash"
    }

    async fn set_ex(&self, key: &str, value: &str, ttl_secs: u64) -> StoreResult<()> {
        let ttl = ttl_secs.to_string();
        self.command(&["SET", key, value, "EX", &ttl]).await?;
        Ok(())
    }

    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.command(&["GET", key]).await? {
            Value::Null => Ok(None),
            Value::String(value) => Ok(Some(value)),
            other => Err(StoreError::Command(format!("expected string reply, got {other}"))),
        }
    }

    async fn exists(&self, key: &str) -> StoreResult<bool> {
        let count = expect_integer(self.command(&["EXISTS", key]).await?)?;
        Ok(count == 1)
    }

    async fn ttl(&self, key: &str) -> StoreResult<i64> {
        expect_integer(self.command(&["TTL", key]).await?)
    }

    async fn expire(&self, key: &str, secs: u64) -> StoreResult<bool> {
        let secs = secs.to_string();
        let updated = expect_integer(self.command(&["EXPIRE", key, &secs]).await?)?;
        Ok(updated == 1)
    }

    async fn delete(&self, keys: &[String]) -> StoreResult<u64> {
        if keys.is_empty() {
            return Ok(0);
        }

        let mut args = Vec::with_capacity(keys.len() + 1);
        args.push("DEL");
        args.extend(keys.iter().map(String::as_str));

        let removed = expect_integer(self.command(&args).await?)?;
        Ok(removed.max(0) as u64)
    }

    async fn scan_prefix(&self, prefix: &str) -> StoreResult<Vec<String>> {
        let pattern = format!("{prefix}*");
        let mut cursor = "0".to_string();
        let mut keys = Vec::new();

        loop {
            let reply = self
                .command(&["SCAN", &cursor, "MATCH", &pattern, "COUNT", SCAN_BATCH])
                .await?;
            let (next, batch) = parse_scan_reply(reply)?;
            keys.extend(batch);

            if next == "0" {
                break;
            }
            cursor = next;
        }

        keys.sort();
        keys.dedup();
        Ok(keys)
    }
}
