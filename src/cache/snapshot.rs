//! Snapshot Module
//!
//! One captured copy of a tournament's standings.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use serde_json::value::RawValue;

use crate::cache::entry::current_timestamp_ms;

// == Snapshot ==
/// Immutable standings capture.
///
/// The payload is kept exactly as upstream sent it; nothing here looks inside.
/// Serialized as `{"data": <payload>, "timestamp": <ms>, "tournamentId": "<id>"}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    #[serde(rename = "data")]
    payload: Box<RawValue>,
    #[serde(rename = "timestamp")]
    captured_at: i64,
    #[serde(rename = "tournamentId")]
    tournament_id: String,
}

impl Snapshot {
    /// Captures `payload` for `tournament_id` at the current time.
    pub fn capture(tournament_id: impl Into<String>, payload: &RawValue) -> Self {
        Self {
            payload: payload.to_owned(),
            captured_at: current_timestamp_ms(),
            tournament_id: tournament_id.into(),
        }
    }

    pub fn tournament_id(&self) -> &str {
        &self.tournament_id
    }

    /// Upstream body, untouched.
    pub fn payload(&self) -> &RawValue {
        &self.payload
    }

    /// Capture time in Unix milliseconds.
    pub fn captured_at(&self) -> i64 {
        self.captured_at
    }

    /// Whole seconds elapsed between capture and `now_ms`, never negative.
    pub fn age_secs(&self, now_ms: i64) -> i64 {
        (now_ms - self.captured_at).max(0) / 1000
    }

    /// Capture time as an RFC 3339 string with millisecond precision.
    pub fn captured_at_rfc3339(&self) -> String {
        DateTime::<Utc>::from_timestamp_millis(self.captured_at)
            .unwrap_or_default()
            .to_rfc3339_opts(SecondsFormat::Millis, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(json: &str) -> Box<RawValue> {
        RawValue::from_string(json.to_string()).unwrap()
    }

    #[test]
    fn test_capture_sets_timestamp() {
        let before = current_timestamp_ms();
        let snapshot = Snapshot::capture("121134", &raw(r#"{"data":[]}"#));
        let after = current_timestamp_ms();

        assert_eq!(snapshot.tournament_id(), "121134");
        assert!(snapshot.captured_at() >= before && snapshot.captured_at() <= after);
    }

    #[test]
    fn test_serialized_layout() {
        let snapshot = Snapshot {
            payload: raw(r#"{"data":[{"rank":1}]}"#),
            captured_at: 1_700_000_000_000,
            tournament_id: "42".to_string(),
        };

        let json = serde_json::to_string(&snapshot).unwrap();
        assert_eq!(
            json,
            r#"{"data":{"data":[{"rank":1}]},"timestamp":1700000000000,"tournamentId":"42"}"#
        );

        let back: Snapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back.payload().get(), r#"{"data":[{"rank":1}]}"#);
        assert_eq!(back.captured_at(), 1_700_000_000_000);
    }

    #[test]
    fn test_age_secs_floors_and_clamps() {
        let snapshot = Snapshot {
            payload: raw("{}"),
            captured_at: 10_000,
            tournament_id: "t".to_string(),
        };

        assert_eq!(snapshot.age_secs(10_999), 0);
        assert_eq!(snapshot.age_secs(12_500), 2);
        assert_eq!(snapshot.age_secs(5_000), 0);
    }

    #[test]
    fn test_captured_at_rfc3339() {
        let snapshot = Snapshot {
            payload: raw("{}"),
            captured_at: 1_700_000_000_123,
            tournament_id: "t".to_string(),
        };

        assert_eq!(snapshot.captured_at_rfc3339(), "2023-11-14T22:13:20.123Z");
    }
}
