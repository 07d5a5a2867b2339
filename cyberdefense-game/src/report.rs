//! Hand-off of a finished match to the remote scoreboard.
//!
//! Remote failures are observed and swallowed here: a completed match is
//! never blocked or lost because the scoreboard is unavailable.
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ScoreboardError;
use crate::outcome::Outcome;

/// Body of `POST /api/result`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResultSubmission {
    pub nickname: String,
    #[serde(rename = "defenderScore")]
    pub defender_score: u32,
    #[serde(rename = "attackerScore")]
    pub attacker_score: u32,
    #[serde(rename = "timeSec")]
    pub time_sec: u64,
    pub winner: String,
    pub predicted_level: String,
}

impl ResultSubmission {
    #[must_use]
    pub fn from_outcome(outcome: &Outcome, player_name: &str) -> Self {
        Self {
            nickname: player_name.to_string(),
            defender_score: outcome.defender_score,
            attacker_score: outcome.attacker_score,
            time_sec: outcome.elapsed_seconds,
            winner: outcome.winner_label().to_string(),
            predicted_level: outcome.awareness_level.label().trim().to_string(),
        }
    }
}

/// One row of `GET /api/scoreboard`, most recent first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoreboardEntry {
    pub nickname: String,
    pub defender_score: i64,
    pub attacker_score: i64,
    pub time_sec: f64,
    pub winner: String,
    pub predicted_level: String,
    pub created_at: String,
}

impl ScoreboardEntry {
    /// Rows the player won are highlighted in match history.
    #[must_use]
    pub fn is_player_win(&self) -> bool {
        self.winner == self.nickname
    }
}

/// Capabilities consumed from the external scoreboard service.
/// Host applications provide the transport.
#[async_trait]
pub trait ScoreboardClient: Send + Sync {
    /// Record a finished match. Any 2xx means recorded.
    ///
    /// # Errors
    ///
    /// Returns a `ScoreboardError` on network failure or a non-2xx status.
    async fn submit_result(&self, submission: &ResultSubmission) -> Result<(), ScoreboardError>;

    /// Fetch recent match history.
    ///
    /// # Errors
    ///
    /// Returns a `ScoreboardError` on network failure, non-2xx status or an
    /// unreadable body.
    async fn fetch_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, ScoreboardError>;
}

/// Outcome of a report attempt. The outcome is always present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportResult {
    pub outcome: Outcome,
    pub recorded: bool,
}

/// Submits outcomes and reads history, degrading to local-only on failure.
#[derive(Debug, Clone)]
pub struct ResultReporter<C> {
    client: C,
}

impl<C> ResultReporter<C>
where
    C: ScoreboardClient,
{
    pub const fn new(client: C) -> Self {
        Self { client }
    }

    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// Single best-effort submission; no retry.
    pub async fn report(&self, outcome: Outcome, player_name: &str) -> ReportResult {
        let submission = ResultSubmission::from_outcome(&outcome, player_name);
        let recorded = match self.client.submit_result(&submission).await {
            Ok(()) => {
                log::info!("match for {} recorded on scoreboard", submission.nickname);
                true
            }
            Err(err) => {
                log::warn!("failed to save match for {}: {err}", submission.nickname);
                false
            }
        };
        ReportResult { outcome, recorded }
    }

    /// Recent history, or an empty list if the scoreboard cannot be read.
    pub async fn fetch_history(&self) -> Vec<ScoreboardEntry> {
        match self.client.fetch_scoreboard().await {
            Ok(entries) => entries,
            Err(err) => {
                log::warn!("fetch scoreboard failed: {err}");
                Vec::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::resolve;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MemoryScoreboard {
        rows: Mutex<Vec<ResultSubmission>>,
    }

    #[async_trait]
    impl ScoreboardClient for MemoryScoreboard {
        async fn submit_result(&self, submission: &ResultSubmission) -> Result<(), ScoreboardError> {
            self.rows.lock().unwrap().push(submission.clone());
            Ok(())
        }

        async fn fetch_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, ScoreboardError> {
            let rows = self.rows.lock().unwrap();
            Ok(rows
                .iter()
                .rev()
                .map(|row| ScoreboardEntry {
                    nickname: row.nickname.clone(),
                    defender_score: i64::from(row.defender_score),
                    attacker_score: i64::from(row.attacker_score),
                    time_sec: row.time_sec as f64,
                    winner: row.winner.clone(),
                    predicted_level: row.predicted_level.clone(),
                    created_at: "2025-01-01T00:00:00".to_string(),
                })
                .collect())
        }
    }

    struct OfflineScoreboard;

    #[async_trait]
    impl ScoreboardClient for OfflineScoreboard {
        async fn submit_result(&self, _: &ResultSubmission) -> Result<(), ScoreboardError> {
            Err(ScoreboardError::Network("connection refused".to_string()))
        }

        async fn fetch_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, ScoreboardError> {
            Err(ScoreboardError::HttpStatus(503))
        }
    }

    #[test]
    fn submission_uses_wire_field_names() {
        let outcome = resolve("Ada", 7, 3, 61);
        let json = serde_json::to_value(ResultSubmission::from_outcome(&outcome, "Ada")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "nickname": "Ada",
                "defenderScore": 7,
                "attackerScore": 3,
                "timeSec": 61,
                "winner": "Ada",
                "predicted_level": "Cyber Aware",
            })
        );
    }

    #[test]
    fn successful_report_is_recorded() {
        let reporter = ResultReporter::new(MemoryScoreboard::default());
        let outcome = resolve("Ada", 4, 6, 30);
        let result = tokio_test::block_on(reporter.report(outcome.clone(), "Ada"));
        assert!(result.recorded);
        assert_eq!(result.outcome, outcome);

        let history = tokio_test::block_on(reporter.fetch_history());
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].winner, "Attacker");
        assert!(!history[0].is_player_win());
    }

    #[test]
    fn failed_report_keeps_outcome_locally() {
        let reporter = ResultReporter::new(OfflineScoreboard);
        let outcome = resolve("Ada", 10, 0, 12);
        let result = tokio_test::block_on(reporter.report(outcome.clone(), "Ada"));
        assert!(!result.recorded);
        assert_eq!(result.outcome, outcome);
    }

    #[test]
    fn failed_fetch_is_empty_history() {
        let reporter = ResultReporter::new(OfflineScoreboard);
        assert!(tokio_test::block_on(reporter.fetch_history()).is_empty());
    }

    #[test]
    fn scoreboard_rows_parse_from_wire() {
        let json = r#"[{"id": 3, "nickname": "Ada", "defender_score": 8, "attacker_score": 2,
            "time_sec": 41.0, "winner": "Ada", "predicted_level": "Cyber Aware",
            "created_at": "2025-03-01T10:00:00.123456"}]"#;
        let rows: Vec<ScoreboardEntry> = serde_json::from_str(json).unwrap();
        assert!(rows[0].is_player_win());
        assert!((rows[0].time_sec - 41.0).abs() < f64::EPSILON);
    }
}
