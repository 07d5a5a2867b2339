//! HTTP transport for the remote scoreboard service.
use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDateTime;
use colored::Colorize;
use cyberdefense_game::constants::{RESULT_PATH, SCOREBOARD_PATH};
use cyberdefense_game::{ResultSubmission, ScoreboardClient, ScoreboardEntry, ScoreboardError};
use std::io::Write;
use std::time::Duration;

/// `ScoreboardClient` over `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpScoreboard {
    client: reqwest::Client,
    base_url: String,
}

impl HttpScoreboard {
    /// Build a client rooted at `base_url` (e.g. `http://127.0.0.1:5000`).
    ///
    /// # Errors
    ///
    /// Returns `ScoreboardError::Network` if the HTTP client cannot be built.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ScoreboardError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScoreboardError::Network(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
}

#[async_trait]
impl ScoreboardClient for HttpScoreboard {
    async fn submit_result(&self, submission: &ResultSubmission) -> Result<(), ScoreboardError> {
        let url = self.url(RESULT_PATH);
        log::debug!("posting match result to {url}");
        let response = self
            .client
            .post(&url)
            .json(submission)
            .send()
            .await
            .map_err(|e| ScoreboardError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScoreboardError::HttpStatus(status.as_u16()));
        }
        Ok(())
    }

    async fn fetch_scoreboard(&self) -> Result<Vec<ScoreboardEntry>, ScoreboardError> {
        let url = self.url(SCOREBOARD_PATH);
        log::debug!("fetching scoreboard from {url}");
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ScoreboardError::Network(e.to_string()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScoreboardError::HttpStatus(status.as_u16()));
        }
        response
            .json::<Vec<ScoreboardEntry>>()
            .await
            .map_err(|e| ScoreboardError::InvalidResponse(e.to_string()))
    }
}

/// Format a `created_at` stamp (naive UTC ISO-8601) for display.
pub fn format_timestamp(raw: &str) -> String {
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").map_or_else(
        |_| raw.to_string(),
        |ts| ts.format("%Y-%m-%d %H:%M:%S UTC").to_string(),
    )
}

/// Print the recent matches table.
pub fn render_history<W: Write + ?Sized>(out: &mut W, entries: &[ScoreboardEntry]) -> Result<()> {
    writeln!(out, "{}", "🏆 Recent Matches".bright_cyan().bold())?;
    if entries.is_empty() {
        writeln!(out, "No matches yet.")?;
        return Ok(());
    }
    writeln!(
        out,
        "{:<16} {:>8} {:>8} {:>8} {:<16} {:<14} {}",
        "Name", "Defender", "Attacker", "Time(s)", "Winner", "Awareness", "Timestamp (UTC)"
    )?;
    for entry in entries {
        let winner = if entry.is_player_win() {
            format!("{} 🛡", entry.winner).green().to_string()
        } else {
            entry.winner.clone()
        };
        writeln!(
            out,
            "{:<16} {:>8} {:>8} {:>8.0} {:<16} {:<14} {}",
            entry.nickname,
            entry.defender_score,
            entry.attacker_score,
            entry.time_sec,
            winner,
            entry.predicted_level,
            format_timestamp(&entry.created_at)
        )?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use cyberdefense_game::{ResultReporter, resolve};

    fn entry(nickname: &str, winner: &str) -> ScoreboardEntry {
        ScoreboardEntry {
            nickname: nickname.to_string(),
            defender_score: 7,
            attacker_score: 3,
            time_sec: 55.0,
            winner: winner.to_string(),
            predicted_level: "Cyber Aware".to_string(),
            created_at: "2025-05-04T12:30:01.250000".to_string(),
        }
    }

    #[test]
    fn timestamps_are_humanized() {
        assert_eq!(
            format_timestamp("2025-05-04T12:30:01.250000"),
            "2025-05-04 12:30:01 UTC"
        );
        assert_eq!(format_timestamp("yesterday"), "yesterday");
    }

    #[test]
    fn history_table_lists_rows() {
        let mut buf = Vec::new();
        render_history(&mut buf, &[entry("Ada", "Ada"), entry("Bob", "Attacker")]).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.contains("Recent Matches"));
        assert!(text.contains("Bob"));
        assert!(text.contains("2025-05-04 12:30:01 UTC"));
    }

    #[test]
    fn empty_history_says_so() {
        let mut buf = Vec::new();
        render_history(&mut buf, &[]).unwrap();
        assert!(String::from_utf8(buf).unwrap().contains("No matches yet."));
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let board = HttpScoreboard::new("http://127.0.0.1:5000/", Duration::from_secs(1)).unwrap();
        assert_eq!(board.url(RESULT_PATH), "http://127.0.0.1:5000/api/result");
    }

    #[tokio::test]
    async fn unreachable_scoreboard_degrades_to_local_outcome() {
        // Nothing listens on the loopback discard port.
        let board = HttpScoreboard::new("http://127.0.0.1:9", Duration::from_millis(500)).unwrap();
        let reporter = ResultReporter::new(board);
        let outcome = resolve("Ada", 8, 2, 30);
        let result = reporter.report(outcome.clone(), "Ada").await;
        assert!(!result.recorded);
        assert_eq!(result.outcome, outcome);
        assert!(reporter.fetch_history().await.is_empty());
    }
}
