//! Error taxonomy for match construction and turn handling.
use thiserror::Error;

/// Errors raised by the turn engine and its configuration.
///
/// All variants are caller mistakes: none of them mutate match state.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("match length {match_length} exceeds scenario pool size {pool_size}")]
    MatchTooLong {
        match_length: usize,
        pool_size: usize,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),
    #[error("'{0}' is not one of the defender actions")]
    InvalidChoice(String),
    #[error("cannot advance before a choice is recorded for turn {turn}")]
    PrematureAdvance { turn: usize },
    #[error("match already completed")]
    MatchCompleted,
}

impl GameError {
    /// True for the configuration family that must prevent a match from starting.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::MatchTooLong { .. } | Self::InvalidConfiguration(_)
        )
    }
}

/// Failures talking to the remote scoreboard. Never fatal to a match.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ScoreboardError {
    #[error("network error: {0}")]
    Network(String),
    #[error("scoreboard returned HTTP {0}")]
    HttpStatus(u16),
    #[error("invalid scoreboard response: {0}")]
    InvalidResponse(String),
}
