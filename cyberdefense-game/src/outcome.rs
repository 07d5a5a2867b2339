//! Final match result: winner and awareness classification.
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::{ATTACKER_LABEL, AWARE_LABEL, AWARE_THRESHOLD, DRAW_LABEL, LEARNER_LABEL};

/// Two-tier proficiency rating derived from the final defender score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AwarenessLevel {
    #[serde(rename = "Cyber Aware")]
    CyberAware,
    #[serde(rename = "Cyber Learner")]
    CyberLearner,
}

impl AwarenessLevel {
    /// Classify a defender score; `threshold` is inclusive.
    #[must_use]
    pub const fn classify(defender_score: u32, threshold: u32) -> Self {
        if defender_score >= threshold {
            Self::CyberAware
        } else {
            Self::CyberLearner
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::CyberAware => AWARE_LABEL,
            Self::CyberLearner => LEARNER_LABEL,
        }
    }
}

impl fmt::Display for AwarenessLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Who took the match.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Winner {
    Player(String),
    Attacker,
    Draw,
}

impl Winner {
    #[must_use]
    pub fn decide(player_name: &str, defender_score: u32, attacker_score: u32) -> Self {
        match defender_score.cmp(&attacker_score) {
            std::cmp::Ordering::Greater => Self::Player(player_name.to_string()),
            std::cmp::Ordering::Less => Self::Attacker,
            std::cmp::Ordering::Equal => Self::Draw,
        }
    }

    /// Label as shown on the scoreboard: the player's name, "Attacker" or "Draw".
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Player(name) => name,
            Self::Attacker => ATTACKER_LABEL,
            Self::Draw => DRAW_LABEL,
        }
    }
}

impl fmt::Display for Winner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Immutable summary computed once, when the last turn is advanced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub winner: Winner,
    pub awareness_level: AwarenessLevel,
    pub defender_score: u32,
    pub attacker_score: u32,
    pub elapsed_seconds: u64,
}

impl Outcome {
    #[must_use]
    pub fn winner_label(&self) -> &str {
        self.winner.label()
    }

    #[must_use]
    pub const fn player_won(&self) -> bool {
        matches!(self.winner, Winner::Player(_))
    }
}

/// Pure function of the final scores, elapsed time and player name.
#[must_use]
pub fn resolve(
    player_name: &str,
    defender_score: u32,
    attacker_score: u32,
    elapsed_seconds: u64,
) -> Outcome {
    resolve_with_threshold(
        player_name,
        defender_score,
        attacker_score,
        elapsed_seconds,
        AWARE_THRESHOLD,
    )
}

#[must_use]
pub fn resolve_with_threshold(
    player_name: &str,
    defender_score: u32,
    attacker_score: u32,
    elapsed_seconds: u64,
    aware_threshold: u32,
) -> Outcome {
    Outcome {
        winner: Winner::decide(player_name, defender_score, attacker_score),
        awareness_level: AwarenessLevel::classify(defender_score, aware_threshold),
        defender_score,
        attacker_score,
        elapsed_seconds,
    }
}
