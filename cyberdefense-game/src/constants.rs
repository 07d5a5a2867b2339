//! Centralized tuning constants and fixed labels for match logic.
//!
//! Keeping these together means the scoring rules can only be adjusted via
//! code changes reviewed in version control.

// Match shape --------------------------------------------------------------
/// Number of scenarios in the fixed catalog.
pub const POOL_SIZE: usize = 10;
/// Default number of turns in one match (the whole pool, shuffled).
pub const DEFAULT_MATCH_LENGTH: usize = 10;
/// Inclusive defender score at which a player is rated "Cyber Aware".
pub const AWARE_THRESHOLD: u32 = 7;

// Outcome labels -----------------------------------------------------------
pub const ATTACKER_LABEL: &str = "Attacker";
pub const DRAW_LABEL: &str = "Draw";
pub const AWARE_LABEL: &str = "Cyber Aware";
pub const LEARNER_LABEL: &str = "Cyber Learner";

// Verdict text -------------------------------------------------------------
pub(crate) const VERDICT_CORRECT_PREFIX: &str = "✅ You are correct!";
pub(crate) const VERDICT_WRONG_PREFIX: &str = "❌ Wrong! Correct:";

// Scoreboard wire ----------------------------------------------------------
pub const RESULT_PATH: &str = "/api/result";
pub const SCOREBOARD_PATH: &str = "/api/scoreboard";
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:5000";
