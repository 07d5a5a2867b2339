//! Cybersecurity Defense Game engine
//!
//! Platform-agnostic core for the attacker/defender quiz: a fixed scenario
//! catalog, per-match shuffled decks, the turn-scoring state machine, outcome
//! resolution and the hand-off to a remote scoreboard.
//! This crate provides all game mechanics without UI or transport dependencies.

pub mod action;
pub mod clock;
pub mod config;
pub mod constants;
pub mod deck;
pub mod engine;
pub mod error;
pub mod outcome;
pub mod report;
pub mod scenario;

// Re-export commonly used types
pub use action::DefenderAction;
#[cfg(feature = "async")]
pub use clock::MatchTicker;
pub use clock::MatchClock;
pub use config::MatchConfig;
pub use deck::{Deck, build_deck};
pub use engine::{Advance, MatchState, TurnEngine, TurnPhase, Verdict};
pub use error::{GameError, ScoreboardError};
pub use outcome::{AwarenessLevel, Outcome, Winner, resolve, resolve_with_threshold};
pub use report::{
    ReportResult, ResultReporter, ResultSubmission, ScoreboardClient, ScoreboardEntry,
};
pub use scenario::{Scenario, ScenarioPool, catalog};

use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;

/// Main game engine: starts matches and reports their outcomes.
pub struct GameEngine<C>
where
    C: ScoreboardClient,
{
    pool: ScenarioPool,
    config: MatchConfig,
    reporter: ResultReporter<C>,
}

impl<C> GameEngine<C>
where
    C: ScoreboardClient,
{
    /// Engine over the built-in catalog with default match settings.
    pub fn new(client: C) -> Self {
        Self {
            pool: catalog().clone(),
            config: MatchConfig::default(),
            reporter: ResultReporter::new(client),
        }
    }

    /// Engine over a custom pool and configuration.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if `config` does not fit `pool`.
    pub fn with_config(pool: ScenarioPool, config: MatchConfig, client: C) -> Result<Self, GameError> {
        config.validate(pool.len())?;
        Ok(Self {
            pool,
            config,
            reporter: ResultReporter::new(client),
        })
    }

    #[must_use]
    pub const fn pool(&self) -> &ScenarioPool {
        &self.pool
    }

    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Start a reproducible match.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the player name is blank.
    pub fn create_match(&self, player_name: &str, seed: u64) -> Result<TurnEngine, GameError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        TurnEngine::new(player_name, &self.pool, self.config, &mut rng)
    }

    /// Start a match shuffled from system entropy.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the player name is blank.
    pub fn create_random_match(&self, player_name: &str) -> Result<TurnEngine, GameError> {
        let mut rng = ChaCha20Rng::from_entropy();
        TurnEngine::new(player_name, &self.pool, self.config, &mut rng)
    }

    /// Report a completed match. Returns `None` while the match is still running.
    pub async fn finish(&self, engine: &TurnEngine) -> Option<ReportResult> {
        let outcome = engine.outcome()?.clone();
        Some(self.reporter.report(outcome, engine.player_name()).await)
    }

    /// Recent scoreboard rows; empty when the scoreboard is unreachable.
    pub async fn history(&self) -> Vec<ScoreboardEntry> {
        self.reporter.fetch_history().await
    }
}
