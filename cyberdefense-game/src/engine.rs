//! Turn engine: walks a shuffled deck one player decision at a time.
//!
//! Phases run `AwaitingChoice -> ShowingVerdict -> AwaitingChoice ...` until
//! the verdict on the last turn is advanced, which moves the match to
//! `Completed` and resolves the [`Outcome`] exactly once.
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};

use crate::action::DefenderAction;
use crate::clock::MatchClock;
use crate::config::MatchConfig;
use crate::constants::{VERDICT_CORRECT_PREFIX, VERDICT_WRONG_PREFIX};
use crate::deck::{Deck, build_deck};
use crate::error::GameError;
use crate::outcome::{Outcome, resolve_with_threshold};
use crate::scenario::{Scenario, ScenarioPool, catalog};

/// Where the match currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TurnPhase {
    AwaitingChoice,
    ShowingVerdict,
    Completed,
}

/// Correctness of a single turn, recorded once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    /// 1-based turn number.
    pub turn: usize,
    pub attacker: String,
    pub chosen: DefenderAction,
    pub expected: DefenderAction,
    pub correct: bool,
    /// Canonical result label of the scenario, e.g. "Blocked".
    pub result: String,
}

impl Verdict {
    /// One-line feedback shown to the player.
    #[must_use]
    pub fn message(&self) -> String {
        if self.correct {
            format!("{VERDICT_CORRECT_PREFIX} {} → {}", self.chosen, self.result)
        } else {
            format!("{VERDICT_WRONG_PREFIX} {} → {}", self.expected, self.result)
        }
    }
}

/// What an `advance` call did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Advance {
    NextTurn { turn_index: usize },
    Completed(Outcome),
}

/// Mutable state of one match. Read through [`TurnEngine`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    deck: Deck,
    turn_index: usize,
    defender_score: u32,
    attacker_score: u32,
    pending_verdict: Option<Verdict>,
    log: Vec<String>,
    elapsed_seconds: u64,
    completed: bool,
}

impl MatchState {
    fn new(deck: Deck) -> Self {
        Self {
            deck,
            turn_index: 0,
            defender_score: 0,
            attacker_score: 0,
            pending_verdict: None,
            log: Vec::new(),
            elapsed_seconds: 0,
            completed: false,
        }
    }

    #[must_use]
    pub const fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub const fn turn_index(&self) -> usize {
        self.turn_index
    }

    #[must_use]
    pub const fn defender_score(&self) -> u32 {
        self.defender_score
    }

    #[must_use]
    pub const fn attacker_score(&self) -> u32 {
        self.attacker_score
    }

    #[must_use]
    pub const fn pending_verdict(&self) -> Option<&Verdict> {
        self.pending_verdict.as_ref()
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        &self.log
    }

    /// Elapsed seconds as sampled at the last choice, advance or tick.
    /// [`TurnEngine::elapsed_seconds`] reads the live clock instead.
    #[must_use]
    pub const fn elapsed_seconds(&self) -> u64 {
        self.elapsed_seconds
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.completed
    }

    /// Number of turns that have a recorded verdict.
    #[must_use]
    pub const fn turns_scored(&self) -> u32 {
        self.defender_score + self.attacker_score
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        if self.completed {
            TurnPhase::Completed
        } else if self.pending_verdict.is_some() {
            TurnPhase::ShowingVerdict
        } else {
            TurnPhase::AwaitingChoice
        }
    }
}

/// Owns one match: its deck, scores, log and clock.
#[derive(Debug)]
pub struct TurnEngine {
    player_name: String,
    config: MatchConfig,
    state: MatchState,
    clock: MatchClock,
    outcome: Option<Outcome>,
}

impl TurnEngine {
    /// Start a match against `pool`, shuffling with `rng`.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the player name is blank or the
    /// configured match length does not fit the pool.
    pub fn new<R>(
        player_name: &str,
        pool: &ScenarioPool,
        config: MatchConfig,
        rng: &mut R,
    ) -> Result<Self, GameError>
    where
        R: Rng + ?Sized,
    {
        let player_name = player_name.trim();
        if player_name.is_empty() {
            return Err(GameError::InvalidConfiguration(
                "player name must not be blank".to_string(),
            ));
        }
        config.validate(pool.len())?;
        let deck = build_deck(pool, config.match_length, rng)?;
        log::debug!(
            "match started for {player_name} with {} turns",
            deck.len()
        );
        Ok(Self {
            player_name: player_name.to_string(),
            config,
            state: MatchState::new(deck),
            clock: MatchClock::start(),
            outcome: None,
        })
    }

    /// Reproducible match over the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the player name is blank.
    pub fn with_seed(player_name: &str, seed: u64) -> Result<Self, GameError> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        Self::new(player_name, catalog(), MatchConfig::default(), &mut rng)
    }

    /// Entropy-seeded match over the built-in catalog.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the player name is blank.
    pub fn start(player_name: &str) -> Result<Self, GameError> {
        let mut rng = ChaCha20Rng::from_entropy();
        Self::new(player_name, catalog(), MatchConfig::default(), &mut rng)
    }

    #[must_use]
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    #[must_use]
    pub const fn config(&self) -> &MatchConfig {
        &self.config
    }

    #[must_use]
    pub const fn state(&self) -> &MatchState {
        &self.state
    }

    #[must_use]
    pub const fn phase(&self) -> TurnPhase {
        self.state.phase()
    }

    /// Clock handle, e.g. to hand to a background ticker.
    #[must_use]
    pub fn clock(&self) -> MatchClock {
        self.clock.clone()
    }

    /// 1-based number of the current turn.
    #[must_use]
    pub const fn turn_number(&self) -> usize {
        self.state.turn_index + 1
    }

    #[must_use]
    pub fn total_turns(&self) -> usize {
        self.state.deck.len()
    }

    #[must_use]
    pub fn current_scenario(&self) -> Option<&Scenario> {
        if self.state.completed {
            return None;
        }
        self.state.deck.get(self.state.turn_index)
    }

    #[must_use]
    pub const fn verdict(&self) -> Option<&Verdict> {
        self.state.pending_verdict()
    }

    #[must_use]
    pub fn log(&self) -> &[String] {
        self.state.log()
    }

    /// Resolved outcome; present only once the match is completed.
    #[must_use]
    pub const fn outcome(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }

    /// Live elapsed seconds, including ticks a background ticker made since
    /// the last recorded event.
    #[must_use]
    pub fn elapsed_seconds(&self) -> u64 {
        self.state.elapsed_seconds.max(self.clock.elapsed_seconds())
    }

    /// Refresh elapsed time from the match clock.
    pub fn tick(&mut self) -> u64 {
        let secs = self.clock.tick();
        self.state.elapsed_seconds = self.state.elapsed_seconds.max(secs);
        self.state.elapsed_seconds
    }

    /// Score the player's choice for the current turn.
    ///
    /// Returns the new verdict, or `None` when the turn already has one or
    /// the match is over (the call is ignored).
    pub fn record_choice(&mut self, chosen: DefenderAction) -> Option<Verdict> {
        if self.state.phase() != TurnPhase::AwaitingChoice {
            log::debug!("ignoring {chosen}: turn {} already scored", self.turn_number());
            return None;
        }
        let scenario = self.state.deck.get(self.state.turn_index)?;
        let correct = scenario.is_answered_by(chosen);
        let verdict = Verdict {
            turn: self.state.turn_index + 1,
            attacker: scenario.attacker.clone(),
            chosen,
            expected: scenario.defender,
            correct,
            result: scenario.result.clone(),
        };

        if correct {
            self.state.defender_score += 1;
        } else {
            self.state.attacker_score += 1;
        }

        let entry = format!(
            "Turn {}: Attacker: {} | {}: {} → {} (D:{}/A:{})",
            verdict.turn,
            verdict.attacker,
            self.player_name,
            chosen,
            verdict.message(),
            self.state.defender_score,
            self.state.attacker_score,
        );
        log::debug!("{entry}");
        self.state.log.push(entry);
        self.state.pending_verdict = Some(verdict.clone());
        self.tick();
        Some(verdict)
    }

    /// Parse a raw action label and score it.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidChoice` if `label` is not one of the six
    /// defender actions; the match is left untouched.
    pub fn record_choice_label(&mut self, label: &str) -> Result<Option<Verdict>, GameError> {
        let action = label.parse::<DefenderAction>()?;
        Ok(self.record_choice(action))
    }

    /// Move past the current verdict.
    ///
    /// # Errors
    ///
    /// Returns `GameError::PrematureAdvance` if the current turn has no
    /// verdict yet and `GameError::MatchCompleted` once the match is over.
    /// Neither changes state.
    pub fn advance(&mut self) -> Result<Advance, GameError> {
        match self.state.phase() {
            TurnPhase::AwaitingChoice => {
                return Err(GameError::PrematureAdvance {
                    turn: self.turn_number(),
                });
            }
            TurnPhase::Completed => return Err(GameError::MatchCompleted),
            TurnPhase::ShowingVerdict => {}
        }

        self.state.pending_verdict = None;
        if self.state.turn_index + 1 >= self.state.deck.len() {
            return Ok(Advance::Completed(self.complete()));
        }

        self.state.turn_index += 1;
        self.tick();
        log::debug!("advanced to turn {}", self.turn_number());
        Ok(Advance::NextTurn {
            turn_index: self.state.turn_index,
        })
    }

    fn complete(&mut self) -> Outcome {
        let final_secs = self.clock.stop();
        self.state.elapsed_seconds = self.state.elapsed_seconds.max(final_secs);
        self.state.completed = true;
        let outcome = resolve_with_threshold(
            &self.player_name,
            self.state.defender_score,
            self.state.attacker_score,
            self.state.elapsed_seconds,
            self.config.aware_threshold,
        );
        log::info!(
            "match complete: winner {} ({}) D:{}/A:{} in {}s",
            outcome.winner_label(),
            outcome.awareness_level,
            outcome.defender_score,
            outcome.attacker_score,
            outcome.elapsed_seconds
        );
        self.outcome = Some(outcome.clone());
        outcome
    }
}

impl Drop for TurnEngine {
    fn drop(&mut self) {
        self.clock.stop();
    }
}
