use anyhow::{Result, bail, ensure};
use colored::Colorize;
use cyberdefense_game::{
    Advance, GameError, MatchConfig, Outcome, ScenarioPool, TurnEngine, TurnPhase,
    resolve_with_threshold,
};
use rand::SeedableRng;
use rand_chacha::ChaCha20Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::{Duration, Instant};

use super::policy::PlayerStrategy;

const QA_PLAYER: &str = "qa-bot";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunResult {
    pub strategy_name: String,
    pub seed: u64,
    pub passed: bool,
    pub iterations_run: usize,
    pub successful_iterations: usize,
    pub failures: Vec<String>,
    pub mean_defender_score: f64,
    #[serde(with = "duration_serde")]
    pub average_duration: Duration,
}

/// Everything observed while one automated match was played.
#[derive(Debug, Clone)]
pub struct MatchSummary {
    pub outcome: Outcome,
    pub log: Vec<String>,
}

pub struct LogicTester {
    pool: ScenarioPool,
    config: MatchConfig,
    verbose: bool,
}

impl LogicTester {
    pub fn new(pool: ScenarioPool, config: MatchConfig, verbose: bool) -> Self {
        Self {
            pool,
            config,
            verbose,
        }
    }

    pub fn run_strategy(
        &self,
        strategy: PlayerStrategy,
        seeds: &[u64],
        iterations: usize,
    ) -> Vec<RunResult> {
        seeds
            .iter()
            .map(|&seed| {
                if self.verbose {
                    println!(
                        "🧪 Testing strategy: {} (seed: {seed})",
                        strategy.label().bright_white()
                    );
                }
                self.run_single(strategy, seed, iterations)
            })
            .collect()
    }

    fn run_single(&self, strategy: PlayerStrategy, seed: u64, iterations: usize) -> RunResult {
        let mut successes = 0;
        let mut failures = Vec::new();
        let mut durations = Vec::new();
        let mut defender_total = 0_u64;

        for i in 0..iterations {
            let start_time = Instant::now();
            let iteration_seed = seed.wrapping_add(u64::try_from(i).unwrap_or(u64::MAX));

            match self.play_match(strategy, iteration_seed) {
                Ok(summary) => {
                    successes += 1;
                    defender_total += u64::from(summary.outcome.defender_score);
                    let duration = start_time.elapsed();
                    durations.push(duration);
                    if self.verbose {
                        println!(
                            "  ✅ Iteration {}/{iterations} passed ({duration:?}) D:{}/A:{} winner:{}",
                            i + 1,
                            summary.outcome.defender_score,
                            summary.outcome.attacker_score,
                            summary.outcome.winner_label()
                        );
                        if let Some(last) = summary.log.last() {
                            println!("     ↳ {last}");
                        }
                    }
                }
                Err(err) => {
                    let message = format!(
                        "Iteration {} (strategy {strategy}, seed {iteration_seed}): {err:#}",
                        i + 1
                    );
                    if self.verbose {
                        println!("  ❌ {}", message.clone().red());
                    }
                    failures.push(message);
                }
            }
        }

        let average_duration = if durations.is_empty() {
            Duration::ZERO
        } else {
            durations.iter().sum::<Duration>() / u32::try_from(durations.len()).unwrap_or(1)
        };
        #[allow(clippy::cast_precision_loss)]
        let mean_defender_score = if successes == 0 {
            0.0
        } else {
            defender_total as f64 / successes as f64
        };

        RunResult {
            strategy_name: strategy.label().to_string(),
            seed,
            passed: failures.is_empty(),
            iterations_run: iterations,
            successful_iterations: successes,
            failures,
            mean_defender_score,
            average_duration,
        }
    }

    /// Play one match to completion, checking engine invariants along the way.
    pub fn play_match(&self, strategy: PlayerStrategy, seed: u64) -> Result<MatchSummary> {
        let mut rng = ChaCha20Rng::seed_from_u64(seed);
        let mut engine = TurnEngine::new(QA_PLAYER, &self.pool, self.config, &mut rng)?;
        let mut policy = strategy.create_policy(seed);

        check_deck(&engine, self.config.match_length)?;

        let before = engine.state().clone();
        match engine.advance() {
            Err(GameError::PrematureAdvance { .. }) => {}
            other => bail!("advance before any choice returned {other:?}"),
        }
        ensure!(engine.state() == &before, "premature advance changed state");

        let outcome = loop {
            let Some(scenario) = engine.current_scenario().cloned() else {
                bail!("turn {} has no scenario", engine.turn_number());
            };
            let action = policy.pick_action(&scenario);
            log::debug!(
                "{} picks {action} against {}",
                policy.name(),
                scenario.attacker
            );
            let verdict = engine
                .record_choice(action)
                .ok_or_else(|| anyhow::anyhow!("turn {} refused a choice", engine.turn_number()))?;
            ensure!(
                verdict.correct == (action == scenario.defender),
                "verdict disagrees with scenario answer on turn {}",
                verdict.turn
            );

            let scored = engine.state().clone();
            ensure!(
                engine.record_choice(action).is_none() && engine.state() == &scored,
                "second choice on turn {} was scored",
                verdict.turn
            );
            ensure!(
                scored.turns_scored() as usize == scored.turn_index() + 1,
                "score sum {} does not match turn {}",
                scored.turns_scored(),
                verdict.turn
            );

            match engine.advance()? {
                Advance::NextTurn { .. } => {
                    ensure!(
                        engine.phase() == TurnPhase::AwaitingChoice,
                        "advance did not clear the verdict"
                    );
                }
                Advance::Completed(outcome) => break outcome,
            }
        };

        check_outcome(&engine, &outcome, strategy)?;
        ensure!(
            matches!(engine.advance(), Err(GameError::MatchCompleted)),
            "completed match accepted another advance"
        );

        Ok(MatchSummary {
            outcome,
            log: engine.log().to_vec(),
        })
    }
}

fn check_deck(engine: &TurnEngine, match_length: usize) -> Result<()> {
    let deck = engine.state().deck();
    ensure!(
        deck.len() == match_length,
        "deck has {} scenarios, expected {match_length}",
        deck.len()
    );
    let unique: HashSet<&str> = deck.scenarios().iter().map(|s| s.attacker.as_str()).collect();
    ensure!(unique.len() == deck.len(), "deck repeats a scenario");
    Ok(())
}

fn check_outcome(engine: &TurnEngine, outcome: &Outcome, strategy: PlayerStrategy) -> Result<()> {
    let turns = u32::try_from(engine.total_turns())?;
    ensure!(
        outcome.defender_score + outcome.attacker_score == turns,
        "final scores D:{}/A:{} do not add up to {turns} turns",
        outcome.defender_score,
        outcome.attacker_score
    );
    let expected = resolve_with_threshold(
        engine.player_name(),
        outcome.defender_score,
        outcome.attacker_score,
        outcome.elapsed_seconds,
        engine.config().aware_threshold,
    );
    ensure!(&expected == outcome, "outcome is not a function of final scores");
    ensure!(
        engine.log().len() == engine.total_turns(),
        "log has {} entries for {turns} turns",
        engine.log().len()
    );
    if let Some(score) = strategy.expected_defender_score(turns) {
        ensure!(
            outcome.defender_score == score,
            "{strategy} scored {} instead of {score}",
            outcome.defender_score
        );
    }
    Ok(())
}

mod duration_serde {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        duration.as_millis().serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let millis = u128::deserialize(deserializer)?;
        Ok(Duration::from_millis(u64::try_from(millis).unwrap_or(0)))
    }
}
