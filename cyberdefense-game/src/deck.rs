//! Shuffled, length-bounded scenario sequence for one match.
use rand::Rng;

use crate::error::GameError;
use crate::scenario::{Scenario, ScenarioPool};

/// Ordered scenarios for a single match. Immutable once built.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Deck {
    scenarios: Vec<Scenario>,
}

impl Deck {
    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Scenario> {
        self.scenarios.get(index)
    }

    #[must_use]
    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }
}

/// Uniformly permute `pool` and keep the first `match_length` scenarios.
///
/// The pool itself is left untouched; the shuffle runs on a copy.
///
/// # Errors
///
/// Returns `GameError::MatchTooLong` if `match_length` exceeds the pool size.
pub fn build_deck<R>(pool: &ScenarioPool, match_length: usize, rng: &mut R) -> Result<Deck, GameError>
where
    R: Rng + ?Sized,
{
    if match_length > pool.len() {
        return Err(GameError::MatchTooLong {
            match_length,
            pool_size: pool.len(),
        });
    }

    let mut scenarios = pool.all().to_vec();
    fisher_yates(&mut scenarios, rng);
    scenarios.truncate(match_length);
    Ok(Deck { scenarios })
}

fn fisher_yates<T, R>(items: &mut [T], rng: &mut R)
where
    R: Rng + ?Sized,
{
    for i in (1..items.len()).rev() {
        let j = rng.gen_range(0..=i);
        items.swap(i, j);
    }
}
