use std::fmt;

use cyberdefense_game::{DefenderAction, Scenario};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

/// Policy interface for automated play strategies.
pub trait PlayerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Pick a defender action for the scenario on the current turn.
    fn pick_action(&mut self, scenario: &Scenario) -> DefenderAction;
}

/// Built-in player strategies for automated matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PlayerStrategy {
    AlwaysCorrect,
    AlwaysWrong,
    FirstAction,
    Random,
}

impl PlayerStrategy {
    pub const ALL: [Self; 4] = [
        Self::AlwaysCorrect,
        Self::AlwaysWrong,
        Self::FirstAction,
        Self::Random,
    ];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::AlwaysCorrect => "always-correct",
            Self::AlwaysWrong => "always-wrong",
            Self::FirstAction => "first-action",
            Self::Random => "random",
        }
    }

    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|s| s.label().eq_ignore_ascii_case(token.trim()))
    }

    /// Defender score this strategy must reach on a full catalog match, if fixed.
    #[must_use]
    pub const fn expected_defender_score(self, turns: u32) -> Option<u32> {
        match self {
            Self::AlwaysCorrect => Some(turns),
            Self::AlwaysWrong => Some(0),
            Self::FirstAction | Self::Random => None,
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn PlayerPolicy + Send> {
        match self {
            Self::AlwaysCorrect => Box::new(AlwaysCorrectPolicy),
            Self::AlwaysWrong => Box::new(AlwaysWrongPolicy),
            Self::FirstAction => Box::new(FirstActionPolicy),
            Self::Random => Box::new(RandomPolicy::new(seed)),
        }
    }
}

impl fmt::Display for PlayerStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

struct AlwaysCorrectPolicy;
struct AlwaysWrongPolicy;
struct FirstActionPolicy;

struct RandomPolicy {
    rng: ChaCha20Rng,
}

impl RandomPolicy {
    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x00C0_FFEE),
        }
    }
}

impl PlayerPolicy for AlwaysCorrectPolicy {
    fn name(&self) -> &'static str {
        PlayerStrategy::AlwaysCorrect.label()
    }

    fn pick_action(&mut self, scenario: &Scenario) -> DefenderAction {
        scenario.defender
    }
}

impl PlayerPolicy for AlwaysWrongPolicy {
    fn name(&self) -> &'static str {
        PlayerStrategy::AlwaysWrong.label()
    }

    fn pick_action(&mut self, scenario: &Scenario) -> DefenderAction {
        DefenderAction::ALL
            .into_iter()
            .find(|action| *action != scenario.defender)
            .unwrap_or(DefenderAction::Ignore)
    }
}

impl PlayerPolicy for FirstActionPolicy {
    fn name(&self) -> &'static str {
        PlayerStrategy::FirstAction.label()
    }

    fn pick_action(&mut self, _scenario: &Scenario) -> DefenderAction {
        DefenderAction::ALL[0]
    }
}

impl PlayerPolicy for RandomPolicy {
    fn name(&self) -> &'static str {
        PlayerStrategy::Random.label()
    }

    fn pick_action(&mut self, _scenario: &Scenario) -> DefenderAction {
        DefenderAction::ALL[self.rng.gen_range(0..DefenderAction::ALL.len())]
    }
}
