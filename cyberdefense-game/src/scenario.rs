//! Fixed catalog of attacker scenarios.
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::action::DefenderAction;
use crate::constants::POOL_SIZE;
use crate::error::GameError;

const DEFAULT_SCENARIO_DATA: &str = include_str!("../assets/scenarios.json");

/// One scripted attacker move and its single correct defender response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    pub attacker: String,
    pub defender: DefenderAction,
    pub result: String,
    /// Long-form explanation shown after the verdict. Opaque to the engine.
    #[serde(default)]
    pub reasoning: String,
}

impl Scenario {
    /// Whether `action` is the scenario's correct response.
    #[must_use]
    pub fn is_answered_by(&self, action: DefenderAction) -> bool {
        self.defender == action
    }
}

/// Container for the scenario catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct ScenarioPool {
    scenarios: Vec<Scenario>,
}

impl ScenarioPool {
    /// Build a pool from pre-parsed scenarios, rejecting duplicate attacker labels.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfiguration` if the pool is empty, an
    /// attacker label repeats, or a scenario has a blank attacker/result label.
    pub fn from_scenarios(scenarios: Vec<Scenario>) -> Result<Self, GameError> {
        let pool = Self { scenarios };
        pool.validate()?;
        Ok(pool)
    }

    /// Parse and validate catalog data (`{"scenarios": [...]}`).
    ///
    /// Catalog data must hold exactly [`POOL_SIZE`] records; use
    /// [`ScenarioPool::from_scenarios`] for pools of other sizes.
    ///
    /// # Errors
    ///
    /// Returns `GameError::InvalidConfiguration` if the JSON does not parse
    /// (including an unknown defender action), holds the wrong number of
    /// records, or fails validation.
    pub fn from_json(json: &str) -> Result<Self, GameError> {
        let pool: Self = serde_json::from_str(json)
            .map_err(|err| GameError::InvalidConfiguration(format!("scenario data: {err}")))?;
        pool.validate()?;
        if pool.len() != POOL_SIZE {
            return Err(GameError::InvalidConfiguration(format!(
                "scenario catalog has {} records, expected {POOL_SIZE}",
                pool.len()
            )));
        }
        Ok(pool)
    }

    /// Load the embedded catalog. Falls back to an empty pool, which
    /// refuses to start any match, if the embedded data is broken.
    #[must_use]
    pub fn load_from_static() -> Self {
        match Self::from_json(DEFAULT_SCENARIO_DATA) {
            Ok(pool) => pool,
            Err(err) => {
                log::error!("embedded scenario catalog rejected: {err}");
                Self::default()
            }
        }
    }

    fn validate(&self) -> Result<(), GameError> {
        if self.scenarios.is_empty() {
            return Err(GameError::InvalidConfiguration(
                "scenario pool is empty".to_string(),
            ));
        }
        let mut seen = HashSet::new();
        for scenario in &self.scenarios {
            if scenario.attacker.trim().is_empty() || scenario.result.trim().is_empty() {
                return Err(GameError::InvalidConfiguration(
                    "scenario labels must not be blank".to_string(),
                ));
            }
            if !seen.insert(scenario.attacker.as_str()) {
                return Err(GameError::InvalidConfiguration(format!(
                    "duplicate attacker label '{}'",
                    scenario.attacker
                )));
            }
        }
        Ok(())
    }

    /// Read access to every scenario in catalog order.
    #[must_use]
    pub fn all(&self) -> &[Scenario] {
        &self.scenarios
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    #[must_use]
    pub fn find(&self, attacker: &str) -> Option<&Scenario> {
        self.scenarios.iter().find(|s| s.attacker == attacker)
    }
}

/// The process-wide catalog, parsed once on first use.
#[must_use]
pub fn catalog() -> &'static ScenarioPool {
    static CATALOG: OnceLock<ScenarioPool> = OnceLock::new();
    CATALOG.get_or_init(ScenarioPool::load_from_static)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(attacker: &str, defender: DefenderAction) -> Scenario {
        Scenario {
            attacker: attacker.to_string(),
            defender,
            result: "Blocked".to_string(),
            reasoning: String::new(),
        }
    }

    #[test]
    fn embedded_catalog_has_ten_unique_scenarios() {
        let pool = catalog();
        assert_eq!(pool.len(), POOL_SIZE);
        let attackers: HashSet<_> = pool.all().iter().map(|s| s.attacker.as_str()).collect();
        assert_eq!(attackers.len(), POOL_SIZE);
        assert!(pool.all().iter().all(|s| !s.reasoning.is_empty()));
    }

    #[test]
    fn catalog_is_stable_across_calls() {
        let first = catalog();
        let second = catalog();
        assert!(std::ptr::eq(first, second));
        assert_eq!(first.all()[0].attacker, "Access");
        assert_eq!(first.all()[9].attacker, "Ransomware");
    }

    #[test]
    fn malware_is_answered_only_by_scan() {
        let malware = catalog().find("Malware").expect("malware scenario");
        for action in DefenderAction::ALL {
            assert_eq!(malware.is_answered_by(action), action == DefenderAction::Scan);
        }
        assert_eq!(malware.result, "Neutralized");
    }

    #[test]
    fn duplicate_attackers_are_rejected() {
        let err = ScenarioPool::from_scenarios(vec![
            scenario("Phone", DefenderAction::Identify),
            scenario("Phone", DefenderAction::Deny),
        ])
        .unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration(msg) if msg.contains("Phone")));
    }

    #[test]
    fn unknown_defender_label_fails_to_parse() {
        let json = r#"{"scenarios": [
            {"attacker": "USB", "defender": "Unplug", "result": "Blocked"}
        ]}"#;
        assert!(matches!(
            ScenarioPool::from_json(json),
            Err(GameError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn short_catalog_is_rejected() {
        let json = r#"{"scenarios": [
            {"attacker": "Access", "defender": "Deny", "result": "Blocked"},
            {"attacker": "Chat", "defender": "Identify", "result": "Exposed"}
        ]}"#;
        let err = ScenarioPool::from_json(json).unwrap_err();
        assert!(matches!(err, GameError::InvalidConfiguration(msg) if msg.contains("has 2 records")));
    }

    #[test]
    fn custom_pools_may_be_smaller_than_the_catalog() {
        let pool = ScenarioPool::from_scenarios(vec![
            scenario("Access", DefenderAction::Deny),
            scenario("Chat", DefenderAction::Identify),
        ])
        .unwrap();
        assert_eq!(pool.len(), 2);
    }

    #[test]
    fn empty_pool_is_rejected() {
        assert!(ScenarioPool::from_scenarios(Vec::new()).is_err());
        assert!(ScenarioPool::from_json(r#"{"scenarios": []}"#).is_err());
    }
}
