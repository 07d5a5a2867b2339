//! Match configuration.
use serde::{Deserialize, Serialize};

use crate::constants::{AWARE_THRESHOLD, DEFAULT_MATCH_LENGTH};
use crate::error::GameError;

/// Tunables for one match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "MatchConfig::default_match_length")]
    pub match_length: usize,
    #[serde(default = "MatchConfig::default_aware_threshold")]
    pub aware_threshold: u32,
}

impl MatchConfig {
    const fn default_match_length() -> usize {
        DEFAULT_MATCH_LENGTH
    }

    const fn default_aware_threshold() -> u32 {
        AWARE_THRESHOLD
    }

    /// Load a configuration from JSON, filling omitted fields with defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Check the configuration against the pool it will draw from.
    ///
    /// # Errors
    ///
    /// Returns `GameError::MatchTooLong` when the match needs more scenarios
    /// than the pool holds, and `GameError::InvalidConfiguration` for a zero
    /// length match.
    pub fn validate(&self, pool_size: usize) -> Result<(), GameError> {
        if self.match_length == 0 {
            return Err(GameError::InvalidConfiguration(
                "match length must be at least 1".to_string(),
            ));
        }
        if self.match_length > pool_size {
            return Err(GameError::MatchTooLong {
                match_length: self.match_length,
                pool_size,
            });
        }
        Ok(())
    }
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            match_length: Self::default_match_length(),
            aware_threshold: Self::default_aware_threshold(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn omitted_fields_take_defaults() {
        let cfg = MatchConfig::from_json(r#"{"match_length": 4}"#).unwrap();
        assert_eq!(cfg.match_length, 4);
        assert_eq!(cfg.aware_threshold, AWARE_THRESHOLD);
        assert_eq!(MatchConfig::from_json("{}").unwrap(), MatchConfig::default());
    }

    #[test]
    fn validate_bounds_match_length() {
        let cfg = MatchConfig::default();
        assert!(cfg.validate(10).is_ok());
        assert_eq!(
            cfg.validate(9),
            Err(GameError::MatchTooLong {
                match_length: 10,
                pool_size: 9
            })
        );
        let empty = MatchConfig {
            match_length: 0,
            ..MatchConfig::default()
        };
        assert!(matches!(
            empty.validate(10),
            Err(GameError::InvalidConfiguration(_))
        ));
    }
}
