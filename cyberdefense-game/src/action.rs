//! The six defender actions shared by scenario data and player input.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GameError;

/// A defender response. Scenarios name their correct answer with this type,
/// so a typo in catalog data fails to parse instead of making a turn unwinnable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DefenderAction {
    Deny,
    Identify,
    Ignore,
    Scan,
    Backup,
    Report,
}

impl DefenderAction {
    /// Every action in the order the choices are presented.
    pub const ALL: [Self; 6] = [
        Self::Deny,
        Self::Identify,
        Self::Ignore,
        Self::Scan,
        Self::Backup,
        Self::Report,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Deny => "Deny",
            Self::Identify => "Identify",
            Self::Ignore => "Ignore",
            Self::Scan => "Scan",
            Self::Backup => "Backup",
            Self::Report => "Report",
        }
    }

    /// Resolve a 1-based menu position into an action.
    #[must_use]
    pub fn from_menu_index(index: usize) -> Option<Self> {
        index.checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }
}

impl fmt::Display for DefenderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DefenderAction {
    type Err = GameError;

    /// Exact label match only; no case folding or partial credit.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|action| action.as_str() == s)
            .ok_or_else(|| GameError::InvalidChoice(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn labels_parse_exactly() {
        for action in DefenderAction::ALL {
            assert_eq!(action.as_str().parse::<DefenderAction>(), Ok(action));
        }
        assert_eq!(
            "scan".parse::<DefenderAction>(),
            Err(GameError::InvalidChoice("scan".to_string()))
        );
        assert!("Firewall".parse::<DefenderAction>().is_err());
    }

    #[test]
    fn menu_index_is_one_based() {
        assert_eq!(DefenderAction::from_menu_index(1), Some(DefenderAction::Deny));
        assert_eq!(
            DefenderAction::from_menu_index(6),
            Some(DefenderAction::Report)
        );
        assert_eq!(DefenderAction::from_menu_index(0), None);
        assert_eq!(DefenderAction::from_menu_index(7), None);
    }

    #[test]
    fn serializes_as_plain_label() {
        let json = serde_json::to_string(&DefenderAction::Backup).unwrap();
        assert_eq!(json, "\"Backup\"");
    }
}
