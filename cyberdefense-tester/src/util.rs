use anyhow::{Result, bail};
use std::collections::HashSet;

use crate::logic::PlayerStrategy;

pub fn split_csv(s: &str) -> Vec<String> {
    s.split(',')
        .map(|x| x.trim().to_string())
        .filter(|x| !x.is_empty())
        .collect()
}

/// Resolve CLI seed tokens into deck seeds.
///
/// Negative literals are folded to their magnitude so `-7` and `7` replay
/// the same deck.
pub fn resolve_seeds(tokens: &[String]) -> Result<Vec<u64>> {
    let mut seeds = Vec::new();
    let mut seen = HashSet::new();
    for token in tokens {
        let seed = if let Ok(value) = token.parse::<u64>() {
            value
        } else if let Ok(value) = token.parse::<i64>() {
            value.unsigned_abs()
        } else {
            bail!("'{token}' is not a numeric seed");
        };
        if seen.insert(seed) {
            seeds.push(seed);
        }
    }
    if seeds.is_empty() {
        bail!("at least one seed is required");
    }
    Ok(seeds)
}

/// Resolve policy names; `all` expands to every built-in policy.
pub fn resolve_policies(tokens: &[String]) -> Result<Vec<PlayerStrategy>> {
    let mut policies = Vec::new();
    for token in tokens {
        if token.eq_ignore_ascii_case("all") {
            for strategy in PlayerStrategy::ALL {
                if !policies.contains(&strategy) {
                    policies.push(strategy);
                }
            }
            continue;
        }
        let Some(strategy) = PlayerStrategy::parse(token) else {
            bail!("unknown policy '{token}'");
        };
        if !policies.contains(&strategy) {
            policies.push(strategy);
        }
    }
    Ok(policies)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn split_csv_drops_blanks() {
        assert_eq!(split_csv(" 1, ,2,"), vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn seeds_accept_signed_literals() {
        let tokens = split_csv("42,-7,18446744073709551615");
        assert_eq!(resolve_seeds(&tokens).unwrap(), vec![42, 7, u64::MAX]);
    }

    #[test]
    fn seeds_drop_repeats_in_any_position() {
        let tokens = split_csv("1,2,1,-2");
        assert_eq!(resolve_seeds(&tokens).unwrap(), vec![1, 2]);
    }

    #[test]
    fn seeds_reject_words() {
        assert!(resolve_seeds(&split_csv("abc")).is_err());
        assert!(resolve_seeds(&[]).is_err());
    }

    #[test]
    fn policies_expand_all_without_duplicates() {
        let policies = resolve_policies(&split_csv("random,all")).unwrap();
        assert_eq!(policies.len(), PlayerStrategy::ALL.len());
        assert_eq!(policies[0], PlayerStrategy::Random);
        assert!(resolve_policies(&split_csv("cheater")).is_err());
    }
}
