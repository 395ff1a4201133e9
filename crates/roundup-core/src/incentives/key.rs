// Incentive keys and their display titles.

use std::borrow::Cow;
use std::fmt;

use serde::{Serialize, Serializer};

const PLACEHOLDER_PREFIX: &str = "custom_incentive_week_";

/// A weekly incentive theme.
///
/// Catalog keys each have a winner strategy; `Placeholder` fills long
/// seasons and `Unknown` preserves any other key verbatim. Neither of the
/// last two ever produces a winner.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IncentiveKey {
    HighestTeamScore,
    LowestTeamScore,
    ClosestGame,
    BiggestBlowout,
    HighestScoringPlayerStarter,
    HighestScoringPlayerBench,
    HighestScoringDefenseStarter,
    HighestScoringQbStarter,
    HighestScoringRbStarter,
    HighestScoringWrStarter,
    HighestScoringTeStarter,
    HighestScoringKStarter,
    HighestScoringFlexStarter,
    HighestTeamBenchPoints,
    Most20PlusPointStarters,
    HighestStartingLineupPoints,
    Most10PlusPointBenchPlayers,
    Most15PlusPointStarters,
    /// `custom_incentive_week_K`, K being the 1-based schedule position.
    Placeholder(usize),
    Unknown(String),
}

/// Every catalog key with its wire name and display title, in catalog order.
const CATALOG_TABLE: &[(IncentiveKey, &str, &str)] = &[
    (IncentiveKey::HighestTeamScore, "highest_team_score", "Highest Scoring Team"),
    (IncentiveKey::LowestTeamScore, "lowest_team_score", "Lowest Scoring Team"),
    (IncentiveKey::ClosestGame, "closest_game", "Closest Win"),
    (IncentiveKey::BiggestBlowout, "biggest_blowout", "Biggest Blowout"),
    (
        IncentiveKey::HighestScoringPlayerStarter,
        "highest_scoring_player_starter",
        "Highest Scoring Starter",
    ),
    (
        IncentiveKey::HighestScoringPlayerBench,
        "highest_scoring_player_bench",
        "Highest Scoring Benched Player",
    ),
    (
        IncentiveKey::HighestScoringDefenseStarter,
        "highest_scoring_defense_starter",
        "Highest Scoring Defense (Starter)",
    ),
    (
        IncentiveKey::HighestScoringQbStarter,
        "highest_scoring_qb_starter",
        "Highest Scoring QB (Starter)",
    ),
    (
        IncentiveKey::HighestScoringRbStarter,
        "highest_scoring_rb_starter",
        "Highest Scoring RB (Starter)",
    ),
    (
        IncentiveKey::HighestScoringWrStarter,
        "highest_scoring_wr_starter",
        "Highest Scoring WR (Starter)",
    ),
    (
        IncentiveKey::HighestScoringTeStarter,
        "highest_scoring_te_starter",
        "Highest Scoring TE (Starter)",
    ),
    (
        IncentiveKey::HighestScoringKStarter,
        "highest_scoring_k_starter",
        "Highest Scoring K (Starter)",
    ),
    (
        IncentiveKey::HighestScoringFlexStarter,
        "highest_scoring_flex_starter",
        "Highest Scoring FLEX (RB/WR/TE Starter)",
    ),
    (
        IncentiveKey::HighestTeamBenchPoints,
        "highest_team_bench_points",
        "Highest Total Bench Points (Team)",
    ),
    (
        IncentiveKey::Most20PlusPointStarters,
        "most_20_plus_point_starters",
        "Most 20+ Point Starters (Team)",
    ),
    (
        IncentiveKey::HighestStartingLineupPoints,
        "highest_starting_lineup_points",
        "Highest Total Starting Lineup Points (Team)",
    ),
    (
        IncentiveKey::Most10PlusPointBenchPlayers,
        "most_10_plus_point_bench_players",
        "Most 10+ Point Bench Players (Team)",
    ),
    (
        IncentiveKey::Most15PlusPointStarters,
        "most_15_plus_point_starters",
        "Most 15+ Point Starters (Team)",
    ),
];

impl IncentiveKey {
    /// Parse a wire key. Never fails: unrecognised keys become `Unknown`.
    pub fn parse(key: &str) -> Self {
        if let Some((k, _, _)) = CATALOG_TABLE.iter().find(|(_, name, _)| *name == key) {
            return k.clone();
        }
        if let Some(n) = key
            .strip_prefix(PLACEHOLDER_PREFIX)
            .and_then(|rest| rest.parse::<usize>().ok())
        {
            return IncentiveKey::Placeholder(n);
        }
        IncentiveKey::Unknown(key.to_string())
    }

    /// The wire key, e.g. `highest_team_score`.
    pub fn as_key(&self) -> Cow<'static, str> {
        match self {
            IncentiveKey::Placeholder(n) => Cow::Owned(format!("{PLACEHOLDER_PREFIX}{n}")),
            IncentiveKey::Unknown(s) => Cow::Owned(s.clone()),
            catalog => Cow::Borrowed(catalog_entry(catalog).map(|(_, name, _)| *name).unwrap_or("")),
        }
    }

    /// Display title, falling back to a humanized form of the key.
    pub fn title(&self) -> String {
        match catalog_entry(self) {
            Some((_, _, title)) => (*title).to_string(),
            None => humanize_key(&self.as_key()),
        }
    }

    pub fn is_catalog(&self) -> bool {
        catalog_entry(self).is_some()
    }
}

fn catalog_entry(key: &IncentiveKey) -> Option<&'static (IncentiveKey, &'static str, &'static str)> {
    CATALOG_TABLE.iter().find(|(k, _, _)| k == key)
}

/// All catalog keys in schedule order.
pub fn catalog() -> impl Iterator<Item = IncentiveKey> {
    CATALOG_TABLE.iter().map(|(k, _, _)| k.clone())
}

/// Number of catalog keys.
pub fn catalog_len() -> usize {
    CATALOG_TABLE.len()
}

impl fmt::Display for IncentiveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_key())
    }
}

impl Serialize for IncentiveKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.as_key())
    }
}

/// Title for a raw wire key.
pub fn describe_incentive_title(key: &str) -> String {
    IncentiveKey::parse(key).title()
}

/// Turn `most_20_plus_things` into `Most 20 Plus Things`.
///
/// A letter is upper-cased when it follows a non-letter and lower-cased
/// otherwise.
pub fn humanize_key(key: &str) -> String {
    let mut out = String::with_capacity(key.len());
    let mut prev_is_letter = false;
    for ch in key.chars() {
        let ch = if ch == '_' { ' ' } else { ch };
        if ch.is_alphabetic() {
            if prev_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            prev_is_letter = true;
        } else {
            out.push(ch);
            prev_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_keys_round_trip() {
        for key in catalog() {
            assert_eq!(IncentiveKey::parse(&key.as_key()), key);
        }
        assert_eq!(catalog_len(), 18);
    }

    #[test]
    fn catalog_titles_come_from_table() {
        assert_eq!(IncentiveKey::ClosestGame.title(), "Closest Win");
        assert_eq!(
            describe_incentive_title("highest_scoring_flex_starter"),
            "Highest Scoring FLEX (RB/WR/TE Starter)"
        );
    }

    #[test]
    fn placeholder_keys_parse_and_humanize() {
        let key = IncentiveKey::parse("custom_incentive_week_19");
        assert_eq!(key, IncentiveKey::Placeholder(19));
        assert_eq!(key.as_key(), "custom_incentive_week_19");
        assert_eq!(key.title(), "Custom Incentive Week 19");
        assert!(!key.is_catalog());
    }

    #[test]
    fn unknown_keys_are_preserved() {
        let key = IncentiveKey::parse("most_TDs_by_kickers");
        assert_eq!(key, IncentiveKey::Unknown("most_TDs_by_kickers".into()));
        assert_eq!(key.as_key(), "most_TDs_by_kickers");
        assert_eq!(key.title(), "Most Tds By Kickers");
    }

    #[test]
    fn humanize_capitalizes_after_digits_and_spaces() {
        assert_eq!(humanize_key("most_20_plus_point_starters"), "Most 20 Plus Point Starters");
        assert_eq!(humanize_key(""), "");
    }

    #[test]
    fn serializes_as_wire_key() {
        let json = serde_json::to_string(&IncentiveKey::Placeholder(3)).unwrap();
        assert_eq!(json, "\"custom_incentive_week_3\"");
    }
}
