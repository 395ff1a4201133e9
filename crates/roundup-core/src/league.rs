// Provider-neutral input records consumed by the engine.
//
// The data-access layer translates whatever the fantasy provider returns
// into these plain structs; no provider-specific type crosses into the core.

use serde::{Deserialize, Serialize};

/// A fantasy team as listed on the league roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeagueTeam {
    pub team_id: u32,
    pub team_name: String,
    #[serde(default)]
    pub abbreviation: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    /// Display name of the primary owner. Optional decoration only.
    #[serde(default)]
    pub owner_name: Option<String>,
}

/// One rostered player in a box score lineup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LineupEntry {
    pub name: String,
    /// Default position code reported by the provider (QB, RB, D/ST, ...).
    pub position: String,
    #[serde(default)]
    pub pro_team: Option<String>,
    /// Fantasy points for the week. `None` when the provider reported nothing.
    #[serde(default)]
    pub points: Option<f64>,
    /// Lineup slot the player occupied (QB, FLEX, BE, IR, ...).
    pub slot_position: String,
}

/// The provider's record of one matchup for one week.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BoxScore {
    #[serde(default)]
    pub home_team: Option<LeagueTeam>,
    #[serde(default)]
    pub away_team: Option<LeagueTeam>,
    pub home_score: f64,
    pub away_score: f64,
    #[serde(default)]
    pub home_lineup: Vec<LineupEntry>,
    #[serde(default)]
    pub away_lineup: Vec<LineupEntry>,
}

/// Scoring-period boundaries of the season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonBounds {
    pub first_week: u32,
    pub last_week: u32,
    /// Number of weeks that receive a scheduled incentive.
    pub regular_season_weeks: u32,
}

impl SeasonBounds {
    /// Bounds where every week from `first_week` to `last_week` is regular season.
    pub fn new(first_week: u32, last_week: u32) -> Self {
        let last_week = last_week.max(first_week);
        SeasonBounds {
            first_week,
            last_week,
            regular_season_weeks: last_week - first_week + 1,
        }
    }

    /// Clamp a requested week into the season.
    pub fn clamp_week(&self, week: u32) -> u32 {
        week.clamp(self.first_week, self.last_week)
    }
}

impl Default for SeasonBounds {
    fn default() -> Self {
        SeasonBounds::new(1, 18)
    }
}
