// Flattening of box-score lineups into individual player performances.

use serde::{Deserialize, Serialize};

use crate::league::{BoxScore, LeagueTeam, LineupEntry};
use crate::position::is_bench_slot;
use crate::round1;

/// One player's fantasy week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerPerformance {
    pub player_name: String,
    pub position: String,
    pub nfl_team: Option<String>,
    /// Fantasy points, rounded to one decimal.
    pub points: f64,
    pub fantasy_team: String,
    /// True for bench, IR and other reserve slots.
    pub is_bench: bool,
}

impl PlayerPerformance {
    pub fn is_starter(&self) -> bool {
        !self.is_bench
    }
}

fn fantasy_team_name(team: Option<&LeagueTeam>, fallback: &str) -> String {
    match team {
        Some(t) if !t.team_name.is_empty() => t.team_name.clone(),
        Some(t) => t.team_id.to_string(),
        None => fallback.to_string(),
    }
}

fn push_lineup(out: &mut Vec<PlayerPerformance>, lineup: &[LineupEntry], fantasy_team: &str) {
    out.extend(lineup.iter().map(|entry| {
        let points = entry.points.filter(|p| p.is_finite()).unwrap_or(0.0);
        PlayerPerformance {
            player_name: entry.name.clone(),
            position: entry.position.clone(),
            nfl_team: entry.pro_team.clone(),
            points: round1(points),
            fantasy_team: fantasy_team.to_string(),
            is_bench: is_bench_slot(&entry.slot_position),
        }
    }));
}

/// All player performances for a week, starters and bench alike.
///
/// Order: for each box score, the home lineup then the away lineup.
pub fn extract_performances(box_scores: &[BoxScore]) -> Vec<PlayerPerformance> {
    let mut players = Vec::new();
    for b in box_scores {
        let home = fantasy_team_name(b.home_team.as_ref(), "Home");
        let away = fantasy_team_name(b.away_team.as_ref(), "Away");
        push_lineup(&mut players, &b.home_lineup, &home);
        push_lineup(&mut players, &b.away_lineup, &away);
    }
    players
}

/// The `n` highest-scoring starters, best first.
pub fn top_starters(performances: &[PlayerPerformance], n: usize) -> Vec<PlayerPerformance> {
    let mut starters: Vec<PlayerPerformance> = performances
        .iter()
        .filter(|p| p.is_starter())
        .cloned()
        .collect();
    starters.sort_by(|a, b| b.points.total_cmp(&a.points));
    starters.truncate(n);
    starters
}

/// The `n` lowest-scoring starters, worst first.
pub fn bottom_starters(performances: &[PlayerPerformance], n: usize) -> Vec<PlayerPerformance> {
    let mut starters: Vec<PlayerPerformance> = performances
        .iter()
        .filter(|p| p.is_starter())
        .cloned()
        .collect();
    starters.sort_by(|a, b| a.points.total_cmp(&b.points));
    starters.truncate(n);
    starters
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn entry(name: &str, position: &str, slot: &str, points: Option<f64>) -> LineupEntry {
        LineupEntry {
            name: name.into(),
            position: position.into(),
            pro_team: Some("KC".into()),
            points,
            slot_position: slot.into(),
        }
    }

    pub fn perf(name: &str, position: &str, team: &str, points: f64, is_bench: bool) -> PlayerPerformance {
        PlayerPerformance {
            player_name: name.into(),
            position: position.into(),
            nfl_team: Some("KC".into()),
            points,
            fantasy_team: team.into(),
            is_bench,
        }
    }
}
