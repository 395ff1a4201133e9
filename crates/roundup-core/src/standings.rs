// Cumulative standings folded from week-by-week box scores.
//
// Standings are always rebuilt from week 1. Two independent snapshots
// (through W and through W-1) are diffed to produce rank movement; no
// state is carried between calls.

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::league::{BoxScore, LeagueTeam};
use crate::round1;

/// One team's cumulative record through a given week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingsRow {
    pub team_id: u32,
    pub team_name: String,
    pub team_abbrev: Option<String>,
    pub logo_url: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
    pub wins: u32,
    pub losses: u32,
    pub ties: u32,
    pub points_for: f64,
    pub points_against: f64,
    /// 1-based position after sorting by (wins desc, points_for desc).
    pub rank: u32,
    /// Previous rank minus current rank; positive means the team climbed.
    pub movement: Option<i32>,
}

impl StandingsRow {
    fn new(team: &LeagueTeam) -> Self {
        StandingsRow {
            team_id: team.team_id,
            team_name: team.team_name.clone(),
            team_abbrev: team.abbreviation.clone(),
            logo_url: team.logo_url.clone(),
            owner_name: team.owner_name.clone(),
            wins: 0,
            losses: 0,
            ties: 0,
            points_for: 0.0,
            points_against: 0.0,
            rank: 0,
            movement: None,
        }
    }

    /// Win-loss record, with ties appended only when there are any.
    pub fn record(&self) -> String {
        if self.ties > 0 {
            format!("{}-{}-{}", self.wins, self.losses, self.ties)
        } else {
            format!("{}-{}", self.wins, self.losses)
        }
    }

    pub fn movement_is_up(&self) -> bool {
        self.movement.is_some_and(|m| m > 0)
    }

    pub fn movement_is_down(&self) -> bool {
        self.movement.is_some_and(|m| m < 0)
    }

    pub fn movement_abs(&self) -> Option<u32> {
        self.movement.map(|m| m.unsigned_abs())
    }
}

/// Sort order used for ranking: wins desc, then points-for desc.
fn standings_order(a: &StandingsRow, b: &StandingsRow) -> Ordering {
    b.wins
        .cmp(&a.wins)
        .then_with(|| b.points_for.total_cmp(&a.points_for))
}

/// Fold one box score into the running records.
fn apply_box_score(rows: &mut [StandingsRow], index: &HashMap<u32, usize>, b: &BoxScore) {
    let home_score = b.home_score.max(0.0);
    let away_score = b.away_score.max(0.0);

    // Both sides at zero means the game has not been played.
    if home_score == 0.0 && away_score == 0.0 {
        return;
    }

    let home = b
        .home_team
        .as_ref()
        .and_then(|t| index.get(&t.team_id).copied());
    let away = b
        .away_team
        .as_ref()
        .and_then(|t| index.get(&t.team_id).copied());

    if let Some(h) = home {
        rows[h].points_for += home_score;
        rows[h].points_against += away_score;
    }
    if let Some(a) = away {
        rows[a].points_for += away_score;
        rows[a].points_against += home_score;
    }

    match home_score.partial_cmp(&away_score) {
        Some(Ordering::Greater) => {
            if let Some(h) = home {
                rows[h].wins += 1;
            }
            if let Some(a) = away {
                rows[a].losses += 1;
            }
        }
        Some(Ordering::Less) => {
            if let Some(a) = away {
                rows[a].wins += 1;
            }
            if let Some(h) = home {
                rows[h].losses += 1;
            }
        }
        _ => {
            for i in [home, away].into_iter().flatten() {
                rows[i].ties += 1;
            }
        }
    }
}

/// Compute standings through `through_week` (inclusive).
///
/// `weeks[i]` holds the box scores of week `i + 1`; weeks beyond the end of
/// the slice contribute nothing. Box-score sides whose team id is not on the
/// roster are ignored. Teams that tie on both wins and points-for keep
/// roster order and still receive distinct sequential ranks.
pub fn compute_standings(
    teams: &[LeagueTeam],
    weeks: &[Vec<BoxScore>],
    through_week: u32,
) -> Vec<StandingsRow> {
    let mut rows: Vec<StandingsRow> = teams.iter().map(StandingsRow::new).collect();
    let index: HashMap<u32, usize> = rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.team_id, i))
        .collect();

    let folded = (through_week as usize).min(weeks.len());
    for week in &weeks[..folded] {
        for b in week {
            apply_box_score(&mut rows, &index, b);
        }
    }

    for row in &mut rows {
        row.points_for = round1(row.points_for);
        row.points_against = round1(row.points_against);
    }

    rows.sort_by(standings_order);
    for (i, row) in rows.iter_mut().enumerate() {
        row.rank = i as u32 + 1;
    }

    debug!(
        teams = rows.len(),
        weeks_folded = folded,
        through_week,
        "computed standings"
    );
    rows
}

/// Standings through the week before `week`; empty in week 1.
pub fn previous_standings(
    teams: &[LeagueTeam],
    weeks: &[Vec<BoxScore>],
    week: u32,
) -> Vec<StandingsRow> {
    if week <= 1 {
        return Vec::new();
    }
    compute_standings(teams, weeks, week - 1)
}

/// Standings through `week` with rank movement against the previous week.
pub fn standings_with_movement(
    teams: &[LeagueTeam],
    weeks: &[Vec<BoxScore>],
    week: u32,
) -> Vec<StandingsRow> {
    let mut current = compute_standings(teams, weeks, week);
    if week <= 1 {
        return current;
    }

    let previous = compute_standings(teams, weeks, week - 1);
    let prev_rank: HashMap<u32, u32> = previous.iter().map(|r| (r.team_id, r.rank)).collect();

    for row in &mut current {
        row.movement = prev_rank
            .get(&row.team_id)
            .map(|&prev| prev as i32 - row.rank as i32);
    }
    current
}
