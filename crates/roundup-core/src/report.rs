// Weekly report assembly: every engine module folded into one page model.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::awards::{compute_weekly_awards, Award};
use crate::boom_bust::{compute_boom_bust, BoomBustRow};
use crate::incentives::{generate_schedule, weekly_incentive, WeeklyIncentive};
use crate::leaders::{compute_position_leaders, PositionLeaders};
use crate::league::{BoxScore, LeagueTeam, SeasonBounds};
use crate::narrative::{build_narrative_inputs, NarrativeInputs};
use crate::performance::{bottom_starters, extract_performances, top_starters, PlayerPerformance};
use crate::position::Position;
use crate::scoreboard::{normalize_scoreboard, summarize_incentives, IncentivesSummary, Matchup};
use crate::standings::{previous_standings, standings_with_movement, StandingsRow};

// ---------------------------------------------------------------------------
// Inputs
// ---------------------------------------------------------------------------

/// Provider data needed to build one week's report.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeekInput {
    pub league_name: String,
    pub week: u32,
    pub bounds: SeasonBounds,
    pub teams: Vec<LeagueTeam>,
    /// `weeks[i]` holds the box scores of week `i + 1`, at least through `week`.
    pub weeks: Vec<Vec<BoxScore>>,
}

impl WeekInput {
    /// Box scores of the report week, empty when not loaded.
    pub fn current_box_scores(&self) -> &[BoxScore] {
        self.week
            .checked_sub(1)
            .and_then(|i| self.weeks.get(i as usize))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}

/// Tunables for report assembly.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    /// Length of the top and bottom starter lists.
    pub top_players: usize,
    /// Positions for both the boom/bust table and the position leaders.
    pub boom_bust_positions: Vec<Position>,
    pub leaders_top_n: usize,
    pub leaders_bottom_n: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        ReportOptions {
            top_players: 3,
            boom_bust_positions: Position::DEFAULT_REPORTED.to_vec(),
            leaders_top_n: 1,
            leaders_bottom_n: 1,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// Previous/next week links, clamped to the season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekNavigation {
    pub week: u32,
    pub prev_week: u32,
    pub next_week: u32,
    pub prev_disabled: bool,
    pub next_disabled: bool,
}

impl WeekNavigation {
    pub fn new(week: u32, bounds: &SeasonBounds) -> Self {
        let prev_week = week.saturating_sub(1).max(bounds.first_week);
        let next_week = (week + 1).min(bounds.last_week);
        WeekNavigation {
            week,
            prev_week,
            next_week,
            prev_disabled: week <= bounds.first_week,
            next_disabled: week >= bounds.last_week,
        }
    }
}

/// The complete weekly roundup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeeklyReport {
    pub league_name: String,
    pub nav: WeekNavigation,
    pub scoreboard: Vec<Matchup>,
    pub standings: Vec<StandingsRow>,
    pub summary: IncentivesSummary,
    pub performances: Vec<PlayerPerformance>,
    pub incentive: WeeklyIncentive,
    pub awards: Vec<Award>,
    pub boom_bust: Vec<BoomBustRow>,
    pub position_leaders: Vec<PositionLeaders>,
    pub top_players: Vec<PlayerPerformance>,
    pub bottom_players: Vec<PlayerPerformance>,
    pub narrative: NarrativeInputs,
}

/// Build the report for `input.week`.
///
/// Pure: the same input always yields the same report.
pub fn build_weekly_report(input: &WeekInput, options: &ReportOptions) -> WeeklyReport {
    let week = input.week;
    let box_scores = input.current_box_scores();

    let scoreboard = normalize_scoreboard(box_scores);
    let summary = summarize_incentives(&scoreboard);
    let standings = standings_with_movement(&input.teams, &input.weeks, week);
    let previous = previous_standings(&input.teams, &input.weeks, week);
    let performances = extract_performances(box_scores);
    debug!(
        week,
        matchups = scoreboard.len(),
        performances = performances.len(),
        "assembling weekly report"
    );

    let schedule = generate_schedule(input.bounds.regular_season_weeks as usize);
    let incentive = weekly_incentive(
        &schedule,
        week,
        input.bounds.first_week,
        &scoreboard,
        &summary,
        &performances,
    );
    let awards = compute_weekly_awards(&scoreboard, &standings, &performances);
    let boom_bust = compute_boom_bust(&performances, &options.boom_bust_positions);
    let position_leaders = compute_position_leaders(
        &performances,
        &options.boom_bust_positions,
        options.leaders_top_n,
        options.leaders_bottom_n,
    );
    let top_players = top_starters(&performances, options.top_players);
    let bottom_players = bottom_starters(&performances, options.top_players);

    let narrative = build_narrative_inputs(
        &input.league_name,
        week,
        &scoreboard,
        &standings,
        &previous,
        &summary,
        &top_players,
    );

    info!(
        week,
        incentive = %incentive.this_title,
        awards = awards.len(),
        "weekly report built"
    );

    WeeklyReport {
        league_name: input.league_name.clone(),
        nav: WeekNavigation::new(week, &input.bounds),
        scoreboard,
        standings,
        summary,
        performances,
        incentive,
        awards,
        boom_bust,
        position_leaders,
        top_players,
        bottom_players,
        narrative,
    }
}
