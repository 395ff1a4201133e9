// Winner resolution for a single weekly incentive.

use serde::{Deserialize, Serialize};

use super::key::IncentiveKey;
use crate::format_points;
use crate::performance::PlayerPerformance;
use crate::position::Position;
use crate::round1;
use crate::scoreboard::{GameDescriptor, IncentivesSummary, Matchup};

/// Title and winner of an incentive. `winner_text` is empty when nobody
/// qualified this week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IncentiveResult {
    pub title: String,
    pub winner_text: String,
}

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy)]
enum Extreme {
    Highest,
    Lowest,
}

#[derive(Debug, Clone, Copy)]
enum Pool {
    Starters,
    Bench,
}

#[derive(Debug, Clone, Copy)]
enum PositionFilter {
    Any,
    Exact(&'static str),
    Flex,
}

#[derive(Debug, Clone, Copy)]
enum Aggregate {
    BenchTotal,
    StarterTotal,
    StartersAtLeast(f64),
    BenchAtLeast(f64),
}

#[derive(Debug, Clone, Copy)]
enum Strategy {
    TeamScore(Extreme),
    ClosestGame,
    BiggestBlowout,
    Player(Pool, PositionFilter),
    Defense,
    TeamAggregate(Aggregate),
    NoWinner,
}

fn strategy_for(key: &IncentiveKey) -> Strategy {
    use IncentiveKey::*;
    match key {
        HighestTeamScore => Strategy::TeamScore(Extreme::Highest),
        LowestTeamScore => Strategy::TeamScore(Extreme::Lowest),
        ClosestGame => Strategy::ClosestGame,
        BiggestBlowout => Strategy::BiggestBlowout,
        HighestScoringPlayerStarter => Strategy::Player(Pool::Starters, PositionFilter::Any),
        HighestScoringPlayerBench => Strategy::Player(Pool::Bench, PositionFilter::Any),
        HighestScoringDefenseStarter => Strategy::Defense,
        HighestScoringQbStarter => Strategy::Player(Pool::Starters, PositionFilter::Exact("QB")),
        HighestScoringRbStarter => Strategy::Player(Pool::Starters, PositionFilter::Exact("RB")),
        HighestScoringWrStarter => Strategy::Player(Pool::Starters, PositionFilter::Exact("WR")),
        HighestScoringTeStarter => Strategy::Player(Pool::Starters, PositionFilter::Exact("TE")),
        HighestScoringKStarter => Strategy::Player(Pool::Starters, PositionFilter::Exact("K")),
        HighestScoringFlexStarter => Strategy::Player(Pool::Starters, PositionFilter::Flex),
        HighestTeamBenchPoints => Strategy::TeamAggregate(Aggregate::BenchTotal),
        HighestStartingLineupPoints => Strategy::TeamAggregate(Aggregate::StarterTotal),
        Most20PlusPointStarters => Strategy::TeamAggregate(Aggregate::StartersAtLeast(20.0)),
        Most15PlusPointStarters => Strategy::TeamAggregate(Aggregate::StartersAtLeast(15.0)),
        Most10PlusPointBenchPlayers => Strategy::TeamAggregate(Aggregate::BenchAtLeast(10.0)),
        Placeholder(_) | Unknown(_) => Strategy::NoWinner,
    }
}

// ---------------------------------------------------------------------------
// Team score superlatives
// ---------------------------------------------------------------------------

fn owner_suffix(owner: Option<&str>) -> String {
    match owner {
        Some(o) if !o.is_empty() => format!(" ({o})"),
        _ => String::new(),
    }
}

fn team_score_winner(matchups: &[Matchup], extreme: Extreme) -> Option<String> {
    let mut best: Option<(&str, f64, Option<&str>)> = None;
    for m in matchups {
        for side in m.sides() {
            // Byes and unidentified teams carry no id.
            if side.id.is_none() || side.name.is_empty() {
                continue;
            }
            let better = match (best, extreme) {
                (None, _) => true,
                (Some((_, b, _)), Extreme::Highest) => side.score > b,
                (Some((_, b, _)), Extreme::Lowest) => side.score < b,
            };
            if better {
                best = Some((side.name, side.score, side.owner));
            }
        }
    }
    best.map(|(name, score, owner)| {
        format!("{name}{} ({})", owner_suffix(owner), format_points(score))
    })
}

fn margin_winner(descriptor: Option<&GameDescriptor>) -> Option<String> {
    let d = descriptor?;
    let winner = d.winner.as_deref()?;
    Some(format!("{winner} (won by {})", format_points(d.margin)))
}

// ---------------------------------------------------------------------------
// Player superlatives
// ---------------------------------------------------------------------------

fn in_pool(p: &PlayerPerformance, pool: Pool) -> bool {
    match pool {
        Pool::Starters => !p.is_bench,
        Pool::Bench => p.is_bench,
    }
}

fn position_matches(p: &PlayerPerformance, filter: PositionFilter) -> bool {
    let code = p.position.trim().to_uppercase();
    match filter {
        PositionFilter::Any => true,
        PositionFilter::Exact(want) => code == want,
        PositionFilter::Flex => Position::from_code(&code).is_some_and(|pos| pos.is_flex_eligible()),
    }
}

fn best_player(
    performances: &[PlayerPerformance],
    pool: Pool,
    filter: PositionFilter,
) -> Option<&PlayerPerformance> {
    let mut best: Option<&PlayerPerformance> = None;
    for p in performances
        .iter()
        .filter(|p| in_pool(p, pool) && position_matches(p, filter))
    {
        if best.map_or(true, |b| p.points > b.points) {
            best = Some(p);
        }
    }
    best
}

fn player_label(p: &PlayerPerformance) -> String {
    format!(
        "{} – {} for {}",
        p.player_name,
        format_points(p.points),
        p.fantasy_team
    )
}

// ---------------------------------------------------------------------------
// Team aggregates
// ---------------------------------------------------------------------------

/// Accumulate a per-team metric, preserving first-seen team order.
fn accumulate_by_team<F>(performances: &[PlayerPerformance], contribution: F) -> Vec<(&str, f64)>
where
    F: Fn(&PlayerPerformance) -> Option<f64>,
{
    let mut totals: Vec<(&str, f64)> = Vec::new();
    for p in performances {
        if p.fantasy_team.is_empty() {
            continue;
        }
        let Some(amount) = contribution(p) else {
            continue;
        };
        match totals.iter_mut().find(|(team, _)| *team == p.fantasy_team) {
            Some((_, total)) => *total += amount,
            None => totals.push((p.fantasy_team.as_str(), amount)),
        }
    }
    totals
}

/// Team with the strictly largest total; the first team seen wins ties.
fn leading_team<'a>(totals: &[(&'a str, f64)]) -> Option<(&'a str, f64)> {
    let mut best: Option<(&str, f64)> = None;
    for &(team, total) in totals {
        if best.map_or(true, |(_, b)| total > b) {
            best = Some((team, total));
        }
    }
    best
}

/// Total bench points per team, in first-seen order.
pub fn bench_points_by_team(performances: &[PlayerPerformance]) -> Vec<(&str, f64)> {
    accumulate_by_team(performances, |p| p.is_bench.then_some(p.points))
}

fn aggregate_winner(performances: &[PlayerPerformance], aggregate: Aggregate) -> Option<String> {
    let totals = match aggregate {
        Aggregate::BenchTotal => bench_points_by_team(performances),
        Aggregate::StarterTotal => {
            accumulate_by_team(performances, |p| (!p.is_bench).then_some(p.points))
        }
        Aggregate::StartersAtLeast(threshold) => accumulate_by_team(performances, |p| {
            (!p.is_bench && p.points >= threshold).then_some(1.0)
        }),
        Aggregate::BenchAtLeast(threshold) => accumulate_by_team(performances, |p| {
            (p.is_bench && p.points >= threshold).then_some(1.0)
        }),
    };
    let (team, total) = leading_team(&totals)?;

    let text = match aggregate {
        Aggregate::BenchTotal => {
            format!("{team} – {} bench pts", format_points(round1(total)))
        }
        Aggregate::StarterTotal => {
            format!("{team} – {} starter pts", format_points(round1(total)))
        }
        Aggregate::StartersAtLeast(threshold) => {
            format!("{team} – {} starters with {threshold}+", total as u32)
        }
        Aggregate::BenchAtLeast(threshold) => {
            format!("{team} – {} bench players with {threshold}+", total as u32)
        }
    };
    Some(text)
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Resolve the winner of `key` for the week.
///
/// Unknown and placeholder keys resolve to an empty winner text.
pub fn compute_incentive_winner(
    key: &IncentiveKey,
    matchups: &[Matchup],
    summary: &IncentivesSummary,
    performances: &[PlayerPerformance],
) -> IncentiveResult {
    let winner = match strategy_for(key) {
        Strategy::TeamScore(extreme) => team_score_winner(matchups, extreme),
        Strategy::ClosestGame => margin_winner(summary.closest_game.as_ref()),
        Strategy::BiggestBlowout => margin_winner(summary.biggest_blowout.as_ref()),
        Strategy::Player(pool, filter) => best_player(performances, pool, filter).map(player_label),
        Strategy::Defense => best_player(performances, Pool::Starters, PositionFilter::Exact("D/ST"))
            .or_else(|| best_player(performances, Pool::Starters, PositionFilter::Exact("DST")))
            .map(player_label),
        Strategy::TeamAggregate(aggregate) => aggregate_winner(performances, aggregate),
        Strategy::NoWinner => None,
    };

    IncentiveResult {
        title: key.title(),
        winner_text: winner.unwrap_or_default(),
    }
}
