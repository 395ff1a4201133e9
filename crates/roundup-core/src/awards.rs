// Fixed weekly awards, computed every week alongside the rotating incentive.
//
// Each award appears only when at least one matchup or team qualifies, so
// the list may be shorter than the five possible awards (or empty).

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::format_points;
use crate::incentives::resolver::bench_points_by_team;
use crate::performance::PlayerPerformance;
use crate::round1;
use crate::scoreboard::{Matchup, SideView};
use crate::standings::StandingsRow;

/// A titled award line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    pub title: String,
    pub text: String,
}

impl Award {
    fn new(title: &str, text: String) -> Self {
        Award {
            title: title.to_string(),
            text,
        }
    }
}

fn named(side: &SideView<'_>) -> String {
    match side.owner {
        Some(o) if !o.is_empty() => format!("{} ({o})", side.name),
        _ => side.name.to_string(),
    }
}

/// Winner and loser views of every game with a winner, byes included.
///
/// The winner of a bye game always has an id; only the losing side can be the
/// bye.
fn decided_games(matchups: &[Matchup]) -> impl Iterator<Item = (&Matchup, SideView<'_>, SideView<'_>)> {
    matchups.iter().filter_map(|m| {
        let side = m.winning_side()?;
        Some((m, m.side(side), m.side(side.opponent())))
    })
}

fn manager_of_the_week(matchups: &[Matchup]) -> Option<Award> {
    let mut best: Option<SideView<'_>> = None;
    for side in matchups.iter().flat_map(|m| m.sides()) {
        if side.id.is_none() {
            continue;
        }
        if best.map_or(true, |b| side.score > b.score) {
            best = Some(side);
        }
    }
    let best = best?;
    Some(Award::new(
        "Manager of the Week",
        format!("{} – {} points", named(&best), format_points(round1(best.score))),
    ))
}

fn squeaker(matchups: &[Matchup]) -> Option<Award> {
    let mut lowest: Option<SideView<'_>> = None;
    for (_, winner, _) in decided_games(matchups) {
        if lowest.map_or(true, |l| winner.score < l.score) {
            lowest = Some(winner);
        }
    }
    let lowest = lowest?;
    Some(Award::new(
        "Squeaker",
        format!(
            "Lowest winning score: {} – {}",
            named(&lowest),
            format_points(round1(lowest.score))
        ),
    ))
}

fn heartbreaker(matchups: &[Matchup]) -> Option<Award> {
    let mut closest: Option<(f64, SideView<'_>, SideView<'_>)> = None;
    for (m, winner, loser) in decided_games(matchups) {
        if closest.map_or(true, |(margin, _, _)| m.margin < margin) {
            closest = Some((m.margin, winner, loser));
        }
    }
    let (margin, winner, loser) = closest?;
    Some(Award::new(
        "Heartbreaker",
        format!(
            "{} lost to {} by {}",
            named(&loser),
            named(&winner),
            format_points(round1(margin))
        ),
    ))
}

fn giant_killer(matchups: &[Matchup], standings: &[StandingsRow]) -> Option<Award> {
    let rank_by_id: HashMap<u32, u32> = standings.iter().map(|s| (s.team_id, s.rank)).collect();
    let rank_of = |side: &SideView<'_>| side.id.and_then(|id| rank_by_id.get(&id).copied());

    let mut upset: Option<(u32, SideView<'_>, SideView<'_>)> = None;
    // A bye loser has no id, hence no rank, and is skipped here.
    for (_, winner, loser) in decided_games(matchups) {
        let (Some(w_rank), Some(l_rank)) = (rank_of(&winner), rank_of(&loser)) else {
            continue;
        };
        // A larger rank number is a worse position.
        if w_rank <= l_rank {
            continue;
        }
        let delta = w_rank - l_rank;
        if upset.map_or(true, |(best, _, _)| delta > best) {
            upset = Some((delta, winner, loser));
        }
    }
    let (delta, winner, loser) = upset?;
    Some(Award::new(
        "Giant Killer",
        format!(
            "{} upset {} (by ranking, +{delta})",
            named(&winner),
            named(&loser)
        ),
    ))
}

fn bench_blunder(performances: &[PlayerPerformance], standings: &[StandingsRow]) -> Option<Award> {
    let totals = bench_points_by_team(performances);
    let mut best: Option<(&str, f64)> = None;
    for &(team, total) in &totals {
        if best.map_or(true, |(_, b)| total > b) {
            best = Some((team, total));
        }
    }
    let (team, total) = best?;

    let owner = standings
        .iter()
        .find(|s| s.team_name == team)
        .and_then(|s| s.owner_name.as_deref())
        .filter(|o| !o.is_empty());
    let label = match owner {
        Some(o) => format!("{team} ({o})"),
        None => team.to_string(),
    };
    Some(Award::new(
        "Bench Blunder",
        format!(
            "{label} – {} points left on bench",
            format_points(round1(total))
        ),
    ))
}

/// Compute the week's awards in display order.
pub fn compute_weekly_awards(
    matchups: &[Matchup],
    standings: &[StandingsRow],
    performances: &[PlayerPerformance],
) -> Vec<Award> {
    [
        manager_of_the_week(matchups),
        squeaker(matchups),
        heartbreaker(matchups),
        giant_killer(matchups, standings),
        bench_blunder(performances, standings),
    ]
    .into_iter()
    .flatten()
    .collect()
}
