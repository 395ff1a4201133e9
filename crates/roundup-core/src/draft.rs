// Season draft board and per-team draft profiles.
//
// The provider hands over raw selections in draft order; this module attaches
// team details, groups picks by team, and labels each team's draft with a
// strategy and a letter grade from how its picks spread across rounds.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::league::LeagueTeam;

/// Last round counted as "early".
const EARLY_ROUND_MAX: u32 = 3;
/// First and last rounds counted as "middle".
const MID_ROUNDS: std::ops::RangeInclusive<u32> = 4..=8;
/// First round counted as "late".
const LATE_ROUND_MIN: u32 = 9;

const UNKNOWN_PLAYER: &str = "Unknown Player";
const UNKNOWN_TEAM: &str = "Unknown Team";

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// One selection as reported by the provider, in draft order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftSelection {
    pub round: u32,
    /// Position of the pick within its round, 1-based.
    pub round_pick: u32,
    pub player_id: Option<u64>,
    pub player_name: Option<String>,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub team_id: Option<u32>,
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A selection with its drafting team resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftPick {
    pub round: u32,
    pub round_pick: u32,
    /// 1-based index in draft order.
    pub overall_pick: u32,
    pub player_name: String,
    pub player_id: Option<u64>,
    pub position: Option<String>,
    pub nfl_team: Option<String>,
    pub team_id: Option<u32>,
    pub team_name: String,
    pub team_abbrev: Option<String>,
    pub team_logo: Option<String>,
    pub owner_name: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DraftStrategy {
    EarlyRoundFocus,
    BalancedApproach,
    LateRoundValue,
    MixedStrategy,
}

impl DraftStrategy {
    pub fn label(&self) -> &'static str {
        match self {
            DraftStrategy::EarlyRoundFocus => "Early Round Focus",
            DraftStrategy::BalancedApproach => "Balanced Approach",
            DraftStrategy::LateRoundValue => "Late Round Value",
            DraftStrategy::MixedStrategy => "Mixed Strategy",
        }
    }
}

impl fmt::Display for DraftStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DraftGrade {
    A,
    B,
    C,
    D,
}

impl fmt::Display for DraftGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            DraftGrade::A => "A",
            DraftGrade::B => "B",
            DraftGrade::C => "C",
            DraftGrade::D => "D",
        };
        f.write_str(letter)
    }
}

/// One team's picks and the profile derived from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamDraft {
    pub team_id: Option<u32>,
    pub team_name: String,
    pub team_abbrev: Option<String>,
    pub team_logo: Option<String>,
    pub picks: Vec<DraftPick>,
    pub total_picks: usize,
    /// Distinct rounds with a pick, ascending.
    pub rounds_covered: Vec<u32>,
    /// Distinct positions in pick order.
    pub positions_drafted: Vec<String>,
    pub strategy: DraftStrategy,
    pub grade: DraftGrade,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeDistribution {
    pub a: usize,
    pub b: usize,
    pub c: usize,
    pub d: usize,
}

impl GradeDistribution {
    fn record(&mut self, grade: DraftGrade) {
        match grade {
            DraftGrade::A => self.a += 1,
            DraftGrade::B => self.b += 1,
            DraftGrade::C => self.c += 1,
            DraftGrade::D => self.d += 1,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DraftAnalysis {
    pub total_teams: usize,
    pub grade_distribution: GradeDistribution,
}

/// The whole draft: every pick in order plus per-team breakdowns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftBoard {
    pub picks: Vec<DraftPick>,
    /// Teams in the order they first picked.
    pub team_drafts: Vec<TeamDraft>,
    /// Highest round number seen.
    pub rounds: u32,
    pub total_picks: usize,
    pub teams_count: usize,
    /// `None` when no draft has happened yet.
    pub analysis: Option<DraftAnalysis>,
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct RoundSpread {
    early: usize,
    mid: usize,
    late: usize,
}

impl RoundSpread {
    fn of(picks: &[DraftPick]) -> Self {
        let mut spread = RoundSpread::default();
        for p in picks {
            if p.round <= EARLY_ROUND_MAX {
                spread.early += 1;
            } else if MID_ROUNDS.contains(&p.round) {
                spread.mid += 1;
            } else if p.round >= LATE_ROUND_MIN {
                spread.late += 1;
            }
        }
        spread
    }
}

/// Strategy label and grade for one team's picks.
///
/// Rounds 1-3 are early, 4-8 middle, 9 and later late. The first matching
/// rule wins:
/// - strategy: 2+ early is early focus, 3+ middle is balanced, 4+ late is
///   late value, otherwise mixed.
/// - grade: A needs 2+ early and 2+ middle, B needs 1+ early and 2+ middle,
///   C needs 2+ middle, anything else is D.
pub fn classify_draft(picks: &[DraftPick]) -> (DraftStrategy, DraftGrade) {
    let RoundSpread { early, mid, late } = RoundSpread::of(picks);

    let strategy = if early >= 2 {
        DraftStrategy::EarlyRoundFocus
    } else if mid >= 3 {
        DraftStrategy::BalancedApproach
    } else if late >= 4 {
        DraftStrategy::LateRoundValue
    } else {
        DraftStrategy::MixedStrategy
    };

    let grade = if early >= 2 && mid >= 2 {
        DraftGrade::A
    } else if early >= 1 && mid >= 2 {
        DraftGrade::B
    } else if mid >= 2 {
        DraftGrade::C
    } else {
        DraftGrade::D
    };

    (strategy, grade)
}

// ---------------------------------------------------------------------------
// Board assembly
// ---------------------------------------------------------------------------

fn resolve_pick(index: usize, s: &DraftSelection, teams: &HashMap<u32, &LeagueTeam>) -> DraftPick {
    let team = s.team_id.and_then(|id| teams.get(&id).copied());
    DraftPick {
        round: s.round,
        round_pick: s.round_pick,
        overall_pick: index as u32 + 1,
        player_name: s
            .player_name
            .clone()
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNKNOWN_PLAYER.to_string()),
        player_id: s.player_id,
        position: s.position.clone(),
        nfl_team: s.nfl_team.clone(),
        team_id: s.team_id,
        team_name: team
            .map(|t| t.team_name.clone())
            .unwrap_or_else(|| UNKNOWN_TEAM.to_string()),
        team_abbrev: team.and_then(|t| t.abbreviation.clone()),
        team_logo: team.and_then(|t| t.logo_url.clone()),
        owner_name: team.and_then(|t| t.owner_name.clone()),
    }
}

fn team_draft(picks: Vec<DraftPick>) -> TeamDraft {
    let first = &picks[0];
    let (team_id, team_name, team_abbrev, team_logo) = (
        first.team_id,
        first.team_name.clone(),
        first.team_abbrev.clone(),
        first.team_logo.clone(),
    );

    let mut rounds_covered: Vec<u32> = picks.iter().map(|p| p.round).collect();
    rounds_covered.sort_unstable();
    rounds_covered.dedup();

    let mut positions_drafted: Vec<String> = Vec::new();
    for pos in picks.iter().filter_map(|p| p.position.as_deref()) {
        if !positions_drafted.iter().any(|seen| seen == pos) {
            positions_drafted.push(pos.to_string());
        }
    }

    let (strategy, grade) = classify_draft(&picks);
    TeamDraft {
        team_id,
        team_name,
        team_abbrev,
        team_logo,
        total_picks: picks.len(),
        picks,
        rounds_covered,
        positions_drafted,
        strategy,
        grade,
    }
}

/// Build the draft board from selections in draft order.
///
/// Picks whose team is not on the roster keep their team id under the name
/// "Unknown Team"; picks with no team id are grouped together.
pub fn build_draft_board(selections: &[DraftSelection], teams: &[LeagueTeam]) -> DraftBoard {
    let by_id: HashMap<u32, &LeagueTeam> = teams.iter().map(|t| (t.team_id, t)).collect();
    let picks: Vec<DraftPick> = selections
        .iter()
        .enumerate()
        .map(|(i, s)| resolve_pick(i, s, &by_id))
        .collect();

    let mut grouped: Vec<(Option<u32>, Vec<DraftPick>)> = Vec::new();
    for pick in &picks {
        match grouped.iter_mut().find(|(id, _)| *id == pick.team_id) {
            Some((_, team_picks)) => team_picks.push(pick.clone()),
            None => grouped.push((pick.team_id, vec![pick.clone()])),
        }
    }
    let team_drafts: Vec<TeamDraft> = grouped.into_iter().map(|(_, p)| team_draft(p)).collect();

    let analysis = (!picks.is_empty()).then(|| {
        let mut grade_distribution = GradeDistribution::default();
        for t in &team_drafts {
            grade_distribution.record(t.grade);
        }
        DraftAnalysis {
            total_teams: team_drafts.len(),
            grade_distribution,
        }
    });

    debug!(picks = picks.len(), teams = team_drafts.len(), "draft board built");
    DraftBoard {
        rounds: picks.iter().map(|p| p.round).max().unwrap_or(0),
        total_picks: picks.len(),
        teams_count: team_drafts.len(),
        picks,
        team_drafts,
        analysis,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::test_support::team;

    fn sel(round: u32, round_pick: u32, team_id: u32, name: &str, position: &str) -> DraftSelection {
        DraftSelection {
            round,
            round_pick,
            player_id: Some(u64::from(round * 100 + round_pick)),
            player_name: Some(name.into()),
            position: Some(position.into()),
            nfl_team: Some("KC".into()),
            team_id: Some(team_id),
        }
    }

    fn picks_in_rounds(rounds: &[u32]) -> Vec<DraftPick> {
        let selections: Vec<DraftSelection> = rounds
            .iter()
            .map(|&r| sel(r, 1, 1, "P", "RB"))
            .collect();
        build_draft_board(&selections, &[team(1, "Alpha")]).picks
    }

    #[test]
    fn classification_follows_round_spread() {
        assert_eq!(
            classify_draft(&picks_in_rounds(&[1, 2, 4, 5])),
            (DraftStrategy::EarlyRoundFocus, DraftGrade::A)
        );
        assert_eq!(
            classify_draft(&picks_in_rounds(&[3, 4, 6, 8])),
            (DraftStrategy::BalancedApproach, DraftGrade::B)
        );
        assert_eq!(
            classify_draft(&picks_in_rounds(&[5, 7, 9, 10, 11, 12])),
            (DraftStrategy::LateRoundValue, DraftGrade::C)
        );
        assert_eq!(
            classify_draft(&picks_in_rounds(&[1, 9, 10])),
            (DraftStrategy::MixedStrategy, DraftGrade::D)
        );
        assert_eq!(
            classify_draft(&[]),
            (DraftStrategy::MixedStrategy, DraftGrade::D)
        );
    }

    #[test]
    fn board_groups_picks_by_first_seen_team() {
        let mut alpha = team(1, "Alpha");
        alpha.owner_name = Some("Sam".into());
        let teams = vec![alpha, team(2, "Bravo")];
        let selections = vec![
            sel(1, 1, 2, "Runner", "RB"),
            sel(1, 2, 1, "Thrower", "QB"),
            sel(2, 1, 1, "Catcher", "WR"),
            sel(2, 2, 2, "Other Runner", "RB"),
        ];
        let board = build_draft_board(&selections, &teams);

        assert_eq!(board.total_picks, 4);
        assert_eq!(board.rounds, 2);
        assert_eq!(board.teams_count, 2);
        let overall: Vec<u32> = board.picks.iter().map(|p| p.overall_pick).collect();
        assert_eq!(overall, vec![1, 2, 3, 4]);
        assert_eq!(board.picks[1].owner_name.as_deref(), Some("Sam"));

        let bravo = &board.team_drafts[0];
        assert_eq!(bravo.team_name, "Bravo");
        assert_eq!(bravo.total_picks, 2);
        assert_eq!(bravo.rounds_covered, vec![1, 2]);
        assert_eq!(bravo.positions_drafted, vec!["RB"]);

        let alpha = &board.team_drafts[1];
        assert_eq!(alpha.positions_drafted, vec!["QB", "WR"]);
        assert_eq!(alpha.strategy, DraftStrategy::EarlyRoundFocus);
        assert_eq!(alpha.grade, DraftGrade::D);

        let analysis = board.analysis.unwrap();
        assert_eq!(analysis.total_teams, 2);
        assert_eq!(analysis.grade_distribution.d, 2);
    }

    #[test]
    fn unresolved_players_and_teams_get_placeholders() {
        let mut s = sel(1, 1, 9, "", "QB");
        s.player_name = None;
        let board = build_draft_board(&[s], &[team(1, "Alpha")]);

        assert_eq!(board.picks[0].player_name, "Unknown Player");
        assert_eq!(board.picks[0].team_name, "Unknown Team");
        assert_eq!(board.picks[0].team_id, Some(9));
        assert_eq!(board.team_drafts[0].team_logo, None);
    }

    #[test]
    fn empty_draft_has_no_analysis() {
        let board = build_draft_board(&[], &[team(1, "Alpha")]);

        assert!(board.picks.is_empty());
        assert!(board.team_drafts.is_empty());
        assert_eq!(board.rounds, 0);
        assert_eq!(board.analysis, None);
    }

    #[test]
    fn labels_render_for_display() {
        assert_eq!(DraftStrategy::LateRoundValue.to_string(), "Late Round Value");
        assert_eq!(DraftGrade::B.to_string(), "B");
    }
}
