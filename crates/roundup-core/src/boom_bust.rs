// Per-position boom/bust table.
//
// For each reported position, pools the week's starters at that position and
// keeps the three best (booms) and three worst (busts) games.

use serde::{Deserialize, Serialize};

use crate::leaders::compute_position_leaders;
use crate::performance::PlayerPerformance;
use crate::position::{nfl_logo_url, Position};

/// How many players each side of a row shows.
const ROW_DEPTH: usize = 3;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A player as shown in a boom/bust row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoomBustEntry {
    pub player_name: String,
    pub points: f64,
    pub fantasy_team: String,
    pub nfl_team: Option<String>,
    pub nfl_logo: Option<String>,
}

impl BoomBustEntry {
    fn project(p: &PlayerPerformance) -> Self {
        BoomBustEntry {
            player_name: p.player_name.clone(),
            points: p.points,
            fantasy_team: p.fantasy_team.clone(),
            nfl_team: p.nfl_team.clone(),
            nfl_logo: p.nfl_team.as_deref().and_then(nfl_logo_url),
        }
    }
}

/// Booms and busts for one position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoomBustRow {
    /// Display code, e.g. `QB` or `D/ST`.
    pub position: String,
    /// Highest scorers first.
    pub booms: Vec<BoomBustEntry>,
    /// Lowest scorers first.
    pub busts: Vec<BoomBustEntry>,
}

// ---------------------------------------------------------------------------
// Core computation
// ---------------------------------------------------------------------------

/// Compute one row per requested position, in the order given.
///
/// Each row is the position's three best starters (booms, descending) and
/// three worst (busts, ascending); see [`compute_position_leaders`] for
/// alias handling and tie order.
pub fn compute_boom_bust(
    performances: &[PlayerPerformance],
    positions: &[Position],
) -> Vec<BoomBustRow> {
    compute_position_leaders(performances, positions, ROW_DEPTH, ROW_DEPTH)
        .into_iter()
        .map(|leaders| BoomBustRow {
            position: leaders.position,
            booms: leaders.best.iter().map(BoomBustEntry::project).collect(),
            busts: leaders.busts.iter().map(BoomBustEntry::project).collect(),
        })
        .collect()
}

/// [`compute_boom_bust`] over the default QB, RB, WR, TE, K and D/ST rows.
pub fn compute_default_boom_bust(performances: &[PlayerPerformance]) -> Vec<BoomBustRow> {
    compute_boom_bust(performances, Position::DEFAULT_REPORTED)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::performance::test_support::perf;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn points(entries: &[BoomBustEntry]) -> Vec<f64> {
        entries.iter().map(|e| e.points).collect()
    }

    #[test]
    fn qb_booms_descend_and_busts_ascend() {
        let perfs = vec![
            perf("Q1", "QB", "A", 28.4, false),
            perf("Q2", "QB", "B", 14.0, false),
            perf("Q3", "QB", "C", 9.5, false),
            perf("Q4", "QB", "D", 31.2, false),
        ];
        let rows = compute_boom_bust(&perfs, &[Position::Quarterback]);

        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].position, "QB");
        assert_eq!(points(&rows[0].booms), vec![31.2, 28.4, 14.0]);
        assert_eq!(points(&rows[0].busts), vec![9.5, 14.0, 28.4]);
    }

    #[test]
    fn bench_players_are_excluded() {
        let perfs = vec![
            perf("Starter", "RB", "A", 8.0, false),
            perf("Benched", "RB", "A", 40.0, true),
        ];
        let rows = compute_boom_bust(&perfs, &[Position::RunningBack]);

        assert_eq!(rows[0].booms.len(), 1);
        assert_eq!(rows[0].booms[0].player_name, "Starter");
        assert!(approx_eq(rows[0].busts[0].points, 8.0));
    }

    #[test]
    fn defense_aliases_share_a_row() {
        let perfs = vec![
            perf("Bills D/ST", "D/ST", "A", 12.0, false),
            perf("Jets DST", "DST", "B", 3.0, false),
            perf("Ravens DEF", "DEF", "C", 7.0, false),
        ];
        let rows = compute_boom_bust(&perfs, &[Position::Defense]);

        assert_eq!(rows[0].position, "D/ST");
        let names: Vec<&str> = rows[0].booms.iter().map(|e| e.player_name.as_str()).collect();
        assert_eq!(names, vec!["Bills D/ST", "Ravens DEF", "Jets DST"]);
    }

    #[test]
    fn idp_and_punter_codes_get_their_own_rows() {
        let perfs = vec![
            perf("Linebacker", "LB", "A", 11.0, false),
            perf("Safety", "DB", "B", 6.5, false),
            perf("Punter", "P", "C", 4.0, false),
        ];
        let positions: Vec<Position> = ["lb", "DB", "P"]
            .iter()
            .filter_map(|c| Position::from_code(c))
            .collect();
        let rows = compute_boom_bust(&perfs, &positions);

        let labels: Vec<&str> = rows.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(labels, vec!["LB", "DB", "P"]);
        assert_eq!(rows[0].booms[0].player_name, "Linebacker");
        assert_eq!(rows[1].busts[0].player_name, "Safety");
        assert_eq!(rows[2].booms.len(), 1);
    }

    #[test]
    fn empty_week_yields_one_empty_row_per_default_position() {
        let rows = compute_default_boom_bust(&[]);

        let positions: Vec<&str> = rows.iter().map(|r| r.position.as_str()).collect();
        assert_eq!(positions, vec!["QB", "RB", "WR", "TE", "K", "D/ST"]);
        assert!(rows.iter().all(|r| r.booms.is_empty() && r.busts.is_empty()));
    }

    #[test]
    fn ties_keep_performance_order() {
        let perfs = vec![
            perf("First", "WR", "A", 10.0, false),
            perf("Second", "WR", "B", 10.0, false),
        ];
        let rows = compute_boom_bust(&perfs, &[Position::WideReceiver]);

        assert_eq!(rows[0].booms[0].player_name, "First");
        assert_eq!(rows[0].busts[0].player_name, "First");
    }

    #[test]
    fn entries_carry_nfl_logo() {
        let perfs = vec![perf("K1", "K", "A", 9.0, false)];
        let rows = compute_boom_bust(&perfs, &[Position::Kicker]);

        assert_eq!(rows[0].booms[0].nfl_team.as_deref(), Some("KC"));
        assert_eq!(
            rows[0].booms[0].nfl_logo.as_deref(),
            Some("https://static.www.nfl.com/league/api/clubs/logos/KC.svg")
        );
    }
}
