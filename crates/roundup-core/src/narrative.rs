// Compact structured inputs for the external narrative writer.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::performance::PlayerPerformance;
use crate::scoreboard::{IncentivesSummary, Matchup};
use crate::standings::StandingsRow;

const STANDINGS_SHOWN: usize = 5;
const PLAYERS_SHOWN: usize = 3;
const FACTS_SHOWN: usize = 3;
/// Games decided by less than this are "close".
const CLOSE_MARGIN: f64 = 5.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompactGame {
    pub home: String,
    pub away: String,
    pub home_score: f64,
    pub away_score: f64,
    pub winner: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloseGame {
    pub home: String,
    pub away: String,
    pub margin: f64,
    pub winner: String,
}

/// Everything the narrative writer is given about a week.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NarrativeInputs {
    pub league_name: String,
    pub week: u32,
    pub scoreboard: Vec<CompactGame>,
    pub standings_top5: Vec<StandingsRow>,
    pub incentives: IncentivesSummary,
    pub top_players: Vec<PlayerPerformance>,
    pub close_games: Vec<CloseGame>,
    pub undefeated_teams: Vec<String>,
    pub first_wins: Vec<String>,
}

/// Teams with no wins in `previous` that have at least one now.
///
/// Teams absent from `previous` are not counted.
fn first_win_teams(standings: &[StandingsRow], previous: &[StandingsRow]) -> Vec<String> {
    let prev_wins: HashMap<u32, u32> = previous.iter().map(|s| (s.team_id, s.wins)).collect();
    standings
        .iter()
        .filter(|s| s.wins > 0 && prev_wins.get(&s.team_id) == Some(&0))
        .map(|s| s.team_name.clone())
        .take(FACTS_SHOWN)
        .collect()
}

pub fn build_narrative_inputs(
    league_name: &str,
    week: u32,
    matchups: &[Matchup],
    standings: &[StandingsRow],
    previous_standings: &[StandingsRow],
    summary: &IncentivesSummary,
    top_players: &[PlayerPerformance],
) -> NarrativeInputs {
    let scoreboard = matchups
        .iter()
        .map(|m| CompactGame {
            home: m.home_team.clone(),
            away: m.away_team.clone(),
            home_score: m.home_score,
            away_score: m.away_score,
            winner: m.winner.clone(),
        })
        .collect();

    let close_games = matchups
        .iter()
        .filter(|m| m.margin < CLOSE_MARGIN)
        .filter_map(|m| {
            let winner = m.winner.clone()?;
            Some(CloseGame {
                home: m.home_team.clone(),
                away: m.away_team.clone(),
                margin: m.margin,
                winner,
            })
        })
        .take(FACTS_SHOWN)
        .collect();

    let standings_top5: Vec<StandingsRow> =
        standings.iter().take(STANDINGS_SHOWN).cloned().collect();
    let undefeated_teams = standings_top5
        .iter()
        .filter(|s| s.losses == 0 && s.wins > 0)
        .map(|s| s.team_name.clone())
        .take(FACTS_SHOWN)
        .collect();

    NarrativeInputs {
        league_name: league_name.to_string(),
        week,
        scoreboard,
        standings_top5,
        incentives: summary.clone(),
        top_players: top_players.iter().take(PLAYERS_SHOWN).cloned().collect(),
        close_games,
        undefeated_teams,
        first_wins: first_win_teams(standings, previous_standings),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoreboard::test_support::{game, team};
    use crate::scoreboard::{normalize_scoreboard, summarize_incentives};
    use crate::standings::{compute_standings, previous_standings};

    #[test]
    fn derives_close_games_undefeated_and_first_wins() {
        let teams = vec![team(1, "A"), team(2, "B"), team(3, "C"), team(4, "D")];
        let weeks = vec![
            vec![
                game((1, "A", 100.0), (2, "B", 90.0)),
                game((3, "C", 80.0), (4, "D", 70.0)),
            ],
            vec![
                game((1, "A", 100.0), (3, "C", 90.0)),
                game((2, "B", 81.0), (4, "D", 78.5)),
            ],
        ];
        let matchups = normalize_scoreboard(&weeks[1]);
        let standings = compute_standings(&teams, &weeks, 2);
        let previous = previous_standings(&teams, &weeks, 2);
        let summary = summarize_incentives(&matchups);

        let inputs =
            build_narrative_inputs("League", 2, &matchups, &standings, &previous, &summary, &[]);

        assert_eq!(inputs.scoreboard.len(), 2);
        assert_eq!(inputs.close_games.len(), 1);
        assert_eq!(inputs.close_games[0].winner, "B");
        assert_eq!(inputs.undefeated_teams, vec!["A".to_string()]);
        assert_eq!(inputs.first_wins, vec!["B".to_string()]);
    }

    #[test]
    fn ties_are_not_close_games() {
        let matchups = normalize_scoreboard(&[game((1, "A", 50.0), (2, "B", 50.0))]);
        let inputs = build_narrative_inputs(
            "League",
            1,
            &matchups,
            &[],
            &[],
            &IncentivesSummary::default(),
            &[],
        );

        assert!(inputs.close_games.is_empty());
        assert!(inputs.first_wins.is_empty());
    }

    #[test]
    fn week_one_has_no_first_wins() {
        let teams = vec![team(1, "A"), team(2, "B")];
        let weeks = vec![vec![game((1, "A", 60.0), (2, "B", 50.0))]];
        let standings = compute_standings(&teams, &weeks, 1);

        let inputs = build_narrative_inputs(
            "League",
            1,
            &[],
            &standings,
            &previous_standings(&teams, &weeks, 1),
            &IncentivesSummary::default(),
            &[],
        );

        assert!(inputs.first_wins.is_empty());
        assert_eq!(inputs.undefeated_teams, vec!["A".to_string()]);
    }
}
