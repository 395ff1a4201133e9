// Scoreboard normalization: raw box scores to canonical matchups.

use serde::{Deserialize, Serialize};

use crate::league::{BoxScore, LeagueTeam};

/// Display name given to the side of a matchup that sat out the week.
pub const BYE_LABEL: &str = "Bye";

/// One side of a matchup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Side {
    Home,
    Away,
}

impl Side {
    pub fn opponent(self) -> Side {
        match self {
            Side::Home => Side::Away,
            Side::Away => Side::Home,
        }
    }
}

/// Borrowed view of one side of a [`Matchup`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SideView<'a> {
    pub id: Option<u32>,
    pub name: &'a str,
    pub owner: Option<&'a str>,
    pub score: f64,
}

/// One fantasy game in a week.
///
/// A `None` id marks a bye (or a team the provider did not identify); such
/// sides never take part in score superlatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matchup {
    pub home_id: Option<u32>,
    pub away_id: Option<u32>,
    pub home_team: String,
    pub away_team: String,
    pub home_logo: Option<String>,
    pub away_logo: Option<String>,
    #[serde(default)]
    pub home_owner: Option<String>,
    #[serde(default)]
    pub away_owner: Option<String>,
    pub home_score: f64,
    pub away_score: f64,
    pub margin: f64,
    pub winner: Option<String>,
}

impl Matchup {
    pub fn side(&self, side: Side) -> SideView<'_> {
        match side {
            Side::Home => SideView {
                id: self.home_id,
                name: &self.home_team,
                owner: self.home_owner.as_deref(),
                score: self.home_score,
            },
            Side::Away => SideView {
                id: self.away_id,
                name: &self.away_team,
                owner: self.away_owner.as_deref(),
                score: self.away_score,
            },
        }
    }

    /// Both sides, home first.
    pub fn sides(&self) -> [SideView<'_>; 2] {
        [self.side(Side::Home), self.side(Side::Away)]
    }

    /// The side with the strictly higher score, or `None` on a tie.
    pub fn winning_side(&self) -> Option<Side> {
        if self.home_score > self.away_score {
            Some(Side::Home)
        } else if self.away_score > self.home_score {
            Some(Side::Away)
        } else {
            None
        }
    }
}

// ---------------------------------------------------------------------------
// Normalization
// ---------------------------------------------------------------------------

struct RawSide {
    id: Option<u32>,
    name: String,
    logo: Option<String>,
    owner: Option<String>,
}

fn raw_side(team: Option<&LeagueTeam>, fallback: &str) -> RawSide {
    match team {
        Some(t) => RawSide {
            id: Some(t.team_id),
            name: t.team_name.clone(),
            logo: t.logo_url.clone(),
            owner: t.owner_name.clone(),
        },
        None => RawSide {
            id: None,
            name: fallback.to_string(),
            logo: None,
            owner: None,
        },
    }
}

fn mark_bye(side: &mut RawSide) {
    side.id = None;
    side.name = BYE_LABEL.to_string();
    side.logo = None;
    side.owner = None;
}

/// Sanitize a provider score: NaN and negative values count as zero.
fn clean_score(score: f64) -> f64 {
    if score.is_finite() && score > 0.0 {
        score
    } else {
        0.0
    }
}

/// Convert a week's box scores into matchups, one per box score, in order.
///
/// When one side scored exactly zero and the other scored something, the
/// zero side is relabelled as a bye with no id and no logo.
pub fn normalize_scoreboard(box_scores: &[BoxScore]) -> Vec<Matchup> {
    box_scores
        .iter()
        .map(|b| {
            let mut home = raw_side(b.home_team.as_ref(), "Home");
            let mut away = raw_side(b.away_team.as_ref(), "Away");
            let home_score = clean_score(b.home_score);
            let away_score = clean_score(b.away_score);

            if home_score == 0.0 && away_score > 0.0 {
                mark_bye(&mut home);
            } else if away_score == 0.0 && home_score > 0.0 {
                mark_bye(&mut away);
            }

            let diff = home_score - away_score;
            let winner = if diff > 0.0 {
                Some(home.name.clone())
            } else if diff < 0.0 {
                Some(away.name.clone())
            } else {
                None
            };

            Matchup {
                home_id: home.id,
                away_id: away.id,
                home_team: home.name,
                away_team: away.name,
                home_logo: home.logo,
                away_logo: away.logo,
                home_owner: home.owner,
                away_owner: away.owner,
                home_score,
                away_score,
                margin: diff.abs(),
                winner,
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Incentives summary
// ---------------------------------------------------------------------------

/// Compact description of a single game used by the summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameDescriptor {
    pub winner: Option<String>,
    pub loser: String,
    pub winner_score: f64,
    pub loser_score: f64,
    pub margin: f64,
}

impl GameDescriptor {
    fn from_matchup(m: &Matchup) -> Self {
        let loser = match m.winning_side() {
            Some(side) => m.side(side.opponent()).name.to_string(),
            // No winner: report the away side, matching the home-first
            // convention for the (absent) winner.
            None => m.away_team.clone(),
        };
        GameDescriptor {
            winner: m.winner.clone(),
            loser,
            winner_score: m.home_score.max(m.away_score),
            loser_score: m.home_score.min(m.away_score),
            margin: m.margin,
        }
    }
}

/// Highest-scoring, closest and most lopsided games of the week.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct IncentivesSummary {
    pub highest_score: Option<GameDescriptor>,
    pub closest_game: Option<GameDescriptor>,
    pub biggest_blowout: Option<GameDescriptor>,
}

/// First matchup whose key is strictly better than every earlier one.
fn first_extreme<F>(matchups: &[Matchup], key: F, want_max: bool) -> Option<&Matchup>
where
    F: Fn(&Matchup) -> f64,
{
    let mut best: Option<(&Matchup, f64)> = None;
    for m in matchups {
        let k = key(m);
        let better = match best {
            None => true,
            Some((_, b)) if want_max => k > b,
            Some((_, b)) => k < b,
        };
        if better {
            best = Some((m, k));
        }
    }
    best.map(|(m, _)| m)
}

/// Derive the incentives summary from a normalized scoreboard.
pub fn summarize_incentives(matchups: &[Matchup]) -> IncentivesSummary {
    let highest = first_extreme(matchups, |m| m.home_score.max(m.away_score), true);
    let closest = first_extreme(matchups, |m| m.margin, false);
    let blowout = first_extreme(matchups, |m| m.margin, true);

    IncentivesSummary {
        highest_score: highest.map(GameDescriptor::from_matchup),
        closest_game: closest.map(GameDescriptor::from_matchup),
        biggest_blowout: blowout.map(GameDescriptor::from_matchup),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;

    pub fn team(id: u32, name: &str) -> LeagueTeam {
        LeagueTeam {
            team_id: id,
            team_name: name.into(),
            abbreviation: None,
            logo_url: Some(format!("https://logos.example/{id}.png")),
            owner_name: None,
        }
    }

    pub fn game(home: (u32, &str, f64), away: (u32, &str, f64)) -> BoxScore {
        BoxScore {
            home_team: Some(team(home.0, home.1)),
            away_team: Some(team(away.0, away.1)),
            home_score: home.2,
            away_score: away.2,
            home_lineup: Vec::new(),
            away_lineup: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;

    fn approx_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn zero_home_score_becomes_bye() {
        let m = &normalize_scoreboard(&[game((1, "Alpha", 0.0), (2, "Bravo", 12.0))])[0];

        assert_eq!(m.home_team, "Bye");
        assert_eq!(m.home_id, None);
        assert_eq!(m.home_logo, None);
        assert_eq!(m.away_id, Some(2));
        assert_eq!(m.winner.as_deref(), Some("Bravo"));
        assert!(approx_eq(m.margin, 12.0));
    }

    #[test]
    fn zero_away_score_becomes_bye() {
        let m = &normalize_scoreboard(&[game((1, "Alpha", 101.5), (2, "Bravo", 0.0))])[0];

        assert_eq!(m.away_team, "Bye");
        assert_eq!(m.away_id, None);
        assert_eq!(m.winner.as_deref(), Some("Alpha"));
    }

    #[test]
    fn unplayed_game_keeps_both_teams() {
        let m = &normalize_scoreboard(&[game((1, "Alpha", 0.0), (2, "Bravo", 0.0))])[0];

        assert_eq!(m.home_id, Some(1));
        assert_eq!(m.away_id, Some(2));
        assert_eq!(m.winner, None);
        assert!(approx_eq(m.margin, 0.0));
    }

    #[test]
    fn tie_has_no_winner() {
        let m = &normalize_scoreboard(&[game((1, "Alpha", 88.2), (2, "Bravo", 88.2))])[0];
        assert_eq!(m.winner, None);
        assert_eq!(m.winning_side(), None);
    }

    #[test]
    fn preserves_input_order_and_missing_teams() {
        let mut orphan = game((1, "Alpha", 70.0), (2, "Bravo", 60.0));
        orphan.away_team = None;
        let boxes = vec![game((3, "Charlie", 90.0), (4, "Delta", 80.0)), orphan];

        let matchups = normalize_scoreboard(&boxes);
        assert_eq!(matchups.len(), 2);
        assert_eq!(matchups[0].home_team, "Charlie");
        assert_eq!(matchups[1].away_team, "Away");
        assert_eq!(matchups[1].away_id, None);
    }

    #[test]
    fn empty_week_yields_empty_scoreboard() {
        assert!(normalize_scoreboard(&[]).is_empty());
        assert_eq!(summarize_incentives(&[]), IncentivesSummary::default());
    }

    #[test]
    fn summary_picks_first_extremes() {
        let matchups = normalize_scoreboard(&[
            game((1, "Alpha", 120.0), (2, "Bravo", 100.0)),
            game((3, "Charlie", 95.0), (4, "Delta", 94.0)),
            game((5, "Echo", 130.0), (6, "Foxtrot", 70.0)),
            game((7, "Golf", 81.0), (8, "Hotel", 80.0)),
        ]);

        let summary = summarize_incentives(&matchups);

        let highest = summary.highest_score.unwrap();
        assert_eq!(highest.winner.as_deref(), Some("Echo"));
        assert!(approx_eq(highest.winner_score, 130.0));

        // Charlie and Golf both won by 1.0; the first one listed wins.
        let closest = summary.closest_game.unwrap();
        assert_eq!(closest.winner.as_deref(), Some("Charlie"));
        assert_eq!(closest.loser, "Delta");

        let blowout = summary.biggest_blowout.unwrap();
        assert_eq!(blowout.winner.as_deref(), Some("Echo"));
        assert!(approx_eq(blowout.margin, 60.0));
    }
}
