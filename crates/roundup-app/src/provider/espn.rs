// ESPN fantasy football v3 read API client.
//
// Three requests cover everything the engine needs: league settings/teams, a
// per-week matchup payload with box-score rosters, and the draft. Payload parsing is kept
// in pure functions so recorded responses can be replayed in tests.

use std::collections::HashMap;

use async_trait::async_trait;
use reqwest::header::COOKIE;
use reqwest::StatusCode;
use roundup_core::draft::DraftSelection;
use roundup_core::league::{BoxScore, LeagueTeam, LineupEntry, SeasonBounds};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::{LeagueProvider, LeagueSnapshot, ProviderError};
use crate::config::{Config, CredentialsConfig};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

const LEAGUE_VIEWS: &[&str] = &["mTeam", "mSettings", "mStatus"];
const BOX_SCORE_VIEWS: &[&str] = &["mTeam", "mMatchupScore", "mBoxscore"];
const DRAFT_VIEWS: &[&str] = &["mDraftDetail", "mRoster", "mTeam"];

/// Used when the season status omits its final scoring period.
const DEFAULT_FINAL_WEEK: u32 = 18;

/// Lineup slot code for an ESPN `lineupSlotId`.
pub fn slot_code(slot_id: u32) -> &'static str {
    match slot_id {
        0 => "QB",
        1 => "TQB",
        2 => "RB",
        3 => "RB/WR",
        4 => "WR",
        5 => "WR/TE",
        6 => "TE",
        7 => "OP",
        8 => "DT",
        9 => "DE",
        10 => "LB",
        11 => "DL",
        12 => "CB",
        13 => "S",
        14 => "DB",
        15 => "DP",
        16 => "D/ST",
        17 => "K",
        18 => "P",
        19 => "HC",
        20 => "BE",
        21 => "IR",
        23 => "FLEX",
        _ => "UNK",
    }
}

/// Position code for an ESPN `defaultPositionId`.
pub fn position_code(position_id: u32) -> &'static str {
    match position_id {
        1 => "QB",
        2 => "RB",
        3 => "WR",
        4 => "TE",
        5 => "K",
        7 => "P",
        9 => "DT",
        10 => "DE",
        11 => "LB",
        12 => "CB",
        13 => "S",
        14 => "HC",
        16 => "D/ST",
        _ => "UNK",
    }
}

/// NFL club code for an ESPN `proTeamId`; free agents (0) have none.
pub fn pro_team_code(pro_team_id: u32) -> Option<&'static str> {
    let code = match pro_team_id {
        1 => "ATL",
        2 => "BUF",
        3 => "CHI",
        4 => "CIN",
        5 => "CLE",
        6 => "DAL",
        7 => "DEN",
        8 => "DET",
        9 => "GB",
        10 => "TEN",
        11 => "IND",
        12 => "KC",
        13 => "LV",
        14 => "LAR",
        15 => "MIA",
        16 => "MIN",
        17 => "NE",
        18 => "NO",
        19 => "NYG",
        20 => "NYJ",
        21 => "PHI",
        22 => "ARI",
        23 => "PIT",
        24 => "LAC",
        25 => "SF",
        26 => "SEA",
        27 => "TB",
        28 => "WSH",
        29 => "CAR",
        30 => "JAX",
        33 => "BAL",
        34 => "HOU",
        _ => return None,
    };
    Some(code)
}

// ---------------------------------------------------------------------------
// Payload structures
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct LeaguePayload {
    #[serde(default)]
    settings: Option<SettingsPayload>,
    #[serde(default)]
    status: Option<StatusPayload>,
    #[serde(default)]
    teams: Vec<TeamPayload>,
    #[serde(default)]
    members: Vec<MemberPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SettingsPayload {
    #[serde(default)]
    name: String,
    #[serde(default)]
    schedule_settings: Option<ScheduleSettingsPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleSettingsPayload {
    matchup_period_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StatusPayload {
    first_scoring_period: Option<u32>,
    final_scoring_period: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct TeamPayload {
    id: u32,
    #[serde(default)]
    abbrev: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    nickname: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    owners: Vec<String>,
    #[serde(default)]
    roster: Option<RosterPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MemberPayload {
    id: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MatchupPayload {
    #[serde(default)]
    teams: Vec<TeamPayload>,
    #[serde(default)]
    members: Vec<MemberPayload>,
    #[serde(default)]
    schedule: Vec<ScheduleEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleEntry {
    matchup_period_id: Option<u32>,
    #[serde(default)]
    home: Option<MatchupSide>,
    #[serde(default)]
    away: Option<MatchupSide>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MatchupSide {
    team_id: u32,
    #[serde(default)]
    total_points: Option<Value>,
    #[serde(default)]
    total_points_live: Option<Value>,
    #[serde(default)]
    roster_for_current_scoring_period: Option<RosterPayload>,
}

#[derive(Debug, Deserialize)]
struct RosterPayload {
    #[serde(default)]
    entries: Vec<RosterEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RosterEntry {
    #[serde(default)]
    player_id: Option<u64>,
    lineup_slot_id: Option<u32>,
    #[serde(default)]
    player_pool_entry: Option<PlayerPoolEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerPoolEntry {
    #[serde(default)]
    applied_stat_total: Option<Value>,
    #[serde(default)]
    player: Option<PlayerPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PlayerPayload {
    #[serde(default)]
    id: Option<u64>,
    #[serde(default)]
    full_name: String,
    default_position_id: Option<u32>,
    pro_team_id: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftPayload {
    #[serde(default)]
    draft_detail: Option<DraftDetailPayload>,
    #[serde(default)]
    teams: Vec<TeamPayload>,
}

#[derive(Debug, Deserialize)]
struct DraftDetailPayload {
    #[serde(default)]
    picks: Vec<DraftPickPayload>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DraftPickPayload {
    #[serde(default)]
    overall_pick_number: Option<u32>,
    #[serde(default)]
    round_id: u32,
    #[serde(default)]
    round_pick_number: u32,
    #[serde(default)]
    player_id: Option<i64>,
    #[serde(default)]
    team_id: Option<u32>,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Read a numeric field that ESPN sometimes sends as a string.
///
/// Missing and null values are `None`; anything unparseable becomes 0.0 and
/// is logged.
fn coerce_points(value: Option<&Value>, field: &str) -> Option<f64> {
    match value? {
        Value::Null => None,
        Value::Number(n) => Some(n.as_f64().unwrap_or(0.0)),
        Value::String(s) => match s.trim().parse::<f64>() {
            Ok(v) if v.is_finite() => Some(v),
            _ => {
                warn!(field, raw = %s, "malformed numeric field, using 0.0");
                Some(0.0)
            }
        },
        other => {
            warn!(field, raw = %other, "malformed numeric field, using 0.0");
            Some(0.0)
        }
    }
}

fn member_names(members: &[MemberPayload]) -> HashMap<&str, String> {
    members
        .iter()
        .filter_map(|m| {
            let display = m.display_name.clone().filter(|n| !n.trim().is_empty());
            let full = || {
                let joined = format!(
                    "{} {}",
                    m.first_name.as_deref().unwrap_or(""),
                    m.last_name.as_deref().unwrap_or("")
                );
                let joined = joined.trim().to_string();
                (!joined.is_empty()).then_some(joined)
            };
            display.or_else(full).map(|name| (m.id.as_str(), name))
        })
        .collect()
}

fn league_teams(teams: &[TeamPayload], members: &[MemberPayload]) -> Vec<LeagueTeam> {
    let names = member_names(members);
    teams
        .iter()
        .map(|t| {
            let team_name = t
                .name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| {
                    let joined = format!(
                        "{} {}",
                        t.location.as_deref().unwrap_or(""),
                        t.nickname.as_deref().unwrap_or("")
                    );
                    let joined = joined.trim();
                    if joined.is_empty() {
                        format!("Team {}", t.id)
                    } else {
                        joined.to_string()
                    }
                });
            LeagueTeam {
                team_id: t.id,
                team_name,
                abbreviation: t.abbrev.clone(),
                logo_url: t.logo.clone().filter(|l| !l.is_empty()),
                owner_name: t
                    .owners
                    .first()
                    .and_then(|owner| names.get(owner.as_str()).cloned()),
            }
        })
        .collect()
}

/// Parse a league settings payload (`mTeam`, `mSettings`, `mStatus` views).
pub fn parse_league(body: &str) -> Result<LeagueSnapshot, ProviderError> {
    let payload: LeaguePayload = serde_json::from_str(body)?;

    let name = payload
        .settings
        .as_ref()
        .map(|s| s.name.clone())
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| "Fantasy League".to_string());

    let first = payload
        .status
        .as_ref()
        .and_then(|s| s.first_scoring_period)
        .unwrap_or(1)
        .max(1);
    let last = payload
        .status
        .as_ref()
        .and_then(|s| s.final_scoring_period)
        .unwrap_or(DEFAULT_FINAL_WEEK);
    let mut bounds = SeasonBounds::new(first, last);
    if let Some(count) = payload
        .settings
        .as_ref()
        .and_then(|s| s.schedule_settings.as_ref())
        .and_then(|s| s.matchup_period_count)
    {
        bounds.regular_season_weeks = count.min(bounds.regular_season_weeks);
    }

    Ok(LeagueSnapshot {
        name,
        teams: league_teams(&payload.teams, &payload.members),
        bounds,
    })
}

fn lineup(side: &MatchupSide) -> Vec<LineupEntry> {
    let Some(roster) = &side.roster_for_current_scoring_period else {
        return Vec::new();
    };
    roster
        .entries
        .iter()
        .filter_map(|entry| {
            let pool = entry.player_pool_entry.as_ref()?;
            let player = pool.player.as_ref()?;
            Some(LineupEntry {
                name: player.full_name.clone(),
                position: player
                    .default_position_id
                    .map(position_code)
                    .unwrap_or("UNK")
                    .to_string(),
                pro_team: player
                    .pro_team_id
                    .and_then(pro_team_code)
                    .map(str::to_string),
                points: coerce_points(pool.applied_stat_total.as_ref(), "appliedStatTotal"),
                slot_position: entry
                    .lineup_slot_id
                    .map(slot_code)
                    .unwrap_or("UNK")
                    .to_string(),
            })
        })
        .collect()
}

fn side_score(side: &MatchupSide) -> f64 {
    coerce_points(side.total_points_live.as_ref(), "totalPointsLive")
        .or_else(|| coerce_points(side.total_points.as_ref(), "totalPoints"))
        .unwrap_or(0.0)
}

/// Parse a week's matchup payload (`mTeam`, `mMatchupScore`, `mBoxscore`
/// views) into box scores for `week`.
///
/// Entries from other matchup periods are dropped. A matchup with no away
/// side is a bye week for the home team.
pub fn parse_box_scores(body: &str, week: u32) -> Result<Vec<BoxScore>, ProviderError> {
    let payload: MatchupPayload = serde_json::from_str(body)?;
    let teams: HashMap<u32, LeagueTeam> = league_teams(&payload.teams, &payload.members)
        .into_iter()
        .map(|t| (t.team_id, t))
        .collect();
    let team = |side: &MatchupSide| {
        teams.get(&side.team_id).cloned().or_else(|| {
            warn!(team_id = side.team_id, "matchup references unknown team");
            None
        })
    };

    let box_scores: Vec<BoxScore> = payload
        .schedule
        .iter()
        .filter(|e| e.matchup_period_id == Some(week))
        .map(|e| BoxScore {
            home_team: e.home.as_ref().and_then(&team),
            away_team: e.away.as_ref().and_then(&team),
            home_score: e.home.as_ref().map(side_score).unwrap_or(0.0),
            away_score: e.away.as_ref().map(side_score).unwrap_or(0.0),
            home_lineup: e.home.as_ref().map(lineup).unwrap_or_default(),
            away_lineup: e.away.as_ref().map(lineup).unwrap_or_default(),
        })
        .collect();

    debug!(week, box_scores = box_scores.len(), "parsed ESPN box scores");
    Ok(box_scores)
}

/// Player details known from current rosters, keyed by ESPN player id.
fn rostered_players(teams: &[TeamPayload]) -> HashMap<u64, &PlayerPayload> {
    teams
        .iter()
        .filter_map(|t| t.roster.as_ref())
        .flat_map(|r| r.entries.iter())
        .filter_map(|entry| {
            let player = entry.player_pool_entry.as_ref()?.player.as_ref()?;
            let id = entry.player_id.or(player.id)?;
            Some((id, player))
        })
        .collect()
}

/// Parse a draft payload (`mDraftDetail`, `mRoster`, `mTeam` views) into
/// selections in draft order.
///
/// Names, positions and NFL teams come from current rosters, so players no
/// longer rostered anywhere have none. Negative player ids (ESPN's marker for
/// an empty keeper slot) are treated as missing.
pub fn parse_draft(body: &str) -> Result<Vec<DraftSelection>, ProviderError> {
    let payload: DraftPayload = serde_json::from_str(body)?;
    let players = rostered_players(&payload.teams);

    let mut picks: Vec<&DraftPickPayload> = payload
        .draft_detail
        .as_ref()
        .map(|d| d.picks.iter().collect())
        .unwrap_or_default();
    picks.sort_by_key(|p| p.overall_pick_number.unwrap_or(u32::MAX));

    let selections: Vec<DraftSelection> = picks
        .into_iter()
        .map(|p| {
            let player_id = p.player_id.and_then(|id| u64::try_from(id).ok());
            let player = player_id.and_then(|id| players.get(&id).copied());
            DraftSelection {
                round: p.round_id,
                round_pick: p.round_pick_number,
                player_id,
                player_name: player
                    .map(|pl| pl.full_name.clone())
                    .filter(|n| !n.is_empty()),
                position: player
                    .and_then(|pl| pl.default_position_id)
                    .map(|id| position_code(id).to_string()),
                nfl_team: player
                    .and_then(|pl| pl.pro_team_id)
                    .and_then(pro_team_code)
                    .map(str::to_string),
                team_id: p.team_id,
            }
        })
        .collect();

    debug!(picks = selections.len(), "parsed ESPN draft");
    Ok(selections)
}

// ---------------------------------------------------------------------------
// EspnClient
// ---------------------------------------------------------------------------

/// HTTP client for one ESPN league season.
pub struct EspnClient {
    http: reqwest::Client,
    base_url: String,
    league_id: u64,
    year: i32,
    credentials: CredentialsConfig,
}

impl EspnClient {
    pub fn new(base_url: &str, league_id: u64, year: i32, credentials: &CredentialsConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            league_id,
            year,
            credentials: credentials.clone(),
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(
            &config.espn.base_url,
            config.league.league_id,
            config.season_year(),
            &config.credentials,
        )
    }

    fn league_url(&self) -> String {
        format!(
            "{}/seasons/{}/segments/0/leagues/{}",
            self.base_url, self.year, self.league_id
        )
    }

    fn cookie_header(&self) -> Option<String> {
        if !self.credentials.is_complete() {
            return None;
        }
        let swid = self.credentials.espn_swid.as_deref()?.trim();
        let s2 = self.credentials.espn_s2.as_deref()?.trim();
        Some(format!("SWID={swid}; espn_s2={s2}"))
    }

    async fn fetch(&self, views: &[&str], week: Option<u32>) -> Result<String, ProviderError> {
        let mut query: Vec<(&str, String)> = views.iter().map(|v| ("view", v.to_string())).collect();
        if let Some(week) = week {
            query.push(("scoringPeriodId", week.to_string()));
        }

        let mut request = self.http.get(self.league_url()).query(&query);
        let cookie = self.cookie_header();
        if let Some(cookie) = &cookie {
            request = request.header(COOKIE, cookie);
        }

        let response = request.send().await?;
        let status = response.status();
        debug!(status = status.as_u16(), ?week, "ESPN response");

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            if cookie.is_none() {
                return Err(ProviderError::MissingCredentials);
            }
            return Err(ProviderError::Unauthorized {
                status: status.as_u16(),
            });
        }
        if !status.is_success() {
            return Err(ProviderError::UnexpectedStatus {
                status: status.as_u16(),
            });
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl LeagueProvider for EspnClient {
    async fn league(&self) -> Result<LeagueSnapshot, ProviderError> {
        let body = self.fetch(LEAGUE_VIEWS, None).await?;
        let snapshot = parse_league(&body)?;
        info!(
            league = %snapshot.name,
            teams = snapshot.teams.len(),
            "loaded ESPN league"
        );
        Ok(snapshot)
    }

    async fn box_scores(&self, week: u32) -> Result<Vec<BoxScore>, ProviderError> {
        let body = self.fetch(BOX_SCORE_VIEWS, Some(week)).await?;
        parse_box_scores(&body, week)
    }

    async fn draft(&self) -> Result<Vec<DraftSelection>, ProviderError> {
        let body = self.fetch(DRAFT_VIEWS, None).await?;
        parse_draft(&body)
    }
}
