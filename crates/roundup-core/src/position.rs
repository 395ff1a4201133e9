// Football position codes, lineup slot classification, and pro-team logos.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Lineup slot codes
// ---------------------------------------------------------------------------

/// Slot codes whose occupants did not count toward the team score.
pub const BENCH_SLOTS: &[&str] = &["BE", "IR", "IR-R", "OUT", "RES"];

/// Whether a lineup slot code is a bench/reserve slot.
pub fn is_bench_slot(slot: &str) -> bool {
    let upper = slot.trim().to_uppercase();
    BENCH_SLOTS.contains(&upper.as_str())
}

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// Football positions reported on in the weekly roundup.
///
/// Codes outside the offensive and kicking positions (IDP codes such as `LB`
/// or `DB`, punters) are carried as `Other` with their upper-cased code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    Quarterback,
    RunningBack,
    WideReceiver,
    TightEnd,
    Kicker,
    Defense,
    Other(String),
}

impl Position {
    /// Positions covered by the boom/bust table when the caller names none.
    pub const DEFAULT_REPORTED: &'static [Position] = &[
        Position::Quarterback,
        Position::RunningBack,
        Position::WideReceiver,
        Position::TightEnd,
        Position::Kicker,
        Position::Defense,
    ];

    /// Parse a provider position code. Returns `None` only for a blank code.
    ///
    /// Team defense shows up as "D/ST", "DST", "DEF", "D-ST" or "D ST"
    /// depending on the provider and season; all of them map to `Defense`.
    pub fn from_code(code: &str) -> Option<Self> {
        let upper = code.trim().to_uppercase();
        let pos = match upper.as_str() {
            "" => return None,
            "QB" => Position::Quarterback,
            "RB" => Position::RunningBack,
            "WR" => Position::WideReceiver,
            "TE" => Position::TightEnd,
            "K" => Position::Kicker,
            "D/ST" | "DST" | "DEF" | "D-ST" | "D ST" => Position::Defense,
            _ => Position::Other(upper),
        };
        Some(pos)
    }

    /// Display code for this position.
    pub fn code(&self) -> &str {
        match self {
            Position::Quarterback => "QB",
            Position::RunningBack => "RB",
            Position::WideReceiver => "WR",
            Position::TightEnd => "TE",
            Position::Kicker => "K",
            Position::Defense => "D/ST",
            Position::Other(code) => code,
        }
    }

    /// Whether this position can fill a FLEX (RB/WR/TE) slot.
    pub fn is_flex_eligible(&self) -> bool {
        matches!(
            self,
            Position::RunningBack | Position::WideReceiver | Position::TightEnd
        )
    }

    /// Whether a raw provider code names this position.
    pub fn matches_code(&self, code: &str) -> bool {
        Position::from_code(code).as_ref() == Some(self)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ---------------------------------------------------------------------------
// NFL team logos
// ---------------------------------------------------------------------------

const NFL_CODES: &[&str] = &[
    "ARI", "ATL", "BAL", "BUF", "CAR", "CHI", "CIN", "CLE", "DAL", "DEN", "DET", "GB", "HOU",
    "IND", "JAX", "KC", "LAC", "LAR", "LV", "MIA", "MIN", "NE", "NO", "NYG", "NYJ", "PHI", "PIT",
    "SEA", "SF", "TB", "TEN", "WAS",
];

/// Map legacy or provider-specific abbreviations onto current club codes.
fn normalize_nfl_code(code: &str) -> String {
    let upper = code.trim().to_uppercase();
    match upper.as_str() {
        "JAC" => "JAX".into(),
        "WSH" => "WAS".into(),
        "LA" | "STL" => "LAR".into(),
        "SD" => "LAC".into(),
        "OAK" => "LV".into(),
        _ => upper,
    }
}

/// Logo URL for an NFL club code, or `None` if the code is not a known club.
pub fn nfl_logo_url(code: &str) -> Option<String> {
    let abbr = normalize_nfl_code(code);
    if !NFL_CODES.contains(&abbr.as_str()) {
        return None;
    }
    Some(format!(
        "https://static.www.nfl.com/league/api/clubs/logos/{abbr}.svg"
    ))
}
