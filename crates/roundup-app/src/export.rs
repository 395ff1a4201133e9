// Report output: pretty JSON and CSV standings.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use roundup_core::standings::StandingsRow;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Flat CSV projection of a standings row.
#[derive(Debug, Serialize)]
struct StandingsRecord<'a> {
    rank: u32,
    team: &'a str,
    owner: &'a str,
    record: String,
    wins: u32,
    losses: u32,
    ties: u32,
    points_for: f64,
    points_against: f64,
    movement: Option<i32>,
}

impl<'a> From<&'a StandingsRow> for StandingsRecord<'a> {
    fn from(row: &'a StandingsRow) -> Self {
        StandingsRecord {
            rank: row.rank,
            team: &row.team_name,
            owner: row.owner_name.as_deref().unwrap_or(""),
            record: row.record(),
            wins: row.wins,
            losses: row.losses,
            ties: row.ties,
            points_for: row.points_for,
            points_against: row.points_against,
            movement: row.movement,
        }
    }
}

pub fn write_standings_csv<W: Write>(writer: W, rows: &[StandingsRow]) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    for row in rows {
        csv.serialize(StandingsRecord::from(row))?;
    }
    csv.flush().map_err(|e| ExportError::Csv(e.into()))?;
    Ok(())
}

pub fn write_standings_csv_file(path: &Path, rows: &[StandingsRow]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_standings_csv(file, rows)
}

/// Pretty-printed JSON followed by a newline.
pub fn write_json<W: Write, T: Serialize>(mut writer: W, value: &T) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer).map_err(|e| ExportError::Io {
        path: "<output>".into(),
        source: e,
    })?;
    Ok(())
}

pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    write_json(file, value)
}
