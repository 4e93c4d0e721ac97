//! Player table parsing
//!
//! Reads one row per player. Headers are matched case-insensitively with
//! punctuation ignored, so `Games_Played`, `games played` and `GP` are the
//! same column. Unknown columns (jersey numbers, notes) are skipped.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord, Trim};

use crate::bail_malformed;
use crate::dataset::types::PlayerRecord;
use crate::error::{GradeError, Result};

#[derive(Debug, Clone, Copy)]
struct Columns {
    name: usize,
    goals: usize,
    assists: usize,
    shots: usize,
    games_played: usize,
    points: Option<usize>,
}

fn normalize_header(header: &str) -> String {
    header
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

fn find_column(headers: &[String], aliases: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| aliases.iter().any(|alias| h == alias))
}

fn resolve_columns(headers: &StringRecord) -> Result<Columns> {
    let normalized: Vec<String> = headers.iter().map(normalize_header).collect();

    let require = |label: &str, aliases: &[&str]| {
        find_column(&normalized, aliases)
            .ok_or_else(|| GradeError::malformed(1, format!("missing required column '{}'", label)))
    };

    Ok(Columns {
        name: require("name", &["player", "name", "playername"])?,
        goals: require("goals", &["goals", "g"])?,
        assists: require("assists", &["assists", "a"])?,
        shots: require("shots", &["shots", "sh"])?,
        games_played: require("games_played", &["gamesplayed", "gp", "games"])?,
        points: find_column(&normalized, &["points", "pts"]),
    })
}

/// Parse a non-negative count field, reporting the column and line on failure
fn parse_count(record: &StringRecord, index: usize, column: &str, line: usize) -> Result<u32> {
    let raw = record.get(index).unwrap_or("").trim();
    if raw.is_empty() {
        bail_malformed!(line, "{} is empty", column);
    }
    let value: i64 = match raw.parse() {
        Ok(value) => value,
        Err(_) => bail_malformed!(line, "{} is not a whole number ('{}')", column, raw),
    };
    if value < 0 {
        bail_malformed!(line, "{} is negative ({})", column, value);
    }
    u32::try_from(value)
        .map_err(|_| GradeError::malformed(line, format!("{} is too large ({})", column, value)))
}

fn map_csv_error(err: csv::Error) -> GradeError {
    let line = err.position().map(|p| p.line() as usize).unwrap_or(0);
    let reason = match err.kind() {
        csv::ErrorKind::UnequalLengths {
            expected_len, len, ..
        } => Some(format!("expected {} fields, found {}", expected_len, len)),
        csv::ErrorKind::Utf8 { .. } => Some("row is not valid UTF-8".to_string()),
        _ => None,
    };
    match reason {
        Some(reason) => GradeError::malformed(line, reason),
        None => GradeError::Csv(err),
    }
}

/// Read player rows from CSV.
///
/// Rejects negative or non-numeric counts and rows whose optional points
/// column disagrees with goals + assists. Name uniqueness is checked when the
/// dataset is assembled.
pub fn read_players<R: Read>(reader: R) -> Result<Vec<PlayerRecord>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(reader);

    let headers = reader.headers().map_err(map_csv_error)?.clone();
    let columns = resolve_columns(&headers)?;

    let mut players = Vec::new();
    for (idx, row) in reader.records().enumerate() {
        let record = row.map_err(map_csv_error)?;
        let line = record
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or(idx + 2);

        let name = record.get(columns.name).unwrap_or("").trim();
        if name.is_empty() {
            bail_malformed!(line, "player name is empty");
        }

        let player = PlayerRecord {
            name: name.to_string(),
            goals: parse_count(&record, columns.goals, "goals", line)?,
            assists: parse_count(&record, columns.assists, "assists", line)?,
            shots: parse_count(&record, columns.shots, "shots", line)?,
            games_played: parse_count(&record, columns.games_played, "games_played", line)?,
        };

        if let Some(points_idx) = columns.points {
            let points = parse_count(&record, points_idx, "points", line)?;
            if points != player.points() {
                bail_malformed!(
                    line,
                    "points ({}) does not equal goals + assists ({})",
                    points,
                    player.points()
                );
            }
        }

        players.push(player);
    }

    tracing::debug!(rows = players.len(), "read player table");
    Ok(players)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(csv: &str) -> Result<Vec<PlayerRecord>> {
        read_players(csv.as_bytes())
    }

    #[test]
    fn test_reads_rows_with_extra_columns() {
        let players = read(
            "Player,Jersey,Goals,Assists,Points,Shots,Games_Played\n\
             Meaghan Tyrrell,22,70,32,102,115,21\n\
             Ally Quirk,5,0,0,0,0,0\n",
        )
        .unwrap();
        assert_eq!(players.len(), 2);
        assert_eq!(players[0], PlayerRecord::new("Meaghan Tyrrell", 70, 32, 115, 21));
        assert_eq!(players[1].shots, 0);
    }

    #[test]
    fn test_header_aliases() {
        let players = read("name,goals,assists,shots,GP\nA,1,2,3,4\n").unwrap();
        assert_eq!(players[0].games_played, 4);
    }

    #[test]
    fn test_rejects_negative_count() {
        let err = read("name,goals,assists,shots,games_played\nA,-2,0,3,1\n").unwrap_err();
        match err {
            GradeError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert!(reason.contains("goals is negative"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_non_numeric_field() {
        let err = read("name,goals,assists,shots,games_played\nA,1,0,3,1\nB,x,0,3,1\n")
            .unwrap_err();
        match err {
            GradeError::MalformedRecord { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("goals is not a whole number"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_rejects_fractional_count() {
        let err = read("name,goals,assists,shots,games_played\nA,1.5,0,3,1\n").unwrap_err();
        assert!(matches!(err, GradeError::MalformedRecord { .. }));
    }

    #[test]
    fn test_rejects_points_mismatch() {
        let err = read("name,goals,assists,points,shots,games_played\nA,1,1,5,3,1\n").unwrap_err();
        assert!(err.to_string().contains("points (5)"));
    }

    #[test]
    fn test_missing_column() {
        let err = read("name,goals,assists,games_played\nA,1,1,1\n").unwrap_err();
        assert!(matches!(err, GradeError::MalformedRecord { line: 1, .. }));
        assert!(err.to_string().contains("shots"));
    }

    #[test]
    fn test_short_row() {
        let err = read("name,goals,assists,shots,games_played\nA,1,1\n").unwrap_err();
        assert!(matches!(err, GradeError::MalformedRecord { .. }));
    }

    #[test]
    fn test_empty_name() {
        let err = read("name,goals,assists,shots,games_played\n ,1,1,1,1\n").unwrap_err();
        assert!(err.to_string().contains("name is empty"));
    }

    #[test]
    fn test_header_only_is_empty() {
        assert!(read("name,goals,assists,shots,games_played\n").unwrap().is_empty());
    }
}
