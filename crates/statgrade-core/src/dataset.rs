//! Season dataset: player table plus team facts
//!
//! A dataset is assembled once per run and never mutated afterwards. Derived
//! aggregates (team totals, scorer ranking, leaders) are computed when the
//! dataset is built so that oracle queries are plain lookups.

pub mod context;
pub mod loader;
pub mod types;

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use sha2::{Digest, Sha256};

use crate::error::{GradeError, Result};

pub use loader::read_players;
pub use types::{
    round_one_decimal, PlayerRecord, ShootingPct, Splits, StatedTotals, TeamFacts, WinLoss,
};

const BUILTIN_PLAYERS: &str = include_str!("../data/syracuse_2024_players.csv");
const BUILTIN_TEAM: &str = include_str!("../data/syracuse_2024_team.toml");

/// Aggregates derived from the player table at load time
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregates {
    pub team_goals: u32,
    pub team_assists: u32,
    pub team_points: u32,
    pub team_shots: u32,
    pub team_shooting_pct: ShootingPct,
    /// Player indices ordered by goals descending; source order breaks ties
    pub scorer_ranking: Vec<usize>,
    /// First player in source order with the most goals
    pub goal_leader: Option<usize>,
    /// First player in source order with the most assists
    pub assist_leader: Option<usize>,
    /// First player in source order with the most points
    pub points_leader: Option<usize>,
}

impl Aggregates {
    fn compute(players: &[PlayerRecord]) -> Self {
        let team_goals = players.iter().map(|p| p.goals).sum();
        let team_assists = players.iter().map(|p| p.assists).sum();
        let team_shots = players.iter().map(|p| p.shots).sum();

        let mut scorer_ranking: Vec<usize> = (0..players.len()).collect();
        // stable sort keeps source order among equal goal counts
        scorer_ranking.sort_by(|&a, &b| players[b].goals.cmp(&players[a].goals));

        Self {
            team_goals,
            team_assists,
            team_points: team_goals + team_assists,
            team_shots,
            team_shooting_pct: ShootingPct::from_counts(team_goals, team_shots),
            scorer_ranking,
            goal_leader: first_max_by(players, |p| p.goals),
            assist_leader: first_max_by(players, |p| p.assists),
            points_leader: first_max_by(players, |p| p.points()),
        }
    }
}

/// Index of the first element with the maximum key
fn first_max_by(players: &[PlayerRecord], key: impl Fn(&PlayerRecord) -> u32) -> Option<usize> {
    let mut best: Option<(usize, u32)> = None;
    for (idx, player) in players.iter().enumerate() {
        let value = key(player);
        match best {
            Some((_, best_value)) if best_value >= value => {}
            _ => best = Some((idx, value)),
        }
    }
    best.map(|(idx, _)| idx)
}

/// Immutable season data shared by the oracle and the validator
#[derive(Debug, Clone)]
pub struct SeasonDataset {
    players: Vec<PlayerRecord>,
    by_name: HashMap<String, usize>,
    team: TeamFacts,
    aggregates: Aggregates,
    digest: String,
}

impl SeasonDataset {
    /// Assemble a dataset, checking names and stated totals.
    ///
    /// Row numbers in errors assume the players came from a table with one
    /// header line.
    pub fn new(players: Vec<PlayerRecord>, team: TeamFacts) -> Result<Self> {
        let mut by_name = HashMap::with_capacity(players.len());
        for (idx, player) in players.iter().enumerate() {
            let line = idx + 2;
            let key = player.name.trim().to_ascii_lowercase();
            if key.is_empty() {
                return Err(GradeError::malformed(line, "player name is empty"));
            }
            if let Some(first) = by_name.insert(key, idx) {
                return Err(GradeError::malformed(
                    line,
                    format!(
                        "duplicate player '{}' (first seen at line {})",
                        player.name,
                        first + 2
                    ),
                ));
            }
        }

        check_sums(&players)?;
        let aggregates = Aggregates::compute(&players);
        check_totals(&team, &aggregates)?;

        let digest = compute_digest(&players, &team)?;

        tracing::debug!(
            players = players.len(),
            team_goals = aggregates.team_goals,
            team_assists = aggregates.team_assists,
            record = %team.record,
            "dataset ready"
        );

        Ok(Self {
            players,
            by_name,
            team,
            aggregates,
            digest,
        })
    }

    /// Build a dataset from CSV player rows and TOML team facts
    pub fn from_sources(players_csv: &str, team_toml: &str) -> Result<Self> {
        let players = read_players(players_csv.as_bytes())?;
        let team = TeamFacts::parse(team_toml)?;
        Self::new(players, team)
    }

    /// Load a dataset from a players CSV file and a team facts TOML file
    pub fn load(players_path: &Path, team_path: &Path) -> Result<Self> {
        let players_csv = read_source(players_path)?;
        let team_toml = read_source(team_path)?;
        Self::from_sources(&players_csv, &team_toml)
    }

    /// The 2024 season data bundled with the crate
    pub fn builtin() -> Result<Self> {
        Self::from_sources(BUILTIN_PLAYERS, BUILTIN_TEAM)
    }

    pub fn players(&self) -> &[PlayerRecord] {
        &self.players
    }

    /// Case-insensitive lookup by player name
    pub fn player(&self, name: &str) -> Option<&PlayerRecord> {
        self.by_name
            .get(&name.trim().to_ascii_lowercase())
            .map(|&idx| &self.players[idx])
    }

    pub fn player_names(&self) -> impl Iterator<Item = &str> {
        self.players.iter().map(|p| p.name.as_str())
    }

    pub fn team(&self) -> &TeamFacts {
        &self.team
    }

    pub fn aggregates(&self) -> &Aggregates {
        &self.aggregates
    }

    /// SHA-256 over the canonical JSON form of players and team facts
    pub fn digest(&self) -> &str {
        &self.digest
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    /// Players ordered by goals descending
    pub fn ranked_scorers(&self) -> impl Iterator<Item = &PlayerRecord> {
        self.aggregates
            .scorer_ranking
            .iter()
            .map(|&idx| &self.players[idx])
    }

    pub(crate) fn player_at(&self, idx: usize) -> &PlayerRecord {
        &self.players[idx]
    }
}

fn read_source(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(GradeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    fs::read_to_string(path).map_err(|e| GradeError::io_operation("read", path.display(), e))
}

/// Reject rows whose points, or whose column totals, do not fit in a `u32`
fn check_sums(players: &[PlayerRecord]) -> Result<()> {
    let (mut goals, mut assists, mut shots) = (0u32, 0u32, 0u32);
    for (idx, player) in players.iter().enumerate() {
        let line = idx + 2;
        let too_large = |what: &str| GradeError::malformed(line, format!("{} too large", what));
        player
            .goals
            .checked_add(player.assists)
            .ok_or_else(|| too_large("points"))?;
        goals = goals
            .checked_add(player.goals)
            .ok_or_else(|| too_large("team goal total"))?;
        assists = assists
            .checked_add(player.assists)
            .ok_or_else(|| too_large("team assist total"))?;
        shots = shots
            .checked_add(player.shots)
            .ok_or_else(|| too_large("team shot total"))?;
    }
    if goals.checked_add(assists).is_none() {
        return Err(GradeError::malformed(
            players.len() + 1,
            "team point total too large",
        ));
    }
    Ok(())
}

fn check_totals(team: &TeamFacts, aggregates: &Aggregates) -> Result<()> {
    if let Some(stated) = team.totals.goals {
        if stated != aggregates.team_goals {
            return Err(GradeError::totals_mismatch(
                "team goals",
                stated,
                aggregates.team_goals,
            ));
        }
    }
    if let Some(stated) = team.totals.assists {
        if stated != aggregates.team_assists {
            return Err(GradeError::totals_mismatch(
                "team assists",
                stated,
                aggregates.team_assists,
            ));
        }
    }

    let splits = &team.splits;
    check_split("home/away/neutral record", team.record, &[splits.home, splits.away, splits.neutral])?;
    check_split("conference record", team.record, &[splits.conference, splits.non_conference])?;
    Ok(())
}

/// A split group is only checked when every part of it is stated
fn check_split(what: &str, overall: WinLoss, parts: &[Option<WinLoss>]) -> Result<()> {
    let Some(parts) = parts.iter().copied().collect::<Option<Vec<_>>>() else {
        return Ok(());
    };
    let combined = parts.iter().fold(WinLoss::new(0, 0), |acc, part| {
        WinLoss::new(
            acc.wins.saturating_add(part.wins),
            acc.losses.saturating_add(part.losses),
        )
    });
    if combined != overall {
        return Err(GradeError::totals_mismatch(what, overall, combined));
    }
    Ok(())
}

fn compute_digest(players: &[PlayerRecord], team: &TeamFacts) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(players)?);
    hasher.update(serde_json::to_vec(team)?);
    Ok(hex::encode(hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "name,goals,assists,shots,games_played\n";

    #[test]
    fn test_builtin_dataset() {
        let dataset = SeasonDataset::builtin().unwrap();
        assert_eq!(dataset.len(), 34);
        let agg = dataset.aggregates();
        assert_eq!(agg.team_goals, 319);
        assert_eq!(agg.team_assists, 167);
        assert_eq!(agg.team_points, 486);
        assert_eq!(agg.team_shots, 657);
        assert_eq!(dataset.team().record, WinLoss::new(16, 6));
        assert_eq!(dataset.player_at(agg.goal_leader.unwrap()).name, "Meaghan Tyrrell");
        assert_eq!(dataset.player_at(agg.assist_leader.unwrap()).name, "Emma Ward");
        assert_eq!(dataset.player_at(agg.points_leader.unwrap()).name, "Meaghan Tyrrell");
    }

    #[test]
    fn test_ranked_scorers_order() {
        let dataset = SeasonDataset::builtin().unwrap();
        let top: Vec<&str> = dataset.ranked_scorers().take(4).map(|p| p.name.as_str()).collect();
        assert_eq!(
            top,
            vec!["Meaghan Tyrrell", "Olivia Adamson", "Emma Ward", "Maddy Baxter"]
        );
    }

    #[test]
    fn test_ties_keep_source_order() {
        let csv = format!("{HEADER}A,5,1,9,1\nB,7,1,9,1\nC,7,3,9,1\n");
        let dataset = SeasonDataset::from_sources(&csv, "record = \"1-0\"").unwrap();
        let agg = dataset.aggregates();
        assert_eq!(dataset.player_at(agg.goal_leader.unwrap()).name, "B");
        assert_eq!(agg.scorer_ranking, vec![1, 2, 0]);
    }

    #[test]
    fn test_player_lookup_is_case_insensitive() {
        let dataset = SeasonDataset::builtin().unwrap();
        assert_eq!(dataset.player("emma ward").unwrap().assists, 37);
        assert!(dataset.player("Nobody").is_none());
    }

    #[test]
    fn test_duplicate_player_rejected() {
        let csv = format!("{HEADER}A,1,1,1,1\na,2,2,2,2\n");
        let err = SeasonDataset::from_sources(&csv, "record = \"1-0\"").unwrap_err();
        match err {
            GradeError::MalformedRecord { line, reason } => {
                assert_eq!(line, 3);
                assert!(reason.contains("duplicate player"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_counts_too_large_to_total_rejected() {
        let csv = format!("{HEADER}A,4000000000,4000000000,1,1\n");
        let err = SeasonDataset::from_sources(&csv, "record = \"1-0\"").unwrap_err();
        match err {
            GradeError::MalformedRecord { line, reason } => {
                assert_eq!(line, 2);
                assert_eq!(reason, "points too large");
            }
            other => panic!("unexpected error: {other:?}"),
        }

        let csv = format!("{HEADER}A,3000000000,0,1,1\nB,3000000000,0,1,1\n");
        let err = SeasonDataset::from_sources(&csv, "record = \"1-0\"").unwrap_err();
        assert!(matches!(err, GradeError::MalformedRecord { line: 3, .. }));
        assert_eq!(err.exit_code(), crate::error::ExitCode::Data);
    }

    #[test]
    fn test_stated_goal_total_mismatch() {
        let csv = format!("{HEADER}A,3,1,5,1\nB,4,1,5,1\n");
        let err = SeasonDataset::from_sources(&csv, "record = \"1-0\"\n[totals]\ngoals = 8\n")
            .unwrap_err();
        assert!(matches!(err, GradeError::TotalsMismatch { .. }));
        assert_eq!(err.to_string(), "team goals mismatch: stated 8, computed 7");
    }

    #[test]
    fn test_split_mismatch() {
        let team = "record = \"16-6\"\n[splits]\nconference = \"9-1\"\nnon_conference = \"7-4\"\n";
        let err = SeasonDataset::from_sources(&format!("{HEADER}A,1,1,1,1\n"), team).unwrap_err();
        assert!(err.to_string().contains("conference record"));
    }

    #[test]
    fn test_partial_split_not_checked() {
        let team = "record = \"16-6\"\n[splits]\nhome = \"1-0\"\n";
        assert!(SeasonDataset::from_sources(&format!("{HEADER}A,1,1,1,1\n"), team).is_ok());
    }

    #[test]
    fn test_digest_is_stable() {
        let a = SeasonDataset::builtin().unwrap();
        let b = SeasonDataset::builtin().unwrap();
        assert_eq!(a.digest(), b.digest());
        assert_eq!(a.digest().len(), 64);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = SeasonDataset::load(&dir.path().join("players.csv"), &dir.path().join("team.toml"))
            .unwrap_err();
        assert!(matches!(err, GradeError::FileNotFound { .. }));
    }
}
