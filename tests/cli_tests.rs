//! Integration tests for the statgrade CLI
//!
//! These run the binary from an empty temporary directory so no stray
//! `statgrade.toml` is picked up.

use std::fs;
use std::path::Path;

use assert_cmd::{cargo::cargo_bin_cmd, Command};
use predicates::prelude::*;
use tempfile::tempdir;

/// Get a Command for statgrade running in `dir`
fn statgrade(dir: &Path) -> Command {
    let mut cmd = cargo_bin_cmd!("statgrade");
    cmd.current_dir(dir)
        .env_remove("STATGRADE_CONFIG")
        .env_remove("STATGRADE_LOG");
    cmd
}

fn write_small_dataset(dir: &Path) {
    fs::write(
        dir.join("players.csv"),
        "name,goals,assists,shots,games_played\nTen Tess,10,0,30,8\nNine Nora,9,4,25,8\n",
    )
    .unwrap();
    fs::write(dir.join("team.toml"), "record = \"5-3\"\n").unwrap();
}

// ============================================================================
// Help, version and global flags
// ============================================================================

#[test]
fn test_help_flag() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("validate"))
        .stdout(predicate::str::contains("grade"));
}

#[test]
fn test_no_command_prints_version() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("statgrade "));
}

#[test]
fn test_players_without_team_is_usage_error() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args(["--players", "players.csv", "truth"])
        .assert()
        .code(2);
}

#[test]
fn test_unknown_flag_json_envelope() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args(["--format", "json", "--rubric-nope", "truth"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("\"type\":\"usage_error\""));
}

// ============================================================================
// Ground truth, questions, context, prompt
// ============================================================================

#[test]
fn test_truth_human() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .arg("truth")
        .assert()
        .success()
        .stdout(predicate::str::contains("season_record"))
        .stdout(predicate::str::contains("16-6"))
        .stdout(predicate::str::contains("Meaghan Tyrrell (70)"))
        .stdout(predicate::str::contains("Kendall Rose"));
}

#[test]
fn test_truth_json() {
    let dir = tempdir().unwrap();
    let output = statgrade(dir.path())
        .args(["--format", "json", "truth"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let questions = value["questions"].as_array().unwrap();
    let team_goals = questions
        .iter()
        .find(|q| q["id"] == "team_goals")
        .unwrap();
    assert_eq!(team_goals["expected"]["value"], 319);
    assert_eq!(team_goals["tolerance"], 0.5);
    assert_eq!(value["dataset_digest"].as_str().unwrap().len(), 64);
}

#[test]
fn test_truth_records() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args(["--format", "records", "truth"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("H statgrade=1 records=1"))
        .stdout(predicate::str::contains("T season_record basic exact expected=16-6"));
}

#[test]
fn test_questions_lists_catalog() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .arg("questions")
        .assert()
        .success()
        .stdout(predicate::str::contains("top_scorer"))
        .stdout(predicate::str::contains("strategic_analysis"));
}

#[test]
fn test_context_block() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .arg("context")
        .assert()
        .success()
        .stdout(predicate::str::contains("TEAM RECORD: 16-6 (22 games)"))
        .stdout(predicate::str::contains("TEAM TOTALS: 319 Goals, 167 Assists"));
}

#[test]
fn test_prompt_for_question() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args(["prompt", "team_goals"])
        .assert()
        .success()
        .stdout(predicate::str::contains("TEAM RECORD"))
        .stdout(predicate::str::contains(
            "Question: How many total goals did the team score this season?",
        ));
}

#[test]
fn test_prompt_unknown_question() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args(["prompt", "nope"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("unknown question: nope"));
}

// ============================================================================
// Validate
// ============================================================================

#[test]
fn test_validate_pass() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args([
            "validate",
            "top_scorer",
            "--response",
            "Meaghan Tyrrell led the team with 70 goals",
        ])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("PASS top_scorer"));
}

#[test]
fn test_validate_failure_still_exits_zero() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args(["validate", "team_goals"])
        .write_stdin("The team scored about 300 goals")
        .assert()
        .success()
        .stdout(predicate::str::contains("FAIL team_goals"))
        .stdout(predicate::str::contains("expected 319, extracted 300"));
}

#[test]
fn test_validate_json_result() {
    let dir = tempdir().unwrap();
    let output = statgrade(dir.path())
        .args([
            "--format",
            "json",
            "validate",
            "total_games",
            "--response",
            "It was a season to remember.",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["verdict"], "fail");
    assert_eq!(value["error_kind"], "no_match_found");
}

#[test]
fn test_validate_rubric_scores() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args([
            "validate",
            "strategic_analysis",
            "--response",
            "Push transition",
            "--rubric",
            "4,2,5",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("below 3: actionability"));

    statgrade(dir.path())
        .args([
            "validate",
            "strategic_analysis",
            "--response",
            "Push transition",
            "--rubric",
            "9,2,5",
        ])
        .assert()
        .code(2);
}

#[test]
fn test_validate_with_missing_tolerance_config() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("statgrade.toml"), "[tolerances]\n").unwrap();
    statgrade(dir.path())
        .args(["validate", "team_goals", "--response", "319 goals"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("no tolerance configured for 'team_total'"));
}

// ============================================================================
// Custom datasets
// ============================================================================

#[test]
fn test_custom_dataset_truth() {
    let dir = tempdir().unwrap();
    write_small_dataset(dir.path());
    statgrade(dir.path())
        .args(["--players", "players.csv", "--team", "team.toml", "truth"])
        .assert()
        .success()
        .stdout(predicate::str::contains("5-3"))
        .stdout(predicate::str::contains("Ten Tess (10)"));
}

#[test]
fn test_totals_mismatch_is_data_error() {
    let dir = tempdir().unwrap();
    write_small_dataset(dir.path());
    fs::write(
        dir.path().join("team.toml"),
        "record = \"5-3\"\n[totals]\ngoals = 20\n",
    )
    .unwrap();
    statgrade(dir.path())
        .args(["--players", "players.csv", "--team", "team.toml", "context"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("mismatch"));
}

#[test]
fn test_malformed_row_json_error() {
    let dir = tempdir().unwrap();
    write_small_dataset(dir.path());
    fs::write(
        dir.path().join("players.csv"),
        "name,goals,assists,shots,games_played\nBad Row,ten,0,30,8\n",
    )
    .unwrap();
    let output = statgrade(dir.path())
        .args([
            "--format",
            "json",
            "--players",
            "players.csv",
            "--team",
            "team.toml",
            "truth",
        ])
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(3));
    let value: serde_json::Value = serde_json::from_slice(&output.stderr).unwrap();
    assert_eq!(value["error"]["type"], "malformed_record");
}

// ============================================================================
// Grade
// ============================================================================

#[test]
fn test_grade_writes_report() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("answers.yaml"),
        r#"
- question: season_record
  response: Syracuse finished 16-6.
- question: team_goals
  response: The team scored about 300 goals
- question: not_a_question
  response: anything
"#,
    )
    .unwrap();

    statgrade(dir.path())
        .args(["grade", "answers.yaml", "--output", "report.json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1/3 passed"));

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(dir.path().join("report.json")).unwrap())
            .unwrap();
    assert_eq!(report["summary"]["total"], 3);
    assert_eq!(report["summary"]["passed"], 1);
    assert_eq!(report["summary"]["errored"], 1);
    assert_eq!(report["results"][2]["error_kind"], "unknown_question");
}

#[test]
fn test_grade_json_answers_with_auto_rubric() {
    let dir = tempdir().unwrap();
    fs::write(
        dir.path().join("answers.json"),
        r#"[{"question":"strategic_analysis","response":"Meaghan Tyrrell should focus on draw controls and increase pressure in transition to improve offense"}]"#,
    )
    .unwrap();

    let output = statgrade(dir.path())
        .args(["--format", "json", "grade", "answers.json", "--auto-rubric"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert!(report["results"][0]["rubric"].is_object());
    assert_ne!(report["results"][0]["error_kind"], "missing_rubric_scores");
}

#[test]
fn test_grade_missing_answers_file() {
    let dir = tempdir().unwrap();
    statgrade(dir.path())
        .args(["grade", "missing.yaml"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("file not found"));
}
