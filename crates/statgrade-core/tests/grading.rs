//! End-to-end grading tests over the bundled season and small custom datasets

use std::collections::BTreeSet;

use statgrade_core::answer::Answer;
use statgrade_core::config::GradeConfig;
use statgrade_core::dataset::{ShootingPct, SeasonDataset};
use statgrade_core::error::GradeError;
use statgrade_core::oracle::Oracle;
use statgrade_core::question::{Category, QuestionCatalog, QuestionKind, QuestionSpec};
use statgrade_core::report::Report;
use statgrade_core::rubric::RubricScores;
use statgrade_core::validator::{AnswerEntry, ErrorKind, Validator, Verdict};

const HEADER: &str = "name,goals,assists,shots,games_played\n";

fn custom_catalog() -> QuestionCatalog {
    QuestionCatalog::from_yaml(
        r#"
- id: ten_goal_scorers
  category: intermediate
  prompt: Who scored at least 10 goals?
  kind:
    type: scorers_at_least
    min_goals: 10
- id: ten_goal_count
  category: intermediate
  prompt: How many players scored at least 10 goals?
  kind:
    type: count_at_least
    min_goals: 10
- id: idle_pct
  category: intermediate
  prompt: What was Idle Ivy's shooting percentage?
  kind:
    type: shooting_pct
    player: Idle Ivy
- id: top_scorer
  category: basic
  prompt: Who led in goals?
  kind:
    type: top_scorer
"#,
    )
    .unwrap()
}

#[test]
fn test_player_goals_sum_to_stated_total() {
    let dataset = SeasonDataset::builtin().unwrap();
    let summed: u32 = dataset.players().iter().map(|p| p.goals).sum();
    assert_eq!(dataset.team().totals.goals, Some(summed));
    assert_eq!(dataset.aggregates().team_goals, summed);
}

#[test]
fn test_stated_total_disagreement_is_a_data_error() {
    let csv = format!("{HEADER}A,3,1,5,1\n");
    let err = SeasonDataset::from_sources(&csv, "record = \"1-0\"\n[totals]\nassists = 2\n")
        .unwrap_err();
    assert!(matches!(err, GradeError::TotalsMismatch { .. }));
    assert_eq!(err.exit_code(), statgrade_core::error::ExitCode::Data);
}

#[test]
fn test_zero_shots_is_undefined_not_zero() {
    let csv = format!("{HEADER}Busy Bea,12,1,20,5\nIdle Ivy,0,2,0,5\n");
    let dataset = SeasonDataset::from_sources(&csv, "record = \"4-1\"").unwrap();
    let catalog = custom_catalog();
    let config = GradeConfig::default();
    let validator = Validator::new(&dataset, &catalog, &config).unwrap();

    let expected = validator
        .oracle()
        .expected(&QuestionKind::ShootingPct {
            player: "Idle Ivy".into(),
        })
        .unwrap();
    assert_eq!(expected, Answer::Percentage(ShootingPct::Undefined));

    let ok = validator
        .validate("idle_pct", "Idle Ivy: N/A, she took no shots")
        .unwrap();
    assert!(ok.passed, "{ok:?}");

    let zero = validator
        .validate("idle_pct", "Idle Ivy shot 0% on the year")
        .unwrap();
    assert!(!zero.passed);
}

#[test]
fn test_threshold_includes_player_exactly_at_threshold() {
    let csv = format!("{HEADER}Ten Tess,10,0,30,8\nNine Nora,9,4,25,8\n");
    let dataset = SeasonDataset::from_sources(&csv, "record = \"5-3\"").unwrap();
    let oracle = Oracle::new(&dataset).unwrap();
    assert_eq!(
        oracle.players_with_at_least(10),
        BTreeSet::from(["Ten Tess".to_string()])
    );

    let catalog = custom_catalog();
    let config = GradeConfig::default();
    let validator = Validator::new(&dataset, &catalog, &config).unwrap();
    let result = validator
        .validate("ten_goal_scorers", "Only Ten Tess reached double digits.")
        .unwrap();
    assert!(result.passed);

    let result = validator
        .validate("ten_goal_scorers", "Ten Tess and Nine Nora both did.")
        .unwrap();
    assert!(!result.passed);
    assert_eq!(result.error_kind, Some(ErrorKind::IncorrectPlayerSet));
    assert_eq!(result.diagnostic.as_deref(), Some("extra: Nine Nora"));

    let result = validator
        .validate("ten_goal_count", "One player scored at least 10 goals.")
        .unwrap();
    assert!(result.passed, "{result:?}");
}

#[test]
fn test_top_scorer_named_with_goal_count_passes() {
    let dataset = SeasonDataset::builtin().unwrap();
    let config = GradeConfig::default();
    let catalog = QuestionCatalog::builtin(&config.thresholds);
    let validator = Validator::new(&dataset, &catalog, &config).unwrap();

    let result = validator
        .validate("top_scorer", "Meaghan Tyrrell led the team with 70 goals")
        .unwrap();
    assert_eq!(result.verdict, Verdict::Pass);
    match result.extracted {
        Some(Answer::Player { ref name, .. }) => assert_eq!(name, "Meaghan Tyrrell"),
        ref other => panic!("unexpected extraction: {other:?}"),
    }
}

#[test]
fn test_team_goals_off_by_nineteen_fails_with_diagnostic() {
    let dataset = SeasonDataset::builtin().unwrap();
    let config = GradeConfig::default();
    let catalog = QuestionCatalog::builtin(&config.thresholds);
    let validator = Validator::new(&dataset, &catalog, &config).unwrap();

    let result = validator
        .validate("team_goals", "The team scored about 300 goals")
        .unwrap();
    assert_eq!(result.verdict, Verdict::Fail);
    let diagnostic = result.diagnostic.unwrap();
    assert!(diagnostic.contains("expected 319"));
    assert!(diagnostic.contains("extracted 300"));

    let close = validator
        .validate("team_goals", "Syracuse scored 319 goals in total.")
        .unwrap();
    assert!(close.passed);
}

#[test]
fn test_missing_number_fails_without_crashing() {
    let dataset = SeasonDataset::builtin().unwrap();
    let config = GradeConfig::default();
    let catalog = QuestionCatalog::builtin(&config.thresholds);
    let validator = Validator::new(&dataset, &catalog, &config).unwrap();

    for id in ["total_games", "team_goals", "team_assists", "offensive_balance"] {
        let result = validator
            .validate(id, "It was a season to remember.")
            .unwrap();
        assert_eq!(result.verdict, Verdict::Fail, "{id}");
        assert_eq!(result.error_kind, Some(ErrorKind::NoMatchFound), "{id}");
    }
}

#[test]
fn test_oracle_queries_are_bit_identical() {
    let dataset = SeasonDataset::builtin().unwrap();
    let config = GradeConfig::default();
    let catalog = QuestionCatalog::builtin(&config.thresholds);
    let oracle = Oracle::new(&dataset).unwrap();

    for question in catalog.iter() {
        let first = oracle.expected(&question.kind).unwrap();
        let second = oracle.expected(&question.kind).unwrap();
        assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap(),
            "{}",
            question.id
        );
    }

    let a = oracle.top_scorers_shooting(3);
    let b = oracle.top_scorers_shooting(3);
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.rate().map(f64::to_bits), y.rate().map(f64::to_bits));
    }
}

#[test]
fn test_full_batch_report() {
    let dataset = SeasonDataset::builtin().unwrap();
    let config = GradeConfig::default();
    let catalog = QuestionCatalog::builtin(&config.thresholds);
    let validator = Validator::new(&dataset, &catalog, &config).unwrap();

    let mut strategic = AnswerEntry::new(
        "strategic_analysis",
        "Meaghan Tyrrell anchored the attack; focus on draw controls.",
    );
    strategic.rubric = Some(RubricScores::new(4, 4, 4).unwrap());

    let answers = vec![
        AnswerEntry::new("season_record", "Syracuse finished 16-6."),
        AnswerEntry::new("total_games", "They played 22 games."),
        AnswerEntry::new("top_assists", "Emma Ward led with 37 assists."),
        AnswerEntry::new("best_shooter", "Kendall Rose, at 72.7%."),
        AnswerEntry::new("unknown_id", "text"),
        strategic,
    ];
    let results = validator.run_batch(&answers);
    let report = Report::new(dataset.digest(), results);

    assert_eq!(report.summary.total, 6);
    assert_eq!(report.summary.passed, 5);
    assert_eq!(report.summary.errored, 1);
    assert_eq!(report.summary.by_category[&Category::Complex].passed, 1);
    assert_eq!(report.dataset_digest, dataset.digest());
}

#[test]
fn test_custom_catalog_rejects_duplicates() {
    let q = QuestionSpec::new("dup", Category::Basic, "?", QuestionKind::SeasonRecord);
    let err = QuestionCatalog::new(vec![q.clone(), q]).unwrap_err();
    assert_eq!(err.exit_code(), statgrade_core::error::ExitCode::Usage);
}
