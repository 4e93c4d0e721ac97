//! Rendering of validation results

use statgrade_core::format::record_value;
use statgrade_core::validator::{ValidationResult, Verdict};

/// Human-readable block for one result
pub fn human(result: &ValidationResult) -> String {
    let label = match result.verdict {
        Verdict::Pass => "PASS",
        Verdict::Fail => "FAIL",
        Verdict::Error => "ERROR",
    };
    let mut lines = vec![match (&result.category, &result.policy) {
        (Some(category), Some(policy)) => {
            format!("{} {} ({}, {})", label, result.question_id, category, policy)
        }
        _ => format!("{} {}", label, result.question_id),
    }];
    if let Some(expected) = &result.expected {
        lines.push(format!("  expected:  {}", expected));
    }
    if let Some(extracted) = &result.extracted {
        lines.push(format!("  extracted: {}", extracted));
    }
    if let Some(rubric) = &result.rubric {
        lines.push(format!("  rubric:    {}", rubric));
    }
    match (&result.error_kind, &result.diagnostic) {
        (Some(kind), Some(diagnostic)) => lines.push(format!("  {}: {}", kind, diagnostic)),
        (Some(kind), None) => lines.push(format!("  {}", kind)),
        (None, Some(diagnostic)) => lines.push(format!("  {}", diagnostic)),
        (None, None) => {}
    }
    for note in &result.notes {
        lines.push(format!("  note: {}", note));
    }
    lines.join("\n")
}

/// Records lines for one result: an `R` line, then `D` and `N` lines
pub fn records(result: &ValidationResult) -> Vec<String> {
    let id = record_value(&result.question_id);
    let optional = |value: Option<String>| value.map_or("-".to_string(), |v| record_value(&v));

    let mut lines = vec![format!(
        "R {} {} category={} error={} expected={} extracted={}",
        id,
        result.verdict,
        optional(result.category.map(|c| c.to_string())),
        optional(result.error_kind.map(|k| k.to_string())),
        optional(result.expected.as_ref().map(|a| a.to_string())),
        optional(result.extracted.as_ref().map(|a| a.to_string())),
    )];
    if let Some(diagnostic) = &result.diagnostic {
        lines.push(format!("D {} {}", id, record_value(diagnostic)));
    }
    for note in &result.notes {
        lines.push(format!("N {} {}", id, record_value(note)));
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use statgrade_core::config::GradeConfig;
    use statgrade_core::dataset::SeasonDataset;
    use statgrade_core::question::QuestionCatalog;
    use statgrade_core::validator::Validator;

    fn validate(id: &str, response: &str) -> ValidationResult {
        let dataset = SeasonDataset::builtin().unwrap();
        let config = GradeConfig::default();
        let catalog = QuestionCatalog::builtin(&config.thresholds);
        let validator = Validator::new(&dataset, &catalog, &config).unwrap();
        validator.validate(id, response).unwrap()
    }

    #[test]
    fn test_human_failure_block() {
        let result = validate("team_goals", "The team scored about 300 goals");
        let text = human(&result);
        assert!(text.starts_with("FAIL team_goals (basic, tolerance(team_total))"));
        assert!(text.contains("expected:  319"));
        assert!(text.contains("extracted: 300"));
    }

    #[test]
    fn test_records_lines() {
        let result = validate("season_record", "Syracuse went 16-6.");
        let lines = records(&result);
        assert_eq!(
            lines[0],
            "R season_record pass category=basic error=- expected=16-6 extracted=16-6"
        );
    }
}
