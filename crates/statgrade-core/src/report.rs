//! Run reports: every validation result plus a summary, saved as JSON

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::dataset::round_one_decimal;
use crate::error::{GradeError, Result};
use crate::question::Category;
use crate::validator::{ErrorKind, ValidationResult, Verdict};

/// Pass counts for one category
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryStats {
    pub total: usize,
    pub passed: usize,
}

impl CategoryStats {
    /// Percentage passed, one decimal
    pub fn pass_rate(&self) -> f64 {
        pass_rate(self.passed, self.total)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    pub errored: usize,
    /// Percentage passed, one decimal
    pub pass_rate: f64,
    #[serde(default)]
    pub by_category: BTreeMap<Category, CategoryStats>,
    #[serde(default)]
    pub error_kinds: BTreeMap<ErrorKind, usize>,
}

fn pass_rate(passed: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        round_one_decimal(passed as f64 / total as f64 * 100.0)
    }
}

impl Summary {
    pub fn from_results(results: &[ValidationResult]) -> Self {
        let mut summary = Summary {
            total: results.len(),
            ..Summary::default()
        };
        for result in results {
            match result.verdict {
                Verdict::Pass => summary.passed += 1,
                Verdict::Fail => summary.failed += 1,
                Verdict::Error => summary.errored += 1,
            }
            if let Some(category) = result.category {
                let stats = summary.by_category.entry(category).or_default();
                stats.total += 1;
                if result.passed {
                    stats.passed += 1;
                }
            }
            if let Some(kind) = result.error_kind {
                *summary.error_kinds.entry(kind).or_insert(0) += 1;
            }
        }
        summary.pass_rate = pass_rate(summary.passed, summary.total);
        summary
    }
}

/// Results of one grading run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub generated_at: DateTime<Utc>,
    /// Digest of the dataset the answers were graded against
    pub dataset_digest: String,
    pub summary: Summary,
    pub results: Vec<ValidationResult>,
}

impl Report {
    pub fn new(dataset_digest: impl Into<String>, results: Vec<ValidationResult>) -> Self {
        Self {
            generated_at: Utc::now(),
            dataset_digest: dataset_digest.into(),
            summary: Summary::from_results(&results),
            results,
        }
    }

    /// Write the report as pretty-printed JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)
            .map_err(|e| GradeError::io_operation("write report", path.display(), e))?;
        tracing::info!(path = %path.display(), results = self.results.len(), "saved report");
        Ok(())
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GradeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)
            .map_err(|e| GradeError::io_operation("read report", path.display(), e))?;
        Ok(serde_json::from_str(&content)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(
        id: &str,
        category: Category,
        verdict: Verdict,
        kind: Option<ErrorKind>,
    ) -> ValidationResult {
        ValidationResult {
            question_id: id.to_string(),
            category: Some(category),
            policy: None,
            verdict,
            passed: verdict == Verdict::Pass,
            expected: None,
            extracted: None,
            rubric: None,
            error_kind: kind,
            diagnostic: None,
            notes: Vec::new(),
            response_excerpt: String::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let results = vec![
            result("a", Category::Basic, Verdict::Pass, None),
            result("b", Category::Basic, Verdict::Fail, Some(ErrorKind::IncorrectPlayer)),
            result("c", Category::Complex, Verdict::Fail, Some(ErrorKind::MissingRubricScores)),
            ValidationResult::errored(
                "d",
                None,
                "",
                &GradeError::UnknownQuestion { id: "d".into() },
            ),
        ];
        let summary = Summary::from_results(&results);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 1);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errored, 1);
        assert_eq!(summary.pass_rate, 25.0);
        assert_eq!(summary.by_category[&Category::Basic].total, 2);
        assert_eq!(summary.by_category[&Category::Basic].pass_rate(), 50.0);
        assert_eq!(summary.error_kinds[&ErrorKind::UnknownQuestion], 1);
        assert!(!summary.by_category.contains_key(&Category::Intermediate));
    }

    #[test]
    fn test_empty_summary() {
        let summary = Summary::from_results(&[]);
        assert_eq!(summary.pass_rate, 0.0);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = Report::new(
            "abc123",
            vec![result("a", Category::Basic, Verdict::Pass, None)],
        );
        report.save(&path).unwrap();

        let loaded = Report::load(&path).unwrap();
        assert_eq!(loaded.dataset_digest, "abc123");
        assert_eq!(loaded.summary, report.summary);
        assert_eq!(loaded.results.len(), 1);

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(raw["summary"]["by_category"]["basic"]["passed"], 1);
    }
}
