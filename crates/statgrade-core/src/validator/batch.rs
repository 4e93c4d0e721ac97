//! Batch validation over an answers file
//!
//! An answers file is a YAML or JSON list:
//!
//! ```yaml
//! - question: top_scorer
//!   response: Meaghan Tyrrell led the team with 70 goals.
//! - question: strategic_analysis
//!   response: ...
//!   rubric: { specificity: 4, actionability: 3, plausibility: 5 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::{ValidationResult, Validator};
use crate::error::{GradeError, Result};
use crate::question::{QuestionCatalog, QuestionKind};
use crate::rubric::{Rater, RubricScores};

/// One model response to grade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnswerEntry {
    /// Question id
    pub question: String,
    pub response: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<RubricScores>,
}

impl AnswerEntry {
    pub fn new(question: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            response: response.into(),
            rubric: None,
        }
    }
}

/// Parse answers from JSON or YAML text
pub fn parse_answers(content: &str, json: bool) -> Result<Vec<AnswerEntry>> {
    if json {
        Ok(serde_json::from_str(content)?)
    } else {
        Ok(serde_yaml::from_str(content)?)
    }
}

/// Load answers; `.json` files are read as JSON, anything else as YAML
pub fn load_answers(path: &Path) -> Result<Vec<AnswerEntry>> {
    if !path.exists() {
        return Err(GradeError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let content = fs::read_to_string(path)
        .map_err(|e| GradeError::io_operation("read answers", path.display(), e))?;
    let json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let answers = parse_answers(&content, json)?;
    tracing::debug!(path = %path.display(), count = answers.len(), "loaded answers");
    Ok(answers)
}

/// Score rubric questions that came without scores. Returns how many were
/// filled in.
pub fn fill_missing_rubric(
    answers: &mut [AnswerEntry],
    catalog: &QuestionCatalog,
    rater: &dyn Rater,
) -> usize {
    let mut filled = 0;
    for answer in answers.iter_mut().filter(|a| a.rubric.is_none()) {
        let is_rubric = catalog
            .get(&answer.question)
            .is_some_and(|q| q.kind == QuestionKind::Rubric);
        if is_rubric {
            answer.rubric = Some(rater.rate(&answer.response));
            filled += 1;
        }
    }
    filled
}

impl Validator<'_> {
    /// Validate answers in order. Errors become `error` results.
    pub fn run_batch(&self, answers: &[AnswerEntry]) -> Vec<ValidationResult> {
        answers
            .iter()
            .map(|answer| {
                self.validate_with_rubric(&answer.question, &answer.response, answer.rubric)
                    .unwrap_or_else(|err| {
                        tracing::warn!(
                            question = %answer.question,
                            error = %err,
                            "validation could not run"
                        );
                        ValidationResult::errored(
                            &answer.question,
                            self.catalog.get(&answer.question),
                            &answer.response,
                            &err,
                        )
                    })
            })
            .collect()
    }
}
