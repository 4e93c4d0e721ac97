//! Validation result records

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::answer::Answer;
use crate::error::GradeError;
use crate::question::{Category, Policy, QuestionSpec};
use crate::rubric::RubricScores;

/// Characters of the response kept in a result
pub const EXCERPT_CHARS: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Pass,
    Fail,
    /// The validation could not be carried out
    Error,
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Verdict::Pass => write!(f, "pass"),
            Verdict::Fail => write!(f, "fail"),
            Verdict::Error => write!(f, "error"),
        }
    }
}

/// Why a validation failed or errored
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    IncorrectRecord,
    IncorrectCalculation,
    IncorrectPlayer,
    IncorrectPlayerSet,
    IncorrectShootingAnalysis,
    IncorrectOffensiveDepth,
    InsufficientRubricScores,
    MissingRubricScores,
    NoMatchFound,
    UnknownQuestion,
    MissingTolerance,
    InvalidValue,
    DatasetNotReady,
    Other,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::IncorrectRecord => "incorrect_record",
            ErrorKind::IncorrectCalculation => "incorrect_calculation",
            ErrorKind::IncorrectPlayer => "incorrect_player",
            ErrorKind::IncorrectPlayerSet => "incorrect_player_set",
            ErrorKind::IncorrectShootingAnalysis => "incorrect_shooting_analysis",
            ErrorKind::IncorrectOffensiveDepth => "incorrect_offensive_depth",
            ErrorKind::InsufficientRubricScores => "insufficient_rubric_scores",
            ErrorKind::MissingRubricScores => "missing_rubric_scores",
            ErrorKind::NoMatchFound => "no_match_found",
            ErrorKind::UnknownQuestion => "unknown_question",
            ErrorKind::MissingTolerance => "missing_tolerance",
            ErrorKind::InvalidValue => "invalid_value",
            ErrorKind::DatasetNotReady => "dataset_not_ready",
            ErrorKind::Other => "other",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&GradeError> for ErrorKind {
    fn from(err: &GradeError) -> Self {
        match err {
            GradeError::NoMatchFound { .. } => ErrorKind::NoMatchFound,
            GradeError::UnknownQuestion { .. } => ErrorKind::UnknownQuestion,
            GradeError::MissingTolerance { .. } => ErrorKind::MissingTolerance,
            GradeError::InvalidValue { .. } => ErrorKind::InvalidValue,
            GradeError::DatasetNotReady { .. } => ErrorKind::DatasetNotReady,
            _ => ErrorKind::Other,
        }
    }
}

/// Outcome of validating one response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationResult {
    pub question_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<Category>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<Policy>,
    pub verdict: Verdict,
    pub passed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extracted: Option<Answer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rubric: Option<RubricScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<ErrorKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub diagnostic: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub notes: Vec<String>,
    pub response_excerpt: String,
}

impl ValidationResult {
    /// Result for a validation that could not run
    pub fn errored(
        question_id: &str,
        question: Option<&QuestionSpec>,
        response: &str,
        err: &GradeError,
    ) -> Self {
        Self {
            question_id: question_id.to_string(),
            category: question.map(|q| q.category),
            policy: question.map(QuestionSpec::policy),
            verdict: Verdict::Error,
            passed: false,
            expected: None,
            extracted: None,
            rubric: None,
            error_kind: Some(ErrorKind::from(err)),
            diagnostic: Some(err.to_string()),
            notes: Vec::new(),
            response_excerpt: excerpt(response),
        }
    }
}

/// First [`EXCERPT_CHARS`] characters, with `...` when truncated
pub fn excerpt(response: &str) -> String {
    let mut chars = response.chars();
    let head: String = chars.by_ref().take(EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excerpt() {
        assert_eq!(excerpt("short"), "short");
        let long = "x".repeat(150);
        let cut = excerpt(&long);
        assert_eq!(cut.len(), EXCERPT_CHARS + 3);
        assert!(cut.ends_with("..."));
        assert_eq!(excerpt(&"y".repeat(EXCERPT_CHARS)), "y".repeat(EXCERPT_CHARS));
    }

    #[test]
    fn test_error_kind_serialization() {
        let json = serde_json::to_string(&ErrorKind::MissingRubricScores).unwrap();
        assert_eq!(json, "\"missing_rubric_scores\"");
        assert_eq!(
            ErrorKind::from(&GradeError::no_match("number")),
            ErrorKind::NoMatchFound
        );
    }

    #[test]
    fn test_errored_result() {
        let err = GradeError::UnknownQuestion { id: "nope".into() };
        let result = ValidationResult::errored("nope", None, "text", &err);
        assert_eq!(result.verdict, Verdict::Error);
        assert!(!result.passed);
        assert_eq!(result.error_kind, Some(ErrorKind::UnknownQuestion));
        assert_eq!(result.diagnostic.as_deref(), Some("unknown question: nope"));
    }
}
