//! Response validation
//!
//! A [`Validator`] ties the question catalog, the oracle and the extractor
//! together. Validating a response looks up the question, computes the
//! expected answer, extracts candidate values from the text and compares them
//! under the question's policy.
//!
//! Extraction failures are ordinary failed validations. Configuration
//! problems (unknown question, missing tolerance) are returned as errors;
//! [`Validator::run_batch`] records those as `error` results and carries on.

pub mod batch;
mod grade;
pub mod outcome;

use crate::config::GradeConfig;
use crate::dataset::SeasonDataset;
use crate::error::{ErrorCategory, Result};
use crate::extract::Extractor;
use crate::oracle::Oracle;
use crate::question::{Policy, QuestionCatalog, QuestionKind};
use crate::rubric::RubricScores;

pub use batch::{fill_missing_rubric, load_answers, parse_answers, AnswerEntry};
pub use outcome::{excerpt, ErrorKind, ValidationResult, Verdict, EXCERPT_CHARS};

use grade::Graded;

/// Grades responses against one dataset and catalog
#[derive(Debug, Clone)]
pub struct Validator<'a> {
    dataset: &'a SeasonDataset,
    catalog: &'a QuestionCatalog,
    config: &'a GradeConfig,
    oracle: Oracle<'a>,
    extractor: Extractor<'a>,
}

impl<'a> Validator<'a> {
    /// Fails with `DatasetNotReady` when the dataset is empty
    pub fn new(
        dataset: &'a SeasonDataset,
        catalog: &'a QuestionCatalog,
        config: &'a GradeConfig,
    ) -> Result<Self> {
        let oracle = Oracle::new(dataset)?.with_pass_threshold(config.rubric.pass_threshold);
        let extractor = Extractor::new(dataset, config.extraction.window_words)?;
        Ok(Self {
            dataset,
            catalog,
            config,
            oracle,
            extractor,
        })
    }

    pub fn catalog(&self) -> &'a QuestionCatalog {
        self.catalog
    }

    pub fn oracle(&self) -> &Oracle<'a> {
        &self.oracle
    }

    /// Validate a response without rubric scores
    pub fn validate(&self, question_id: &str, response: &str) -> Result<ValidationResult> {
        self.validate_with_rubric(question_id, response, None)
    }

    /// Validate a response; `rubric` is only used by rubric questions
    pub fn validate_with_rubric(
        &self,
        question_id: &str,
        response: &str,
        rubric: Option<RubricScores>,
    ) -> Result<ValidationResult> {
        let question = self.catalog.require(question_id)?;
        let policy = question.policy();
        let tolerance = match &policy {
            Policy::Tolerance { key } => Some(self.config.tolerance(key)?),
            _ => None,
        };
        let expected = self.oracle.expected(&question.kind)?;

        let mut graded = match self.grade(question, &expected, response, tolerance, rubric) {
            Ok(graded) => graded,
            Err(err) if err.category() == ErrorCategory::Extraction => Graded::no_match(&err),
            Err(err) => return Err(err),
        };
        if rubric.is_some() && question.kind != QuestionKind::Rubric {
            graded
                .notes
                .push("rubric scores ignored for a non-rubric question".to_string());
        }

        let result = ValidationResult {
            question_id: question.id.clone(),
            category: Some(question.category),
            policy: Some(policy),
            verdict: if graded.passed {
                Verdict::Pass
            } else {
                Verdict::Fail
            },
            passed: graded.passed,
            expected: Some(expected),
            extracted: graded.extracted,
            rubric: graded.rubric,
            error_kind: graded.error_kind,
            diagnostic: graded.diagnostic,
            notes: graded.notes,
            response_excerpt: excerpt(response),
        };

        tracing::debug!(
            question = %result.question_id,
            verdict = %result.verdict,
            error_kind = ?result.error_kind,
            "validated response"
        );
        Ok(result)
    }
}
