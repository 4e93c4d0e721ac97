//! `statgrade validate` command - grade one response
//!
//! The response comes from `--response` or stdin. A failed validation is
//! still a successful run; only unknown questions and configuration problems
//! exit non-zero.

use std::io::{self, Read};

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format, records_header, result};
use statgrade_core::error::{GradeError, Result};
use statgrade_core::question::QuestionKind;
use statgrade_core::rubric::{KeywordRater, Rater, RubricScores};
use statgrade_core::validator::Validator;

pub struct ValidateOptions<'a> {
    pub id: &'a str,
    pub response: Option<&'a str>,
    pub rubric: Option<RubricScores>,
    pub auto_rubric: bool,
}

fn read_response(response: Option<&str>) -> Result<String> {
    match response {
        Some(text) => Ok(text.to_string()),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| GradeError::io_operation("read response from", "stdin", e))?;
            Ok(buf)
        }
    }
}

/// Execute the validate command
pub fn execute(ctx: &CommandContext, opts: ValidateOptions) -> Result<()> {
    let session = ctx.load_session()?;
    let question = session.catalog.require(opts.id)?;
    let response = read_response(opts.response)?;

    let rubric = match opts.rubric {
        Some(scores) => Some(scores),
        None if opts.auto_rubric && question.kind == QuestionKind::Rubric => {
            let scores = KeywordRater::new(&session.dataset).rate(&response);
            tracing::debug!(question = %question.id, scores = %scores, "keyword rubric scores");
            Some(scores)
        }
        None => None,
    };

    let validator = Validator::new(&session.dataset, &session.catalog, &session.config)?;
    let outcome = validator.validate_with_rubric(opts.id, &response, rubric)?;

    output_by_format!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        },
        human => {
            println!("{}", result::human(&outcome));
        },
        records => {
            println!(
                "{}",
                records_header(&session.dataset, "validate", &format!("question={}", outcome.question_id))
            );
            for line in result::records(&outcome) {
                println!("{}", line);
            }
        }
    );

    Ok(())
}
