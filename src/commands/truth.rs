//! `statgrade truth` command - print the expected answer for every question

use serde::Serialize;

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, records_header};
use statgrade_core::answer::Answer;
use statgrade_core::error::{GradeError, Result};
use statgrade_core::format::record_value;
use statgrade_core::oracle::Oracle;
use statgrade_core::question::{Category, Policy};

/// Ground truth for one question
#[derive(Debug, Serialize)]
struct TruthRow {
    id: String,
    category: Category,
    policy: Policy,
    #[serde(skip_serializing_if = "Option::is_none")]
    tolerance: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    expected: Option<Answer>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

/// Execute the truth command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let session = ctx.load_session()?;
    let oracle =
        Oracle::new(&session.dataset)?.with_pass_threshold(session.config.rubric.pass_threshold);

    let rows: Vec<TruthRow> = session
        .catalog
        .iter()
        .map(|question| {
            let policy = question.policy();
            let tolerance = match &policy {
                Policy::Tolerance { key } => session.config.tolerance(key).ok(),
                _ => None,
            };
            let (expected, error) = match oracle.expected(&question.kind) {
                Ok(answer) => (Some(answer), None),
                Err(err) => {
                    tracing::warn!(question = %question.id, error = %err, "no ground truth");
                    (None, Some(err.to_string()))
                }
            };
            TruthRow {
                id: question.id.clone(),
                category: question.category,
                policy,
                tolerance,
                expected,
                error,
            }
        })
        .collect();

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "team": session.dataset.team().label(),
                "dataset_digest": session.dataset.digest(),
                "questions": rows,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), GradeError>(())
        },
        human => {
            println!("{}", session.dataset.team().label());
            println!();
            for row in &rows {
                let value = match (&row.expected, &row.error) {
                    (Some(answer), _) => answer.to_string(),
                    (None, Some(error)) => format!("error: {}", error),
                    (None, None) => "-".to_string(),
                };
                match row.tolerance {
                    Some(tolerance) => println!("{:<22} {} (\u{b1}{})", row.id, value, tolerance),
                    None => println!("{:<22} {}", row.id, value),
                }
            }
        },
        records => {
            println!(
                "{}",
                records_header(&session.dataset, "truth", &format!("questions={}", rows.len()))
            );
            for row in &rows {
                let value = match (&row.expected, &row.error) {
                    (Some(answer), _) => format!("expected={}", record_value(&answer.to_string())),
                    (None, Some(error)) => format!("error={}", record_value(error)),
                    (None, None) => "expected=-".to_string(),
                };
                println!("T {} {} {} {}", row.id, row.category, row.policy, value);
            }
        }
    )?;

    Ok(())
}
