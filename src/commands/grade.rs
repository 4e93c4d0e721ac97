//! `statgrade grade` command - grade an answers file and report
//!
//! Every answer gets a result, including ones naming unknown questions.
//! The run fails only when the dataset, configuration or answers file cannot
//! be loaded.

use std::path::Path;

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, records_header, result};
use statgrade_core::error::{GradeError, Result};
use statgrade_core::report::Report;
use statgrade_core::rubric::KeywordRater;
use statgrade_core::trace_time;
use statgrade_core::validator::{fill_missing_rubric, load_answers, Validator};

/// Execute the grade command
pub fn execute(
    ctx: &CommandContext,
    answers_path: &Path,
    output: Option<&Path>,
    auto_rubric: bool,
) -> Result<()> {
    let session = ctx.load_session()?;
    let mut answers = load_answers(answers_path)?;

    if auto_rubric {
        let rater = KeywordRater::new(&session.dataset);
        let filled = fill_missing_rubric(&mut answers, &session.catalog, &rater);
        tracing::debug!(filled, "scored rubric answers with keyword heuristic");
    }

    let validator = Validator::new(&session.dataset, &session.catalog, &session.config)?;
    let started = std::time::Instant::now();
    let results = validator.run_batch(&answers);
    trace_time!(started, "run_batch", answers = answers.len());

    let report = Report::new(session.dataset.digest(), results);
    if let Some(path) = output {
        report.save(path)?;
    }
    let summary = &report.summary;

    output_by_format_result!(ctx.cli.format,
        json => {
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok::<(), GradeError>(())
        },
        human => {
            if !ctx.cli.quiet {
                for outcome in &report.results {
                    println!("{}", result::human(outcome));
                }
                println!();
            }
            println!(
                "{}/{} passed ({}%), {} failed, {} errors",
                summary.passed, summary.total, summary.pass_rate, summary.failed, summary.errored
            );
            if !ctx.cli.quiet {
                for (category, stats) in &summary.by_category {
                    println!(
                        "  {:<13} {}/{} ({}%)",
                        category,
                        stats.passed,
                        stats.total,
                        stats.pass_rate()
                    );
                }
                if let Some(path) = output {
                    println!("Report written to {}", path.display());
                }
            }
        },
        records => {
            println!(
                "{}",
                records_header(
                    &session.dataset,
                    "grade",
                    &format!(
                        "total={} passed={} failed={} errors={} pass_rate={} generated_at={}",
                        summary.total,
                        summary.passed,
                        summary.failed,
                        summary.errored,
                        summary.pass_rate,
                        report
                            .generated_at
                            .to_rfc3339_opts(chrono::SecondsFormat::Secs, true)
                    )
                )
            );
            for outcome in &report.results {
                for line in result::records(outcome) {
                    println!("{}", line);
                }
            }
        }
    )?;

    Ok(())
}
