//! `statgrade questions` command - list the question catalog

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, records_header};
use statgrade_core::error::{GradeError, Result};
use statgrade_core::format::record_value;

/// Execute the questions command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let session = ctx.load_session()?;
    let catalog = &session.catalog;

    output_by_format_result!(ctx.cli.format,
        json => {
            let questions: Vec<_> = catalog
                .iter()
                .map(|q| {
                    serde_json::json!({
                        "id": q.id,
                        "category": q.category,
                        "policy": q.policy(),
                        "prompt": q.prompt,
                        "kind": q.kind,
                    })
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&questions)?);
            Ok::<(), GradeError>(())
        },
        human => {
            if catalog.is_empty() {
                if !ctx.cli.quiet {
                    println!("No questions");
                }
            } else {
                for q in catalog.iter() {
                    println!("{:<22} [{}] {}", q.id, q.category, q.prompt);
                }
            }
        },
        records => {
            println!(
                "{}",
                records_header(&session.dataset, "questions", &format!("questions={}", catalog.len()))
            );
            for q in catalog.iter() {
                println!(
                    "Q {} {} {} {}",
                    q.id,
                    q.category,
                    q.policy(),
                    record_value(&q.prompt)
                );
            }
        }
    )?;

    Ok(())
}
