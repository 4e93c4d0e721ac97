//! `statgrade prompt` command - print the full prompt for one question

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, records_header};
use statgrade_core::error::{GradeError, Result};
use statgrade_core::question::prompt_for;

/// Execute the prompt command
pub fn execute(ctx: &CommandContext, id: &str) -> Result<()> {
    let session = ctx.load_session()?;
    let question = session.catalog.require(id)?;
    let prompt = prompt_for(question, &session.dataset);

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "id": question.id,
                "category": question.category,
                "question": question.prompt,
                "prompt": prompt,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), GradeError>(())
        },
        human => {
            println!("{}", prompt);
        },
        records => {
            println!(
                "{}",
                records_header(&session.dataset, "prompt", &format!("question={}", question.id))
            );
            for line in prompt.lines() {
                println!("B {}", line);
            }
        }
    )?;

    Ok(())
}
