//! `statgrade context` command - print the data context block

use crate::commands::dispatch::CommandContext;
use crate::commands::format::{output_by_format_result, records_header};
use statgrade_core::error::{GradeError, Result};

/// Execute the context command
pub fn execute(ctx: &CommandContext) -> Result<()> {
    let dataset = ctx.load_dataset()?;
    let block = dataset.context_block();

    output_by_format_result!(ctx.cli.format,
        json => {
            let output = serde_json::json!({
                "team": dataset.team().label(),
                "dataset_digest": dataset.digest(),
                "players": dataset.len(),
                "context": block,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
            Ok::<(), GradeError>(())
        },
        human => {
            println!("{}", block);
        },
        records => {
            println!(
                "{}",
                records_header(&dataset, "context", &format!("players={}", dataset.len()))
            );
            for line in block.lines() {
                println!("B {}", line);
            }
        }
    )?;

    Ok(())
}
