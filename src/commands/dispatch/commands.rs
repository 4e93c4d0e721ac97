//! Command implementations for all statgrade commands

use crate::cli::Commands;
use crate::commands::dispatch::command::{Command, CommandContext};
use crate::commands::{context, grade, prompt, questions, truth, validate};
use statgrade_core::error::Result;

impl Command for Commands {
    fn execute(&self, ctx: &CommandContext) -> Result<()> {
        match self {
            Commands::Truth => truth::execute(ctx),
            Commands::Questions => questions::execute(ctx),
            Commands::Context => context::execute(ctx),
            Commands::Prompt { id } => prompt::execute(ctx, id),
            Commands::Validate {
                id,
                response,
                rubric,
                auto_rubric,
            } => validate::execute(
                ctx,
                validate::ValidateOptions {
                    id,
                    response: response.as_deref(),
                    rubric: *rubric,
                    auto_rubric: *auto_rubric,
                },
            ),
            Commands::Grade {
                answers,
                output,
                auto_rubric,
            } => grade::execute(ctx, answers, output.as_deref(), *auto_rubric),
        }
    }
}
