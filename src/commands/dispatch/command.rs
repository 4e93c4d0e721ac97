//! Command trait and context for dispatching commands

use std::path::PathBuf;
use std::time::Instant;

use super::macros::trace_command;
use crate::cli::Cli;
use statgrade_core::config::GradeConfig;
use statgrade_core::dataset::SeasonDataset;
use statgrade_core::error::Result;
use statgrade_core::question::QuestionCatalog;
use statgrade_core::trace_time;

/// Everything a grading command needs, loaded once
pub struct Session {
    pub dataset: SeasonDataset,
    pub config: GradeConfig,
    pub catalog: QuestionCatalog,
}

/// Shared context for command execution
pub struct CommandContext<'a> {
    pub cli: &'a Cli,
    pub root: &'a PathBuf,
    pub start: Instant,
}

impl<'a> CommandContext<'a> {
    pub fn new(cli: &'a Cli, root: &'a PathBuf, start: Instant) -> Self {
        Self { cli, root, start }
    }

    /// The dataset named by `--players`/`--team`, or the built-in season
    pub fn load_dataset(&self) -> Result<SeasonDataset> {
        let started = Instant::now();
        let dataset = match (&self.cli.players, &self.cli.team) {
            (Some(players), Some(team)) => SeasonDataset::load(players, team)?,
            _ => SeasonDataset::builtin()?,
        };
        trace_time!(started, "load_dataset", players = dataset.len());
        trace_command!(self.cli, self.start, "load_dataset");
        Ok(dataset)
    }

    pub fn load_config(&self) -> Result<GradeConfig> {
        GradeConfig::load_or_default(self.cli.config.as_deref(), self.root)
    }

    /// The catalog from `--questions`, or the built-in one sized by `config`
    pub fn load_catalog(&self, config: &GradeConfig) -> Result<QuestionCatalog> {
        match &self.cli.questions {
            Some(path) => QuestionCatalog::load(path),
            None => Ok(QuestionCatalog::builtin(&config.thresholds)),
        }
    }

    pub fn load_session(&self) -> Result<Session> {
        let config = self.load_config()?;
        let catalog = self.load_catalog(&config)?;
        let dataset = self.load_dataset()?;
        Ok(Session {
            dataset,
            config,
            catalog,
        })
    }
}

/// Trait for commands that can be executed
pub trait Command {
    fn execute(&self, ctx: &CommandContext) -> Result<()>;
}

/// No-op command (when no subcommand is provided)
pub struct NoCommand;

impl Command for NoCommand {
    fn execute(&self, _ctx: &CommandContext) -> Result<()> {
        println!("statgrade {}", env!("CARGO_PKG_VERSION"));
        println!();
        println!("Grades LLM answers about a season of lacrosse statistics.");
        println!();
        println!("Run `statgrade --help` for usage information.");
        Ok(())
    }
}
