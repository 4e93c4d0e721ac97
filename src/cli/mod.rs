//! CLI argument parsing for statgrade
//!
//! Global flags select the dataset, configuration, question catalog and
//! output format; subcommands print ground truth or grade responses.

pub mod format;
pub mod parse;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use parse::{parse_format, parse_rubric};
use statgrade_core::rubric::RubricScores;

pub use statgrade_core::format::OutputFormat;

/// statgrade - grade LLM answers about a season of lacrosse statistics
#[derive(Parser, Debug)]
#[command(name = "statgrade")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Players CSV (name, goals, assists, shots, games_played); requires --team
    #[arg(long, global = true, requires = "team")]
    pub players: Option<PathBuf>,

    /// Team facts TOML (record, splits, stated totals); requires --players
    #[arg(long, global = true, requires = "players")]
    pub team: Option<PathBuf>,

    /// Grading configuration (defaults to ./statgrade.toml when present)
    #[arg(long, global = true, env = "STATGRADE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Question catalog YAML (defaults to the built-in catalog)
    #[arg(long, global = true)]
    pub questions: Option<PathBuf>,

    /// Output format: human, json or records
    #[arg(long, global = true, default_value = "human", value_parser = parse_format)]
    pub format: OutputFormat,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    pub quiet: bool,

    /// Debug logging and phase timings
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Log level (error, warn, info, debug, trace) or a full filter directive
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the expected answer for every question
    Truth,

    /// List the question catalog
    Questions,

    /// Print the data context block shown to a model
    Context,

    /// Print the full prompt for one question
    Prompt {
        /// Question id
        id: String,
    },

    /// Validate one response
    Validate {
        /// Question id
        id: String,

        /// Response text (read from stdin when omitted)
        #[arg(long, short)]
        response: Option<String>,

        /// Rubric scores as specificity,actionability,plausibility (e.g. 4,3,5)
        #[arg(long, value_parser = parse_rubric, conflicts_with = "auto_rubric")]
        rubric: Option<RubricScores>,

        /// Score rubric questions with the keyword heuristic
        #[arg(long)]
        auto_rubric: bool,
    },

    /// Grade an answers file (YAML, or JSON with a .json extension)
    Grade {
        /// Answers file
        answers: PathBuf,

        /// Write the report as JSON to this path
        #[arg(long, short)]
        output: Option<PathBuf>,

        /// Score rubric answers that carry no scores with the keyword heuristic
        #[arg(long)]
        auto_rubric: bool,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_players_requires_team() {
        let err = Cli::try_parse_from(["statgrade", "--players", "p.csv", "truth"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::MissingRequiredArgument);

        let cli =
            Cli::try_parse_from(["statgrade", "--players", "p.csv", "--team", "t.toml", "truth"])
                .unwrap();
        assert!(cli.players.is_some() && cli.team.is_some());
    }

    #[test]
    fn test_format_flag() {
        let cli = Cli::try_parse_from(["statgrade", "--format", "records", "truth"]).unwrap();
        assert_eq!(cli.format, OutputFormat::Records);

        let err = Cli::try_parse_from(["statgrade", "--format", "xml", "truth"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_validate_args() {
        let cli = Cli::try_parse_from([
            "statgrade",
            "validate",
            "strategic_analysis",
            "--response",
            "Press higher",
            "--rubric",
            "4,3,5",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::Validate { id, rubric, .. }) => {
                assert_eq!(id, "strategic_analysis");
                assert_eq!(rubric, Some(RubricScores::new(4, 3, 5).unwrap()));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_rubric_conflicts_with_auto_rubric() {
        let err = Cli::try_parse_from([
            "statgrade",
            "validate",
            "strategic_analysis",
            "--rubric",
            "4,3,5",
            "--auto-rubric",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
    }
}
