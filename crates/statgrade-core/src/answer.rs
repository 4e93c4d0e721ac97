//! Answer values: what the oracle expects and what extraction finds

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dataset::{ShootingPct, WinLoss};

/// A player's shooting percentage, as expected or as stated in a response
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerShooting {
    pub player: String,
    pub shooting_pct: ShootingPct,
}

impl PlayerShooting {
    /// Rate as a number, `None` when undefined
    pub fn rate(&self) -> Option<f64> {
        self.shooting_pct.rate()
    }
}

/// A single answer value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum Answer {
    /// A win-loss record
    Record(WinLoss),
    /// An integer count
    Count(u32),
    /// A number read from text; may carry decimals
    Number(f64),
    /// A player, optionally with the statistic they lead in
    Player { name: String, stat: Option<u32> },
    /// A set of player names
    Names(BTreeSet<String>),
    /// A shooting percentage
    Percentage(ShootingPct),
    /// Shooting percentages for several players
    Shooting(Vec<PlayerShooting>),
    /// Scored by an external rater rather than compared to ground truth
    Rubric { pass_threshold: u8 },
}

/// Format a number without a trailing `.0`
pub fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Answer::Record(record) => write!(f, "{}", record),
            Answer::Count(count) => write!(f, "{}", count),
            Answer::Number(value) => write!(f, "{}", format_number(*value)),
            Answer::Player {
                name,
                stat: Some(stat),
            } => write!(f, "{} ({})", name, stat),
            Answer::Player { name, stat: None } => write!(f, "{}", name),
            Answer::Names(names) if names.is_empty() => write!(f, "(none)"),
            Answer::Names(names) => {
                let joined: Vec<&str> = names.iter().map(String::as_str).collect();
                write!(f, "{}", joined.join(", "))
            }
            Answer::Percentage(pct) => write!(f, "{}", pct),
            Answer::Shooting(entries) => {
                let parts: Vec<String> = entries
                    .iter()
                    .map(|e| format!("{} {}", e.player, e.shooting_pct))
                    .collect();
                write!(f, "{}", parts.join(", "))
            }
            Answer::Rubric { pass_threshold } => {
                write!(f, "rubric (every dimension >= {})", pass_threshold)
            }
        }
    }
}
