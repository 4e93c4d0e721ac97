//! Output formats shared by every command
//!
//! - human: readable text for a terminal
//! - json: stable, machine-readable JSON
//! - records: one line per fact, prefixed with a record type letter

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::GradeError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Human,
    Json,
    Records,
}

impl FromStr for OutputFormat {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(OutputFormat::Human),
            "json" => Ok(OutputFormat::Json),
            "records" => Ok(OutputFormat::Records),
            other => Err(GradeError::UnknownFormat(other.to_string())),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Human => write!(f, "human"),
            OutputFormat::Json => write!(f, "json"),
            OutputFormat::Records => write!(f, "records"),
        }
    }
}

/// Quote a value for a records line when it contains whitespace or quotes
pub fn record_value(value: &str) -> String {
    if !value.is_empty() && !value.contains(|c: char| c.is_whitespace() || c == '"') {
        value.to_string()
    } else {
        format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_format() {
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert_eq!(
            "records".parse::<OutputFormat>().unwrap(),
            OutputFormat::Records
        );
        let err = "yaml".parse::<OutputFormat>().unwrap_err();
        assert!(matches!(err, GradeError::UnknownFormat(ref f) if f == "yaml"));
    }

    #[test]
    fn test_record_value_quoting() {
        assert_eq!(record_value("top_scorer"), "top_scorer");
        assert_eq!(record_value("Meaghan Tyrrell"), "\"Meaghan Tyrrell\"");
        assert_eq!(record_value(""), "\"\"");
        assert_eq!(record_value("say \"hi\""), "\"say \\\"hi\\\"\"");
    }
}
