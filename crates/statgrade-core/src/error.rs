//! Error types and exit codes for statgrade
//!
//! Exit codes:
//! - 0: Success
//! - 1: Generic failure
//! - 2: Usage or configuration error (bad flags, unknown question, missing tolerance)
//! - 3: Data error (malformed dataset rows, totals that do not add up)

mod macros;

use std::path::PathBuf;
use thiserror::Error;

/// Exit codes used by the statgrade CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success (0)
    Success = 0,
    /// Generic failure (1)
    Failure = 1,
    /// Usage or configuration error (2)
    Usage = 2,
    /// Data error (3)
    Data = 3,
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> i32 {
        code as i32
    }
}

/// Coarse category of an error, used to decide whether a run can continue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// The dataset itself is unusable; abort the run.
    Data,
    /// No usable value in the model text; the validation fails.
    Extraction,
    /// A single validation is misconfigured; skip it and continue.
    Configuration,
    /// Anything else (IO, parse errors of input files).
    Other,
}

/// Errors that can occur while loading data or grading answers
#[derive(Error, Debug)]
pub enum GradeError {
    // Usage errors (exit code 2)
    #[error("unknown format: {0} (expected: human, json, or records)")]
    UnknownFormat(String),

    #[error("{0}")]
    UsageError(String),

    // Configuration errors (exit code 2)
    #[error("unknown question: {id}")]
    UnknownQuestion { id: String },

    #[error("duplicate question id: {id}")]
    DuplicateQuestion { id: String },

    #[error("no tolerance configured for '{key}' (add it under [tolerances])")]
    MissingTolerance { key: String },

    #[error("invalid {context}: {value}")]
    InvalidValue { context: String, value: String },

    // Data errors (exit code 3)
    #[error("malformed record at line {line}: {reason}")]
    MalformedRecord { line: usize, reason: String },

    #[error("{what} mismatch: stated {stated}, computed {computed}")]
    TotalsMismatch {
        what: String,
        stated: String,
        computed: String,
    },

    #[error("dataset not ready: {reason}")]
    DatasetNotReady { reason: String },

    #[error("file not found: {path:?}")]
    FileNotFound { path: PathBuf },

    // Extraction errors (recorded as a failed validation)
    #[error("no {expected} found in response")]
    NoMatchFound { expected: String },

    // Generic failures (exit code 1)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("YAML parsing error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("failed to {operation} {target}: {reason}")]
    FailedOperation {
        operation: String,
        target: String,
        reason: String,
    },

    #[error("{0}")]
    Other(String),
}

impl GradeError {
    /// Create an error for a malformed dataset row
    pub fn malformed(line: usize, reason: impl Into<String>) -> Self {
        GradeError::MalformedRecord {
            line,
            reason: reason.into(),
        }
    }

    /// Create an error for stated totals that disagree with computed ones
    pub fn totals_mismatch(
        what: &str,
        stated: impl std::fmt::Display,
        computed: impl std::fmt::Display,
    ) -> Self {
        GradeError::TotalsMismatch {
            what: what.to_string(),
            stated: stated.to_string(),
            computed: computed.to_string(),
        }
    }

    /// Create an error for an invalid value or configuration
    pub fn invalid_value(context: &str, value: impl std::fmt::Display) -> Self {
        GradeError::InvalidValue {
            context: context.to_string(),
            value: value.to_string(),
        }
    }

    /// Create an extraction failure for a missing value
    pub fn no_match(expected: impl Into<String>) -> Self {
        GradeError::NoMatchFound {
            expected: expected.into(),
        }
    }

    /// Create an error for a failed IO operation with context
    pub fn io_operation(
        operation: &str,
        path: impl std::fmt::Display,
        error: impl std::fmt::Display,
    ) -> Self {
        GradeError::FailedOperation {
            operation: operation.to_string(),
            target: path.to_string(),
            reason: error.to_string(),
        }
    }

    /// Category of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            GradeError::MalformedRecord { .. }
            | GradeError::TotalsMismatch { .. }
            | GradeError::DatasetNotReady { .. }
            | GradeError::FileNotFound { .. }
            | GradeError::Csv(_) => ErrorCategory::Data,

            GradeError::NoMatchFound { .. } => ErrorCategory::Extraction,

            GradeError::UnknownFormat(_)
            | GradeError::UsageError(_)
            | GradeError::UnknownQuestion { .. }
            | GradeError::DuplicateQuestion { .. }
            | GradeError::MissingTolerance { .. }
            | GradeError::InvalidValue { .. } => ErrorCategory::Configuration,

            GradeError::Io(_)
            | GradeError::Yaml(_)
            | GradeError::Json(_)
            | GradeError::Toml(_)
            | GradeError::FailedOperation { .. }
            | GradeError::Other(_) => ErrorCategory::Other,
        }
    }

    /// Get the appropriate exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        match self.category() {
            ErrorCategory::Configuration => ExitCode::Usage,
            ErrorCategory::Data => ExitCode::Data,
            ErrorCategory::Extraction | ErrorCategory::Other => ExitCode::Failure,
        }
    }

    /// Stable snake_case identifier, used in reports and JSON errors
    pub fn error_type(&self) -> &'static str {
        match self {
            GradeError::UnknownFormat(_) => "unknown_format",
            GradeError::UsageError(_) => "usage_error",
            GradeError::UnknownQuestion { .. } => "unknown_question",
            GradeError::DuplicateQuestion { .. } => "duplicate_question",
            GradeError::MissingTolerance { .. } => "missing_tolerance",
            GradeError::InvalidValue { .. } => "invalid_value",
            GradeError::MalformedRecord { .. } => "malformed_record",
            GradeError::TotalsMismatch { .. } => "totals_mismatch",
            GradeError::DatasetNotReady { .. } => "dataset_not_ready",
            GradeError::FileNotFound { .. } => "file_not_found",
            GradeError::NoMatchFound { .. } => "no_match_found",
            GradeError::Io(_) => "io_error",
            GradeError::Csv(_) => "csv_error",
            GradeError::Yaml(_) => "yaml_error",
            GradeError::Json(_) => "json_error",
            GradeError::Toml(_) => "toml_error",
            GradeError::FailedOperation { .. } => "failed_operation",
            GradeError::Other(_) => "other",
        }
    }

    /// Convert error to JSON representation for structured error output.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "error": {
                "code": self.exit_code() as i32,
                "type": self.error_type(),
                "message": self.to_string(),
            }
        })
    }
}

/// Result type alias for statgrade operations
pub type Result<T> = std::result::Result<T, GradeError>;
