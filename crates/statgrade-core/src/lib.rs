//! Statgrade Core Library
//!
//! Ground truth, answer extraction and grading for language-model answers
//! about a season of player statistics.

pub mod answer;
pub mod config;
pub mod dataset;
pub mod error;
pub mod extract;
pub mod format;
pub mod logging;
pub mod oracle;
pub mod question;
pub mod report;
pub mod rubric;
pub mod validator;

pub use error::{GradeError, Result};
