//! CLI commands for statgrade

pub mod context;
pub mod dispatch;
pub mod format;
pub mod grade;
pub mod prompt;
pub mod questions;
pub mod truth;
pub mod validate;
