//! Shared output helpers for command modules
//!
//! The dispatch macros live in `crate::cli::format` and are re-exported here.

pub mod result;

pub use crate::output_by_format;
pub use crate::output_by_format_result;

use statgrade_core::dataset::SeasonDataset;

/// Records header line
pub fn records_header(dataset: &SeasonDataset, mode: &str, extra: &str) -> String {
    let mut line = format!(
        "H statgrade=1 records=1 dataset={} mode={}",
        short_digest(dataset.digest()),
        mode
    );
    if !extra.is_empty() {
        line.push(' ');
        line.push_str(extra);
    }
    line
}

/// First twelve hex digits of a digest
pub fn short_digest(digest: &str) -> &str {
    digest.get(..12).unwrap_or(digest)
}
