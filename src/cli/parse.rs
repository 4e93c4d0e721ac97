use statgrade_core::format::OutputFormat;
use statgrade_core::rubric::RubricScores;

/// Parse output format from string
pub fn parse_format(s: &str) -> std::result::Result<OutputFormat, String> {
    s.parse::<OutputFormat>().map_err(|e| e.to_string())
}

/// Parse rubric scores from "specificity,actionability,plausibility"
pub fn parse_rubric(s: &str) -> std::result::Result<RubricScores, String> {
    s.parse::<RubricScores>().map_err(|e| e.to_string())
}
