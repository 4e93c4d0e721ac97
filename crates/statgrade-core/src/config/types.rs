//! Configuration type definitions

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Tolerance key for per-player shooting percentages
pub const SHOOTING_PCT_TOLERANCE: &str = "shooting_pct";

/// Tolerance key for team-wide goal/assist totals
pub const TEAM_TOTAL_TOLERANCE: &str = "team_total";

/// Grading configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradeConfig {
    /// Absolute tolerances keyed by name, referenced from tolerance policies
    #[serde(default = "default_tolerances")]
    pub tolerances: BTreeMap<String, f64>,

    /// Rubric thresholding
    #[serde(default)]
    pub rubric: RubricConfig,

    /// Numeric extraction tuning
    #[serde(default)]
    pub extraction: ExtractionConfig,

    /// Parameters of the built-in question catalog
    #[serde(default)]
    pub thresholds: ThresholdConfig,
}

impl Default for GradeConfig {
    fn default() -> Self {
        Self {
            tolerances: default_tolerances(),
            rubric: RubricConfig::default(),
            extraction: ExtractionConfig::default(),
            thresholds: ThresholdConfig::default(),
        }
    }
}

fn default_tolerances() -> BTreeMap<String, f64> {
    BTreeMap::from([
        (SHOOTING_PCT_TOLERANCE.to_string(), 0.5),
        (TEAM_TOTAL_TOLERANCE.to_string(), 0.5),
    ])
}

/// Rubric pass rule: every dimension must reach `pass_threshold`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RubricConfig {
    #[serde(default = "default_pass_threshold")]
    pub pass_threshold: u8,
}

impl Default for RubricConfig {
    fn default() -> Self {
        Self {
            pass_threshold: default_pass_threshold(),
        }
    }
}

fn default_pass_threshold() -> u8 {
    3
}

/// Numeric extraction tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Maximum words between an anchor (keyword or player name) and a number
    #[serde(default = "default_window_words")]
    pub window_words: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            window_words: default_window_words(),
        }
    }
}

fn default_window_words() -> usize {
    6
}

/// Parameters used when building the built-in question catalog
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    /// Minimum shots to qualify for "best shooter"
    #[serde(default = "default_qualified_min_shots")]
    pub qualified_min_shots: u32,

    /// Goals needed to count as an active scorer
    #[serde(default = "default_active_scorer_goals")]
    pub active_scorer_goals: u32,

    /// Goals needed to count towards offensive depth
    #[serde(default = "default_depth_goals")]
    pub depth_goals: u32,

    /// How many top scorers the shooting analysis covers
    #[serde(default = "default_top_shooters")]
    pub top_shooters: usize,
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            qualified_min_shots: default_qualified_min_shots(),
            active_scorer_goals: default_active_scorer_goals(),
            depth_goals: default_depth_goals(),
            top_shooters: default_top_shooters(),
        }
    }
}

fn default_qualified_min_shots() -> u32 {
    10
}

fn default_active_scorer_goals() -> u32 {
    5
}

fn default_depth_goals() -> u32 {
    10
}

fn default_top_shooters() -> usize {
    3
}
