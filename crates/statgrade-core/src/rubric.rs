//! Rubric scores for open-ended answers
//!
//! Scores come from an external rater (a person, or another model). The
//! validator only stores and thresholds them. [`KeywordRater`] is a cheap
//! heuristic rater for runs where no human scores are available.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dataset::SeasonDataset;
use crate::error::{GradeError, Result};

/// Lowest allowed score
pub const MIN_SCORE: u8 = 1;
/// Highest allowed score
pub const MAX_SCORE: u8 = 5;

/// Scores on the three rubric dimensions, each 1 to 5
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawScores")]
pub struct RubricScores {
    pub specificity: u8,
    pub actionability: u8,
    pub plausibility: u8,
}

#[derive(Deserialize)]
struct RawScores {
    specificity: u8,
    actionability: u8,
    plausibility: u8,
}

impl TryFrom<RawScores> for RubricScores {
    type Error = GradeError;

    fn try_from(raw: RawScores) -> Result<Self> {
        RubricScores::new(raw.specificity, raw.actionability, raw.plausibility)
    }
}

impl RubricScores {
    /// Build scores, rejecting any outside 1..=5
    pub fn new(specificity: u8, actionability: u8, plausibility: u8) -> Result<Self> {
        let scores = Self {
            specificity,
            actionability,
            plausibility,
        };
        for (dimension, score) in scores.dimensions() {
            if !(MIN_SCORE..=MAX_SCORE).contains(&score) {
                return Err(GradeError::invalid_value(
                    &format!("{} score", dimension),
                    format!("{} (expected {}-{})", score, MIN_SCORE, MAX_SCORE),
                ));
            }
        }
        Ok(scores)
    }

    /// Dimension names paired with their scores
    pub fn dimensions(&self) -> [(&'static str, u8); 3] {
        [
            ("specificity", self.specificity),
            ("actionability", self.actionability),
            ("plausibility", self.plausibility),
        ]
    }

    /// Dimensions scoring below `threshold`
    pub fn failing_dimensions(&self, threshold: u8) -> Vec<&'static str> {
        self.dimensions()
            .into_iter()
            .filter(|(_, score)| *score < threshold)
            .map(|(name, _)| name)
            .collect()
    }

    /// True when every dimension reaches `threshold`
    pub fn passes(&self, threshold: u8) -> bool {
        self.failing_dimensions(threshold).is_empty()
    }
}

impl fmt::Display for RubricScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "specificity={} actionability={} plausibility={}",
            self.specificity, self.actionability, self.plausibility
        )
    }
}

/// Parses `S,A,P`, e.g. `4,3,5`
impl FromStr for RubricScores {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self> {
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let [s_raw, a_raw, p_raw] = parts.as_slice() else {
            return Err(GradeError::invalid_value(
                "rubric scores",
                format!("'{}' (expected three comma-separated scores)", s),
            ));
        };
        let parse = |raw: &str| -> Result<u8> {
            raw.parse()
                .map_err(|_| GradeError::invalid_value("rubric score", raw))
        };
        RubricScores::new(parse(*s_raw)?, parse(*a_raw)?, parse(*p_raw)?)
    }
}

/// Produces rubric scores for a response
pub trait Rater {
    fn rate(&self, response: &str) -> RubricScores;
}

const ACTION_TERMS: [&str; 20] = [
    "focus",
    "improve",
    "increase",
    "reduce",
    "practice",
    "drill",
    "scheme",
    "set play",
    "assign",
    "rotate",
    "substitute",
    "optimize",
    "work on",
    "emphasize",
    "target",
    "adjust",
    "press",
    "zone",
    "man-to-man",
    "transition",
];

/// Keyword heuristic rater.
///
/// - specificity: one point, plus one per two players named (up to four),
///   plus one when any digit appears
/// - actionability: one point plus one per coaching term used
/// - plausibility: 5, or 2 when the text talks about a top or leading scorer
///   without naming the actual one
#[derive(Debug, Clone)]
pub struct KeywordRater {
    player_names: Vec<String>,
    top_scorer: Option<String>,
}

impl KeywordRater {
    pub fn new(dataset: &SeasonDataset) -> Self {
        let top_scorer = dataset
            .aggregates()
            .goal_leader
            .map(|idx| dataset.player_at(idx).name.to_lowercase());
        Self {
            player_names: dataset
                .player_names()
                .map(str::to_lowercase)
                .filter(|n| !n.trim().is_empty())
                .collect(),
            top_scorer,
        }
    }
}

impl Rater for KeywordRater {
    fn rate(&self, response: &str) -> RubricScores {
        let text = response.to_lowercase();

        let mentions = self
            .player_names
            .iter()
            .filter(|name| text.contains(name.as_str()))
            .count();
        let has_digits = text.chars().any(|c| c.is_ascii_digit());
        let specificity = (1 + (mentions / 2).min(4) + usize::from(has_digits)).min(5);

        let terms = ACTION_TERMS.iter().filter(|t| text.contains(*t)).count();
        let actionability = (1 + terms).min(5);

        let claims_scorer = text.contains("top scorer") || text.contains("leading scorer");
        let names_scorer = self
            .top_scorer
            .as_deref()
            .is_some_and(|name| text.contains(name));
        let plausibility = if claims_scorer && !names_scorer { 2 } else { 5 };

        // every component is clamped to 1..=5 above
        RubricScores {
            specificity: specificity as u8,
            actionability: actionability as u8,
            plausibility,
        }
    }
}
