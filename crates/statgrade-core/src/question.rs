//! Question definitions and the question catalog
//!
//! A question pairs an identifier and prompt with a kind, which selects the
//! ground-truth computation, and a comparison policy derived from the kind.
//! Catalogs can be built in or loaded from YAML:
//!
//! ```yaml
//! - id: top_scorer
//!   category: basic
//!   prompt: Who was the leading goal scorer?
//!   kind:
//!     type: top_scorer
//! - id: shooting
//!   category: intermediate
//!   prompt: What were the top shooters' percentages?
//!   kind:
//!     type: top_shooting
//!     count: 3
//!     min_matches: 2
//! ```

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config::{ThresholdConfig, SHOOTING_PCT_TOLERANCE, TEAM_TOTAL_TOLERANCE};
use crate::dataset::SeasonDataset;
use crate::error::{GradeError, Result};

/// Difficulty tier of a question
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Basic,
    Intermediate,
    Complex,
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Basic => write!(f, "basic"),
            Category::Intermediate => write!(f, "intermediate"),
            Category::Complex => write!(f, "complex"),
        }
    }
}

/// Which ground-truth computation a question uses
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum QuestionKind {
    SeasonRecord,
    TotalGames,
    TopScorer,
    AssistLeader,
    PointsLeader,
    TeamGoals,
    TeamAssists,
    /// Names of players with at least `min_goals` goals
    ScorersAtLeast { min_goals: u32 },
    /// Number of players with at least `min_goals` goals
    CountAtLeast { min_goals: u32 },
    /// One player's shooting percentage
    ShootingPct { player: String },
    /// Shooting percentages of the top `count` scorers
    TopShooting {
        count: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_matches: Option<usize>,
    },
    /// Best shooting percentage among players with at least `min_shots`
    BestShooter { min_shots: u32 },
    /// Open-ended; graded from externally supplied rubric scores
    Rubric,
}

impl QuestionKind {
    /// Tolerance key used when the question does not name one
    fn default_tolerance_key(&self) -> Option<&'static str> {
        match self {
            QuestionKind::TeamGoals | QuestionKind::TeamAssists => Some(TEAM_TOTAL_TOLERANCE),
            QuestionKind::ShootingPct { .. } | QuestionKind::TopShooting { .. } => {
                Some(SHOOTING_PCT_TOLERANCE)
            }
            _ => None,
        }
    }
}

/// How extracted values are compared with the expected answer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "name", rename_all = "snake_case")]
pub enum Policy {
    /// Identical after normalization
    Exact,
    /// Within the named absolute tolerance
    Tolerance { key: String },
    /// Same set of names
    SetEquality,
    /// Thresholded external rubric scores
    Rubric,
}

impl fmt::Display for Policy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Policy::Exact => write!(f, "exact"),
            Policy::Tolerance { key } => write!(f, "tolerance({})", key),
            Policy::SetEquality => write!(f, "set_equality"),
            Policy::Rubric => write!(f, "rubric"),
        }
    }
}

/// A question put to the model
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionSpec {
    pub id: String,
    pub category: Category,
    pub prompt: String,
    pub kind: QuestionKind,
    /// Overrides the tolerance key for tolerance-graded kinds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<String>,
}

impl QuestionSpec {
    pub fn new(
        id: impl Into<String>,
        category: Category,
        prompt: impl Into<String>,
        kind: QuestionKind,
    ) -> Self {
        Self {
            id: id.into(),
            category,
            prompt: prompt.into(),
            kind,
            tolerance: None,
        }
    }

    /// Comparison policy implied by the kind
    pub fn policy(&self) -> Policy {
        if let Some(default_key) = self.kind.default_tolerance_key() {
            let key = self
                .tolerance
                .clone()
                .unwrap_or_else(|| default_key.to_string());
            return Policy::Tolerance { key };
        }
        match self.kind {
            QuestionKind::ScorersAtLeast { .. } => Policy::SetEquality,
            QuestionKind::Rubric => Policy::Rubric,
            _ => Policy::Exact,
        }
    }

    /// Full prompt: data context followed by the question
    pub fn render_prompt(&self, dataset: &SeasonDataset) -> String {
        format!("{}\n\nQuestion: {}", dataset.context_block(), self.prompt)
    }
}

/// Prompt for `question`: the dataset's context block followed by the question
pub fn prompt_for(question: &QuestionSpec, dataset: &SeasonDataset) -> String {
    question.render_prompt(dataset)
}

/// An ordered set of questions with unique identifiers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionCatalog {
    questions: Vec<QuestionSpec>,
}

impl QuestionCatalog {
    /// Build a catalog, rejecting duplicate identifiers
    pub fn new(questions: Vec<QuestionSpec>) -> Result<Self> {
        let mut seen = HashSet::new();
        for question in &questions {
            if question.id.trim().is_empty() {
                crate::bail_invalid!("question id", "(empty)");
            }
            if !seen.insert(question.id.as_str()) {
                return Err(GradeError::DuplicateQuestion {
                    id: question.id.clone(),
                });
            }
            check_kind(question)?;
        }
        Ok(Self { questions })
    }

    /// Parse a catalog from YAML: a list of question specs
    pub fn from_yaml(content: &str) -> Result<Self> {
        let questions: Vec<QuestionSpec> = serde_yaml::from_str(content)?;
        Self::new(questions)
    }

    /// Load a catalog from a YAML file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(GradeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = fs::read_to_string(path)
            .map_err(|e| GradeError::io_operation("read questions", path.display(), e))?;
        Self::from_yaml(&content)
    }

    /// The questions of the original 2024 evaluation plus a few extras
    pub fn builtin(thresholds: &ThresholdConfig) -> Self {
        let questions = vec![
            QuestionSpec::new(
                "season_record",
                Category::Basic,
                "What was the team's record for the season?",
                QuestionKind::SeasonRecord,
            ),
            QuestionSpec::new(
                "total_games",
                Category::Basic,
                "How many total games did the team play this season?",
                QuestionKind::TotalGames,
            ),
            QuestionSpec::new(
                "top_scorer",
                Category::Basic,
                "Who was the team's leading goal scorer and how many goals did they score?",
                QuestionKind::TopScorer,
            ),
            QuestionSpec::new(
                "team_goals",
                Category::Basic,
                "How many total goals did the team score this season?",
                QuestionKind::TeamGoals,
            ),
            QuestionSpec::new(
                "top_assists",
                Category::Basic,
                "Who led the team in assists?",
                QuestionKind::AssistLeader,
            ),
            QuestionSpec::new(
                "points_leader",
                Category::Basic,
                "Who led the team in points (goals plus assists)?",
                QuestionKind::PointsLeader,
            ),
            QuestionSpec::new(
                "team_assists",
                Category::Basic,
                "How many total assists did the team record this season?",
                QuestionKind::TeamAssists,
            ),
            QuestionSpec::new(
                "shooting_analysis",
                Category::Intermediate,
                format!(
                    "Calculate the shooting percentage for the team's top {} goal scorers. \
                     Who was most efficient?",
                    thresholds.top_shooters
                ),
                QuestionKind::TopShooting {
                    count: thresholds.top_shooters,
                    min_matches: Some(thresholds.top_shooters.saturating_sub(1).max(1)),
                },
            ),
            QuestionSpec::new(
                "offensive_balance",
                Category::Intermediate,
                format!(
                    "Analyze the team's offensive balance. How many players scored at least {} \
                     goals? What does this suggest about their offensive depth?",
                    thresholds.depth_goals
                ),
                QuestionKind::CountAtLeast {
                    min_goals: thresholds.depth_goals,
                },
            ),
            QuestionSpec::new(
                "double_digit_scorers",
                Category::Intermediate,
                format!(
                    "List every player who scored at least {} goals.",
                    thresholds.depth_goals
                ),
                QuestionKind::ScorersAtLeast {
                    min_goals: thresholds.depth_goals,
                },
            ),
            QuestionSpec::new(
                "active_scorers",
                Category::Intermediate,
                format!(
                    "How many players scored at least {} goals?",
                    thresholds.active_scorer_goals
                ),
                QuestionKind::CountAtLeast {
                    min_goals: thresholds.active_scorer_goals,
                },
            ),
            QuestionSpec::new(
                "best_shooter",
                Category::Intermediate,
                format!(
                    "Among players with at least {} shots, who had the best shooting percentage?",
                    thresholds.qualified_min_shots
                ),
                QuestionKind::BestShooter {
                    min_shots: thresholds.qualified_min_shots,
                },
            ),
            QuestionSpec::new(
                "strategic_analysis",
                Category::Complex,
                "As a coach analyzing this season, answer:\n\
                 1. What were the team's main offensive strengths?\n\
                 2. If you wanted to win two more games next season, what specific areas would you focus on?\n\
                 3. Which player had the biggest impact beyond just goals scored?",
                QuestionKind::Rubric,
            ),
        ];

        Self { questions }
    }

    pub fn get(&self, id: &str) -> Option<&QuestionSpec> {
        self.questions.iter().find(|q| q.id == id)
    }

    /// Like [`get`](Self::get) but fails with `UnknownQuestion`
    pub fn require(&self, id: &str) -> Result<&QuestionSpec> {
        self.get(id).ok_or_else(|| GradeError::UnknownQuestion { id: id.to_string() })
    }

    pub fn iter(&self) -> impl Iterator<Item = &QuestionSpec> {
        self.questions.iter()
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

fn check_kind(question: &QuestionSpec) -> Result<()> {
    match &question.kind {
        QuestionKind::TopShooting { count: 0, .. } => {
            crate::bail_invalid!("top_shooting count", format!("0 in '{}'", question.id))
        }
        QuestionKind::TopShooting {
            count,
            min_matches: Some(min),
        } if *min == 0 || min > count => crate::bail_invalid!(
            "top_shooting min_matches",
            format!("{} (count {}) in '{}'", min, count, question.id)
        ),
        QuestionKind::ShootingPct { player } if player.trim().is_empty() => {
            crate::bail_invalid!("shooting_pct player", format!("(empty) in '{}'", question.id))
        }
        _ => Ok(()),
    }
}
