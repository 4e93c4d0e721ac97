//! Dataset value types

use std::fmt;
use std::str::FromStr;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::GradeError;

/// Round to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Season totals for one player
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub name: String,
    pub goals: u32,
    pub assists: u32,
    pub shots: u32,
    pub games_played: u32,
}

impl PlayerRecord {
    pub fn new(
        name: impl Into<String>,
        goals: u32,
        assists: u32,
        shots: u32,
        games_played: u32,
    ) -> Self {
        Self {
            name: name.into(),
            goals,
            assists,
            shots,
            games_played,
        }
    }

    /// Goals plus assists
    pub fn points(&self) -> u32 {
        self.goals.saturating_add(self.assists)
    }

    /// Goals per shot as a percentage, rounded to one decimal.
    /// Undefined when the player took no shots.
    pub fn shooting_pct(&self) -> ShootingPct {
        ShootingPct::from_counts(self.goals, self.shots)
    }

    /// Unrounded goals/shots ratio, for ranking
    pub(crate) fn raw_shooting_ratio(&self) -> Option<f64> {
        (self.shots > 0).then(|| self.goals as f64 / self.shots as f64)
    }
}

/// A shooting percentage that may be undefined (no shots taken).
///
/// Serialized as a number, or as the string `"N/A"` when undefined.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShootingPct {
    /// Percentage rounded to one decimal
    Rate(f64),
    /// No shots taken
    Undefined,
}

impl ShootingPct {
    pub fn from_counts(goals: u32, shots: u32) -> Self {
        if shots == 0 {
            ShootingPct::Undefined
        } else {
            ShootingPct::Rate(round_one_decimal(goals as f64 / shots as f64 * 100.0))
        }
    }

    pub fn rate(&self) -> Option<f64> {
        match self {
            ShootingPct::Rate(rate) => Some(*rate),
            ShootingPct::Undefined => None,
        }
    }

    pub fn is_undefined(&self) -> bool {
        matches!(self, ShootingPct::Undefined)
    }
}

impl fmt::Display for ShootingPct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShootingPct::Rate(rate) => write!(f, "{:.1}%", rate),
            ShootingPct::Undefined => write!(f, "N/A"),
        }
    }
}

impl Serialize for ShootingPct {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ShootingPct::Rate(rate) => serializer.serialize_f64(*rate),
            ShootingPct::Undefined => serializer.serialize_str("N/A"),
        }
    }
}

impl<'de> Deserialize<'de> for ShootingPct {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Rate(f64),
            Text(String),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Rate(rate) => Ok(ShootingPct::Rate(rate)),
            Repr::Text(text) if text.eq_ignore_ascii_case("n/a") => Ok(ShootingPct::Undefined),
            Repr::Text(text) => Err(D::Error::custom(format!(
                "invalid shooting percentage: {}",
                text
            ))),
        }
    }
}

/// A win-loss record such as `16-6`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WinLoss {
    pub wins: u32,
    pub losses: u32,
}

impl WinLoss {
    pub fn new(wins: u32, losses: u32) -> Self {
        Self { wins, losses }
    }

    pub fn games(&self) -> u32 {
        self.wins.saturating_add(self.losses)
    }
}

impl fmt::Display for WinLoss {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.wins, self.losses)
    }
}

impl FromStr for WinLoss {
    type Err = GradeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().replace(['\u{2013}', '\u{2014}'], "-");
        let (wins, losses) = normalized
            .split_once('-')
            .ok_or_else(|| GradeError::invalid_value("win-loss record", s))?;
        let wins = wins
            .trim()
            .parse()
            .map_err(|_| GradeError::invalid_value("win-loss record", s))?;
        let losses = losses
            .trim()
            .parse()
            .map_err(|_| GradeError::invalid_value("win-loss record", s))?;
        Ok(WinLoss { wins, losses })
    }
}

impl TryFrom<String> for WinLoss {
    type Error = GradeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<WinLoss> for String {
    fn from(value: WinLoss) -> Self {
        value.to_string()
    }
}

/// Home/away/neutral and conference splits of the season record
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Splits {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub home: Option<WinLoss>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub away: Option<WinLoss>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub neutral: Option<WinLoss>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conference: Option<WinLoss>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub non_conference: Option<WinLoss>,
}

/// Team totals stated by the source, checked against player sums
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatedTotals {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub goals: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assists: Option<u32>,
}

/// Team-level facts that accompany the player table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeamFacts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub season: Option<String>,
    pub record: WinLoss,
    #[serde(default)]
    pub splits: Splits,
    #[serde(default)]
    pub totals: StatedTotals,
}

impl TeamFacts {
    /// Team facts with only an overall record
    pub fn with_record(wins: u32, losses: u32) -> Self {
        Self {
            team: None,
            season: None,
            record: WinLoss::new(wins, losses),
            splits: Splits::default(),
            totals: StatedTotals::default(),
        }
    }

    /// Parse team facts from TOML text
    pub fn parse(content: &str) -> crate::error::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Display label, e.g. "Syracuse Women's Lacrosse 2024"
    pub fn label(&self) -> String {
        match (&self.team, &self.season) {
            (Some(team), Some(season)) => format!("{} {}", team, season),
            (Some(team), None) => team.clone(),
            (None, Some(season)) => format!("{} season", season),
            (None, None) => "Season".to_string(),
        }
    }
}
