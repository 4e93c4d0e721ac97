//! Per-kind extraction and comparison

use std::collections::BTreeSet;

use super::outcome::ErrorKind;
use super::Validator;
use crate::answer::{format_number, Answer, PlayerShooting};
use crate::dataset::{ShootingPct, WinLoss};
use crate::error::{GradeError, Result};
use crate::extract::NumericQuery;
use crate::question::{QuestionKind, QuestionSpec};
use crate::rubric::RubricScores;

/// Slack for floating point comparisons against a tolerance
const EPSILON: f64 = 1e-9;

/// Words tying a player to a statistical lead
const LEADER_KEYWORDS: [&str; 9] = [
    "led", "leads", "leading", "leader", "top", "most", "highest", "paced", "best",
];

/// Words tying a player to shooting efficiency
const SHOOTER_KEYWORDS: [&str; 8] = [
    "best", "highest", "top", "led", "leading", "efficient", "accurate", "most",
];

/// Counts that sit next to a player's name but are not percentages
const NON_PERCENT_UNITS: [&str; 6] = ["shot", "goal", "attempt", "assist", "point", "game"];

/// Grading outcome before it is turned into a result record
#[derive(Debug, Default)]
pub(crate) struct Graded {
    pub passed: bool,
    pub extracted: Option<Answer>,
    pub rubric: Option<RubricScores>,
    pub error_kind: Option<ErrorKind>,
    pub diagnostic: Option<String>,
    pub notes: Vec<String>,
}

impl Graded {
    fn pass(extracted: Answer) -> Self {
        Self {
            passed: true,
            extracted: Some(extracted),
            ..Self::default()
        }
    }

    fn fail(extracted: Option<Answer>, kind: ErrorKind, diagnostic: String) -> Self {
        Self {
            passed: false,
            extracted,
            error_kind: Some(kind),
            diagnostic: Some(diagnostic),
            ..Self::default()
        }
    }

    /// Extraction found nothing to compare
    pub(crate) fn no_match(err: &GradeError) -> Self {
        Self::fail(None, ErrorKind::from(err), err.to_string())
    }

    fn note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

fn within(extracted: f64, expected: f64, tolerance: f64) -> bool {
    (extracted - expected).abs() <= tolerance + EPSILON
}

fn tolerance_diagnostic(expected: &str, extracted: &str, tolerance: f64) -> String {
    format!(
        "expected {}, extracted {} (tolerance \u{b1}{})",
        expected,
        extracted,
        format_number(tolerance)
    )
}

impl Validator<'_> {
    /// Extract and compare one response. `tolerance` is the resolved value for
    /// tolerance-policy questions.
    pub(crate) fn grade(
        &self,
        question: &QuestionSpec,
        expected: &Answer,
        response: &str,
        tolerance: Option<f64>,
        rubric: Option<RubricScores>,
    ) -> Result<Graded> {
        let tolerance = tolerance.unwrap_or(0.0);
        match (&question.kind, expected) {
            (QuestionKind::SeasonRecord, Answer::Record(record)) => {
                self.grade_record(*record, response)
            }
            (QuestionKind::TotalGames, Answer::Count(count)) => self.grade_count(
                *count,
                response,
                &NumericQuery::anchors(["game", "contest", "match"]),
                ErrorKind::IncorrectCalculation,
            ),
            (QuestionKind::CountAtLeast { .. }, Answer::Count(count)) => self.grade_count(
                *count,
                response,
                &NumericQuery::anchors(["player", "scorer", "athlete", "member"])
                    .skip_followed_by(["+", "goal", "or more", "plus"]),
                ErrorKind::IncorrectOffensiveDepth,
            ),
            (QuestionKind::TeamGoals, Answer::Count(total)) => {
                self.grade_team_total(*total, "goals", response, tolerance)
            }
            (QuestionKind::TeamAssists, Answer::Count(total)) => {
                self.grade_team_total(*total, "assists", response, tolerance)
            }
            (
                QuestionKind::TopScorer | QuestionKind::AssistLeader | QuestionKind::PointsLeader,
                Answer::Player { name, stat },
            ) => self.grade_leader(&question.kind, name, *stat, response),
            (QuestionKind::BestShooter { .. }, Answer::Shooting(entries)) => {
                self.grade_best_shooter(entries, response, tolerance)
            }
            (QuestionKind::ScorersAtLeast { .. }, Answer::Names(names)) => {
                self.grade_names(names, response)
            }
            (QuestionKind::ShootingPct { player }, Answer::Percentage(pct)) => {
                let entry = PlayerShooting {
                    player: self.canonical_name(player),
                    shooting_pct: *pct,
                };
                self.grade_single_shooting(&entry, response, tolerance)
            }
            (QuestionKind::TopShooting { min_matches, .. }, Answer::Shooting(entries)) => {
                self.grade_top_shooting(entries, *min_matches, response, tolerance)
            }
            (QuestionKind::Rubric, Answer::Rubric { pass_threshold }) => {
                Ok(grade_rubric(rubric, *pass_threshold))
            }
            (kind, answer) => Err(GradeError::Other(format!(
                "expected answer {} does not fit question kind {:?}",
                answer, kind
            ))),
        }
    }

    fn canonical_name(&self, name: &str) -> String {
        self.dataset
            .player(name)
            .map(|p| p.name.clone())
            .unwrap_or_else(|| name.to_string())
    }

    fn grade_record(&self, expected: WinLoss, response: &str) -> Result<Graded> {
        let extracted = self
            .extractor
            .record(response)
            .ok_or_else(|| GradeError::no_match("win-loss record"))?;
        if extracted == expected {
            return Ok(Graded::pass(Answer::Record(extracted)));
        }
        Ok(Graded::fail(
            Some(Answer::Record(extracted)),
            ErrorKind::IncorrectRecord,
            format!("expected {}, extracted {}", expected, extracted),
        ))
    }

    fn grade_count(
        &self,
        expected: u32,
        response: &str,
        query: &NumericQuery,
        kind: ErrorKind,
    ) -> Result<Graded> {
        let number = self.extractor.require_number(response, query, "count")?;
        let extracted = Answer::Number(number.value);
        if number.is_integral() && number.value == f64::from(expected) {
            return Ok(Graded::pass(Answer::Count(expected)));
        }
        let mut diagnostic = format!(
            "expected {}, extracted {}",
            expected,
            format_number(number.value)
        );
        if !number.is_integral() {
            diagnostic.push_str(" (not a whole number)");
        }
        Ok(Graded::fail(Some(extracted), kind, diagnostic))
    }

    fn grade_team_total(
        &self,
        expected: u32,
        stat: &str,
        response: &str,
        tolerance: f64,
    ) -> Result<Graded> {
        let singular = stat.trim_end_matches('s');
        let query = NumericQuery::anchors([
            format!("total {}", stat),
            format!("{} total", stat),
            format!("team {}", stat),
            format!("combined {}", stat),
            format!("{} in total", stat),
        ])
        .then(["total", "combined", "altogether", "in all"])
        .then(["team"])
        .then([singular]);
        let number = self
            .extractor
            .require_number(response, &query, &format!("team {} total", singular))?;
        let extracted = Answer::Number(number.value);
        if within(number.value, f64::from(expected), tolerance) {
            return Ok(Graded::pass(extracted));
        }
        Ok(Graded::fail(
            Some(extracted),
            ErrorKind::IncorrectCalculation,
            tolerance_diagnostic(
                &expected.to_string(),
                &format_number(number.value),
                tolerance,
            ),
        ))
    }

    fn grade_leader(
        &self,
        kind: &QuestionKind,
        expected: &str,
        stat: Option<u32>,
        response: &str,
    ) -> Result<Graded> {
        let player = self
            .extractor
            .player_near(response, &LEADER_KEYWORDS)
            .ok_or_else(|| GradeError::no_match("player name"))?;

        let label = match kind {
            QuestionKind::AssistLeader => "assist count",
            QuestionKind::PointsLeader => "point total",
            _ => "goal count",
        };
        let stated = stat.filter(|value| {
            self.extractor
                .numbers(response)
                .iter()
                .any(|n| n.value == f64::from(*value))
        });
        let note = match (stat, stated) {
            (_, Some(value)) => format!("{} stated ({})", label, value),
            (Some(value), None) => format!("{} not stated (expected {})", label, value),
            (None, None) => format!("{} not checked", label),
        };
        let extracted = Answer::Player {
            name: player.name.clone(),
            stat: stated,
        };

        let graded = if player.name.eq_ignore_ascii_case(expected.trim()) {
            Graded::pass(extracted)
        } else {
            Graded::fail(
                Some(extracted),
                ErrorKind::IncorrectPlayer,
                format!("expected {}, extracted {}", expected, player.name),
            )
        };
        Ok(graded.note(note))
    }

    fn grade_best_shooter(
        &self,
        entries: &[PlayerShooting],
        response: &str,
        tolerance: f64,
    ) -> Result<Graded> {
        let Some(expected) = entries.first() else {
            return Err(GradeError::Other("no best shooter computed".to_string()));
        };
        let player = self
            .extractor
            .player_near(response, &SHOOTER_KEYWORDS)
            .ok_or_else(|| GradeError::no_match("player name"))?;

        let stated = self.stated_shooting(&player.name, response);
        let note = match (&stated, expected.rate()) {
            (Some(pct), Some(rate)) if pct.rate().is_some_and(|v| within(v, rate, tolerance)) => {
                format!("shooting percentage stated ({})", pct)
            }
            _ => format!(
                "shooting percentage not stated (expected {})",
                expected.shooting_pct
            ),
        };
        let extracted = Answer::Shooting(vec![PlayerShooting {
            player: player.name.clone(),
            shooting_pct: stated.unwrap_or(ShootingPct::Undefined),
        }]);

        let graded = if player.name.eq_ignore_ascii_case(&expected.player) {
            Graded::pass(extracted)
        } else {
            Graded::fail(
                Some(extracted),
                ErrorKind::IncorrectPlayer,
                format!("expected {}, extracted {}", expected.player, player.name),
            )
        };
        Ok(graded.note(note))
    }

    fn grade_names(&self, expected: &BTreeSet<String>, response: &str) -> Result<Graded> {
        let extracted = self.extractor.player_names(response);
        if extracted.is_empty() {
            return Err(GradeError::no_match("player names"));
        }
        if &extracted == expected {
            return Ok(Graded::pass(Answer::Names(extracted)));
        }
        let missing: Vec<&str> = expected.difference(&extracted).map(String::as_str).collect();
        let extra: Vec<&str> = extracted.difference(expected).map(String::as_str).collect();
        let mut parts = Vec::new();
        if !missing.is_empty() {
            parts.push(format!("missing: {}", missing.join(", ")));
        }
        if !extra.is_empty() {
            parts.push(format!("extra: {}", extra.join(", ")));
        }
        Ok(Graded::fail(
            Some(Answer::Names(extracted)),
            ErrorKind::IncorrectPlayerSet,
            parts.join("; "),
        ))
    }

    /// Shooting percentage stated for a player. A `%` number in the player's
    /// sentence comes first, then an N/A marker, then a bare number next to
    /// the name. Shot, goal and similar counts are never read as a rate.
    fn stated_shooting(&self, name: &str, response: &str) -> Option<ShootingPct> {
        let query = NumericQuery::anchors([name])
            .prefer_percent()
            .skip_followed_by(NON_PERCENT_UNITS);
        if let Some(number) = self.extractor.percent_near(response, &query) {
            return Some(ShootingPct::Rate(number.value));
        }
        if self.extractor.undefined_near(response, name) {
            return Some(ShootingPct::Undefined);
        }
        self.extractor
            .number_near(response, &query)
            .map(|number| ShootingPct::Rate(number.value))
    }

    fn shooting_matches(expected: &ShootingPct, stated: &ShootingPct, tolerance: f64) -> bool {
        match (expected, stated) {
            (ShootingPct::Undefined, ShootingPct::Undefined) => true,
            (ShootingPct::Rate(a), ShootingPct::Rate(b)) => within(*b, *a, tolerance),
            _ => false,
        }
    }

    fn grade_single_shooting(
        &self,
        expected: &PlayerShooting,
        response: &str,
        tolerance: f64,
    ) -> Result<Graded> {
        if !self.extractor.mentions_player(response, &expected.player) {
            return Err(GradeError::no_match(format!("mention of {}", expected.player)));
        }
        let stated = self
            .stated_shooting(&expected.player, response)
            .ok_or_else(|| GradeError::no_match("shooting percentage"))?;
        let extracted = Answer::Percentage(stated);
        if Self::shooting_matches(&expected.shooting_pct, &stated, tolerance) {
            return Ok(Graded::pass(extracted));
        }
        Ok(Graded::fail(
            Some(extracted),
            ErrorKind::IncorrectCalculation,
            tolerance_diagnostic(
                &expected.shooting_pct.to_string(),
                &stated.to_string(),
                tolerance,
            ),
        ))
    }

    fn grade_top_shooting(
        &self,
        expected: &[PlayerShooting],
        min_matches: Option<usize>,
        response: &str,
        tolerance: f64,
    ) -> Result<Graded> {
        let needed = min_matches.unwrap_or(expected.len());
        let mut found = Vec::new();
        let mut notes = Vec::new();
        let mut hits = 0;

        for entry in expected {
            if !self.extractor.mentions_player(response, &entry.player) {
                notes.push(format!("{} not mentioned", entry.player));
                continue;
            }
            let Some(stated) = self.stated_shooting(&entry.player, response) else {
                notes.push(format!("{}: no percentage found", entry.player));
                continue;
            };
            if Self::shooting_matches(&entry.shooting_pct, &stated, tolerance) {
                hits += 1;
            } else {
                notes.push(format!(
                    "{}: expected {}, extracted {}",
                    entry.player, entry.shooting_pct, stated
                ));
            }
            found.push(PlayerShooting {
                player: entry.player.clone(),
                shooting_pct: stated,
            });
        }

        if found.is_empty() {
            return Err(GradeError::no_match("shooting percentage"));
        }
        let summary = format!(
            "matched {}/{} expected shooting percentages (\u{b1}{}, {} needed)",
            hits,
            expected.len(),
            format_number(tolerance),
            needed
        );
        let mut graded = if hits >= needed {
            Graded::pass(Answer::Shooting(found)).note(summary)
        } else {
            Graded::fail(
                Some(Answer::Shooting(found)),
                ErrorKind::IncorrectShootingAnalysis,
                summary,
            )
        };
        graded.notes.extend(notes);
        Ok(graded)
    }
}

fn grade_rubric(scores: Option<RubricScores>, pass_threshold: u8) -> Graded {
    let Some(scores) = scores else {
        return Graded::fail(
            None,
            ErrorKind::MissingRubricScores,
            "no rubric scores supplied".to_string(),
        );
    };
    let failing = scores.failing_dimensions(pass_threshold);
    let mut graded = if failing.is_empty() {
        Graded {
            passed: true,
            ..Graded::default()
        }
    } else {
        Graded::fail(
            None,
            ErrorKind::InsufficientRubricScores,
            format!("below {}: {}", pass_threshold, failing.join(", ")),
        )
    };
    graded.rubric = Some(scores);
    graded.note(format!("scores: {}", scores))
}
