//! Ground-truth oracle
//!
//! Every query is a pure function of the dataset it was built over. Leader
//! queries read the aggregates cached at load time; threshold and ratio
//! queries scan the player table.

use std::collections::BTreeSet;

use crate::answer::{Answer, PlayerShooting};
use crate::config::RubricConfig;
use crate::dataset::{PlayerRecord, SeasonDataset, WinLoss};
use crate::error::{GradeError, Result};
use crate::question::QuestionKind;

/// A leader and the statistic they lead in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Leader<'a> {
    pub player: &'a PlayerRecord,
    pub value: u32,
}

/// Computes expected answers from a loaded dataset
#[derive(Debug, Clone, Copy)]
pub struct Oracle<'a> {
    dataset: &'a SeasonDataset,
    pass_threshold: u8,
}

impl<'a> Oracle<'a> {
    /// Build an oracle; fails when the dataset holds no players
    pub fn new(dataset: &'a SeasonDataset) -> Result<Self> {
        if dataset.is_empty() {
            return Err(GradeError::DatasetNotReady {
                reason: "no player records loaded".to_string(),
            });
        }
        Ok(Self {
            dataset,
            pass_threshold: RubricConfig::default().pass_threshold,
        })
    }

    /// Rubric threshold reported as the expected answer of rubric questions
    pub fn with_pass_threshold(mut self, pass_threshold: u8) -> Self {
        self.pass_threshold = pass_threshold;
        self
    }

    pub fn dataset(&self) -> &'a SeasonDataset {
        self.dataset
    }

    pub fn season_record(&self) -> WinLoss {
        self.dataset.team().record
    }

    pub fn total_games(&self) -> u32 {
        self.season_record().games()
    }

    pub fn team_goals(&self) -> u32 {
        self.dataset.aggregates().team_goals
    }

    pub fn team_assists(&self) -> u32 {
        self.dataset.aggregates().team_assists
    }

    /// Most goals; first in source order on ties
    pub fn top_scorer(&self) -> Leader<'a> {
        self.leader(self.dataset.aggregates().goal_leader, |p| p.goals)
    }

    /// Most assists; first in source order on ties
    pub fn assist_leader(&self) -> Leader<'a> {
        self.leader(self.dataset.aggregates().assist_leader, |p| p.assists)
    }

    /// Most points; first in source order on ties
    pub fn points_leader(&self) -> Leader<'a> {
        self.leader(self.dataset.aggregates().points_leader, |p| p.points())
    }

    fn leader(&self, idx: Option<usize>, stat: impl Fn(&PlayerRecord) -> u32) -> Leader<'a> {
        // the dataset is non-empty, so every leader index is present
        let player = self.dataset.player_at(idx.unwrap_or(0));
        Leader {
            player,
            value: stat(player),
        }
    }

    /// Names of players with at least `min_goals` goals (inclusive)
    pub fn players_with_at_least(&self, min_goals: u32) -> BTreeSet<String> {
        self.dataset
            .players()
            .iter()
            .filter(|p| p.goals >= min_goals)
            .map(|p| p.name.clone())
            .collect()
    }

    /// Number of players with at least `min_goals` goals (inclusive)
    pub fn count_with_at_least(&self, min_goals: u32) -> u32 {
        self.dataset
            .players()
            .iter()
            .filter(|p| p.goals >= min_goals)
            .count() as u32
    }

    /// Shooting percentage of one player; the name lookup ignores case
    pub fn shooting_pct(&self, player: &str) -> Result<PlayerShooting> {
        let record = self
            .dataset
            .player(player)
            .ok_or_else(|| GradeError::invalid_value("player", player))?;
        Ok(shooting_entry(record))
    }

    /// Shooting percentages of the top `count` goal scorers
    pub fn top_scorers_shooting(&self, count: usize) -> Vec<PlayerShooting> {
        self.dataset
            .ranked_scorers()
            .take(count)
            .map(shooting_entry)
            .collect()
    }

    /// Best goals-per-shot among players with at least `min_shots` shots.
    ///
    /// Ranks on the unrounded ratio; first in source order on ties.
    pub fn best_shooter(&self, min_shots: u32) -> Result<PlayerShooting> {
        let mut best: Option<(&PlayerRecord, f64)> = None;
        for player in self.dataset.players() {
            if player.shots < min_shots {
                continue;
            }
            let Some(ratio) = player.raw_shooting_ratio() else {
                continue;
            };
            match best {
                Some((_, best_ratio)) if best_ratio >= ratio => {}
                _ => best = Some((player, ratio)),
            }
        }
        best.map(|(player, _)| shooting_entry(player)).ok_or_else(|| {
            GradeError::invalid_value(
                "best shooter threshold",
                format!("no player took at least {} shots", min_shots),
            )
        })
    }

    /// Expected answer for a question kind
    pub fn expected(&self, kind: &QuestionKind) -> Result<Answer> {
        let answer = match kind {
            QuestionKind::SeasonRecord => Answer::Record(self.season_record()),
            QuestionKind::TotalGames => Answer::Count(self.total_games()),
            QuestionKind::TopScorer => leader_answer(self.top_scorer()),
            QuestionKind::AssistLeader => leader_answer(self.assist_leader()),
            QuestionKind::PointsLeader => leader_answer(self.points_leader()),
            QuestionKind::TeamGoals => Answer::Count(self.team_goals()),
            QuestionKind::TeamAssists => Answer::Count(self.team_assists()),
            QuestionKind::ScorersAtLeast { min_goals } => {
                Answer::Names(self.players_with_at_least(*min_goals))
            }
            QuestionKind::CountAtLeast { min_goals } => {
                Answer::Count(self.count_with_at_least(*min_goals))
            }
            QuestionKind::ShootingPct { player } => {
                Answer::Percentage(self.shooting_pct(player)?.shooting_pct)
            }
            QuestionKind::TopShooting { count, .. } => {
                Answer::Shooting(self.top_scorers_shooting(*count))
            }
            QuestionKind::BestShooter { min_shots } => {
                Answer::Shooting(vec![self.best_shooter(*min_shots)?])
            }
            QuestionKind::Rubric => Answer::Rubric {
                pass_threshold: self.pass_threshold,
            },
        };
        Ok(answer)
    }
}

fn shooting_entry(player: &PlayerRecord) -> PlayerShooting {
    PlayerShooting {
        player: player.name.clone(),
        shooting_pct: player.shooting_pct(),
    }
}

fn leader_answer(leader: Leader<'_>) -> Answer {
    Answer::Player {
        name: leader.player.name.clone(),
        stat: Some(leader.value),
    }
}
