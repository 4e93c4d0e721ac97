//! Data context block handed to a model alongside each question

use super::SeasonDataset;

/// How many scorers the context lists
pub const CONTEXT_TOP_SCORERS: usize = 10;

impl SeasonDataset {
    /// Render the season summary a model sees before the question.
    ///
    /// Lists the record and its splits, the top scorers who actually scored,
    /// and team totals derived from the player table.
    pub fn context_block(&self) -> String {
        let team = self.team();
        let mut lines = vec![
            format!("{} Statistics:", team.label()),
            String::new(),
            format!(
                "TEAM RECORD: {} ({} games)",
                team.record,
                team.record.games()
            ),
        ];
        let splits = [
            ("Home", team.splits.home),
            ("Away", team.splits.away),
            ("Neutral", team.splits.neutral),
            ("Conference", team.splits.conference),
            ("Non-conference", team.splits.non_conference),
        ];
        lines.extend(
            splits
                .into_iter()
                .filter_map(|(label, split)| split.map(|record| format!("- {}: {}", label, record))),
        );

        lines.push(String::new());
        lines.push("TOP PERFORMERS:".to_string());
        lines.extend(
            self.ranked_scorers()
                .take(CONTEXT_TOP_SCORERS)
                .filter(|p| p.goals > 0)
                .map(|player| {
                    format!(
                        "- {}: {}G, {}A, {}Pts, {} shots ({})",
                        player.name,
                        player.goals,
                        player.assists,
                        player.points(),
                        player.shots,
                        player.shooting_pct()
                    )
                }),
        );

        let agg = self.aggregates();
        lines.push(String::new());
        lines.push(format!(
            "TEAM TOTALS: {} Goals, {} Assists",
            agg.team_goals, agg.team_assists
        ));
        lines.join("\n")
    }
}
