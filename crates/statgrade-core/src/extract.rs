//! Value extraction from free-form model output
//!
//! Extraction works on an ASCII-lowercased copy of the response so byte
//! offsets line up with the original text. A number counts as adjacent to an
//! anchor (a keyword or player name) when no sentence break separates them and
//! at most `window_words` words lie in between.

use std::collections::BTreeSet;

use regex::Regex;

use crate::dataset::{PlayerRecord, SeasonDataset, WinLoss};
use crate::error::{GradeError, Result};

const NUMBER_PATTERN: &str =
    r"\b(?:\d{1,3}(?:,\d{3})+|\d+)(?:\.\d+)?\b(?:\s*%|\s*percent\b)?";
const NUMBER_WORD_PATTERN: &str = r"\b(zero|one|two|three|four|five|six|seven|eight|nine|ten|eleven|twelve|thirteen|fourteen|fifteen|sixteen|seventeen|eighteen|nineteen|twenty)\b";
const SENTENCE_BREAK_PATTERN: &str = r"[.!?](?:\s|$)|[;\n]";
const RECORD_PATTERN: &str = r"\b(\d{1,3})\s*[-\x{2013}\x{2014}]\s*(\d{1,3})\b";
const WINS_LOSSES_PATTERN: &str = r"\b(\d{1,3})\s+wins?\b[^.;\n]*?\b(\d{1,3})\s+loss(?:es)?\b";

const NUMBER_WORDS: [&str; 21] = [
    "zero", "one", "two", "three", "four", "five", "six", "seven", "eight", "nine", "ten",
    "eleven", "twelve", "thirteen", "fourteen", "fifteen", "sixteen", "seventeen", "eighteen",
    "nineteen", "twenty",
];

/// Keyword groups that point at the overall season record, strongest first
const RECORD_ANCHORS: [&[&str]; 2] = [&["overall", "record"], &["season", "finished", "final"]];

/// Phrases that mark a percentage as undefined
const UNDEFINED_MARKERS: [&str; 5] = [
    "n/a",
    "undefined",
    "no shots",
    "not applicable",
    "no attempts",
];

/// A number found in the response
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NumberMention {
    pub value: f64,
    /// Followed by `%` or "percent"
    pub percent: bool,
    pub start: usize,
    pub end: usize,
}

impl NumberMention {
    pub fn is_integral(&self) -> bool {
        self.value.fract() == 0.0
    }
}

/// Where to look for a number
#[derive(Debug, Clone, Default)]
pub struct NumericQuery {
    /// Anchor groups tried in order; the first group with a hit wins
    pub tiers: Vec<Vec<String>>,
    /// Prefer `%`-marked numbers over bare ones near the same anchor
    pub prefer_percent: bool,
    /// Skip numbers directly followed by any of these (e.g. the "10" in "10+ goals")
    pub skip_followed_by: Vec<String>,
}

impl NumericQuery {
    pub fn anchors<I, S>(anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().then(anchors)
    }

    /// Add a lower-priority anchor group
    pub fn then<I, S>(mut self, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tiers
            .push(anchors.into_iter().map(|a| a.into().to_ascii_lowercase()).collect());
        self
    }

    pub fn prefer_percent(mut self) -> Self {
        self.prefer_percent = true;
        self
    }

    pub fn skip_followed_by<I, S>(mut self, words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.skip_followed_by
            .extend(words.into_iter().map(|w| w.into().to_ascii_lowercase()));
        self
    }
}

/// Extracts numbers, records and player names from response text
#[derive(Debug, Clone)]
pub struct Extractor<'a> {
    dataset: &'a SeasonDataset,
    window_words: usize,
    number_re: Regex,
    number_word_re: Regex,
    break_re: Regex,
    record_re: Regex,
    wins_losses_re: Regex,
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern).map_err(|e| GradeError::Other(format!("invalid pattern: {}", e)))
}

impl<'a> Extractor<'a> {
    pub fn new(dataset: &'a SeasonDataset, window_words: usize) -> Result<Self> {
        Ok(Self {
            dataset,
            window_words,
            number_re: compile(NUMBER_PATTERN)?,
            number_word_re: compile(NUMBER_WORD_PATTERN)?,
            break_re: compile(SENTENCE_BREAK_PATTERN)?,
            record_re: compile(RECORD_PATTERN)?,
            wins_losses_re: compile(WINS_LOSSES_PATTERN)?,
        })
    }

    /// Every number in the text, in order of appearance
    pub fn numbers(&self, text: &str) -> Vec<NumberMention> {
        let lower = text.to_ascii_lowercase();
        self.numbers_in(&lower)
    }

    fn numbers_in(&self, lower: &str) -> Vec<NumberMention> {
        let mut found: Vec<NumberMention> = Vec::new();
        for m in self.number_re.find_iter(lower) {
            let raw = m.as_str();
            let percent = raw.ends_with('%') || raw.ends_with("percent");
            let digits: String = raw
                .trim_end_matches("percent")
                .trim_end_matches('%')
                .trim()
                .chars()
                .filter(|c| *c != ',')
                .collect();
            if let Ok(value) = digits.parse::<f64>() {
                found.push(NumberMention {
                    value,
                    percent,
                    start: m.start(),
                    end: m.end(),
                });
            }
        }
        for caps in self.number_word_re.captures_iter(lower) {
            let (Some(whole), Some(word)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            if let Some(value) = NUMBER_WORDS.iter().position(|w| *w == word.as_str()) {
                found.push(NumberMention {
                    value: value as f64,
                    percent: false,
                    start: whole.start(),
                    end: whole.end(),
                });
            }
        }
        found.sort_by_key(|n| n.start);
        found
    }

    /// Number adjacent to an anchor of the highest-priority group that has
    /// one. Anchor occurrences are tried in text order; near each, the closest
    /// number wins and a number after the anchor beats one before it at the
    /// same distance.
    ///
    /// With `prefer_percent`, a `%`-marked number anywhere in the anchor's
    /// sentence is taken before any bare number in the window.
    pub fn number_near(&self, text: &str, query: &NumericQuery) -> Option<NumberMention> {
        if query.prefer_percent {
            if let Some(number) = self.percent_near(text, query) {
                return Some(number);
            }
        }
        let lower = text.to_ascii_lowercase();
        let numbers = self.candidates(&lower, query);
        self.nearest(&lower, &query.tiers, &numbers, Some(self.window_words))
    }

    /// Closest `%`-marked number in the same sentence as an anchor
    pub fn percent_near(&self, text: &str, query: &NumericQuery) -> Option<NumberMention> {
        let lower = text.to_ascii_lowercase();
        let percents: Vec<NumberMention> = self
            .candidates(&lower, query)
            .into_iter()
            .filter(|n| n.percent)
            .collect();
        self.nearest(&lower, &query.tiers, &percents, None)
    }

    fn candidates(&self, lower: &str, query: &NumericQuery) -> Vec<NumberMention> {
        self.numbers_in(lower)
            .into_iter()
            .filter(|n| !followed_by(lower, n, &query.skip_followed_by))
            .collect()
    }

    fn nearest(
        &self,
        lower: &str,
        tiers: &[Vec<String>],
        numbers: &[NumberMention],
        window: Option<usize>,
    ) -> Option<NumberMention> {
        if numbers.is_empty() {
            return None;
        }
        for tier in tiers {
            for anchor in anchor_spans(lower, tier) {
                let best = numbers
                    .iter()
                    .filter_map(|n| {
                        self.gap(lower, anchor, (n.start, n.end), window)
                            .map(|key| (key, *n))
                    })
                    .min_by(|a, b| a.0.cmp(&b.0));
                if let Some((_, number)) = best {
                    return Some(number);
                }
            }
        }
        None
    }

    /// Like [`number_near`](Self::number_near) but fails with `NoMatchFound`
    pub fn require_number(
        &self,
        text: &str,
        query: &NumericQuery,
        what: &str,
    ) -> Result<NumberMention> {
        self.number_near(text, query)
            .ok_or_else(|| GradeError::no_match(what))
    }

    /// Whether an undefined-percentage marker shares a sentence with `anchor`
    pub fn undefined_near(&self, text: &str, anchor: &str) -> bool {
        let lower = text.to_ascii_lowercase();
        let anchor = anchor.to_ascii_lowercase();
        anchor_spans(&lower, std::slice::from_ref(&anchor))
            .into_iter()
            .any(|span| {
                UNDEFINED_MARKERS.iter().any(|marker| {
                    lower
                        .match_indices(marker)
                        .any(|(pos, m)| self.gap(&lower, span, (pos, pos + m.len()), None).is_some())
                })
            })
    }

    /// Word distance between an anchor and a target span, and whether the
    /// target comes first. `None` when they overlap, a sentence break
    /// separates them, or they are further apart than `window` words.
    fn gap(
        &self,
        lower: &str,
        (start, end): (usize, usize),
        (target_start, target_end): (usize, usize),
        window: Option<usize>,
    ) -> Option<(usize, bool)> {
        let (between, before) = if target_start >= end {
            (&lower[end..target_start], false)
        } else if target_end <= start {
            (&lower[target_end..start], true)
        } else {
            return None;
        };
        if self.break_re.is_match(between) {
            return None;
        }
        let words = count_words(between);
        match window {
            Some(limit) if words > limit => None,
            _ => Some((words, before)),
        }
    }

    /// Season record: the `W-L` (or "W wins ... L losses") closest to an
    /// overall-record keyword, else the first one in the text
    pub fn record(&self, text: &str) -> Option<WinLoss> {
        let lowered = text.to_ascii_lowercase();
        let lower = lowered.as_str();
        let mut found: Vec<((usize, usize), WinLoss)> = Vec::new();
        for re in [&self.record_re, &self.wins_losses_re] {
            for caps in re.captures_iter(lower) {
                let (Some(whole), Some(wins), Some(losses)) = (caps.get(0), caps.get(1), caps.get(2))
                else {
                    continue;
                };
                if let (Ok(wins), Ok(losses)) = (wins.as_str().parse(), losses.as_str().parse()) {
                    found.push(((whole.start(), whole.end()), WinLoss::new(wins, losses)));
                }
            }
        }
        found.sort_by_key(|(span, _)| *span);

        for tier in RECORD_ANCHORS {
            let tier: Vec<String> = tier.iter().map(|a| a.to_string()).collect();
            let best = word_spans(lower, &tier)
                .into_iter()
                .flat_map(|anchor| {
                    found.iter().filter_map(move |(span, record)| {
                        self.gap(lower, anchor, *span, Some(self.window_words))
                            .map(|key| (key, *record))
                    })
                })
                .min_by(|a, b| a.0.cmp(&b.0));
            if let Some((_, record)) = best {
                return Some(record);
            }
        }
        found.first().map(|(_, record)| *record)
    }

    /// The player mentioned closest to one of `keywords` (whole words), else
    /// the earliest-mentioned player
    pub fn player_near(&self, text: &str, keywords: &[&str]) -> Option<&'a PlayerRecord> {
        let lower = text.to_ascii_lowercase();
        let keywords: Vec<String> = keywords.iter().map(|k| k.to_ascii_lowercase()).collect();
        let keyword_spans = word_spans(&lower, &keywords);

        let mut best: Option<((usize, usize), &'a PlayerRecord)> = None;
        for player in self.dataset.players() {
            let name = player.name.to_ascii_lowercase();
            for (pos, m) in lower.match_indices(name.as_str()) {
                for keyword in &keyword_spans {
                    let Some((words, _)) =
                        self.gap(&lower, *keyword, (pos, pos + m.len()), Some(self.window_words))
                    else {
                        continue;
                    };
                    let rank = (words, pos);
                    if !matches!(best, Some((current, _)) if current <= rank) {
                        best = Some((rank, player));
                    }
                }
            }
        }
        best.map(|(_, player)| player)
            .or_else(|| self.first_player(text))
    }

    /// Known players mentioned by full name, ordered by first mention
    pub fn mentions(&self, text: &str) -> Vec<&'a PlayerRecord> {
        let lower = text.to_ascii_lowercase();
        let mut found: Vec<(usize, &'a PlayerRecord)> = self
            .dataset
            .players()
            .iter()
            .filter_map(|p| {
                lower
                    .find(&p.name.to_ascii_lowercase())
                    .map(|pos| (pos, p))
            })
            .collect();
        found.sort_by_key(|(pos, _)| *pos);
        found.into_iter().map(|(_, p)| p).collect()
    }

    /// Earliest-mentioned known player
    pub fn first_player(&self, text: &str) -> Option<&'a PlayerRecord> {
        self.mentions(text).into_iter().next()
    }

    /// Canonical names of every known player mentioned
    pub fn player_names(&self, text: &str) -> BTreeSet<String> {
        self.mentions(text)
            .into_iter()
            .map(|p| p.name.clone())
            .collect()
    }

    /// Whether the text mentions a player by full name
    pub fn mentions_player(&self, text: &str, name: &str) -> bool {
        text.to_ascii_lowercase()
            .contains(&name.to_ascii_lowercase())
    }
}

/// Byte spans of every anchor occurrence, in text order
fn anchor_spans(lower: &str, anchors: &[String]) -> Vec<(usize, usize)> {
    let mut spans: Vec<(usize, usize)> = anchors
        .iter()
        .filter(|a| !a.is_empty())
        .flat_map(|anchor| {
            lower
                .match_indices(anchor.as_str())
                .map(|(pos, m)| (pos, pos + m.len()))
        })
        .collect();
    spans.sort_unstable();
    spans.dedup();
    spans
}

/// Like [`anchor_spans`] but only whole-word occurrences
fn word_spans(lower: &str, words: &[String]) -> Vec<(usize, usize)> {
    let is_word = |c: char| c.is_alphanumeric() || c == '\'';
    anchor_spans(lower, words)
        .into_iter()
        .filter(|&(start, end)| {
            !lower[..start].chars().next_back().is_some_and(is_word)
                && !lower[end..].chars().next().is_some_and(is_word)
        })
        .collect()
}

fn followed_by(lower: &str, number: &NumberMention, words: &[String]) -> bool {
    let rest = lower[number.end..].trim_start();
    words.iter().any(|w| rest.starts_with(w.as_str()))
}

fn count_words(gap: &str) -> usize {
    gap.split(|c: char| !c.is_alphanumeric() && c != '\'')
        .filter(|w| w.chars().any(char::is_alphanumeric))
        .count()
}
