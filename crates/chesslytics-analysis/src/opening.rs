//! Opening classification by move prefix
//!
//! Games are grouped by the notation tokens of their first `K` plies, joined
//! with single spaces. Games shorter than `K` plies use their whole move list
//! as the key. The repertoire is ranked twice, by popularity and by success.

use std::{cmp::Ordering, collections::BTreeMap};

use chesslytics_model::{Color, GameRecord};
use chesslytics_stats::estimate::{Estimate, mean};
use serde::Serialize;

use crate::aggregate::OutcomeTally;

/// Line key of a game: its first `prefix_plies` tokens.
#[must_use]
pub fn line_key(game: &GameRecord, prefix_plies: usize) -> String {
    game.plies()
        .iter()
        .take(prefix_plies)
        .map(|ply| ply.san.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningLineStats {
    pub line: String,
    pub count: usize,
    #[serde(flatten)]
    pub tally: OutcomeTally,
    pub win_rate: Estimate<f64>,
    /// Average game length in moves
    pub avg_moves: Estimate<f64>,
    pub as_white: usize,
    pub as_black: usize,
}

impl OpeningLineStats {
    fn new(line: String, games: &[&GameRecord]) -> Self {
        let tally = games.iter().map(|game| game.outcome()).collect::<OutcomeTally>();
        let as_white = games.iter().filter(|game| game.color() == Color::White).count();
        Self {
            line,
            count: games.len(),
            win_rate: tally.win_rate(),
            tally,
            avg_moves: mean(games.iter().map(|game| f64::from(game.move_count()))),
            as_white,
            as_black: games.len() - as_white,
        }
    }

    fn win_rate_or_zero(&self) -> f64 {
        self.win_rate.value().unwrap_or(0.0)
    }
}

/// Per-line statistics and the two rankings over them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OpeningRepertoire {
    pub prefix_plies: usize,
    pub distinct_lines: usize,
    /// Ranked by count, then win rate, then line
    pub most_played: Vec<OpeningLineStats>,
    /// Ranked by win rate, then count, then line; only lines with enough games
    pub most_successful: Vec<OpeningLineStats>,
    /// Lines too rare to enter the success ranking
    pub lines_below_min_games: usize,
}

impl OpeningRepertoire {
    #[must_use]
    pub fn classify(
        games: &[GameRecord],
        prefix_plies: usize,
        min_games: usize,
        top_n: usize,
    ) -> Self {
        let mut groups: BTreeMap<String, Vec<&GameRecord>> = BTreeMap::new();
        for game in games {
            groups.entry(line_key(game, prefix_plies)).or_default().push(game);
        }
        let lines = groups
            .into_iter()
            .map(|(line, games)| OpeningLineStats::new(line, &games))
            .collect::<Vec<_>>();

        let mut most_played = lines.clone();
        most_played.sort_by(|a, b| {
            b.count
                .cmp(&a.count)
                .then_with(|| cmp_desc(a.win_rate_or_zero(), b.win_rate_or_zero()))
                .then_with(|| a.line.cmp(&b.line))
        });
        most_played.truncate(top_n);

        let distinct_lines = lines.len();
        let mut most_successful = lines
            .into_iter()
            .filter(|line| line.count >= min_games)
            .collect::<Vec<_>>();
        let lines_below_min_games = distinct_lines - most_successful.len();
        most_successful.sort_by(|a, b| {
            cmp_desc(a.win_rate_or_zero(), b.win_rate_or_zero())
                .then_with(|| b.count.cmp(&a.count))
                .then_with(|| a.line.cmp(&b.line))
        });
        most_successful.truncate(top_n);

        Self {
            prefix_plies,
            distinct_lines,
            most_played,
            most_successful,
            lines_below_min_games,
        }
    }
}

fn cmp_desc(a: f64, b: f64) -> Ordering {
    b.total_cmp(&a)
}
