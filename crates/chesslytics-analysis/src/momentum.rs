//! Momentum over chronologically ordered games
//!
//! Games are scored win = +1, draw = 0, loss = -1. The report covers streaks,
//! a trailing moving average of the score, the trend over the most recent
//! window, how often a loss is followed by a win, and how the player's rating
//! moved across the batch.

use chesslytics_model::{GameRecord, Outcome};
use chesslytics_stats::{
    descriptive::DescriptiveStats,
    estimate::{Estimate, ratio},
    trend::{HalfComparison, compare_halves, moving_average},
};
use serde::Serialize;

/// A maximal run of consecutive games with the same outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Streak {
    pub outcome: Outcome,
    pub length: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreakSummary {
    pub longest_win: usize,
    pub longest_loss: usize,
    pub longest_draw: usize,
    /// Streak still running at the most recent game
    pub current: Option<Streak>,
}

impl StreakSummary {
    #[must_use]
    pub fn new(games: &[GameRecord]) -> Self {
        let streaks = streaks(games);
        let longest = |outcome| {
            streaks
                .iter()
                .filter(|streak| streak.outcome == outcome)
                .map(|streak| streak.length)
                .max()
                .unwrap_or(0)
        };
        Self {
            longest_win: longest(Outcome::Win),
            longest_loss: longest(Outcome::Loss),
            longest_draw: longest(Outcome::Draw),
            current: streaks.last().copied(),
        }
    }
}

/// Splits the games into runs of equal outcome.
#[must_use]
pub fn streaks(games: &[GameRecord]) -> Vec<Streak> {
    games
        .chunk_by(|a, b| a.outcome() == b.outcome())
        .map(|run| Streak {
            outcome: run[0].outcome(),
            length: run.len(),
        })
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recovery {
    /// Games played immediately after a loss
    pub games_after_loss: usize,
    pub wins_after_loss: usize,
    pub recovery_rate: Estimate<f64>,
}

impl Recovery {
    #[must_use]
    pub fn new(games: &[GameRecord]) -> Self {
        let (games_after_loss, wins_after_loss) = games
            .windows(2)
            .filter(|pair| pair[0].outcome().is_loss())
            .fold((0, 0), |(after, wins), pair| {
                (after + 1, wins + usize::from(pair[1].outcome().is_win()))
            });
        Self {
            games_after_loss,
            wins_after_loss,
            recovery_rate: ratio(wins_after_loss, games_after_loss),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RatingTrend {
    pub first: u32,
    pub last: u32,
    pub change: i64,
    pub ratings: DescriptiveStats,
    /// Rating spread over the earliest third of the games
    pub early_std_dev: Estimate<f64>,
    /// Rating spread over the most recent third of the games
    pub recent_std_dev: Estimate<f64>,
    /// Whether the recent spread is narrower than the early one
    pub consistency_improving: Estimate<bool>,
}

impl RatingTrend {
    /// Needs at least one game.
    #[must_use]
    pub fn new(games: &[GameRecord]) -> Option<Self> {
        let (first, last) = (games.first()?, games.last()?);
        let ratings = DescriptiveStats::new(games.iter().map(|game| f64::from(game.player_rating())))?;

        let third = games.len() / 3;
        let spread = |slice: &[GameRecord]| {
            Estimate::from_option(
                (third >= 2)
                    .then(|| DescriptiveStats::new(slice.iter().map(|g| f64::from(g.player_rating()))))
                    .flatten()
                    .map(|stats| stats.std_dev),
                third,
                2,
            )
        };
        let early_std_dev = spread(&games[..third]);
        let recent_std_dev = spread(&games[games.len() - third..]);
        let consistency_improving = match (early_std_dev, recent_std_dev) {
            (Estimate::Value(early), Estimate::Value(recent)) => Estimate::Value(recent < early),
            _ => Estimate::insufficient(third, 2),
        };

        Some(Self {
            first: first.player_rating(),
            last: last.player_rating(),
            change: i64::from(last.player_rating()) - i64::from(first.player_rating()),
            ratings,
            early_std_dev,
            recent_std_dev,
            consistency_improving,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MomentumReport {
    pub window: usize,
    /// Games covered by the trend, at most `window`
    pub games_in_window: usize,
    pub streaks: StreakSummary,
    /// Trailing moving average of the result score over the whole batch
    pub moving_average: Vec<f64>,
    pub trend: Estimate<HalfComparison>,
    pub recovery: Recovery,
    pub rating: Estimate<RatingTrend>,
}

impl MomentumReport {
    /// `games` must be in chronological order.
    #[must_use]
    pub fn new(games: &[GameRecord], window: usize, flat_epsilon: f64) -> Self {
        let scores = games
            .iter()
            .map(|game| game.outcome().score())
            .collect::<Vec<_>>();
        let recent = &scores[scores.len().saturating_sub(window)..];

        Self {
            window,
            games_in_window: recent.len(),
            streaks: StreakSummary::new(games),
            moving_average: moving_average(&scores, window),
            trend: compare_halves(recent, flat_epsilon),
            recovery: Recovery::new(games),
            rating: Estimate::from_option(RatingTrend::new(games), games.len(), 1),
        }
    }
}

#[cfg(test)]
mod tests {
    use chesslytics_stats::trend::Trend;

    use super::*;
    use crate::test_util::{GameBuilder, games};

    fn sequence(outcomes: &str) -> Vec<GameRecord> {
        outcomes
            .chars()
            .map(|c| match c {
                'W' => Outcome::Win,
                'L' => Outcome::Loss,
                _ => Outcome::Draw,
            })
            .map(|outcome| GameBuilder::new(outcome).build())
            .collect()
    }

    #[test]
    fn test_streaks() {
        let games = sequence("WWLLLWDWW");
        let summary = StreakSummary::new(&games);
        assert_eq!(summary.longest_win, 2);
        assert_eq!(summary.longest_loss, 3);
        assert_eq!(summary.longest_draw, 1);
        assert_eq!(
            summary.current,
            Some(Streak {
                outcome: Outcome::Win,
                length: 2
            })
        );
        assert_eq!(StreakSummary::new(&[]).current, None);
    }

    #[test]
    fn test_all_wins_window() {
        let games = games(Outcome::Win, 20);
        let report = MomentumReport::new(&games, 20, 0.05);

        assert_eq!(report.streaks.longest_win, 20);
        assert_eq!(report.streaks.longest_loss, 0);
        assert_eq!(report.moving_average, vec![1.0]);
        let trend = report.trend.value().unwrap();
        assert_eq!(trend.trend, Trend::Flat);
    }

    #[test]
    fn test_trend_uses_recent_window() {
        // Early losses fall outside the window of 4
        let games = sequence("LLLLLLDDWW");
        let report = MomentumReport::new(&games, 4, 0.05);
        assert_eq!(report.games_in_window, 4);
        let trend = report.trend.value().unwrap();
        assert_eq!(trend.first_half_mean, 0.0);
        assert_eq!(trend.second_half_mean, 1.0);
        assert_eq!(trend.trend, Trend::Improving);
        assert_eq!(report.moving_average.len(), 7);
    }

    #[test]
    fn test_single_game_trend_is_insufficient() {
        let games = sequence("W");
        let report = MomentumReport::new(&games, 20, 0.05);
        assert!(report.trend.is_insufficient());
        assert!(report.recovery.recovery_rate.is_insufficient());
        assert!(report.rating.is_value());
    }

    #[test]
    fn test_recovery_after_losses() {
        let games = sequence("LWLLDLW");
        let recovery = Recovery::new(&games);
        assert_eq!(recovery.games_after_loss, 4);
        assert_eq!(recovery.wins_after_loss, 2);
        assert_eq!(recovery.recovery_rate, Estimate::Value(0.5));
    }

    #[test]
    fn test_rating_trend() {
        let ratings = [1400, 1500, 1300, 1450, 1460, 1455, 1470, 1475];
        let games = ratings
            .iter()
            .map(|&rating| GameBuilder::new(Outcome::Win).ratings(rating, 1500).build())
            .collect::<Vec<_>>();
        let trend = RatingTrend::new(&games).unwrap();

        assert_eq!(trend.first, 1400);
        assert_eq!(trend.last, 1475);
        assert_eq!(trend.change, 75);
        assert_eq!(trend.early_std_dev, Estimate::Value(50.0));
        assert_eq!(trend.recent_std_dev, Estimate::Value(2.5));
        assert_eq!(trend.consistency_improving, Estimate::Value(true));
    }

    #[test]
    fn test_rating_trend_short_batch() {
        let games = games(Outcome::Draw, 5);
        let trend = RatingTrend::new(&games).unwrap();
        assert_eq!(trend.change, 0);
        assert!(trend.consistency_improving.is_insufficient());
        assert!(RatingTrend::new(&[]).is_none());
    }
}
