//! Win/loss/draw aggregation over subsets of games
//!
//! [`SubsetStats`] summarizes any selection of games. Rates are fractions in
//! `[0, 1]`; an empty selection yields insufficient-data markers instead of
//! numbers. [`Breakdowns`] slices the whole batch by color, time class, phase
//! membership, decisive phase and opponent-rating band.

use std::collections::BTreeMap;

use chesslytics_model::{Color, GameRecord, Outcome, TimeClass};
use chesslytics_stats::estimate::{Estimate, mean, ratio};
use serde::Serialize;

use crate::phase::{Phase, SegmentedGame};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct OutcomeTally {
    pub wins: usize,
    pub losses: usize,
    pub draws: usize,
}

impl OutcomeTally {
    pub fn add(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Win => self.wins += 1,
            Outcome::Loss => self.losses += 1,
            Outcome::Draw => self.draws += 1,
        }
    }

    #[must_use]
    pub fn total(&self) -> usize {
        self.wins + self.losses + self.draws
    }

    #[must_use]
    pub fn win_rate(&self) -> Estimate<f64> {
        ratio(self.wins, self.total())
    }

    #[must_use]
    pub fn loss_rate(&self) -> Estimate<f64> {
        ratio(self.losses, self.total())
    }

    #[must_use]
    pub fn draw_rate(&self) -> Estimate<f64> {
        ratio(self.draws, self.total())
    }
}

impl FromIterator<Outcome> for OutcomeTally {
    fn from_iter<I: IntoIterator<Item = Outcome>>(iter: I) -> Self {
        let mut tally = Self::default();
        for outcome in iter {
            tally.add(outcome);
        }
        tally
    }
}

/// Summary statistics of a selection of games.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubsetStats {
    pub games: usize,
    #[serde(flatten)]
    pub tally: OutcomeTally,
    pub win_rate: Estimate<f64>,
    pub loss_rate: Estimate<f64>,
    pub draw_rate: Estimate<f64>,
    /// Mean of player rating minus opponent rating
    pub avg_rating_delta: Estimate<f64>,
    pub avg_opponent_rating: Estimate<f64>,
    pub avg_move_count: Estimate<f64>,
}

impl SubsetStats {
    #[expect(clippy::cast_precision_loss)]
    pub fn from_games<'a, I>(games: I) -> Self
    where
        I: IntoIterator<Item = &'a GameRecord>,
    {
        let games = games.into_iter().collect::<Vec<_>>();
        let tally = games.iter().map(|game| game.outcome()).collect::<OutcomeTally>();
        Self {
            games: games.len(),
            win_rate: tally.win_rate(),
            loss_rate: tally.loss_rate(),
            draw_rate: tally.draw_rate(),
            tally,
            avg_rating_delta: mean(games.iter().map(|game| game.rating_delta() as f64)),
            avg_opponent_rating: mean(games.iter().map(|game| f64::from(game.opponent_rating()))),
            avg_move_count: mean(games.iter().map(|game| f64::from(game.move_count()))),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.games == 0
    }
}

/// Groups games by a key and summarizes each group.
///
/// Games for which `group` returns `None` are left out of every group.
pub fn collect_by_group<'a, K, I, F>(games: I, mut group: F) -> BTreeMap<K, SubsetStats>
where
    I: IntoIterator<Item = &'a GameRecord>,
    F: FnMut(&GameRecord) -> Option<K>,
    K: Ord,
{
    let mut groups: BTreeMap<K, Vec<&GameRecord>> = BTreeMap::new();
    for game in games {
        if let Some(key) = group(game) {
            groups.entry(key).or_default().push(game);
        }
    }
    groups
        .into_iter()
        .map(|(key, games)| (key, SubsetStats::from_games(games)))
        .collect()
}

/// Lower bound of the opponent-rating band containing `rating`.
#[must_use]
pub fn rating_band(rating: u32, width: u32) -> u32 {
    rating / width.max(1) * width.max(1)
}

/// Per-dimension breakdown tables.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Breakdowns {
    pub by_color: BTreeMap<Color, SubsetStats>,
    pub by_time_class: BTreeMap<TimeClass, SubsetStats>,
    /// Games that reached each phase; games that ended earlier are absent
    pub by_phase_reached: BTreeMap<Phase, SubsetStats>,
    /// Games grouped by the phase they ended in
    pub by_decisive_phase: BTreeMap<Phase, SubsetStats>,
    /// Keyed by the lower bound of the opponent-rating band
    pub by_opponent_band: BTreeMap<u32, SubsetStats>,
}

impl Breakdowns {
    #[must_use]
    pub fn new(games: &[SegmentedGame<'_>], rating_band_width: u32) -> Self {
        let records = || games.iter().map(|segmented| segmented.game);

        let by_color = [Color::White, Color::Black]
            .into_iter()
            .map(|color| {
                let stats = SubsetStats::from_games(records().filter(|game| game.color() == color));
                (color, stats)
            })
            .collect();
        let by_time_class = [
            TimeClass::Bullet,
            TimeClass::Blitz,
            TimeClass::Rapid,
            TimeClass::Daily,
        ]
        .into_iter()
        .map(|time_class| {
            let stats =
                SubsetStats::from_games(records().filter(|game| game.time_class() == time_class));
            (time_class, stats)
        })
        .collect();
        let by_phase_reached = Phase::ALL
            .into_iter()
            .map(|phase| {
                let stats = SubsetStats::from_games(
                    games
                        .iter()
                        .filter(|segmented| segmented.segments.reached(phase))
                        .map(|segmented| segmented.game),
                );
                (phase, stats)
            })
            .collect();
        let by_decisive_phase = Phase::ALL
            .into_iter()
            .map(|phase| {
                let stats = SubsetStats::from_games(
                    games
                        .iter()
                        .filter(|segmented| segmented.segments.decisive_phase() == phase)
                        .map(|segmented| segmented.game),
                );
                (phase, stats)
            })
            .collect();
        let by_opponent_band = collect_by_group(records(), |game| {
            Some(rating_band(game.opponent_rating(), rating_band_width))
        });

        Self {
            by_color,
            by_time_class,
            by_phase_reached,
            by_decisive_phase,
            by_opponent_band,
        }
    }
}
