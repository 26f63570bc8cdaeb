//! Pattern detection
//!
//! Every game is placed into one bucket per dimension (color, time class,
//! decisive phase, game length). A bucket whose win rate deviates from the
//! overall win rate by more than the threshold becomes a pattern, provided it
//! holds at least `min_games_for_pattern` games. Buckets that deviate enough
//! but are too small are counted, never reported.
//!
//! Game-length buckets are adaptive: move counts are binned so that each bin
//! holds roughly `length_bucket_share` of the batch.

use std::collections::BTreeMap;

use chesslytics_model::{GameRecord, Outcome, Termination};
use chesslytics_stats::{
    binning::create_adaptive_bins,
    estimate::{Estimate, mean},
};
use serde::Serialize;

use crate::{
    aggregate::OutcomeTally, config::AnalysisConfig, phase::SegmentedGame,
    time_management::own_clocks,
};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum PatternDimension {
    #[display("color")]
    Color,
    #[display("time_class")]
    TimeClass,
    #[display("decisive_phase")]
    DecisivePhase,
    #[display("game_length")]
    GameLength,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternCandidate {
    pub dimension: PatternDimension,
    pub bucket: String,
    pub sample_size: usize,
    /// Wins inside the bucket
    pub supporting: usize,
    pub bucket_win_rate: f64,
    pub overall_win_rate: f64,
    /// `bucket_win_rate - overall_win_rate`
    pub deviation: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PatternReport {
    pub overall_win_rate: Estimate<f64>,
    pub buckets_evaluated: usize,
    /// Buckets deviating beyond the threshold but holding too few games
    pub suppressed_by_sample_gate: usize,
    pub patterns: Vec<PatternCandidate>,
}

impl PatternReport {
    #[must_use]
    pub fn detect(games: &[SegmentedGame<'_>], config: &AnalysisConfig) -> Self {
        let overall = games
            .iter()
            .map(|segmented| segmented.game.outcome())
            .collect::<OutcomeTally>();
        let overall_win_rate = overall.win_rate();
        let buckets = bucket_tallies(games, config);

        let Some(overall_rate) = overall_win_rate.value() else {
            return Self {
                overall_win_rate,
                buckets_evaluated: buckets.len(),
                suppressed_by_sample_gate: 0,
                patterns: vec![],
            };
        };

        let mut suppressed_by_sample_gate = 0;
        let mut patterns = vec![];
        for ((dimension, bucket), tally) in &buckets {
            let Some(bucket_win_rate) = tally.win_rate().value() else {
                continue;
            };
            let deviation = bucket_win_rate - overall_rate;
            if deviation.abs() <= config.pattern_deviation_threshold {
                continue;
            }
            if tally.total() < config.min_games_for_pattern {
                suppressed_by_sample_gate += 1;
                continue;
            }
            patterns.push(PatternCandidate {
                dimension: *dimension,
                bucket: bucket.clone(),
                sample_size: tally.total(),
                supporting: tally.wins,
                bucket_win_rate,
                overall_win_rate: overall_rate,
                deviation,
            });
        }

        patterns.sort_by(|a, b| {
            b.deviation
                .abs()
                .total_cmp(&a.deviation.abs())
                .then_with(|| b.sample_size.cmp(&a.sample_size))
                .then_with(|| a.dimension.cmp(&b.dimension))
                .then_with(|| a.bucket.cmp(&b.bucket))
        });
        patterns.truncate(config.pattern_top_n);

        Self {
            overall_win_rate,
            buckets_evaluated: buckets.len(),
            suppressed_by_sample_gate,
            patterns,
        }
    }
}

fn bucket_tallies(
    games: &[SegmentedGame<'_>],
    config: &AnalysisConfig,
) -> BTreeMap<(PatternDimension, String), OutcomeTally> {
    let lengths = games
        .iter()
        .map(|segmented| segmented.game.move_count())
        .collect::<Vec<_>>();
    let length_bins = create_adaptive_bins(
        &lengths,
        config.length_bucket_share,
        config.min_games_for_pattern,
    );

    let mut buckets: BTreeMap<(PatternDimension, String), OutcomeTally> = BTreeMap::new();
    for segmented in games {
        let game = segmented.game;
        let mut keys = vec![
            (PatternDimension::Color, game.color().to_string()),
            (PatternDimension::TimeClass, game.time_class().to_string()),
            (
                PatternDimension::DecisivePhase,
                segmented.segments.decisive_phase().to_string(),
            ),
        ];
        if let Some(bin) = length_bins.get(&game.move_count()) {
            keys.push((
                PatternDimension::GameLength,
                format!("{}-{} moves", bin.start, bin.end),
            ));
        }
        for key in keys {
            buckets.entry(key).or_default().add(game.outcome());
        }
    }
    buckets
}

/// How games with one outcome tend to end.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeProfile {
    pub games: usize,
    pub avg_moves: Estimate<f64>,
    /// Average of player rating minus opponent rating
    pub avg_rating_diff: Estimate<f64>,
    /// Average of the player's last clock reading, over games with clock data
    pub avg_final_clock_secs: Estimate<f64>,
    pub terminations: BTreeMap<Termination, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuickLoss {
    pub id: String,
    pub moves: u32,
    pub termination: Termination,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeProfiles {
    pub by_outcome: BTreeMap<Outcome, OutcomeProfile>,
    /// Losses shorter than this many moves are listed as quick losses
    pub quick_loss_moves: u32,
    pub quick_losses: Vec<QuickLoss>,
}

impl OutcomeProfiles {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(games: &[GameRecord], quick_loss_moves: u32) -> Self {
        let by_outcome = [Outcome::Win, Outcome::Loss, Outcome::Draw]
            .into_iter()
            .map(|outcome| {
                let matching = games
                    .iter()
                    .filter(|game| game.outcome() == outcome)
                    .collect::<Vec<_>>();
                let mut terminations = BTreeMap::new();
                for game in &matching {
                    *terminations.entry(game.termination()).or_insert(0) += 1;
                }
                let profile = OutcomeProfile {
                    games: matching.len(),
                    avg_moves: mean(matching.iter().map(|game| f64::from(game.move_count()))),
                    avg_rating_diff: mean(matching.iter().map(|game| game.rating_delta() as f64)),
                    avg_final_clock_secs: mean(
                        matching
                            .iter()
                            .filter_map(|game| own_clocks(game).last().map(|(_, clock)| clock)),
                    ),
                    terminations,
                };
                (outcome, profile)
            })
            .collect();

        let quick_losses = games
            .iter()
            .filter(|game| game.outcome().is_loss() && game.move_count() < quick_loss_moves)
            .map(|game| QuickLoss {
                id: game.id().to_owned(),
                moves: game.move_count(),
                termination: game.termination(),
            })
            .collect();

        Self {
            by_outcome,
            quick_loss_moves,
            quick_losses,
        }
    }
}
