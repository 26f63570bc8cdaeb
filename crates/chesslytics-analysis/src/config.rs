//! Analysis configuration
//!
//! All thresholds the engine uses live in [`AnalysisConfig`], which is passed
//! explicitly into [`Analyzer::new`](crate::engine::Analyzer::new). Every field
//! has a default, so a configuration file only needs the values it changes:
//!
//! ```toml
//! min_games_for_pattern = 5
//!
//! [phase_boundaries]
//! opening_end = 12
//! middlegame_end = 40
//! ```

use serde::{Deserialize, Serialize};

use crate::phase::PhaseBoundaries;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Number of games requested from the fetcher when the caller gives no count
    pub default_num_games: usize,
    /// Minimum sample size before a bucket may be reported as a pattern
    pub min_games_for_pattern: usize,
    /// Move-number cutoffs between opening, middlegame and endgame
    pub phase_boundaries: PhaseBoundaries,
    /// Number of plies forming an opening line key
    pub opening_prefix_plies: usize,
    /// Minimum |bucket win rate - overall win rate| for a pattern (fraction)
    pub pattern_deviation_threshold: f64,
    /// Maximum number of patterns in the report
    pub pattern_top_n: usize,
    /// Length of the opening rankings
    pub ranking_top_n: usize,
    /// Target share of games per game-length bucket
    pub length_bucket_share: f64,
    /// Window size for the moving average and trend
    pub momentum_window: usize,
    /// Half-to-half score difference below which the trend is flat
    pub flat_trend_epsilon: f64,
    /// Losses shorter than this many moves are quick losses
    pub quick_loss_moves: u32,
    /// Clock readings below this many seconds count as time pressure
    pub time_pressure_secs: f64,
    /// Width of opponent-rating bands
    pub rating_band_width: u32,
    /// A loss shorter than this fraction of the band's average loss length is premature
    pub short_loss_ratio: f64,
    /// Minimum games on one calendar day for the day to count as a session
    pub min_session_games: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            default_num_games: 100,
            min_games_for_pattern: 3,
            phase_boundaries: PhaseBoundaries::default(),
            opening_prefix_plies: 10,
            pattern_deviation_threshold: 0.10,
            pattern_top_n: 5,
            ranking_top_n: 5,
            length_bucket_share: 0.25,
            momentum_window: 20,
            flat_trend_epsilon: 0.05,
            quick_loss_moves: 20,
            time_pressure_secs: 30.0,
            rating_band_width: 100,
            short_loss_ratio: 0.5,
            min_session_games: 3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ConfigurationError {
    #[display("`{field}` must be greater than zero")]
    ZeroCount { field: &'static str },
    #[display(
        "phase boundaries out of order: opening ends at move {opening_end}, middlegame at move {middlegame_end}"
    )]
    PhaseBoundariesOutOfOrder { opening_end: u32, middlegame_end: u32 },
    #[display("`{field}` = {value} is outside {expected}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        expected: &'static str,
    },
}

impl AnalysisConfig {
    /// Checks every threshold before any aggregation starts.
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        let counts = [
            ("default_num_games", self.default_num_games),
            ("min_games_for_pattern", self.min_games_for_pattern),
            ("opening_prefix_plies", self.opening_prefix_plies),
            ("pattern_top_n", self.pattern_top_n),
            ("ranking_top_n", self.ranking_top_n),
            ("momentum_window", self.momentum_window),
            ("min_session_games", self.min_session_games),
        ];
        for (field, value) in counts {
            if value == 0 {
                return Err(ConfigurationError::ZeroCount { field });
            }
        }
        if self.quick_loss_moves == 0 {
            return Err(ConfigurationError::ZeroCount {
                field: "quick_loss_moves",
            });
        }
        if self.rating_band_width == 0 {
            return Err(ConfigurationError::ZeroCount {
                field: "rating_band_width",
            });
        }

        let PhaseBoundaries {
            opening_end,
            middlegame_end,
        } = self.phase_boundaries;
        if opening_end == 0 || opening_end >= middlegame_end {
            return Err(ConfigurationError::PhaseBoundariesOutOfOrder {
                opening_end,
                middlegame_end,
            });
        }

        let fractions = [
            (
                "pattern_deviation_threshold",
                self.pattern_deviation_threshold,
                0.0..1.0,
                "[0, 1)",
            ),
            (
                "length_bucket_share",
                self.length_bucket_share,
                f64::MIN_POSITIVE..1.0 + f64::EPSILON,
                "(0, 1]",
            ),
            (
                "short_loss_ratio",
                self.short_loss_ratio,
                f64::MIN_POSITIVE..1.0 + f64::EPSILON,
                "(0, 1]",
            ),
            ("flat_trend_epsilon", self.flat_trend_epsilon, 0.0..2.0, "[0, 2)"),
            (
                "time_pressure_secs",
                self.time_pressure_secs,
                0.0..f64::MAX,
                "[0, inf)",
            ),
        ];
        for (field, value, range, expected) in fractions {
            if !range.contains(&value) {
                return Err(ConfigurationError::OutOfRange {
                    field,
                    value,
                    expected,
                });
            }
        }

        Ok(())
    }
}
