//! Performance analysis over a batch of completed chess games.
//!
//! The pipeline is a single pass over an in-memory batch:
//!
//! 1. raw entries are validated into [`GameRecord`](chesslytics_model::GameRecord)s
//!    (malformed ones are skipped and recorded),
//! 2. each game is split into opening, middlegame and endgame ([`phase`]),
//! 3. every section of the [`AnalysisReport`](report::AnalysisReport) is
//!    computed from the shared, immutable records.
//!
//! All thresholds come from an explicit [`AnalysisConfig`](config::AnalysisConfig);
//! nothing is global.
//!
//! ```
//! use chesslytics_analysis::{config::AnalysisConfig, engine::Analyzer};
//! use chesslytics_model::{GameOrder, Ply, RawBatch, RawGame};
//!
//! let entry = RawGame {
//!     id: Some("g1".to_owned()),
//!     end_time: Some(1_700_000_000),
//!     time_class: Some("rapid".to_owned()),
//!     color: Some("white".to_owned()),
//!     result: Some("win".to_owned()),
//!     opponent_result: Some("checkmated".to_owned()),
//!     player_rating: Some(1620),
//!     opponent_rating: Some(1600),
//!     plies: Some(Ply::sequence(&["e4", "e5", "Qh5", "Nc6", "Bc4", "Nf6", "Qxf7#"])),
//! };
//!
//! let analyzer = Analyzer::new(AnalysisConfig::default())?;
//! let report = analyzer.analyze(RawBatch {
//!     order: GameOrder::OldestFirst,
//!     entries: vec![entry],
//! })?;
//! assert_eq!(report.overview.stats.games, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod aggregate;
pub mod config;
pub mod engine;
pub mod exchange;
pub mod mistake;
pub mod momentum;
pub mod opening;
pub mod pattern;
pub mod phase;
pub mod report;
pub mod schedule;
pub mod time_management;

#[cfg(test)]
mod test_util;
