//! The composed analysis report
//!
//! Each field of [`AnalysisReport`] is one section. Sections keep their own
//! insufficient-data markers; only an empty overview makes the report fail.

use chesslytics_model::{GameOrder, GameRecord};
use chesslytics_stats::estimate::InsufficientData;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::{
    aggregate::{Breakdowns, SubsetStats},
    config::AnalysisConfig,
    exchange::ExchangeReport,
    mistake::{EndgameReport, MistakeReport},
    momentum::MomentumReport,
    opening::OpeningRepertoire,
    pattern::{OutcomeProfiles, PatternReport},
    phase::segment_all,
    schedule::ScheduleReport,
    time_management::TimeManagementReport,
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error)]
pub enum ReportError {
    #[display("not enough games for an overview: {} available, {} required", marker.samples, marker.required)]
    InsufficientData { marker: InsufficientData },
}

/// An input entry that did not become a game record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRecord {
    /// Position of the entry in the input batch
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportMetadata {
    pub entries_received: usize,
    pub games_analyzed: usize,
    /// Always `skipped.len()`
    pub skipped_count: usize,
    pub skipped: Vec<SkippedRecord>,
    pub input_order: GameOrder,
    pub config: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Overview {
    #[serde(flatten)]
    pub stats: SubsetStats,
    pub first_game_at: Option<DateTime<Utc>>,
    pub last_game_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisReport {
    pub metadata: ReportMetadata,
    pub overview: Overview,
    pub breakdowns: Breakdowns,
    pub openings: OpeningRepertoire,
    pub patterns: PatternReport,
    pub outcome_profiles: OutcomeProfiles,
    pub endgame: EndgameReport,
    pub mistakes: MistakeReport,
    pub momentum: MomentumReport,
    pub schedule: ScheduleReport,
    pub time_management: TimeManagementReport,
    pub exchanges: ExchangeReport,
}

impl AnalysisReport {
    /// Computes every section over `games`, which must be in chronological order.
    pub fn compose(
        games: &[GameRecord],
        config: &AnalysisConfig,
        metadata: ReportMetadata,
    ) -> Result<Self, ReportError> {
        let stats = SubsetStats::from_games(games);
        if let Some(marker) = stats.win_rate.marker() {
            return Err(ReportError::InsufficientData { marker });
        }
        let overview = Overview {
            stats,
            first_game_at: games.iter().map(GameRecord::played_at).min(),
            last_game_at: games.iter().map(GameRecord::played_at).max(),
        };

        let segmented = segment_all(games, config.phase_boundaries);
        log::debug!("segmented {} games into phases", segmented.len());

        let breakdowns = Breakdowns::new(&segmented, config.rating_band_width);
        let openings = OpeningRepertoire::classify(
            games,
            config.opening_prefix_plies,
            config.min_games_for_pattern,
            config.ranking_top_n,
        );
        log::debug!("classified {} distinct opening lines", openings.distinct_lines);

        let patterns = PatternReport::detect(&segmented, config);
        log::debug!(
            "found {} patterns ({} suppressed by sample size)",
            patterns.patterns.len(),
            patterns.suppressed_by_sample_gate
        );
        let outcome_profiles = OutcomeProfiles::new(games, config.quick_loss_moves);

        let endgame = EndgameReport::new(&segmented);
        let mistakes = MistakeReport::new(&segmented, config);
        log::debug!(
            "flagged {} mistake candidates among {} losses",
            mistakes.candidates.len(),
            mistakes.losses_examined
        );

        let momentum = MomentumReport::new(games, config.momentum_window, config.flat_trend_epsilon);
        let schedule = ScheduleReport::new(games, config);
        log::debug!(
            "{} sessions over {} days played",
            schedule.sessions.sessions,
            schedule.sessions.days_played
        );
        let time_management =
            TimeManagementReport::new(games, config.phase_boundaries, config.time_pressure_secs);
        let exchanges = ExchangeReport::new(games);

        Ok(Self {
            metadata,
            overview,
            breakdowns,
            openings,
            patterns,
            outcome_profiles,
            endgame,
            mistakes,
            momentum,
            schedule,
            time_management,
            exchanges,
        })
    }
}

#[cfg(test)]
mod tests {
    use chesslytics_model::Outcome;

    use super::*;
    use crate::test_util::{GameBuilder, games};

    fn metadata(games: usize) -> ReportMetadata {
        ReportMetadata {
            entries_received: games,
            games_analyzed: games,
            skipped_count: 0,
            skipped: vec![],
            input_order: GameOrder::OldestFirst,
            config: AnalysisConfig::default(),
        }
    }

    #[test]
    fn test_empty_overview_fails() {
        let err = AnalysisReport::compose(&[], &AnalysisConfig::default(), metadata(0)).unwrap_err();
        assert_eq!(
            err,
            ReportError::InsufficientData {
                marker: InsufficientData {
                    samples: 0,
                    required: 1
                }
            }
        );
    }

    #[test]
    fn test_sparse_sections_keep_markers() {
        // Two short games: no endgame, too few games for most sections
        let games = vec![
            GameBuilder::new(Outcome::Win).moves(10).at(0).build(),
            GameBuilder::new(Outcome::Loss).moves(12).at(1).build(),
        ];
        let report =
            AnalysisReport::compose(&games, &AnalysisConfig::default(), metadata(2)).unwrap();

        assert_eq!(report.overview.stats.games, 2);
        assert!(report.endgame.conversion_rate.is_insufficient());
        assert!(report.openings.most_successful.is_empty());
        assert!(report.overview.first_game_at < report.overview.last_game_at);
    }

    #[test]
    fn test_report_serializes_sections() {
        let games = games(Outcome::Draw, 4);
        let report =
            AnalysisReport::compose(&games, &AnalysisConfig::default(), metadata(4)).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        for section in [
            "metadata",
            "overview",
            "breakdowns",
            "openings",
            "patterns",
            "outcome_profiles",
            "endgame",
            "mistakes",
            "momentum",
            "schedule",
            "time_management",
            "exchanges",
        ] {
            assert!(json.get(section).is_some(), "missing section {section}");
        }
        assert_eq!(json["overview"]["draw_rate"]["value"], 1.0);
        assert!(json["endgame"]["conversion_rate"]["insufficient"].is_object());
        assert_eq!(json["metadata"]["skipped_count"], 0);
        assert_eq!(json["endgame"]["by_type"].as_object().unwrap().len(), 4);
        assert_eq!(json["schedule"]["by_weekday"].as_object().unwrap().len(), 7);
        assert!(json["mistakes"]["resignations_by_phase"]["opening"].is_number());
    }
}
