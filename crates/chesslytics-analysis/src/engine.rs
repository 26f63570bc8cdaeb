//! Batch analysis entry point
//!
//! [`Analyzer`] validates a raw batch, puts it into chronological order and
//! composes the report. Malformed entries are skipped one by one and recorded
//! in the report metadata; only an invalid configuration or an empty result
//! aborts the run.

use chesslytics_model::{GameOrder, GameRecord, RawBatch};

use crate::{
    config::{AnalysisConfig, ConfigurationError},
    report::{AnalysisReport, ReportError, ReportMetadata, SkippedRecord},
};

#[derive(Debug, Clone, PartialEq, derive_more::Display, derive_more::Error, derive_more::From)]
pub enum AnalysisError {
    #[display("invalid configuration: {_0}")]
    Configuration(ConfigurationError),
    #[display("cannot compose report: {_0}")]
    Report(ReportError),
}

#[derive(Debug, Clone)]
pub struct Analyzer {
    config: AnalysisConfig,
}

impl Analyzer {
    pub fn new(config: AnalysisConfig) -> Result<Self, ConfigurationError> {
        config.validate()?;
        Ok(Self { config })
    }

    #[must_use]
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    pub fn analyze(&self, batch: RawBatch) -> Result<AnalysisReport, AnalysisError> {
        let RawBatch { order, entries } = batch;
        let entries_received = entries.len();

        let mut games = Vec::with_capacity(entries.len());
        let mut skipped = vec![];
        for (index, raw) in entries.into_iter().enumerate() {
            let id = raw.id.clone();
            match GameRecord::from_raw(raw) {
                Ok(game) => games.push(game),
                Err(e) => {
                    log::warn!(
                        "skipping entry {index} ({}): {e}",
                        id.as_deref().unwrap_or("no id")
                    );
                    skipped.push(SkippedRecord {
                        index,
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }
        if order == GameOrder::NewestFirst {
            games.reverse();
        }

        let metadata = ReportMetadata {
            entries_received,
            games_analyzed: games.len(),
            skipped_count: skipped.len(),
            skipped,
            input_order: order,
            config: self.config.clone(),
        };
        let report = AnalysisReport::compose(&games, &self.config, metadata)?;
        log::info!(
            "analyzed {} of {} games ({} skipped)",
            report.metadata.games_analyzed,
            report.metadata.entries_received,
            report.metadata.skipped_count
        );
        Ok(report)
    }
}
