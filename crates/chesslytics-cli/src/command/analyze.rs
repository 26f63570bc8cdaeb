use std::path::PathBuf;

use anyhow::Context;
use chesslytics_analysis::{config::AnalysisConfig, engine::Analyzer};
use chesslytics_model::{GameFetcher, GameOrder};

use crate::{
    archive::JsonArchive,
    util::{self, Output},
};

#[derive(Debug, Clone, clap::Args)]
pub(crate) struct AnalyzeArg {
    /// Path to the game archive JSON file
    games: PathBuf,
    /// Analysis configuration TOML file
    #[arg(long)]
    config: Option<PathBuf>,
    /// Order of the archive entries, overriding the one declared in the file
    #[arg(long)]
    order: Option<GameOrder>,
    /// Number of most recent games to analyze [default: from configuration]
    #[arg(long)]
    num_games: Option<usize>,
    /// Player the archive belongs to [default: from the archive]
    #[arg(long)]
    username: Option<String>,
    /// Output file path
    #[arg(long)]
    output: Option<PathBuf>,
}

pub(crate) fn run(arg: &AnalyzeArg) -> anyhow::Result<()> {
    let config = match &arg.config {
        Some(path) => util::read_toml_file::<AnalysisConfig, _>("configuration", path)?,
        None => AnalysisConfig::default(),
    };
    let analyzer = Analyzer::new(config).context("Invalid analysis configuration")?;

    let fetcher = JsonArchive::open(arg.games.clone(), arg.order)?;
    let username = arg
        .username
        .as_deref()
        .or(fetcher.owner())
        .unwrap_or("player")
        .to_owned();
    let count = arg.num_games.unwrap_or(analyzer.config().default_num_games);
    let batch = fetcher.fetch(&username, count)?;

    let report = analyzer
        .analyze(batch)
        .with_context(|| format!("Failed to analyze games of {username}"))?;
    Output::save_json(&report, arg.output.clone())
}
