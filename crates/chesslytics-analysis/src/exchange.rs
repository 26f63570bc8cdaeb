//! Captures and exchanges
//!
//! Captured pieces are not recorded in move notation, so a queen trade is
//! recognized by shape: a queen captures on a square and the very next ply
//! captures back on that same square.

use chesslytics_model::{GameRecord, Ply};
use chesslytics_stats::estimate::{Estimate, ratio};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExchangeReport {
    /// Captures made by the player across all games
    pub captures_made: usize,
    pub captures_per_game: Estimate<f64>,
    pub queen_trade_games: usize,
    pub queen_trade_win_rate: Estimate<f64>,
    /// Win rate in games where the queens stayed on or left the board otherwise
    pub no_queen_trade_win_rate: Estimate<f64>,
}

impl ExchangeReport {
    #[expect(clippy::cast_precision_loss)]
    #[must_use]
    pub fn new(games: &[GameRecord]) -> Self {
        let captures_made = games.iter().map(player_captures).sum::<usize>();
        let (traded, kept): (Vec<_>, Vec<_>) = games.iter().partition(|game| queen_traded(game.plies()));
        let wins = |games: &[&GameRecord]| games.iter().filter(|game| game.outcome().is_win()).count();

        Self {
            captures_made,
            captures_per_game: Estimate::require(games.len(), 1, || {
                captures_made as f64 / games.len() as f64
            }),
            queen_trade_games: traded.len(),
            queen_trade_win_rate: ratio(wins(&traded), traded.len()),
            no_queen_trade_win_rate: ratio(wins(&kept), kept.len()),
        }
    }
}

fn player_captures(game: &GameRecord) -> usize {
    game.plies()
        .iter()
        .filter(|ply| ply.side == game.color() && ply.is_capture())
        .count()
}

/// Whether a queen capture is immediately answered by a capture on the same square.
#[must_use]
pub fn queen_traded(plies: &[Ply]) -> bool {
    plies.windows(2).any(|pair| {
        pair[0].piece() == 'Q'
            && pair[0]
                .capture_square()
                .is_some_and(|square| pair[1].capture_square() == Some(square))
    })
}
