//! Clock usage
//!
//! Only games whose plies carry clock readings contribute to the time-pressure
//! figures. Timeout losses are counted from the termination and need no clock
//! data.

use std::collections::BTreeMap;

use chesslytics_model::{GameRecord, Outcome, Termination};
use chesslytics_stats::estimate::{Estimate, mean, ratio};
use serde::Serialize;

use crate::phase::{Phase, PhaseBoundaries};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimeManagementReport {
    pub pressure_threshold_secs: f64,
    pub games_with_clock_data: usize,
    /// Games in which the player's clock fell below the threshold
    pub time_pressure_games: usize,
    pub time_pressure_share: Estimate<f64>,
    pub time_pressure_win_rate: Estimate<f64>,
    pub timeout_losses: usize,
    pub timeout_loss_share: Estimate<f64>,
    /// Average seconds spent per move, by outcome and phase
    pub avg_secs_per_move: BTreeMap<Outcome, BTreeMap<Phase, Estimate<f64>>>,
}

impl TimeManagementReport {
    #[must_use]
    pub fn new(games: &[GameRecord], boundaries: PhaseBoundaries, pressure_threshold_secs: f64) -> Self {
        let clocked = games
            .iter()
            .filter(|game| own_clocks(game).next().is_some())
            .collect::<Vec<_>>();
        let under_pressure = clocked
            .iter()
            .filter(|game| own_clocks(game).any(|(_, clock)| clock < pressure_threshold_secs))
            .collect::<Vec<_>>();
        let pressure_wins = under_pressure
            .iter()
            .filter(|game| game.outcome().is_win())
            .count();
        let timeout_losses = games
            .iter()
            .filter(|game| game.outcome().is_loss() && game.termination() == Termination::Timeout)
            .count();

        let mut spent: BTreeMap<Outcome, BTreeMap<Phase, Vec<f64>>> = BTreeMap::new();
        for game in &clocked {
            let per_phase = spent.entry(game.outcome()).or_default();
            let clocks = own_clocks(game).collect::<Vec<_>>();
            for pair in clocks.windows(2) {
                let (_, before) = pair[0];
                let (move_number, after) = pair[1];
                per_phase
                    .entry(boundaries.phase_of_move(move_number))
                    .or_default()
                    .push((before - after).max(0.0));
            }
        }
        let avg_secs_per_move = [Outcome::Win, Outcome::Loss, Outcome::Draw]
            .into_iter()
            .map(|outcome| {
                let by_phase = Phase::ALL
                    .into_iter()
                    .map(|phase| {
                        let samples = spent
                            .get(&outcome)
                            .and_then(|per_phase| per_phase.get(&phase))
                            .map(Vec::as_slice)
                            .unwrap_or_default();
                        (phase, mean(samples.iter().copied()))
                    })
                    .collect();
                (outcome, by_phase)
            })
            .collect();

        Self {
            pressure_threshold_secs,
            games_with_clock_data: clocked.len(),
            time_pressure_games: under_pressure.len(),
            time_pressure_share: ratio(under_pressure.len(), clocked.len()),
            time_pressure_win_rate: ratio(pressure_wins, under_pressure.len()),
            timeout_losses,
            timeout_loss_share: ratio(timeout_losses, games.len()),
            avg_secs_per_move,
        }
    }
}

/// Clock readings after each of the player's own moves, with the move number.
pub(crate) fn own_clocks(game: &GameRecord) -> impl Iterator<Item = (u32, f64)> + '_ {
    game.plies()
        .iter()
        .filter(move |ply| ply.side == game.color())
        .filter_map(|ply| ply.clock.map(|clock| (ply.move_number, clock)))
}
