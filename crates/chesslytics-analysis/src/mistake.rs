//! Endgame conversion and mistake candidates
//!
//! Endgames are typed by the heaviest piece letter seen in the last
//! [`ENDGAME_TYPE_PLIES`] plies (queen, then rook, then minor piece, else pawn).
//!
//! Without engine evaluations, "advantage" is inferred from the parsed moves
//! alone. At the entry of a phase the player holds the advantage signal when
//! they made more captures than the opponent before that phase, or, with equal
//! captures, when their last clock reading was higher than the opponent's.
//!
//! Losses are flagged at most once:
//!
//! - [`MistakeKind::AdvantageReversal`]: the player held the signal when the
//!   decisive phase began (never applies to games decided in the opening);
//! - [`MistakeKind::PrematureCollapse`]: the loss was much shorter than the
//!   average loss against opponents of the same rating band.

use std::collections::BTreeMap;

use chesslytics_model::{Color, GameRecord, Ply, Termination};
use chesslytics_stats::estimate::{Estimate, mean, ratio};
use serde::Serialize;

use crate::{
    aggregate::rating_band,
    config::AnalysisConfig,
    phase::{Phase, PhaseSegments, SegmentedGame},
};

/// Whether the player held the advantage signal when `phase` began.
#[must_use]
pub fn advantage_at_entry(game: &GameRecord, segments: &PhaseSegments<'_>, phase: Phase) -> bool {
    let before = segments.before(phase);
    let player = game.color();
    let captures = |side: Color| {
        before
            .iter()
            .filter(|ply| ply.side == side && ply.is_capture())
            .count()
    };
    let (own, theirs) = (captures(player), captures(player.opponent()));
    if own != theirs {
        return own > theirs;
    }

    let last_clock = |side: Color| {
        before
            .iter()
            .rev()
            .filter(|ply| ply.side == side)
            .find_map(|ply| ply.clock)
    };
    match (last_clock(player), last_clock(player.opponent())) {
        (Some(own), Some(theirs)) => own > theirs,
        _ => false,
    }
}

/// Number of final plies inspected to type an endgame
pub const ENDGAME_TYPE_PLIES: usize = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EndgameType {
    Pawn,
    Minor,
    Rook,
    Queen,
}

impl EndgameType {
    pub const ALL: [Self; 4] = [Self::Pawn, Self::Minor, Self::Rook, Self::Queen];

    /// Types an endgame from the piece letters in its final plies.
    ///
    /// Promotions count as the promoted piece.
    #[must_use]
    pub fn classify(plies: &[Ply]) -> Self {
        let tail = &plies[plies.len().saturating_sub(ENDGAME_TYPE_PLIES)..];
        let seen = |letters: &[char]| {
            tail.iter()
                .any(|ply| ply.san.chars().any(|c| letters.contains(&c)))
        };
        if seen(&['Q']) {
            Self::Queen
        } else if seen(&['R']) {
            Self::Rook
        } else if seen(&['N', 'B']) {
            Self::Minor
        } else {
            Self::Pawn
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndgameTypeStats {
    pub games: usize,
    pub wins: usize,
    pub win_rate: Estimate<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndgameReport {
    pub reached: usize,
    pub win_rate: Estimate<f64>,
    pub by_type: BTreeMap<EndgameType, EndgameTypeStats>,
    /// Endgames entered holding the advantage signal
    pub with_advantage: usize,
    pub converted: usize,
    pub lost_from_advantage: usize,
    /// `converted / with_advantage`
    pub conversion_rate: Estimate<f64>,
}

impl EndgameReport {
    #[must_use]
    pub fn new(games: &[SegmentedGame<'_>]) -> Self {
        let reached = games
            .iter()
            .filter(|segmented| segmented.segments.reached(Phase::Endgame))
            .collect::<Vec<_>>();
        let wins = reached
            .iter()
            .filter(|segmented| segmented.game.outcome().is_win())
            .count();
        let advantaged = reached
            .iter()
            .filter(|segmented| {
                advantage_at_entry(segmented.game, &segmented.segments, Phase::Endgame)
            })
            .collect::<Vec<_>>();
        let converted = advantaged
            .iter()
            .filter(|segmented| segmented.game.outcome().is_win())
            .count();
        let lost_from_advantage = advantaged
            .iter()
            .filter(|segmented| segmented.game.outcome().is_loss())
            .count();

        let by_type = EndgameType::ALL
            .into_iter()
            .map(|endgame_type| {
                let (games, wins) = reached
                    .iter()
                    .filter(|segmented| EndgameType::classify(segmented.game.plies()) == endgame_type)
                    .fold((0, 0), |(games, wins), segmented| {
                        (games + 1, wins + usize::from(segmented.game.outcome().is_win()))
                    });
                let stats = EndgameTypeStats {
                    games,
                    wins,
                    win_rate: ratio(wins, games),
                };
                (endgame_type, stats)
            })
            .collect();

        Self {
            reached: reached.len(),
            win_rate: ratio(wins, reached.len()),
            by_type,
            with_advantage: advantaged.len(),
            converted,
            lost_from_advantage,
            conversion_rate: ratio(converted, advantaged.len()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MistakeKind {
    AdvantageReversal,
    PrematureCollapse,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MistakeCandidate {
    pub id: String,
    pub kind: MistakeKind,
    pub decisive_phase: Phase,
    pub moves: u32,
    pub opponent_band: u32,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MistakeCounts {
    pub advantage_reversal: usize,
    pub premature_collapse: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MistakeReport {
    pub losses_examined: usize,
    /// Average loss length per opponent band, gated by `min_games_for_pattern`
    pub band_loss_lengths: BTreeMap<u32, Estimate<f64>>,
    pub by_phase: BTreeMap<Phase, MistakeCounts>,
    /// Losses by resignation, by the phase the game ended in
    pub resignations_by_phase: BTreeMap<Phase, usize>,
    pub candidates: Vec<MistakeCandidate>,
}

impl MistakeReport {
    #[must_use]
    pub fn new(games: &[SegmentedGame<'_>], config: &AnalysisConfig) -> Self {
        let band_of = |game: &GameRecord| rating_band(game.opponent_rating(), config.rating_band_width);
        let losses = games
            .iter()
            .filter(|segmented| segmented.game.outcome().is_loss())
            .collect::<Vec<_>>();

        let mut lengths_by_band: BTreeMap<u32, Vec<f64>> = BTreeMap::new();
        for segmented in &losses {
            lengths_by_band
                .entry(band_of(segmented.game))
                .or_default()
                .push(f64::from(segmented.game.move_count()));
        }
        let band_loss_lengths = lengths_by_band
            .into_iter()
            .map(|(band, lengths)| {
                let average = match mean(lengths.iter().copied()) {
                    Estimate::Value(average) if lengths.len() >= config.min_games_for_pattern => {
                        Estimate::Value(average)
                    }
                    _ => Estimate::insufficient(lengths.len(), config.min_games_for_pattern),
                };
                (band, average)
            })
            .collect::<BTreeMap<_, _>>();

        let mut by_phase = Phase::ALL
            .into_iter()
            .map(|phase| (phase, MistakeCounts::default()))
            .collect::<BTreeMap<_, _>>();
        let mut resignations_by_phase = Phase::ALL
            .into_iter()
            .map(|phase| (phase, 0))
            .collect::<BTreeMap<_, _>>();
        for segmented in &losses {
            if segmented.game.termination() == Termination::Resignation {
                *resignations_by_phase
                    .entry(segmented.segments.decisive_phase())
                    .or_default() += 1;
            }
        }

        let mut candidates = vec![];
        for segmented in &losses {
            let game = segmented.game;
            let decisive_phase = segmented.segments.decisive_phase();
            let opponent_band = band_of(game);

            let reversal = decisive_phase != Phase::Opening
                && advantage_at_entry(game, &segmented.segments, decisive_phase);
            let collapse = || {
                band_loss_lengths
                    .get(&opponent_band)
                    .and_then(|average| average.value())
                    .is_some_and(|average| {
                        f64::from(game.move_count()) < config.short_loss_ratio * average
                    })
            };
            let kind = if reversal {
                MistakeKind::AdvantageReversal
            } else if collapse() {
                MistakeKind::PrematureCollapse
            } else {
                continue;
            };

            let counts = by_phase.entry(decisive_phase).or_default();
            match kind {
                MistakeKind::AdvantageReversal => counts.advantage_reversal += 1,
                MistakeKind::PrematureCollapse => counts.premature_collapse += 1,
            }
            candidates.push(MistakeCandidate {
                id: game.id().to_owned(),
                kind,
                decisive_phase,
                moves: game.move_count(),
                opponent_band,
            });
        }

        Self {
            losses_examined: losses.len(),
            band_loss_lengths,
            by_phase,
            resignations_by_phase,
            candidates,
        }
    }
}

#[cfg(test)]
mod tests {
    use chesslytics_model::Outcome;

    use super::*;
    use crate::{
        phase::{PhaseBoundaries, segment_all},
        test_util::GameBuilder,
    };

    #[test]
    fn test_advantage_from_captures() {
        // White captures twice before move 36, black never
        let game = GameBuilder::new(Outcome::Loss)
            .plies(80)
            .captures(&[10, 20])
            .build();
        let segments = PhaseSegments::new(&game, PhaseBoundaries::default());
        assert!(advantage_at_entry(&game, &segments, Phase::Endgame));

        let game = GameBuilder::new(Outcome::Loss)
            .plies(80)
            .color(Color::Black)
            .captures(&[10, 20])
            .build();
        let segments = PhaseSegments::new(&game, PhaseBoundaries::default());
        assert!(!advantage_at_entry(&game, &segments, Phase::Endgame));
    }

    #[test]
    fn test_advantage_from_clock_when_material_even() {
        let ahead = GameBuilder::new(Outcome::Win).plies(80).clocks(120.0, 40.0).build();
        let segments = PhaseSegments::new(&ahead, PhaseBoundaries::default());
        assert!(advantage_at_entry(&ahead, &segments, Phase::Endgame));

        let behind = GameBuilder::new(Outcome::Win).plies(80).clocks(40.0, 120.0).build();
        let segments = PhaseSegments::new(&behind, PhaseBoundaries::default());
        assert!(!advantage_at_entry(&behind, &segments, Phase::Endgame));

        let no_clock = GameBuilder::new(Outcome::Win).plies(80).build();
        let segments = PhaseSegments::new(&no_clock, PhaseBoundaries::default());
        assert!(!advantage_at_entry(&no_clock, &segments, Phase::Endgame));
    }

    #[test]
    fn test_endgame_conversion() {
        let games = vec![
            GameBuilder::new(Outcome::Win).plies(80).clocks(100.0, 10.0).build(),
            GameBuilder::new(Outcome::Loss).plies(80).clocks(100.0, 10.0).build(),
            GameBuilder::new(Outcome::Win).plies(80).build(),
            // Never reaches the endgame
            GameBuilder::new(Outcome::Win).moves(20).build(),
        ];
        let segmented = segment_all(&games, PhaseBoundaries::default());
        let report = EndgameReport::new(&segmented);

        assert_eq!(report.reached, 3);
        assert_eq!(report.with_advantage, 2);
        assert_eq!(report.converted, 1);
        assert_eq!(report.lost_from_advantage, 1);
        assert_eq!(report.conversion_rate, Estimate::Value(0.5));
    }

    #[test]
    fn test_endgame_types() {
        let pawn_ending = ["e4", "Ke7", "e5", "Kd7", "f4", "Ke6", "Kf2", "Kf5", "Kf3", "g6"];
        let games = vec![
            GameBuilder::new(Outcome::Win).plies(80).ending(&["Qd4", "Kf7"]).build(),
            GameBuilder::new(Outcome::Loss).plies(80).ending(&["Rd1"]).build(),
            // Default plies only move knights
            GameBuilder::new(Outcome::Win).plies(80).build(),
            GameBuilder::new(Outcome::Draw).plies(80).ending(&pawn_ending).build(),
            GameBuilder::new(Outcome::Loss).plies(80).ending(&pawn_ending).build(),
            // Never reaches the endgame
            GameBuilder::new(Outcome::Win).moves(20).ending(&["Qh5"]).build(),
        ];
        let segmented = segment_all(&games, PhaseBoundaries::default());
        let report = EndgameReport::new(&segmented);

        let queen = &report.by_type[&EndgameType::Queen];
        assert_eq!((queen.games, queen.win_rate), (1, Estimate::Value(1.0)));
        let rook = &report.by_type[&EndgameType::Rook];
        assert_eq!((rook.games, rook.win_rate), (1, Estimate::Value(0.0)));
        assert_eq!(report.by_type[&EndgameType::Minor].wins, 1);
        let pawn = &report.by_type[&EndgameType::Pawn];
        assert_eq!(pawn.games, 2);
        assert_eq!(pawn.win_rate, Estimate::Value(0.0));
        let typed: usize = report.by_type.values().map(|stats| stats.games).sum();
        assert_eq!(typed, report.reached);
    }

    #[test]
    fn test_endgame_type_promotion_and_window() {
        assert_eq!(
            EndgameType::classify(&Ply::sequence(&["e8=Q", "Kd7"])),
            EndgameType::Queen
        );
        // A rook move just outside the last plies is ignored
        let mut sans = vec!["Rd1"];
        sans.extend(["a4"; ENDGAME_TYPE_PLIES]);
        assert_eq!(EndgameType::classify(&Ply::sequence(&sans)), EndgameType::Pawn);
    }

    #[test]
    fn test_endgame_without_games_is_insufficient() {
        let games = vec![GameBuilder::new(Outcome::Win).moves(10).build()];
        let segmented = segment_all(&games, PhaseBoundaries::default());
        let report = EndgameReport::new(&segmented);
        assert_eq!(report.reached, 0);
        assert!(report.win_rate.is_insufficient());
        assert!(report.conversion_rate.is_insufficient());
    }

    #[test]
    fn test_mistake_candidates() {
        let games = vec![
            GameBuilder::new(Outcome::Loss)
                .id("reversal")
                .plies(80)
                .captures(&[10])
                .build(),
            GameBuilder::new(Outcome::Loss).moves(40).build(),
            GameBuilder::new(Outcome::Loss).moves(40).build(),
            GameBuilder::new(Outcome::Loss).id("collapse").moves(10).build(),
            // Opening-phase loss holding material is not a reversal
            GameBuilder::new(Outcome::Loss)
                .id("early")
                .moves(12)
                .captures(&[4])
                .ratings(1500, 2000)
                .build(),
            GameBuilder::new(Outcome::Win).moves(5).build(),
        ];
        let segmented = segment_all(&games, PhaseBoundaries::default());
        let report = MistakeReport::new(&segmented, &AnalysisConfig::default());

        assert_eq!(report.losses_examined, 5);
        let flagged = report
            .candidates
            .iter()
            .map(|c| (c.id.as_str(), c.kind))
            .collect::<Vec<_>>();
        assert_eq!(
            flagged,
            [
                ("reversal", MistakeKind::AdvantageReversal),
                ("collapse", MistakeKind::PrematureCollapse),
            ]
        );
        assert_eq!(report.by_phase[&Phase::Endgame].advantage_reversal, 1);
        assert_eq!(report.by_phase[&Phase::Opening].premature_collapse, 1);
        assert_eq!(report.by_phase[&Phase::Middlegame], MistakeCounts::default());
        // The 2000 band holds a single loss, below the sample gate
        assert!(report.band_loss_lengths[&2000].is_insufficient());
    }

    #[test]
    fn test_resignations_by_phase() {
        let games = vec![
            GameBuilder::new(Outcome::Loss).moves(10).build(),
            GameBuilder::new(Outcome::Loss).moves(25).build(),
            GameBuilder::new(Outcome::Loss).moves(26).build(),
            GameBuilder::new(Outcome::Loss)
                .moves(25)
                .result_codes("timeout", "win")
                .build(),
            GameBuilder::new(Outcome::Win).moves(25).build(),
        ];
        let segmented = segment_all(&games, PhaseBoundaries::default());
        let report = MistakeReport::new(&segmented, &AnalysisConfig::default());

        assert_eq!(report.resignations_by_phase[&Phase::Opening], 1);
        assert_eq!(report.resignations_by_phase[&Phase::Middlegame], 2);
        assert_eq!(report.resignations_by_phase[&Phase::Endgame], 0);
    }
}
