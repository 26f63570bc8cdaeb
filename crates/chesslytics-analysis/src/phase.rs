//! Phase segmentation by move number
//!
//! A game is split into opening, middlegame and endgame purely by full-move
//! number, using two cutoffs `opening_end < middlegame_end`:
//!
//! ```text
//! opening     moves 1 ..= opening_end
//! middlegame  moves opening_end + 1 ..= middlegame_end
//! endgame     moves middlegame_end + 1 ..
//! ```
//!
//! A phase with no plies is *not reached*. Aggregates over a phase skip games
//! that did not reach it rather than counting them as empty entries.

use chesslytics_model::{GameRecord, Ply};
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[display("opening")]
    Opening,
    #[display("middlegame")]
    Middlegame,
    #[display("endgame")]
    Endgame,
}

impl Phase {
    pub const ALL: [Phase; 3] = [Phase::Opening, Phase::Middlegame, Phase::Endgame];

    const fn index(self) -> usize {
        match self {
            Phase::Opening => 0,
            Phase::Middlegame => 1,
            Phase::Endgame => 2,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseBoundaries {
    /// Last move number of the opening
    pub opening_end: u32,
    /// Last move number of the middlegame
    pub middlegame_end: u32,
}

impl Default for PhaseBoundaries {
    fn default() -> Self {
        Self {
            opening_end: 15,
            middlegame_end: 35,
        }
    }
}

impl PhaseBoundaries {
    #[must_use]
    pub fn phase_of_move(self, move_number: u32) -> Phase {
        if move_number <= self.opening_end {
            Phase::Opening
        } else if move_number <= self.middlegame_end {
            Phase::Middlegame
        } else {
            Phase::Endgame
        }
    }
}

/// The plies of one game, split by phase.
#[derive(Debug, Clone, Copy)]
pub struct PhaseSegments<'a> {
    plies: &'a [Ply],
    /// Start index of each phase within `plies`
    starts: [usize; 3],
}

impl<'a> PhaseSegments<'a> {
    #[must_use]
    pub fn new(game: &'a GameRecord, boundaries: PhaseBoundaries) -> Self {
        let plies = game.plies();
        let middlegame_start = plies.partition_point(|ply| ply.move_number <= boundaries.opening_end);
        let endgame_start =
            plies.partition_point(|ply| ply.move_number <= boundaries.middlegame_end);
        Self {
            plies,
            starts: [0, middlegame_start, endgame_start],
        }
    }

    fn range(&self, phase: Phase) -> std::ops::Range<usize> {
        let start = self.starts[phase.index()];
        let end = self
            .starts
            .get(phase.index() + 1)
            .copied()
            .unwrap_or(self.plies.len());
        start..end
    }

    /// Whether the game has at least one ply in `phase`.
    #[must_use]
    pub fn reached(&self, phase: Phase) -> bool {
        !self.range(phase).is_empty()
    }

    /// The plies of `phase`, or `None` if the game never reached it.
    #[must_use]
    pub fn plies(&self, phase: Phase) -> Option<&'a [Ply]> {
        let range = self.range(phase);
        (!range.is_empty()).then(|| &self.plies[range])
    }

    /// All plies played before `phase` began.
    #[must_use]
    pub fn before(&self, phase: Phase) -> &'a [Ply] {
        &self.plies[..self.starts[phase.index()]]
    }

    /// The last phase the game reached, i.e. the phase in which it was decided.
    #[must_use]
    pub fn decisive_phase(&self) -> Phase {
        Phase::ALL
            .into_iter()
            .rev()
            .find(|phase| self.reached(*phase))
            .unwrap_or(Phase::Opening)
    }

    pub fn reached_phases(&self) -> impl Iterator<Item = Phase> + '_ {
        Phase::ALL.into_iter().filter(|phase| self.reached(*phase))
    }
}

/// A game together with its phase segmentation.
#[derive(Debug, Clone, Copy)]
pub struct SegmentedGame<'a> {
    pub game: &'a GameRecord,
    pub segments: PhaseSegments<'a>,
}

/// Segments every game once so later stages can share the result.
#[must_use]
pub fn segment_all(games: &[GameRecord], boundaries: PhaseBoundaries) -> Vec<SegmentedGame<'_>> {
    games
        .iter()
        .map(|game| SegmentedGame {
            game,
            segments: PhaseSegments::new(game, boundaries),
        })
        .collect()
}
