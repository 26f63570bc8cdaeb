use std::sync::atomic::{AtomicUsize, Ordering};

use chesslytics_model::{Color, GameRecord, Outcome, Ply, RawGame, TimeClass};

static NEXT_ID: AtomicUsize = AtomicUsize::new(0);

const BASE_TIME: i64 = 1_700_000_000;

/// Builds valid game records for tests.
#[derive(Debug, Clone)]
pub(crate) struct GameBuilder {
    raw: RawGame,
    plies: usize,
    opening: Vec<String>,
    ending: Vec<String>,
    captures: Vec<usize>,
    clocks: Option<(f64, f64)>,
}

impl GameBuilder {
    pub(crate) fn new(outcome: Outcome) -> Self {
        let (result, opponent_result) = match outcome {
            Outcome::Win => ("win", "resigned"),
            Outcome::Loss => ("resigned", "win"),
            Outcome::Draw => ("agreed", "agreed"),
        };
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        Self {
            raw: RawGame {
                id: Some(format!("game-{id}")),
                end_time: Some(BASE_TIME),
                time_class: Some("blitz".to_owned()),
                color: Some("white".to_owned()),
                result: Some(result.to_owned()),
                opponent_result: Some(opponent_result.to_owned()),
                player_rating: Some(1500),
                opponent_rating: Some(1500),
                plies: None,
            },
            plies: 60,
            opening: vec![],
            ending: vec![],
            captures: vec![],
            clocks: None,
        }
    }

    pub(crate) fn id(mut self, id: &str) -> Self {
        self.raw.id = Some(id.to_owned());
        self
    }

    /// Number of full moves; both sides move in the last one.
    pub(crate) fn moves(self, moves: usize) -> Self {
        self.plies(moves * 2)
    }

    pub(crate) fn plies(mut self, plies: usize) -> Self {
        self.plies = plies;
        self
    }

    pub(crate) fn color(mut self, color: Color) -> Self {
        self.raw.color = Some(color.to_string());
        self
    }

    pub(crate) fn time_class(mut self, time_class: TimeClass) -> Self {
        self.raw.time_class = Some(time_class.to_string());
        self
    }

    pub(crate) fn ratings(mut self, player: u32, opponent: u32) -> Self {
        self.raw.player_rating = Some(player);
        self.raw.opponent_rating = Some(opponent);
        self
    }

    /// Game end time, `index` minutes after a fixed base time.
    pub(crate) fn at(mut self, index: i64) -> Self {
        self.raw.end_time = Some(BASE_TIME + index * 60);
        self
    }

    /// Game end time as a Unix timestamp.
    pub(crate) fn end_time(mut self, timestamp: i64) -> Self {
        self.raw.end_time = Some(timestamp);
        self
    }

    pub(crate) fn result_codes(mut self, result: &str, opponent_result: &str) -> Self {
        self.raw.result = Some(result.to_owned());
        self.raw.opponent_result = Some(opponent_result.to_owned());
        self
    }

    pub(crate) fn opening(mut self, sans: &[&str]) -> Self {
        self.opening = sans.iter().map(|&san| san.to_owned()).collect();
        self
    }

    /// Replaces the last plies of the game.
    pub(crate) fn ending(mut self, sans: &[&str]) -> Self {
        self.ending = sans.iter().map(|&san| san.to_owned()).collect();
        self
    }

    /// Marks the ply at each index (0-based) as a capture.
    pub(crate) fn captures(mut self, indices: &[usize]) -> Self {
        self.captures = indices.to_vec();
        self
    }

    /// Constant clock readings for the player and the opponent on every ply.
    pub(crate) fn clocks(mut self, player: f64, opponent: f64) -> Self {
        self.clocks = Some((player, opponent));
        self
    }

    pub(crate) fn raw(self) -> RawGame {
        let color = self
            .raw
            .color
            .as_deref()
            .and_then(|c| c.parse::<Color>().ok())
            .unwrap_or(Color::White);
        let ending_start = self.plies.saturating_sub(self.ending.len());
        let sans = (0..self.plies)
            .map(|index| {
                if let Some(san) = self.opening.get(index) {
                    san.clone()
                } else if let Some(san) = index
                    .checked_sub(ending_start)
                    .and_then(|offset| self.ending.get(offset))
                {
                    san.clone()
                } else if self.captures.contains(&index) {
                    "Nxe5".to_owned()
                } else if index % 2 == 0 {
                    "Nf3".to_owned()
                } else {
                    "Nf6".to_owned()
                }
            })
            .collect::<Vec<_>>();
        let mut plies = Ply::sequence(&sans);
        if let Some((player, opponent)) = self.clocks {
            for ply in &mut plies {
                ply.clock = Some(if ply.side == color { player } else { opponent });
            }
        }
        RawGame {
            plies: Some(plies),
            ..self.raw
        }
    }

    pub(crate) fn build(self) -> GameRecord {
        GameRecord::from_raw(self.raw()).expect("builder produces valid games")
    }
}

/// `count` games with the given outcome and otherwise default settings.
pub(crate) fn games(outcome: Outcome, count: usize) -> Vec<GameRecord> {
    (0..count).map(|_| GameBuilder::new(outcome).build()).collect()
}
