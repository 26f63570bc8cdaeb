use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{MalformedGameError, RawGame, UnknownVariantError};

/// Side of the board.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Color {
    #[display("white")]
    White,
    #[display("black")]
    Black,
}

impl Color {
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }
}

impl FromStr for Color {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "white" | "w" => Ok(Color::White),
            "black" | "b" => Ok(Color::Black),
            _ => Err(UnknownVariantError {
                kind: "color",
                value: s.to_owned(),
            }),
        }
    }
}

/// Time-control class of a game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum TimeClass {
    #[display("bullet")]
    Bullet,
    #[display("blitz")]
    Blitz,
    #[display("rapid")]
    Rapid,
    #[display("daily")]
    Daily,
}

impl FromStr for TimeClass {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bullet" => Ok(TimeClass::Bullet),
            "blitz" => Ok(TimeClass::Blitz),
            "rapid" => Ok(TimeClass::Rapid),
            "daily" | "correspondence" => Ok(TimeClass::Daily),
            _ => Err(UnknownVariantError {
                kind: "time class",
                value: s.to_owned(),
            }),
        }
    }
}

/// Game result from the analyzed player's point of view.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    derive_more::Display,
    derive_more::IsVariant,
)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    #[display("win")]
    Win,
    #[display("loss")]
    Loss,
    #[display("draw")]
    Draw,
}

impl Outcome {
    /// Result score used for momentum: win = +1, draw = 0, loss = -1.
    #[must_use]
    pub const fn score(self) -> f64 {
        match self {
            Outcome::Win => 1.0,
            Outcome::Draw => 0.0,
            Outcome::Loss => -1.0,
        }
    }
}

/// How a game ended.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, derive_more::Display,
)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    #[display("checkmate")]
    Checkmate,
    #[display("resignation")]
    Resignation,
    #[display("timeout")]
    Timeout,
    #[display("abandoned")]
    Abandoned,
    #[display("agreement")]
    Agreement,
    #[display("repetition")]
    Repetition,
    #[display("stalemate")]
    Stalemate,
    #[display("insufficient material")]
    InsufficientMaterial,
    #[display("fifty-move rule")]
    FiftyMove,
    #[display("timeout vs insufficient material")]
    TimeoutVsInsufficient,
    #[display("other")]
    Other,
}

/// Interprets a chess.com style per-player result code.
///
/// Returns the outcome for the player holding the code and, for non-wins, the
/// termination the code describes.
fn classify_result_code(code: &str) -> Option<(Outcome, Option<Termination>)> {
    let parsed = match code.to_ascii_lowercase().as_str() {
        "win" => (Outcome::Win, None),
        "checkmated" => (Outcome::Loss, Some(Termination::Checkmate)),
        "resigned" => (Outcome::Loss, Some(Termination::Resignation)),
        "timeout" => (Outcome::Loss, Some(Termination::Timeout)),
        "abandoned" => (Outcome::Loss, Some(Termination::Abandoned)),
        "lose" | "loss" => (Outcome::Loss, Some(Termination::Other)),
        "agreed" | "draw" => (Outcome::Draw, Some(Termination::Agreement)),
        "repetition" => (Outcome::Draw, Some(Termination::Repetition)),
        "stalemate" => (Outcome::Draw, Some(Termination::Stalemate)),
        "insufficient" => (Outcome::Draw, Some(Termination::InsufficientMaterial)),
        "50move" => (Outcome::Draw, Some(Termination::FiftyMove)),
        "timevsinsufficient" => (Outcome::Draw, Some(Termination::TimeoutVsInsufficient)),
        _ => return None,
    };
    Some(parsed)
}

/// One half-move.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ply {
    /// Full-move number this ply belongs to (1-based)
    pub move_number: u32,
    /// Side that made this ply
    pub side: Color,
    /// Notation token (SAN)
    pub san: String,
    /// Clock remaining for `side` after the ply, in seconds
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clock: Option<f64>,
}

impl Ply {
    /// Builds a clock-less ply sequence from SAN tokens played from the initial position.
    #[must_use]
    pub fn sequence<S>(sans: &[S]) -> Vec<Ply>
    where
        S: AsRef<str>,
    {
        sans.iter()
            .zip(0_u32..)
            .map(|(san, index)| Ply {
                move_number: index / 2 + 1,
                side: if index % 2 == 0 { Color::White } else { Color::Black },
                san: san.as_ref().to_owned(),
                clock: None,
            })
            .collect()
    }

    #[must_use]
    pub fn is_capture(&self) -> bool {
        self.san.contains('x')
    }

    /// Letter of the moving piece: `'P'` for pawn moves, `'K'` for castling.
    #[must_use]
    pub fn piece(&self) -> char {
        match self.san.chars().next() {
            Some(piece @ ('N' | 'B' | 'R' | 'Q' | 'K')) => piece,
            Some('O') => 'K',
            _ => 'P',
        }
    }

    /// Target square of a capture, e.g. `"d8"` for `Qxd8+`.
    #[must_use]
    pub fn capture_square(&self) -> Option<&str> {
        let (_, target) = self.san.split_once('x')?;
        target.get(..2)
    }
}

/// A validated, completed game seen from the analyzed player's side.
///
/// Immutable: fields are only readable through accessors, and the only
/// constructor is [`GameRecord::from_raw`].
#[derive(Debug, Clone, PartialEq)]
pub struct GameRecord {
    id: String,
    played_at: DateTime<Utc>,
    time_class: TimeClass,
    color: Color,
    outcome: Outcome,
    termination: Termination,
    player_rating: u32,
    opponent_rating: u32,
    plies: Vec<Ply>,
    move_count: u32,
}

impl GameRecord {
    /// Validates a raw entry into a game record.
    ///
    /// Fails if any of id, end time, time class, color, result, player rating
    /// or opponent rating is missing or unrecognized, or if the move list is
    /// missing or empty.
    pub fn from_raw(raw: RawGame) -> Result<Self, MalformedGameError> {
        fn require<T>(value: Option<T>, field: &'static str) -> Result<T, MalformedGameError> {
            value.ok_or(MalformedGameError::MissingField { field })
        }
        fn parse<T: FromStr>(value: String, field: &'static str) -> Result<T, MalformedGameError> {
            value
                .parse()
                .map_err(|_| MalformedGameError::InvalidField { field, value })
        }

        let id = require(raw.id, "id")?;
        let end_time = require(raw.end_time, "end_time")?;
        let played_at =
            DateTime::from_timestamp(end_time, 0).ok_or_else(|| MalformedGameError::InvalidField {
                field: "end_time",
                value: end_time.to_string(),
            })?;
        let time_class = parse(require(raw.time_class, "time_class")?, "time_class")?;
        let color = parse(require(raw.color, "color")?, "color")?;
        let result = require(raw.result, "result")?;
        let Some((outcome, own_termination)) = classify_result_code(&result) else {
            return Err(MalformedGameError::InvalidField {
                field: "result",
                value: result,
            });
        };
        let termination = own_termination
            .or_else(|| {
                raw.opponent_result
                    .as_deref()
                    .and_then(classify_result_code)
                    .and_then(|(_, termination)| termination)
            })
            .unwrap_or(Termination::Other);
        let player_rating = require(raw.player_rating, "player_rating")?;
        let opponent_rating = require(raw.opponent_rating, "opponent_rating")?;
        let plies = require(raw.plies, "plies")?;
        let Some(last) = plies.last() else {
            return Err(MalformedGameError::EmptyMoveList);
        };
        let move_count = last.move_number;

        Ok(Self {
            id,
            played_at,
            time_class,
            color,
            outcome,
            termination,
            player_rating,
            opponent_rating,
            plies,
            move_count,
        })
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn played_at(&self) -> DateTime<Utc> {
        self.played_at
    }

    #[must_use]
    pub fn time_class(&self) -> TimeClass {
        self.time_class
    }

    #[must_use]
    pub fn color(&self) -> Color {
        self.color
    }

    #[must_use]
    pub fn outcome(&self) -> Outcome {
        self.outcome
    }

    #[must_use]
    pub fn termination(&self) -> Termination {
        self.termination
    }

    #[must_use]
    pub fn player_rating(&self) -> u32 {
        self.player_rating
    }

    #[must_use]
    pub fn opponent_rating(&self) -> u32 {
        self.opponent_rating
    }

    /// Player rating minus opponent rating (positive when the player was favored).
    #[must_use]
    pub fn rating_delta(&self) -> i64 {
        i64::from(self.player_rating) - i64::from(self.opponent_rating)
    }

    #[must_use]
    pub fn plies(&self) -> &[Ply] {
        &self.plies
    }

    /// Full-move number of the last ply.
    #[must_use]
    pub fn move_count(&self) -> u32 {
        self.move_count
    }
}
