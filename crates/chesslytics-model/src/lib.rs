//! Normalized game model shared by every chesslytics component.
//!
//! Raw entries from the game fetcher and move parser arrive as [`RawGame`]
//! values with every field optional. [`GameRecord::from_raw`] is the only way
//! to build a [`GameRecord`]; it checks required fields once, so analysis code
//! never re-inspects raw shapes.
//!
//! ```
//! use chesslytics_model::{GameRecord, Outcome, Ply, RawGame};
//!
//! let raw = RawGame {
//!     id: Some("g1".to_owned()),
//!     end_time: Some(1_700_000_000),
//!     time_class: Some("blitz".to_owned()),
//!     color: Some("white".to_owned()),
//!     result: Some("win".to_owned()),
//!     opponent_result: Some("resigned".to_owned()),
//!     player_rating: Some(1500),
//!     opponent_rating: Some(1480),
//!     plies: Some(Ply::sequence(&["e4", "e5", "Nf3"])),
//! };
//! let game = GameRecord::from_raw(raw).unwrap();
//! assert_eq!(game.outcome(), Outcome::Win);
//! assert_eq!(game.move_count(), 2);
//! ```

pub use self::{collaborator::*, game::*, raw::*};

pub mod collaborator;
pub mod game;
pub mod raw;

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum MalformedGameError {
    #[display("missing required field `{field}`")]
    MissingField { field: &'static str },
    #[display("field `{field}` has unrecognized value {value:?}")]
    InvalidField { field: &'static str, value: String },
    #[display("move list is empty")]
    EmptyMoveList,
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
#[display("unrecognized {kind} {value:?}")]
pub struct UnknownVariantError {
    pub kind: &'static str,
    pub value: String,
}
