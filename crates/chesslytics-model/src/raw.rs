//! Unvalidated input shapes produced by the game fetcher and move parser.
//!
//! Every field is optional: a missing field is reported as a
//! [`MalformedGameError`](crate::MalformedGameError) for that single entry
//! instead of failing deserialization of the whole batch.
//!
//! ```json
//! {
//!   "order": "newest-first",
//!   "entries": [
//!     {
//!       "id": "https://www.chess.com/game/live/1",
//!       "end_time": 1700000000,
//!       "time_class": "blitz",
//!       "color": "white",
//!       "result": "win",
//!       "opponent_result": "resigned",
//!       "player_rating": 1500,
//!       "opponent_rating": 1480,
//!       "plies": [{ "move_number": 1, "side": "white", "san": "e4", "clock": 179.9 }]
//!     }
//!   ]
//! }
//! ```

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Ply, UnknownVariantError};

/// A single fetched game before validation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawGame {
    pub id: Option<String>,
    /// Unix timestamp (seconds) when the game ended
    pub end_time: Option<i64>,
    pub time_class: Option<String>,
    /// Color played by the analyzed player
    pub color: Option<String>,
    /// Result code of the analyzed player (`win`, `resigned`, `agreed`, ...)
    pub result: Option<String>,
    /// Result code of the opponent, used to tell how a won game ended
    pub opponent_result: Option<String>,
    pub player_rating: Option<u32>,
    pub opponent_rating: Option<u32>,
    pub plies: Option<Vec<Ply>>,
}

/// Order in which the fetcher delivered the entries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, derive_more::Display)]
#[serde(rename_all = "kebab-case")]
pub enum GameOrder {
    #[default]
    #[display("newest-first")]
    NewestFirst,
    #[display("oldest-first")]
    OldestFirst,
}

impl FromStr for GameOrder {
    type Err = UnknownVariantError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "newest-first" => Ok(GameOrder::NewestFirst),
            "oldest-first" => Ok(GameOrder::OldestFirst),
            _ => Err(UnknownVariantError {
                kind: "game order",
                value: s.to_owned(),
            }),
        }
    }
}

/// Deduplicated entries for one player, in a declared order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawBatch {
    pub order: GameOrder,
    pub entries: Vec<RawGame>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_fields_deserialize_as_none() {
        let raw: RawGame = serde_json::from_str(r#"{"id": "g1", "time_class": "bullet"}"#).unwrap();
        assert_eq!(raw.id.as_deref(), Some("g1"));
        assert!(raw.result.is_none());
        assert!(raw.plies.is_none());
    }

    #[test]
    fn test_order_round_trip_names() {
        for order in [GameOrder::NewestFirst, GameOrder::OldestFirst] {
            assert_eq!(order.to_string().parse::<GameOrder>().unwrap(), order);
            let json = serde_json::to_string(&order).unwrap();
            assert_eq!(json, format!("\"{order}\""));
        }
    }
}
