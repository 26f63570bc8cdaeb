//! JSON game archives
//!
//! An archive is a previously downloaded game list for one player:
//!
//! ```json
//! {
//!   "username": "hikaru",
//!   "order": "newest-first",
//!   "games": [
//!     {
//!       "id": "https://www.chess.com/game/live/1",
//!       "end_time": 1700000000,
//!       "time_class": "blitz",
//!       "color": "white",
//!       "result": "win",
//!       "opponent_result": "resigned",
//!       "player_rating": 1500,
//!       "opponent_rating": 1480,
//!       "movetext": "1. e4 {[%clk 0:02:59.5]} 1... e5 {[%clk 0:02:58]} 2. Nf3 1-0"
//!     }
//!   ]
//! }
//! ```
//!
//! Entries may carry a structured `plies` list or PGN `movetext`; movetext is
//! only parsed when no plies are present.

use std::path::PathBuf;

use chesslytics_model::{GameFetcher, GameOrder, MoveParser, RawBatch, RawGame};
use serde::Deserialize;

use crate::{movetext::PgnMoveParser, util};

#[derive(Debug, Clone, Deserialize)]
struct ArchiveFile {
    username: Option<String>,
    #[serde(default)]
    order: GameOrder,
    games: Vec<ArchiveEntry>,
}

#[derive(Debug, Clone, Deserialize)]
struct ArchiveEntry {
    #[serde(flatten)]
    raw: RawGame,
    movetext: Option<String>,
}

/// A game archive loaded into memory.
#[derive(Debug, Clone)]
pub(crate) struct JsonArchive {
    path: PathBuf,
    owner: Option<String>,
    order: GameOrder,
    entries: Vec<ArchiveEntry>,
    parser: PgnMoveParser,
}

impl JsonArchive {
    /// Reads the archive at `path`; `order` overrides the order declared in the file.
    pub(crate) fn open(path: PathBuf, order: Option<GameOrder>) -> anyhow::Result<Self> {
        let ArchiveFile {
            username,
            order: declared,
            games,
        } = util::read_json_file("game archive", &path)?;
        Ok(Self {
            path,
            owner: username,
            order: order.unwrap_or(declared),
            entries: games,
            parser: PgnMoveParser,
        })
    }

    /// Player name declared by the archive file, if any.
    pub(crate) fn owner(&self) -> Option<&str> {
        self.owner.as_deref()
    }

    fn entry_to_raw(&self, index: usize, entry: &ArchiveEntry) -> RawGame {
        let mut raw = entry.raw.clone();
        if raw.plies.is_none()
            && let Some(movetext) = &entry.movetext
        {
            match self.parser.parse(movetext) {
                Ok(plies) => raw.plies = Some(plies),
                // Left without plies, so validation records the entry as malformed
                Err(e) => log::warn!("entry {index}: {e}"),
            }
        }
        raw
    }
}

impl GameFetcher for JsonArchive {
    type Error = anyhow::Error;

    fn fetch(&self, username: &str, count: usize) -> anyhow::Result<RawBatch> {
        if let Some(owner) = self.owner()
            && !owner.eq_ignore_ascii_case(username)
        {
            anyhow::bail!(
                "archive {} belongs to {owner}, not {username}",
                self.path.display()
            );
        }

        let total = self.entries.len();
        // Keep the `count` most recent entries
        let range = match self.order {
            GameOrder::NewestFirst => 0..count.min(total),
            GameOrder::OldestFirst => total.saturating_sub(count)..total,
        };
        log::info!(
            "read {total} entries for {username} from {}, using {}",
            self.path.display(),
            range.len()
        );

        let entries = self.entries[range.clone()]
            .iter()
            .zip(range)
            .map(|(entry, index)| self.entry_to_raw(index, entry))
            .collect();
        Ok(RawBatch {
            order: self.order,
            entries,
        })
    }
}
