//! Interfaces of the collaborators that feed the analysis engine.
//!
//! The engine performs no I/O; implementations of these traits live with the
//! binaries that need them.

use crate::{Ply, RawBatch};

/// Supplies raw game entries for a player.
///
/// Entries must already be deduplicated and delivered in one consistent
/// order, declared through [`RawBatch::order`].
pub trait GameFetcher {
    type Error;

    fn fetch(&self, username: &str, count: usize) -> Result<RawBatch, Self::Error>;
}

/// Turns raw movetext into a structured ply list.
pub trait MoveParser {
    type Error;

    fn parse(&self, movetext: &str) -> Result<Vec<Ply>, Self::Error>;
}
