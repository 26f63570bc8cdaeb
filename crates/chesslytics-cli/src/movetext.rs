//! PGN movetext parsing
//!
//! Only the mainline is kept; variations are skipped. Clock readings come from
//! `{[%clk h:mm:ss]}` comments and are attached to the ply they follow.

use std::{io, ops::ControlFlow, sync::LazyLock};

use chesslytics_model::{Color, MoveParser, Ply};
use pgn_reader::{Nag, Outcome, RawComment, Reader, SanPlus, Skip, Visitor};

static CLOCK_RE: LazyLock<regex::Regex> = LazyLock::new(|| {
    regex::Regex::new(r"\[%clk\s+(\d+):(\d{1,2}):(\d{1,2}(?:\.\d+)?)\]").expect("valid clock regex")
});

#[derive(Debug, derive_more::Display, derive_more::Error)]
#[display("failed to read movetext: {message}")]
pub(crate) struct MovetextError {
    message: String,
}

/// Parses a clock annotation into seconds remaining.
fn parse_clock(comment: &str) -> Option<f64> {
    let captures = CLOCK_RE.captures(comment)?;
    let hours = captures[1].parse::<f64>().ok()?;
    let minutes = captures[2].parse::<f64>().ok()?;
    let seconds = captures[3].parse::<f64>().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

#[derive(Debug, Default)]
struct PlyVisitor {
    plies: Vec<Ply>,
}

impl Visitor for PlyVisitor {
    type Tags = ();
    type Movetext = ();
    type Output = ();

    fn begin_tags(&mut self) -> ControlFlow<Self::Output, Self::Tags> {
        self.plies.clear();
        ControlFlow::Continue(())
    }

    fn begin_movetext(&mut self, _tags: Self::Tags) -> ControlFlow<Self::Output, Self::Movetext> {
        ControlFlow::Continue(())
    }

    fn san(
        &mut self,
        _movetext: &mut Self::Movetext,
        san_plus: SanPlus,
    ) -> ControlFlow<Self::Output> {
        let index = u32::try_from(self.plies.len()).unwrap_or(u32::MAX);
        self.plies.push(Ply {
            move_number: index / 2 + 1,
            side: if index.is_multiple_of(2) {
                Color::White
            } else {
                Color::Black
            },
            san: san_plus.to_string(),
            clock: None,
        });
        ControlFlow::Continue(())
    }

    fn nag(&mut self, _movetext: &mut Self::Movetext, _nag: Nag) -> ControlFlow<Self::Output> {
        ControlFlow::Continue(())
    }

    fn comment(
        &mut self,
        _movetext: &mut Self::Movetext,
        comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        let text = String::from_utf8_lossy(comment.as_bytes());
        if let (Some(clock), Some(ply)) = (parse_clock(&text), self.plies.last_mut()) {
            ply.clock = Some(clock);
        }
        ControlFlow::Continue(())
    }

    fn partial_comment(
        &mut self,
        _movetext: &mut Self::Movetext,
        _comment: RawComment<'_>,
    ) -> ControlFlow<Self::Output> {
        ControlFlow::Continue(())
    }

    fn begin_variation(&mut self, _movetext: &mut Self::Movetext) -> ControlFlow<Self::Output, Skip> {
        ControlFlow::Continue(Skip(true))
    }

    fn outcome(
        &mut self,
        _movetext: &mut Self::Movetext,
        _outcome: Outcome,
    ) -> ControlFlow<Self::Output> {
        ControlFlow::Continue(())
    }

    fn end_game(&mut self, _movetext: Self::Movetext) -> Self::Output {}
}

/// [`MoveParser`] for PGN movetext, with or without tag pairs.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct PgnMoveParser;

impl MoveParser for PgnMoveParser {
    type Error = MovetextError;

    fn parse(&self, movetext: &str) -> Result<Vec<Ply>, Self::Error> {
        if movetext.trim().is_empty() {
            return Ok(vec![]);
        }

        let mut reader = Reader::new(io::Cursor::new(movetext.as_bytes()));
        let mut visitor = PlyVisitor::default();
        match reader.read_game(&mut visitor) {
            Ok(Some(())) => Ok(visitor.plies),
            Ok(None) => Ok(vec![]),
            Err(e) => Err(MovetextError {
                message: e.to_string(),
            }),
        }
    }
}
