//! Error type shared by every part of the engine.
//!
//! Every failure is a value the caller inspects. Nothing in the library panics on
//! bad input and nothing retries on its own.

use std::time::Duration;

use thiserror::Error;

use crate::strands::util::Position;

pub type Result<T> = std::result::Result<T, StrandsError>;

#[derive(Debug, Error)]
pub enum StrandsError {
    /// The letter grid is empty, ragged, or holds something other than one
    /// lowercase letter per cell.
    #[error("malformed board: {reason}")]
    MalformedBoard { reason: String },

    #[error("position {pos} lies outside the {rows}x{cols} board")]
    OutOfBounds {
        pos: Position,
        rows: usize,
        cols: usize,
    },

    #[error("{from} and {to} are not adjacent")]
    NotAdjacent { from: Position, to: Position },

    #[error("a strand needs at least one cell")]
    EmptyStrand,

    #[error("strand is not a valid path (cyclic: {cyclic}, folded: {folded})")]
    InvalidPathGeometry { cyclic: bool, folded: bool },

    #[error("no exact cover exists for the given candidates")]
    NoExactCover,

    #[error("search budget exceeded after {elapsed:?} ({steps} steps)")]
    SearchBudgetExceeded { elapsed: Duration, steps: u64 },

    #[error("malformed puzzle at line {line}: {reason}")]
    MalformedPuzzle { line: usize, reason: String },

    #[error("invalid step \"{0}\"")]
    InvalidStep(String),

    #[error("dictionary error: {0}")]
    Dictionary(#[from] fst::Error),

    #[error("invalid json: {0}")]
    Json(#[from] serde_json::Error),
}

impl StrandsError {
    pub(crate) fn malformed_board(reason: impl Into<String>) -> Self {
        Self::MalformedBoard {
            reason: reason.into(),
        }
    }

    pub(crate) fn malformed_puzzle(line: usize, reason: impl Into<String>) -> Self {
        Self::MalformedPuzzle {
            line,
            reason: reason.into(),
        }
    }
}
