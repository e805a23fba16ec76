use std::fmt;
use std::slice::Iter;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StrandsError};

/// One of the eight king moves between neighbouring cells.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    N,
    NE,
    E,
    SE,
    S,
    SW,
    W,
    NW,
}

impl Step {
    /// All directions, clockwise from north. This is also the order in which
    /// neighbours are explored by the word search.
    pub const ALL: [Step; 8] = [
        Step::N,
        Step::NE,
        Step::E,
        Step::SE,
        Step::S,
        Step::SW,
        Step::W,
        Step::NW,
    ];

    pub fn iter() -> Iter<'static, Step> {
        static STEPS: [Step; 8] = Step::ALL;
        STEPS.iter()
    }

    /// (row, col) offset of the step
    pub fn delta(&self) -> (isize, isize) {
        match self {
            Self::N => (-1, 0),
            Self::NE => (-1, 1),
            Self::E => (0, 1),
            Self::SE => (1, 1),
            Self::S => (1, 0),
            Self::SW => (1, -1),
            Self::W => (0, -1),
            Self::NW => (-1, -1),
        }
    }

    pub fn from_delta(d_row: isize, d_col: isize) -> Option<Step> {
        Self::ALL.iter().copied().find(|s| s.delta() == (d_row, d_col))
    }

    pub fn is_diagonal(&self) -> bool {
        matches!(self, Self::NE | Self::SE | Self::SW | Self::NW)
    }

    pub fn flip(&self) -> Self {
        match self {
            Self::N => Self::S,
            Self::NE => Self::SW,
            Self::E => Self::W,
            Self::SE => Self::NW,
            Self::S => Self::N,
            Self::SW => Self::NE,
            Self::W => Self::E,
            Self::NW => Self::SE,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::N => "n",
            Self::NE => "ne",
            Self::E => "e",
            Self::SE => "se",
            Self::S => "s",
            Self::SW => "sw",
            Self::W => "w",
            Self::NW => "nw",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = StrandsError;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|step| step.as_str() == lower)
            .ok_or_else(|| StrandsError::InvalidStep(s.to_string()))
    }
}

/// Zero-based board coordinate. Positions are not bounded on their own, a step
/// off the edge simply yields a negative or too-large coordinate that the board
/// rejects later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub row: isize,
    pub col: isize,
}

impl Position {
    pub fn new(row: isize, col: isize) -> Self {
        Self { row, col }
    }

    /// Returns the neighbouring position in the given direction
    pub fn take_step(&self, step: Step) -> Position {
        let (d_row, d_col) = step.delta();
        Position {
            row: self.row + d_row,
            col: self.col + d_col,
        }
    }

    /// The step leading from `self` to `other`
    pub fn step_to(&self, other: Position) -> Result<Step> {
        let d_row = other.row - self.row;
        let d_col = other.col - self.col;
        if d_row.abs() > 1 || d_col.abs() > 1 {
            return Err(StrandsError::NotAdjacent {
                from: *self,
                to: other,
            });
        }
        // (0, 0) has no step, which covers `self == other`
        Step::from_delta(d_row, d_col).ok_or(StrandsError::NotAdjacent {
            from: *self,
            to: other,
        })
    }

    pub fn is_adjacent_to(&self, other: Position) -> bool {
        self.step_to(other).is_ok()
    }

    /// Converts the row/col to a 1d index on a board with `cols` columns.
    /// Returns `None` when the position is off a `rows` x `cols` board.
    pub fn as_index(&self, rows: usize, cols: usize) -> Option<usize> {
        if self.row < 0 || self.col < 0 {
            return None;
        }
        let (row, col) = (self.row as usize, self.col as usize);
        if row >= rows || col >= cols {
            return None;
        }
        Some(row * cols + col)
    }

    pub fn from_index(index: usize, cols: usize) -> Position {
        Position {
            row: (index / cols) as isize,
            col: (index % cols) as isize,
        }
    }

    pub fn as_pair(&self) -> (isize, isize) {
        (self.row, self.col)
    }
}

impl From<(isize, isize)> for Position {
    fn from((row, col): (isize, isize)) -> Self {
        Position { row, col }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
