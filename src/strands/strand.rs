use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use super::util::{Position, Step};
use crate::error::{Result, StrandsError};

/// A path through the board: a start cell followed by a sequence of steps.
///
/// Nothing is checked at construction. Geometry is validated on demand with
/// [`Strand::is_cyclic`], [`Strand::is_folded`] or [`Strand::validate`], and board
/// bounds are checked by the board when the strand is evaluated.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Strand {
    pub start: Position,
    pub steps: Vec<Step>,
}

impl Strand {
    pub fn new(start: Position, steps: Vec<Step>) -> Self {
        Self { start, steps }
    }

    /// Builds a strand from an explicit list of cells. Fails with `EmptyStrand`
    /// on an empty list and `NotAdjacent` when two consecutive cells are not
    /// neighbours.
    pub fn from_positions(positions: &[Position]) -> Result<Self> {
        let start = *positions.first().ok_or(StrandsError::EmptyStrand)?;
        let steps = positions
            .windows(2)
            .map(|w| w[0].step_to(w[1]))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { start, steps })
    }

    /// Number of cells the strand covers
    pub fn len(&self) -> usize {
        self.steps.len() + 1
    }

    pub fn is_empty(&self) -> bool {
        false
    }

    pub fn iter(&self) -> StrandIter {
        StrandIter {
            strand: self,
            curr: None,
            next_step: 0,
        }
    }

    /// Every cell of the strand, start first
    pub fn positions(&self) -> Vec<Position> {
        self.iter().collect()
    }

    /// True when some cell is visited twice
    pub fn is_cyclic(&self) -> bool {
        let mut seen = HashSet::with_capacity(self.len());
        !self.iter().all(|p| seen.insert(p))
    }

    /// True when two diagonal moves of the strand cross over the same 2x2
    /// square, forming an X.
    pub fn is_folded(&self) -> bool {
        let positions = self.positions();
        let edges: HashSet<(Position, Position)> =
            positions.windows(2).map(|w| (w[0], w[1])).collect();

        edges.iter().any(|&(from, to)| {
            let diagonal = (to.row - from.row).abs() == 1 && (to.col - from.col).abs() == 1;
            if !diagonal {
                return false;
            }
            // The two corners the edge skips over
            let a = Position::new(from.row, to.col);
            let b = Position::new(to.row, from.col);
            edges.contains(&(a, b)) || edges.contains(&(b, a))
        })
    }

    /// Rejects strands a player could not physically trace
    pub fn validate(&self) -> Result<()> {
        let cyclic = self.is_cyclic();
        let folded = self.is_folded();
        if cyclic || folded {
            return Err(StrandsError::InvalidPathGeometry { cyclic, folded });
        }
        Ok(())
    }

    /// A spangram touches two opposite sides of a `rows` x `cols` board.
    pub fn is_spangram(&self, rows: usize, cols: usize) -> bool {
        let (rows, cols) = (rows as isize, cols as isize);
        let (mut top, mut bottom, mut left, mut right) = (false, false, false, false);
        for p in self.iter() {
            top |= p.row == 0;
            bottom |= p.row == rows - 1;
            left |= p.col == 0;
            right |= p.col == cols - 1;
        }
        (top && bottom) || (left && right)
    }

    /// Row/col pairs of every cell, in order
    pub fn cells(&self) -> Vec<(isize, isize)> {
        self.iter().map(|p| p.as_pair()).collect()
    }
}

pub struct StrandIter<'a> {
    strand: &'a Strand,
    curr: Option<Position>,
    next_step: usize,
}

impl<'a> Iterator for StrandIter<'a> {
    type Item = Position;

    fn next(&mut self) -> Option<Self::Item> {
        match self.curr {
            None => {
                self.curr = Some(self.strand.start);
                self.curr
            }
            Some(p) => match self.strand.steps.get(self.next_step) {
                Some(&step) => {
                    self.next_step += 1;
                    self.curr = Some(p.take_step(step));
                    self.curr
                }
                None => None,
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = match self.curr {
            None => self.strand.len(),
            Some(_) => self.strand.steps.len() - self.next_step,
        };
        (remaining, Some(remaining))
    }
}
