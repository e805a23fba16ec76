use std::fmt;

use super::strand::Strand;
use super::util::Position;

/// Occupancy bitset over the cells of a board, one bit per `row * cols + col`.
///
/// Cloning is cheap enough that searches copy a mask per branch instead of
/// undoing changes on the way back up.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct CellMask {
    // bit is one if the cell is occupied
    bits: Vec<u64>,
    rows: usize,
    cols: usize,
}

impl CellMask {
    pub fn empty(rows: usize, cols: usize) -> Self {
        let words = (rows * cols + 63) / 64;
        Self {
            bits: vec![0; words],
            rows,
            cols,
        }
    }

    /// Mask of the cells a strand covers. Returns `None` if the strand leaves
    /// the board.
    pub fn from_strand(strand: &Strand, rows: usize, cols: usize) -> Option<Self> {
        let mut mask = Self::empty(rows, cols);
        for p in strand.iter() {
            mask.set_index(p.as_index(rows, cols)?);
        }
        Some(mask)
    }

    pub fn num_cells(&self) -> usize {
        self.rows * self.cols
    }

    pub fn set(&mut self, pos: Position) {
        if let Some(i) = pos.as_index(self.rows, self.cols) {
            self.set_index(i);
        }
    }

    pub fn clear(&mut self, pos: Position) {
        if let Some(i) = pos.as_index(self.rows, self.cols) {
            self.bits[i / 64] &= !(1 << (i % 64));
        }
    }

    /// Off-board positions are never occupied
    pub fn is_set(&self, pos: Position) -> bool {
        pos.as_index(self.rows, self.cols)
            .map_or(false, |i| self.is_set_index(i))
    }

    pub fn set_index(&mut self, i: usize) {
        self.bits[i / 64] |= 1 << (i % 64);
    }

    pub fn is_set_index(&self, i: usize) -> bool {
        self.bits[i / 64] & (1 << (i % 64)) != 0
    }

    pub fn reset(&mut self) {
        self.bits.iter_mut().for_each(|w| *w = 0);
    }

    pub fn count(&self) -> usize {
        self.bits.iter().map(|w| w.count_ones() as usize).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.bits.iter().all(|&w| w == 0)
    }

    /// Every cell of the board is occupied
    pub fn is_full(&self) -> bool {
        self.count() == self.num_cells()
    }

    /// No cell is occupied in both masks
    pub fn is_disjoint(&self, other: &CellMask) -> bool {
        self.bits
            .iter()
            .zip(other.bits.iter())
            .all(|(a, b)| a & b == 0)
    }

    pub fn union_with(&mut self, other: &CellMask) {
        self.bits
            .iter_mut()
            .zip(other.bits.iter())
            .for_each(|(a, b)| *a |= b);
    }

    /// Indices of the occupied cells, ascending
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        (0..self.num_cells()).filter(move |&i| self.is_set_index(i))
    }
}

impl fmt::Debug for CellMask {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for r in 0..self.rows {
            for c in 0..self.cols {
                let filled = self.is_set_index(r * self.cols + c);
                write!(f, "{}", if filled { '#' } else { '.' })?;
            }
            if r + 1 < self.rows {
                writeln!(f)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strands::util::Step;

    #[test]
    fn test_set_clear() {
        let mut mask = CellMask::empty(8, 6);
        assert!(mask.is_empty());
        mask.set(Position::new(7, 5));
        mask.set(Position::new(0, 0));
        assert!(mask.is_set(Position::new(7, 5)));
        assert!(!mask.is_set(Position::new(7, 4)));
        assert!(!mask.is_set(Position::new(-1, 0)));
        assert_eq!(mask.count(), 2);
        mask.clear(Position::new(7, 5));
        assert_eq!(mask.indices().collect::<Vec<_>>(), vec![0]);
        mask.reset();
        assert!(mask.is_empty());
    }

    #[test]
    fn test_full_spans_words() {
        // 80 cells needs two words
        let mut mask = CellMask::empty(10, 8);
        for r in 0..10 {
            for c in 0..8 {
                assert!(!mask.is_full());
                mask.set(Position::new(r, c));
            }
        }
        assert!(mask.is_full());
    }

    #[test]
    fn test_strand_masks() {
        let a = Strand::new(Position::new(0, 0), vec![Step::E, Step::E]);
        let b = Strand::new(Position::new(1, 0), vec![Step::NE]);
        let c = Strand::new(Position::new(1, 0), vec![Step::E]);
        let ma = CellMask::from_strand(&a, 2, 3).unwrap();
        let mb = CellMask::from_strand(&b, 2, 3).unwrap();
        let mc = CellMask::from_strand(&c, 2, 3).unwrap();
        assert!(!ma.is_disjoint(&mb));
        assert!(ma.is_disjoint(&mc));

        let mut copy = ma.clone();
        copy.union_with(&mc);
        assert_eq!(copy.count(), 5);
        // The original is untouched by changes to the copy
        assert_eq!(ma.count(), 3);

        let off = Strand::new(Position::new(1, 2), vec![Step::E]);
        assert!(CellMask::from_strand(&off, 2, 3).is_none());
    }
}
