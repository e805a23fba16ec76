use ndarray::Array2;
use serde::Serialize;

use super::strand::Strand;
use super::util::{Position, Step};
use crate::error::{Result, StrandsError};

/// Immutable rectangular grid of lowercase letters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Board {
    /// Actual letters on the board, indexed `[row, col]`
    letters: Array2<char>,
}

impl Board {
    /// Builds a board from rows of single-letter cells.
    ///
    /// Fails with `MalformedBoard` when the grid is empty, rows differ in length,
    /// or a cell is anything other than exactly one lowercase letter.
    pub fn new<S: AsRef<str>>(rows: &[Vec<S>]) -> Result<Self> {
        let num_cols = match rows.first() {
            Some(row) => row.len(),
            None => return Err(StrandsError::malformed_board("board has no rows")),
        };
        if num_cols == 0 {
            return Err(StrandsError::malformed_board("board has an empty row"));
        }

        let mut cells = Vec::with_capacity(rows.len() * num_cols);
        for (r, row) in rows.iter().enumerate() {
            if row.len() != num_cols {
                return Err(StrandsError::malformed_board(format!(
                    "row {} has {} cells, expected {}",
                    r,
                    row.len(),
                    num_cols
                )));
            }
            for (c, cell) in row.iter().enumerate() {
                let mut chars = cell.as_ref().chars();
                match (chars.next(), chars.next()) {
                    (Some(l), None) if l.is_alphabetic() && l.is_lowercase() => cells.push(l),
                    _ => {
                        return Err(StrandsError::malformed_board(format!(
                            "cell ({}, {}) is \"{}\", expected one lowercase letter",
                            r,
                            c,
                            cell.as_ref()
                        )))
                    }
                }
            }
        }

        let letters = Array2::from_shape_vec((rows.len(), num_cols), cells)
            .map_err(|e| StrandsError::malformed_board(e.to_string()))?;
        Ok(Self { letters })
    }

    /// Builds a board from whitespace-separated rows, e.g. `["c s m", "o f o"]`.
    /// Letters are lowercased first.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Result<Self> {
        let rows = lines
            .iter()
            .map(|line| {
                line.as_ref()
                    .split_whitespace()
                    .map(|cell| cell.to_lowercase())
                    .collect::<Vec<_>>()
            })
            .collect::<Vec<_>>();
        Self::new(&rows)
    }

    /// Reads a board stored as a JSON array of rows of strings
    pub fn from_json(data: &str) -> Result<Self> {
        let raw_board: Vec<Vec<String>> = serde_json::from_str(data)?;
        Self::new(&raw_board)
    }

    pub fn num_rows(&self) -> usize {
        self.letters.nrows()
    }

    pub fn num_cols(&self) -> usize {
        self.letters.ncols()
    }

    pub fn num_cells(&self) -> usize {
        self.letters.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.as_index(self.num_rows(), self.num_cols()).is_some()
    }

    /// Cell index of `pos` in row-major order
    pub fn index_of(&self, pos: Position) -> Result<usize> {
        pos.as_index(self.num_rows(), self.num_cols())
            .ok_or(StrandsError::OutOfBounds {
                pos,
                rows: self.num_rows(),
                cols: self.num_cols(),
            })
    }

    pub fn get_letter(&self, pos: Position) -> Result<char> {
        self.index_of(pos)?;
        Ok(self.letters[[pos.row as usize, pos.col as usize]])
    }

    /// The word spelled by the strand
    pub fn evaluate(&self, strand: &Strand) -> Result<String> {
        strand.iter().map(|p| self.get_letter(p)).collect()
    }

    /// In-bounds neighbours of `pos`, in `Step::ALL` order
    pub fn neighbours(&self, pos: Position) -> impl Iterator<Item = (Step, Position)> + '_ {
        Step::iter()
            .map(move |&step| (step, pos.take_step(step)))
            .filter(move |&(_, p)| self.contains(p))
    }

    /// All cells in row-major order
    pub fn positions(&self) -> impl Iterator<Item = Position> {
        let cols = self.num_cols();
        (0..self.num_cells()).map(move |i| Position::from_index(i, cols))
    }

    pub fn rows(&self) -> Vec<String> {
        self.letters
            .rows()
            .into_iter()
            .map(|row| row.iter().collect())
            .collect()
    }
}

impl std::ops::Index<Position> for Board {
    type Output = char;

    /// Panics when `index` is off the board; use [`Board::get_letter`] for a checked lookup.
    fn index(&self, index: Position) -> &Self::Output {
        &self.letters[[index.row as usize, index.col as usize]]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cs142() -> Board {
        Board::from_lines(&["c s m c t", "o f o r y", "n e o w t"]).unwrap()
    }

    #[test]
    fn test_evaluate() {
        let board = cs142();
        assert_eq!(board.num_rows(), 3);
        assert_eq!(board.num_cols(), 5);
        let s = Strand::new(Position::new(0, 3), vec![]);
        assert_eq!(board.evaluate(&s).unwrap(), "c");
        let forty = Strand::new(
            Position::new(1, 1),
            vec![Step::E, Step::E, Step::NE, Step::S],
        );
        assert_eq!(board.evaluate(&forty).unwrap(), "forty");
    }

    #[test]
    fn test_out_of_bounds() {
        let board = cs142();
        let s = Strand::new(Position::new(0, 0), vec![Step::N]);
        assert!(matches!(
            board.evaluate(&s),
            Err(StrandsError::OutOfBounds { rows: 3, cols: 5, .. })
        ));
        assert!(board.get_letter(Position::new(3, 0)).is_err());
        assert!(board.get_letter(Position::new(0, 5)).is_err());
        assert_eq!(board.get_letter(Position::new(2, 4)).unwrap(), 't');
    }

    #[test]
    fn test_malformed() {
        let ragged = vec![vec!["a", "b"], vec!["c"]];
        assert!(matches!(
            Board::new(&ragged),
            Err(StrandsError::MalformedBoard { .. })
        ));
        let empty: Vec<Vec<&str>> = vec![];
        assert!(Board::new(&empty).is_err());
        assert!(Board::new(&[Vec::<&str>::new()]).is_err());
        assert!(Board::new(&[vec!["A"]]).is_err());
        assert!(Board::new(&[vec!["ab"]]).is_err());
        assert!(Board::new(&[vec!["1"]]).is_err());
        assert!(Board::new(&[vec![""]]).is_err());
    }

    #[test]
    fn test_from_json() {
        let board = Board::from_json(r#"[["a","b"],["c","d"]]"#).unwrap();
        assert_eq!(board.rows(), vec!["ab".to_string(), "cd".to_string()]);
        assert!(Board::from_json(r#"[["a","b"],["c"]]"#).is_err());
    }

    #[test]
    fn test_neighbours() {
        let board = cs142();
        let corner = board.neighbours(Position::new(0, 0)).collect::<Vec<_>>();
        assert_eq!(corner.len(), 3);
        assert_eq!(board.neighbours(Position::new(1, 1)).count(), 8);
    }
}
