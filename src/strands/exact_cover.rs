//! Knuth's Algorithm X with dancing links, used to find candidate sets that tile
//! the board exactly.
//!
//! The links live in flat vectors indexed by node number rather than in
//! pointer-linked nodes. Node 0 is the root, nodes `1..=num_columns` are the column
//! headers, and every later node is one (row, column) incidence.

use log::{debug, trace};

use super::budget::{BudgetTracker, SearchBudget, SearchOutcome};
use super::mask::CellMask;
use super::placement::Placement;
use super::ranking::Candidate;

const ROOT: usize = 0;
const NO_ROW: usize = usize::MAX;

/// An exact cover instance: choose rows so that every column is covered exactly once.
#[derive(Debug, Clone)]
pub struct ExactCover {
    left: Vec<usize>,
    right: Vec<usize>,
    up: Vec<usize>,
    down: Vec<usize>,
    /// Column header of each node
    column: Vec<usize>,
    /// Row id of each node (`NO_ROW` for the root and headers)
    row: Vec<usize>,
    /// Live nodes per column, indexed by header node
    size: Vec<usize>,
    num_columns: usize,
    num_rows: usize,
}

impl ExactCover {
    pub fn new(num_columns: usize) -> Self {
        let n = num_columns + 1;
        let mut links = Self {
            left: Vec::with_capacity(n),
            right: Vec::with_capacity(n),
            up: Vec::with_capacity(n),
            down: Vec::with_capacity(n),
            column: Vec::with_capacity(n),
            row: Vec::with_capacity(n),
            size: vec![0; n],
            num_columns,
            num_rows: 0,
        };
        // Root and headers form one horizontal ring; each header starts as an empty vertical ring
        for i in 0..n {
            links.left.push(if i == 0 { n - 1 } else { i - 1 });
            links.right.push(if i == n - 1 { 0 } else { i + 1 });
            links.up.push(i);
            links.down.push(i);
            links.column.push(i);
            links.row.push(NO_ROW);
        }
        links
    }

    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Adds a row covering the given zero-based columns and returns its id.
    /// Duplicate columns are ignored; a row with no columns can never be chosen.
    ///
    /// # Panics
    ///
    /// Panics if a column is out of range.
    pub fn add_row(&mut self, columns: &[usize]) -> usize {
        let id = self.num_rows;
        self.num_rows += 1;

        let mut columns = columns.to_vec();
        columns.sort_unstable();
        columns.dedup();

        let mut first: Option<usize> = None;
        for c in columns {
            assert!(c < self.num_columns, "column {} out of range", c);
            let header = c + 1;
            let node = self.left.len();

            // Vertical: insert just above the header, i.e. at the bottom of the column
            let above = self.up[header];
            self.up.push(above);
            self.down.push(header);
            self.down[above] = node;
            self.up[header] = node;

            // Horizontal: insert at the end of this row's ring
            match first {
                None => {
                    self.left.push(node);
                    self.right.push(node);
                    first = Some(node);
                }
                Some(f) => {
                    let last = self.left[f];
                    self.left.push(last);
                    self.right.push(f);
                    self.right[last] = node;
                    self.left[f] = node;
                }
            }

            self.column.push(header);
            self.row.push(id);
            self.size[header] += 1;
        }
        id
    }

    fn cover(&mut self, c: usize) {
        let (l, r) = (self.left[c], self.right[c]);
        self.right[l] = r;
        self.left[r] = l;

        let mut i = self.down[c];
        while i != c {
            let mut j = self.right[i];
            while j != i {
                let (u, d) = (self.up[j], self.down[j]);
                self.down[u] = d;
                self.up[d] = u;
                self.size[self.column[j]] -= 1;
                j = self.right[j];
            }
            i = self.down[i];
        }
    }

    fn uncover(&mut self, c: usize) {
        let mut i = self.up[c];
        while i != c {
            let mut j = self.left[i];
            while j != i {
                self.size[self.column[j]] += 1;
                let (u, d) = (self.up[j], self.down[j]);
                self.down[u] = j;
                self.up[d] = j;
                j = self.left[j];
            }
            i = self.up[i];
        }

        let (l, r) = (self.left[c], self.right[c]);
        self.right[l] = c;
        self.left[r] = c;
    }

    /// Live column with the fewest rows; the leftmost one wins ties
    fn choose_column(&self) -> usize {
        let mut best = self.right[ROOT];
        let mut c = self.right[best];
        while c != ROOT {
            if self.size[c] < self.size[best] {
                best = c;
            }
            c = self.right[c];
        }
        best
    }

    /// Enumerates exact covers as sorted lists of row ids, stopping after
    /// `max_solutions` when given. The matrix is restored before returning.
    pub fn solve(
        &mut self,
        budget: &SearchBudget,
        max_solutions: Option<usize>,
    ) -> SearchOutcome<Vec<Vec<usize>>> {
        let tracker = budget.start();
        let solutions = self.solve_within(&tracker, max_solutions);
        SearchOutcome::new(solutions, tracker.status())
    }

    /// Same as [`ExactCover::solve`] but draws on a budget that is already
    /// running. Check the tracker's status to tell a finished search from an
    /// interrupted one.
    pub fn solve_within(
        &mut self,
        tracker: &BudgetTracker,
        max_solutions: Option<usize>,
    ) -> Vec<Vec<usize>> {
        let mut solutions = Vec::new();
        let mut partial = Vec::new();
        if self.num_columns > 0 {
            self.search(&mut partial, &mut solutions, max_solutions, tracker);
        }
        debug!(
            "exact cover: {} solutions over {} columns, {} rows ({} steps)",
            solutions.len(),
            self.num_columns,
            self.num_rows,
            tracker.steps()
        );
        solutions
    }

    /// Returns `false` when the search should stop altogether
    fn search(
        &mut self,
        partial: &mut Vec<usize>,
        solutions: &mut Vec<Vec<usize>>,
        max_solutions: Option<usize>,
        tracker: &BudgetTracker,
    ) -> bool {
        if !tracker.tick() {
            return false;
        }
        if self.right[ROOT] == ROOT {
            let mut solution = partial.clone();
            solution.sort_unstable();
            trace!("exact cover found: {:?}", solution);
            solutions.push(solution);
            return max_solutions.map_or(true, |max| solutions.len() < max);
        }

        let c = self.choose_column();
        if self.size[c] == 0 {
            return true;
        }

        self.cover(c);
        let mut keep_going = true;
        let mut r = self.down[c];
        while r != c {
            partial.push(self.row[r]);
            let mut j = self.right[r];
            while j != r {
                self.cover(self.column[j]);
                j = self.right[j];
            }

            keep_going = self.search(partial, solutions, max_solutions, tracker);

            let mut j = self.left[r];
            while j != r {
                self.uncover(self.column[j]);
                j = self.left[j];
            }
            partial.pop();

            if !keep_going {
                break;
            }
            r = self.down[r];
        }
        self.uncover(c);
        keep_going
    }
}

/// Every way to tile a `rows` x `cols` board exactly with the candidates' strands.
/// Candidates that leave the board are ignored. An empty result from a complete
/// search means no tiling exists.
pub fn tile_board(
    candidates: &[Candidate],
    rows: usize,
    cols: usize,
    budget: &SearchBudget,
) -> SearchOutcome<Vec<Placement>> {
    let mut problem = ExactCover::new(rows * cols);
    for candidate in candidates {
        let cells = candidate.mask.indices().collect::<Vec<_>>();
        problem.add_row(&cells);
    }

    let outcome = problem.solve(budget, None);
    outcome.map(|solutions| {
        solutions
            .iter()
            .map(|rows_chosen| {
                let mut mask = CellMask::empty(rows, cols);
                for &i in rows_chosen {
                    mask.union_with(&candidates[i].mask);
                }
                Placement::from_indices(candidates, rows_chosen, &mask)
            })
            .collect()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strands::strand::Strand;
    use crate::strands::util::{Position, Step};

    #[test]
    fn test_wikipedia_example() {
        // Universe 1..=7 mapped to 0..7
        let mut problem = ExactCover::new(7);
        problem.add_row(&[0, 3, 6]); // A
        problem.add_row(&[0, 3]); // B
        problem.add_row(&[3, 4, 6]); // C
        problem.add_row(&[2, 4, 5]); // D
        problem.add_row(&[1, 2, 5, 6]); // E
        problem.add_row(&[1, 6]); // F
        let outcome = problem.solve(&SearchBudget::unlimited(), None);
        assert!(outcome.is_complete());
        assert_eq!(outcome.results, vec![vec![1, 3, 5]]);

        // Solving again gives the same answer, so the links were restored
        let again = problem.solve(&SearchBudget::unlimited(), None);
        assert_eq!(again.results, outcome.results);
    }

    #[test]
    fn test_all_solutions_and_limit() {
        // Two ways to cover {0, 1}
        let mut problem = ExactCover::new(2);
        problem.add_row(&[0]);
        problem.add_row(&[1]);
        problem.add_row(&[0, 1]);
        let all = problem.solve(&SearchBudget::unlimited(), None);
        assert_eq!(all.results, vec![vec![0, 1], vec![2]]);

        let first = problem.solve(&SearchBudget::unlimited(), Some(1));
        assert_eq!(first.results.len(), 1);
        assert!(first.is_complete());
    }

    #[test]
    fn test_no_cover() {
        let mut problem = ExactCover::new(3);
        problem.add_row(&[0, 1]);
        problem.add_row(&[1, 2]);
        let outcome = problem.solve(&SearchBudget::unlimited(), None);
        assert!(outcome.is_complete());
        assert!(outcome.results.is_empty());
        assert!(outcome.require_solution().is_err());
    }

    #[test]
    fn test_budget() {
        let mut problem = ExactCover::new(12);
        for c in 0..12 {
            problem.add_row(&[c]);
            if c % 2 == 0 {
                problem.add_row(&[c, c + 1]);
            }
        }
        let outcome = problem.solve(&SearchBudget::unlimited().with_max_steps(5), None);
        assert!(!outcome.is_complete());
        let full = problem.solve(&SearchBudget::unlimited(), None);
        // Each of the six pairs is either split or joined
        assert_eq!(full.results.len(), 64);
    }

    fn candidate(word: &str, start: (isize, isize), steps: Vec<Step>, order: usize) -> Candidate {
        let strand = Strand::new(Position::new(start.0, start.1), steps);
        Candidate {
            word: word.to_string(),
            mask: CellMask::from_strand(&strand, 2, 2).unwrap(),
            strand,
            score: 0.0,
            order,
        }
    }

    #[test]
    fn test_tile_two_by_two() {
        let mut candidates = vec![
            candidate("ab", (0, 0), vec![Step::E], 0),
            candidate("cd", (1, 0), vec![Step::E], 1),
        ];
        let outcome = tile_board(&candidates, 2, 2, &SearchBudget::unlimited());
        assert_eq!(outcome.results.len(), 1);
        let words = outcome.results[0].to_map();
        assert!(words.contains_key("ab") && words.contains_key("cd"));
        assert!(outcome.results[0].full);

        // A diagonal overlapping both changes nothing
        candidates.push(candidate("ad", (0, 0), vec![Step::SE], 2));
        let outcome = tile_board(&candidates, 2, 2, &SearchBudget::unlimited());
        assert_eq!(outcome.results.len(), 1);
    }
}
