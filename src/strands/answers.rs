use std::collections::BTreeMap;

use log::{debug, info};
use serde::Serialize;

use super::board::Board;
use super::budget::{BudgetTracker, SearchBudget, SearchStatus};
use super::dictionary::{normalize, Trie};
use super::exact_cover::ExactCover;
use super::strand::Strand;
use super::util::{Position, Step};
use super::word_search::{WordFinder, WordPaths};

/// Where a known answer lies on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerPath {
    pub start: Position,
    /// Every cell as `(row, col)`, start first
    pub positions: Vec<(isize, isize)>,
    pub steps: Vec<Step>,
}

impl From<&Strand> for AnswerPath {
    fn from(strand: &Strand) -> Self {
        Self {
            start: strand.start,
            positions: strand.cells(),
            steps: strand.steps.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnswerSolution {
    /// word -> path, for every target found on the board
    pub paths: BTreeMap<String, AnswerPath>,
    /// Targets that cannot be traced on the board at all. After an
    /// interrupted search this may also hold words it never reached.
    pub missing: Vec<String>,
    /// The paths tile the board exactly
    pub exact: bool,
    pub status: SearchStatus,
}

/// Locates a list of known answers on the board.
///
/// Only the target words are searched for. When the targets fill the board
/// exactly, the paths are chosen so that together they tile it; otherwise each
/// word takes the first path the enumerator finds.
///
/// Collecting every path of every target and tiling with them share one
/// `budget`. When it runs out each word found so far keeps its first path and
/// the solution is marked incomplete.
pub fn solve_answers<S: AsRef<str>>(
    board: &Board,
    targets: &[S],
    budget: &SearchBudget,
) -> AnswerSolution {
    let mut missing = Vec::new();
    let mut words: Vec<String> = Vec::new();
    for target in targets {
        match normalize(target.as_ref()) {
            Some(w) if !words.contains(&w) => words.push(w),
            Some(_) => {}
            None => missing.push(target.as_ref().to_string()),
        }
    }

    let tracker = budget.start();
    let trie = Trie::from_words(&words);
    let found = WordFinder::new(board, &trie, 1).find_all_paths(&tracker);
    let by_word = found
        .iter()
        .map(|w| (w.word.as_str(), w))
        .collect::<BTreeMap<_, _>>();

    let mut located = Vec::new();
    for w in &words {
        match by_word.get(w.as_str()) {
            Some(&paths) => located.push(paths),
            None => missing.push(w.clone()),
        }
    }

    let total_len = words.iter().map(|w| w.chars().count()).sum::<usize>();
    let tiling = if missing.is_empty() && total_len == board.num_cells() {
        tile_answers(board, &located, &tracker)
    } else {
        None
    };

    let exact = tiling.is_some();
    let paths = match tiling {
        Some(chosen) => chosen
            .into_iter()
            .map(|(word, strand)| (word.to_string(), AnswerPath::from(strand)))
            .collect(),
        None => located
            .iter()
            .map(|w| (w.word.clone(), AnswerPath::from(&w.strands[0])))
            .collect(),
    };

    let status = tracker.status();
    info!(
        "located {} of {} answers{}{}",
        located.len(),
        located.len() + missing.len(),
        if exact { " (exact tiling)" } else { "" },
        if tracker.is_exhausted() { ", search incomplete" } else { "" }
    );
    AnswerSolution {
        paths,
        missing,
        exact,
        status,
    }
}

/// Picks one strand per word so that the strands partition the board. Columns
/// are the board cells followed by one column per word, so each word is used
/// exactly once.
fn tile_answers<'a>(
    board: &Board,
    located: &[&'a WordPaths],
    tracker: &BudgetTracker,
) -> Option<Vec<(&'a str, &'a Strand)>> {
    let num_cells = board.num_cells();
    let mut problem = ExactCover::new(num_cells + located.len());
    let mut options = Vec::new();

    for (w, &paths) in located.iter().enumerate() {
        for strand in paths.strands.iter().filter(|s| !s.is_folded()) {
            let mut columns = strand
                .iter()
                .filter_map(|p| p.as_index(board.num_rows(), board.num_cols()))
                .collect::<Vec<_>>();
            columns.push(num_cells + w);
            problem.add_row(&columns);
            options.push((paths.word.as_str(), strand));
        }
    }
    debug!(
        "tiling {} answers with {} candidate strands",
        located.len(),
        options.len()
    );

    let rows = problem.solve_within(tracker, Some(1)).into_iter().next()?;
    Some(rows.into_iter().map(|r| options[r]).collect())
}
