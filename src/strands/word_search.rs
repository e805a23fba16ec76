use std::collections::{BTreeMap, HashMap, HashSet};

use log::debug;
use rayon::prelude::*;
use serde::Serialize;

use super::board::Board;
use super::budget::BudgetTracker;
use super::dictionary::{Trie, TrieNode};
use super::strand::Strand;
use super::util::{Position, Step};

/*
    Depth-first search over the board, walking the trie in lock-step so that a
    branch dies as soon as the letters so far stop being a prefix of some word.

    Each start cell is searched independently (and in parallel). A cell is only
    marked visited while it is on the current branch, so sibling branches and
    other start cells can use it again.
*/

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FoundWord {
    pub word: String,
    pub strand: Strand,
}

/// Dictionary words found on a board, one strand per word, in discovery order.
#[derive(Debug, Clone, Default)]
pub struct FoundWords {
    entries: Vec<FoundWord>,
    index: HashMap<String, usize>,
}

impl FoundWords {
    /// Keeps the first strand seen for each word
    fn push(&mut self, found: FoundWord) {
        if self.index.contains_key(&found.word) {
            return;
        }
        self.index.insert(found.word.clone(), self.entries.len());
        self.entries.push(found);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, word: &str) -> bool {
        self.index.contains_key(word)
    }

    pub fn get(&self, word: &str) -> Option<&Strand> {
        self.index.get(word).map(|&i| &self.entries[i].strand)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FoundWord> {
        self.entries.iter()
    }

    /// word -> (start, steps)
    pub fn to_map(&self) -> BTreeMap<String, (Position, Vec<Step>)> {
        self.entries
            .iter()
            .map(|f| (f.word.clone(), (f.strand.start, f.strand.steps.clone())))
            .collect()
    }
}

impl<'a> IntoIterator for &'a FoundWords {
    type Item = &'a FoundWord;
    type IntoIter = std::slice::Iter<'a, FoundWord>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Every strand spelling one word
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordPaths {
    pub word: String,
    pub strands: Vec<Strand>,
}

/// Finds every dictionary word that can be traced on a board.
pub struct WordFinder<'a> {
    board: &'a Board,
    trie: &'a Trie,
    /// Minimum length for anything to be considered a word
    min_length: usize,
}

impl<'a> WordFinder<'a> {
    pub fn new(board: &'a Board, trie: &'a Trie, min_length: usize) -> Self {
        Self {
            board,
            trie,
            min_length,
        }
    }

    /// One strand per distinct word. When a word can be traced in several ways
    /// the first one found wins, scanning start cells in row-major order.
    pub fn find_all(&self) -> FoundWords {
        let per_start = self.search_starts(false, None);
        let mut found = FoundWords::default();
        for hits in per_start {
            for hit in hits {
                found.push(hit);
            }
        }
        debug!(
            "found {} words on {}x{} board",
            found.len(),
            self.board.num_rows(),
            self.board.num_cols()
        );
        found
    }

    /// Every strand for every word, words in discovery order. There can be
    /// exponentially many, so each cell expanded costs one tick of `tracker`;
    /// once it runs out the strands collected so far are returned.
    pub fn find_all_paths(&self, tracker: &BudgetTracker) -> Vec<WordPaths> {
        let per_start = self.search_starts(true, Some(tracker));
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut all: Vec<WordPaths> = Vec::new();
        for hit in per_start.into_iter().flatten() {
            match index.get(&hit.word) {
                Some(&i) => all[i].strands.push(hit.strand),
                None => {
                    index.insert(hit.word.clone(), all.len());
                    all.push(WordPaths {
                        word: hit.word,
                        strands: vec![hit.strand],
                    });
                }
            }
        }
        debug!(
            "found {} words ({} strands)",
            all.len(),
            all.iter().map(|w| w.strands.len()).sum::<usize>()
        );
        all
    }

    /// Runs one search per start cell; the outer vector is in row-major start order
    fn search_starts(&self, all_paths: bool, tracker: Option<&BudgetTracker>) -> Vec<Vec<FoundWord>> {
        let starts = self.board.positions().collect::<Vec<_>>();
        starts
            .into_par_iter()
            .map(|start| {
                let mut search = StartSearch {
                    board: self.board,
                    min_length: self.min_length,
                    start,
                    visited: vec![false; self.board.num_cells()],
                    word: String::new(),
                    steps: Vec::new(),
                    all_paths,
                    tracker,
                    seen: HashSet::new(),
                    hits: Vec::new(),
                };
                if let Some(node) = self.trie.root().next_node(self.board[start]) {
                    search.visit(start, node);
                }
                search.hits
            })
            .collect()
    }
}

/// Branch-local state of the search from a single start cell
struct StartSearch<'a> {
    board: &'a Board,
    min_length: usize,
    start: Position,
    visited: Vec<bool>,
    word: String,
    steps: Vec<Step>,
    all_paths: bool,
    tracker: Option<&'a BudgetTracker>,
    seen: HashSet<String>,
    hits: Vec<FoundWord>,
}

impl<'a> StartSearch<'a> {
    /// `node` is the trie node reached after taking the letter at `pos`
    fn visit(&mut self, pos: Position, node: &TrieNode) {
        if self.tracker.map_or(false, |t| !t.tick()) {
            return;
        }
        let board = self.board;
        let idx = pos.as_index(board.num_rows(), board.num_cols());
        let idx = match idx {
            Some(i) => i,
            None => return,
        };

        self.visited[idx] = true;
        self.word.push(board[pos]);

        if node.is_terminal() && self.steps.len() + 1 >= self.min_length {
            self.record();
        }

        if !node.is_leaf() {
            for (step, next) in board.neighbours(pos) {
                let next_idx = (next.row as usize) * board.num_cols() + next.col as usize;
                if self.visited[next_idx] {
                    continue;
                }
                if let Some(child) = node.next_node(board[next]) {
                    self.steps.push(step);
                    self.visit(next, child);
                    self.steps.pop();
                }
            }
        }

        self.word.pop();
        self.visited[idx] = false;
    }

    fn record(&mut self) {
        if !self.all_paths && !self.seen.insert(self.word.clone()) {
            return;
        }
        self.hits.push(FoundWord {
            word: self.word.clone(),
            strand: Strand::new(self.start, self.steps.clone()),
        });
    }
}
