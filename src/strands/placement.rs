use std::collections::{BTreeMap, BTreeSet};

use log::{debug, info, trace};
use rayon::prelude::*;
use serde::Serialize;

use super::budget::{BudgetTracker, SearchBudget, SearchOutcome};
use super::mask::CellMask;
use super::ranking::Candidate;
use super::strand::Strand;
use super::word_search::FoundWord;
use crate::config::SolverConfig;

/// A set of non-overlapping words laid out on the board together.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Placement {
    pub words: Vec<FoundWord>,
    /// Number of cells covered
    pub covered: usize,
    /// Every cell of the board is covered
    pub full: bool,
}

impl Placement {
    pub(crate) fn from_indices(candidates: &[Candidate], indices: &[usize], mask: &CellMask) -> Self {
        let words = indices
            .iter()
            .map(|&i| FoundWord {
                word: candidates[i].word.clone(),
                strand: candidates[i].strand.clone(),
            })
            .collect();
        Self {
            words,
            covered: mask.count(),
            full: mask.is_full(),
        }
    }

    /// word -> strand
    pub fn to_map(&self) -> BTreeMap<String, Strand> {
        self.words
            .iter()
            .map(|f| (f.word.clone(), f.strand.clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }
}

/// Searches for board layouts built from ranked candidate words.
///
/// The first phase branches over the `top_k` best candidates and records every
/// maximal set of non-overlapping strands that holds more than
/// `placement_threshold` words. The second phase greedily pours the whole
/// candidate list into each of those sets.
pub struct PlacementSearch<'a> {
    candidates: &'a [Candidate],
    rows: usize,
    cols: usize,
    config: &'a SolverConfig,
}

impl<'a> PlacementSearch<'a> {
    pub fn new(candidates: &'a [Candidate], rows: usize, cols: usize, config: &'a SolverConfig) -> Self {
        Self {
            candidates,
            rows,
            cols,
            config,
        }
    }

    /// Runs both phases
    pub fn run(&self, budget: &SearchBudget) -> SearchOutcome<Vec<Placement>> {
        let tracker = budget.start();
        let top = self.search_top_k(&tracker);
        let placements = self.greedy_complete(&top);
        info!(
            "placement search: {} layouts from top {}, {} kept after completion ({} full)",
            top.len(),
            self.top_len(),
            placements.len(),
            placements.iter().filter(|p| p.full).count()
        );
        SearchOutcome::new(placements, tracker.status())
    }

    fn top_len(&self) -> usize {
        self.config.top_k.min(self.candidates.len())
    }

    /// Maximal non-overlapping sets of the top candidates, each as sorted
    /// candidate indices. Sets are visited in ascending index order only, so
    /// every set is reached once instead of once per ordering.
    pub fn search_top_k(&self, tracker: &BudgetTracker) -> Vec<Vec<usize>> {
        let top = &self.candidates[..self.top_len()];

        let per_first = (0..top.len())
            .into_par_iter()
            .map(|first| {
                let mut found = Vec::new();
                let mut placed = vec![first];
                self.extend(top, top[first].mask.clone(), &mut placed, &mut found, tracker);
                found
            })
            .collect::<Vec<_>>();

        let layouts = per_first.into_iter().flatten().collect::<BTreeSet<_>>();
        debug!("top-k phase: {} distinct layouts", layouts.len());
        layouts.into_iter().collect()
    }

    fn extend(
        &self,
        top: &[Candidate],
        mask: CellMask,
        placed: &mut Vec<usize>,
        found: &mut Vec<Vec<usize>>,
        tracker: &BudgetTracker,
    ) {
        if !tracker.tick() {
            return;
        }

        let last = placed.last().copied().unwrap_or(0);
        for next in (last + 1)..top.len() {
            if !top[next].mask.is_disjoint(&mask) {
                continue;
            }
            // Each branch gets its own copy of the mask
            let mut branch = mask.clone();
            branch.union_with(&top[next].mask);
            placed.push(next);
            self.extend(top, branch, placed, found, tracker);
            placed.pop();
        }

        // Lower-indexed candidates count too, otherwise a non-maximal set would be recorded
        let boundary = !top.iter().any(|c| c.mask.is_disjoint(&mask));
        if boundary && placed.len() > self.config.placement_threshold {
            trace!("layout {:?} covers {} cells", placed, mask.count());
            found.push(placed.clone());
        }
    }

    /// Extends each layout with any candidate from the full list that still fits,
    /// first fit wins. A result is kept if it fills the board or holds more than
    /// `greedy_min_words` words.
    pub fn greedy_complete(&self, layouts: &[Vec<usize>]) -> Vec<Placement> {
        let mut seen = BTreeSet::new();
        let mut placements = Vec::new();

        for layout in layouts {
            let mut mask = CellMask::empty(self.rows, self.cols);
            for &i in layout {
                mask.union_with(&self.candidates[i].mask);
            }
            let mut indices = layout.clone();
            for (i, candidate) in self.candidates.iter().enumerate() {
                if candidate.mask.is_disjoint(&mask) {
                    mask.union_with(&candidate.mask);
                    indices.push(i);
                }
            }

            if !(mask.is_full() || indices.len() > self.config.greedy_min_words) {
                continue;
            }
            let mut key = indices.clone();
            key.sort_unstable();
            if seen.insert(key) {
                placements.push(Placement::from_indices(self.candidates, &indices, &mask));
            }
        }
        placements
    }
}
