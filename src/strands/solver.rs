use log::info;

use super::answers::{solve_answers, AnswerSolution};
use super::board::Board;
use super::budget::{SearchBudget, SearchOutcome};
use super::dictionary::{FrequencyTable, Lexicon, Trie};
use super::exact_cover::tile_board;
use super::placement::{Placement, PlacementSearch};
use super::ranking::{rank_candidates, Candidate, NoopScorer, WordScorer};
use super::word_search::{FoundWords, WordFinder};
use crate::config::SolverConfig;

/// Everything needed to analyse one board: the board, the dictionary index,
/// the optional ranking inputs and the policy knobs.
pub struct Solver<'a> {
    board: &'a Board,
    trie: Trie,
    frequencies: Option<&'a FrequencyTable>,
    scorer: Box<dyn WordScorer + 'a>,
    config: SolverConfig,
}

impl<'a> Solver<'a> {
    pub fn new(board: &'a Board, lexicon: &Lexicon, config: SolverConfig) -> Self {
        Self::with_trie(board, lexicon.to_trie(), config)
    }

    pub fn with_trie(board: &'a Board, trie: Trie, config: SolverConfig) -> Self {
        Self {
            board,
            trie,
            frequencies: None,
            scorer: Box::new(NoopScorer),
            config,
        }
    }

    pub fn with_frequencies(mut self, frequencies: &'a FrequencyTable) -> Self {
        self.frequencies = Some(frequencies);
        self
    }

    pub fn with_scorer(mut self, scorer: impl WordScorer + 'a) -> Self {
        self.scorer = Box::new(scorer);
        self
    }

    pub fn board(&self) -> &Board {
        self.board
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Every dictionary word on the board with the first strand found for it
    pub fn all_words(&self) -> FoundWords {
        WordFinder::new(self.board, &self.trie, self.config.min_word_len).find_all()
    }

    pub fn ranked_candidates(&self) -> Vec<Candidate> {
        let found = self.all_words();
        rank_candidates(
            &found,
            self.board.num_rows(),
            self.board.num_cols(),
            self.frequencies,
            self.scorer.as_ref(),
            &self.config,
        )
    }

    /// Near-full layouts from the top-k search followed by greedy completion
    pub fn placements(&self, budget: &SearchBudget) -> SearchOutcome<Vec<Placement>> {
        let candidates = self.ranked_candidates();
        PlacementSearch::new(
            &candidates,
            self.board.num_rows(),
            self.board.num_cols(),
            &self.config,
        )
        .run(budget)
    }

    /// Every exact tiling of the board by ranked candidates
    pub fn exact_tilings(&self, budget: &SearchBudget) -> SearchOutcome<Vec<Placement>> {
        let candidates = self.ranked_candidates();
        let outcome = tile_board(
            &candidates,
            self.board.num_rows(),
            self.board.num_cols(),
            budget,
        );
        info!(
            "{} exact tilings from {} candidates",
            outcome.results.len(),
            candidates.len()
        );
        outcome
    }

    /// Locates known answers. Ignores the dictionary entirely.
    pub fn answer_paths<S: AsRef<str>>(
        &self,
        targets: &[S],
        budget: &SearchBudget,
    ) -> AnswerSolution {
        solve_answers(self.board, targets, budget)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::strands::budget::SearchStatus;

    fn cs142() -> Board {
        Board::from_lines(&["c s m c t", "o f o r y", "n e o w t"]).unwrap()
    }

    fn lexicon() -> Lexicon {
        Lexicon::new(["cmsc", "one", "forty", "two", "fort", "trow", "roof", "wort", "snow"]).unwrap()
    }

    fn config() -> SolverConfig {
        SolverConfig {
            min_word_len: 3,
            ..SolverConfig::default()
        }
    }

    #[test]
    fn test_all_words() {
        let board = cs142();
        let solver = Solver::new(&board, &lexicon(), config());
        let words = solver.all_words();
        for w in ["cmsc", "one", "forty", "two", "fort", "trow", "roof", "wort"] {
            assert!(words.contains(w), "{} not found", w);
        }
        assert!(!words.contains("snow"));
        assert_eq!(solver.all_words().to_map(), words.to_map());
    }

    #[test]
    fn test_exact_tilings() {
        let board = cs142();
        let solver = Solver::new(&board, &lexicon(), config());
        let outcome = solver.exact_tilings(&SearchBudget::unlimited());
        assert!(outcome.is_complete());
        assert!(!outcome.results.is_empty());
        for tiling in &outcome.results {
            assert!(tiling.full);
            assert_eq!(tiling.covered, 15);
        }
        let answers = ["cmsc", "forty", "one", "two"]
            .iter()
            .map(|w| w.to_string())
            .collect::<BTreeSet<_>>();
        assert!(outcome
            .results
            .iter()
            .any(|t| t.to_map().keys().cloned().collect::<BTreeSet<_>>() == answers));
    }

    #[test]
    fn test_placements_respect_frequencies() {
        let board = cs142();
        let table: FrequencyTable = [("cmsc", 900u64), ("forty", 900), ("one", 900), ("two", 900)]
            .into_iter()
            .collect();
        let config = SolverConfig {
            placement_threshold: 0,
            greedy_min_words: 0,
            ..config()
        };
        let solver = Solver::new(&board, &lexicon(), config).with_frequencies(&table);
        let ranked = solver.ranked_candidates();
        assert_eq!(ranked.len(), 4);
        assert_eq!(ranked[0].word, "forty");

        let outcome = solver.placements(&SearchBudget::unlimited());
        assert!(outcome.is_complete());
        assert!(outcome.results.iter().any(|p| p.full && p.len() == 4));
    }

    #[test]
    fn test_scorer() {
        let board = cs142();
        let solver =
            Solver::new(&board, &lexicon(), config()).with_scorer(|w: &str| if w == "wort" { 5.0 } else { 0.0 });
        let ranked = solver.ranked_candidates();
        let four = ranked.iter().find(|c| c.len() == 4).unwrap();
        assert_eq!(four.word, "wort");
    }

    #[test]
    fn test_answer_paths() {
        let board = cs142();
        let solver = Solver::new(&board, &lexicon(), config());
        let solution = solver.answer_paths(&["cmsc", "one", "forty", "two"], &SearchBudget::unlimited());
        assert!(solution.exact);
        assert!(solution.status == SearchStatus::Complete);
        assert_eq!(solution.paths.len(), 4);
    }
}
