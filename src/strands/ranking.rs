use std::cmp::Ordering;

use log::debug;
use serde::Serialize;

use super::dictionary::FrequencyTable;
use super::mask::CellMask;
use super::strand::Strand;
use super::word_search::FoundWords;
use crate::config::SolverConfig;

/// Pluggable relevance score for a word, e.g. closeness to the puzzle theme.
/// Higher is better.
pub trait WordScorer: Sync {
    fn score(&self, word: &str) -> f64;
}

/// Scores every word the same, leaving ranking to length and discovery order
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopScorer;

impl WordScorer for NoopScorer {
    fn score(&self, _word: &str) -> f64 {
        0.0
    }
}

impl<F> WordScorer for F
where
    F: Fn(&str) -> f64 + Sync,
{
    fn score(&self, word: &str) -> f64 {
        self(word)
    }
}

/// A found word that survived filtering, with its cell mask precomputed for
/// the placement searches.
#[derive(Debug, Clone, Serialize)]
pub struct Candidate {
    pub word: String,
    pub strand: Strand,
    pub score: f64,
    #[serde(skip)]
    pub mask: CellMask,
    /// Position in the enumerator's discovery order
    pub order: usize,
}

impl Candidate {
    pub fn len(&self) -> usize {
        self.strand.len()
    }

    pub fn is_empty(&self) -> bool {
        false
    }
}

/// Filters the raw word list and sorts it longest first.
///
/// A word is kept when it is at most `max_word_len` letters, passes the frequency
/// table (if one is given), and its strand is neither cyclic nor folded. Ties on
/// length are broken by score, then by discovery order.
pub fn rank_candidates(
    found: &FoundWords,
    rows: usize,
    cols: usize,
    frequencies: Option<&FrequencyTable>,
    scorer: &dyn WordScorer,
    config: &SolverConfig,
) -> Vec<Candidate> {
    let mut dropped = 0;
    let mut candidates = found
        .iter()
        .enumerate()
        .filter_map(|(order, f)| {
            let keep = f.word.chars().count() <= config.max_word_len
                && frequencies.map_or(true, |t| t.passes(&f.word, config.min_frequency))
                && !f.strand.is_cyclic()
                && !f.strand.is_folded();
            if !keep {
                dropped += 1;
                return None;
            }
            let mask = CellMask::from_strand(&f.strand, rows, cols)?;
            Some(Candidate {
                word: f.word.clone(),
                strand: f.strand.clone(),
                score: scorer.score(&f.word),
                mask,
                order,
            })
        })
        .collect::<Vec<_>>();

    candidates.sort_by(|a, b| {
        b.len()
            .cmp(&a.len())
            .then_with(|| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal))
            .then_with(|| a.order.cmp(&b.order))
    });

    debug!(
        "ranked {} candidates ({} filtered out)",
        candidates.len(),
        dropped
    );
    candidates
}
