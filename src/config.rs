use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Policy knobs for the search pipeline and the game rules.
///
/// Every field has a default, so a JSON document only needs the values it
/// overrides, e.g. `{"top_k": 30}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Shortest word (in letters) the enumerator reports
    pub min_word_len: usize,
    /// Longest word kept by candidate ranking
    pub max_word_len: usize,
    /// A word must be in the frequency table with a count above this to be ranked
    pub min_frequency: u64,
    /// How many ranked candidates the placement search branches over
    pub top_k: usize,
    /// A placement is recorded only when it holds more words than this
    pub placement_threshold: usize,
    /// A greedily completed placement that does not fill the board is kept only
    /// when it holds more words than this
    pub greedy_min_words: usize,
    /// Shortest strand a player may submit
    pub min_guess_len: usize,
    /// Dictionary words needed to earn one hint level
    pub hint_threshold: usize,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            min_word_len: 4,
            max_word_len: 10,
            min_frequency: 200,
            top_k: 50,
            placement_threshold: 6,
            greedy_min_words: 6,
            min_guess_len: 4,
            hint_threshold: 3,
        }
    }
}

impl SolverConfig {
    pub fn from_json(data: &str) -> Result<Self> {
        Ok(serde_json::from_str(data)?)
    }
}
