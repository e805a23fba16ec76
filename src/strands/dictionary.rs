use std::collections::{BTreeSet, HashMap};

use fst::{Set, SetBuilder, Streamer};
use log::debug;

use crate::error::Result;

/// Prefix tree node
#[derive(Debug, Default, Clone)]
pub struct TrieNode {
    next: HashMap<char, TrieNode>,
    terminal: bool,
}

impl TrieNode {
    pub fn next_node(&self, c: char) -> Option<&TrieNode> {
        self.next.get(&c)
    }

    /// True when the path from the root to this node spells a word
    pub fn is_terminal(&self) -> bool {
        self.terminal
    }

    pub fn is_leaf(&self) -> bool {
        self.next.is_empty()
    }
}

/// Prefix tree over a word list, walked one letter at a time by the board search.
#[derive(Debug, Default, Clone)]
pub struct Trie {
    root: TrieNode,
    num_words: usize,
}

impl Trie {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut trie = Self::new();
        for w in words {
            trie.insert(w.as_ref());
        }
        trie
    }

    /// Adds a word to the trie. Inserting a word twice has no further effect.
    pub fn insert(&mut self, word: &str) {
        if word.is_empty() {
            return;
        }
        let mut node = &mut self.root;
        for c in word.chars() {
            node = node.next.entry(c).or_default();
        }
        if !node.terminal {
            node.terminal = true;
            self.num_words += 1;
        }
    }

    pub fn root(&self) -> &TrieNode {
        &self.root
    }

    /// Node reached by spelling `prefix` from the root
    pub fn find(&self, prefix: &str) -> Option<&TrieNode> {
        prefix
            .chars()
            .try_fold(&self.root, |node, c| node.next_node(c))
    }

    pub fn contains(&self, word: &str) -> bool {
        self.find(word).map_or(false, TrieNode::is_terminal)
    }

    pub fn contains_prefix(&self, prefix: &str) -> bool {
        self.find(prefix).is_some()
    }

    pub fn len(&self) -> usize {
        self.num_words
    }

    pub fn is_empty(&self) -> bool {
        self.num_words == 0
    }
}

/// Normalizes a raw dictionary line. Returns `None` for entries that can never
/// appear on a board (empty, or containing anything but letters).
pub(crate) fn normalize(word: &str) -> Option<String> {
    let word = word.trim().to_lowercase();
    if word.is_empty() || !word.chars().all(char::is_alphabetic) {
        return None;
    }
    Some(word)
}

/// The full word list, stored as a finite state transducer for cheap membership tests.
pub struct Lexicon {
    words: Set<Vec<u8>>,
}

impl Lexicon {
    pub fn new<I, S>(words: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        // fst needs its keys sorted and unique
        let sorted = words
            .into_iter()
            .filter_map(|w| normalize(w.as_ref()))
            .collect::<BTreeSet<_>>();

        let mut build = SetBuilder::memory();
        build.extend_iter(sorted)?;
        let words = build.into_set();
        debug!("built lexicon with {} words", words.len());
        Ok(Self { words })
    }

    /// One word per line, as in the usual `words` files
    pub fn parse(text: &str) -> Result<Self> {
        Self::new(text.lines())
    }

    pub fn contains(&self, word: &str) -> bool {
        self.words.contains(word)
    }

    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All words in lexicographic order
    pub fn words(&self) -> Vec<String> {
        let mut stream = self.words.stream();
        let mut words = Vec::with_capacity(self.len());
        while let Some(w) = stream.next() {
            // Keys were built from `String`s
            words.push(String::from_utf8_lossy(w).into_owned());
        }
        words
    }

    pub fn to_trie(&self) -> Trie {
        let mut trie = Trie::new();
        let mut stream = self.words.stream();
        while let Some(w) = stream.next() {
            trie.insert(&String::from_utf8_lossy(w));
        }
        trie
    }
}

/// Popularity counts used to drop obscure words from the candidate list.
#[derive(Debug, Default, Clone)]
pub struct FrequencyTable {
    counts: HashMap<String, u64>,
}

impl FrequencyTable {
    /// Reads `word count` lines. Blank and malformed lines are skipped.
    pub fn parse(text: &str) -> Self {
        let mut counts = HashMap::new();
        let mut skipped = 0;
        for line in text.lines() {
            let mut parts = line.split_whitespace();
            match (parts.next(), parts.next().map(str::parse::<u64>)) {
                (Some(word), Some(Ok(count))) => {
                    if let Some(word) = normalize(word) {
                        counts.insert(word, count);
                    }
                }
                (None, _) => {}
                _ => skipped += 1,
            }
        }
        if skipped > 0 {
            debug!("frequency table: skipped {} malformed lines", skipped);
        }
        Self { counts }
    }

    pub fn insert(&mut self, word: &str, count: u64) {
        if let Some(word) = normalize(word) {
            self.counts.insert(word, count);
        }
    }

    pub fn count(&self, word: &str) -> Option<u64> {
        self.counts.get(word).copied()
    }

    /// Present in the table with a count strictly above `threshold`
    pub fn passes(&self, word: &str, threshold: u64) -> bool {
        self.count(word).map_or(false, |c| c > threshold)
    }

    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

impl<S: AsRef<str>> FromIterator<(S, u64)> for FrequencyTable {
    fn from_iter<T: IntoIterator<Item = (S, u64)>>(iter: T) -> Self {
        let mut table = Self::default();
        for (word, count) in iter {
            table.insert(word.as_ref(), count);
        }
        table
    }
}
