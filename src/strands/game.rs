use log::{debug, info};
use serde::Serialize;

use super::board::Board;
use super::dictionary::Lexicon;
use super::mask::CellMask;
use super::strand::Strand;
use super::util::{Position, Step};
use super::word_search::FoundWord;
use crate::config::SolverConfig;
use crate::error::{Result, StrandsError};

/// Answers must be at least this many letters
const MIN_ANSWER_LEN: usize = 3;

/// A puzzle: theme, board and the answers that tile it.
///
/// The text format is the theme on the first line, then the board one row per
/// line with letters separated by spaces, then one answer per line as
/// `word row col step...` with 1-based coordinates. Blank lines separate the
/// three sections.
///
/// ```text
/// CS 142
///
/// c s m c t
/// o f o r y
/// n e o w t
///
/// cmsc 1 4 w w w
/// one 2 1 s e
/// forty 2 2 e e ne s
/// two 3 5 w w
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Puzzle {
    pub theme: String,
    pub board: Board,
    pub answers: Vec<FoundWord>,
}

impl Puzzle {
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text
            .lines()
            .enumerate()
            .map(|(i, line)| (i + 1, line.trim()))
            .peekable();

        let theme = match lines.next() {
            Some((_, theme)) if !theme.is_empty() => theme.to_string(),
            _ => return Err(StrandsError::malformed_puzzle(1, "missing theme")),
        };

        while lines.next_if(|(_, l)| l.is_empty()).is_some() {}
        let mut rows = Vec::new();
        while let Some((_, line)) = lines.next_if(|(_, l)| !l.is_empty()) {
            rows.push(line);
        }
        let board = Board::from_lines(&rows)?;

        while lines.next_if(|(_, l)| l.is_empty()).is_some() {}
        let (num_rows, num_cols) = (board.num_rows(), board.num_cols());
        let mut answers = Vec::new();
        let mut covered = CellMask::empty(num_rows, num_cols);
        for (n, line) in lines.take_while(|(_, l)| !l.is_empty()) {
            let answer = Self::parse_answer(n, line, &board)?;
            let cells = CellMask::from_strand(&answer.strand, num_rows, num_cols)
                .ok_or_else(|| StrandsError::malformed_puzzle(n, "strand leaves the board"))?;
            if !covered.is_disjoint(&cells) {
                return Err(StrandsError::malformed_puzzle(
                    n,
                    format!("answer \"{}\" shares cells with an earlier answer", answer.word),
                ));
            }
            covered.union_with(&cells);
            answers.push(answer);
        }
        if answers.is_empty() {
            return Err(StrandsError::malformed_puzzle(rows.len() + 2, "no answers"));
        }

        let total = answers.iter().map(|a| a.strand.len()).sum::<usize>();
        if total != board.num_cells() {
            return Err(StrandsError::malformed_puzzle(
                text.lines().count(),
                format!(
                    "answers cover {} cells but the board has {}",
                    total,
                    board.num_cells()
                ),
            ));
        }

        debug!("parsed puzzle \"{}\" with {} answers", theme, answers.len());
        Ok(Self {
            theme,
            board,
            answers,
        })
    }

    fn parse_answer(n: usize, line: &str, board: &Board) -> Result<FoundWord> {
        let mut fields = line.split_whitespace();
        let word = fields.next().unwrap_or_default().to_lowercase();
        let mut coord = |name: &str| -> Result<isize> {
            let raw = fields
                .next()
                .ok_or_else(|| StrandsError::malformed_puzzle(n, format!("missing {}", name)))?;
            match raw.parse::<isize>() {
                Ok(v) if v >= 1 => Ok(v - 1),
                _ => Err(StrandsError::malformed_puzzle(
                    n,
                    format!("bad {} \"{}\"", name, raw),
                )),
            }
        };
        let start = Position::new(coord("row")?, coord("column")?);
        let steps = fields
            .map(|s| s.parse::<Step>())
            .collect::<Result<Vec<_>>>()
            .map_err(|e| StrandsError::malformed_puzzle(n, e.to_string()))?;
        let strand = Strand::new(start, steps);

        if word.chars().count() < MIN_ANSWER_LEN {
            return Err(StrandsError::malformed_puzzle(
                n,
                format!("answer \"{}\" is shorter than {} letters", word, MIN_ANSWER_LEN),
            ));
        }
        strand
            .validate()
            .map_err(|e| StrandsError::malformed_puzzle(n, e.to_string()))?;
        let spelled = board
            .evaluate(&strand)
            .map_err(|e| StrandsError::malformed_puzzle(n, e.to_string()))?;
        if spelled != word {
            return Err(StrandsError::malformed_puzzle(
                n,
                format!("strand spells \"{}\", not \"{}\"", spelled, word),
            ));
        }
        Ok(FoundWord { word, strand })
    }

    /// The answer that touches two opposite sides of the board, if any
    pub fn spangram(&self) -> Option<&FoundWord> {
        let (rows, cols) = (self.board.num_rows(), self.board.num_cols());
        self.answers
            .iter()
            .find(|a| a.strand.is_spangram(rows, cols))
    }
}

/// What happened to a submitted strand
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum GuessOutcome {
    /// A new theme answer
    ThemeWord(String),
    /// A new dictionary word; fills the hint meter
    DictionaryWord(String),
    AlreadyFound,
    TooShort,
    NotInDictionary,
    /// Part of the strand is off the board
    OffBoard,
    /// The strand crosses itself
    InvalidPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Hint {
    /// Index into the puzzle's answers
    pub answer_index: usize,
    /// `false`: only the letters are highlighted. `true`: their order too.
    pub show_path: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HintOutcome {
    Hint(Hint),
    /// The meter has not reached the threshold
    NoHintYet,
    /// The current hint is already fully revealed
    UseCurrentHint,
}

/// Play state of one puzzle.
pub struct StrandsGame<'a> {
    puzzle: Puzzle,
    lexicon: &'a Lexicon,
    min_guess_len: usize,
    hint_threshold: usize,
    /// Indices of found answers, in the order they were found
    found: Vec<usize>,
    dictionary_words: Vec<String>,
    hint_meter: usize,
    hint: Option<Hint>,
}

impl<'a> StrandsGame<'a> {
    pub fn new(puzzle: Puzzle, lexicon: &'a Lexicon, config: &SolverConfig) -> Self {
        Self {
            puzzle,
            lexicon,
            min_guess_len: config.min_guess_len,
            hint_threshold: config.hint_threshold,
            found: Vec::new(),
            dictionary_words: Vec::new(),
            hint_meter: 0,
            hint: None,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn submit_strand(&mut self, strand: &Strand) -> GuessOutcome {
        if strand.validate().is_err() {
            return GuessOutcome::InvalidPath;
        }
        let word = match self.puzzle.board.evaluate(strand) {
            Ok(w) => w,
            Err(_) => return GuessOutcome::OffBoard,
        };
        if let Some(i) = self.puzzle.answers.iter().position(|a| a.word == word) {
            if self.found.contains(&i) {
                return GuessOutcome::AlreadyFound;
            }
            self.found.push(i);
            if self.hint.map_or(false, |h| h.answer_index == i) {
                self.hint = None;
            }
            info!(
                "theme word found: {} ({}/{})",
                word,
                self.found.len(),
                self.puzzle.answers.len()
            );
            return GuessOutcome::ThemeWord(word);
        }

        // Answers may be shorter than the guess minimum, other words may not
        if word.chars().count() < self.min_guess_len {
            return GuessOutcome::TooShort;
        }
        if !self.lexicon.contains(&word) {
            return GuessOutcome::NotInDictionary;
        }
        if self.dictionary_words.contains(&word) {
            return GuessOutcome::AlreadyFound;
        }
        self.dictionary_words.push(word.clone());
        self.hint_meter += 1;
        debug!("dictionary word {}, hint meter {}", word, self.hint_meter);
        GuessOutcome::DictionaryWord(word)
    }

    /// Strands of the answers found so far, in the order they were found.
    /// These are the puzzle's strands, whichever way the player traced the word.
    pub fn found_strands(&self) -> Vec<&Strand> {
        self.found
            .iter()
            .map(|&i| &self.puzzle.answers[i].strand)
            .collect()
    }

    pub fn dictionary_words(&self) -> &[String] {
        &self.dictionary_words
    }

    pub fn game_over(&self) -> bool {
        self.found.len() == self.puzzle.answers.len()
    }

    /// Dictionary words found since the last hint was paid for
    pub fn hint_meter(&self) -> usize {
        self.hint_meter
    }

    pub fn hint_threshold(&self) -> usize {
        self.hint_threshold
    }

    pub fn active_hint(&self) -> Option<Hint> {
        self.hint
    }

    /// Spends `hint_threshold` meter points to reveal more of the first
    /// unfound answer: first its letters, then its path.
    pub fn use_hint(&mut self) -> HintOutcome {
        if self.hint.map_or(false, |h| h.show_path) {
            return HintOutcome::UseCurrentHint;
        }
        if self.hint_meter < self.hint_threshold {
            return HintOutcome::NoHintYet;
        }

        let hint = match self.hint {
            Some(h) => Hint {
                show_path: true,
                ..h
            },
            None => {
                let answer_index = match (0..self.puzzle.answers.len()).find(|i| !self.found.contains(i)) {
                    Some(i) => i,
                    None => return HintOutcome::NoHintYet,
                };
                Hint {
                    answer_index,
                    show_path: false,
                }
            }
        };
        self.hint_meter -= self.hint_threshold;
        self.hint = Some(hint);
        debug!("hint on answer {} (show path: {})", hint.answer_index, hint.show_path);
        HintOutcome::Hint(hint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Step::*;

    const CS_142: &str = "CS 142

C S M C T
O F O R Y
N E O W T

cmsc 1 4 w w w
one 2 1 s e
forty 2 2 e e ne s
two 3 5 w w
";

    fn strand(row: isize, col: isize, steps: &[Step]) -> Strand {
        Strand::new(Position::new(row, col), steps.to_vec())
    }

    fn lexicon() -> Lexicon {
        Lexicon::new(["fort", "trow", "roof", "wort", "for", "zzzz"]).unwrap()
    }

    #[test]
    fn test_parse() {
        let puzzle = Puzzle::parse(CS_142).unwrap();
        assert_eq!(puzzle.theme, "CS 142");
        assert_eq!(puzzle.board.num_rows(), 3);
        assert_eq!(puzzle.board.num_cols(), 5);
        assert_eq!(puzzle.answers.len(), 4);
        assert_eq!(puzzle.answers[2].word, "forty");
        assert_eq!(puzzle.answers[2].strand, strand(1, 1, &[E, E, NE, S]));
        // No answer here reaches two opposite sides
        assert!(puzzle.spangram().is_none());
    }

    #[test]
    fn test_parse_loose_spacing() {
        let text = "\"CS 142\"\n  C S M C T  \n  O F O R Y\n  N E O W T\n\ncmsc 1 4 w  w w\n  one 2 1  s e\nFORTY 2 2 E E NE S\nTWO 3 5 w w\n";
        let puzzle = Puzzle::parse(text).unwrap();
        assert_eq!(puzzle.theme, "\"CS 142\"");
        assert_eq!(puzzle.answers[3].word, "two");
    }

    #[test]
    fn test_parse_invalid() {
        let ragged = "CS 142\n\nC S M C\nO F O R Y\nN E O W T\n\ncmsc 1 4 w w w\n";
        assert!(matches!(
            Puzzle::parse(ragged),
            Err(StrandsError::MalformedBoard { .. })
        ));

        let bad_step = CS_142.replace("cmsc 1 4 w w w", "cmsc 1 4 x x x");
        assert!(matches!(
            Puzzle::parse(&bad_step),
            Err(StrandsError::MalformedPuzzle { line: 7, .. })
        ));

        let wrong_start = CS_142.replace("cmsc 1 4 w w w", "cmsc 2 4 w w w");
        assert!(matches!(
            Puzzle::parse(&wrong_start),
            Err(StrandsError::MalformedPuzzle { line: 7, .. })
        ));

        // Lengths still add up to the board size, but foe reuses forty's f and o
        let overlap = CS_142.replace("two 3 5 w w", "foe 2 2 e sw");
        assert!(matches!(
            Puzzle::parse(&overlap),
            Err(StrandsError::MalformedPuzzle { line: 10, .. })
        ));

        let missing_answer = CS_142.replace("two 3 5 w w\n", "");
        assert!(Puzzle::parse(&missing_answer).is_err());

        assert!(Puzzle::parse("").is_err());
        assert!(Puzzle::parse("theme\n\nc s\no f\n").is_err());
    }

    #[test]
    fn test_play_through() {
        let lexicon = lexicon();
        let config = SolverConfig::default();
        let mut game = StrandsGame::new(Puzzle::parse(CS_142).unwrap(), &lexicon, &config);

        assert_eq!(
            game.submit_strand(&strand(0, 3, &[W, W, W])),
            GuessOutcome::ThemeWord("cmsc".to_string())
        );
        assert_eq!(game.submit_strand(&strand(0, 3, &[W, W, W])), GuessOutcome::AlreadyFound);
        assert_eq!(game.submit_strand(&strand(1, 1, &[E, E])), GuessOutcome::TooShort);
        assert_eq!(game.submit_strand(&strand(2, 4, &[E])), GuessOutcome::OffBoard);
        assert_eq!(
            game.submit_strand(&strand(1, 1, &[E, W])),
            GuessOutcome::InvalidPath
        );
        assert_eq!(
            game.submit_strand(&strand(1, 1, &[W, S, E])),
            GuessOutcome::NotInDictionary
        );
        assert!(!game.game_over());

        game.submit_strand(&strand(1, 0, &[S, E]));
        game.submit_strand(&strand(1, 1, &[E, E, NE, S]));
        assert_eq!(
            game.submit_strand(&strand(2, 4, &[W, W])),
            GuessOutcome::ThemeWord("two".to_string())
        );
        assert!(game.game_over());
        assert_eq!(game.found_strands().len(), 4);
        assert_eq!(game.found_strands()[0], &strand(0, 3, &[W, W, W]));
    }

    #[test]
    fn test_hints() {
        let lexicon = lexicon();
        let config = SolverConfig {
            hint_threshold: 2,
            ..SolverConfig::default()
        };
        let mut game = StrandsGame::new(Puzzle::parse(CS_142).unwrap(), &lexicon, &config);

        assert_eq!(
            game.submit_strand(&strand(1, 1, &[E, E, NE])),
            GuessOutcome::DictionaryWord("fort".to_string())
        );
        assert_eq!(game.use_hint(), HintOutcome::NoHintYet);
        assert_eq!(game.submit_strand(&strand(1, 1, &[E, E, NE])), GuessOutcome::AlreadyFound);
        assert_eq!(game.hint_meter(), 1);
        assert_eq!(
            game.submit_strand(&strand(0, 4, &[SW, SW, E])),
            GuessOutcome::DictionaryWord("trow".to_string())
        );
        assert_eq!(game.hint_meter(), 2);

        let first = Hint {
            answer_index: 0,
            show_path: false,
        };
        assert_eq!(game.use_hint(), HintOutcome::Hint(first));
        assert_eq!(game.hint_meter(), 0);
        assert_eq!(game.active_hint(), Some(first));
        assert_eq!(game.use_hint(), HintOutcome::NoHintYet);

        game.submit_strand(&strand(1, 3, &[W, S, NW]));
        assert_eq!(game.dictionary_words(), &["fort", "trow", "roof"]);
        game.submit_strand(&strand(2, 3, &[W, NE, NE]));
        assert_eq!(
            game.use_hint(),
            HintOutcome::Hint(Hint {
                answer_index: 0,
                show_path: true
            })
        );
        assert_eq!(game.use_hint(), HintOutcome::UseCurrentHint);

        // Finding the hinted answer clears the hint
        game.submit_strand(&strand(0, 3, &[W, W, W]));
        assert_eq!(game.active_hint(), None);
    }

    #[test]
    fn test_free_hints_skip_found() {
        let lexicon = lexicon();
        let config = SolverConfig {
            hint_threshold: 0,
            ..SolverConfig::default()
        };
        let mut game = StrandsGame::new(Puzzle::parse(CS_142).unwrap(), &lexicon, &config);
        assert_eq!(
            game.use_hint(),
            HintOutcome::Hint(Hint {
                answer_index: 0,
                show_path: false
            })
        );
        assert_eq!(
            game.use_hint(),
            HintOutcome::Hint(Hint {
                answer_index: 0,
                show_path: true
            })
        );
        assert_eq!(game.use_hint(), HintOutcome::UseCurrentHint);
        game.submit_strand(&strand(0, 3, &[W, W, W]));
        game.submit_strand(&strand(1, 0, &[S, E]));
        assert_eq!(
            game.use_hint(),
            HintOutcome::Hint(Hint {
                answer_index: 2,
                show_path: false
            })
        );
    }
}
