pub mod answers;
pub mod board;
pub mod budget;
pub mod dictionary;
pub mod exact_cover;
pub mod game;
mod mask;
pub mod placement;
pub mod ranking;
pub mod solver;
pub mod strand;
pub mod util;
pub mod word_search;

pub use self::answers::{solve_answers, AnswerPath, AnswerSolution};
pub use self::board::Board;
pub use self::budget::{SearchBudget, SearchOutcome, SearchStatus};
pub use self::dictionary::{FrequencyTable, Lexicon, Trie};
pub use self::game::{GuessOutcome, Hint, HintOutcome, Puzzle, StrandsGame};
pub use self::mask::CellMask;
pub use self::placement::Placement;
pub use self::ranking::{Candidate, NoopScorer, WordScorer};
pub use self::solver::Solver;
pub use self::strand::Strand;
pub use self::util::{Position, Step};
pub use self::word_search::{FoundWord, FoundWords, WordFinder, WordPaths};
