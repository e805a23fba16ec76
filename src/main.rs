use std::collections::BTreeMap;
use std::fs;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, ValueEnum};
use serde::Serialize;

use strands::{
    Board, FrequencyTable, Lexicon, Puzzle, SearchBudget, SearchOutcome, SearchStatus, Solver,
    SolverConfig, Strand, Trie,
};

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Locate known answers on the board
    Answers,
    /// List every dictionary word on the board
    Words,
    /// Near-full layouts from the top-k search plus greedy completion
    Placements,
    /// Exact tilings of the board by dictionary words
    Exact,
}

/// Strands puzzle solver
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Board file: a JSON array of letter rows, or a puzzle file (theme, board, answers)
    #[arg(short, long)]
    board: String,

    /// Word list, one word per line
    #[arg(short, long)]
    dictionary: Option<String>,

    /// Word frequencies, `word count` per line
    #[arg(short, long)]
    frequencies: Option<String>,

    /// Comma-separated known answers (defaults to the puzzle file's answers)
    #[arg(short, long, value_delimiter = ',')]
    answers: Vec<String>,

    #[arg(short, long, value_enum, default_value_t = Mode::Answers)]
    mode: Mode,

    /// JSON file overriding the solver defaults
    #[arg(short, long)]
    config: Option<String>,

    /// Give up searching after this many milliseconds
    #[arg(short, long)]
    time_limit_ms: Option<u64>,

    /// Give up searching after this many search steps
    #[arg(long)]
    max_steps: Option<u64>,

    #[arg(long)]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    strands::log::init_logger(cli.debug);

    if let Err(e) = try_main(&cli) {
        eprintln!("Error: {e}");
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

fn try_main(cli: &Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = match &cli.config {
        Some(path) => SolverConfig::from_json(&fs::read_to_string(path)?)?,
        None => SolverConfig::default(),
    };

    let raw_board = fs::read_to_string(&cli.board)?;
    let (board, puzzle_answers) = if raw_board.trim_start().starts_with('[') {
        (Board::from_json(&raw_board)?, Vec::new())
    } else {
        let puzzle = Puzzle::parse(&raw_board)?;
        log::info!("puzzle theme: {}", puzzle.theme);
        let answers = puzzle.answers.iter().map(|a| a.word.clone()).collect();
        (puzzle.board, answers)
    };

    let t_load = Instant::now();
    let lexicon = match &cli.dictionary {
        Some(path) => Some(Lexicon::parse(&fs::read_to_string(path)?)?),
        None => None,
    };
    let frequencies = match &cli.frequencies {
        Some(path) => Some(FrequencyTable::parse(&fs::read_to_string(path)?)),
        None => None,
    };
    log::debug!("loaded inputs in {:.3}s", t_load.elapsed().as_secs_f64());

    let mut budget = SearchBudget::unlimited();
    if let Some(ms) = cli.time_limit_ms {
        budget = budget.with_time_limit(Duration::from_millis(ms));
    }
    if let Some(steps) = cli.max_steps {
        budget = budget.with_max_steps(steps);
    }

    let mut solver = match &lexicon {
        Some(lexicon) => Solver::new(&board, lexicon, config),
        None if cli.mode == Mode::Answers => Solver::with_trie(&board, Trie::new(), config),
        None => return Err("this mode needs --dictionary".into()),
    };
    if let Some(table) = &frequencies {
        solver = solver.with_frequencies(table);
    }

    let t_solve = Instant::now();
    let json = match cli.mode {
        Mode::Answers => {
            let targets = if cli.answers.is_empty() {
                puzzle_answers
            } else {
                cli.answers.clone()
            };
            if targets.is_empty() {
                return Err("no answers given and the board file is not a puzzle".into());
            }
            let solution = solver.answer_paths(&targets, &budget);
            if solution.status != SearchStatus::Complete {
                eprintln!("Search budget exceeded; results are partial");
            }
            if !solution.missing.is_empty() {
                eprintln!("Not on the board: {}", solution.missing.join(", "));
            }
            serde_json::to_string_pretty(&solution)?
        }
        Mode::Words => serde_json::to_string_pretty(&solver.all_words().to_map())?,
        Mode::Placements => layouts_to_json(solver.placements(&budget))?,
        Mode::Exact => layouts_to_json(solver.exact_tilings(&budget))?,
    };
    println!("{json}");

    eprintln!(
        "Solved {}x{} board in {:.3}s.",
        board.num_rows(),
        board.num_cols(),
        t_solve.elapsed().as_secs_f64()
    );
    Ok(())
}

#[derive(Serialize)]
struct Layouts {
    complete: bool,
    layouts: Vec<BTreeMap<String, Strand>>,
}

fn layouts_to_json(outcome: SearchOutcome<Vec<strands::Placement>>) -> serde_json::Result<String> {
    if !outcome.is_complete() {
        eprintln!("Search budget exceeded; results are partial");
    }
    let layouts = Layouts {
        complete: outcome.is_complete(),
        layouts: outcome.results.iter().map(|p| p.to_map()).collect(),
    };
    serde_json::to_string_pretty(&layouts)
}
