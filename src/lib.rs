//! Word search engine for Strands puzzles: paths over a letter grid, dictionary
//! enumeration, candidate ranking, board tiling searches and the play rules.

pub mod config;
pub mod error;
pub mod log;
pub mod strands;

pub use crate::config::SolverConfig;
pub use crate::error::{Result, StrandsError};
pub use crate::strands::*;
