//! Error types for the N-Puzzle solver.

use thiserror::Error;

/// Errors raised while configuring or running a search.
#[derive(Debug, Error)]
pub enum PuzzleError {
    /// The requested search strategy is not one of `a_star`, `uniform` or `greedy`.
    #[error("Unsupported search strategy: {0}")]
    InvalidStrategy(String),

    /// The requested heuristic name is not known to the evaluator.
    #[error("Unknown heuristic: {0}")]
    UnknownHeuristic(String),

    #[error("Unknown goal layout: {0}")]
    UnknownGoalLayout(String),

    /// The puzzle description could not be parsed.
    #[error("Parse error on line {line}: {message}")]
    Parse { line: usize, message: String },

    /// The grid is not a permutation of `0..size*size`.
    #[error("Invalid grid: {0}")]
    InvalidGrid(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for solver operations.
pub type Result<T> = std::result::Result<T, PuzzleError>;
