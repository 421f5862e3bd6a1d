//! # N-Puzzle Solver Library
//!
//! This library searches for a sequence of sliding-tile moves that turns a
//! scrambled square grid into a goal arrangement, using best-first search
//! with a choice of three strategies: weighted A*, uniform-cost and greedy.
//!
//! It is used by three binaries:
//! - `npuzzle`: Reads (or randomly generates) a puzzle and prints a solution
//!   together with the time and space complexity of the search.
//! - `strategy_evaluator`: Compares strategy/heuristic pairs over seeded scrambles.
//! - `human_player`: Allows interactive sliding via the command line.
//!
//! ## Modules
//! - `node`: The search-tree node (`Node`), its cost model (`SearchStrategy`) and
//!   child expansion (`Children`, `Direction`).
//! - `heuristics`: Distance estimators (`Heuristic`) consumed by `Node`.
//! - `solver`: The frontier and the search loop (`solve`, `search`).
//! - `utils`: Puzzle parsing, goal layouts, scrambling and grid validation.
//! - `error`: The crate-wide `PuzzleError`.
//!
//! Grids are flattened row-major `Vec<usize>` values where `0` is the blank.

pub mod error;
pub mod heuristics;
pub mod node;
pub mod solver;
pub mod utils;
