//! Lazors Puzzle Solver Library
//!
//! Models Lazors boards (a grid of cells, a pool of movable blocks, laser
//! sources and target points), traces laser paths through them and searches
//! for placements of the pool that make the lasers reach every target.

pub mod bff;
pub mod block;
pub mod board;
pub mod error;
pub mod exhaustive;
pub mod grid;
pub mod placement;
pub mod pruned;
pub mod puzzles;
pub mod solver;
pub mod tracer;

pub use block::Block;
pub use board::{Board, Point, Ray, Segment};
pub use error::{BffError, BoardError};
pub use grid::{Cell, Grid};
pub use solver::{solve, solve_with, SearchReport, SolveOutcome, SolverPolicy, Strategy};
