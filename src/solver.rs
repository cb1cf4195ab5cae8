//! Strategy selection and search outcomes.
//!
//! Small boards are searched exhaustively as long as the candidate count
//! stays under a limit; everything else, including small boards that trip
//! the limit, goes through the pruned search.

use log::{debug, info};

use crate::board::Board;
use crate::exhaustive;
use crate::placement::SkipCounts;
use crate::pruned;

/// Boards with fewer cells than this are tried exhaustively first.
pub const SMALL_BOARD_CELLS: usize = 15;

/// Candidate-count limit for the exhaustive strategy.
pub const COMBINATION_LIMIT: u128 = 100_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    Exhaustive,
    Pruned,
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchReport {
    pub strategy: Strategy,
    pub candidates_tested: u64,
    pub skipped: SkipCounts,
}

impl SearchReport {
    pub fn new(strategy: Strategy) -> Self {
        Self {
            strategy,
            candidates_tested: 0,
            skipped: SkipCounts::default(),
        }
    }
}

/// Result of a search.
///
/// `TooManyCombinations` means the search was not attempted, while
/// `NoSolution` means the whole candidate space was explored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SolveOutcome {
    /// A solved board, carrying segments traced on its final grid.
    Solved { board: Board, report: SearchReport },
    NoSolution { report: SearchReport },
    TooManyCombinations { estimated: u128, limit: u128 },
}

impl SolveOutcome {
    pub fn is_solved(&self) -> bool {
        matches!(self, SolveOutcome::Solved { .. })
    }

    pub fn solution(&self) -> Option<&Board> {
        match self {
            SolveOutcome::Solved { board, .. } => Some(board),
            _ => None,
        }
    }

    pub fn into_solution(self) -> Option<Board> {
        match self {
            SolveOutcome::Solved { board, .. } => Some(board),
            _ => None,
        }
    }

    pub fn report(&self) -> Option<&SearchReport> {
        match self {
            SolveOutcome::Solved { report, .. } | SolveOutcome::NoSolution { report } => Some(report),
            SolveOutcome::TooManyCombinations { .. } => None,
        }
    }
}

/// Dispatcher settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SolverPolicy {
    /// Boards with fewer cells than this use the exhaustive strategy first.
    pub small_board_cells: usize,
    /// Exhaustive candidate limit; 0 means unlimited.
    pub combination_limit: u128,
    /// Seed for shuffling exhaustive candidates; `None` keeps enumeration
    /// order. Ignored when `combination_limit` is 0.
    pub shuffle_seed: Option<u64>,
}

impl Default for SolverPolicy {
    fn default() -> Self {
        Self {
            small_board_cells: SMALL_BOARD_CELLS,
            combination_limit: COMBINATION_LIMIT,
            shuffle_seed: None,
        }
    }
}

impl SolverPolicy {
    /// The strategy tried first for `board`.
    pub fn first_strategy(&self, board: &Board) -> Strategy {
        if board.width() * board.height() < self.small_board_cells {
            Strategy::Exhaustive
        } else {
            Strategy::Pruned
        }
    }
}

/// Solves `board` with the default policy.
pub fn solve(board: &Board) -> SolveOutcome {
    solve_with(board, &SolverPolicy::default())
}

/// Solves `board`, falling back to the pruned search when the exhaustive
/// one declines for too many combinations.
pub fn solve_with(board: &Board, policy: &SolverPolicy) -> SolveOutcome {
    match policy.first_strategy(board) {
        Strategy::Exhaustive => {
            debug!("[solve] {}: small board, trying exhaustive search", board);
            match exhaustive::solve_small_seeded(board, policy.combination_limit, policy.shuffle_seed) {
                SolveOutcome::TooManyCombinations { estimated, .. } => {
                    info!(
                        "[solve] {}: {} combinations, falling back to pruned search",
                        board, estimated
                    );
                    pruned::solve_large(board)
                }
                outcome => outcome,
            }
        }
        Strategy::Pruned => {
            debug!("[solve] {}: large board, using pruned search", board);
            pruned::solve_large(board)
        }
    }
}
