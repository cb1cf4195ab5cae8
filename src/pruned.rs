//! Pruned search for large boards.
//!
//! Before enumerating, the search derives placements that can never work:
//!
//! - banned single: with exactly one laser, an opaque block on the cell
//!   directly ahead of it swallows the only beam;
//! - banned pairs: a target (or the only laser) sitting on a wall between
//!   two non-transparent blocks can never be touched by a beam.
//!
//! Opaque locations are chosen first, then reflect locations, so both
//! checks cut whole subtrees of the enumeration. Refract blocks never block
//! a beam and are placed without constraints.

use std::ops::ControlFlow;

use log::{debug, info};

use crate::board::{Board, Point};
use crate::grid::{Cell, Grid};
use crate::placement::{for_each_placement, CandidateGrid, PoolCounts, Pruning};
use crate::solver::{SearchReport, SolveOutcome, Strategy};
use crate::tracer::{cell_ahead, edge_neighbors};

/// Converts signed cell coordinates to a cell inside `grid`.
fn on_grid(grid: &Grid, (x, y): (i32, i32)) -> Option<Cell> {
    if x < 0 || y < 0 {
        return None;
    }
    let cell = (x as usize, y as usize);
    (cell.0 < grid.width() && cell.1 < grid.height()).then_some(cell)
}

/// Points in the middle of a cell wall. Only these have exactly two
/// neighboring cells that every beam through them must cross.
fn is_wall_midpoint((x, y): Point) -> bool {
    (x + y).rem_euclid(2) == 1
}

fn neighbor_pair(grid: &Grid, point: Point) -> Option<(Cell, Cell)> {
    if !is_wall_midpoint(point) {
        return None;
    }
    let [first, second] = edge_neighbors(point);
    Some((on_grid(grid, first)?, on_grid(grid, second)?))
}

/// Derives the banned-single and banned-pair sets for `board`.
pub fn derive_pruning(board: &Board, counts: PoolCounts) -> Pruning {
    let grid = board.grid();
    let mut pruning = Pruning::default();

    // blocking the only laser only fails a board that has something to hit
    let only_source = match board.laser_sources() {
        [source] if !board.targets().is_empty() => Some(source),
        _ => None,
    };

    if counts.opaque > 0 {
        if let Some(source) = only_source {
            if let Some(cell) = on_grid(grid, cell_ahead(source)) {
                pruning.banned_single.insert(cell);
            }
        }
    }

    if counts.opaque > 0 || counts.reflect > 0 {
        let mut points: Vec<Point> = board.targets().to_vec();
        if let Some(source) = only_source {
            points.push(source.point());
        }
        for pair in points.into_iter().filter_map(|point| neighbor_pair(grid, point)) {
            if !pruning.banned_pairs.contains(&pair) {
                pruning.banned_pairs.push(pair);
            }
        }
    }

    pruning
}

/// Runs the pruned search. Never gives up early: either a solution is found
/// or every surviving placement has been traced.
pub fn solve_large(board: &Board) -> SolveOutcome {
    let positions = board.available_positions();
    let counts = PoolCounts::of(board);
    let pruning = derive_pruning(board, counts);
    debug!(
        "[solve_large] {}: {} banned single, {} banned pairs over {} open cells",
        board.name(),
        pruning.banned_single.len(),
        pruning.banned_pairs.len(),
        positions.len()
    );

    let mut candidates = CandidateGrid::new(board);
    let mut report = SearchReport::new(Strategy::Pruned);

    let found = for_each_placement(
        &positions,
        counts,
        &pruning,
        &mut report.skipped,
        |placement| {
            report.candidates_tested += 1;
            match candidates.evaluate(placement) {
                Some(solved) => ControlFlow::Break(solved),
                None => ControlFlow::Continue(()),
            }
        },
    );

    info!(
        "[solve_large] {}: {} boards tested, skipped {} (opaque), {} (reflect)",
        board.name(),
        report.candidates_tested,
        report.skipped.opaque,
        report.skipped.reflect
    );

    match found {
        ControlFlow::Break(solved) => SolveOutcome::Solved {
            board: solved,
            report,
        },
        ControlFlow::Continue(()) => SolveOutcome::NoSolution { report },
    }
}
