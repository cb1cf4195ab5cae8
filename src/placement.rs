//! Enumeration of movable block placements.
//!
//! Placements are generated type by type with nested combination
//! enumeration: opaque locations first, then reflect locations among the
//! cells left over, then refract locations among what remains. Duplicate
//! orderings never arise, so each distinct assignment is produced once.
//!
//! Key points:
//! - Each level is an `Itertools::combinations` walk over the free cells
//! - Pruning hooks run at the opaque and reflect levels, where a rejected
//!   prefix skips the whole subtree below it
//! - Candidates are evaluated on one shared grid by overlaying a placement
//!   and clearing it again, instead of cloning the board per candidate

use std::ops::ControlFlow;

use itertools::Itertools;
use rustc_hash::FxHashSet;

use crate::block::Block;
use crate::board::Board;
use crate::grid::{Cell, Grid};
use crate::tracer;

/// Pool size per placeable block type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PoolCounts {
    pub opaque: usize,
    pub reflect: usize,
    pub refract: usize,
}

impl PoolCounts {
    pub fn of(board: &Board) -> Self {
        Self {
            opaque: board.pool_count(Block::Opaque),
            reflect: board.pool_count(Block::Reflect),
            refract: board.pool_count(Block::Refract),
        }
    }

    pub fn total(&self) -> usize {
        self.opaque + self.reflect + self.refract
    }

    /// Number of block types with at least one pool entry.
    pub fn distinct_types(&self) -> usize {
        [self.opaque, self.reflect, self.refract]
            .iter()
            .filter(|&&count| count > 0)
            .count()
    }
}

/// Locations chosen for each block type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Placement {
    pub opaque: Vec<Cell>,
    pub reflect: Vec<Cell>,
    pub refract: Vec<Cell>,
}

impl Placement {
    fn assignments(&self) -> impl Iterator<Item = (Block, Cell)> + '_ {
        let opaque = self.opaque.iter().map(|&cell| (Block::Opaque, cell));
        let reflect = self.reflect.iter().map(|&cell| (Block::Reflect, cell));
        let refract = self.refract.iter().map(|&cell| (Block::Refract, cell));
        opaque.chain(reflect).chain(refract)
    }

    /// Writes the placed blocks into `grid`.
    pub fn apply(&self, grid: &mut Grid) {
        for (block, cell) in self.assignments() {
            grid.place(cell, block);
        }
    }

    /// Resets the placed cells of `grid` back to blank.
    pub fn clear(&self, grid: &mut Grid) {
        for (_, cell) in self.assignments() {
            grid.place(cell, Block::Blank);
        }
    }
}

/// Placements ruled out before they are generated.
#[derive(Debug, Clone, Default)]
pub struct Pruning {
    /// Cells that must never hold an opaque block.
    pub banned_single: FxHashSet<Cell>,
    /// Cell pairs that must never both hold a non-transparent block.
    pub banned_pairs: Vec<(Cell, Cell)>,
}

impl Pruning {
    pub fn is_empty(&self) -> bool {
        self.banned_single.is_empty() && self.banned_pairs.is_empty()
    }

    fn rejects_opaque(&self, opaque: &[Cell]) -> bool {
        opaque.iter().any(|cell| self.banned_single.contains(cell))
            || self.pair_within(|cell| opaque.contains(cell))
    }

    fn rejects_blocking(&self, opaque: &[Cell], reflect: &[Cell]) -> bool {
        self.pair_within(|cell| opaque.contains(cell) || reflect.contains(cell))
    }

    fn pair_within(&self, occupied: impl Fn(&Cell) -> bool) -> bool {
        self.banned_pairs
            .iter()
            .any(|(first, second)| occupied(first) && occupied(second))
    }
}

/// Placements skipped by pruning, per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SkipCounts {
    pub opaque: u64,
    pub reflect: u64,
}

fn without(items: &[Cell], taken: &[Cell]) -> Vec<Cell> {
    items
        .iter()
        .filter(|cell| !taken.contains(cell))
        .copied()
        .collect()
}

/// Calls `visit` with every placement of the pool onto `positions` that
/// survives `pruning`, until it breaks.
///
/// Each level walks the combinations of the cells left over by the level
/// above, in lexicographic order of `positions`.
pub fn for_each_placement<B>(
    positions: &[Cell],
    counts: PoolCounts,
    pruning: &Pruning,
    skipped: &mut SkipCounts,
    mut visit: impl FnMut(&Placement) -> ControlFlow<B>,
) -> ControlFlow<B> {
    if counts.total() > positions.len() {
        return ControlFlow::Continue(());
    }

    let mut placement = Placement::default();

    positions
        .iter()
        .copied()
        .combinations(counts.opaque)
        .try_for_each(|opaque| {
            if counts.opaque > 0 && pruning.rejects_opaque(&opaque) {
                skipped.opaque += 1;
                return ControlFlow::Continue(());
            }
            let after_opaque = without(positions, &opaque);

            after_opaque
                .iter()
                .copied()
                .combinations(counts.reflect)
                .try_for_each(|reflect| {
                    if counts.reflect > 0 && pruning.rejects_blocking(&opaque, &reflect) {
                        skipped.reflect += 1;
                        return ControlFlow::Continue(());
                    }
                    let after_reflect = without(&after_opaque, &reflect);

                    after_reflect
                        .iter()
                        .copied()
                        .combinations(counts.refract)
                        .try_for_each(|refract| {
                            placement.opaque.clone_from(&opaque);
                            placement.reflect.clone_from(&reflect);
                            placement.refract = refract;
                            visit(&placement)
                        })
                })
        })
}

/// Shared working grid for evaluating candidate placements.
///
/// Holds a copy of the board's grid with every movable cell cleared; each
/// candidate is overlaid, traced and cleared again.
pub struct CandidateGrid<'a> {
    board: &'a Board,
    grid: Grid,
}

impl<'a> CandidateGrid<'a> {
    pub fn new(board: &'a Board) -> Self {
        let mut grid = board.grid().clone();
        grid.clear_movable();
        Self { board, grid }
    }

    /// Traces `placement` and returns the solved board if every target is hit.
    pub fn evaluate(&mut self, placement: &Placement) -> Option<Board> {
        placement.apply(&mut self.grid);
        let segments = tracer::trace(&self.grid, self.board.laser_sources());
        let solved = tracer::covers_targets(&segments, self.board.targets())
            .then(|| self.board.with_solution(self.grid.clone(), segments));
        placement.clear(&mut self.grid);
        solved
    }
}
