//! Generate-and-test search for small boards.
//!
//! Every distinct placement of the pool is traced until one reaches all
//! targets. The search refuses to start when the number of candidates
//! exceeds a limit, reporting [`SolveOutcome::TooManyCombinations`] so the
//! caller can fall back to the pruned search.

use std::convert::Infallible;
use std::ops::ControlFlow;

use log::{debug, info, warn};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_pcg::Pcg64;

use crate::board::Board;
use crate::placement::{for_each_placement, CandidateGrid, Placement, PoolCounts, Pruning, SkipCounts};
use crate::solver::{SearchReport, SolveOutcome, Strategy};

/// Runs the exhaustive search in enumeration order.
///
/// A `limit` of 0 disables the candidate-count check.
pub fn solve_small(board: &Board, limit: u128) -> SolveOutcome {
    solve_small_seeded(board, limit, None)
}

/// Runs the exhaustive search, visiting candidates in a shuffled order
/// derived from `shuffle_seed` when one is given.
///
/// Shuffling holds every candidate in memory, so it needs a nonzero `limit`;
/// with `limit == 0` the seed is ignored and enumeration order is used.
pub fn solve_small_seeded(board: &Board, limit: u128, shuffle_seed: Option<u64>) -> SolveOutcome {
    let estimated = board.estimated_combination_count();
    if limit != 0 && estimated > limit {
        warn!(
            "[solve_small] {}: too many combinations ({} > {})",
            board.name(),
            estimated,
            limit
        );
        return SolveOutcome::TooManyCombinations { estimated, limit };
    }

    let shuffle_seed = match shuffle_seed {
        Some(_) if limit == 0 => {
            warn!(
                "[solve_small] {}: no combination limit, ignoring the shuffle seed",
                board.name()
            );
            None
        }
        seed => seed,
    };

    let positions = board.available_positions();
    let counts = PoolCounts::of(board);
    debug!(
        "[solve_small] {}: {} candidates, {} block type(s) over {} open cells",
        board.name(),
        estimated,
        counts.distinct_types(),
        positions.len()
    );

    let mut candidates = CandidateGrid::new(board);
    let mut report = SearchReport::new(Strategy::Exhaustive);
    let mut unused_skips = SkipCounts::default();

    let found = match shuffle_seed {
        None => for_each_placement(
            &positions,
            counts,
            &Pruning::default(),
            &mut unused_skips,
            |placement| {
                report.candidates_tested += 1;
                match candidates.evaluate(placement) {
                    Some(solved) => ControlFlow::Break(solved),
                    None => ControlFlow::Continue(()),
                }
            },
        ),
        Some(seed) => {
            let mut all: Vec<Placement> = Vec::new();
            let collected = for_each_placement::<Infallible>(
                &positions,
                counts,
                &Pruning::default(),
                &mut unused_skips,
                |placement| {
                    all.push(placement.clone());
                    ControlFlow::Continue(())
                },
            );
            if let ControlFlow::Break(never) = collected {
                match never {}
            }
            all.shuffle(&mut Pcg64::seed_from_u64(seed));

            all.iter().try_for_each(|placement| {
                report.candidates_tested += 1;
                match candidates.evaluate(placement) {
                    Some(solved) => ControlFlow::Break(solved),
                    None => ControlFlow::Continue(()),
                }
            })
        }
    };

    match found {
        ControlFlow::Break(solved) => {
            info!(
                "[solve_small] {}: solved after {} candidates",
                board.name(),
                report.candidates_tested
            );
            SolveOutcome::Solved {
                board: solved,
                report,
            }
        }
        ControlFlow::Continue(()) => {
            info!(
                "[solve_small] {}: no solution among {} candidates",
                board.name(),
                report.candidates_tested
            );
            SolveOutcome::NoSolution { report }
        }
    }
}
