//! Board model: grid, laser sources, targets and the movable block pool.
//!
//! Two coordinate systems are in play. Cells use [`Cell`] coordinates, one
//! unit per block. Laser sources, segments and targets use [`Point`]
//! coordinates, one unit per half block, so a `W x H` board spans points
//! `0..=2W` by `0..=2H`.

use std::fmt;

use crate::block::Block;
use crate::error::{BoardError, Result};
use crate::grid::{Cell, Grid};
use crate::tracer;

/// Point coordinates `(x, y)`, one unit per half block.
pub type Point = (i32, i32);

/// A laser travelling from `(x, y)` along the diagonal `(vx, vy)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ray {
    pub x: i32,
    pub y: i32,
    pub vx: i32,
    pub vy: i32,
}

impl Ray {
    pub const fn new(x: i32, y: i32, vx: i32, vy: i32) -> Self {
        Self { x, y, vx, vy }
    }

    #[inline]
    pub const fn point(&self) -> Point {
        (self.x, self.y)
    }
}

/// One diagonal unit step of a traced laser path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Segment {
    pub x0: i32,
    pub y0: i32,
    pub x1: i32,
    pub y1: i32,
}

impl Segment {
    pub const fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    #[inline]
    pub const fn start(&self) -> Point {
        (self.x0, self.y0)
    }

    #[inline]
    pub const fn end(&self) -> Point {
        (self.x1, self.y1)
    }
}

/// A Lazors puzzle.
///
/// Cells default to [`Block::Blank`]. Every mutator validates its input
/// against the board dimensions and reports a [`BoardError`] instead of
/// clamping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    name: String,
    grid: Grid,
    pool: Vec<Block>,
    laser_sources: Vec<Ray>,
    targets: Vec<Point>,
    laser_segments: Option<Vec<Segment>>,
}

impl Board {
    pub fn new(name: impl Into<String>, width: usize, height: usize) -> Result<Self> {
        Ok(Self::from_grid(name, Grid::new(width, height)?))
    }

    pub fn from_grid(name: impl Into<String>, grid: Grid) -> Self {
        Self {
            name: name.into(),
            grid,
            pool: Vec::new(),
            laser_sources: Vec::new(),
            targets: Vec::new(),
            laser_segments: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn get_cell(&self, x: usize, y: usize) -> Result<Block> {
        self.grid.get(x, y)
    }

    /// Changes one cell. Any previously traced segments are dropped since
    /// they no longer describe the grid.
    pub fn set_cell(&mut self, x: usize, y: usize, block: Block) -> Result<()> {
        self.grid.set(x, y, block)?;
        self.laser_segments = None;
        Ok(())
    }

    fn check_point(&self, x: i32, y: i32) -> Result<()> {
        let max_x = 2 * self.width() as i32;
        let max_y = 2 * self.height() as i32;
        if (0..=max_x).contains(&x) && (0..=max_y).contains(&y) {
            Ok(())
        } else {
            Err(BoardError::PointOutOfBounds { x, y, max_x, max_y })
        }
    }

    /// Adds a laser source at point `(x, y)`.
    ///
    /// The direction must be a nonzero 45 degree diagonal (`|vx| == |vy|`);
    /// it is stored as `(sign(vx), sign(vy))`, so magnitudes are discarded.
    pub fn add_laser_source(&mut self, x: i32, y: i32, vx: i32, vy: i32) -> Result<()> {
        self.check_point(x, y)?;
        if vx == 0 || vy == 0 || vx.abs() != vy.abs() {
            return Err(BoardError::InvalidDirection { vx, vy });
        }
        self.laser_sources
            .push(Ray::new(x, y, vx.signum(), vy.signum()));
        self.laser_segments = None;
        Ok(())
    }

    pub fn add_target(&mut self, x: i32, y: i32) -> Result<()> {
        self.check_point(x, y)?;
        self.targets.push((x, y));
        Ok(())
    }

    /// Adds `count` copies of `block` to the movable pool.
    pub fn add_to_pool(&mut self, block: Block, count: usize) -> Result<()> {
        if !block.is_placeable() {
            return Err(BoardError::IllegalPoolBlock { block });
        }
        self.pool.extend(std::iter::repeat(block).take(count));
        Ok(())
    }

    pub fn pool(&self) -> &[Block] {
        &self.pool
    }

    /// Number of pool entries of the given type.
    pub fn pool_count(&self, block: Block) -> usize {
        self.pool.iter().filter(|&&b| b == block).count()
    }

    pub fn laser_sources(&self) -> &[Ray] {
        &self.laser_sources
    }

    pub fn targets(&self) -> &[Point] {
        &self.targets
    }

    /// Segments of the last trace, or `None` if the board was never traced
    /// or has changed since.
    pub fn laser_segments(&self) -> Option<&[Segment]> {
        self.laser_segments.as_deref()
    }

    /// Attaches externally computed segments after checking each one is a
    /// unit diagonal step inside the point range.
    pub fn set_laser_segments(&mut self, segments: Vec<Segment>) -> Result<()> {
        for segment in &segments {
            self.check_point(segment.x0, segment.y0)?;
            self.check_point(segment.x1, segment.y1)?;
            if (segment.x0 - segment.x1).abs() != 1 || (segment.y0 - segment.y1).abs() != 1 {
                return Err(BoardError::InvalidSegment {
                    x0: segment.x0,
                    y0: segment.y0,
                    x1: segment.x1,
                    y1: segment.y1,
                });
            }
        }
        self.laser_segments = Some(segments);
        Ok(())
    }

    pub fn clear_laser_segments(&mut self) {
        self.laser_segments = None;
    }

    /// Traces the lasers on the current grid and stores the result.
    pub fn retrace(&mut self) -> &[Segment] {
        let segments = tracer::trace(&self.grid, &self.laser_sources);
        self.laser_segments.insert(segments)
    }

    /// Whether the stored segments reach every target.
    pub fn targets_covered(&self) -> bool {
        self.laser_segments
            .as_deref()
            .is_some_and(|segments| tracer::covers_targets(segments, &self.targets))
    }

    /// All cells a movable block may be placed on.
    pub fn available_positions(&self) -> Vec<Cell> {
        self.grid.available_positions()
    }

    pub fn clear_movable_cells(&mut self) {
        self.grid.clear_movable();
        self.laser_segments = None;
    }

    /// Checks the load-time invariant that the pool fits on the open cells.
    pub fn validate(&self) -> Result<()> {
        let positions = self.available_positions().len();
        if self.pool.len() > positions {
            return Err(BoardError::PoolTooLarge {
                pool: self.pool.len(),
                positions,
            });
        }
        Ok(())
    }

    /// Number of distinct placements of the pool onto the open cells.
    ///
    /// Equals `P! / ((P - k)! * c_opaque! * c_reflect! * c_refract!)` for `P`
    /// open cells and `k` pool entries; saturates at `u128::MAX`.
    pub fn estimated_combination_count(&self) -> u128 {
        let mut remaining = self.available_positions().len() as u128;
        if self.pool.len() as u128 > remaining {
            return 0;
        }

        let mut total: u128 = 1;
        for block in Block::PLACEABLE {
            let count = self.pool_count(block) as u128;
            let ways = binomial(remaining, count).unwrap_or(u128::MAX);
            total = total.saturating_mul(ways);
            remaining -= count;
        }
        total
    }

    /// Returns a copy carrying `grid` and its freshly traced `segments`.
    pub(crate) fn with_solution(&self, grid: Grid, segments: Vec<Segment>) -> Board {
        Board {
            name: self.name.clone(),
            grid,
            pool: self.pool.clone(),
            laser_sources: self.laser_sources.clone(),
            targets: self.targets.clone(),
            laser_segments: Some(segments),
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.name, self.width(), self.height())
    }
}

/// `n choose k`, or `None` on overflow.
fn binomial(n: u128, k: u128) -> Option<u128> {
    if k > n {
        return Some(0);
    }
    let k = k.min(n - k);
    let mut result: u128 = 1;
    for i in 0..k {
        // result == C(n, i) here, so the division is exact
        result = result.checked_mul(n - i)? / (i + 1);
    }
    Some(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Board {
        let mut board = Board::new("test_1", 2, 2).unwrap();
        board.set_cell(0, 1, Block::FixedReflect).unwrap();
        board
    }

    #[test]
    fn test_board_cells() {
        let board = two_by_two();
        assert_eq!(board.get_cell(0, 0), Ok(Block::Blank));
        assert_eq!(board.get_cell(0, 1), Ok(Block::FixedReflect));
        assert!(board.get_cell(2, 0).is_err());
    }

    #[test]
    fn test_laser_direction_is_normalized() {
        let mut board = two_by_two();
        board.add_laser_source(0, 1, 1, 1).unwrap();
        board.add_laser_source(4, 3, -3, 3).unwrap();
        assert_eq!(
            board.laser_sources(),
            &[Ray::new(0, 1, 1, 1), Ray::new(4, 3, -1, 1)]
        );
    }

    #[test]
    fn test_non_diagonal_lasers_are_rejected() {
        let mut board = two_by_two();
        assert_eq!(
            board.add_laser_source(0, 1, -2, 1),
            Err(BoardError::InvalidDirection { vx: -2, vy: 1 })
        );
        assert_eq!(
            board.add_laser_source(0, 1, 0, 0),
            Err(BoardError::InvalidDirection { vx: 0, vy: 0 })
        );
        assert!(board.laser_sources().is_empty());
    }

    #[test]
    fn test_laser_outside_point_range_is_rejected() {
        let mut board = two_by_two();
        assert_eq!(
            board.add_laser_source(0, 10, -1, 1),
            Err(BoardError::PointOutOfBounds {
                x: 0,
                y: 10,
                max_x: 4,
                max_y: 4
            })
        );
        assert!(board.add_laser_source(-1, 1, 1, 1).is_err());
        assert!(board.add_laser_source(4, 4, -1, -1).is_ok());
    }

    #[test]
    fn test_board_targets() {
        let mut board = two_by_two();
        board.add_target(0, 0).unwrap();
        assert_eq!(board.targets(), &[(0, 0)]);
        assert!(board.add_target(0, 10).is_err());
        assert_eq!(board.targets().len(), 1);
    }

    #[test]
    fn test_board_pool() {
        let mut board = two_by_two();
        board.add_to_pool(Block::Refract, 1).unwrap();
        board.add_to_pool(Block::Reflect, 2).unwrap();
        assert_eq!(
            board.pool(),
            &[Block::Refract, Block::Reflect, Block::Reflect]
        );
        assert_eq!(board.pool_count(Block::Reflect), 2);

        for block in [Block::Blank, Block::FixedOpaque, Block::FixedRefract] {
            assert_eq!(
                board.add_to_pool(block, 2),
                Err(BoardError::IllegalPoolBlock { block })
            );
        }
    }

    #[test]
    fn test_validate_rejects_oversized_pool() {
        let mut board = two_by_two();
        board.add_to_pool(Block::Opaque, 3).unwrap();
        assert_eq!(board.validate(), Ok(()));
        board.add_to_pool(Block::Reflect, 1).unwrap();
        assert_eq!(
            board.validate(),
            Err(BoardError::PoolTooLarge {
                pool: 4,
                positions: 3
            })
        );
    }

    #[test]
    fn test_estimated_combination_count() {
        let mut board = Board::new("count", 3, 3).unwrap();
        board.set_cell(0, 2, Block::FixedOpaque).unwrap();
        board.add_to_pool(Block::Reflect, 3).unwrap();
        // 8 open cells choose 3
        assert_eq!(board.estimated_combination_count(), 56);

        board.add_to_pool(Block::Opaque, 2).unwrap();
        // C(8, 2) * C(6, 3)
        assert_eq!(board.estimated_combination_count(), 560);

        board.add_to_pool(Block::Refract, 4).unwrap();
        assert_eq!(board.estimated_combination_count(), 0);
    }

    #[test]
    fn test_estimate_saturates_instead_of_overflowing() {
        let mut board = Board::new("huge", 20, 20).unwrap();
        board.add_to_pool(Block::Opaque, 60).unwrap();
        board.add_to_pool(Block::Reflect, 60).unwrap();
        board.add_to_pool(Block::Refract, 60).unwrap();
        assert_eq!(board.estimated_combination_count(), u128::MAX);
    }

    #[test]
    fn test_mutation_drops_stale_segments() {
        let mut board = two_by_two();
        board.add_laser_source(0, 1, 1, 1).unwrap();
        board.retrace();
        assert!(board.laser_segments().is_some());

        board.set_cell(1, 1, Block::Opaque).unwrap();
        assert!(board.laser_segments().is_none());
    }

    #[test]
    fn test_set_laser_segments_validates_steps() {
        let mut board = two_by_two();
        assert!(board
            .set_laser_segments(vec![Segment::new(0, 1, 1, 2)])
            .is_ok());
        assert_eq!(
            board.set_laser_segments(vec![Segment::new(0, 1, 2, 3)]),
            Err(BoardError::InvalidSegment {
                x0: 0,
                y0: 1,
                x1: 2,
                y1: 3
            })
        );
        assert!(board
            .set_laser_segments(vec![Segment::new(4, 4, 5, 5)])
            .is_err());
    }

    #[test]
    fn test_clear_movable_cells_twice_matches_once() {
        let mut board = two_by_two();
        board.set_cell(1, 0, Block::Opaque).unwrap();
        board.set_cell(1, 1, Block::Refract).unwrap();

        let mut once = board.clone();
        once.clear_movable_cells();
        let mut twice = once.clone();
        twice.clear_movable_cells();

        assert_eq!(once, twice);
        assert_eq!(once.get_cell(0, 1), Ok(Block::FixedReflect));
        assert_eq!(once.get_cell(1, 1), Ok(Block::Blank));
    }
}
