//! Laser tracing.
//!
//! Rays live on point coordinates and always sit on a cell wall: on a
//! vertical wall (between horizontally adjacent cells) when `y` is odd, on a
//! horizontal wall otherwise. Each step inspects the cell ahead of the ray:
//!
//! - transparent: the ray advances one diagonal step, emitting a segment;
//! - reflective: a copy of the ray turns around at the same point, with the
//!   direction component perpendicular to the wall negated.
//!
//! Refract blocks are both, so both branches fire and the beam splits.

use rustc_hash::FxHashSet;

use crate::board::{Point, Ray, Segment};
use crate::grid::Grid;

/// Cell immediately ahead of a ray, in signed cell coordinates.
///
/// May lie outside the grid.
#[inline]
pub fn cell_ahead(ray: &Ray) -> (i32, i32) {
    let (bx, by) = (ray.x.div_euclid(2), ray.y.div_euclid(2));
    if on_vertical_wall(ray.y) {
        (bx - i32::from(ray.vx < 0), by)
    } else {
        (bx, by - i32::from(ray.vy < 0))
    }
}

/// The two cells sharing the wall a point lies on.
///
/// Any ray passing through the point crosses one of these two cells.
#[inline]
pub fn edge_neighbors((x, y): Point) -> [(i32, i32); 2] {
    let (bx, by) = (x.div_euclid(2), y.div_euclid(2));
    if on_vertical_wall(y) {
        [(bx, by), (bx - 1, by)]
    } else {
        [(bx, by), (bx, by - 1)]
    }
}

#[inline(always)]
fn on_vertical_wall(y: i32) -> bool {
    y.rem_euclid(2) == 1
}

/// Traces every laser through the grid and returns all path segments.
///
/// Rays are drained from a work-list; a ray state is enqueued at most once,
/// which bounds the work and guarantees termination even for beams caught in
/// a loop. The order of the returned segments carries no meaning.
pub fn trace(grid: &Grid, sources: &[Ray]) -> Vec<Segment> {
    let mut pending: Vec<Ray> = sources.to_vec();
    let mut visited: FxHashSet<Ray> = sources.iter().copied().collect();
    let mut segments = Vec::new();

    while let Some(ray) = pending.pop() {
        let (cx, cy) = cell_ahead(&ray);
        let Some(block) = grid.block_at(cx, cy) else {
            // the ray leaves the board
            continue;
        };

        // two independent checks: refract blocks pass and reflect at once
        if block.is_transparent() {
            let next = Ray::new(ray.x + ray.vx, ray.y + ray.vy, ray.vx, ray.vy);
            segments.push(Segment::new(ray.x, ray.y, next.x, next.y));
            if visited.insert(next) {
                pending.push(next);
            }
        }

        if block.is_reflective() {
            let turned = if on_vertical_wall(ray.y) {
                Ray::new(ray.x, ray.y, -ray.vx, ray.vy)
            } else {
                Ray::new(ray.x, ray.y, ray.vx, -ray.vy)
            };
            if visited.insert(turned) {
                pending.push(turned);
            }
        }
    }

    segments
}

/// All points touched by the given segments.
pub fn endpoints(segments: &[Segment]) -> FxHashSet<Point> {
    segments
        .iter()
        .flat_map(|segment| [segment.start(), segment.end()])
        .collect()
}

/// Whether every target is an endpoint of some segment.
pub fn covers_targets(segments: &[Segment], targets: &[Point]) -> bool {
    if targets.is_empty() {
        return true;
    }
    let reached = endpoints(segments);
    targets.iter().all(|target| reached.contains(target))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::block::Block;
    use proptest::prelude::*;

    use Block::{Blank as O, FixedOpaque as B, Reflect as A};

    fn solved_sample() -> (Grid, Vec<Ray>) {
        let grid = Grid::from_rows(vec![vec![A, A, O], vec![O, O, A], vec![B, O, O]]).unwrap();
        let sources = vec![Ray::new(5, 0, -1, 1), Ray::new(5, 6, -1, -1)];
        (grid, sources)
    }

    fn sorted(mut segments: Vec<Segment>) -> Vec<Segment> {
        segments.sort();
        segments
    }

    #[test]
    fn test_cell_ahead_on_each_wall() {
        // horizontal wall, heading down then up
        assert_eq!(cell_ahead(&Ray::new(5, 0, -1, 1)), (2, 0));
        assert_eq!(cell_ahead(&Ray::new(5, 6, -1, -1)), (2, 2));
        // vertical wall, heading right then left
        assert_eq!(cell_ahead(&Ray::new(4, 1, 1, 1)), (2, 0));
        assert_eq!(cell_ahead(&Ray::new(4, 1, -1, 1)), (1, 0));
        assert_eq!(cell_ahead(&Ray::new(0, 3, -1, 1)), (-1, 1));
    }

    #[test]
    fn test_edge_neighbors() {
        assert_eq!(edge_neighbors((4, 1)), [(2, 0), (1, 0)]);
        assert_eq!(edge_neighbors((3, 4)), [(1, 2), (1, 1)]);
        assert_eq!(edge_neighbors((0, 3)), [(0, 1), (-1, 1)]);
    }

    #[test]
    fn test_trace_solved_sample() {
        let (grid, sources) = solved_sample();
        let segments = trace(&grid, &sources);

        let expected = vec![
            Segment::new(5, 0, 4, 1),
            Segment::new(4, 1, 5, 2),
            Segment::new(5, 2, 6, 1),
            Segment::new(5, 6, 4, 5),
            Segment::new(4, 5, 3, 4),
            Segment::new(3, 4, 2, 3),
            Segment::new(2, 3, 1, 2),
            Segment::new(1, 2, 0, 3),
        ];
        assert_eq!(sorted(segments.clone()), sorted(expected));
        assert!(covers_targets(&segments, &[(4, 1), (0, 3)]));
    }

    #[test]
    fn test_opaque_block_stops_the_beam() {
        let grid = Grid::from_rows(vec![vec![B]]).unwrap();
        let segments = trace(&grid, &[Ray::new(0, 1, 1, 1)]);
        assert!(segments.is_empty());
        assert!(!covers_targets(&segments, &[(2, 1)]));
    }

    #[test]
    fn test_blank_cell_passes_straight_through() {
        let grid = Grid::from_rows(vec![vec![O]]).unwrap();
        let segments = trace(&grid, &[Ray::new(0, 1, 1, 1)]);
        // (0,1) -> (1,2), then the next cell ahead is off the board
        assert_eq!(segments, vec![Segment::new(0, 1, 1, 2)]);
    }

    #[test]
    fn test_refract_block_splits_the_beam() {
        let grid = Grid::from_rows(vec![vec![Block::Refract]]).unwrap();
        let segments = trace(&grid, &[Ray::new(0, 1, 1, 1)]);
        // pass-through copy continues to (1,2); the reflected copy turns
        // back at (0,1) and immediately leaves the board
        assert_eq!(segments, vec![Segment::new(0, 1, 1, 2)]);

        let grid = Grid::from_rows(vec![vec![O, Block::Refract, O]]).unwrap();
        let segments = trace(&grid, &[Ray::new(1, 0, 1, 1)]);
        let expected = vec![
            Segment::new(1, 0, 2, 1),
            // through the splitter
            Segment::new(2, 1, 3, 2),
            // reflected back into the first cell
            Segment::new(2, 1, 1, 2),
        ];
        assert_eq!(sorted(segments), sorted(expected));
    }

    #[test]
    fn test_beam_circling_inside_mirrors_terminates() {
        use Block::FixedReflect as M;
        let grid = Grid::from_rows(vec![vec![M, M, M], vec![M, O, M], vec![M, M, M]]).unwrap();
        let segments = trace(&grid, &[Ray::new(3, 2, 1, 1)]);
        let expected = vec![
            Segment::new(3, 2, 4, 3),
            Segment::new(4, 3, 3, 4),
            Segment::new(3, 4, 2, 3),
            Segment::new(2, 3, 3, 2),
        ];
        assert_eq!(sorted(segments), sorted(expected));
    }

    #[test]
    fn test_beam_leaving_the_board_emits_nothing() {
        let grid = Grid::from_rows(vec![vec![O, O]]).unwrap();
        assert!(trace(&grid, &[Ray::new(0, 1, -1, 1)]).is_empty());
        assert!(trace(&grid, &[Ray::new(3, 0, 1, -1)]).is_empty());
    }

    #[test]
    fn test_no_targets_are_trivially_covered() {
        assert!(covers_targets(&[], &[]));
    }

    fn any_grid() -> impl Strategy<Value = Grid> {
        (1usize..=4, 1usize..=4).prop_flat_map(|(width, height)| {
            proptest::collection::vec(proptest::sample::select(Block::ALL.to_vec()), width * height)
                .prop_map(move |cells| {
                    Grid::from_rows(cells.chunks(width).map(<[Block]>::to_vec).collect()).unwrap()
                })
        })
    }

    fn any_sources(grid: &Grid) -> impl Strategy<Value = Vec<Ray>> {
        let max_x = 2 * grid.width() as i32;
        let max_y = 2 * grid.height() as i32;
        let direction = proptest::sample::select(vec![-1, 1]);
        proptest::collection::vec(
            (0..=max_x, 0..=max_y, direction.clone(), direction).prop_map(|(x, y, vx, vy)| {
                // lasers start on a wall midpoint, never on a cell corner
                let x = if (x + y) % 2 == 0 { if x > 0 { x - 1 } else { x + 1 } } else { x };
                Ray::new(x, y, vx, vy)
            }),
            1..=3,
        )
    }

    fn grid_and_sources() -> impl Strategy<Value = (Grid, Vec<Ray>)> {
        any_grid().prop_flat_map(|grid| {
            let sources = any_sources(&grid);
            (Just(grid), sources)
        })
    }

    proptest! {
        #[test]
        fn prop_trace_is_deterministic((grid, sources) in grid_and_sources()) {
            let first = sorted(trace(&grid, &sources));
            let second = sorted(trace(&grid, &sources));
            prop_assert_eq!(first, second);
        }

        #[test]
        fn prop_trace_ignores_source_order((grid, sources) in grid_and_sources()) {
            let forward: FxHashSet<Segment> = trace(&grid, &sources).into_iter().collect();
            let reversed_sources: Vec<Ray> = sources.iter().rev().copied().collect();
            let backward: FxHashSet<Segment> = trace(&grid, &reversed_sources).into_iter().collect();
            prop_assert_eq!(forward, backward);
        }

        #[test]
        fn prop_segments_are_unit_diagonals_inside_the_board((grid, sources) in grid_and_sources()) {
            let max_x = 2 * grid.width() as i32;
            let max_y = 2 * grid.height() as i32;
            for segment in trace(&grid, &sources) {
                prop_assert_eq!((segment.x0 - segment.x1).abs(), 1);
                prop_assert_eq!((segment.y0 - segment.y1).abs(), 1);
                prop_assert!((0..=max_x).contains(&segment.x1));
                prop_assert!((0..=max_y).contains(&segment.y1));
            }
        }
    }
}
