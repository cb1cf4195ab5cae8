//! Small built-in puzzles shared by the tests and benchmarks.

use crate::block::Block;
use crate::board::Board;
use crate::error::Result;

/// 3x3 board with a fixed opaque corner and three mirrors to place.
///
/// Known solution:
/// ```text
/// a a o
/// o o a
/// B o o
/// ```
pub fn sample_board() -> Result<Board> {
    let mut board = Board::new("sample", 3, 3)?;
    board.set_cell(0, 2, Block::FixedOpaque)?;
    board.add_to_pool(Block::Reflect, 3)?;
    board.add_laser_source(5, 0, -1, 1)?;
    board.add_laser_source(5, 6, -1, -1)?;
    board.add_target(4, 1)?;
    board.add_target(0, 3)?;
    Ok(board)
}

/// 1x1 fixed opaque board whose only target is unreachable.
pub fn impossible_board() -> Result<Board> {
    let mut board = Board::new("impossible", 1, 1)?;
    board.set_cell(0, 0, Block::FixedOpaque)?;
    board.add_laser_source(0, 1, 1, 1)?;
    board.add_target(2, 1)?;
    Ok(board)
}

/// 3x1 board needing a splitter at (1, 0) with the opaque block parked at
/// (2, 0); no other placement reaches both targets.
pub fn two_type_board() -> Result<Board> {
    let mut board = Board::new("split", 3, 1)?;
    board.add_to_pool(Block::Opaque, 1)?;
    board.add_to_pool(Block::Refract, 1)?;
    board.add_laser_source(1, 0, 1, 1)?;
    board.add_target(1, 2)?;
    board.add_target(3, 2)?;
    Ok(board)
}

/// 5x3 board, at the default size threshold for the pruned strategy.
///
/// The laser enters the top-left cell heading down-right; the only mirror
/// position that also reaches the bottom-left target is (2, 1), and the
/// opaque block must stay off the bounced path.
pub fn wide_board() -> Result<Board> {
    let mut board = Board::new("wide", 5, 3)?;
    board.set_cell(4, 0, Block::FixedBlank)?;
    board.set_cell(4, 2, Block::FixedBlank)?;
    board.add_to_pool(Block::Reflect, 1)?;
    board.add_to_pool(Block::Opaque, 1)?;
    board.add_laser_source(1, 0, 1, 1)?;
    board.add_target(4, 3)?;
    board.add_target(1, 6)?;
    Ok(board)
}
