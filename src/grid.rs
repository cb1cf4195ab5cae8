//! Cell grid for Lazors boards.
//!
//! The grid is stored as a flat row-major vector addressed by cell
//! coordinates `(x, y)` with the origin at the top-left cell.

use crate::block::Block;
use crate::board::Board;
use crate::error::{BoardError, Result};
use crate::tracer;

/// Cell coordinates `(x, y)`, one unit per block.
pub type Cell = (usize, usize);

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    width: usize,
    height: usize,
    cells: Vec<Block>,
}

impl Grid {
    /// Creates a `width x height` grid with every cell set to [`Block::Blank`].
    pub fn new(width: usize, height: usize) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            cells: vec![Block::Blank; width * height],
        })
    }

    /// Builds a grid from rows listed top to bottom.
    pub fn from_rows(rows: Vec<Vec<Block>>) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if width == 0 || height == 0 {
            return Err(BoardError::EmptyDimensions { width, height });
        }

        let mut cells = Vec::with_capacity(width * height);
        for (row_index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(BoardError::RaggedRows {
                    row: row_index,
                    found: row.len(),
                    expected: width,
                });
            }
            cells.extend(row);
        }

        Ok(Self {
            width,
            height,
            cells,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Converts cell coordinates to a linear index (row-major).
    #[inline(always)]
    fn cell_to_idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Converts a linear index back to cell coordinates.
    #[inline(always)]
    fn idx_to_cell(&self, cell_index: usize) -> Cell {
        (cell_index % self.width, cell_index / self.width)
    }

    fn check_bounds(&self, x: usize, y: usize) -> Result<()> {
        if x < self.width && y < self.height {
            Ok(())
        } else {
            Err(BoardError::CellOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            })
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Result<Block> {
        self.check_bounds(x, y)?;
        Ok(self.cells[self.cell_to_idx(x, y)])
    }

    pub fn set(&mut self, x: usize, y: usize, block: Block) -> Result<()> {
        self.check_bounds(x, y)?;
        let idx = self.cell_to_idx(x, y);
        self.cells[idx] = block;
        Ok(())
    }

    /// Signed lookup used while tracing; `None` means the cell is off the board.
    #[inline]
    pub(crate) fn block_at(&self, x: i32, y: i32) -> Option<Block> {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return None;
        }
        Some(self.cells[self.cell_to_idx(x as usize, y as usize)])
    }

    /// Writes a block at a position taken from [`Grid::available_positions`].
    #[inline]
    pub(crate) fn place(&mut self, (x, y): Cell, block: Block) {
        let idx = self.cell_to_idx(x, y);
        self.cells[idx] = block;
    }

    /// All cells holding a non-fixed block, in row-major order.
    pub fn available_positions(&self) -> Vec<Cell> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, block)| !block.is_fixed())
            .map(|(idx, _)| self.idx_to_cell(idx))
            .collect()
    }

    /// Resets every non-fixed cell to [`Block::Blank`].
    pub fn clear_movable(&mut self) {
        for block in self.cells.iter_mut().filter(|block| !block.is_fixed()) {
            *block = Block::Blank;
        }
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[Block]> {
        self.cells.chunks(self.width)
    }
}

/// Display symbol for a block.
///
/// Fixed and blank cells use their `.bff` symbol; placed movable blocks are
/// shown in lower case so a solution stands out from the puzzle.
pub const fn block_symbol(block: Block) -> char {
    match block {
        Block::Blank => 'o',
        Block::FixedBlank => 'x',
        Block::FixedReflect => 'A',
        Block::FixedOpaque => 'B',
        Block::FixedRefract => 'C',
        Block::Reflect => 'a',
        Block::Opaque => 'b',
        Block::Refract => 'c',
    }
}

/// Formats a board as a human-readable string.
///
/// One line per grid row; when the board carries traced segments a final
/// line reports how many targets the lasers reach.
pub fn format_board(board: &Board) -> String {
    let mut output = format!(
        "{} ({}x{})\n",
        board.name(),
        board.width(),
        board.height()
    );

    for row in board.grid().rows() {
        let line: Vec<String> = row.iter().map(|&b| block_symbol(b).to_string()).collect();
        output.push_str(&line.join(" "));
        output.push('\n');
    }

    if let Some(segments) = board.laser_segments() {
        let reached = tracer::endpoints(segments);
        let hit = board
            .targets()
            .iter()
            .filter(|target| reached.contains(target))
            .count();
        output.push_str(&format!("targets hit: {}/{}\n", hit, board.targets().len()));
    }

    output
}
