use thiserror::Error;

use crate::block::Block;

pub type Result<T> = std::result::Result<T, BoardError>;

/// Invariant violations rejected at the board mutator boundary.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board dimensions must be positive, got {width}x{height}")]
    EmptyDimensions { width: usize, height: usize },

    #[error("grid rows have mismatched widths: row {row} has {found} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("cell ({x}, {y}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("point ({x}, {y}) is outside the point range 0..={max_x} x 0..={max_y}")]
    PointOutOfBounds {
        x: i32,
        y: i32,
        max_x: i32,
        max_y: i32,
    },

    #[error("laser direction ({vx}, {vy}) is not a nonzero 45 degree diagonal")]
    InvalidDirection { vx: i32, vy: i32 },

    #[error("laser segment ({x0}, {y0}) -> ({x1}, {y1}) is not a unit diagonal step")]
    InvalidSegment { x0: i32, y0: i32, x1: i32, y1: i32 },

    #[error("{block} cannot be part of the movable pool")]
    IllegalPoolBlock { block: Block },

    #[error("{pool} movable blocks do not fit into {positions} open cells")]
    PoolTooLarge { pool: usize, positions: usize },
}

/// Failures while loading or saving a `.bff` puzzle file.
#[derive(Debug, Error)]
pub enum BffError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("line {line}: {message}")]
    Syntax { line: usize, message: String },

    #[error("missing {0} information")]
    Missing(&'static str),

    #[error(transparent)]
    Board(#[from] BoardError),
}

impl BffError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }
}
