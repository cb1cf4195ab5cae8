//! Reading and writing `.bff` puzzle files.
//!
//! Text format, one directive per line (`#` starts a comment):
//! - `GRID START` / `GRID STOP` around rows of space-separated symbols:
//!   `o` open, `x` no block allowed, `A` fixed reflect, `B` fixed opaque,
//!   `C` fixed refract
//! - `A n`, `B n`, `C n`: `n` movable reflect, opaque or refract blocks
//! - `L x y vx vy`: laser source in point coordinates
//! - `P x y`: target point

use std::fmt::Write as _;
use std::fs;
use std::path::Path;

use log::debug;

use crate::block::Block;
use crate::board::Board;
use crate::error::BffError;
use crate::grid::{block_symbol, Grid};

pub type Result<T> = std::result::Result<T, BffError>;

fn grid_block(symbol: &str) -> Option<Block> {
    match symbol {
        "o" => Some(Block::Blank),
        "x" => Some(Block::FixedBlank),
        "A" => Some(Block::FixedReflect),
        "B" => Some(Block::FixedOpaque),
        "C" => Some(Block::FixedRefract),
        _ => None,
    }
}

fn integers<const N: usize>(fields: &[&str], line: usize, what: &str) -> Result<[i32; N]> {
    if fields.len() != N {
        return Err(BffError::syntax(
            line,
            format!("{what} needs {N} integers, found {}", fields.len()),
        ));
    }
    let mut values = [0; N];
    for (value, field) in values.iter_mut().zip(fields) {
        *value = field
            .parse()
            .map_err(|_| BffError::syntax(line, format!("{what}: '{field}' is not an integer")))?;
    }
    Ok(values)
}

/// Loads a board from a `.bff` file, named after the file stem.
pub fn read_bff(path: impl AsRef<Path>) -> Result<Board> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let name = path
        .file_stem()
        .map_or_else(|| "board".to_string(), |stem| stem.to_string_lossy().into_owned());
    let board = parse_bff(&name, &text)?;
    debug!("[bff] loaded {} from {}", board, path.display());
    Ok(board)
}

/// Parses `.bff` text into a validated board.
pub fn parse_bff(name: &str, text: &str) -> Result<Board> {
    let mut rows: Vec<Vec<Block>> = Vec::new();
    let mut pool: Vec<(Block, usize)> = Vec::new();
    let mut lasers: Vec<[i32; 4]> = Vec::new();
    let mut targets: Vec<[i32; 2]> = Vec::new();
    let mut in_grid = false;

    for (index, raw) in text.lines().enumerate() {
        let line_no = index + 1;
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }

        match line {
            "GRID START" => {
                if in_grid {
                    return Err(BffError::syntax(line_no, "Too many GRID START"));
                }
                if !rows.is_empty() {
                    return Err(BffError::syntax(
                        line_no,
                        "Only one grid can be defined in a BFF file",
                    ));
                }
                in_grid = true;
                continue;
            }
            "GRID STOP" => {
                if !in_grid || rows.is_empty() {
                    return Err(BffError::syntax(
                        line_no,
                        "GRID STOP before a grid has been defined",
                    ));
                }
                in_grid = false;
                continue;
            }
            _ => {}
        }

        let fields: Vec<&str> = line.split_whitespace().collect();

        if in_grid {
            let row = fields
                .iter()
                .map(|symbol| grid_block(symbol))
                .collect::<Option<Vec<Block>>>()
                .ok_or_else(|| BffError::syntax(line_no, "Unknown block symbol"))?;
            if let Some(first) = rows.first() {
                if first.len() != row.len() {
                    return Err(BffError::syntax(line_no, "Grid width mismatches."));
                }
            }
            rows.push(row);
            continue;
        }

        match fields[0] {
            "A" | "B" | "C" => {
                let block = grid_block(fields[0]).map(Block::unfix);
                let count = match &fields[1..] {
                    [count] => count.parse::<usize>().ok(),
                    _ => None,
                };
                match (block, count) {
                    (Some(block), Some(count)) => pool.push((block, count)),
                    _ => {
                        return Err(BffError::syntax(line_no, "Error syntax for available block"))
                    }
                }
            }
            "L" => lasers.push(integers::<4>(&fields[1..], line_no, "laser")?),
            "P" => targets.push(integers::<2>(&fields[1..], line_no, "target point")?),
            _ => {
                return Err(BffError::syntax(line_no, format!("Unknown syntax: {line}")));
            }
        }
    }

    if rows.is_empty() {
        return Err(BffError::Missing("grid"));
    }
    if pool.is_empty() {
        return Err(BffError::Missing("available block"));
    }
    if lasers.is_empty() {
        return Err(BffError::Missing("laser source"));
    }
    if targets.is_empty() {
        return Err(BffError::Missing("target point"));
    }

    let mut board = Board::from_grid(name, Grid::from_rows(rows)?);
    for (block, count) in pool {
        board.add_to_pool(block, count)?;
    }
    board.validate()?;
    for [x, y, vx, vy] in lasers {
        board.add_laser_source(x, y, vx, vy)?;
    }
    for [x, y] in targets {
        board.add_target(x, y)?;
    }
    Ok(board)
}

/// Renders the unsolved puzzle of `board` in `.bff` syntax.
///
/// Placed movable blocks are cleared, so a solved board writes back the
/// puzzle it came from.
pub fn to_bff_string(board: &Board) -> String {
    let mut puzzle = board.grid().clone();
    puzzle.clear_movable();

    let mut output = String::from("GRID START\n");
    for row in puzzle.rows() {
        let symbols: Vec<String> = row.iter().map(|&b| block_symbol(b).to_string()).collect();
        output.push_str(&symbols.join(" "));
        output.push('\n');
    }
    output.push_str("GRID STOP\n\n");

    for block in [Block::Reflect, Block::Opaque, Block::Refract] {
        let count = board.pool_count(block);
        if count > 0 {
            let _ = writeln!(output, "{} {}", block_symbol(block.fix()), count);
        }
    }
    output.push('\n');

    for source in board.laser_sources() {
        let _ = writeln!(
            output,
            "L {} {} {} {}",
            source.x, source.y, source.vx, source.vy
        );
    }
    output.push('\n');

    for (x, y) in board.targets() {
        let _ = writeln!(output, "P {x} {y}");
    }

    output
}

/// Saves the unsolved puzzle of `board` to `path`.
pub fn write_bff(board: &Board, path: impl AsRef<Path>) -> Result<()> {
    fs::write(path, to_bff_string(board))?;
    Ok(())
}
