//! Lazors Puzzle Solver
//!
//! Loads `.bff` boards, searches for a placement of each board's movable
//! blocks that sends the lasers through every target, and reports how long
//! each search took.

use std::cmp::Reverse;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use clap::{Parser, Subcommand};
use log::debug;

use lazors::bff;
use lazors::grid::format_board;
use lazors::solver::{COMBINATION_LIMIT, SMALL_BOARD_CELLS};
use lazors::tracer::endpoints;
use lazors::{Board, SolveOutcome, SolverPolicy};

/// Number of boards listed in the slowest-boards summary.
const SLOWEST_SHOWN: usize = 5;

/// Solves Lazors laser puzzles stored as `.bff` files.
#[derive(Parser)]
#[command(name = "lazors")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve boards, hardest first, and print timings.
    Solve {
        /// Board files to solve.
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Candidate limit for the exhaustive search (0 = unlimited).
        #[arg(long, default_value_t = COMBINATION_LIMIT as u64)]
        limit: u64,
        /// Boards with fewer cells than this try the exhaustive search first.
        #[arg(long, default_value_t = SMALL_BOARD_CELLS)]
        small_board_cells: usize,
        /// Shuffle exhaustive candidates with this seed (needs a nonzero limit).
        #[arg(long)]
        seed: Option<u64>,
        /// Write `<name>.txt` renderings of solved boards here.
        #[arg(long)]
        output_dir: Option<PathBuf>,
    },
    /// Print the estimated number of candidate placements per board.
    Estimate {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Trace a board as loaded and print its laser segments.
    Trace { file: PathBuf },
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let all_loaded = match cli.command {
        Command::Solve {
            files,
            limit,
            small_board_cells,
            seed,
            output_dir,
        } => {
            let policy = SolverPolicy {
                small_board_cells,
                combination_limit: u128::from(limit),
                shuffle_seed: seed,
            };
            run_solve(&files, &policy, output_dir.as_deref())
        }
        Command::Estimate { files } => run_estimate(&files),
        Command::Trace { file } => run_trace(&file),
    };

    if all_loaded {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

/// Loads every file, reporting and skipping the ones that fail. Boards come
/// back hardest first. The flag is false if any file failed to load.
fn load_boards(files: &[PathBuf]) -> (Vec<Board>, bool) {
    let mut boards = Vec::with_capacity(files.len());
    let mut all_loaded = true;

    for path in files {
        match bff::read_bff(path) {
            Ok(board) => boards.push(board),
            Err(e) => {
                eprintln!("Failed to load {}: {}", path.display(), e);
                all_loaded = false;
            }
        }
    }

    boards.sort_by_key(|board| Reverse(board.estimated_combination_count()));
    (boards, all_loaded)
}

/// Solves each board in turn and prints a timing summary.
fn run_solve(files: &[PathBuf], policy: &SolverPolicy, output_dir: Option<&Path>) -> bool {
    let (boards, all_loaded) = load_boards(files);

    if let Some(dir) = output_dir {
        if let Err(e) = fs::create_dir_all(dir) {
            eprintln!("Failed to create {}: {}", dir.display(), e);
        }
    }

    let mut timings = Vec::with_capacity(boards.len());
    for board in &boards {
        let start = Instant::now();
        let outcome = lazors::solve_with(board, policy);
        let elapsed = start.elapsed();

        println!("{}", describe_outcome(board, &outcome, elapsed));
        if let SolveOutcome::Solved { board: solution, .. } = &outcome {
            print!("{}", format_board(solution));
            if let Some(dir) = output_dir {
                let path = dir.join(format!("{}.txt", solution.name()));
                match fs::write(&path, format_board(solution)) {
                    Ok(()) => debug!("wrote {}", path.display()),
                    Err(e) => eprintln!("Failed to write {}: {}", path.display(), e),
                }
            }
        }
        println!();

        timings.push((board.name().to_string(), elapsed));
    }

    println!("{}", summarize(&timings));
    all_loaded
}

/// Prints estimated candidate counts, largest first.
fn run_estimate(files: &[PathBuf]) -> bool {
    let (boards, all_loaded) = load_boards(files);
    for board in &boards {
        println!("{}: {} combinations", board, board.estimated_combination_count());
    }
    all_loaded
}

/// Traces a board without placing anything.
fn run_trace(file: &Path) -> bool {
    let mut board = match bff::read_bff(file) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("Failed to load {}: {}", file.display(), e);
            return false;
        }
    };

    let mut segments = board.retrace().to_vec();
    segments.sort();
    for segment in &segments {
        let (x0, y0) = segment.start();
        let (x1, y1) = segment.end();
        println!("({}, {}) -> ({}, {})", x0, y0, x1, y1);
    }

    let reached = endpoints(&segments);
    for &(x, y) in board.targets() {
        let mark = if reached.contains(&(x, y)) { "hit" } else { "missed" };
        println!("target ({}, {}): {}", x, y, mark);
    }
    print!("{}", format_board(&board));
    true
}

fn describe_outcome(board: &Board, outcome: &SolveOutcome, elapsed: Duration) -> String {
    let secs = elapsed.as_secs_f64();
    match outcome {
        SolveOutcome::Solved { report, .. } => format!(
            "{}: solved in {:.3} s ({:?}, {} candidates)",
            board, secs, report.strategy, report.candidates_tested
        ),
        SolveOutcome::NoSolution { report } => format!(
            "{}: no solution in {:.3} s ({:?}, {} candidates)",
            board, secs, report.strategy, report.candidates_tested
        ),
        SolveOutcome::TooManyCombinations { estimated, limit } => format!(
            "{}: gave up, {} combinations over the limit of {}",
            board, estimated, limit
        ),
    }
}

/// Total, min/avg/max and the slowest boards when there are enough of them.
fn summarize(timings: &[(String, Duration)]) -> String {
    let durations = timings.iter().map(|(_, elapsed)| *elapsed);
    let (Some(min), Some(max)) = (durations.clone().min(), durations.clone().max()) else {
        return "0 boards".to_string();
    };
    let total: Duration = durations.sum();
    let avg = total.as_secs_f64() / timings.len() as f64;

    let mut lines = vec![format!(
        "{} boards in {:.3} s (min {:.3} / avg {:.3} / max {:.3})",
        timings.len(),
        total.as_secs_f64(),
        min.as_secs_f64(),
        avg,
        max.as_secs_f64()
    )];

    if timings.len() > SLOWEST_SHOWN {
        let mut slowest: Vec<&(String, Duration)> = timings.iter().collect();
        slowest.sort_by_key(|(_, elapsed)| Reverse(*elapsed));
        lines.push("slowest:".to_string());
        for (name, elapsed) in slowest.into_iter().take(SLOWEST_SHOWN) {
            lines.push(format!("  {}: {:.3} s", name, elapsed.as_secs_f64()));
        }
    }

    lines.join("\n")
}
