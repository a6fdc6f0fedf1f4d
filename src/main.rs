//! # dlx-solver
//!
//! A command-line Sudoku solver built on Knuth's Dancing Links.
//!
//! Puzzles travel as nine lines of nine cells, `.` for a blank and `1`-`9`
//! for a given:
//!
//! ```sh
//! # Solve a puzzle file directly
//! dlx-solver puzzle.txt
//!
//! # Solve a puzzle passed inline
//! dlx-solver text --input "$(cat puzzle.txt)"
//!
//! # Solve every puzzle file under a directory
//! dlx-solver dir --path puzzles/
//!
//! # Count every completion instead of stopping at the first
//! dlx-solver file --path puzzle.txt --enumerate
//! ```
//!
//! Common options cover verification of the solved grid (`--verify`), a
//! statistics table with memory figures (`--stats`), the column-selection
//! heuristic (`--selection`) and debug output (`--debug`).

use clap::{Args, CommandFactory, Parser, Subcommand};
use dlx_solver::dlx::column_selection::{ColumnSelection, FirstActive, MinCount, Random};
use dlx_solver::dlx::search::SearchStats;
use dlx_solver::sudoku::error::SolveError;
use dlx_solver::sudoku::grid::Grid;
use dlx_solver::sudoku::solver::{CANDIDATES, COLUMNS, SudokuSolver};
use itertools::Itertools;
use rustc_hash::FxHashSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tikv_jemalloc_ctl::{epoch, stats};

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

/// Defines the command-line interface for the solver.
///
/// Uses `clap` for parsing arguments.
#[derive(Parser, Debug)]
#[command(name = "dlx-solver", version, about = "A Sudoku solver built on Dancing Links")]
struct Cli {
    /// An optional global path argument. If provided without a subcommand,
    /// it's treated as the path to a puzzle file to solve.
    #[arg(global = true)]
    path: Option<PathBuf>,

    /// Specifies the subcommand to execute (e.g. `file`, `text`, `dir`).
    #[clap(subcommand)]
    command: Option<Commands>,

    /// Common options applicable to all commands.
    #[command(flatten)]
    common: CommonOptions,
}

/// Enumerates the available subcommands for the solver.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Solve a puzzle file in the nine-line grid layout.
    File {
        /// Path to the puzzle file.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve a puzzle provided as plain text.
    Text {
        /// Literal grid input as a string, nine lines of nine cells.
        #[arg(short, long)]
        input: String,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Solve every puzzle file under a directory.
    Dir {
        /// Path to the directory of puzzle files.
        #[arg(long)]
        path: PathBuf,

        /// Common options for this subcommand.
        #[command(flatten)]
        common: CommonOptions,
    },

    /// Generate shell completion scripts.
    Completions {
        /// The shell to generate completions for.
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Defines common command-line options shared across different subcommands.
#[derive(Args, Debug, Default, Clone)]
struct CommonOptions {
    /// Enable debug output, printing the parsed grid before solving.
    #[arg(short, long, default_value_t = false)]
    debug: bool,

    /// Check the solved grid against the Sudoku rules and the original clues.
    #[arg(short, long, default_value_t = true)]
    verify: bool,

    /// Enable printing of search statistics and memory usage after solving.
    #[arg(short, long, default_value_t = true)]
    stats: bool,

    /// Enable printing of the solved grid.
    #[arg(short, long, default_value_t = true)]
    print_solution: bool,

    /// Column-selection heuristic used by the search.
    #[arg(long, value_enum, default_value_t = SelectionType::MinCount)]
    selection: SelectionType,

    /// Backtrack through every completion and report the count instead of
    /// stopping at the first solution.
    #[arg(short, long, default_value_t = false)]
    enumerate: bool,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
enum SelectionType {
    /// Fewest live candidate rows first.
    #[default]
    MinCount,
    /// First active column in ring order.
    First,
    /// Uniformly random active column.
    Random,
}

impl fmt::Display for SelectionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::MinCount => "min-count",
            Self::First => "first",
            Self::Random => "random",
        })
    }
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::File { path, common }) => {
            solve_file(&path, &common);
        }
        Some(Commands::Text { input, common }) => {
            let started = Instant::now();
            match input.parse::<Grid>() {
                Ok(grid) => {
                    solve_and_report(&grid, &common, None, started.elapsed());
                }
                Err(e) => {
                    eprintln!("Error parsing puzzle text: {e}");
                    std::process::exit(1);
                }
            }
        }
        Some(Commands::Dir { path, common }) => solve_dir(&path, &common),
        Some(Commands::Completions { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            clap_complete::generate(shell, &mut cmd, name, &mut std::io::stdout());
        }
        None => match cli.path {
            Some(path) => {
                solve_file(&path, &cli.common);
            }
            None => {
                eprintln!("No command provided. Use --help for more information.");
                std::process::exit(1);
            }
        },
    }
}

/// Reads, parses and solves a single puzzle file.
fn solve_file(path: &Path, common: &CommonOptions) -> bool {
    let started = Instant::now();
    let grid = match read_grid(path) {
        Some(grid) => grid,
        None => return false,
    };
    let label = path.display().to_string();
    solve_and_report(&grid, common, Some(&label), started.elapsed())
}

/// Solves every file under `path`, then prints a summary.
fn solve_dir(path: &Path, common: &CommonOptions) {
    let files = walkdir::WalkDir::new(path)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|entry| entry.file_type().is_file())
        .map(walkdir::DirEntry::into_path)
        .sorted()
        .collect_vec();

    let started = Instant::now();
    let mut solved = 0_usize;
    for file in &files {
        if solve_file(file, common) {
            solved += 1;
        }
    }

    println!(
        "\nSolved {solved}/{} puzzles in {:.3}s",
        files.len(),
        started.elapsed().as_secs_f64()
    );
}

fn read_grid(path: &Path) -> Option<Grid> {
    let text = match std::fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) => {
            eprintln!("Error reading {}: {e}", path.display());
            return None;
        }
    };
    match text.parse::<Grid>() {
        Ok(grid) => Some(grid),
        Err(e) => {
            eprintln!("Error parsing {}: {e}", path.display());
            None
        }
    }
}

/// Solves a parsed grid and reports results, statistics and verification.
/// Returns whether the puzzle was solved.
fn solve_and_report(
    grid: &Grid,
    common: &CommonOptions,
    label: Option<&str>,
    parse_time: Duration,
) -> bool {
    if let Some(name) = label {
        println!("Solving: {name}");
    }

    if common.debug {
        println!("{grid}");
        println!("Clues: {}", grid.clues().count());
        println!("Selection: {}", common.selection);
    }

    epoch::advance().unwrap();

    let started = Instant::now();
    let (outcome, search_stats) = run_solver(grid, common);
    let elapsed = started.elapsed();

    epoch::advance().unwrap();
    let allocated_bytes = stats::allocated::mib().unwrap().read().unwrap();
    let resident_bytes = stats::resident::mib().unwrap().read().unwrap();
    let allocated_mib = allocated_bytes as f64 / (1024.0 * 1024.0);
    let resident_mib = resident_bytes as f64 / (1024.0 * 1024.0);

    let solved = match &outcome {
        Ok(solutions) => {
            if common.verify {
                verify_solutions(grid, solutions);
            }
            if common.enumerate {
                println!("Solutions: {}", solutions.len());
            }
            if common.print_solution {
                if let Some(first) = solutions.first() {
                    print!("{first}");
                }
            }
            println!("SOLVED");
            true
        }
        Err(e) => {
            println!("{e}");
            println!("NO SOLUTION");
            false
        }
    };

    if common.stats {
        print_stats(parse_time, elapsed, &search_stats, allocated_mib, resident_mib);
    }

    solved
}

/// Runs the solver for the selected heuristic and mode.
fn run_solver(grid: &Grid, common: &CommonOptions) -> (Result<Vec<Grid>, SolveError>, SearchStats) {
    match common.selection {
        SelectionType::MinCount => run_with(grid, MinCount, common.enumerate),
        SelectionType::First => run_with(grid, FirstActive, common.enumerate),
        SelectionType::Random => run_with(grid, Random::new(), common.enumerate),
    }
}

fn run_with<S: ColumnSelection>(
    grid: &Grid,
    selector: S,
    enumerate: bool,
) -> (Result<Vec<Grid>, SolveError>, SearchStats) {
    let mut solver = match SudokuSolver::with_selector(grid, selector) {
        Ok(solver) => solver,
        Err(e) => return (Err(e), SearchStats::default()),
    };

    if enumerate {
        let solutions = solver.enumerate();
        let search_stats = solver.stats();
        if solutions.is_empty() {
            (Err(SolveError::Unsolvable), search_stats)
        } else {
            (Ok(solutions), search_stats)
        }
    } else {
        let outcome = solver.solve().map(|solution| vec![solution]);
        (outcome, solver.stats())
    }
}

/// Verifies solved grids against the rules and the original clues.
///
/// Prints whether the verification was successful; panics on failure.
fn verify_solutions(original: &Grid, solutions: &[Grid]) {
    for solution in solutions {
        let ok = verify_solution(original, solution);
        println!("Verified: {ok:?}");
        if !ok {
            panic!("Solution failed verification!");
        }
    }
    if solutions.len() > 1 {
        let distinct: FxHashSet<&Grid> = solutions.iter().collect();
        if distinct.len() != solutions.len() {
            panic!("Enumeration produced duplicate solutions!");
        }
    }
}

fn verify_solution(original: &Grid, solution: &Grid) -> bool {
    solution.is_solved()
        && original
            .clues()
            .all(|(row, col, digit)| solution.digit(row, col) == Some(digit))
}

/// Helper function to print a single statistic line in a formatted table row.
fn stat_line(label: &str, value: impl fmt::Display) {
    println!("|  {label:<28} {value:>18}  |");
}

/// Helper function to print a statistic line that includes a rate (value/second).
fn stat_line_with_rate(label: &str, value: usize, elapsed: f64) {
    let rate = if elapsed > 0.0 {
        value as f64 / elapsed
    } else {
        0.0
    };
    println!("|  {label:<20} {value:>12} ({rate:>9.0}/sec)  |");
}

/// Prints a summary of problem and search statistics.
fn print_stats(
    parse_time: Duration,
    elapsed: Duration,
    s: &SearchStats,
    allocated: f64,
    resident: f64,
) {
    let elapsed_secs = elapsed.as_secs_f64();

    println!("\n=======================[ Problem Statistics ]========================");
    stat_line("Parse time (s)", format!("{:.3}", parse_time.as_secs_f64()));
    stat_line("Columns", COLUMNS);
    stat_line("Candidate rows", CANDIDATES);

    println!("========================[ Search Statistics ]========================");
    stat_line_with_rate("Decisions", s.decisions, elapsed_secs);
    stat_line_with_rate("Backtracks", s.backtracks, elapsed_secs);
    stat_line("Max depth", s.max_depth);
    stat_line("Solutions", s.solutions);
    stat_line("Memory usage (MiB)", format!("{allocated:.2}"));
    stat_line("Resident memory (MiB)", format!("{resident:.2}"));
    stat_line("CPU time (s)", format!("{elapsed_secs:.3}"));
    println!("=====================================================================");
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOLVED: &str = "\
534678912
672195348
198342567
859761423
426853791
713924856
961537284
287419635
345286179
";

    #[test]
    fn test_verify_solution_accepts_consistent_grid() {
        let solution: Grid = SOLVED.parse().unwrap();
        let mut puzzle = solution;
        let mut cells: [[u8; 9]; 9] = puzzle.into();
        cells[0][0] = 0;
        cells[4][4] = 0;
        puzzle = cells.into();
        assert!(verify_solution(&puzzle, &solution));
    }

    #[test]
    fn test_verify_solution_rejects_changed_clue() {
        let solution: Grid = SOLVED.parse().unwrap();
        let mut cells: [[u8; 9]; 9] = solution.into();
        cells[0][0] = 4; // contradicts the original 5
        let tampered: Grid = cells.into();
        assert!(!verify_solution(&tampered, &solution));
    }

    #[test]
    fn test_verify_solution_rejects_incomplete_grid() {
        let solution: Grid = SOLVED.parse().unwrap();
        let mut cells: [[u8; 9]; 9] = solution.into();
        cells[8][8] = 0;
        let partial: Grid = cells.into();
        assert!(!verify_solution(&solution, &partial));
    }

    #[test]
    fn test_selection_type_display_matches_value_enum() {
        assert_eq!(SelectionType::MinCount.to_string(), "min-count");
        assert_eq!(SelectionType::First.to_string(), "first");
        assert_eq!(SelectionType::Random.to_string(), "random");
    }
}
