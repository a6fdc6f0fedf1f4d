//! Reduction of a 9x9 puzzle to exact cover and back.
//!
//! Every candidate placement of a digit in a cell becomes one matrix row that
//! covers four constraint columns: the cell holds something, the row holds the
//! digit, the column holds the digit and the box holds the digit. Givens are
//! applied before the search by covering their columns as if the search had
//! chosen them; the solved grid is recovered by walking the 81 chosen rows
//! back to cell and digit.

use crate::dlx::column_selection::{ColumnSelection, MinCount};
use crate::dlx::matrix::{ColumnId, Matrix, NodeIndex};
use crate::dlx::search::{Search, SearchStats, SolveMode};
use crate::sudoku::error::{Error, SolveError};
use crate::sudoku::grid::{BOX_SIDE, CELLS, Grid, SIDE};

/// Constraint columns of the 9x9 instance: one block of 81 per kind.
pub const COLUMNS: usize = 4 * CELLS;
/// Candidate rows of the 9x9 instance: every digit in every cell.
pub const CANDIDATES: usize = SIDE * CELLS;

const ROW_DIGIT: usize = CELLS;
const COL_DIGIT: usize = 2 * CELLS;
const BOX_DIGIT: usize = 3 * CELLS;

const fn cell_column(row: usize, col: usize) -> usize {
    SIDE * row + col
}

const fn row_digit_column(row: usize, digit: u8) -> usize {
    ROW_DIGIT + SIDE * row + (digit as usize - 1)
}

const fn col_digit_column(col: usize, digit: u8) -> usize {
    COL_DIGIT + SIDE * col + (digit as usize - 1)
}

const fn box_digit_column(row: usize, col: usize, digit: u8) -> usize {
    let box_index = row / BOX_SIDE * BOX_SIDE + col / BOX_SIDE;
    BOX_DIGIT + SIDE * box_index + (digit as usize - 1)
}

/// Builds the generic 9x9 exact-cover matrix: 324 columns, 729 candidate
/// rows, no clues applied yet.
fn build_matrix() -> Matrix {
    let mut matrix = Matrix::new(COLUMNS, CANDIDATES);
    for row in 0..SIDE {
        for col in 0..SIDE {
            for digit in 1..=SIDE as u8 {
                matrix.add_row([
                    cell_column(row, col),
                    row_digit_column(row, digit),
                    col_digit_column(col, digit),
                    box_digit_column(row, col, digit),
                ]);
            }
        }
    }
    matrix
}

/// Digit of the candidate row owning `cell_node`, read off the row-digit
/// column of its right neighbour.
fn candidate_digit(matrix: &Matrix, cell_node: NodeIndex) -> u8 {
    let column = matrix.constraint_of(matrix.right(cell_node));
    debug_assert!((ROW_DIGIT..COL_DIGIT).contains(&column));
    ((column - ROW_DIGIT) % SIDE) as u8 + 1
}

/// Applies the givens by covering their columns as if the search had chosen
/// them, returning the chosen cell nodes in clue order.
///
/// A given whose candidate row is no longer linked into the covered cell
/// column contradicts an earlier given and is reported, not dropped.
fn preload(matrix: &mut Matrix, grid: &Grid) -> Result<Vec<NodeIndex>, SolveError> {
    let mut given = Vec::with_capacity(CELLS);
    for (row, col, digit) in grid.clues() {
        let cell = cell_column(row, col);
        matrix.cover(cell);

        let header = matrix.header(ColumnId::Constraint(cell));
        let mut node = matrix.down(header);
        loop {
            if node == header {
                return Err(SolveError::Conflict {
                    row: row + 1,
                    col: col + 1,
                    digit,
                });
            }
            if candidate_digit(matrix, node) == digit {
                break;
            }
            node = matrix.down(node);
        }

        let mut mate = matrix.right(node);
        while mate != node {
            let column = matrix.constraint_of(mate);
            matrix.cover(column);
            mate = matrix.right(mate);
        }
        given.push(node);
    }
    Ok(given)
}

/// Turns 81 chosen rows back into a grid. Each row is walked left to its
/// cell-occupancy node, which names the cell; the right neighbour names the
/// digit. Callers only reach this after the search has succeeded.
fn decode(matrix: &Matrix, choices: &[NodeIndex]) -> Grid {
    debug_assert_eq!(choices.len(), CELLS);
    let mut grid = Grid::empty();
    for &chosen in choices {
        let mut node = chosen;
        while matrix.constraint_of(node) >= ROW_DIGIT {
            node = matrix.left(node);
        }
        let cell = matrix.constraint_of(node);
        grid.set(cell / SIDE, cell % SIDE, candidate_digit(matrix, node));
    }
    grid
}

/// A single-use solver for one puzzle.
///
/// The solver owns its matrix and choice stack; nothing is shared between
/// invocations, so repeated solves build a fresh `SudokuSolver` each time.
/// Construction builds the generic matrix and preloads the givens, which is
/// where contradictory clues surface.
#[derive(Debug)]
pub struct SudokuSolver<S: ColumnSelection = MinCount> {
    matrix: Matrix,
    given: Vec<NodeIndex>,
    selector: S,
    stats: SearchStats,
}

impl SudokuSolver<MinCount> {
    pub fn new(grid: &Grid) -> Result<Self, SolveError> {
        Self::with_selector(grid, MinCount)
    }
}

impl<S: ColumnSelection> SudokuSolver<S> {
    pub fn with_selector(grid: &Grid, selector: S) -> Result<Self, SolveError> {
        let mut matrix = build_matrix();
        let given = preload(&mut matrix, grid)?;
        Ok(Self {
            matrix,
            given,
            selector,
            stats: SearchStats::default(),
        })
    }

    /// Completes the assignment and returns the first solution found.
    pub fn solve(&mut self) -> Result<Grid, SolveError> {
        let mut search = Search::new(&mut self.matrix, &mut self.selector, SolveMode::First);
        for &row in &self.given {
            search.push_given(row);
        }
        search.run();
        self.stats = search.stats();
        let solutions = search.into_solutions();
        match solutions.first() {
            Some(choices) => Ok(decode(&self.matrix, choices)),
            None => Err(SolveError::Unsolvable),
        }
    }

    /// Backtracks through every complete assignment and returns them all.
    /// An unsolvable puzzle yields an empty vector.
    ///
    /// Enumerating a sparsely-clued grid visits an enormous solution space;
    /// the empty grid alone has billions of completions.
    pub fn enumerate(&mut self) -> Vec<Grid> {
        let mut search = Search::new(&mut self.matrix, &mut self.selector, SolveMode::Enumerate);
        for &row in &self.given {
            search.push_given(row);
        }
        search.run();
        self.stats = search.stats();
        let solutions = search.into_solutions();
        solutions
            .iter()
            .map(|choices| decode(&self.matrix, choices))
            .collect()
    }

    /// Counters from the most recent `solve` or `enumerate` call.
    #[must_use]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }
}

/// The whole boundary a host needs: puzzle text in, solved text out.
pub fn solve_text(input: &str) -> Result<String, Error> {
    let grid: Grid = input.parse()?;
    let mut solver = SudokuSolver::new(&grid)?;
    Ok(solver.solve()?.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dlx::column_selection::{FirstActive, Random};
    use rustc_hash::FxHashSet;

    const PUZZLE: &str = "\
53..7....
6..195...
.98....6.
8...6...3
4..8.3..1
7...2...6
.6....28.
...419..5
....8..79
";

    const SOLUTION: &str = "\
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

    fn solve_one(text: &str) -> Result<Grid, SolveError> {
        let grid: Grid = text.parse().unwrap();
        SudokuSolver::new(&grid)?.solve()
    }

    #[test]
    fn test_build_matrix_shape() {
        let matrix = build_matrix();
        assert_eq!(matrix.row_count(), CANDIDATES);
        assert_eq!(matrix.column_count(), COLUMNS);
        assert_eq!(matrix.node_count(), 1 + COLUMNS + 4 * CANDIDATES);
        // nine candidates everywhere: nine digits per cell, nine cells per
        // row, column and box for each digit
        for column in 0..COLUMNS {
            assert_eq!(matrix.count(column), 9);
        }
    }

    #[test]
    fn test_column_encoding_inverts() {
        for row in 0..SIDE {
            for col in 0..SIDE {
                for digit in 1..=9 {
                    let cell = cell_column(row, col);
                    assert_eq!((cell / SIDE, cell % SIDE), (row, col));
                    let rd = row_digit_column(row, digit);
                    assert_eq!(((rd - ROW_DIGIT) % SIDE) as u8 + 1, digit);
                    assert!(rd < COL_DIGIT);
                    assert!(box_digit_column(row, col, digit) < COLUMNS);
                }
            }
        }
    }

    #[test]
    fn test_classic_puzzle_solves() {
        let solved = solve_one(PUZZLE).unwrap();
        assert_eq!(solved.to_string(), SOLUTION);
    }

    #[test]
    fn test_empty_grid_solves_to_valid_grid() {
        let mut solver = SudokuSolver::new(&Grid::empty()).unwrap();
        let solved = solver.solve().unwrap();
        assert!(solved.is_solved());
        assert!(solver.stats().decisions >= CELLS);
    }

    #[test]
    fn test_near_complete_grid_is_uniquely_determined() {
        let solution: Grid = SOLUTION.parse().unwrap();
        let mut text = SOLUTION.replacen('5', ".", 1);
        assert!(text.starts_with('.'));
        let solved = solve_one(&text).unwrap();
        assert_eq!(solved, solution);

        // the blank is forced, so the search never backtracks
        text = SOLUTION.replacen('1', ".", 1);
        let grid: Grid = text.parse().unwrap();
        let mut solver = SudokuSolver::new(&grid).unwrap();
        assert_eq!(solver.solve().unwrap(), solution);
        assert_eq!(solver.stats().backtracks, 0);
    }

    #[test]
    fn test_clues_survive_into_the_solution() {
        let grid: Grid = PUZZLE.parse().unwrap();
        let solved = solve_one(PUZZLE).unwrap();
        for (row, col, digit) in grid.clues() {
            assert_eq!(solved.digit(row, col), Some(digit));
        }
    }

    #[test]
    fn test_contradictory_clues_are_reported() {
        let text = PUZZLE.replacen("53..7....", "53..7...5", 1);
        assert_eq!(
            solve_one(&text),
            Err(SolveError::Conflict {
                row: 1,
                col: 9,
                digit: 5
            })
        );
    }

    #[test]
    fn test_consistent_but_unsolvable_clues_are_reported() {
        // no two clues clash directly, yet the top-left cell sees all nine
        // digits across its row, column and box
        let text = "\
..1234...
.9.......
5........
6........
7........
8........
.........
.........
.........
";
        assert_eq!(solve_one(text), Err(SolveError::Unsolvable));
    }

    #[test]
    fn test_selectors_agree_on_a_unique_puzzle() {
        let grid: Grid = PUZZLE.parse().unwrap();
        let by_min = SudokuSolver::new(&grid).unwrap().solve().unwrap();
        let by_first = SudokuSolver::with_selector(&grid, FirstActive)
            .unwrap()
            .solve()
            .unwrap();
        let by_random = SudokuSolver::with_selector(&grid, Random::with_seed(1))
            .unwrap()
            .solve()
            .unwrap();
        assert_eq!(by_min, by_first);
        assert_eq!(by_min, by_random);
        assert_eq!(by_min.to_string(), SOLUTION);
    }

    #[test]
    fn test_enumerate_unique_puzzle_finds_one_solution() {
        let grid: Grid = PUZZLE.parse().unwrap();
        let mut solver = SudokuSolver::new(&grid).unwrap();
        let solutions = solver.enumerate();
        assert_eq!(solutions.len(), 1);
        assert_eq!(solutions[0].to_string(), SOLUTION);
        assert_eq!(solver.stats().solutions, 1);
    }

    #[test]
    fn test_enumerate_unavoidable_rectangle_finds_both() {
        // blank a rectangle of two digits whose corners pair up within two
        // boxes; the two ways of filling it are the only completions
        let mut grid: Grid = SOLUTION.parse().unwrap();
        let mut cells: [[u8; SIDE]; SIDE] = grid.into();
        for (row, col) in [(6, 3), (6, 8), (7, 3), (7, 8)] {
            cells[row][col] = 0;
        }
        grid = cells.into();

        let mut solver = SudokuSolver::new(&grid).unwrap();
        let solutions = solver.enumerate();
        assert_eq!(solutions.len(), 2);

        let distinct: FxHashSet<_> = solutions.iter().collect();
        assert_eq!(distinct.len(), 2);
        assert!(solutions.iter().all(Grid::is_solved));
        assert!(solutions.contains(&SOLUTION.parse().unwrap()));
    }

    #[test]
    fn test_unsolvable_leaves_decoder_unreached() {
        let text = PUZZLE.replacen("53..7....", "53..7..3.", 1);
        // the extra 3 clashes with the 3 already in row 1 only through the
        // row-digit column, so it surfaces at preload
        assert!(matches!(
            solve_one(&text),
            Err(SolveError::Conflict { .. })
        ));
    }

    #[test]
    fn test_solve_text_round_trip() {
        assert_eq!(solve_text(PUZZLE).unwrap(), SOLUTION);
        assert!(matches!(
            solve_text("nonsense"),
            Err(Error::Parse(_))
        ));
    }
}
