use thiserror::Error;

/// Rejected grid text. Positions are 1-based.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    #[error("expected 9 rows, found {found}")]
    RowCount { found: usize },
    #[error("row {row}: expected 9 cells, found {found}")]
    RowLength { row: usize, found: usize },
    #[error("row {row}, column {col}: expected '.' or '1'-'9', found {found:?}")]
    BadCell { row: usize, col: usize, found: char },
}

/// A puzzle the engine cannot complete. Positions are 1-based.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// The search exhausted every branch without a complete assignment.
    #[error("puzzle has no solution")]
    Unsolvable,
    /// A given digit had no candidate row left when it was preloaded, i.e.
    /// it contradicts an earlier given.
    #[error("clue {digit} at row {row}, column {col} conflicts with an earlier clue")]
    Conflict { row: usize, col: usize, digit: u8 },
}

/// Any failure of the text-in, text-out solve boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Parse(#[from] ParseError),
    #[error(transparent)]
    Solve(#[from] SolveError),
}
