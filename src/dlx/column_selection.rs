#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]

use crate::dlx::matrix::Matrix;

/// Picks the next column for the search to branch on.
///
/// Any active column is a correct choice; the strategy only affects the
/// branching factor, never the set of solutions.
pub trait ColumnSelection {
    fn pick(&mut self, matrix: &Matrix) -> Option<usize>;
}

impl<S: ColumnSelection + ?Sized> ColumnSelection for &mut S {
    fn pick(&mut self, matrix: &Matrix) -> Option<usize> {
        (**self).pick(matrix)
    }
}

/// Branch on the active column with the fewest live rows, ties resolved by
/// header-ring encounter order. This is Knuth's minimum-branching heuristic
/// and the default.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MinCount;

impl ColumnSelection for MinCount {
    fn pick(&mut self, matrix: &Matrix) -> Option<usize> {
        let mut best = None;
        let mut best_count = usize::MAX;
        for column in matrix.active_columns() {
            let count = matrix.count(column);
            if count < best_count {
                best = Some(column);
                best_count = count;
            }
        }
        best
    }
}

/// Branch on the first column still in the header ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FirstActive;

impl ColumnSelection for FirstActive {
    fn pick(&mut self, matrix: &Matrix) -> Option<usize> {
        matrix.active_columns().next()
    }
}

/// Branch on a uniformly random active column.
#[derive(Debug, Clone, Default)]
pub struct Random(fastrand::Rng);

impl Random {
    #[must_use]
    pub fn new() -> Self {
        Self(fastrand::Rng::new())
    }

    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self(fastrand::Rng::with_seed(seed))
    }
}

impl ColumnSelection for Random {
    fn pick(&mut self, matrix: &Matrix) -> Option<usize> {
        let active = matrix.active_columns().count();
        if active == 0 {
            return None;
        }
        matrix.active_columns().nth(self.0.usize(..active))
    }
}
