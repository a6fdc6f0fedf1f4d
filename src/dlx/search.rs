//! Algorithm X over the Dancing Links matrix.
//!
//! The search repeatedly picks an uncovered column, covers it, and tries each
//! of its candidate rows in turn: the row's remaining columns are covered, the
//! row is pushed onto the choice stack and the search recurses. A dead end
//! unwinds by popping the row and uncovering its columns in reverse order, so
//! the matrix the next candidate sees is exactly the matrix the previous one
//! saw. Success is reached when the header ring holds only the root.
//!
//! The engine either halts at the first complete assignment or keeps
//! backtracking through every one of them, depending on [`SolveMode`].

use crate::dlx::column_selection::{ColumnSelection, MinCount};
use crate::dlx::matrix::{ColumnId, Matrix, NodeIndex};
use smallvec::SmallVec;

/// What to do when a complete assignment is found.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SolveMode {
    /// Stop at the first solution, leaving the matrix as the solution left it.
    #[default]
    First,
    /// Record the solution, restore the matrix and keep searching.
    Enumerate,
}

/// Counters collected while searching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SearchStats {
    /// Candidate rows tried.
    pub decisions: usize,
    /// Candidate rows undone after a failed subtree.
    pub backtracks: usize,
    /// Deepest choice stack reached, preloaded givens included.
    pub max_depth: usize,
    /// Complete assignments found.
    pub solutions: usize,
}

/// A single backtracking search over a borrowed matrix.
#[derive(Debug)]
pub struct Search<'m, S = MinCount> {
    matrix: &'m mut Matrix,
    selector: S,
    mode: SolveMode,
    choices: Vec<NodeIndex>,
    solutions: Vec<Vec<NodeIndex>>,
    stats: SearchStats,
}

impl<'m, S: ColumnSelection> Search<'m, S> {
    pub fn new(matrix: &'m mut Matrix, selector: S, mode: SolveMode) -> Self {
        Self {
            matrix,
            selector,
            mode,
            choices: Vec::new(),
            solutions: Vec::new(),
            stats: SearchStats::default(),
        }
    }

    /// Records a row chosen before the search begins. The caller must already
    /// have covered the row's columns, as the clue preloader does.
    pub fn push_given(&mut self, row: NodeIndex) {
        self.choices.push(row);
    }

    /// Runs the search to completion for the configured mode and reports
    /// whether at least one solution was found.
    pub fn run(&mut self) -> bool {
        self.explore();
        self.stats.solutions = self.solutions.len();
        !self.solutions.is_empty()
    }

    #[must_use]
    pub fn solutions(&self) -> &[Vec<NodeIndex>] {
        &self.solutions
    }

    #[must_use]
    pub fn into_solutions(self) -> Vec<Vec<NodeIndex>> {
        self.solutions
    }

    #[must_use]
    pub fn stats(&self) -> SearchStats {
        self.stats
    }

    /// One level of Algorithm X. Returns true to halt the whole search.
    fn explore(&mut self) -> bool {
        if self.matrix.is_fully_covered() {
            self.solutions.push(self.choices.clone());
            return self.mode == SolveMode::First;
        }

        let Some(column) = self.selector.pick(&*self.matrix) else {
            return false;
        };
        self.stats.max_depth = self.stats.max_depth.max(self.choices.len() + 1);

        self.matrix.cover(column);
        let header = self.matrix.header(ColumnId::Constraint(column));
        let mut row = self.matrix.down(header);
        while row != header {
            self.stats.decisions += 1;
            let covered = self.cover_row_mates(row);
            self.choices.push(row);

            if self.explore() {
                return true;
            }

            self.choices.pop();
            self.stats.backtracks += 1;
            for &mate in covered.iter().rev() {
                self.matrix.uncover(mate);
            }
            row = self.matrix.down(row);
        }
        self.matrix.uncover(column);
        false
    }

    /// Covers the remaining columns of `row`, left to right, and returns them
    /// in cover order so the caller can uncover in reverse.
    fn cover_row_mates(&mut self, row: NodeIndex) -> SmallVec<[usize; 4]> {
        let mut covered = SmallVec::new();
        let mut node = self.matrix.right(row);
        while node != row {
            let column = self.matrix.constraint_of(node);
            self.matrix.cover(column);
            covered.push(column);
            node = self.matrix.right(node);
        }
        covered
    }
}
