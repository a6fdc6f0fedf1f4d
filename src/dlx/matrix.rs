//! The sparse 0/1 matrix behind the exact-cover search.
//!
//! Every 1-entry of the matrix is a node in a flat arena, linked into a
//! circular doubly-linked list along its row and along its column. Column
//! headers and the root sentinel live in the same arena, so "dancing" a node
//! out of a list and back in is a handful of index writes. Links are arena
//! indices rather than pointers; a node is never freed once allocated, and
//! `cover`/`uncover` only ever splice links.

use std::fmt;

/// Stable handle of a node in the arena.
pub type NodeIndex = usize;

/// Identity of a column ring.
///
/// The root is a sentinel that anchors the header ring and never represents
/// a real constraint; data columns are numbered from zero. Keeping the two
/// apart in the type means the root offset is applied in exactly one place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnId {
    Root,
    Constraint(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Node {
    up: NodeIndex,
    down: NodeIndex,
    left: NodeIndex,
    right: NodeIndex,
    column: ColumnId,
}

/// A toroidal sparse matrix over a fixed set of columns.
///
/// Constructed once with exact capacity for its instance; rows are appended
/// with [`add_row`](Matrix::add_row) and the structure never grows beyond the
/// capacity given at construction.
#[derive(Clone, PartialEq, Eq)]
pub struct Matrix {
    nodes: Vec<Node>,
    counts: Vec<usize>,
    column_count: usize,
    row_count: usize,
    row_capacity: usize,
}

impl Matrix {
    /// Creates a matrix with `column_count` data columns and room for exactly
    /// `row_capacity` rows of four nodes each. The root and all headers are
    /// linked circularly in index order; no data rows exist yet.
    #[must_use]
    pub fn new(column_count: usize, row_capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(1 + column_count + 4 * row_capacity);
        nodes.push(Node {
            up: 0,
            down: 0,
            left: 0,
            right: 0,
            column: ColumnId::Root,
        });
        for constraint in 0..column_count {
            let header = constraint + 1;
            nodes.push(Node {
                up: header,
                down: header,
                left: header - 1,
                right: header + 1,
                column: ColumnId::Constraint(constraint),
            });
        }
        let last = nodes.len() - 1;
        nodes[0].left = last;
        nodes[last].right = 0;

        Self {
            nodes,
            counts: vec![0; column_count],
            column_count,
            row_count: 0,
            row_capacity,
        }
    }

    /// Appends one row covering the four given data columns.
    ///
    /// Each node is spliced into the bottom of its column ring, preserving
    /// insertion order, and the four nodes form a horizontal ring in argument
    /// order.
    ///
    /// # Panics
    ///
    /// Panics when the row capacity fixed at construction is exhausted or a
    /// column index is out of range; both are structural misuse of the
    /// instance, not runtime conditions.
    pub fn add_row(&mut self, columns: [usize; 4]) {
        assert!(
            self.row_count < self.row_capacity,
            "row capacity {} exhausted",
            self.row_capacity
        );
        let first = self.nodes.len();
        for (offset, &column) in columns.iter().enumerate() {
            assert!(
                column < self.column_count,
                "column {column} out of range for {} columns",
                self.column_count
            );
            let header = self.header(ColumnId::Constraint(column));
            let index = first + offset;
            let up = self.nodes[header].up;
            self.nodes.push(Node {
                up,
                down: header,
                left: first + (offset + 3) % 4,
                right: first + (offset + 1) % 4,
                column: ColumnId::Constraint(column),
            });
            self.nodes[up].down = index;
            self.nodes[header].up = index;
            self.counts[column] += 1;
        }
        self.row_count += 1;
    }

    /// Covers a data column: unlinks its header from the header ring, then
    /// unlinks every other node of every row in the column from that node's
    /// own column ring (rows top to bottom, nodes left to right).
    ///
    /// `cover` followed by [`uncover`](Matrix::uncover) of the same column,
    /// with no intervening mutation, restores the matrix exactly; any LIFO
    /// nesting of cover/uncover pairs does the same.
    pub fn cover(&mut self, column: usize) {
        let header = self.header(ColumnId::Constraint(column));
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = right;
        self.nodes[right].left = left;

        let mut row = self.nodes[header].down;
        while row != header {
            let mut node = self.nodes[row].right;
            while node != row {
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = down;
                self.nodes[down].up = up;
                let column = self.constraint_of(node);
                self.counts[column] -= 1;
                node = self.nodes[node].right;
            }
            row = self.nodes[row].down;
        }
    }

    /// Exact inverse of [`cover`](Matrix::cover): relinks rows bottom to top,
    /// nodes right to left, then splices the header back into the header ring.
    pub fn uncover(&mut self, column: usize) {
        let header = self.header(ColumnId::Constraint(column));
        let mut row = self.nodes[header].up;
        while row != header {
            let mut node = self.nodes[row].left;
            while node != row {
                let column = self.constraint_of(node);
                self.counts[column] += 1;
                let (up, down) = (self.nodes[node].up, self.nodes[node].down);
                self.nodes[up].down = node;
                self.nodes[down].up = node;
                node = self.nodes[node].left;
            }
            row = self.nodes[row].up;
        }
        let (left, right) = (self.nodes[header].left, self.nodes[header].right);
        self.nodes[left].right = header;
        self.nodes[right].left = header;
    }

    /// Arena index of a column's header node.
    #[must_use]
    pub fn header(&self, column: ColumnId) -> NodeIndex {
        match column {
            ColumnId::Root => 0,
            ColumnId::Constraint(constraint) => constraint + 1,
        }
    }

    /// The column owning `node`.
    #[must_use]
    pub fn column_of(&self, node: NodeIndex) -> ColumnId {
        self.nodes[node].column
    }

    /// Constraint index of the column owning `node`.
    ///
    /// # Panics
    ///
    /// Panics when called on the root sentinel, which owns no constraint.
    #[must_use]
    pub fn constraint_of(&self, node: NodeIndex) -> usize {
        match self.nodes[node].column {
            ColumnId::Constraint(constraint) => constraint,
            ColumnId::Root => panic!("root sentinel owns no constraint"),
        }
    }

    /// Live rows currently linked into a data column's vertical ring.
    #[must_use]
    pub fn count(&self, column: usize) -> usize {
        self.counts[column]
    }

    /// True when the header ring holds only the root, i.e. every constraint
    /// is satisfied.
    #[must_use]
    pub fn is_fully_covered(&self) -> bool {
        self.nodes[0].right == 0
    }

    /// Constraint indices of the uncovered columns, in header-ring order.
    pub fn active_columns(&self) -> impl Iterator<Item = usize> + '_ {
        ActiveColumns {
            matrix: self,
            at: self.nodes[0].right,
        }
    }

    #[must_use]
    pub fn up(&self, node: NodeIndex) -> NodeIndex {
        self.nodes[node].up
    }

    #[must_use]
    pub fn down(&self, node: NodeIndex) -> NodeIndex {
        self.nodes[node].down
    }

    #[must_use]
    pub fn left(&self, node: NodeIndex) -> NodeIndex {
        self.nodes[node].left
    }

    #[must_use]
    pub fn right(&self, node: NodeIndex) -> NodeIndex {
        self.nodes[node].right
    }

    #[must_use]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Rows appended so far.
    #[must_use]
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Nodes allocated so far, headers and root included.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }
}

impl fmt::Debug for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Matrix")
            .field("columns", &self.column_count)
            .field("rows", &self.row_count)
            .field("nodes", &self.nodes.len())
            .field("active", &self.active_columns().count())
            .finish()
    }
}

struct ActiveColumns<'a> {
    matrix: &'a Matrix,
    at: NodeIndex,
}

impl Iterator for ActiveColumns<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.at == 0 {
            return None;
        }
        let column = self.matrix.constraint_of(self.at);
        self.at = self.matrix.nodes[self.at].right;
        Some(column)
    }
}
