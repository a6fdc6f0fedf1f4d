//! This crate solves 9x9 Sudoku puzzles by reducing them to the exact cover
//! problem and running Knuth's Algorithm X over a Dancing Links matrix.

/// The `dlx` module implements the generic exact-cover engine: the toroidal
/// matrix, the reversible cover/uncover primitives and the backtracking search.
pub mod dlx;

/// The `sudoku` module maps 9x9 puzzles onto the engine and decodes the
/// chosen matrix rows back into a filled grid.
pub mod sudoku;
