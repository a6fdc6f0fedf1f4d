#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod error;
pub mod grid;
pub mod solver;
