#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
pub mod column_selection;
pub mod matrix;
pub mod search;
