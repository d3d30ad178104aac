/// A generic rectangular board of cells.
pub mod boardgame;
/// Chess domain types and rules.
pub mod chess;
