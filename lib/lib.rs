/// Carrom board, discs and physics.
pub mod carrom;
/// Chess domain types.
pub mod chess;
