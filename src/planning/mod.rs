//! Deciding what to paint and with which prompt

/// Prompt pairs, per-tile selection and fallback derivation
pub mod prompt;
/// Tile sizes, directions and the tile planner
pub mod tiles;

pub use prompt::{PromptPair, PromptSelector};
pub use tiles::{Direction, Tile, TilePlan, TilePlanner, TileSize};
