//! Shared canvas and the sequential painting loop

/// The shared RGBA canvas
pub mod canvas;
/// The sequential painting loop
pub mod executor;

pub use canvas::Canvas;
pub use executor::{Outpainter, RunReport, RunState, TileOutcome};
