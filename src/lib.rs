//! Outpainting planner and sequential execution orchestrator
//!
//! A source image is placed on a larger transparent canvas around its focus
//! point, and the margins are filled by asking a generative inpainting
//! service to repaint overlapping squares one at a time. Each square is cut
//! from the canvas as left by earlier squares, so freshly generated content
//! continues what is already there.

#![forbid(unsafe_code)]

/// Placement of the source image on the target canvas
pub mod geometry;
/// Input/output operations, configuration and error handling
pub mod io;
/// The painting loop and the canvas it mutates
pub mod orchestration;
/// Tile planning and per-tile prompt selection
pub mod planning;
/// Contracts and clients for external models
pub mod services;

pub use io::error::{OutpaintError, Result};
