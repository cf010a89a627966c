//! Canvas geometry
//!
//! This module contains:
//! - Rectangles and detector outcomes
//! - Focus-preserving placement of the source on the canvas

/// Focus points and canvas margins
pub mod expansion;
/// Rectangles and detection results
pub mod region;

pub use expansion::{Dimensions, Expansion, FocusPoint};
pub use region::{Detection, RegionBox};
