//! Placement of the source image on the larger target canvas
//!
//! The source keeps the relative position of its focus point: a face two
//! thirds of the way across the source ends up two thirds of the way across
//! the horizontal margin budget, and likewise vertically.

use crate::geometry::region::{Detection, RegionBox};
use crate::io::error::{Result, invalid_configuration};

/// Width and height of a raster in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
}

impl Dimensions {
    /// Create a dimension pair
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// Anchor pixel in source-image coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FocusPoint {
    /// Horizontal coordinate, `0 <= x < source width`
    pub x: u32,
    /// Vertical coordinate, `0 <= y < source height`
    pub y: u32,
}

impl FocusPoint {
    /// Geometric center of a source of the given size
    pub const fn center_of(source: Dimensions) -> Self {
        Self {
            x: source.width / 2,
            y: source.height / 2,
        }
    }

    /// Focus derived from a detector outcome
    ///
    /// A detected box contributes its centroid, clamped into the source.
    /// No detection falls back to the source center.
    pub fn from_detection(detection: &Detection, source: Dimensions) -> Self {
        match detection {
            Detection::Found(region) => {
                let (cx, cy) = region.center();
                Self {
                    x: cx.min(source.width.saturating_sub(1)),
                    y: cy.min(source.height.saturating_sub(1)),
                }
            }
            Detection::NotFound => Self::center_of(source),
        }
    }
}

/// Margins added around the source to reach the target canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Expansion {
    /// Columns added to the left of the source
    pub left: u32,
    /// Columns added to the right of the source
    pub right: u32,
    /// Rows added above the source
    pub top: u32,
    /// Rows added below the source
    pub bottom: u32,
}

impl Expansion {
    /// Compute margins so the focus point keeps its relative position
    ///
    /// `right` and `bottom` absorb integer truncation, so margin totals are
    /// exact.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the target is smaller than the source
    /// in either dimension, or if the source is empty.
    pub fn from_focus(source: Dimensions, target: Dimensions, focus: FocusPoint) -> Result<Self> {
        if source.width == 0 || source.height == 0 {
            return Err(invalid_configuration(
                "source",
                &format!("{}x{}", source.width, source.height),
                &"source image must not be empty",
            ));
        }
        if target.width < source.width {
            return Err(invalid_configuration(
                "width",
                &target.width,
                &format!("target must not be narrower than the source ({})", source.width),
            ));
        }
        if target.height < source.height {
            return Err(invalid_configuration(
                "height",
                &target.height,
                &format!("target must not be shorter than the source ({})", source.height),
            ));
        }

        let (left, right) = split_margin(target.width - source.width, focus.x, source.width);
        let (top, bottom) = split_margin(target.height - source.height, focus.y, source.height);

        Ok(Self {
            left,
            right,
            top,
            bottom,
        })
    }

    /// Rectangle the pasted source occupies on the canvas
    pub const fn source_rect(&self, source: Dimensions) -> RegionBox {
        RegionBox::from_origin(self.left, self.top, source.width, source.height)
    }

    /// Canvas size implied by these margins around `source`
    pub const fn canvas(&self, source: Dimensions) -> Dimensions {
        Dimensions {
            width: self.left + source.width + self.right,
            height: self.top + source.height + self.bottom,
        }
    }
}

// floor(margin * focus / extent), with the remainder going to the far side
fn split_margin(margin: u32, focus: u32, extent: u32) -> (u32, u32) {
    let focus = focus.min(extent.saturating_sub(1));
    let near = u64::from(margin) * u64::from(focus) / u64::from(extent);
    // near <= margin since focus < extent
    let near = u32::try_from(near).unwrap_or(margin).min(margin);
    (near, margin - near)
}
