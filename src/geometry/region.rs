//! Axis-aligned rectangles and detector outcomes
//!
//! Rectangles are half-open in the sense used by the overlap test: two boxes
//! that only share an edge do not intersect.

/// Axis-aligned rectangle `(x0, y0)` to `(x1, y1)` in pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RegionBox {
    /// Left edge
    pub x0: u32,
    /// Top edge
    pub y0: u32,
    /// Right edge
    pub x1: u32,
    /// Bottom edge
    pub y1: u32,
}

impl RegionBox {
    /// Build a box from its corners, normalising swapped coordinates
    pub fn new(x0: u32, y0: u32, x1: u32, y1: u32) -> Self {
        Self {
            x0: x0.min(x1),
            y0: y0.min(y1),
            x1: x0.max(x1),
            y1: y0.max(y1),
        }
    }

    /// Box of the given size with its top-left corner at `(x, y)`
    pub const fn from_origin(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x0: x,
            y0: y,
            x1: x.saturating_add(width),
            y1: y.saturating_add(height),
        }
    }

    /// Horizontal extent
    pub const fn width(&self) -> u32 {
        self.x1 - self.x0
    }

    /// Vertical extent
    pub const fn height(&self) -> u32 {
        self.y1 - self.y0
    }

    /// Integer centroid, rounded down
    pub const fn center(&self) -> (u32, u32) {
        (
            self.x0 + (self.x1 - self.x0) / 2,
            self.y0 + (self.y1 - self.y0) / 2,
        )
    }

    /// Open-rectangle intersection test; shared edges are not an overlap
    pub const fn intersects(&self, other: &Self) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.y0 < other.y1 && self.y1 > other.y0
    }

    /// Whether `other` lies entirely within this box, edges included
    pub const fn contains(&self, other: &Self) -> bool {
        other.x0 >= self.x0 && other.y0 >= self.y0 && other.x1 <= self.x1 && other.y1 <= self.y1
    }

    /// Shift the box by a non-negative offset
    pub const fn translate(&self, dx: u32, dy: u32) -> Self {
        Self {
            x0: self.x0.saturating_add(dx),
            y0: self.y0.saturating_add(dy),
            x1: self.x1.saturating_add(dx),
            y1: self.y1.saturating_add(dy),
        }
    }
}

/// Result of a single-box detector such as a face finder
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Detection {
    /// The detector located a region
    Found(RegionBox),
    /// Nothing was detected; callers take their default path
    #[default]
    NotFound,
}

impl Detection {
    /// The detected box, if any
    pub const fn region(&self) -> Option<RegionBox> {
        match self {
            Self::Found(region) => Some(*region),
            Self::NotFound => None,
        }
    }
}

/// Whether any box in `regions` overlaps `target`
///
/// Stops at the first match.
pub fn any_intersects(regions: &[RegionBox], target: &RegionBox) -> bool {
    regions.iter().any(|region| region.intersects(target))
}
