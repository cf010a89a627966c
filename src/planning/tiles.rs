//! Tile planning for iterative outpainting
//!
//! Starting from a tile centred on the pasted source, tiles march outwards
//! in the four straight directions by a fixed step until they hit the canvas
//! edge. Corner quadrants are then covered by combining every vertical
//! offset with every horizontal offset. The plan's direction order is the
//! paint order, so each corner tile is painted after the straight tiles that
//! give it context.

use crate::geometry::expansion::{Dimensions, Expansion};
use crate::geometry::region::RegionBox;
use crate::io::error::{OutpaintError, Result, invalid_configuration};

/// Square tile sides accepted by the inpainting service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TileSize {
    /// 256 × 256 pixels
    Small,
    /// 512 × 512 pixels
    Medium,
    /// 1024 × 1024 pixels
    Large,
}

impl TileSize {
    /// All supported sizes, smallest first
    pub const ALL: [Self; 3] = [Self::Small, Self::Medium, Self::Large];

    /// Side length in pixels
    pub const fn pixels(self) -> u32 {
        match self {
            Self::Small => 256,
            Self::Medium => 512,
            Self::Large => 1024,
        }
    }

    /// Default stride: half the tile side
    pub const fn default_step(self) -> u32 {
        self.pixels() / 2
    }

    /// Size string in the `WxH` form used by image APIs
    pub fn api_size(self) -> String {
        let side = self.pixels();
        format!("{side}x{side}")
    }
}

impl TryFrom<u32> for TileSize {
    type Error = OutpaintError;

    fn try_from(side: u32) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|size| size.pixels() == side)
            .ok_or_else(|| invalid_configuration("square", &side, &"must be 256, 512 or 1024"))
    }
}

/// One square region to paint, positioned in canvas coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    /// Left edge
    pub x: u32,
    /// Top edge
    pub y: u32,
    /// Side length
    pub size: TileSize,
}

impl Tile {
    /// Tile with top-left corner at `(x, y)`
    pub const fn new(x: u32, y: u32, size: TileSize) -> Self {
        Self { x, y, size }
    }

    /// Side length in pixels
    pub const fn side(&self) -> u32 {
        self.size.pixels()
    }

    /// Bounding box `(x, y, x + side, y + side)`
    pub const fn bounds(&self) -> RegionBox {
        RegionBox::from_origin(self.x, self.y, self.side(), self.side())
    }
}

/// Named groups of the tile plan, in paint order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// The starting tile over the source
    Init,
    /// Straight up from the start
    Up,
    /// Straight left from the start
    Left,
    /// Straight right from the start
    Right,
    /// Straight down from the start
    Down,
    /// Upper-left quadrant
    UpLeft,
    /// Upper-right quadrant
    UpRight,
    /// Lower-left quadrant
    DownLeft,
    /// Lower-right quadrant
    DownRight,
}

impl Direction {
    /// Every direction in paint order
    pub const ALL: [Self; 9] = [
        Self::Init,
        Self::Up,
        Self::Left,
        Self::Right,
        Self::Down,
        Self::UpLeft,
        Self::UpRight,
        Self::DownLeft,
        Self::DownRight,
    ];

    /// Directions reached by stepping along a single axis
    pub const STRAIGHT: [Self; 4] = [Self::Up, Self::Left, Self::Right, Self::Down];

    /// Each quadrant with the (vertical, horizontal) directions it combines
    pub const QUADRANTS: [(Self, Self, Self); 4] = [
        (Self::UpLeft, Self::Up, Self::Left),
        (Self::UpRight, Self::Up, Self::Right),
        (Self::DownLeft, Self::Down, Self::Left),
        (Self::DownRight, Self::Down, Self::Right),
    ];

    /// Snake-case name used in logs
    pub const fn name(self) -> &'static str {
        match self {
            Self::Init => "init",
            Self::Up => "up",
            Self::Left => "left",
            Self::Right => "right",
            Self::Down => "down",
            Self::UpLeft => "up_left",
            Self::UpRight => "up_right",
            Self::DownLeft => "down_left",
            Self::DownRight => "down_right",
        }
    }
}

/// Ordered tiles per direction; flattening it yields the paint order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TilePlan {
    sequences: Vec<(Direction, Vec<Tile>)>,
}

impl TilePlan {
    /// Tiles planned for one direction, nearest to the start first
    pub fn direction(&self, direction: Direction) -> &[Tile] {
        self.sequences
            .iter()
            .find(|(planned, _)| *planned == direction)
            .map_or(&[], |(_, tiles)| tiles.as_slice())
    }

    /// Directions with their tiles, in paint order
    pub fn directions(&self) -> impl Iterator<Item = (Direction, &[Tile])> {
        self.sequences
            .iter()
            .map(|(direction, tiles)| (*direction, tiles.as_slice()))
    }

    /// Every tile in paint order
    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.sequences.iter().flat_map(|(_, tiles)| tiles.iter())
    }

    /// Total number of planned tiles, duplicates included
    pub fn len(&self) -> usize {
        self.sequences.iter().map(|(_, tiles)| tiles.len()).sum()
    }

    /// Whether the plan holds no tiles
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Derives a [`TilePlan`] from canvas geometry
#[derive(Debug, Clone, Copy)]
pub struct TilePlanner {
    canvas: Dimensions,
    source: Dimensions,
    expansion: Expansion,
    size: TileSize,
    step: u32,
}

impl TilePlanner {
    /// Validate planning inputs
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the step is zero or larger than the
    /// tile side, if the tile does not fit inside the canvas, or if the
    /// margins and source do not add up to the canvas.
    pub fn new(
        canvas: Dimensions,
        source: Dimensions,
        expansion: Expansion,
        size: TileSize,
        step: u32,
    ) -> Result<Self> {
        let side = size.pixels();
        if step == 0 || step > side {
            return Err(invalid_configuration(
                "step",
                &step,
                &format!("must be between 1 and the tile side ({side})"),
            ));
        }
        if side > canvas.width || side > canvas.height {
            return Err(invalid_configuration(
                "square",
                &side,
                &format!(
                    "tile does not fit in a {}x{} canvas",
                    canvas.width, canvas.height
                ),
            ));
        }

        if expansion.canvas(source) != canvas {
            return Err(invalid_configuration(
                "expansion",
                &format!("{expansion:?}"),
                &format!(
                    "margins around a {}x{} source do not fill a {}x{} canvas",
                    source.width, source.height, canvas.width, canvas.height
                ),
            ));
        }

        Ok(Self {
            canvas,
            source,
            expansion,
            size,
            step,
        })
    }

    /// Starting tile, centred on the pasted source and kept on the canvas
    pub fn initial_tile(&self) -> Tile {
        let side = i64::from(self.size.pixels());
        // Floor division: a source wider than the tile pushes the start onto it
        let x = i64::from(self.expansion.left) - (side - i64::from(self.source.width)).div_euclid(2);
        let y = i64::from(self.expansion.top) - (side - i64::from(self.source.height)).div_euclid(2);

        Tile::new(
            clamp_coordinate(x, self.canvas.width - self.size.pixels()),
            clamp_coordinate(y, self.canvas.height - self.size.pixels()),
            self.size,
        )
    }

    /// Move a tile one step in a straight direction
    ///
    /// Returns `None` once the tile can no longer move, which also covers
    /// the non-straight directions.
    pub fn advance(&self, tile: Tile, direction: Direction) -> Option<Tile> {
        let max_x = self.canvas.width - tile.side();
        let max_y = self.canvas.height - tile.side();

        let (x, y) = match direction {
            Direction::Up => (tile.x, tile.y.saturating_sub(self.step)),
            Direction::Left => (tile.x.saturating_sub(self.step), tile.y),
            Direction::Right => (tile.x.saturating_add(self.step).min(max_x), tile.y),
            Direction::Down => (tile.x, tile.y.saturating_add(self.step).min(max_y)),
            _ => return None,
        };

        // Reaching the edge shows up as a step that goes nowhere
        ((x, y) != (tile.x, tile.y)).then(|| Tile::new(x, y, tile.size))
    }

    /// Build the complete plan
    pub fn plan(&self) -> TilePlan {
        let init = self.initial_tile();
        let mut sequences: Vec<(Direction, Vec<Tile>)> = vec![(Direction::Init, vec![init])];

        for direction in Direction::STRAIGHT {
            let mut tiles = Vec::new();
            let mut current = init;
            while let Some(next) = self.advance(current, direction) {
                tiles.push(next);
                current = next;
            }
            sequences.push((direction, tiles));
        }

        let mut quadrants = Vec::with_capacity(Direction::QUADRANTS.len());
        for (quadrant, vertical, horizontal) in Direction::QUADRANTS {
            let vertical_tiles = Self::sequence(&sequences, vertical);
            let horizontal_tiles = Self::sequence(&sequences, horizontal);

            let mut tiles = Vec::with_capacity(vertical_tiles.len() * horizontal_tiles.len());
            for vertical_tile in vertical_tiles {
                for horizontal_tile in horizontal_tiles {
                    tiles.push(Tile::new(horizontal_tile.x, vertical_tile.y, self.size));
                }
            }
            quadrants.push((quadrant, tiles));
        }
        sequences.extend(quadrants);

        TilePlan { sequences }
    }

    fn sequence(sequences: &[(Direction, Vec<Tile>)], direction: Direction) -> &[Tile] {
        sequences
            .iter()
            .find(|(planned, _)| *planned == direction)
            .map_or(&[], |(_, tiles)| tiles.as_slice())
    }
}

fn clamp_coordinate(value: i64, max: u32) -> u32 {
    u32::try_from(value.clamp(0, i64::from(max))).unwrap_or(0)
}
