//! The mutable RGBA canvas painted tile by tile

use crate::geometry::expansion::Dimensions;
use crate::planning::tiles::Tile;
use image::{Rgba, RgbaImage, imageops};

/// Fully transparent pixel
pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Output raster owned by a single run
///
/// Every mutation goes through `&mut self`, so one run is the only writer.
#[derive(Debug, Clone)]
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Fully transparent canvas of the given size
    pub fn new(size: Dimensions) -> Self {
        Self {
            pixels: RgbaImage::from_pixel(size.width, size.height, TRANSPARENT),
        }
    }

    /// Canvas size
    pub fn dimensions(&self) -> Dimensions {
        Dimensions::new(self.pixels.width(), self.pixels.height())
    }

    /// Copy `image` onto the canvas at `(x, y)`, replacing existing pixels
    ///
    /// Parts that fall outside the canvas are dropped.
    pub fn paste(&mut self, image: &RgbaImage, x: u32, y: u32) {
        imageops::replace(&mut self.pixels, image, i64::from(x), i64::from(y));
    }

    /// Copy of the square under a tile
    pub fn crop(&self, tile: &Tile) -> RgbaImage {
        imageops::crop_imm(&self.pixels, tile.x, tile.y, tile.side(), tile.side()).to_image()
    }

    /// Read-only view of the pixels
    pub const fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
