//! Contracts for the external models the outpainter depends on
//!
//! Detectors, captioners, text models and the inpainting service are all
//! reached through these traits, so runs can be driven by HTTP clients,
//! fixed user input, or in-memory fakes.

use crate::geometry::region::{Detection, RegionBox};
use crate::io::error::Result;
use crate::planning::tiles::TileSize;
use image::RgbaImage;

/// Finds the single region the source should be anchored on, such as a face
pub trait FocusDetector {
    /// Detect the focus region in source coordinates
    ///
    /// # Errors
    ///
    /// Returns an error if the detector itself fails. Finding nothing is
    /// [`Detection::NotFound`], not an error.
    fn detect_focus_region(&self, image: &RgbaImage) -> Result<Detection>;
}

/// Finds regions of interest, such as humans, that need the primary prompt
pub trait RegionDetector {
    /// Detect regions in source coordinates, sorted by left edge
    ///
    /// # Errors
    ///
    /// Returns an error if the detector fails
    fn detect_regions(&self, image: &RgbaImage) -> Result<Vec<RegionBox>>;
}

/// Produces a free-text scene description used as the default prompt
pub trait Describer {
    /// Describe the image with the given captioning model
    ///
    /// # Errors
    ///
    /// Returns an error if the captioning service fails
    fn describe(&self, image: &RgbaImage, model_id: &str) -> Result<String>;
}

/// General text completion, used to rewrite prompts
pub trait PromptRewriter {
    /// Complete a single user instruction
    ///
    /// # Errors
    ///
    /// Returns an error if the text model cannot be reached
    fn complete(&self, instruction: &str) -> Result<String>;
}

/// One inpainting call: regenerate a square guided by the prompt
#[derive(Debug, Clone, Copy)]
pub struct InpaintRequest<'a> {
    /// Square cut from the current canvas
    pub image: &'a RgbaImage,
    /// Editable-area mask; transparent pixels are regenerated
    pub mask: &'a RgbaImage,
    /// Prompt chosen for this tile
    pub prompt: &'a str,
    /// Side of the square
    pub size: TileSize,
}

/// The generative inpainting service
pub trait Inpainter {
    /// Return a regenerated square of the requested size
    ///
    /// # Errors
    ///
    /// Returns an error on any transport or service failure
    fn inpaint(&self, request: &InpaintRequest<'_>) -> Result<RgbaImage>;
}

/// Focus detector that never finds anything, centring the source
#[derive(Debug, Clone, Copy, Default)]
pub struct NoFocus;

impl FocusDetector for NoFocus {
    fn detect_focus_region(&self, _image: &RgbaImage) -> Result<Detection> {
        Ok(Detection::NotFound)
    }
}

/// Focus region supplied by the user
#[derive(Debug, Clone, Copy)]
pub struct FixedFocus(pub RegionBox);

impl FocusDetector for FixedFocus {
    fn detect_focus_region(&self, _image: &RgbaImage) -> Result<Detection> {
        Ok(Detection::Found(self.0))
    }
}

/// Region detector that reports no regions
#[derive(Debug, Clone, Copy, Default)]
pub struct NoRegions;

impl RegionDetector for NoRegions {
    fn detect_regions(&self, _image: &RgbaImage) -> Result<Vec<RegionBox>> {
        Ok(Vec::new())
    }
}

/// Regions of interest supplied by the user
#[derive(Debug, Clone, Default)]
pub struct FixedRegions(pub Vec<RegionBox>);

impl RegionDetector for FixedRegions {
    fn detect_regions(&self, _image: &RgbaImage) -> Result<Vec<RegionBox>> {
        let mut regions = self.0.clone();
        regions.sort_by_key(|region| region.x0);
        Ok(regions)
    }
}

/// The full set of collaborators one run uses
#[derive(Clone, Copy)]
pub struct Services<'a> {
    /// Face or subject locator
    pub focus: &'a dyn FocusDetector,
    /// Human locator for prompt selection
    pub regions: &'a dyn RegionDetector,
    /// Captioner for the default prompt
    pub describer: &'a dyn Describer,
    /// Text model for fallback derivation
    pub rewriter: &'a dyn PromptRewriter,
    /// Generative inpainting service
    pub inpainter: &'a dyn Inpainter,
}
