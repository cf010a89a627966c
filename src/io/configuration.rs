//! Run configuration, validation and defaults

use crate::geometry::expansion::Dimensions;
use crate::io::error::{Result, invalid_configuration};
use crate::planning::tiles::TileSize;
use std::path::PathBuf;

// Tiling defaults
/// Default tile side in pixels
pub const DEFAULT_TILE_SIDE: u32 = 1024;

// Prompting
/// Suffix appended to the approved descriptors of a derived fallback prompt
pub const FALLBACK_SUFFIX: &str = "no humans";
/// Image captioning model used when no prompt is given
pub const DEFAULT_CAPTION_MODEL: &str = "Salesforce/blip2-opt-2.7b";
/// Chat model used to derive the fallback prompt
pub const DEFAULT_CHAT_MODEL: &str = "gpt-3.5-turbo";

// Region detection
/// Object detection model used to find humans
pub const DEFAULT_DETECTION_MODEL: &str = "facebook/detr-resnet-50";
/// Detector label treated as a region of interest
pub const PERSON_LABEL: &str = "person";
/// Minimum detector confidence for a region of interest
pub const DETECTION_THRESHOLD: f64 = 0.6;
/// Detector label treated as the focus when a focus model is given
pub const DEFAULT_FOCUS_LABEL: &str = "face";

// Services
/// Default base URL of the OpenAI-compatible API
pub const DEFAULT_OPENAI_API_BASE: &str = "https://api.openai.com/v1";
/// Default base URL of the Hugging Face inference API
pub const DEFAULT_HF_API_BASE: &str = "https://api-inference.huggingface.co";
/// Environment variable holding the OpenAI API key
pub const OPENAI_API_KEY_VAR: &str = "OPENAI_API_KEY";
/// Environment variable overriding the OpenAI base URL
pub const OPENAI_API_BASE_VAR: &str = "OPENAI_API_BASE";
/// Environment variable holding the Hugging Face token
pub const HF_API_KEY_VAR: &str = "HUGGINGFACEHUB_API_TOKEN";
/// Transport timeout for a single collaborator request
pub const REQUEST_TIMEOUT_SECS: u64 = 300;

// Progress display
/// Width of the progress bar in characters
pub const PROGRESS_BAR_WIDTH: u16 = 40;

// Output settings
/// Timestamp format shared by all snapshots of one run
pub const SNAPSHOT_TIMESTAMP_FORMAT: &str = "%Y%m%d-%H%M%S";
/// Extension forced onto every written canvas
pub const OUTPUT_EXTENSION: &str = "png";

/// Caller-supplied parameters for one outpainting run
#[derive(Debug, Clone)]
pub struct OutpaintConfig {
    /// Target canvas width
    pub width: u32,
    /// Target canvas height
    pub height: u32,
    /// Requested tile side in pixels
    pub square: u32,
    /// Requested step; defaults to half the tile side
    pub step: Option<u32>,
    /// Primary prompt; captioned from the source when absent
    pub prompt: Option<String>,
    /// Human-free prompt for tiles without regions of interest
    pub fallback: Option<String>,
    /// Detect humans and choose prompts per tile
    pub humans: bool,
    /// Emit debug logs and per-tile snapshots
    pub verbose: bool,
    /// Path of the final canvas
    pub output: PathBuf,
    /// Captioning model identifier
    pub prompt_model: String,
}

impl OutpaintConfig {
    /// Configuration with defaults for everything but size and output
    pub fn new(width: u32, height: u32, output: impl Into<PathBuf>) -> Self {
        Self {
            width,
            height,
            square: DEFAULT_TILE_SIDE,
            step: None,
            prompt: None,
            fallback: None,
            humans: false,
            verbose: false,
            output: output.into(),
            prompt_model: DEFAULT_CAPTION_MODEL.to_string(),
        }
    }

    /// Check the parameters against the loaded source size
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the tile side is unsupported or
    /// larger than the target, the step is out of range, or the target is
    /// smaller than the source.
    pub fn validate(&self, source: Dimensions) -> Result<RunGeometry> {
        let tile_size = TileSize::try_from(self.square)?;
        let step = self.step.unwrap_or_else(|| tile_size.default_step());
        if step == 0 || step > tile_size.pixels() {
            return Err(invalid_configuration(
                "step",
                &step,
                &format!("must be between 1 and the tile side ({})", tile_size.pixels()),
            ));
        }
        if tile_size.pixels() > self.width || tile_size.pixels() > self.height {
            return Err(invalid_configuration(
                "square",
                &tile_size.pixels(),
                &format!("tile does not fit in a {}x{} canvas", self.width, self.height),
            ));
        }
        if self.width < source.width || self.height < source.height {
            return Err(invalid_configuration(
                "size",
                &format!("{}x{}", self.width, self.height),
                &format!(
                    "target must not be smaller than the {}x{} source",
                    source.width, source.height
                ),
            ));
        }

        Ok(RunGeometry {
            source,
            canvas: Dimensions::new(self.width, self.height),
            tile_size,
            step,
        })
    }

    /// Output path with the lossless extension applied
    pub fn output_path(&self) -> PathBuf {
        self.output.with_extension(OUTPUT_EXTENSION)
    }
}

/// Validated sizes a run is planned with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunGeometry {
    /// Source image size
    pub source: Dimensions,
    /// Target canvas size
    pub canvas: Dimensions,
    /// Tile side
    pub tile_size: TileSize,
    /// Stride between straight tiles
    pub step: u32,
}
