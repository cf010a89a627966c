//! Command-line interface wiring the outpainter to its HTTP collaborators

use crate::geometry::region::RegionBox;
use crate::io::configuration::{
    DEFAULT_CAPTION_MODEL, DEFAULT_CHAT_MODEL, DEFAULT_DETECTION_MODEL, DEFAULT_FOCUS_LABEL,
    DEFAULT_HF_API_BASE, DEFAULT_OPENAI_API_BASE, DEFAULT_TILE_SIDE, HF_API_KEY_VAR,
    OPENAI_API_BASE_VAR, OPENAI_API_KEY_VAR, OutpaintConfig,
};
use crate::io::error::{OutpaintError, Result};
use crate::io::image::load_rgba;
use crate::io::logging::init_logging;
use crate::io::progress::ProgressReporter;
use crate::orchestration::executor::{Outpainter, RunReport};
use crate::services::collaborators::{
    FixedFocus, FixedRegions, FocusDetector, NoFocus, NoRegions, RegionDetector, Services,
};
use crate::services::huggingface::HuggingFaceClient;
use crate::services::openai::OpenAiClient;
use clap::Parser;
use std::path::PathBuf;
use tracing::info;

#[derive(Parser)]
#[command(name = "outpainter")]
#[command(
    author,
    version,
    about = "Extend an image to a larger canvas by inpainting it square by square"
)]
/// Command-line arguments for an outpainting run
pub struct Cli {
    /// Source image to extend
    #[arg(value_name = "IMAGE")]
    pub image: PathBuf,

    /// Where to write the result (always saved as PNG)
    #[arg(value_name = "OUTPUT")]
    pub output: PathBuf,

    /// Width of the output image in pixels
    #[arg(short = 'w', long)]
    pub width: u32,

    /// Height of the output image in pixels
    #[arg(short = 'H', long)]
    pub height: u32,

    /// Prompt describing the scene; captioned from the image if omitted
    #[arg(short, long)]
    pub prompt: Option<String>,

    /// Prompt for squares without humans; derived automatically with --humans
    #[arg(short, long)]
    pub fallback: Option<String>,

    /// Pixels to move the square between steps [default: half the square]
    #[arg(short, long)]
    pub step: Option<u32>,

    /// Side of the inpainted square: 256, 512 or 1024
    #[arg(long, default_value_t = DEFAULT_TILE_SIDE)]
    pub square: u32,

    /// Detect humans and use the fallback prompt for squares without them
    #[arg(long)]
    pub humans: bool,

    /// Log details and save a snapshot after every square
    #[arg(short, long)]
    pub verbose: bool,

    /// Suppress the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Face or subject box `x0,y0,x1,y1` in source pixels to anchor the image on
    #[arg(long, value_parser = parse_region)]
    pub focus: Option<RegionBox>,

    /// Human box `x0,y0,x1,y1` in source pixels, replacing detection (repeatable)
    #[arg(long = "region", value_parser = parse_region)]
    pub regions: Vec<RegionBox>,

    /// OpenAI API key
    #[arg(long, env = OPENAI_API_KEY_VAR, hide_env_values = true)]
    pub openai_api_key: Option<String>,

    /// Base URL of the OpenAI-compatible API
    #[arg(long, env = OPENAI_API_BASE_VAR, default_value = DEFAULT_OPENAI_API_BASE)]
    pub openai_api_base: String,

    /// Hugging Face API token
    #[arg(long, env = HF_API_KEY_VAR, hide_env_values = true)]
    pub hf_api_key: Option<String>,

    /// Base URL of the Hugging Face inference API
    #[arg(long, default_value = DEFAULT_HF_API_BASE)]
    pub hf_api_base: String,

    /// Hugging Face model used to describe the image
    #[arg(long, default_value = DEFAULT_CAPTION_MODEL)]
    pub prompt_model: String,

    /// Hugging Face model used to detect humans
    #[arg(long, default_value = DEFAULT_DETECTION_MODEL)]
    pub detection_model: String,

    /// Hugging Face object detection model used to find the focus when --focus is absent
    #[arg(long)]
    pub focus_model: Option<String>,

    /// Label the focus model reports for the subject to anchor on
    #[arg(long, default_value = DEFAULT_FOCUS_LABEL)]
    pub focus_label: String,

    /// Chat model used to derive the fallback prompt
    #[arg(long, default_value = DEFAULT_CHAT_MODEL)]
    pub chat_model: String,
}

impl Cli {
    /// Check if progress should be displayed
    pub const fn should_show_progress(&self) -> bool {
        !self.quiet
    }

    /// Run parameters described by these arguments
    pub fn config(&self) -> OutpaintConfig {
        OutpaintConfig {
            width: self.width,
            height: self.height,
            square: self.square,
            step: self.step,
            prompt: self.prompt.clone(),
            fallback: self.fallback.clone(),
            humans: self.humans,
            verbose: self.verbose,
            output: self.output.clone(),
            prompt_model: self.prompt_model.clone(),
        }
    }

    /// Outpaint the image and write the result
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The OpenAI API key is missing
    /// - The source image cannot be loaded
    /// - The configuration does not fit the image
    /// - Any collaborator or tile fails
    pub fn run(&self) -> Result<RunReport> {
        init_logging(self.verbose);
        info!("Image path: {}", self.image.display());
        info!("Output path: {}", self.output.display());

        let api_key = self
            .openai_api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or(OutpaintError::MissingCredential {
                variable: OPENAI_API_KEY_VAR,
            })?;
        let source = load_rgba(&self.image)?;

        let openai = OpenAiClient::new(api_key)?
            .with_base_url(&self.openai_api_base)
            .with_chat_model(self.chat_model.clone());
        let mut huggingface = HuggingFaceClient::new(self.hf_api_key.clone())?
            .with_base_url(&self.hf_api_base)
            .with_detection_model(self.detection_model.clone());
        if let Some(model) = &self.focus_model {
            huggingface = huggingface.with_focus_model(model.clone(), self.focus_label.clone());
        }

        let fixed_focus = self.focus.map(FixedFocus);
        let focus: &dyn FocusDetector = match (&fixed_focus, &self.focus_model) {
            (Some(fixed), _) => fixed,
            (None, Some(_)) => &huggingface,
            (None, None) => &NoFocus,
        };
        let fixed_regions = FixedRegions(self.regions.clone());
        let regions: &dyn RegionDetector = match (self.humans, self.regions.is_empty()) {
            (false, _) => &NoRegions,
            (true, true) => &huggingface,
            (true, false) => &fixed_regions,
        };

        let services = Services {
            focus,
            regions,
            describer: &huggingface,
            rewriter: &openai,
            inpainter: &openai,
        };

        let prepared = Outpainter::prepare(self.config(), &source, services)?;
        let total = prepared.plan().len();
        let mut outpainter = if self.should_show_progress() {
            prepared.with_progress(ProgressReporter::new(total))
        } else {
            prepared
        };
        outpainter.run()
    }
}

/// Parse a box given as `x0,y0,x1,y1`
///
/// # Errors
///
/// Returns a message if there are not exactly four non-negative integers
pub fn parse_region(value: &str) -> std::result::Result<RegionBox, String> {
    let coordinates = value
        .split(',')
        .map(|part| part.trim().parse::<u32>())
        .collect::<std::result::Result<Vec<_>, _>>()
        .map_err(|e| format!("invalid coordinate in '{value}': {e}"))?;

    match coordinates.as_slice() {
        &[x0, y0, x1, y1] => Ok(RegionBox::new(x0, y0, x1, y1)),
        _ => Err(format!("expected x0,y0,x1,y1 but got '{value}'")),
    }
}
