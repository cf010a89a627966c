//! Per-tile prompt choice and human-free fallback derivation
//!
//! Tiles that overlap a detected human get the full scene prompt. Other
//! tiles get a fallback prompt with human-related content removed, so the
//! generator does not invent extra people in empty margins.

use crate::geometry::region::{RegionBox, any_intersects};
use crate::io::configuration::FALLBACK_SUFFIX;
use serde::Deserialize;
use std::fmt;

/// Primary scene prompt and its optional human-free variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    /// Full scene description, humans included
    pub primary: String,
    /// Scene description without human content
    pub fallback: Option<String>,
}

impl PromptPair {
    /// Create a prompt pair
    pub const fn new(primary: String, fallback: Option<String>) -> Self {
        Self { primary, fallback }
    }
}

/// Chooses the prompt for each tile from the detected regions of interest
#[derive(Debug, Clone)]
pub struct PromptSelector {
    prompts: PromptPair,
    regions: Vec<RegionBox>,
}

impl PromptSelector {
    /// Selector over canvas-space regions
    pub const fn new(prompts: PromptPair, regions: Vec<RegionBox>) -> Self {
        Self { prompts, regions }
    }

    /// The prompts this selector chooses between
    pub const fn prompts(&self) -> &PromptPair {
        &self.prompts
    }

    /// Regions of interest in canvas coordinates
    pub fn regions(&self) -> &[RegionBox] {
        &self.regions
    }

    /// Whether any region of interest overlaps the tile
    pub fn overlaps_region(&self, tile: &RegionBox) -> bool {
        any_intersects(&self.regions, tile)
    }

    /// Prompt for a tile
    ///
    /// Overlapping tiles use the primary prompt. The rest use the fallback,
    /// or the primary prompt when there is no fallback.
    pub fn select(&self, tile: &RegionBox) -> &str {
        if self.overlaps_region(tile) {
            return &self.prompts.primary;
        }
        self.prompts
            .fallback
            .as_deref()
            .unwrap_or(&self.prompts.primary)
    }
}

/// Reason a fallback rewrite could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FallbackError {
    /// The response holds no JSON object at all
    MissingObject,
    /// A JSON object was found but did not parse
    InvalidJson {
        /// Parser message
        reason: String,
    },
    /// The `approved` descriptor list is absent or not a list of strings
    MissingApproved,
    /// Every descriptor was rejected
    NoDescriptors,
}

impl fmt::Display for FallbackError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingObject => write!(f, "response contains no JSON object"),
            Self::InvalidJson { reason } => write!(f, "response is not valid JSON: {reason}"),
            Self::MissingApproved => write!(f, "response has no 'approved' list of strings"),
            Self::NoDescriptors => write!(f, "response approved no descriptors"),
        }
    }
}

impl std::error::Error for FallbackError {}

#[derive(Deserialize)]
struct DescriptorResponse {
    approved: Option<serde_json::Value>,
}

/// Instruction asking a text model to strip human content from a prompt
pub fn fallback_instruction(primary: &str) -> String {
    format!(
        "Create a JSON dictionary. Rewrite this text into one list of short phrases, \
         focusing on style, on the background, and on overall scenery, but ignoring humans \
         and human-related items: \"{primary}\". Put that list in the `descriptors` item. \
         In the `ignored` item, put a list of the items from the `descriptors` list that have \
         any relation to humans, human activity or human properties. In the `approved` item, \
         put a list of the items from the `descriptors` list which are not in the `ignored` \
         list, but also include items from the `descriptors` list that relate to style or \
         time. Output only the JSON dictionary, no commentary or explanations."
    )
}

/// Turn a text model's descriptor response into a fallback prompt
///
/// Approved descriptors are joined with `", "` and suffixed with
/// [`FALLBACK_SUFFIX`]. Surrounding prose or code fences are ignored.
///
/// # Errors
///
/// Returns a [`FallbackError`] when the response is not a JSON object with
/// a non-empty `approved` list of strings.
pub fn parse_fallback_response(raw: &str) -> Result<String, FallbackError> {
    let object = extract_json_object(raw).ok_or(FallbackError::MissingObject)?;
    let response: DescriptorResponse =
        serde_json::from_str(object).map_err(|e| FallbackError::InvalidJson {
            reason: e.to_string(),
        })?;

    let approved = response
        .approved
        .and_then(|value| serde_json::from_value::<Vec<String>>(value).ok())
        .ok_or(FallbackError::MissingApproved)?;

    let descriptors: Vec<&str> = approved
        .iter()
        .map(|descriptor| descriptor.trim())
        .filter(|descriptor| !descriptor.is_empty())
        .collect();
    if descriptors.is_empty() {
        return Err(FallbackError::NoDescriptors);
    }

    Ok(format!("{}, {FALLBACK_SUFFIX}", descriptors.join(", ")))
}

// Outermost `{ ... }` span
fn extract_json_object(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| raw.get(start..=end)).flatten()
}
