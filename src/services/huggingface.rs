//! Hugging Face inference API: image captioning, focus and person detection

use crate::geometry::region::{Detection, RegionBox};
use crate::io::configuration::{
    DEFAULT_DETECTION_MODEL, DEFAULT_FOCUS_LABEL, DEFAULT_HF_API_BASE, DETECTION_THRESHOLD,
    PERSON_LABEL,
};
use crate::io::error::{Result, service_error};
use crate::io::image::encode_png;
use crate::services::collaborators::{Describer, FocusDetector, RegionDetector};
use crate::services::http::{build_client, read_text, transport_error};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;
use reqwest::blocking::{Client, RequestBuilder};
use reqwest::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const CAPTION_SERVICE: &str = "captioning";
const DETECTION_SERVICE: &str = "detection";
const FOCUS_SERVICE: &str = "focus detection";

#[derive(Deserialize)]
struct Caption {
    generated_text: Option<String>,
}

#[derive(Deserialize)]
struct DetectedObject {
    score: f64,
    label: String,
    #[serde(rename = "box")]
    bounds: ObjectBounds,
}

#[derive(Deserialize)]
struct ObjectBounds {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64,
}

/// Client for hosted captioning and object detection models
pub struct HuggingFaceClient {
    http: Client,
    token: Option<String>,
    base_url: String,
    detection_model: String,
    focus_model: Option<String>,
    focus_label: String,
}

impl HuggingFaceClient {
    /// Client for the public inference API
    ///
    /// Requests are sent anonymously when no token is given.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(token: Option<String>) -> Result<Self> {
        Ok(Self {
            http: build_client(CAPTION_SERVICE)?,
            token: token.filter(|token| !token.trim().is_empty()),
            base_url: DEFAULT_HF_API_BASE.to_string(),
            detection_model: DEFAULT_DETECTION_MODEL.to_string(),
            focus_model: None,
            focus_label: DEFAULT_FOCUS_LABEL.to_string(),
        })
    }

    /// Point the client at another inference endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Use a different object detection model
    #[must_use]
    pub fn with_detection_model(mut self, model: impl Into<String>) -> Self {
        self.detection_model = model.into();
        self
    }

    /// Locate the focus with an object detection model reporting `label`
    ///
    /// Without a focus model the client finds no focus.
    #[must_use]
    pub fn with_focus_model(mut self, model: impl Into<String>, label: impl Into<String>) -> Self {
        self.focus_model = Some(model.into());
        self.focus_label = label.into();
        self
    }

    /// Inference URL of a model
    pub fn model_url(&self, model_id: &str) -> String {
        format!("{}/models/{}", self.base_url, model_id.trim_matches('/'))
    }

    fn detect(&self, service: &'static str, model_id: &str, image: &RgbaImage) -> Result<String> {
        let request = self
            .http
            .post(self.model_url(model_id))
            .header(CONTENT_TYPE, "image/png")
            .body(encode_png(image)?);
        let response = self
            .authorized(request)
            .send()
            .map_err(|e| transport_error(service, e))?;
        read_text(service, response)
    }

    fn authorized(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

impl Describer for HuggingFaceClient {
    fn describe(&self, image: &RgbaImage, model_id: &str) -> Result<String> {
        let payload = json!({
            "inputs": {"image": BASE64.encode(encode_png(image)?)},
            "options": {"wait_for_model": true},
        });

        let request = self.http.post(self.model_url(model_id)).json(&payload);
        let response = self
            .authorized(request)
            .send()
            .map_err(|e| transport_error(CAPTION_SERVICE, e))?;
        let body = read_text(CAPTION_SERVICE, response)?;
        parse_caption_response(&body)
    }
}

impl RegionDetector for HuggingFaceClient {
    fn detect_regions(&self, image: &RgbaImage) -> Result<Vec<RegionBox>> {
        let body = self.detect(DETECTION_SERVICE, &self.detection_model, image)?;
        let regions = parse_detection_response(&body, PERSON_LABEL, DETECTION_THRESHOLD)?;
        debug!("{} of the detected objects are '{PERSON_LABEL}'", regions.len());
        Ok(regions)
    }
}

impl FocusDetector for HuggingFaceClient {
    fn detect_focus_region(&self, image: &RgbaImage) -> Result<Detection> {
        let Some(model) = &self.focus_model else {
            return Ok(Detection::NotFound);
        };
        let body = self.detect(FOCUS_SERVICE, model, image)?;
        let detection = parse_focus_response(&body, &self.focus_label, DETECTION_THRESHOLD)?;
        debug!("Focus '{}' detection: {detection:?}", self.focus_label);
        Ok(detection)
    }
}

/// Extract the caption from a captioning response body
///
/// # Errors
///
/// Returns an error if the body is malformed or the caption is empty
pub fn parse_caption_response(body: &str) -> Result<String> {
    let captions: Vec<Caption> = serde_json::from_str(body)
        .map_err(|e| service_error(CAPTION_SERVICE, &format!("unexpected response: {e}")))?;
    captions
        .into_iter()
        .next()
        .and_then(|caption| caption.generated_text)
        .map(|text| text.trim().to_string())
        .filter(|text| !text.is_empty())
        .ok_or_else(|| service_error(CAPTION_SERVICE, &"response contains no caption"))
}

/// Boxes of confident detections with the given label, sorted by left edge
///
/// Fractional coordinates are rounded outwards so the box never shrinks.
///
/// # Errors
///
/// Returns an error if the body is not a list of detections
pub fn parse_detection_response(body: &str, label: &str, threshold: f64) -> Result<Vec<RegionBox>> {
    let mut regions: Vec<RegionBox> = confident_objects(DETECTION_SERVICE, body, label, threshold)?
        .iter()
        .map(DetectedObject::region)
        .collect();
    regions.sort_by_key(|region| region.x0);
    Ok(regions)
}

/// The most confident detection with the given label, if any
///
/// # Errors
///
/// Returns an error if the body is not a list of detections
pub fn parse_focus_response(body: &str, label: &str, threshold: f64) -> Result<Detection> {
    let detection = confident_objects(FOCUS_SERVICE, body, label, threshold)?
        .iter()
        .max_by(|a, b| a.score.total_cmp(&b.score))
        .map_or(Detection::NotFound, |object| Detection::Found(object.region()));
    Ok(detection)
}

fn confident_objects(
    service: &'static str,
    body: &str,
    label: &str,
    threshold: f64,
) -> Result<Vec<DetectedObject>> {
    let objects: Vec<DetectedObject> = serde_json::from_str(body)
        .map_err(|e| service_error(service, &format!("unexpected response: {e}")))?;
    Ok(objects
        .into_iter()
        .filter(|object| object.label == label && object.score >= threshold)
        .collect())
}

impl DetectedObject {
    // Rounded outwards so the box never shrinks
    fn region(&self) -> RegionBox {
        RegionBox::new(
            round_down(self.bounds.xmin),
            round_down(self.bounds.ymin),
            round_up(self.bounds.xmax),
            round_up(self.bounds.ymax),
        )
    }
}

fn round_down(value: f64) -> u32 {
    value.floor().max(0.0) as u32
}

fn round_up(value: f64) -> u32 {
    value.ceil().max(0.0) as u32
}
