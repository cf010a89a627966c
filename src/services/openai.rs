//! OpenAI-compatible image editing and chat completion

use crate::io::configuration::{DEFAULT_CHAT_MODEL, DEFAULT_OPENAI_API_BASE};
use crate::io::error::{Result, service_error};
use crate::io::image::{decode_rgba, encode_png};
use crate::services::collaborators::{InpaintRequest, Inpainter, PromptRewriter};
use crate::services::http::{build_client, read_bytes, read_text, transport_error};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use image::RgbaImage;
use reqwest::blocking::Client;
use reqwest::blocking::multipart::{Form, Part};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

const INPAINT_SERVICE: &str = "inpainting";
const CHAT_SERVICE: &str = "text completion";

/// Generated image as returned by the edit endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImagePayload {
    /// Image bytes delivered inline
    Inline(Vec<u8>),
    /// Image hosted at a download URL
    Url(String),
}

#[derive(Deserialize)]
struct ImageEditResponse {
    data: Vec<ImageDatum>,
}

#[derive(Deserialize)]
struct ImageDatum {
    b64_json: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

/// Client for `/images/edits` and `/chat/completions`
pub struct OpenAiClient {
    http: Client,
    api_key: String,
    base_url: String,
    chat_model: String,
}

impl OpenAiClient {
    /// Client for the default API base
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        Ok(Self {
            http: build_client(INPAINT_SERVICE)?,
            api_key: api_key.into(),
            base_url: DEFAULT_OPENAI_API_BASE.to_string(),
            chat_model: DEFAULT_CHAT_MODEL.to_string(),
        })
    }

    /// Point the client at another compatible endpoint
    #[must_use]
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    /// Use a different chat model for prompt rewriting
    #[must_use]
    pub fn with_chat_model(mut self, model: impl Into<String>) -> Self {
        self.chat_model = model.into();
        self
    }

    /// Endpoint URL for an API path
    pub fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn download(&self, url: &str) -> Result<Vec<u8>> {
        let response = self
            .http
            .get(url)
            .send()
            .map_err(|e| transport_error(INPAINT_SERVICE, e))?;
        read_bytes(INPAINT_SERVICE, response)
    }
}

fn png_part(bytes: Vec<u8>, file_name: &'static str) -> Result<Part> {
    Part::bytes(bytes)
        .file_name(file_name)
        .mime_str("image/png")
        .map_err(|e| transport_error(INPAINT_SERVICE, e))
}

impl Inpainter for OpenAiClient {
    fn inpaint(&self, request: &InpaintRequest<'_>) -> Result<RgbaImage> {
        let form = Form::new()
            .part("image", png_part(encode_png(request.image)?, "image.png")?)
            .part("mask", png_part(encode_png(request.mask)?, "mask.png")?)
            .text("prompt", request.prompt.to_string())
            .text("n", "1")
            .text("size", request.size.api_size())
            .text("response_format", "b64_json");

        let response = self
            .http
            .post(self.endpoint("images/edits"))
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .map_err(|e| transport_error(INPAINT_SERVICE, e))?;
        let body = read_text(INPAINT_SERVICE, response)?;

        let bytes = match parse_image_edit_response(&body)? {
            ImagePayload::Inline(bytes) => bytes,
            ImagePayload::Url(url) => {
                debug!("Downloading inpainted square from {url}");
                self.download(&url)?
            }
        };
        decode_rgba(&bytes)
    }
}

impl PromptRewriter for OpenAiClient {
    fn complete(&self, instruction: &str) -> Result<String> {
        let payload = json!({
            "model": self.chat_model,
            "messages": [
                {"role": "system", "content": ""},
                {"role": "user", "content": instruction},
            ],
        });

        let response = self
            .http
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .map_err(|e| transport_error(CHAT_SERVICE, e))?;
        let body = read_text(CHAT_SERVICE, response)?;
        parse_chat_response(&body)
    }
}

/// Extract the first generated image from an edit response body
///
/// # Errors
///
/// Returns an error if the body is not an edit response, holds no image, or
/// carries invalid base64
pub fn parse_image_edit_response(body: &str) -> Result<ImagePayload> {
    let response: ImageEditResponse = serde_json::from_str(body)
        .map_err(|e| service_error(INPAINT_SERVICE, &format!("unexpected response: {e}")))?;
    let datum = response
        .data
        .into_iter()
        .next()
        .ok_or_else(|| service_error(INPAINT_SERVICE, &"response contains no image"))?;

    match (datum.b64_json, datum.url) {
        (Some(encoded), _) => BASE64
            .decode(encoded.trim())
            .map(ImagePayload::Inline)
            .map_err(|e| service_error(INPAINT_SERVICE, &format!("invalid base64 image: {e}"))),
        (None, Some(url)) => Ok(ImagePayload::Url(url)),
        (None, None) => Err(service_error(
            INPAINT_SERVICE,
            &"response image has neither data nor URL",
        )),
    }
}

/// Extract the assistant message from a chat completion body
///
/// # Errors
///
/// Returns an error if the body is not a chat completion or has no content
pub fn parse_chat_response(body: &str) -> Result<String> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| service_error(CHAT_SERVICE, &format!("unexpected response: {e}")))?;
    response
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .ok_or_else(|| service_error(CHAT_SERVICE, &"response contains no message"))
}
