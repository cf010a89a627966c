//! Shared blocking HTTP plumbing for collaborator clients

use crate::io::configuration::REQUEST_TIMEOUT_SECS;
use crate::io::error::{OutpaintError, Result, service_error};
use reqwest::StatusCode;
use reqwest::blocking::{Client, Response};
use serde::Deserialize;
use std::time::Duration;

/// Build a client with the collaborator request timeout
///
/// # Errors
///
/// Returns an error if the TLS backend cannot be initialised
pub fn build_client(service: &'static str) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
        .build()
        .map_err(|e| transport_error(service, e))
}

/// Wrap a transport error with the service it came from
pub const fn transport_error(service: &'static str, source: reqwest::Error) -> OutpaintError {
    OutpaintError::Http { service, source }
}

/// Read a response body, turning non-success statuses into service errors
///
/// # Errors
///
/// Returns an error if the status is not 2xx or the body cannot be read
pub fn read_text(service: &'static str, response: Response) -> Result<String> {
    let status = response.status();
    let body = response
        .text()
        .map_err(|e| transport_error(service, e))?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(service_error(service, &status_reason(status, &body)))
    }
}

/// Read a binary response body
///
/// # Errors
///
/// Returns an error if the status is not 2xx or the body cannot be read
pub fn read_bytes(service: &'static str, response: Response) -> Result<Vec<u8>> {
    let status = response.status();
    if !status.is_success() {
        let body = response.text().unwrap_or_default();
        return Err(service_error(service, &status_reason(status, &body)));
    }
    response
        .bytes()
        .map(|bytes| bytes.to_vec())
        .map_err(|e| transport_error(service, e))
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ErrorBody {
    Nested { error: ErrorDetail },
    Flat { error: String },
}

#[derive(Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Human-readable reason for a failed request
///
/// Understands both `{"error": {"message": ..}}` and `{"error": ".."}`
/// bodies and falls back to the raw body text.
pub fn status_reason(status: StatusCode, body: &str) -> String {
    let detail = match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody::Nested { error }) => error.message,
        Ok(ErrorBody::Flat { error }) => error,
        Err(_) => body.trim().to_string(),
    };

    if detail.is_empty() {
        format!("HTTP {status}")
    } else {
        format!("HTTP {status}: {detail}")
    }
}
