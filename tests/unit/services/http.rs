//! Tests for failed-request reason extraction

#[cfg(test)]
mod tests {
    use outpainter::services::http::{build_client, status_reason};
    use reqwest::StatusCode;

    // Tests nested error messages are extracted
    // Verified by returning the raw body
    #[test]
    fn test_nested_error_message() {
        let reason = status_reason(
            StatusCode::BAD_REQUEST,
            r#"{"error": {"message": "Invalid image size", "type": "invalid_request_error"}}"#,
        );

        assert_eq!(reason, "HTTP 400 Bad Request: Invalid image size");
    }

    // Tests flat error strings are extracted
    // Verified by only handling nested errors
    #[test]
    fn test_flat_error_message() {
        let reason = status_reason(
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"error": "Model is currently loading"}"#,
        );

        assert_eq!(reason, "HTTP 503 Service Unavailable: Model is currently loading");
    }

    // Tests unstructured and empty bodies
    // Verified by dropping the status code
    #[test]
    fn test_plain_and_empty_bodies() {
        assert_eq!(
            status_reason(StatusCode::BAD_GATEWAY, "  upstream timeout \n"),
            "HTTP 502 Bad Gateway: upstream timeout"
        );
        assert_eq!(
            status_reason(StatusCode::UNAUTHORIZED, ""),
            "HTTP 401 Unauthorized"
        );
    }

    // Tests a client can be built without contacting anything
    // Verified by failing on missing TLS roots
    #[test]
    fn test_build_client() {
        assert!(build_client("inpainting").is_ok());
    }
}
