//! Tests for OpenAI endpoint construction and response parsing

#[cfg(test)]
mod tests {
    use base64::Engine as _;
    use base64::engine::general_purpose::STANDARD as BASE64;
    use outpainter::OutpaintError;
    use outpainter::services::openai::{
        ImagePayload, OpenAiClient, parse_chat_response, parse_image_edit_response,
    };

    // Tests endpoints join the base URL and path with one slash
    // Verified by keeping the trailing slash
    #[test]
    fn test_endpoints() {
        let client = OpenAiClient::new("sk-test")
            .unwrap()
            .with_base_url("http://localhost:8080/v1/")
            .with_chat_model("gpt-4o-mini");

        assert_eq!(
            client.endpoint("images/edits"),
            "http://localhost:8080/v1/images/edits"
        );
        assert_eq!(
            client.endpoint("/chat/completions"),
            "http://localhost:8080/v1/chat/completions"
        );
    }

    // Tests the default base URL
    // Verified by changing the default API host
    #[test]
    fn test_default_endpoint() {
        let client = OpenAiClient::new("sk-test").unwrap();

        assert_eq!(
            client.endpoint("images/edits"),
            "https://api.openai.com/v1/images/edits"
        );
    }

    // Tests inline base64 images are decoded
    // Verified by returning the encoded text
    #[test]
    fn test_parse_inline_image() {
        let body = format!(
            r#"{{"created": 1, "data": [{{"b64_json": "{}"}}]}}"#,
            BASE64.encode(b"png bytes")
        );

        let payload = parse_image_edit_response(&body).unwrap();

        assert_eq!(payload, ImagePayload::Inline(b"png bytes".to_vec()));
    }

    // Tests hosted images are returned as URLs
    // Verified by requiring inline data
    #[test]
    fn test_parse_url_image() {
        let body = r#"{"data": [{"url": "https://example.com/square.png"}]}"#;

        let payload = parse_image_edit_response(body).unwrap();

        assert_eq!(
            payload,
            ImagePayload::Url("https://example.com/square.png".to_string())
        );
    }

    // Tests unusable edit responses are service errors
    // Verified by returning an empty image
    #[test]
    fn test_parse_image_failures() {
        for body in [
            r#"{"data": []}"#,
            r#"{"data": [{}]}"#,
            r#"{"data": [{"b64_json": "***"}]}"#,
            "not json",
        ] {
            let error = parse_image_edit_response(body).unwrap_err();
            assert!(matches!(error, OutpaintError::Service { .. }), "{body}");
        }
    }

    // Tests the assistant message is extracted
    // Verified by reading the system message
    #[test]
    fn test_parse_chat_response() {
        let body = r#"{"choices": [{"index": 0, "message": {"role": "assistant", "content": "{\"approved\": [\"sea\"]}"}}]}"#;

        assert_eq!(parse_chat_response(body).unwrap(), r#"{"approved": ["sea"]}"#);
    }

    // Tests chat responses without content are service errors
    // Verified by returning an empty string
    #[test]
    fn test_parse_chat_failures() {
        assert!(parse_chat_response(r#"{"choices": []}"#).is_err());
        assert!(parse_chat_response(r#"{"choices": [{"message": {"content": null}}]}"#).is_err());
        assert!(parse_chat_response("[]").is_err());
    }
}
