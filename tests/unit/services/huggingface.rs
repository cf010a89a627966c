//! Tests for Hugging Face model URLs and response parsing

#[cfg(test)]
mod tests {
    use image::RgbaImage;
    use outpainter::geometry::region::{Detection, RegionBox};
    use outpainter::io::configuration::{DEFAULT_FOCUS_LABEL, DETECTION_THRESHOLD, PERSON_LABEL};
    use outpainter::services::collaborators::FocusDetector;
    use outpainter::services::huggingface::{
        HuggingFaceClient, parse_caption_response, parse_detection_response,
        parse_focus_response,
    };

    // Tests model URLs are built under the models path
    // Verified by omitting the models segment
    #[test]
    fn test_model_url() {
        let client = HuggingFaceClient::new(None)
            .unwrap()
            .with_base_url("http://localhost:9000/");

        assert_eq!(
            client.model_url("Salesforce/blip2-opt-2.7b"),
            "http://localhost:9000/models/Salesforce/blip2-opt-2.7b"
        );
    }

    // Tests the first caption is used and trimmed
    // Verified by reading the last caption
    #[test]
    fn test_parse_caption() {
        let body = r#"[{"generated_text": " a dog running on a beach \n"}, {"generated_text": "other"}]"#;

        assert_eq!(parse_caption_response(body).unwrap(), "a dog running on a beach");
    }

    // Tests empty or malformed captions are errors
    // Verified by accepting blank captions
    #[test]
    fn test_parse_caption_failures() {
        assert!(parse_caption_response("[]").is_err());
        assert!(parse_caption_response(r#"[{"generated_text": "   "}]"#).is_err());
        assert!(parse_caption_response(r#"{"error": "loading"}"#).is_err());
    }

    // Tests only confident people are kept, rounded outwards and sorted
    // Verified by keeping low-confidence detections
    #[test]
    fn test_parse_detections() {
        let body = r#"[
            {"score": 0.98, "label": "person", "box": {"xmin": 400.2, "ymin": 10.7, "xmax": 500.4, "ymax": 300.5}},
            {"score": 0.95, "label": "dog", "box": {"xmin": 5, "ymin": 5, "xmax": 50, "ymax": 50}},
            {"score": 0.40, "label": "person", "box": {"xmin": 0, "ymin": 0, "xmax": 10, "ymax": 10}},
            {"score": 0.61, "label": "person", "box": {"xmin": 120, "ymin": 40, "xmax": 180, "ymax": 220}}
        ]"#;

        let regions = parse_detection_response(body, PERSON_LABEL, DETECTION_THRESHOLD).unwrap();

        assert_eq!(
            regions,
            vec![
                RegionBox::new(120, 40, 180, 220),
                RegionBox::new(400, 10, 501, 301),
            ]
        );
    }

    // Tests coordinates near zero do not underflow
    // Verified by removing the lower bound
    #[test]
    fn test_parse_detection_at_origin() {
        let body = r#"[{"score": 0.9, "label": "person", "box": {"xmin": -2.5, "ymin": 0.3, "xmax": 20.0, "ymax": 20.0}}]"#;

        let regions = parse_detection_response(body, "person", 0.6).unwrap();

        assert_eq!(regions, vec![RegionBox::new(0, 0, 20, 20)]);
    }

    // Tests malformed detector output is an error
    // Verified by returning no regions
    #[test]
    fn test_parse_detection_failure() {
        assert!(parse_detection_response(r#"{"error": "loading"}"#, "person", 0.6).is_err());
        assert!(parse_detection_response("[]", "person", 0.6).unwrap().is_empty());
    }

    // Tests the most confident matching box becomes the focus
    // Verified by taking the first matching box
    #[test]
    fn test_parse_focus_picks_most_confident() {
        let body = r#"[
            {"score": 0.70, "label": "face", "box": {"xmin": 10, "ymin": 10, "xmax": 40, "ymax": 40}},
            {"score": 0.99, "label": "person", "box": {"xmin": 0, "ymin": 0, "xmax": 300, "ymax": 300}},
            {"score": 0.93, "label": "face", "box": {"xmin": 200.4, "ymin": 50.6, "xmax": 260.2, "ymax": 120.9}}
        ]"#;

        let detection = parse_focus_response(body, DEFAULT_FOCUS_LABEL, DETECTION_THRESHOLD).unwrap();

        assert_eq!(detection, Detection::Found(RegionBox::new(200, 50, 261, 121)));
    }

    // Tests weak or differently labelled detections leave no focus
    // Verified by ignoring the threshold
    #[test]
    fn test_parse_focus_not_found() {
        let body = r#"[
            {"score": 0.30, "label": "face", "box": {"xmin": 10, "ymin": 10, "xmax": 40, "ymax": 40}},
            {"score": 0.99, "label": "person", "box": {"xmin": 0, "ymin": 0, "xmax": 300, "ymax": 300}}
        ]"#;

        assert_eq!(
            parse_focus_response(body, "face", 0.6).unwrap(),
            Detection::NotFound
        );
        assert!(parse_focus_response(r#"{"error": "loading"}"#, "face", 0.6).is_err());
    }

    // Tests a client without a focus model finds no focus and sends nothing
    // Verified by defaulting to a focus model
    #[test]
    fn test_focus_without_model() {
        let client = HuggingFaceClient::new(None)
            .unwrap()
            .with_base_url("http://127.0.0.1:9");

        let detection = client
            .detect_focus_region(&RgbaImage::new(8, 8))
            .unwrap();

        assert_eq!(detection, Detection::NotFound);
    }
}
