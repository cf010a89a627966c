//! Tests for run configuration defaults and validation

#[cfg(test)]
mod tests {
    use outpainter::geometry::expansion::Dimensions;
    use outpainter::io::configuration::{
        DEFAULT_CAPTION_MODEL, DEFAULT_TILE_SIDE, DETECTION_THRESHOLD, FALLBACK_SUFFIX,
        OUTPUT_EXTENSION, OutpaintConfig,
    };
    use outpainter::planning::tiles::TileSize;
    use std::path::PathBuf;

    // Tests defaults applied by the constructor
    // Verified by defaulting humans to true
    #[test]
    fn test_config_defaults() {
        let config = OutpaintConfig::new(1920, 1080, "out.png");

        assert_eq!(config.square, DEFAULT_TILE_SIDE);
        assert_eq!(config.step, None);
        assert_eq!(config.prompt, None);
        assert_eq!(config.fallback, None);
        assert!(!config.humans);
        assert!(!config.verbose);
        assert_eq!(config.prompt_model, DEFAULT_CAPTION_MODEL);
    }

    // Tests the step defaults to half the tile side
    // Verified by defaulting to the full side
    #[test]
    fn test_validate_defaults_step() {
        let config = OutpaintConfig::new(1920, 1080, "out.png");

        let geometry = config.validate(Dimensions::new(800, 600)).unwrap();

        assert_eq!(geometry.tile_size, TileSize::Large);
        assert_eq!(geometry.step, 512);
        assert_eq!(geometry.canvas, Dimensions::new(1920, 1080));
        assert_eq!(geometry.source, Dimensions::new(800, 600));
    }

    // Tests an explicit step is kept
    // Verified by always using the default step
    #[test]
    fn test_validate_explicit_step() {
        let mut config = OutpaintConfig::new(1024, 1024, "out.png");
        config.square = 256;
        config.step = Some(100);

        let geometry = config.validate(Dimensions::new(512, 512)).unwrap();

        assert_eq!(geometry.tile_size, TileSize::Small);
        assert_eq!(geometry.step, 100);
    }

    // Tests each invalid parameter is named in the error
    // Verified by removing the step upper bound
    #[test]
    fn test_validate_rejects_invalid_parameters() {
        let source = Dimensions::new(800, 600);
        let cases: [(fn(&mut OutpaintConfig), &str); 5] = [
            (|c| c.square = 300, "'square'"),
            (|c| c.step = Some(0), "'step'"),
            (|c| c.step = Some(1025), "'step'"),
            (|c| c.height = 1000, "'square'"),
            (
                |c| {
                    c.square = 512;
                    c.width = 700;
                },
                "'size'",
            ),
        ];

        for (mutate, parameter) in cases {
            let mut config = OutpaintConfig::new(1920, 1080, "out.png");
            mutate(&mut config);

            let error = config.validate(source).unwrap_err();

            assert!(error.is_configuration());
            assert!(error.to_string().contains(parameter), "{error}");
        }
    }

    // Tests the output always gets a PNG extension
    // Verified by keeping the caller's extension
    #[test]
    fn test_output_path_forces_png() {
        let mut config = OutpaintConfig::new(1920, 1080, "results/beach.jpg");
        assert_eq!(config.output_path(), PathBuf::from("results/beach.png"));

        config.output = PathBuf::from("results/beach");
        assert_eq!(config.output_path(), PathBuf::from("results/beach.png"));
    }

    // Tests constants used by prompting and detection
    // Verified by changing the suffix
    #[test]
    fn test_constants() {
        assert_eq!(FALLBACK_SUFFIX, "no humans");
        assert_eq!(OUTPUT_EXTENSION, "png");
        assert!((DETECTION_THRESHOLD - 0.6).abs() < f64::EPSILON);
        assert_eq!(DEFAULT_TILE_SIDE, 1024);
    }
}
