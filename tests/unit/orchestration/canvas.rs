//! Tests for canvas pasting and cropping

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};
    use outpainter::geometry::expansion::Dimensions;
    use outpainter::orchestration::canvas::{Canvas, TRANSPARENT};
    use outpainter::planning::tiles::{Tile, TileSize};

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    // Tests a new canvas is fully transparent
    // Verified by filling with opaque black
    #[test]
    fn test_new_canvas_is_transparent() {
        let canvas = Canvas::new(Dimensions::new(300, 200));

        assert_eq!(canvas.dimensions(), Dimensions::new(300, 200));
        assert!(canvas.pixels().pixels().all(|pixel| *pixel == TRANSPARENT));
    }

    // Tests pasting replaces pixels at the given offset
    // Verified by swapping the paste coordinates
    #[test]
    fn test_paste_at_offset() {
        let mut canvas = Canvas::new(Dimensions::new(100, 80));

        canvas.paste(&RgbaImage::from_pixel(10, 20, RED), 30, 40);

        assert_eq!(*canvas.pixels().get_pixel(30, 40), RED);
        assert_eq!(*canvas.pixels().get_pixel(39, 59), RED);
        assert_eq!(*canvas.pixels().get_pixel(40, 40), TRANSPARENT);
        assert_eq!(*canvas.pixels().get_pixel(30, 60), TRANSPARENT);
    }

    // Tests pasting replaces rather than blends
    // Verified by alpha compositing the pasted image
    #[test]
    fn test_paste_replaces_pixels() {
        let mut canvas = Canvas::new(Dimensions::new(10, 10));
        canvas.paste(&RgbaImage::from_pixel(10, 10, RED), 0, 0);

        canvas.paste(&RgbaImage::from_pixel(5, 5, TRANSPARENT), 0, 0);

        assert_eq!(*canvas.pixels().get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*canvas.pixels().get_pixel(5, 5), RED);
    }

    // Tests parts outside the canvas are dropped
    // Verified by growing the canvas on paste
    #[test]
    fn test_paste_clips_at_edges() {
        let mut canvas = Canvas::new(Dimensions::new(50, 50));

        canvas.paste(&RgbaImage::from_pixel(30, 30, RED), 40, 40);

        assert_eq!(canvas.dimensions(), Dimensions::new(50, 50));
        assert_eq!(*canvas.pixels().get_pixel(49, 49), RED);
    }

    // Tests crops copy the square under a tile
    // Verified by cropping from the origin
    #[test]
    fn test_crop_tile() {
        let mut canvas = Canvas::new(Dimensions::new(512, 512));
        canvas.paste(&RgbaImage::from_pixel(10, 10, RED), 300, 300);

        let square = canvas.crop(&Tile::new(256, 256, TileSize::Small));

        assert_eq!(square.dimensions(), (256, 256));
        assert_eq!(*square.get_pixel(44, 44), RED);
        assert_eq!(*square.get_pixel(43, 44), TRANSPARENT);
    }
}
