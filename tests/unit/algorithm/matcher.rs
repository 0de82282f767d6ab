//! Tests for L1 colour distance, nearest-tile search and tally updates

#[cfg(test)]
mod tests {
    use capmosaic::MosaicError;
    use capmosaic::algorithm::matcher::{
        color_distance, match_tile, match_tile_index, nearest_tile_index,
    };
    use capmosaic::analysis::color::Rgb;
    use capmosaic::palette::loader::{Palette, Tile};
    use capmosaic::palette::tally::UsageTally;
    use image::{Rgba, RgbaImage};

    fn palette(tiles: &[(&str, [u8; 3])]) -> Palette {
        Palette::new(
            tiles
                .iter()
                .map(|(name, [r, g, b])| {
                    Tile::from_image(*name, RgbaImage::from_pixel(3, 3, Rgba([*r, *g, *b, 255])))
                        .unwrap()
                })
                .collect(),
        )
        .unwrap()
    }

    // Tests distance is the sum of absolute channel differences
    // Verified by switching to squared differences
    #[test]
    fn test_color_distance_is_l1() {
        let a = Rgb::new(10.0, 20.0, 30.0);
        let b = Rgb::new(13.0, 16.0, 30.5);
        assert!((color_distance(a, b) - 7.5).abs() < f64::EPSILON);
        assert!((color_distance(b, a) - 7.5).abs() < f64::EPSILON);
        assert!(color_distance(a, a).abs() < f64::EPSILON);
    }

    // Tests L1 and Euclidean disagree and L1 wins
    // Verified by comparing Euclidean distances
    #[test]
    fn test_nearest_uses_l1_not_euclidean() {
        // L1: 70 vs 65; Euclidean: ~49.5 vs 65
        let colors = [Rgb::new(35.0, 35.0, 0.0), Rgb::new(65.0, 0.0, 0.0)];
        assert_eq!(nearest_tile_index(Rgb::new(0.0, 0.0, 0.0), &colors), Some(1));
    }

    // Tests an exact palette colour matches its own tile
    // Verified by starting the scan at index 1
    #[test]
    fn test_exact_color_matches_its_tile() {
        let colors = [
            Rgb::new(255.0, 0.0, 0.0),
            Rgb::new(0.0, 255.0, 0.0),
            Rgb::new(0.0, 0.0, 255.0),
        ];
        for (index, &color) in colors.iter().enumerate() {
            assert_eq!(nearest_tile_index(color, &colors), Some(index));
        }
    }

    // Tests ties go to the lowest index
    // Verified by replacing on equal distance
    #[test]
    fn test_ties_pick_lowest_index() {
        let colors = [
            Rgb::new(50.0, 50.0, 50.0),
            Rgb::new(10.0, 10.0, 10.0),
            Rgb::new(10.0, 10.0, 10.0),
        ];
        assert_eq!(
            nearest_tile_index(Rgb::new(10.0, 10.0, 10.0), &colors),
            Some(1)
        );

        // Equidistant in opposite directions
        let colors = [Rgb::new(90.0, 100.0, 100.0), Rgb::new(110.0, 100.0, 100.0)];
        assert_eq!(
            nearest_tile_index(Rgb::new(100.0, 100.0, 100.0), &colors),
            Some(0)
        );
    }

    // Tests an empty colour list has no nearest index
    // Verified by defaulting to index 0
    #[test]
    fn test_empty_colors() {
        assert_eq!(nearest_tile_index(Rgb::default(), &[]), None);
    }

    // Tests matching returns the tile and counts its use
    // Verified by removing the tally update
    #[test]
    fn test_match_tile_records_usage() {
        let palette = palette(&[("red", [255, 0, 0]), ("green", [0, 255, 0])]);
        let mut tally = UsageTally::for_palette(&palette);

        let tile = match_tile(Rgb::new(20.0, 240.0, 5.0), &palette, &mut tally).unwrap();
        assert_eq!(tile.identifier, "green");
        let tile = match_tile(Rgb::new(20.0, 240.0, 5.0), &palette, &mut tally).unwrap();
        assert_eq!(tile.identifier, "green");

        assert_eq!(tally.get("green"), Some(2));
        assert_eq!(tally.get("red"), Some(0));

        let index = match_tile_index(Rgb::new(250.0, 0.0, 0.0), &palette, &mut tally).unwrap();
        assert_eq!(index, 0);
        assert_eq!(tally.total(), 3);
    }

    // Tests an empty palette fails without touching the tally
    // Verified by recording before the emptiness check
    #[test]
    fn test_match_tile_empty_palette() {
        let other = palette(&[("red", [255, 0, 0])]);
        let empty = Palette::new(Vec::new()).unwrap();
        let mut tally = UsageTally::for_palette(&other);

        let result = match_tile(Rgb::new(255.0, 0.0, 0.0), &empty, &mut tally);
        assert!(matches!(result, Err(MosaicError::EmptyPalette)));
        assert_eq!(tally.total(), 0);
    }
}
