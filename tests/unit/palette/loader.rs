//! Tests for manifest parsing, tile construction and concurrent palette loading

#[cfg(test)]
mod tests {
    use capmosaic::MosaicError;
    use capmosaic::analysis::color::Rgb;
    use capmosaic::palette::loader::{Manifest, Palette, Tile, load_palette, tile_identifier};
    use image::{Rgba, RgbaImage};
    use std::fs;
    use std::path::Path;
    use std::time::Duration;

    const GENEROUS_TIMEOUT: Duration = Duration::from_secs(30);

    fn write_tile(dir: &Path, name: &str, color: [u8; 3], size: u32) {
        RgbaImage::from_pixel(size, size, Rgba([color[0], color[1], color[2], 255]))
            .save(dir.join(name))
            .unwrap();
    }

    fn write_manifest(dir: &Path, names: &[&str]) -> std::path::PathBuf {
        let path = dir.join("bottle_caps.json");
        fs::write(&path, serde_json::to_string(names).unwrap()).unwrap();
        path
    }

    // Tests identifiers drop only the final extension
    // Verified by using the file stem of the last path component
    #[test]
    fn test_tile_identifier() {
        assert_eq!(tile_identifier("cola.png"), "cola");
        assert_eq!(tile_identifier("diet.cola.png"), "diet.cola");
        assert_eq!(tile_identifier("sub/cola.jpg"), "sub/cola");
        assert_eq!(tile_identifier("sub.dir/cola"), "sub.dir/cola");
        assert_eq!(tile_identifier("noext"), "noext");
        assert_eq!(tile_identifier("trailing."), "trailing.");
    }

    // Tests a JSON string array parses in order against its base
    // Verified by sorting the filenames
    #[test]
    fn test_manifest_parse() {
        let manifest = Manifest::parse(r#"["b.png", "a.png"]"#, "caps").unwrap();
        assert_eq!(manifest.len(), 2);
        assert_eq!(manifest.filenames(), ["b.png", "a.png"]);

        let entries: Vec<_> = manifest.entries().collect();
        assert_eq!(entries.first().unwrap().0, "b");
        assert_eq!(entries.first().unwrap().1, Path::new("caps").join("b.png"));
    }

    // Tests malformed and empty manifests are rejected
    // Verified by treating an empty list as valid
    #[test]
    fn test_manifest_parse_rejects_bad_content() {
        assert!(matches!(
            Manifest::parse("{\"caps\": 1}", "."),
            Err(MosaicError::ManifestInvalid { .. })
        ));
        assert!(matches!(
            Manifest::parse("[1, 2]", "."),
            Err(MosaicError::ManifestInvalid { .. })
        ));
        assert!(matches!(
            Manifest::parse("[]", "."),
            Err(MosaicError::ManifestInvalid { .. })
        ));
    }

    // Tests identifiers must be unique across extensions
    // Verified by comparing full filenames instead of identifiers
    #[test]
    fn test_manifest_rejects_duplicate_identifiers() {
        let result = Manifest::parse(r#"["cola.png", "cola.jpg"]"#, ".");
        match result {
            Err(MosaicError::DuplicateTile { identifier }) => assert_eq!(identifier, "cola"),
            other => unreachable!("Expected DuplicateTile, got {other:?}"),
        }
    }

    // Tests a missing manifest file is reported as unavailable
    // Verified by mapping read failures to ManifestInvalid
    #[test]
    fn test_manifest_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = Manifest::load(dir.path().join("absent.json"));
        assert!(matches!(
            result,
            Err(MosaicError::ManifestUnavailable { .. })
        ));
    }

    // Tests tiles resolve against the manifest's directory
    // Verified by resolving against the working directory
    #[test]
    fn test_manifest_load_uses_parent_as_base() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), &["cola.png"]);
        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.base(), dir.path());
    }

    // Tests tile average is computed over the whole bitmap
    // Verified by sampling only the first pixel
    #[test]
    fn test_tile_from_image_average() {
        let bitmap = RgbaImage::from_fn(2, 1, |x, _| {
            if x == 0 {
                Rgba([200, 0, 0, 255])
            } else {
                Rgba([0, 0, 100, 255])
            }
        });
        let tile = Tile::from_image("mixed", bitmap).unwrap();
        assert_eq!(tile.identifier, "mixed");
        assert_eq!(tile.average, Rgb::new(100.0, 0.0, 50.0));
        assert!(Tile::from_image("empty", RgbaImage::new(0, 0)).is_err());
    }

    // Tests palette construction rejects duplicate identifiers
    // Verified by skipping the uniqueness check
    #[test]
    fn test_palette_rejects_duplicates() {
        let tile = Tile::from_image("cola", RgbaImage::from_pixel(1, 1, Rgba([1, 2, 3, 255])))
            .unwrap();
        assert!(matches!(
            Palette::new(vec![tile.clone(), tile]),
            Err(MosaicError::DuplicateTile { .. })
        ));
        assert!(Palette::new(Vec::new()).unwrap().is_empty());
    }

    // Tests loaded palette follows manifest order with correct averages
    // Verified by collecting tiles in completion order
    #[test]
    fn test_load_palette_keeps_manifest_order() {
        let dir = tempfile::tempdir().unwrap();
        // Larger first tile tends to finish last
        write_tile(dir.path(), "white.png", [255, 255, 255], 256);
        write_tile(dir.path(), "red.png", [255, 0, 0], 4);
        write_tile(dir.path(), "blue.png", [0, 0, 255], 4);
        let path = write_manifest(dir.path(), &["white.png", "red.png", "blue.png"]);

        let manifest = Manifest::load(&path).unwrap();
        let palette = load_palette(&manifest, GENEROUS_TIMEOUT).unwrap();

        let names: Vec<_> = palette
            .tiles()
            .iter()
            .map(|tile| tile.identifier.as_str())
            .collect();
        assert_eq!(names, vec!["white", "red", "blue"]);
        assert_eq!(
            palette.colors(),
            [
                Rgb::new(255.0, 255.0, 255.0),
                Rgb::new(255.0, 0.0, 0.0),
                Rgb::new(0.0, 0.0, 255.0)
            ]
        );
        assert_eq!(palette.position("blue"), Some(2));
        assert_eq!(palette.get(0).unwrap().bitmap.width(), 256);
    }

    // Tests an undecodable tile fails the whole load
    // Verified by skipping tiles that fail to decode
    #[test]
    fn test_load_palette_decode_failure() {
        let dir = tempfile::tempdir().unwrap();
        write_tile(dir.path(), "red.png", [255, 0, 0], 4);
        fs::write(dir.path().join("broken.png"), b"not a png").unwrap();
        let path = write_manifest(dir.path(), &["red.png", "broken.png"]);

        let manifest = Manifest::load(&path).unwrap();
        match load_palette(&manifest, GENEROUS_TIMEOUT) {
            Err(MosaicError::TileDecode { path, .. }) => {
                assert!(path.ends_with("broken.png"));
            }
            other => unreachable!("Expected TileDecode, got {other:?}"),
        }
    }

    // Tests a tile listed but absent on disk fails the load
    // Verified by ignoring missing files
    #[test]
    fn test_load_palette_missing_tile() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_manifest(dir.path(), &["ghost.png"]);

        let manifest = Manifest::load(&path).unwrap();
        assert!(matches!(
            load_palette(&manifest, GENEROUS_TIMEOUT),
            Err(MosaicError::TileDecode { .. })
        ));
    }

    // Tests loading gives up once the deadline passes
    // Verified by waiting without a deadline
    #[test]
    fn test_load_palette_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let names = ["a.png", "b.png", "c.png", "d.png"];
        for name in names {
            write_tile(dir.path(), name, [10, 20, 30], 1024);
        }
        let path = write_manifest(dir.path(), &names);

        let manifest = Manifest::load(&path).unwrap();
        match load_palette(&manifest, Duration::ZERO) {
            Err(MosaicError::PaletteTimeout {
                expected, loaded, ..
            }) => {
                assert_eq!(expected, 4);
                assert!(loaded < expected);
            }
            other => unreachable!("Expected PaletteTimeout, got {other:?}"),
        }
    }
}
