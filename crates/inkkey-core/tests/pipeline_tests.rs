use image::{ImageFormat, Rgba};
use inkkey_core::*;
use std::io::Cursor;
use std::sync::atomic::{AtomicBool, Ordering};

const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);
const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

fn png_bytes(image: &RasterImage) -> Vec<u8> {
    let mut buffer = Cursor::new(Vec::new());
    image.write_to(&mut buffer, ImageFormat::Png).unwrap();
    buffer.into_inner()
}

fn options(num_keys: usize, plate_width_mm: f32, image_width_mm: f32) -> ProcessingOptions {
    ProcessingOptions {
        num_keys,
        black_generation: 0.7,
        rotation: Rotation::None,
        plate_width_mm,
        image_width_mm,
    }
}

/// Left half red, right half white
fn half_red(width: u32, height: u32) -> RasterImage {
    RasterImage::from_fn(width, height, |x, _| if x < width / 2 { RED } else { WHITE })
}

/// Hands out a fixed raster and records whether it was asked to
struct FixedDecoder {
    raster: RasterImage,
    called: AtomicBool,
}

impl FixedDecoder {
    fn new(raster: RasterImage) -> Self {
        Self {
            raster,
            called: AtomicBool::new(false),
        }
    }
}

impl RasterDecoder for FixedDecoder {
    async fn decode(&self, _source: ImageSource) -> Result<RasterImage> {
        self.called.store(true, Ordering::SeqCst);
        Ok(self.raster.clone())
    }
}

#[tokio::test]
async fn test_pure_red_fills_plate() {
    let image = RasterImage::from_pixel(4, 4, RED);
    let levels = process(png_bytes(&image), &options(2, 500.0, 500.0))
        .await
        .unwrap();

    assert_eq!(levels.c, vec![0, 0]);
    assert_eq!(levels.m, vec![100, 100]);
    assert_eq!(levels.y, vec![100, 100]);
    assert_eq!(levels.k, vec![0, 0]);
}

#[tokio::test]
async fn test_narrow_image_leaves_white_zones() {
    // 2000 px image over 500 mm on a 1000 mm plate: 4000 px plate, image
    // occupies the middle two of four zones
    let image = RasterImage::from_pixel(8, 2, RED);
    let levels = process(png_bytes(&image), &options(4, 1000.0, 500.0))
        .await
        .unwrap();

    assert_eq!(levels.zone(0), Some(Cmyk::WHITE));
    assert_eq!(levels.zone(1), Some(Cmyk::new(0, 100, 100, 0)));
    assert_eq!(levels.zone(2), Some(Cmyk::new(0, 100, 100, 0)));
    assert_eq!(levels.zone(3), Some(Cmyk::WHITE));
}

#[tokio::test]
async fn test_more_keys_than_plate_columns() {
    // A 1 mm plate under a 1000 mm image is only 2 px wide
    let image = RasterImage::from_pixel(8, 2, RED);
    let levels = process(png_bytes(&image), &options(5, 1.0, 1000.0))
        .await
        .unwrap();

    assert_eq!(levels.num_keys(), 5);
    // Columns land in zones 0 and 2, the rest are empty
    assert_eq!(levels.m, vec![100, 0, 100, 0, 0]);
    assert_eq!(levels.c, vec![0, 0, 0, 0, 0]);
    assert_eq!(levels.k, vec![0, 0, 0, 0, 0]);
}

#[tokio::test]
async fn test_process_from_file() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), png_bytes(&RasterImage::from_pixel(4, 2, RED))).unwrap();

    let levels = process(temp.path(), &options(3, 100.0, 100.0))
        .await
        .unwrap();
    assert_eq!(levels.m, vec![100, 100, 100]);
}

#[tokio::test]
async fn test_load_image() {
    use tempfile::NamedTempFile;

    let temp = NamedTempFile::new().unwrap();
    std::fs::write(temp.path(), png_bytes(&half_red(6, 3))).unwrap();

    let loaded = load_image(temp.path()).await.unwrap();
    assert_eq!(loaded.dimensions(), (6, 3));
    assert_eq!(loaded.get_pixel(0, 0), &RED);
    assert_eq!(loaded.get_pixel(5, 2), &WHITE);
}

#[tokio::test]
async fn test_repeated_runs_are_identical() {
    let image = RasterImage::from_fn(16, 8, |x, y| {
        Rgba([(x * 16) as u8, (y * 32) as u8, ((x + y) * 8) as u8, 255])
    });
    let bytes = png_bytes(&image);
    let opts = options(7, 900.0, 600.0);

    let first = process(bytes.clone(), &opts).await.unwrap();
    let second = process(bytes, &opts).await.unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_single_key_is_plate_average() {
    let image = RasterImage::from_fn(10, 4, |x, y| {
        Rgba([(x * 25) as u8, (y * 60) as u8, 128, 255])
    });
    let opts = ProcessingOptions {
        black_generation: 0.5,
        ..options(1, 800.0, 500.0)
    };

    let levels = analyze_raster(&image, &opts).unwrap();

    // Recompute the mean over every canvas pixel directly
    let prepared = prepare_raster(&image, Rotation::None, constants::PROCESS_WIDTH).unwrap();
    let plate = compose_plate(&prepared, 800.0, 500.0).unwrap();
    let mut sums = [0u64; 4];
    for pixel in plate.image().pixels() {
        let ink = rgb_to_cmyk(pixel[0], pixel[1], pixel[2], 0.5);
        sums[0] += u64::from(ink.c);
        sums[1] += u64::from(ink.m);
        sums[2] += u64::from(ink.y);
        sums[3] += u64::from(ink.k);
    }
    let count = plate.pixel_count() as f64;
    let mean = |sum: u64| (sum as f64 / count).round() as u8;

    assert_eq!(
        levels.zone(0),
        Some(Cmyk::new(mean(sums[0]), mean(sums[1]), mean(sums[2]), mean(sums[3])))
    );
}

#[test]
fn test_zone_counts_match_canvas() {
    let image = half_red(10, 6);
    let prepared = prepare_raster(&image, Rotation::Clockwise90, constants::PROCESS_WIDTH).unwrap();
    let plate = compose_plate(&prepared, 1029.0, 700.0).unwrap();

    for keys in [1, 3, 34, 5000] {
        let totals = aggregate_zones(&plate, keys, 0.7).unwrap();
        assert_eq!(totals.pixel_counts().len(), keys);
        assert_eq!(totals.total_pixels(), plate.pixel_count());
    }
}

#[test]
fn test_half_turn_mirrors_zones() {
    let image = half_red(8, 2);
    let straight = analyze_raster(&image, &options(4, 300.0, 300.0)).unwrap();
    let flipped = analyze_raster(
        &image,
        &ProcessingOptions {
            rotation: Rotation::Clockwise180,
            ..options(4, 300.0, 300.0)
        },
    )
    .unwrap();

    let mut mirrored = straight.m.clone();
    mirrored.reverse();
    assert_eq!(flipped.m, mirrored);
    assert_ne!(straight.m, flipped.m);
}

#[test]
fn test_quarter_turn_moves_split_across_zones() {
    // After a quarter turn the red half becomes a horizontal band, so both
    // zones see the same mix
    let image = half_red(8, 2);
    let turned = analyze_raster(
        &image,
        &ProcessingOptions {
            rotation: Rotation::Clockwise90,
            ..options(2, 300.0, 300.0)
        },
    )
    .unwrap();
    assert_eq!(turned.zone(0), turned.zone(1));

    let straight = analyze_raster(&image, &options(2, 300.0, 300.0)).unwrap();
    assert_ne!(straight.zone(0), straight.zone(1));
}

#[test]
fn test_single_key_ignores_rotation_when_image_fills_plate() {
    let image = RasterImage::from_fn(12, 4, |x, y| {
        Rgba([(x * 20) as u8, 90, (y * 50) as u8, 255])
    });
    let base = analyze_raster(&image, &options(1, 400.0, 400.0)).unwrap();

    for rotation in [
        Rotation::Clockwise90,
        Rotation::Clockwise180,
        Rotation::Clockwise270,
    ] {
        let rotated = analyze_raster(
            &image,
            &ProcessingOptions {
                rotation,
                ..options(1, 400.0, 400.0)
            },
        )
        .unwrap();
        assert_eq!(rotated, base, "rotation {}", rotation.degrees());
    }
}

#[test]
fn test_transparent_image_has_no_ink() {
    let image = RasterImage::from_pixel(6, 3, Rgba([0, 0, 0, 0]));
    let levels = analyze_raster(&image, &options(3, 100.0, 100.0)).unwrap();
    assert_eq!(levels.c, vec![0, 0, 0]);
    assert_eq!(levels.m, vec![0, 0, 0]);
    assert_eq!(levels.y, vec![0, 0, 0]);
    assert_eq!(levels.k, vec![0, 0, 0]);
}

#[test]
fn test_all_values_in_range() {
    let image = RasterImage::from_fn(20, 10, |x, y| {
        Rgba([(x * 13) as u8, (y * 25) as u8, ((x * y) % 256) as u8, (x * 12) as u8])
    });
    let levels = analyze_raster(&image, &options(34, 1029.0, 800.0)).unwrap();
    assert_eq!(levels.num_keys(), 34);
    for channel in Channel::ALL {
        assert!(levels.channel(channel).iter().all(|&v| v <= 100));
    }
}

#[tokio::test]
async fn test_invalid_options_fail_before_decode() {
    let decoder = FixedDecoder::new(RasterImage::from_pixel(2, 2, RED));
    let mut opts = options(0, 100.0, 100.0);

    let result = process_with(&decoder, Vec::<u8>::new(), &opts).await;
    assert!(matches!(result, Err(InkError::Config(_))));
    assert!(!decoder.called.load(Ordering::SeqCst));

    opts.num_keys = 2;
    opts.image_width_mm = -5.0;
    let result = process_with(&decoder, Vec::<u8>::new(), &opts).await;
    assert!(matches!(result, Err(InkError::Config(_))));
    assert!(!decoder.called.load(Ordering::SeqCst));
}

#[tokio::test]
async fn test_custom_decoder_is_used() {
    let decoder = FixedDecoder::new(RasterImage::from_pixel(4, 2, RED));
    let levels = process_with(&decoder, Vec::<u8>::new(), &options(2, 100.0, 100.0))
        .await
        .unwrap();
    assert!(decoder.called.load(Ordering::SeqCst));
    assert_eq!(levels.m, vec![100, 100]);
}

#[tokio::test]
async fn test_empty_raster_is_geometry_error() {
    let decoder = FixedDecoder::new(RasterImage::new(0, 0));
    let result = process_with(&decoder, Vec::<u8>::new(), &options(2, 100.0, 100.0)).await;
    assert!(matches!(result, Err(InkError::Geometry(_))));
}

#[tokio::test]
async fn test_undecodable_bytes_are_decode_error() {
    let result = process(b"not an image".to_vec(), &options(2, 100.0, 100.0)).await;
    assert!(matches!(result, Err(InkError::Decode(_))));
}

#[tokio::test]
async fn test_missing_file_is_io_error() {
    let result = process(
        std::path::Path::new("/nonexistent/inkkey/job.png"),
        &options(2, 100.0, 100.0),
    )
    .await;
    assert!(matches!(result, Err(InkError::Io(_))));
}

#[test]
fn test_extreme_aspect_ratio_is_geometry_error() {
    let sliver = RasterImage::from_pixel(1, 100_000, RED);
    let result = analyze_raster(&sliver, &options(34, 1029.0, 1016.0));
    assert!(matches!(result, Err(InkError::Geometry(_))));

    let turned = analyze_raster(
        &sliver,
        &ProcessingOptions {
            rotation: Rotation::Clockwise90,
            ..options(34, 1029.0, 1016.0)
        },
    );
    assert!(matches!(turned, Err(InkError::Geometry(_))));
}
