//! Rescaling and quarter-turn rotation of the decoded raster

use crate::constants::{MAX_PLATE_WIDTH_PX, MAX_PROCESS_PIXELS};
use crate::types::*;
use image::imageops::{self, FilterType};

/// Rescale `source` to `process_width` pixels wide (preserving aspect ratio)
/// and rotate it clockwise by `rotation`.
///
/// For 90° and 270° the output width and height are swapped.
pub fn prepare_raster(
    source: &RasterImage,
    rotation: Rotation,
    process_width: u32,
) -> Result<RasterImage> {
    let (width, height) = source.dimensions();
    if width == 0 || height == 0 {
        return Err(InkError::Geometry(format!(
            "Source image is {}x{} pixels",
            width, height
        )));
    }
    if process_width == 0 {
        return Err(InkError::Geometry(
            "Processing width must be at least one pixel".to_string(),
        ));
    }

    let (scaled_width, scaled_height) = scaled_dimensions(width, height, process_width);
    log::debug!(
        "Rescaling {}x{} source to {}x{}, rotating {}°",
        width,
        height,
        scaled_width,
        scaled_height,
        rotation.degrees()
    );
    check_scaled_size(scaled_width, scaled_height, rotation)?;

    let scaled = if (scaled_width, scaled_height) == (width, height) {
        source.clone()
    } else {
        imageops::resize(source, scaled_width, scaled_height, FilterType::Triangle)
    };

    Ok(rotate(scaled, rotation))
}

/// Target size for a `width`x`height` raster rescaled to `process_width`.
/// The height never collapses below one pixel.
pub fn scaled_dimensions(width: u32, height: u32, process_width: u32) -> (u32, u32) {
    let scale = f64::from(process_width) / f64::from(width);
    let scaled_height = (f64::from(height) * scale).round().max(1.0) as u32;
    (process_width, scaled_height)
}

/// Reject rescaled sizes too large to allocate, before any resampling.
/// After a quarter turn the scaled height becomes the mounted width, which
/// is also bounded by the plate width limit.
fn check_scaled_size(width: u32, height: u32, rotation: Rotation) -> Result<()> {
    let pixels = u64::from(width) * u64::from(height);
    if pixels > MAX_PROCESS_PIXELS {
        return Err(InkError::Geometry(format!(
            "Rescaled image would be {}x{} pixels (limit {} pixels); the source aspect ratio is too extreme",
            width, height, MAX_PROCESS_PIXELS
        )));
    }
    if rotation.is_quarter_turn() && height > MAX_PLATE_WIDTH_PX {
        return Err(InkError::Geometry(format!(
            "Rotated image would be {} px wide (limit {})",
            height, MAX_PLATE_WIDTH_PX
        )));
    }
    Ok(())
}

/// Rotate a raster clockwise by a quarter-turn multiple
pub fn rotate(image: RasterImage, rotation: Rotation) -> RasterImage {
    match rotation {
        Rotation::None => image,
        Rotation::Clockwise90 => imageops::rotate90(&image),
        Rotation::Clockwise180 => imageops::rotate180(&image),
        Rotation::Clockwise270 => imageops::rotate270(&image),
    }
}
