//! Mounting the prepared image on a virtual plate
//!
//! The plate canvas is as wide as the physical plate (at the image's pixel
//! density) and as tall as the image. The image is centered horizontally
//! on a white background. Zones are full-height strips, so vertical
//! placement has no effect on the result and is not modeled.

use crate::constants::MAX_PLATE_WIDTH_PX;
use crate::types::*;
use image::Rgba;

const WHITE: Rgba<u8> = Rgba([255, 255, 255, 255]);

/// The prepared image composited onto a white, plate-wide canvas.
///
/// Every pixel is opaque: transparency in the source has already been
/// resolved against the white background.
#[derive(Debug, Clone)]
pub struct PlateCanvas {
    image: RasterImage,
    x_offset: i64,
    image_width: u32,
}

impl PlateCanvas {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn pixel_count(&self) -> u64 {
        u64::from(self.width()) * u64::from(self.height())
    }

    /// The composited raster, read-only
    pub fn image(&self) -> &RasterImage {
        &self.image
    }

    /// Column where the image's left edge lands; negative when clipped
    pub fn x_offset(&self) -> i64 {
        self.x_offset
    }

    /// Width of the mounted image in pixels
    pub fn image_width(&self) -> u32 {
        self.image_width
    }

    /// Whether part of the image fell outside the plate and was dropped
    pub fn is_clipped(&self) -> bool {
        self.x_offset < 0
    }
}

/// Width of the plate in pixels at the density of the mounted image
pub fn plate_width_px(
    image_width_px: u32,
    plate_width_mm: f32,
    image_width_mm: f32,
) -> Result<u32> {
    if !(image_width_mm > 0.0) {
        return Err(InkError::Config(format!(
            "Image width must be a positive length, got {} mm",
            image_width_mm
        )));
    }

    let pixels_per_mm = f64::from(image_width_px) / f64::from(image_width_mm);
    let width = (f64::from(plate_width_mm) * pixels_per_mm).round();

    if !(width >= 1.0) {
        return Err(InkError::Config(format!(
            "Plate of {} mm is less than one pixel wide at {:.3} px/mm",
            plate_width_mm, pixels_per_mm
        )));
    }
    if width > f64::from(MAX_PLATE_WIDTH_PX) {
        return Err(InkError::Config(format!(
            "Plate would be {} px wide (limit {}); the image width of {} mm is too small for a {} mm plate",
            width, MAX_PLATE_WIDTH_PX, image_width_mm, plate_width_mm
        )));
    }

    Ok(width as u32)
}

/// Center `raster` horizontally on a white plate canvas.
///
/// If the image is wider than the plate, the columns that fall outside
/// the canvas are dropped.
pub fn compose_plate(
    raster: &RasterImage,
    plate_width_mm: f32,
    image_width_mm: f32,
) -> Result<PlateCanvas> {
    let (image_width, height) = raster.dimensions();
    if image_width == 0 || height == 0 {
        return Err(InkError::Geometry(format!(
            "Prepared image is {}x{} pixels",
            image_width, height
        )));
    }

    let plate_width = plate_width_px(image_width, plate_width_mm, image_width_mm)?;

    // Floor division so a negative offset still centers the clipped image
    let x_offset = (i64::from(plate_width) - i64::from(image_width)).div_euclid(2);

    log::debug!(
        "Plate canvas {}x{}, image {} px wide at x offset {}",
        plate_width,
        height,
        image_width,
        x_offset
    );
    if x_offset < 0 {
        log::warn!(
            "Image ({} mm) is wider than the plate ({} mm); {} columns are clipped",
            image_width_mm,
            plate_width_mm,
            image_width - plate_width
        );
    }

    let mut canvas = RasterImage::from_pixel(plate_width, height, WHITE);

    // Source columns that land inside the canvas
    let first = (-x_offset).max(0) as u32;
    let last = (i64::from(plate_width) - x_offset).min(i64::from(image_width)) as u32;
    for y in 0..height {
        for x in first..last {
            let dest_x = (i64::from(x) + x_offset) as u32;
            canvas.put_pixel(dest_x, y, over_white(*raster.get_pixel(x, y)));
        }
    }

    Ok(PlateCanvas {
        image: canvas,
        x_offset,
        image_width,
    })
}

/// Flatten a pixel onto the white plate background
#[inline]
fn over_white(pixel: Rgba<u8>) -> Rgba<u8> {
    let [r, g, b, a] = pixel.0;
    let alpha = u32::from(a);
    let mix = |channel: u8| -> u8 {
        ((u32::from(channel) * alpha + 255 * (255 - alpha) + 127) / 255) as u8
    };
    Rgba([mix(r), mix(g), mix(b), 255])
}
