//! Ink key analysis pipeline
//!
//! This module sequences the analysis of one job:
//! 1. Validate the press configuration
//! 2. Decode the image
//! 3. Rescale and rotate it
//! 4. Mount it centered on the plate
//! 5. Average the ink coverage of every key zone

use crate::constants::PROCESS_WIDTH;
use crate::decode::{ImageDecoder, ImageSource, RasterDecoder};
use crate::options::ProcessingOptions;
use crate::plate::compose_plate;
use crate::transform::prepare_raster;
use crate::types::*;
use crate::zones::aggregate_zones;

/// Analyze an image file or buffer with the default decoder
pub async fn process(
    source: impl Into<ImageSource>,
    options: &ProcessingOptions,
) -> Result<InkLevels> {
    process_with(&ImageDecoder, source, options).await
}

/// Analyze an image using a caller-supplied decoder.
///
/// Options are validated before the image is decoded. The pixel work runs
/// on a blocking task.
pub async fn process_with<D: RasterDecoder>(
    decoder: &D,
    source: impl Into<ImageSource>,
    options: &ProcessingOptions,
) -> Result<InkLevels> {
    options.validate()?;

    let raster = decoder.decode(source.into()).await?;
    let options = options.clone();

    tokio::task::spawn_blocking(move || analyze_raster(&raster, &options)).await?
}

/// Run every pixel stage on an already decoded raster
pub fn analyze_raster(raster: &RasterImage, options: &ProcessingOptions) -> Result<InkLevels> {
    options.validate()?;

    let prepared = prepare_raster(raster, options.rotation, PROCESS_WIDTH)?;
    let plate = compose_plate(&prepared, options.plate_width_mm, options.image_width_mm)?;
    let levels = aggregate_zones(&plate, options.num_keys, options.black_generation)?.averages();

    log::info!(
        "Analyzed {}x{} plate canvas into {} ink keys",
        plate.width(),
        plate.height(),
        levels.num_keys()
    );

    Ok(levels)
}
