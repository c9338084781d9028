//! Shared constants for ink key analysis
//!
//! This module centralizes the press defaults and processing limits used
//! throughout the pipeline.

// =============================================================================
// Unit Conversion
// =============================================================================

/// Millimeters per inch
pub const MM_PER_INCH: f32 = 25.4;

/// Convert inches to millimeters
#[inline]
pub fn inch_to_mm(inches: f32) -> f32 {
    inches * MM_PER_INCH
}

// =============================================================================
// Press Defaults
// =============================================================================

/// Default number of ink keys across the plate
pub const DEFAULT_NUM_KEYS: usize = 34;

/// Default gray component replacement strength
pub const DEFAULT_BLACK_GENERATION: f32 = 0.7;

/// Plate width of a 40" sheetfed press (40.5" ≈ 1029 mm)
pub const DEFAULT_PLATE_WIDTH_MM: f32 = 1029.0;

/// Default printed width in inches (a full-width job)
pub const DEFAULT_PRINT_WIDTH_IN: f32 = 40.0;

// =============================================================================
// Processing Limits
// =============================================================================

/// Width in pixels every source image is rescaled to before rotation.
/// Keeps the cost of an analysis independent of the source resolution.
pub const PROCESS_WIDTH: u32 = 2000;

/// Largest plate canvas width in pixels we are willing to allocate
pub const MAX_PLATE_WIDTH_PX: u32 = 32_768;

/// Largest rescaled raster, in pixels, we are willing to allocate.
/// A full processing width by a maximum plate width.
pub const MAX_PROCESS_PIXELS: u64 = PROCESS_WIDTH as u64 * MAX_PLATE_WIDTH_PX as u64;

/// Pixel count above which the zone scan is split across threads
pub const PARALLEL_THRESHOLD: usize = 1 << 18;
