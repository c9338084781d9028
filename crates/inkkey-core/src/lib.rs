pub mod color;
pub mod constants;
mod decode;
mod options;
pub mod pipeline;
pub mod plate;
mod stats;
pub mod transform;
mod types;
pub mod zones;

pub use color::rgb_to_cmyk;
pub use decode::{ImageDecoder, ImageSource, RasterDecoder, load_image};
pub use options::*;
pub use pipeline::{analyze_raster, process, process_with};
pub use plate::{PlateCanvas, compose_plate};
pub use stats::calculate_summary;
pub use transform::prepare_raster;
pub use types::*;
pub use zones::{ZoneAccumulator, aggregate_zones};
