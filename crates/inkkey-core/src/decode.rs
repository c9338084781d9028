//! Raster decoding: turning an image file or buffer into RGBA pixels

use crate::types::*;
use std::future::Future;
use std::path::{Path, PathBuf};

/// Where the image to analyze comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    Path(PathBuf),
    Bytes(Vec<u8>),
}

impl From<PathBuf> for ImageSource {
    fn from(path: PathBuf) -> Self {
        ImageSource::Path(path)
    }
}

impl From<&Path> for ImageSource {
    fn from(path: &Path) -> Self {
        ImageSource::Path(path.to_owned())
    }
}

impl From<Vec<u8>> for ImageSource {
    fn from(bytes: Vec<u8>) -> Self {
        ImageSource::Bytes(bytes)
    }
}

/// Produces a decoded raster for the analysis pipeline
pub trait RasterDecoder {
    fn decode(&self, source: ImageSource) -> impl Future<Output = Result<RasterImage>> + Send;
}

/// Decoder backed by the `image` crate; handles every format it was built with
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageDecoder;

impl RasterDecoder for ImageDecoder {
    async fn decode(&self, source: ImageSource) -> Result<RasterImage> {
        let bytes = match source {
            ImageSource::Path(path) => tokio::fs::read(&path).await?,
            ImageSource::Bytes(bytes) => bytes,
        };
        decode_bytes(bytes).await
    }
}

/// Load and decode a single image file
pub async fn load_image(path: impl AsRef<Path>) -> Result<RasterImage> {
    ImageDecoder.decode(path.as_ref().into()).await
}

async fn decode_bytes(bytes: Vec<u8>) -> Result<RasterImage> {
    let image = tokio::task::spawn_blocking(move || image::load_from_memory(&bytes)).await??;
    log::debug!("Decoded {}x{} image", image.width(), image.height());
    Ok(image.to_rgba8())
}
