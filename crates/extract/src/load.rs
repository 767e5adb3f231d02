//! Image file input, downscaled before extraction.

use crate::error::WorkerError;
use huekit_core::{ColorError, ImageView};
use image::imageops::FilterType;
use image::DynamicImage;
use std::path::Path;

/// Linear scale applied to decoded images before sampling.
pub const DOWNSCALE: f64 = 0.4;

/// A decoded, downscaled RGBA8 image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedImage {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl LoadedImage {
    pub fn view(&self) -> Result<ImageView<'_>, ColorError> {
        ImageView::new(self.width, self.height, &self.data)
    }
}

/// Dimensions after [`DOWNSCALE`], truncated, never below 1×1.
pub fn scaled_dimensions(width: u32, height: u32) -> (u32, u32) {
    let scale = |n: u32| ((n as f64 * DOWNSCALE) as u32).max(1);
    (scale(width), scale(height))
}

fn downscale(img: DynamicImage) -> LoadedImage {
    let (width, height) = scaled_dimensions(img.width(), img.height());
    let data = img
        .resize_exact(width, height, FilterType::Triangle)
        .to_rgba8()
        .into_raw();
    LoadedImage {
        width,
        height,
        data,
    }
}

/// Opens and decodes a PNG or JPEG file, then downscales it.
pub fn load_image(path: &Path) -> Result<LoadedImage, WorkerError> {
    let img = image::open(path)
        .map_err(|e| WorkerError::Image(format!("{}: {e}", path.display())))?;
    tracing::debug!(
        path = %path.display(),
        width = img.width(),
        height = img.height(),
        "decoded image"
    );
    Ok(downscale(img))
}

/// Decodes an in-memory PNG or JPEG, then downscales it.
pub fn decode_image(bytes: &[u8]) -> Result<LoadedImage, WorkerError> {
    let img = image::load_from_memory(bytes).map_err(|e| WorkerError::Image(e.to_string()))?;
    Ok(downscale(img))
}
