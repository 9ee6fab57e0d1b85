//! Pure Rust image processing backend.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Identify | `image::ImageReader::into_dimensions` (header only) |
//! | Decode (JPEG, PNG, TIFF, WebP, GIF) | `image::load_from_memory` |
//! | Resize | `image::imageops::resize` with `Lanczos3` filter |
//! | Cover crop | center `DynamicImage::crop_imm` to the target aspect, then resize |
//! | Encode → WebP | `image::codecs::webp::WebPEncoder::new_lossless` |
//!
//! Lossless WebP with a fixed filter keeps the output a pure function of the
//! input pixels and parameters.

use super::backend::{BackendError, Dimensions, ImageBackend};
use super::calculations::{center_crop_offset, cover_source_region};
use super::params::{CoverParams, ResizeParams};
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};
use std::io::Cursor;

/// Pure Rust backend using the `image` crate ecosystem.
///
/// See the [module docs](self) for the crate-to-operation mapping.
#[derive(Debug, Clone, Copy, Default)]
pub struct RustBackend;

impl RustBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Decode an image held in memory, guessing the format from its magic bytes.
fn load_image(source: &[u8]) -> Result<DynamicImage, BackendError> {
    image::load_from_memory(source)
        .map_err(|e| BackendError::ProcessingFailed(format!("Failed to decode image: {}", e)))
}

/// Encode as lossless WebP.
///
/// The encoder only accepts 8-bit RGB(A), so wider or grayscale buffers are
/// normalized first. Alpha is kept when the source has it.
fn encode_webp(img: &DynamicImage) -> Result<Vec<u8>, BackendError> {
    let normalized = if img.color().has_alpha() {
        DynamicImage::ImageRgba8(img.to_rgba8())
    } else {
        DynamicImage::ImageRgb8(img.to_rgb8())
    };

    let mut buffer = Vec::new();
    let encoder = WebPEncoder::new_lossless(Cursor::new(&mut buffer));
    normalized
        .write_with_encoder(encoder)
        .map_err(|e| BackendError::ProcessingFailed(format!("WebP encode failed: {}", e)))?;
    Ok(buffer)
}

impl ImageBackend for RustBackend {
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError> {
        let (width, height) = ImageReader::new(Cursor::new(source))
            .with_guessed_format()?
            .into_dimensions()
            .map_err(|e| {
                BackendError::ProcessingFailed(format!("Failed to read dimensions: {}", e))
            })?;
        Ok(Dimensions { width, height })
    }

    fn convert(&self, source: &[u8]) -> Result<Vec<u8>, BackendError> {
        let img = load_image(source)?;
        encode_webp(&img)
    }

    fn resize(&self, source: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(source)?;
        let resized = img.resize_exact(params.width, params.height, FilterType::Lanczos3);
        encode_webp(&resized)
    }

    fn cover(&self, source: &[u8], params: &CoverParams) -> Result<Vec<u8>, BackendError> {
        let img = load_image(source)?;
        let crop = (params.crop_width, params.crop_height);

        // Center-crop to the target aspect, then resize to exact dimensions
        let source = (img.width(), img.height());
        let region = cover_source_region(source, crop);
        let (x, y) = center_crop_offset(source, region);
        let cropped = img.crop_imm(x, y, region.0, region.1);
        let resized = cropped.resize_exact(crop.0, crop.1, FilterType::Lanczos3);

        encode_webp(&resized)
    }
}
