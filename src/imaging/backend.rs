//! Image processing backend trait and shared types.
//!
//! The [`ImageBackend`] trait is the codec seam of the crate: identify,
//! convert, resize and cover. Every operation takes the encoded source bytes
//! and returns encoded WebP bytes, so callers never see decoded pixels.
//!
//! The production implementation is
//! [`RustBackend`](super::rust_backend::RustBackend), built on the `image`
//! crate.

use super::params::{CoverParams, ResizeParams};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Processing failed: {0}")]
    ProcessingFailed(String),
}

/// Result of an identify operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

/// Trait for image processing backends.
///
/// Implementations must be deterministic: the same source bytes and
/// parameters always produce the same output bytes, because a produced
/// variant is cached and re-served without being derived again.
pub trait ImageBackend: Send + Sync {
    /// Read image dimensions without decoding pixel data.
    fn identify(&self, source: &[u8]) -> Result<Dimensions, BackendError>;

    /// Decode and re-encode without geometric change.
    fn convert(&self, source: &[u8]) -> Result<Vec<u8>, BackendError>;

    /// Scale to exactly the requested dimensions.
    fn resize(&self, source: &[u8], params: &ResizeParams) -> Result<Vec<u8>, BackendError>;

    /// Scale to cover the crop box, then center-crop to it.
    fn cover(&self, source: &[u8], params: &CoverParams) -> Result<Vec<u8>, BackendError>;
}
