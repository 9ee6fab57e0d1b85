//! Parameter types for image operations.
//!
//! These structs describe *what* to do, not *how* to do it. They are the
//! interface between [`operations`](super::operations) (which decides what
//! variant to produce from the requested dimensions) and the
//! [`backend`](super::backend) (which does the pixel work). Source bytes are
//! passed alongside, never stored here.
//!
//! ## Types
//!
//! - [`ResizeParams`] — proportional scale to exact output dimensions.
//! - [`CoverParams`] — center-crop to the box aspect, then scale to the box.
//! - [`Limits`] — upper bound on what a request may ask the backend for.

/// Parameters for a proportional resize. Aspect ratio is the caller's job:
/// the backend scales to exactly `width × height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeParams {
    pub width: u32,
    pub height: u32,
}

/// Parameters for a cover-fit resize (center crop to aspect + scale).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoverParams {
    /// Final crop dimensions.
    pub crop_width: u32,
    pub crop_height: u32,
}

/// Bounds applied before any decoding happens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Largest width or height a variant may request.
    pub max_dimension: u32,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_dimension: 8192,
        }
    }
}
