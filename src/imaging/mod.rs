//! Image processing — pure Rust, no system libraries.
//!
//! | Operation | Crate / function |
//! |---|---|
//! | **Identify** | `image::ImageReader::into_dimensions` |
//! | **Convert → WebP** | decode + lossless `WebPEncoder` |
//! | **Resize → WebP** | Lanczos3 + lossless `WebPEncoder` |
//! | **Cover → WebP** | center crop to target aspect + resize |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for dimension math (unit testable)
//! - **Parameters**: Data structures describing image operations
//! - **Backend**: [`ImageBackend`] trait + [`RustBackend`]
//! - **Operations**: [`materialize`], which picks the backend operation for a variant

pub mod backend;
pub mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Dimensions, ImageBackend};
pub use operations::{get_dimensions, materialize};
pub use params::{CoverParams, Limits, ResizeParams};
pub use rust_backend::RustBackend;

/// Content type of every variant this crate produces.
pub const OUTPUT_CONTENT_TYPE: &str = "image/webp";
