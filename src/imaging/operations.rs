//! High-level image operations.
//!
//! [`materialize`] turns base image bytes plus the dimensions parsed from a
//! variant name into the bytes of that variant. It decides which backend
//! operation applies and computes its parameters; the backend does the
//! pixel work.
//!
//! | Requested | Operation |
//! |---|---|
//! | neither dimension | [`convert`](super::ImageBackend::convert) |
//! | width and height | [`cover`](super::ImageBackend::cover) to exactly `w × h` |
//! | width only | [`resize`](super::ImageBackend::resize), height from aspect ratio |
//! | height only | [`resize`](super::ImageBackend::resize), width from aspect ratio |

use super::backend::{BackendError, ImageBackend};
use super::calculations::{scale_to_height, scale_to_width};
use super::params::{CoverParams, Limits, ResizeParams};
use crate::naming::DimensionSpec;

/// Result type for image operations.
pub type Result<T> = std::result::Result<T, BackendError>;

/// Get image dimensions using the backend.
pub fn get_dimensions<B: ImageBackend + ?Sized>(backend: &B, source: &[u8]) -> Result<(u32, u32)> {
    let dims = backend.identify(source)?;
    Ok((dims.width, dims.height))
}

/// Produce the variant bytes for `dimensions` from `source`.
///
/// Zero dimensions are treated as absent. Requests above
/// `limits.max_dimension` fail before anything is decoded, and so does a
/// single-dimension request whose derived side would exceed it.
pub fn materialize<B: ImageBackend + ?Sized>(
    backend: &B,
    source: &[u8],
    dimensions: DimensionSpec,
    limits: &Limits,
) -> Result<Vec<u8>> {
    let width = dimensions.width.filter(|&w| w > 0);
    let height = dimensions.height.filter(|&h| h > 0);

    check_limit([width, height].into_iter().flatten(), limits, "Requested")?;

    match (width, height) {
        (None, None) => backend.convert(source),
        (Some(crop_width), Some(crop_height)) => backend.cover(
            source,
            &CoverParams {
                crop_width,
                crop_height,
            },
        ),
        (Some(w), None) => {
            let (width, height) = scale_to_width(get_dimensions(backend, source)?, w);
            check_limit([height], limits, "Derived")?;
            backend.resize(source, &ResizeParams { width, height })
        }
        (None, Some(h)) => {
            let (width, height) = scale_to_height(get_dimensions(backend, source)?, h);
            check_limit([width], limits, "Derived")?;
            backend.resize(source, &ResizeParams { width, height })
        }
    }
}

fn check_limit(
    dims: impl IntoIterator<Item = u32>,
    limits: &Limits,
    kind: &str,
) -> Result<()> {
    match dims.into_iter().find(|&d| d > limits.max_dimension) {
        Some(over) => Err(BackendError::ProcessingFailed(format!(
            "{} dimension {} exceeds limit {}",
            kind, over, limits.max_dimension
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imaging::backend::tests::{MockBackend, RecordedOp};
    use crate::imaging::{Dimensions, RustBackend};
    use crate::test_helpers::jpeg_bytes;

    fn dims(width: Option<u32>, height: Option<u32>) -> DimensionSpec {
        DimensionSpec::new(width, height)
    }

    #[test]
    fn get_dimensions_calls_backend() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1920,
            height: 1080,
        }]);

        let d = get_dimensions(&backend, b"img").unwrap();
        assert_eq!(d, (1920, 1080));
    }

    #[test]
    fn no_dimensions_only_converts() {
        let backend = MockBackend::new();
        let out = materialize(&backend, b"img", dims(None, None), &Limits::default()).unwrap();

        assert_eq!(out, MockBackend::OUTPUT);
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Convert { source_len: 3 }]
        );
    }

    #[test]
    fn zero_dimensions_only_convert() {
        let backend = MockBackend::new();
        materialize(&backend, b"img", dims(Some(0), Some(0)), &Limits::default()).unwrap();
        assert!(matches!(
            backend.get_operations().as_slice(),
            [RecordedOp::Convert { .. }]
        ));
    }

    #[test]
    fn both_dimensions_cover_without_identify() {
        let backend = MockBackend::new();
        materialize(&backend, b"img", dims(Some(100), Some(200)), &Limits::default()).unwrap();

        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Cover {
                crop_width: 100,
                crop_height: 200,
            }]
        );
    }

    #[test]
    fn width_only_scales_height_from_source() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 2000,
            height: 1500,
        }]);
        materialize(&backend, b"img", dims(Some(1000), None), &Limits::default()).unwrap();

        let ops = backend.get_operations();
        assert_eq!(ops.len(), 2);
        assert_eq!(
            ops[1],
            RecordedOp::Resize {
                width: 1000,
                height: 750,
            }
        );
    }

    #[test]
    fn height_only_scales_width_from_source() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1500,
            height: 2000,
        }]);
        materialize(&backend, b"img", dims(None, Some(1000)), &Limits::default()).unwrap();

        assert_eq!(
            backend.get_operations()[1],
            RecordedOp::Resize {
                width: 750,
                height: 1000,
            }
        );
    }

    #[test]
    fn zero_width_with_height_behaves_as_height_only() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 200,
            height: 100,
        }]);
        materialize(&backend, b"img", dims(Some(0), Some(50)), &Limits::default()).unwrap();

        assert_eq!(
            backend.get_operations()[1],
            RecordedOp::Resize {
                width: 100,
                height: 50,
            }
        );
    }

    #[test]
    fn oversized_request_fails_before_backend() {
        let backend = MockBackend::new();
        let limits = Limits { max_dimension: 500 };
        let err = materialize(&backend, b"img", dims(Some(501), Some(10)), &limits).unwrap_err();

        assert!(err.to_string().contains("exceeds limit 500"));
        assert!(backend.get_operations().is_empty());
    }

    #[test]
    fn derived_width_over_limit_fails_before_resize() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 2000,
            height: 1,
        }]);
        let err = materialize(&backend, b"img", dims(None, Some(4000)), &Limits::default())
            .unwrap_err();

        assert!(err.to_string().contains("Derived dimension 8000000 exceeds limit 8192"));
        assert_eq!(
            backend.get_operations(),
            vec![RecordedOp::Identify { source_len: 3 }]
        );
    }

    #[test]
    fn derived_height_over_limit_fails_before_resize() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 1,
            height: 1000,
        }]);
        let limits = Limits { max_dimension: 500 };
        let result = materialize(&backend, b"img", dims(Some(10), None), &limits);

        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
        assert!(
            !backend
                .get_operations()
                .iter()
                .any(|op| matches!(op, RecordedOp::Resize { .. }))
        );
    }

    #[test]
    fn derived_side_at_limit_is_allowed() {
        let backend = MockBackend::with_dimensions(vec![Dimensions {
            width: 100,
            height: 50,
        }]);
        let limits = Limits { max_dimension: 500 };
        materialize(&backend, b"img", dims(None, Some(250)), &limits).unwrap();

        assert_eq!(
            backend.get_operations()[1],
            RecordedOp::Resize {
                width: 500,
                height: 250,
            }
        );
    }

    #[test]
    fn backend_failure_propagates() {
        let backend = MockBackend::failing("corrupt");
        let result = materialize(&backend, b"img", dims(None, None), &Limits::default());
        assert!(matches!(result, Err(BackendError::ProcessingFailed(_))));
    }

    #[test]
    fn unconstrained_keeps_pixel_dimensions() {
        let out = materialize(
            &RustBackend::new(),
            &jpeg_bytes(90, 60),
            dims(None, None),
            &Limits::default(),
        )
        .unwrap();

        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (90, 60));
    }

    #[test]
    fn same_inputs_give_identical_bytes() {
        let backend = RustBackend::new();
        let source = jpeg_bytes(80, 120);
        for spec in [dims(None, None), dims(Some(40), None), dims(Some(30), Some(30))] {
            let first = materialize(&backend, &source, spec, &Limits::default()).unwrap();
            let second = materialize(&backend, &source, spec, &Limits::default()).unwrap();
            assert_eq!(first, second, "{spec:?}");
        }
    }

    #[test]
    fn width_only_real_output_follows_aspect() {
        let out = materialize(
            &RustBackend::new(),
            &jpeg_bytes(200, 100),
            dims(Some(50), None),
            &Limits::default(),
        )
        .unwrap();

        let img = image::load_from_memory(&out).unwrap();
        assert_eq!((img.width(), img.height()), (50, 25));
    }
}
