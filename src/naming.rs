//! Request path parsing for the `_w<N>` / `_h<N>` variant naming convention.
//!
//! Every request addresses an object as `/<container>/<variant>`, where the
//! variant name may embed target dimensions as infixes:
//!
//! - `photo_w300_h200.webp` → 300×200 cover crop of `photo.webp`
//! - `photo_h200_w300.webp` → same dimensions, other order
//! - `photo_w300.webp` → width 300, height follows the source aspect ratio
//! - `photo.webp` → no dimensions, served as-is or re-encoded
//!
//! The convention is part of the public URL contract: clients build these
//! names themselves to request a derived size.
//!
//! ## Dimension Extraction
//!
//! A single alternation is matched once against the name:
//!
//! 1. `w<N>_h<M>`
//! 2. `h<N>_w<M>`
//! 3. `w<N>`
//! 4. `h<N>`
//!
//! The leftmost match in the name wins. Where several alternatives match at
//! that position, the earlier one in the list is taken, so
//! `h2o_w100_h50.jpg` asks for height 2 only.
//!
//! Dimensions are recomputed from the name on every request, never stored.

use regex::Regex;
use std::sync::LazyLock;

/// Groups 1, 4 and 5 carry a width; 2, 3 and 6 carry a height.
static DIMENSION_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"w(\d+)_h(\d+)|h(\d+)_w(\d+)|w(\d+)|h(\d+)")
        .expect("dimension pattern must compile")
});

static DIMENSION_TOKEN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"_w\d+|_h\d+").expect("token pattern must compile"));

/// Target dimensions requested through the variant name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DimensionSpec {
    pub width: Option<u32>,
    pub height: Option<u32>,
}

impl DimensionSpec {
    pub fn new(width: Option<u32>, height: Option<u32>) -> Self {
        Self { width, height }
    }

    /// True when neither dimension asks for a geometric change.
    ///
    /// A zero dimension counts as absent.
    pub fn is_unconstrained(&self) -> bool {
        self.width.unwrap_or(0) == 0 && self.height.unwrap_or(0) == 0
    }
}

/// Result of parsing a request path like `/bucket/folder/photo_w300.webp`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestTarget {
    /// First path segment. Empty if the path had none.
    pub container: String,
    /// Remaining segments rejoined with `/`. This is the cache key.
    pub variant: String,
    pub dimensions: DimensionSpec,
}

impl RequestTarget {
    /// Both identifiers present, so resolution may touch storage.
    pub fn is_complete(&self) -> bool {
        !self.container.is_empty() && !self.variant.is_empty()
    }
}

/// Parse an inbound request path into container, variant and dimensions.
///
/// - `"/bucket/photo_w100_h200.webp"` → container `bucket`, variant
///   `photo_w100_h200.webp`, 100×200
/// - `"/bucket/a/b/photo.webp?x=1"` → container `bucket`, variant
///   `a/b/photo.webp`, no dimensions
/// - `"/bucket-only"` → container `bucket-only`, empty variant
///
/// Never fails. Callers reject incomplete targets with
/// [`RequestTarget::is_complete`].
pub fn parse_request_path(path: &str) -> RequestTarget {
    let path = path.split('?').next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    let container = segments.next().unwrap_or_default().to_string();
    let variant = segments.collect::<Vec<_>>().join("/");
    let dimensions = extract_dimensions(&variant);

    RequestTarget {
        container,
        variant,
        dimensions,
    }
}

/// Extract requested dimensions from a variant name.
pub fn extract_dimensions(name: &str) -> DimensionSpec {
    let Some(caps) = DIMENSION_PATTERN.captures(name) else {
        return DimensionSpec::default();
    };
    let first = |groups: [usize; 3]| {
        groups
            .into_iter()
            .find_map(|i| caps.get(i))
            .and_then(|m| m.as_str().parse::<u32>().ok())
    };
    DimensionSpec {
        width: first([1, 4, 5]),
        height: first([2, 3, 6]),
    }
}

/// Remove every `_w<N>` and `_h<N>` token, yielding the base image name.
///
/// `"name_w100_h200.ext"` → `"name.ext"`. Idempotent.
pub fn strip_dimension_tokens(name: &str) -> String {
    DIMENSION_TOKEN.replace_all(name, "").into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_container_and_variant() {
        let t = parse_request_path("/bucket/photo.webp");
        assert_eq!(t.container, "bucket");
        assert_eq!(t.variant, "photo.webp");
        assert!(t.is_complete());
    }

    #[test]
    fn nested_variant_keeps_folders() {
        let t = parse_request_path("/bucket/2024/trips/photo_w300.webp");
        assert_eq!(t.container, "bucket");
        assert_eq!(t.variant, "2024/trips/photo_w300.webp");
        assert_eq!(t.dimensions, DimensionSpec::new(Some(300), None));
    }

    #[test]
    fn query_string_is_discarded() {
        let t = parse_request_path("/bucket/photo_w10.webp?h=999&w=1");
        assert_eq!(t.variant, "photo_w10.webp");
        assert_eq!(t.dimensions, DimensionSpec::new(Some(10), None));
    }

    #[test]
    fn empty_segments_are_dropped() {
        let t = parse_request_path("//bucket///a//b.webp");
        assert_eq!(t.container, "bucket");
        assert_eq!(t.variant, "a/b.webp");
    }

    #[test]
    fn bucket_only_is_incomplete() {
        let t = parse_request_path("/bucket-only");
        assert_eq!(t.container, "bucket-only");
        assert_eq!(t.variant, "");
        assert!(!t.is_complete());
    }

    #[test]
    fn root_path_is_incomplete() {
        let t = parse_request_path("/");
        assert_eq!(t.container, "");
        assert!(!t.is_complete());
    }

    #[test]
    fn no_tokens_yields_no_dimensions() {
        for name in ["photo.webp", "folder/cat.png", "a_b_c.jpg", ""] {
            assert_eq!(extract_dimensions(name), DimensionSpec::default(), "{name}");
        }
    }

    #[test]
    fn width_then_height() {
        assert_eq!(
            extract_dimensions("photo_w100_h200.webp"),
            DimensionSpec::new(Some(100), Some(200))
        );
    }

    #[test]
    fn height_then_width() {
        assert_eq!(
            extract_dimensions("photo_h200_w100.webp"),
            DimensionSpec::new(Some(100), Some(200))
        );
    }

    #[test]
    fn width_only() {
        assert_eq!(
            extract_dimensions("photo_w150.webp"),
            DimensionSpec::new(Some(150), None)
        );
    }

    #[test]
    fn height_only() {
        assert_eq!(
            extract_dimensions("photo_h150.webp"),
            DimensionSpec::new(None, Some(150))
        );
    }

    #[test]
    fn leftmost_token_wins() {
        assert_eq!(
            extract_dimensions("x_w5_y_h3_w2.webp"),
            DimensionSpec::new(Some(5), None)
        );
    }

    #[test]
    fn letters_in_base_name_can_match_first() {
        // `h2` inside "h2o" is the leftmost match.
        assert_eq!(
            extract_dimensions("h2o_w100_h50.jpg"),
            DimensionSpec::new(None, Some(2))
        );
    }

    #[test]
    fn pair_beats_single_at_same_position() {
        assert_eq!(
            extract_dimensions("w10_h20.png"),
            DimensionSpec::new(Some(10), Some(20))
        );
    }

    #[test]
    fn oversized_digits_leave_dimension_empty() {
        assert_eq!(
            extract_dimensions("photo_w99999999999_h20.webp"),
            DimensionSpec::new(None, Some(20))
        );
    }

    #[test]
    fn zero_dimensions_are_unconstrained() {
        assert!(DimensionSpec::new(Some(0), None).is_unconstrained());
        assert!(DimensionSpec::default().is_unconstrained());
        assert!(!DimensionSpec::new(None, Some(1)).is_unconstrained());
    }

    #[test]
    fn strip_removes_all_tokens() {
        assert_eq!(strip_dimension_tokens("name_w100_h200.ext"), "name.ext");
        assert_eq!(strip_dimension_tokens("name_h200_w100.ext"), "name.ext");
        assert_eq!(strip_dimension_tokens("a_w1/b_h2_w3.png"), "a/b.png");
    }

    #[test]
    fn strip_is_idempotent() {
        let once = strip_dimension_tokens("name_w100_h200.ext");
        assert_eq!(strip_dimension_tokens(&once), once);
    }

    #[test]
    fn strip_leaves_plain_names_alone() {
        assert_eq!(strip_dimension_tokens("photo.webp"), "photo.webp");
        assert_eq!(strip_dimension_tokens("photo_wide.webp"), "photo_wide.webp");
    }
}
