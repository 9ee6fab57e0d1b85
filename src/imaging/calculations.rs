//! Pure calculation functions for variant dimensions.
//!
//! All functions here are pure and testable without any I/O or images.
//! Results are clamped to at least 1 px so degenerate sources never produce
//! an empty buffer.

/// Scale a source so its width matches `width`, preserving aspect ratio.
///
/// # Examples
/// ```
/// # use varicache::imaging::calculations::scale_to_width;
/// assert_eq!(scale_to_width((800, 600), 400), (400, 300));
/// ```
pub fn scale_to_width(source: (u32, u32), width: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let h = (src_h as f64 * width as f64 / src_w.max(1) as f64).round() as u32;
    (width, h.max(1))
}

/// Scale a source so its height matches `height`, preserving aspect ratio.
pub fn scale_to_height(source: (u32, u32), height: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    let w = (src_w as f64 * height as f64 / src_h.max(1) as f64).round() as u32;
    (w.max(1), height)
}

/// Largest region of `source` that has the aspect ratio of `target`.
///
/// Cropping this region out first and then resizing it to `target` gives a
/// cover fit without ever scaling the overflow. No buffer larger than the
/// source or the target is needed.
///
/// # Arguments
/// * `source` - Original image dimensions (width, height)
/// * `target` - Target area dimensions (width, height)
pub fn cover_source_region(source: (u32, u32), target: (u32, u32)) -> (u32, u32) {
    let (src_w, src_h) = (source.0.max(1), source.1.max(1));
    let (tgt_w, tgt_h) = (target.0.max(1), target.1.max(1));

    let src_aspect = src_w as f64 / src_h as f64;
    let tgt_aspect = tgt_w as f64 / tgt_h as f64;

    if src_aspect > tgt_aspect {
        // Source is wider: keep full height, trim the sides
        let w = (src_h as f64 * tgt_aspect).round() as u32;
        (w.clamp(1, src_w), src_h)
    } else {
        // Source is taller: keep full width, trim top and bottom
        let h = (src_w as f64 / tgt_aspect).round() as u32;
        (src_w, h.clamp(1, src_h))
    }
}

/// Top-left corner of a centered `crop` window inside `filled`.
pub fn center_crop_offset(filled: (u32, u32), crop: (u32, u32)) -> (u32, u32) {
    (
        filled.0.saturating_sub(crop.0) / 2,
        filled.1.saturating_sub(crop.1) / 2,
    )
}
