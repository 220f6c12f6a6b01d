//! Clamping and bounds helpers shared across the engine.

use crate::element::Element;
use kurbo::Rect;

/// Clamp `v` into `[lo, hi]`.
///
/// Total for any input: when `lo > hi` the result is `lo`, and a NaN `v`
/// resolves to `hi`. Unlike `f64::clamp` this never panics.
pub fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    lo.max(hi.min(v))
}

/// Return `v` if it is finite, otherwise `fallback`.
pub fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() { v } else { fallback }
}

/// The minimal axis-aligned box covering all given elements.
///
/// Returns `None` for an empty set; callers must check.
pub fn union_bounds<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Option<Rect> {
    elements
        .into_iter()
        .map(Element::rect)
        .reduce(|acc, rect| acc.union(rect))
}
