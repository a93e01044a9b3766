pub use kurbo::{Point, Rect};

/// Stable identity of one scroll-bound section.
///
/// Hosts mint a fresh id for every mounted DOM node; a re-rendered block gets a new id.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct SectionId(pub u64);

impl std::fmt::Display for SectionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "section#{}", self.0)
    }
}

/// Opaque handle to a host element (DOM node, simulated block, ...).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct NodeRef(pub u64);

/// Vertical extent of a rect, never negative.
pub(crate) fn rect_height(r: Rect) -> f64 {
    (r.y1 - r.y0).max(0.0)
}

/// Pixels of `r` that overlap the vertical band `[0, viewport_h]`.
pub(crate) fn visible_height(r: Rect, viewport_h: f64) -> f64 {
    (r.y1.min(viewport_h) - r.y0.max(0.0)).max(0.0)
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/core.rs"]
mod tests;
