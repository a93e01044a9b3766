//! Geometry to normalized progress, per effect kind.

use crate::foundation::core::{Rect, rect_height, visible_height};
use crate::foundation::math::{clamp01, safe_div};
use crate::scroll::geometry::PinGeometry;

/// Vertical anchor (fraction of the viewport) where a cinematic panel scores best.
pub const POSITION_ANCHOR: f64 = 0.6;
/// Fraction of the viewport height an element's top must cross to trigger a fade reveal.
pub const REVEAL_TRIGGER: f64 = 0.85;

/// Where a pinned zoom section is relative to its scroll range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PinPhase {
    /// Not engaged yet or already scrolled past; nothing is drawn.
    Hidden,
    /// Held fixed in the viewport (`is-fixed`).
    Pinned,
    /// Section bottom reached the viewport bottom; media scrolls away with it (`is-bottom`).
    Released,
}

/// Mapped pin-zoom progress.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PinProgress {
    /// Pin phase.
    pub phase: PinPhase,
    /// Progress through the zoom range, in `[0, 1]`.
    pub progress: f64,
}

impl PinProgress {
    /// Out-of-range state.
    pub const HIDDEN: Self = Self {
        phase: PinPhase::Hidden,
        progress: 0.0,
    };
}

/// Map pin-zoom geometry to progress.
///
/// With a spacer the pin stays hidden until `activate_at` of the spacer height has scrolled
/// past the viewport top, then advances over `0.5 * (spacer + section) + viewport` pixels.
/// Without one it falls back to single-phase section-only progress.
pub fn pin_zoom_progress(geo: &PinGeometry, activate_at: f64) -> PinProgress {
    let vh = geo.viewport_height;
    let section = geo.section;
    if section.y1 <= 0.0 {
        return PinProgress::HIDDEN;
    }

    let Some(spacer) = geo.spacer else {
        return legacy_progress(section, vh);
    };
    if spacer.y0 >= vh {
        return PinProgress::HIDDEN;
    }

    let spacer_h = rect_height(spacer);
    let scrolled = -spacer.y0;
    let delay = clamp01(activate_at) * spacer_h;
    if scrolled < delay {
        return PinProgress::HIDDEN;
    }

    let total = spacer_h + rect_height(section);
    let progress = clamp01(safe_div(scrolled - delay, 0.5 * total + vh));
    PinProgress {
        phase: pin_phase(section, vh),
        progress,
    }
}

fn legacy_progress(section: Rect, vh: f64) -> PinProgress {
    if section.y0 >= vh {
        return PinProgress::HIDDEN;
    }
    let progress = clamp01(safe_div(vh - section.y0, rect_height(section) + vh));
    PinProgress {
        phase: pin_phase(section, vh),
        progress,
    }
}

fn pin_phase(section: Rect, vh: f64) -> PinPhase {
    if section.y1 <= vh {
        PinPhase::Released
    } else {
        PinPhase::Pinned
    }
}

/// Visibility and position score of one cinematic text panel.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct PanelMetrics {
    /// Fraction of the panel inside the viewport, in `[0, 1]`.
    pub visibility: f64,
    /// Closeness of the panel center to [`POSITION_ANCHOR`]; `1` when centered on it.
    pub position_score: f64,
}

/// Score a panel rect against a viewport of height `vh`.
pub fn panel_metrics(panel: Rect, vh: f64) -> PanelMetrics {
    let h = rect_height(panel);
    let visibility = if h > 0.0 {
        clamp01(visible_height(panel, vh) / h)
    } else {
        0.0
    };
    let center = (panel.y0 + panel.y1) * 0.5;
    let position_score = 1.0 - safe_div((center - POSITION_ANCHOR * vh).abs(), vh);
    PanelMetrics {
        visibility,
        position_score,
    }
}

/// Progress through a stacked wipe region: `-top / (height - vh)`, clamped.
pub fn wipe_progress(region: Rect, vh: f64) -> f64 {
    clamp01(safe_div(-region.y0, rect_height(region) - vh))
}

/// Whether an element's top has crossed [`REVEAL_TRIGGER`] of the viewport while still on
/// screen.
pub fn reveal_intersects(element: Rect, vh: f64) -> bool {
    element.y0 < REVEAL_TRIGGER * vh && element.y1 > 0.0
}

/// Whether an element needs the deferred fade at mount (it starts below the fold).
pub fn reveal_needs_fade(element: Rect, vh: f64) -> bool {
    element.y0 > vh
}

#[cfg(test)]
#[path = "../../tests/unit/effects/progress.rs"]
mod tests;
