//! Render state records and the style patch an adapter applies to the DOM.

use crate::effects::params::PinZoomParams;
use crate::effects::progress::PinPhase;
use crate::effects::phase::PANEL_RISE_PX;
use crate::foundation::core::NodeRef;

/// Class toggled on a pinned element while it is held in the viewport.
pub const CLASS_FIXED: &str = "is-fixed";
/// Class toggled once a pinned element is released at its container's bottom.
pub const CLASS_BOTTOM: &str = "is-bottom";
/// Class marking the active cinematic media layer.
pub const CLASS_ACTIVE: &str = "active";
/// Class marking a revealed fade-in block.
pub const CLASS_VISIBLE: &str = "visible";

/// Derived visual state of one section.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RenderState {
    /// Pinned photo zoom.
    PinZoom(PinZoomState),
    /// Cinematic media crossfade.
    Cinematic(CinematicState),
    /// Wipe/fade pair.
    WipePair(WipeState),
    /// Deferred fade reveal.
    FadeReveal(RevealState),
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Pin-zoom output.
pub struct PinZoomState {
    /// Pin phase.
    pub phase: PinPhase,
    /// Zoom progress in `[0, 1]`.
    pub progress: f64,
    /// Whether anything is drawn.
    pub visible: bool,
    /// Photo opacity in `[0, 1]`.
    pub opacity: f64,
    /// Photo zoom factor.
    pub scale: f64,
    /// `transform-origin` x, percent.
    pub origin_x: f64,
    /// `transform-origin` y, percent.
    pub origin_y: f64,
    /// Context panel opacity in `[0, 1]`.
    pub panel_opacity: f64,
    /// Context panel translate-Y, pixels.
    pub panel_offset_y: f64,
}

impl PinZoomState {
    /// State used while the pin is out of range.
    pub fn hidden(params: &PinZoomParams) -> Self {
        Self {
            phase: PinPhase::Hidden,
            progress: 0.0,
            visible: false,
            opacity: 0.0,
            scale: 1.0,
            origin_x: params.focus_x,
            origin_y: params.focus_y,
            panel_opacity: 0.0,
            panel_offset_y: PANEL_RISE_PX,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
/// Cinematic crossfade output.
pub struct CinematicState {
    /// Index of the active media slide.
    pub active_slide: usize,
    /// Number of slides taking part in selection.
    pub slide_count: usize,
}

/// Where a wipe pair's scroll region is relative to the viewport.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WipePhase {
    /// Region top still below the viewport top.
    Before,
    /// Covering block held fixed while the reveal runs.
    Pinned,
    /// Region bottom inside the viewport; the sticky block unpins.
    Released,
    /// Region scrolled out above the viewport.
    Past,
}

/// `clip-path: inset(top right bottom left)` in percent.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ClipInset {
    /// Top inset, percent.
    pub top: f64,
    /// Right inset, percent.
    pub right: f64,
    /// Bottom inset, percent.
    pub bottom: f64,
    /// Left inset, percent.
    pub left: f64,
}

impl ClipInset {
    /// Nothing clipped.
    pub const NONE: Self = Self {
        top: 0.0,
        right: 0.0,
        bottom: 0.0,
        left: 0.0,
    };

    /// Percent of the element height left visible.
    pub fn revealed_pct(&self) -> f64 {
        (100.0 - self.top - self.bottom).clamp(0.0, 100.0)
    }

    /// CSS value.
    pub fn to_css(&self) -> String {
        format!(
            "inset({}% {}% {}% {}%)",
            fmt_num(self.top),
            fmt_num(self.right),
            fmt_num(self.bottom),
            fmt_num(self.left)
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Wipe/fade pair output, applied to the covering ("next") block.
pub struct WipeState {
    /// Region phase.
    pub phase: WipePhase,
    /// Progress through the region in `[0, 1]`.
    pub progress: f64,
    /// Covering block opacity in `[0, 1]`.
    pub opacity: f64,
    /// Covering block clip.
    pub clip: ClipInset,
    /// Whether the covering block receives pointer events.
    pub interactive: bool,
}

/// Lifecycle of a fade-reveal element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RevealPhase {
    /// Already on screen at mount; never faded.
    Untouched,
    /// Hidden, waiting for its first intersection.
    Pending,
    /// Revealed; terminal.
    Revealed,
}

#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
/// Fade-reveal output.
pub struct RevealState {
    /// Gate phase.
    pub phase: RevealPhase,
    /// Whether the element is shown.
    pub visible: bool,
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Translate-Y in pixels.
    pub offset_y: f64,
}

/// One DOM mutation.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum StyleOp {
    /// Set an inline style property.
    Set {
        /// Target element.
        node: NodeRef,
        /// CSS property name.
        property: &'static str,
        /// CSS value.
        value: String,
    },
    /// Add a class.
    AddClass {
        /// Target element.
        node: NodeRef,
        /// Class name.
        class: &'static str,
    },
    /// Remove a class.
    RemoveClass {
        /// Target element.
        node: NodeRef,
        /// Class name.
        class: &'static str,
    },
}

/// Ordered DOM mutations for one update.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct StylePatch {
    /// Mutations, applied in order.
    pub ops: Vec<StyleOp>,
}

impl StylePatch {
    pub(crate) fn set(&mut self, node: NodeRef, property: &'static str, value: String) {
        self.ops.push(StyleOp::Set {
            node,
            property,
            value,
        });
    }

    pub(crate) fn toggle(&mut self, node: NodeRef, class: &'static str, on: bool) {
        self.ops.push(if on {
            StyleOp::AddClass { node, class }
        } else {
            StyleOp::RemoveClass { node, class }
        });
    }

    /// Whether there is nothing to apply.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Value last set for `property` on `node`, if any.
    pub fn value_of(&self, node: NodeRef, property: &str) -> Option<&str> {
        self.ops.iter().rev().find_map(|op| match op {
            StyleOp::Set {
                node: n,
                property: p,
                value,
            } if *n == node && *p == property => Some(value.as_str()),
            _ => None,
        })
    }
}

/// Compact decimal rendering for CSS values (at most 4 fractional digits, no trailing zeros).
pub(crate) fn fmt_num(v: f64) -> String {
    let s = format!("{:.4}", if v.abs() < 5e-5 { 0.0 } else { v });
    let s = s.trim_end_matches('0').trim_end_matches('.');
    s.to_string()
}

#[cfg(test)]
#[path = "../../tests/unit/effects/render.rs"]
mod tests;
