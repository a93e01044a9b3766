//! Author-configured effect parameters.
//!
//! Parameters arrive either as DOM data attributes (string values) or as JSON. Malformed or
//! out-of-range values never fail: they are clamped or replaced with defaults, since a panic in
//! a scroll handler would stall every later update on the page.

use std::collections::BTreeMap;

use crate::foundation::error::{ScrollyError, ScrollyResult};
use crate::foundation::math::sanitize;

/// Pin-zoom phase thresholds, all in progress units unless noted.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct PinZoomParams {
    /// Final zoom factor reached at the end of the hold window.
    pub scale_end: f64,
    /// Length of the fade-in window `[0, fade_in]`.
    pub fade_in: f64,
    /// Length of the fade-out window `[1 - fade_out, 1]`.
    pub fade_out: f64,
    /// Start of the context panel window.
    pub panel_start: f64,
    /// End of the context panel window.
    pub panel_end: f64,
    /// Horizontal zoom focus, percent of the image width.
    pub focus_x: f64,
    /// Vertical zoom focus, percent of the image height.
    pub focus_y: f64,
    /// Fraction of the spacer height scrolled before the pin engages.
    pub activate_at: f64,
}

impl Default for PinZoomParams {
    fn default() -> Self {
        Self {
            scale_end: 2.6,
            fade_in: 0.18,
            fade_out: 0.18,
            panel_start: 0.35,
            panel_end: 0.8,
            focus_x: 50.0,
            focus_y: 50.0,
            activate_at: 0.8,
        }
    }
}

impl PinZoomParams {
    /// Parse from data attributes (`scale-end`, `fade-in`, ...). Missing keys use defaults.
    pub fn from_attrs(attrs: &BTreeMap<String, String>) -> Self {
        let d = Self::default();
        Self {
            scale_end: attr_f64(attrs, "scale-end", d.scale_end),
            fade_in: attr_f64(attrs, "fade-in", d.fade_in),
            fade_out: attr_f64(attrs, "fade-out", d.fade_out),
            panel_start: attr_f64(attrs, "panel-start", d.panel_start),
            panel_end: attr_f64(attrs, "panel-end", d.panel_end),
            focus_x: attr_f64(attrs, "focus-x", d.focus_x),
            focus_y: attr_f64(attrs, "focus-y", d.focus_y),
            activate_at: attr_f64(attrs, "activate-at", d.activate_at),
        }
        .sanitized()
    }

    /// Clamp every field into its safe range.
    ///
    /// Fade windows that overlap are scaled down to share the unit range; an inverted panel
    /// window is reordered.
    pub fn sanitized(self) -> Self {
        let d = Self::default();
        let mut fade_in = sanitize(self.fade_in, d.fade_in, 0.0, 1.0);
        let mut fade_out = sanitize(self.fade_out, d.fade_out, 0.0, 1.0);
        let total = fade_in + fade_out;
        if total > 1.0 {
            fade_in /= total;
            fade_out /= total;
        }
        let a = sanitize(self.panel_start, d.panel_start, 0.0, 1.0);
        let b = sanitize(self.panel_end, d.panel_end, 0.0, 1.0);
        Self {
            scale_end: sanitize(self.scale_end, d.scale_end, 0.1, 10.0),
            fade_in,
            fade_out,
            panel_start: a.min(b),
            panel_end: a.max(b),
            focus_x: sanitize(self.focus_x, d.focus_x, 0.0, 100.0),
            focus_y: sanitize(self.focus_y, d.focus_y, 0.0, 100.0),
            activate_at: sanitize(self.activate_at, d.activate_at, 0.0, 1.0),
        }
    }
}

/// Cinematic crossfade parameters.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct CinematicParams {
    /// Declared slide count; `0` means "use every panel present".
    pub slide_count: usize,
    /// Whether the scoring pass may move back to earlier slides.
    pub scrub: ScrubPolicy,
}

impl CinematicParams {
    /// Parse from data attributes (`slide-count`, `scrub`).
    pub fn from_attrs(attrs: &BTreeMap<String, String>) -> Self {
        let slide_count = attr_f64(attrs, "slide-count", 0.0);
        let scrub = match attr_str(attrs, "scrub") {
            None => ScrubPolicy::default(),
            Some(s) => ScrubPolicy::parse(s).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "ignoring cinematic scrub attribute");
                ScrubPolicy::default()
            }),
        };
        Self {
            slide_count: sanitize(slide_count, 0.0, 0.0, 1024.0) as usize,
            scrub,
        }
    }
}

/// How the multi-slide selector treats scrolling back up.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScrubPolicy {
    /// The scoring pass may select an earlier slide again (scrub back on scroll-up).
    #[default]
    Free,
    /// The active slide never moves backwards.
    ForwardOnly,
}

impl ScrubPolicy {
    /// Parse a policy name.
    pub fn parse(s: &str) -> ScrollyResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "free" | "scrub" => Ok(Self::Free),
            "forward_only" | "forward-only" | "forward" => Ok(Self::ForwardOnly),
            other => Err(ScrollyError::validation(format!(
                "unknown scrub policy '{other}'"
            ))),
        }
    }
}

/// How the covering block of a wipe pair is revealed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeVariant {
    /// Opacity-only cross-dissolve.
    Fade,
    /// `clip-path: inset(...)` wipe.
    #[default]
    Clip,
}

/// Edge the clip wipe grows from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WipeDir {
    /// Revealed from the bottom edge upwards.
    #[default]
    BottomToTop,
    /// Revealed from the top edge downwards.
    TopToBottom,
}

/// Wipe/fade pair parameters.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct WipeParams {
    /// Height of the stacked region in `vh`; never below `100`.
    pub wipe_height_vh: f64,
    /// Reveal variant.
    pub variant: WipeVariant,
    /// Clip direction (clip variant only).
    pub dir: WipeDir,
}

impl Default for WipeParams {
    fn default() -> Self {
        Self {
            wipe_height_vh: 200.0,
            variant: WipeVariant::Clip,
            dir: WipeDir::BottomToTop,
        }
    }
}

impl WipeParams {
    /// Parse from data attributes (`wipe-height`, `wipe-variant`, `wipe-dir`).
    pub fn from_attrs(attrs: &BTreeMap<String, String>) -> Self {
        let d = Self::default();
        let kind = attr_str(attrs, "wipe-variant").unwrap_or("clip");
        let params = serde_json::json!({ "dir": attr_str(attrs, "wipe-dir") });
        let (variant, dir) = parse_wipe_kind_params(kind, &params).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring wipe attributes");
            (d.variant, d.dir)
        });
        Self {
            wipe_height_vh: attr_f64(attrs, "wipe-height", d.wipe_height_vh),
            variant,
            dir,
        }
        .sanitized()
    }

    /// Clamp the region height into `[100, 2000]` vh.
    pub fn sanitized(self) -> Self {
        Self {
            wipe_height_vh: sanitize(self.wipe_height_vh, 200.0, 100.0, 2000.0),
            ..self
        }
    }

    /// Region height in pixels: `max(100vh, wipe_height_vh)`.
    pub fn region_height_px(&self, viewport_height: f64) -> f64 {
        viewport_height * (self.wipe_height_vh / 100.0).max(1.0)
    }
}

/// Parse a wipe variant name plus optional `{ "dir": ... }` params.
pub fn parse_wipe_kind_params(
    kind: &str,
    params: &serde_json::Value,
) -> ScrollyResult<(WipeVariant, WipeDir)> {
    let kind = kind.trim().to_ascii_lowercase();
    if kind.is_empty() {
        return Err(ScrollyError::validation("wipe variant must be non-empty"));
    }

    let variant = match kind.as_str() {
        "fade" | "dissolve" | "crossfade" => WipeVariant::Fade,
        "clip" | "wipe" | "inset" => WipeVariant::Clip,
        _ => {
            return Err(ScrollyError::validation(format!(
                "unknown wipe variant '{kind}'"
            )));
        }
    };

    let dir = match params.get("dir").and_then(|v| v.as_str()) {
        None => WipeDir::BottomToTop,
        Some(s) => match s.trim().to_ascii_lowercase().as_str() {
            "bottom_to_top" | "bottomtotop" | "btt" | "up" => WipeDir::BottomToTop,
            "top_to_bottom" | "toptobottom" | "ttb" | "down" => WipeDir::TopToBottom,
            other => {
                return Err(ScrollyError::validation(format!(
                    "unknown wipe dir '{other}'"
                )));
            }
        },
    };

    Ok((variant, dir))
}

fn attr_str<'a>(attrs: &'a BTreeMap<String, String>, key: &str) -> Option<&'a str> {
    attrs
        .get(key)
        .or_else(|| attrs.get(&format!("data-{key}")))
        .map(String::as_str)
}

fn attr_f64(attrs: &BTreeMap<String, String>, key: &str, default: f64) -> f64 {
    let Some(raw) = attr_str(attrs, key) else {
        return default;
    };
    let trimmed = raw.trim().trim_end_matches('%').trim();
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => v,
        _ => {
            tracing::warn!(key, value = raw, default, "malformed numeric attribute");
            default
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/params.rs"]
mod tests;
