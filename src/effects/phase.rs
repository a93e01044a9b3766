//! Phase windows and easing: progress to concrete render values.

use crate::animation::ease::{ease_in_out, ease_out};
use crate::effects::params::PinZoomParams;
use crate::effects::progress::{PinPhase, PinProgress};
use crate::effects::render::PinZoomState;
use crate::foundation::math::{clamp01, lerp, window_t};

/// Vertical offset (px) of the context panel before it settles.
pub const PANEL_RISE_PX: f64 = 12.0;
/// Share of the panel window used to fade in.
const PANEL_IN_SPAN: f64 = 0.5;
/// Share of the panel window used to fade out.
const PANEL_OUT_SPAN: f64 = 0.3;

/// Three-phase opacity: ease in over `[0, fade_in]`, hold, ease out over `[1 - fade_out, 1]`.
pub fn fade_opacity(progress: f64, fade_in: f64, fade_out: f64) -> f64 {
    let p = clamp01(progress);
    let out_start = 1.0 - fade_out;
    let v = if p < fade_in {
        ease_out(window_t(p, 0.0, fade_in))
    } else if p > out_start {
        1.0 - ease_out(window_t(p, out_start, 1.0))
    } else {
        1.0
    };
    clamp01(v)
}

/// Zoom factor: eased from `1` to `scale_end` across the hold window only.
pub fn zoom_scale(progress: f64, fade_in: f64, fade_out: f64, scale_end: f64) -> f64 {
    let t = window_t(clamp01(progress), fade_in, 1.0 - fade_out);
    lerp(1.0, scale_end, ease_in_out(t))
}

/// Context panel opacity and vertical offset.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PanelFrame {
    /// Opacity in `[0, 1]`.
    pub opacity: f64,
    /// Translate-Y in pixels.
    pub offset_y: f64,
}

/// Panel timing over its own `[start, end]` window, independent of the photo fades.
pub fn panel_frame(progress: f64, start: f64, end: f64) -> PanelFrame {
    let p = clamp01(progress);
    if p < start || p > end {
        return PanelFrame {
            opacity: 0.0,
            offset_y: PANEL_RISE_PX,
        };
    }
    let local = window_t(p, start, end);
    let rise = ease_out(clamp01(local / PANEL_IN_SPAN));
    let fall = if local > 1.0 - PANEL_OUT_SPAN {
        1.0 - ease_out((local - (1.0 - PANEL_OUT_SPAN)) / PANEL_OUT_SPAN)
    } else {
        1.0
    };
    PanelFrame {
        opacity: clamp01(rise.min(fall)),
        offset_y: lerp(PANEL_RISE_PX, 0.0, rise),
    }
}

/// Full pin-zoom render state for mapped progress.
pub fn synthesize_pin(pin: PinProgress, params: &PinZoomParams) -> PinZoomState {
    if pin.phase == PinPhase::Hidden {
        return PinZoomState::hidden(params);
    }
    let p = pin.progress;
    let panel = panel_frame(p, params.panel_start, params.panel_end);
    PinZoomState {
        phase: pin.phase,
        progress: p,
        visible: true,
        opacity: fade_opacity(p, params.fade_in, params.fade_out),
        scale: zoom_scale(p, params.fade_in, params.fade_out, params.scale_end),
        origin_x: params.focus_x,
        origin_y: params.focus_y,
        panel_opacity: panel.opacity,
        panel_offset_y: panel.offset_y,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/phase.rs"]
mod tests;
