use crate::effects::params::{WipeDir, WipeParams, WipeVariant};
use crate::effects::progress::wipe_progress;
use crate::effects::render::{ClipInset, WipePhase, WipeState};
use crate::foundation::core::Rect;
use crate::foundation::math::clamp01;

/// Clip for a given reveal progress: fully clipped at `0`, fully revealed at `1`.
pub fn clip_for_progress(progress: f64, dir: WipeDir) -> ClipInset {
    let hidden = (1.0 - clamp01(progress)) * 100.0;
    match dir {
        WipeDir::BottomToTop => ClipInset {
            top: hidden,
            ..ClipInset::NONE
        },
        WipeDir::TopToBottom => ClipInset {
            bottom: hidden,
            ..ClipInset::NONE
        },
    }
}

/// Phase of the stacked region.
pub fn wipe_phase(region: Rect, vh: f64) -> WipePhase {
    if region.y1 <= 0.0 {
        WipePhase::Past
    } else if region.y0 > 0.0 {
        WipePhase::Before
    } else if region.y1 <= vh {
        WipePhase::Released
    } else {
        WipePhase::Pinned
    }
}

/// Compose the covering block of a wipe/fade pair.
///
/// The covering block is invisible and inert before the region is reached and after it has
/// scrolled out; it becomes interactive only once fully revealed.
pub fn compose_wipe(region: Rect, vh: f64, params: &WipeParams) -> WipeState {
    let phase = wipe_phase(region, vh);
    let progress = match phase {
        WipePhase::Before => 0.0,
        WipePhase::Pinned => wipe_progress(region, vh),
        WipePhase::Released | WipePhase::Past => 1.0,
    };
    let shown = matches!(phase, WipePhase::Pinned | WipePhase::Released);

    let (opacity, clip) = match params.variant {
        WipeVariant::Fade => (
            if shown { progress } else { 0.0 },
            ClipInset::NONE,
        ),
        WipeVariant::Clip => (
            if shown { 1.0 } else { 0.0 },
            if shown {
                clip_for_progress(progress, params.dir)
            } else {
                clip_for_progress(0.0, params.dir)
            },
        ),
    };

    WipeState {
        phase,
        progress,
        opacity,
        clip,
        interactive: shown && progress >= 1.0,
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/wipe.rs"]
mod tests;
