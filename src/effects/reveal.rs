use crate::effects::progress::{reveal_intersects, reveal_needs_fade};
use crate::effects::render::{RevealPhase, RevealState};
use crate::foundation::core::Rect;

/// Downward offset (px) of a pending reveal element.
pub const REVEAL_OFFSET_PX: f64 = 24.0;
/// Intersection ratio at which the host observer fires.
pub const REVEAL_THRESHOLD: f64 = 0.1;

/// One-shot hidden-to-visible gate.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RevealGate {
    phase: RevealPhase,
}

impl RevealGate {
    /// Classify an element at mount. Elements already above the fold (or unmeasurable) are
    /// left untouched so nothing flickers on load.
    pub fn mount(element: Option<Rect>, vh: f64) -> Self {
        let phase = match element {
            Some(r) if reveal_needs_fade(r, vh) => RevealPhase::Pending,
            _ => RevealPhase::Untouched,
        };
        Self { phase }
    }

    /// Current phase.
    pub fn phase(&self) -> RevealPhase {
        self.phase
    }

    /// Whether an intersection observer is still needed.
    pub fn needs_observer(&self) -> bool {
        self.phase == RevealPhase::Pending
    }

    /// Feed an intersection callback. Returns `true` exactly once, on the reveal.
    pub fn on_intersection(&mut self, element: Option<Rect>, vh: f64) -> bool {
        if self.phase != RevealPhase::Pending {
            return false;
        }
        match element {
            Some(r) if reveal_intersects(r, vh) => {
                self.phase = RevealPhase::Revealed;
                true
            }
            _ => false,
        }
    }

    /// Render state for the current phase.
    pub fn state(&self) -> RevealState {
        match self.phase {
            RevealPhase::Pending => RevealState {
                phase: self.phase,
                visible: false,
                opacity: 0.0,
                offset_y: REVEAL_OFFSET_PX,
            },
            RevealPhase::Untouched | RevealPhase::Revealed => RevealState {
                phase: self.phase,
                visible: true,
                opacity: 1.0,
                offset_y: 0.0,
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/reveal.rs"]
mod tests;
