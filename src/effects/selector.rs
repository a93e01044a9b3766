use crate::effects::params::ScrubPolicy;
use crate::effects::progress::{PanelMetrics, panel_metrics};
use crate::foundation::core::Rect;

/// Weight of panel visibility in a slide score.
pub const VISIBILITY_WEIGHT: f64 = 0.7;
/// Weight of panel position in a slide score.
pub const POSITION_WEIGHT: f64 = 0.3;
/// Minimum visibility for a slide to compete.
pub const VISIBILITY_FLOOR: f64 = 0.1;
/// A panel whose bottom is above this fraction of the viewport counts as scrolled away.
pub const SCROLLED_AWAY: f64 = 0.3;

/// Active-slide transition reported by [`SlideSelector::update`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub struct SlideChange {
    /// Previously active slide.
    pub from: usize,
    /// Newly active slide.
    pub to: usize,
}

/// Combined score of one slide.
pub fn slide_score(m: PanelMetrics) -> f64 {
    VISIBILITY_WEIGHT * m.visibility + POSITION_WEIGHT * m.position_score
}

/// Highest-scoring slide above the visibility floor. Ties keep the earlier slide.
pub fn best_slide(metrics: &[Option<PanelMetrics>]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, m) in metrics.iter().enumerate() {
        let Some(m) = m else {
            continue;
        };
        if m.visibility <= VISIBILITY_FLOOR {
            continue;
        }
        let score = slide_score(*m);
        if best.is_none_or(|(_, s)| score > s) {
            best = Some((i, score));
        }
    }
    best.map(|(i, _)| i)
}

/// Forward-bias floor: the latest slide whose predecessor panel has mostly scrolled away while
/// its own panel has entered the viewport.
pub fn forward_bias(panels: &[Option<Rect>], vh: f64) -> Option<usize> {
    let mut floor = None;
    for (i, pair) in panels.windows(2).enumerate() {
        let (Some(cur), Some(next)) = (pair[0], pair[1]) else {
            continue;
        };
        if cur.y1 < SCROLLED_AWAY * vh && next.y0 < vh && next.y1 > 0.0 {
            floor = Some(i + 1);
        }
    }
    floor
}

/// Chooses the active media slide of one cinematic section.
#[derive(Clone, Debug)]
pub struct SlideSelector {
    current: usize,
    slide_count: usize,
    policy: ScrubPolicy,
}

impl SlideSelector {
    /// Selector starting on slide `0`.
    pub fn new(slide_count: usize, policy: ScrubPolicy) -> Self {
        Self {
            current: 0,
            slide_count,
            policy,
        }
    }

    /// Currently active slide.
    pub fn current(&self) -> usize {
        self.current
    }

    /// Number of selectable slides.
    pub fn slide_count(&self) -> usize {
        self.slide_count
    }

    /// Re-score against fresh panel rects. Returns a change only when the index moves.
    ///
    /// Panels beyond `slide_count` are ignored; a missing panel never wins.
    pub fn update(&mut self, panels: &[Option<Rect>], vh: f64) -> Option<SlideChange> {
        if self.slide_count == 0 {
            return None;
        }
        let panels = &panels[..panels.len().min(self.slide_count)];
        let metrics: Vec<Option<PanelMetrics>> = panels
            .iter()
            .map(|r| r.map(|r| panel_metrics(r, vh)))
            .collect();

        let mut next = best_slide(&metrics).unwrap_or(self.current);
        if let Some(floor) = forward_bias(panels, vh) {
            next = next.max(floor);
        }
        if self.policy == ScrubPolicy::ForwardOnly {
            next = next.max(self.current);
        }
        let next = next.min(self.slide_count - 1);

        if next == self.current {
            return None;
        }
        let change = SlideChange {
            from: self.current,
            to: next,
        };
        tracing::debug!(from = change.from, to = change.to, "active slide changed");
        self.current = next;
        Some(change)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/selector.rs"]
mod tests;
