use smallvec::SmallVec;

use crate::effects::params::{CinematicParams, PinZoomParams, WipeParams, WipeVariant};
use crate::effects::phase::synthesize_pin;
use crate::effects::progress::{PinPhase, pin_zoom_progress};
use crate::effects::render::{
    CLASS_ACTIVE, CLASS_BOTTOM, CLASS_FIXED, CLASS_VISIBLE, CinematicState, PinZoomState,
    RenderState, RevealPhase, StylePatch, WipePhase, WipeState, fmt_num,
};
use crate::effects::reveal::RevealGate;
use crate::effects::selector::SlideSelector;
use crate::effects::wipe::compose_wipe;
use crate::foundation::core::{NodeRef, Rect, SectionId};
use crate::scroll::context::ScrollingContext;
use crate::scroll::geometry::GeometryResolver;
use crate::scroll::host::{LayoutProbe, ListenerId};
use crate::scroll::scheduler::{FrameScheduler, SchedulerStats};

/// Effect kind of a section.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SectionKind {
    /// Pinned photo zoom.
    PinZoom,
    /// Cinematic media crossfade.
    CinematicCrossfade,
    /// Wipe/fade block pair.
    WipePair,
    /// Deferred fade-in reveal.
    FadeReveal,
}

impl std::fmt::Display for SectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::PinZoom => "pin-zoom",
            Self::CinematicCrossfade => "cinematic-crossfade",
            Self::WipePair => "wipe-pair",
            Self::FadeReveal => "fade-reveal",
        })
    }
}

/// Nodes of a pin-zoom section.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PinZoomNodes {
    /// The pinned section; its preceding spacer sibling is looked up at bind time.
    pub section: NodeRef,
    /// The zooming photo; styles land on `section` when absent.
    pub media: Option<NodeRef>,
    /// The context panel; panel timing is skipped when absent.
    pub panel: Option<NodeRef>,
}

/// Nodes of a cinematic crossfade section, in slide order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CinematicNodes {
    /// The section container; scoring is skipped while it is off screen.
    pub section: NodeRef,
    /// Per-slide text panels, measured for scoring.
    pub panels: Vec<NodeRef>,
    /// Per-slide media layers, toggled with the `active` class.
    pub media: Vec<NodeRef>,
}

/// Nodes of a wipe/fade pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WipeNodes {
    /// The stacked scroll region, sized to `max(100vh, wipe height)` on first render.
    pub region: NodeRef,
    /// The block rendered normally at the top of the region; inert once fully covered.
    pub previous: Option<NodeRef>,
    /// The covering block being revealed.
    pub next: NodeRef,
}

/// A scroll-bound effect and the nodes it drives.
#[derive(Clone, Debug, PartialEq)]
pub enum Effect {
    /// Pinned photo zoom.
    PinZoom {
        /// Nodes.
        nodes: PinZoomNodes,
        /// Phase thresholds.
        params: PinZoomParams,
    },
    /// Cinematic media crossfade.
    Cinematic {
        /// Nodes.
        nodes: CinematicNodes,
        /// Selector parameters.
        params: CinematicParams,
    },
    /// Wipe/fade pair.
    WipePair {
        /// Nodes.
        nodes: WipeNodes,
        /// Region parameters.
        params: WipeParams,
    },
    /// Deferred fade reveal of one element.
    FadeReveal {
        /// The element opting in.
        element: NodeRef,
    },
}

impl Effect {
    /// Kind of this effect.
    pub fn kind(&self) -> SectionKind {
        match self {
            Self::PinZoom { .. } => SectionKind::PinZoom,
            Self::Cinematic { .. } => SectionKind::CinematicCrossfade,
            Self::WipePair { .. } => SectionKind::WipePair,
            Self::FadeReveal { .. } => SectionKind::FadeReveal,
        }
    }
}

/// Everything needed to bind one section.
#[derive(Clone, Debug, PartialEq)]
pub struct SectionSpec {
    /// Identity of the mounted node.
    pub id: SectionId,
    /// Candidate scrolling root (the preview container); `None` for exported pages.
    pub root: Option<NodeRef>,
    /// The effect.
    pub effect: Effect,
}

#[derive(Clone, Debug)]
pub(crate) enum Driver {
    PinZoom {
        nodes: PinZoomNodes,
        params: PinZoomParams,
        spacer: Option<NodeRef>,
    },
    Cinematic {
        nodes: CinematicNodes,
        selector: SlideSelector,
    },
    WipePair {
        nodes: WipeNodes,
        params: WipeParams,
    },
    FadeReveal {
        element: NodeRef,
        gate: RevealGate,
    },
}

/// One bound scroll effect instance.
#[derive(Clone, Debug)]
pub struct ScrollBoundSection {
    id: SectionId,
    kind: SectionKind,
    context: ScrollingContext,
    pub(crate) scheduler: FrameScheduler,
    pub(crate) listeners: SmallVec<[ListenerId; 2]>,
    pub(crate) observer: Option<ListenerId>,
    pub(crate) driver: Driver,
    last: Option<RenderState>,
}

impl ScrollBoundSection {
    pub(crate) fn new(
        id: SectionId,
        kind: SectionKind,
        context: ScrollingContext,
        driver: Driver,
    ) -> Self {
        Self {
            id,
            kind,
            context,
            scheduler: FrameScheduler::new(),
            listeners: SmallVec::new(),
            observer: None,
            driver,
            last: None,
        }
    }

    /// Identity.
    pub fn id(&self) -> SectionId {
        self.id
    }

    /// Effect kind.
    pub fn kind(&self) -> SectionKind {
        self.kind
    }

    /// Scrolling context chosen at bind time.
    pub fn context(&self) -> ScrollingContext {
        self.context
    }

    /// Scheduler counters.
    pub fn stats(&self) -> SchedulerStats {
        self.scheduler.stats()
    }

    /// Most recent render state emitted.
    pub fn last_state(&self) -> Option<&RenderState> {
        self.last.as_ref()
    }

    /// Spacer found at bind time (pin-zoom only).
    pub fn spacer(&self) -> Option<NodeRef> {
        match self.driver {
            Driver::PinZoom { spacer, .. } => spacer,
            _ => None,
        }
    }

    /// Run the pipeline and return the new state plus its patch, or `None` when nothing changed.
    pub(crate) fn refresh(
        &mut self,
        probe: &impl LayoutProbe,
    ) -> Option<(RenderState, StylePatch)> {
        let (state, patch) = self.compute(probe);
        if self.last.as_ref() == Some(&state) {
            return None;
        }
        self.last = Some(state.clone());
        Some((state, patch))
    }

    fn compute(&mut self, probe: &impl LayoutProbe) -> (RenderState, StylePatch) {
        let geo = GeometryResolver::new(probe, self.context);
        let vh = geo.viewport_height();
        let mut patch = StylePatch::default();

        match &mut self.driver {
            Driver::PinZoom {
                nodes,
                params,
                spacer,
            } => {
                let state = match geo.pin(nodes.section, *spacer) {
                    Some(g) => synthesize_pin(pin_zoom_progress(&g, params.activate_at), params),
                    None => PinZoomState::hidden(params),
                };
                let prev = match &self.last {
                    Some(RenderState::PinZoom(p)) => Some(*p),
                    _ => None,
                };
                pin_patch(&mut patch, nodes, &state, prev);
                (RenderState::PinZoom(state), patch)
            }
            Driver::Cinematic { nodes, selector } => {
                let in_view = geo
                    .rect(nodes.section)
                    .is_none_or(|r| r.y1 > 0.0 && r.y0 < vh);
                let change = if in_view {
                    selector.update(&geo.rects(&nodes.panels), vh)
                } else {
                    None
                };
                let state = CinematicState {
                    active_slide: selector.current(),
                    slide_count: selector.slide_count(),
                };
                if selector.slide_count() > 0 {
                    match (change, &self.last) {
                        (Some(c), Some(_)) => {
                            if let Some(&m) = nodes.media.get(c.from) {
                                patch.toggle(m, CLASS_ACTIVE, false);
                            }
                            if let Some(&m) = nodes.media.get(c.to) {
                                patch.toggle(m, CLASS_ACTIVE, true);
                            }
                        }
                        (_, None) => {
                            if let Some(&m) = nodes.media.get(state.active_slide) {
                                patch.toggle(m, CLASS_ACTIVE, true);
                            }
                        }
                        (None, Some(_)) => {}
                    }
                }
                (RenderState::Cinematic(state), patch)
            }
            Driver::WipePair { nodes, params } => {
                let height = params.region_height_px(vh);
                let top = geo.rect(nodes.region).map_or(vh, |r| r.y0);
                let region = Rect::new(0.0, top, 0.0, top + height);
                let state = compose_wipe(region, vh, params);
                let prev = match &self.last {
                    Some(RenderState::WipePair(w)) => Some(w.phase),
                    _ => None,
                };
                wipe_patch(&mut patch, nodes, params, &state, prev);
                (RenderState::WipePair(state), patch)
            }
            Driver::FadeReveal { element, gate } => {
                let state = gate.state();
                match state.phase {
                    RevealPhase::Untouched => {}
                    RevealPhase::Pending => {
                        patch.set(*element, "opacity", "0".to_string());
                        patch.set(
                            *element,
                            "transform",
                            format!("translateY({}px)", fmt_num(state.offset_y)),
                        );
                    }
                    RevealPhase::Revealed => {
                        patch.set(*element, "opacity", "1".to_string());
                        patch.set(*element, "transform", "translateY(0px)".to_string());
                        patch.toggle(*element, CLASS_VISIBLE, true);
                    }
                }
                (RenderState::FadeReveal(state), patch)
            }
        }
    }
}

fn pin_patch(
    patch: &mut StylePatch,
    nodes: &PinZoomNodes,
    state: &PinZoomState,
    prev: Option<PinZoomState>,
) {
    let media = nodes.media.unwrap_or(nodes.section);
    patch.set(media, "opacity", fmt_num(state.opacity));
    patch.set(media, "transform", format!("scale({})", fmt_num(state.scale)));
    if prev.is_none() {
        patch.set(
            media,
            "transform-origin",
            format!("{}% {}%", fmt_num(state.origin_x), fmt_num(state.origin_y)),
        );
    }
    if let Some(panel) = nodes.panel {
        patch.set(panel, "opacity", fmt_num(state.panel_opacity));
        patch.set(
            panel,
            "transform",
            format!("translateY({}px)", fmt_num(state.panel_offset_y)),
        );
    }
    if prev.map(|p| p.phase) != Some(state.phase) {
        patch.toggle(nodes.section, CLASS_FIXED, state.phase == PinPhase::Pinned);
        patch.toggle(nodes.section, CLASS_BOTTOM, state.phase == PinPhase::Released);
    }
}

fn wipe_patch(
    patch: &mut StylePatch,
    nodes: &WipeNodes,
    params: &WipeParams,
    state: &WipeState,
    prev: Option<WipePhase>,
) {
    if prev.is_none() {
        patch.set(
            nodes.region,
            "height",
            format!("{}vh", fmt_num(params.wipe_height_vh.max(100.0))),
        );
    }
    patch.set(nodes.next, "opacity", fmt_num(state.opacity));
    if params.variant == WipeVariant::Clip {
        patch.set(nodes.next, "clip-path", state.clip.to_css());
    }
    patch.set(
        nodes.next,
        "pointer-events",
        if state.interactive { "auto" } else { "none" }.to_string(),
    );
    if let Some(previous) = nodes.previous {
        patch.set(
            previous,
            "pointer-events",
            if state.interactive { "none" } else { "auto" }.to_string(),
        );
    }
    if prev != Some(state.phase) {
        patch.toggle(nodes.next, CLASS_FIXED, state.phase == WipePhase::Pinned);
        patch.toggle(nodes.next, CLASS_BOTTOM, state.phase == WipePhase::Released);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/section.rs"]
mod tests;
