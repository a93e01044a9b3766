use std::collections::BTreeMap;

use crate::effects::reveal::{REVEAL_THRESHOLD, RevealGate};
use crate::effects::render::{RenderState, StylePatch};
use crate::effects::progress::REVEAL_TRIGGER;
use crate::effects::selector::SlideSelector;
use crate::foundation::core::SectionId;
use crate::foundation::error::{ScrollyError, ScrollyResult};
use crate::runtime::section::{Driver, Effect, ScrollBoundSection, SectionSpec};
use crate::scroll::context::ScrollingContext;
use crate::scroll::geometry::{GeometryResolver, find_spacer};
use crate::scroll::host::{
    EventHost, HostEvent, LayoutProbe, ListenTarget, ObserveOptions, ScrollHost,
};
use crate::scroll::scheduler::{Dispatch, SchedulerStats};

/// New render state of one section together with the DOM mutations that apply it.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct RenderUpdate {
    /// Section that changed.
    pub section: SectionId,
    /// Its new render state.
    pub state: RenderState,
    /// Mutations for the host adapter.
    pub patch: StylePatch,
}

/// Result of [`ScrollRuntime::bind`].
#[derive(Clone, Debug, PartialEq)]
pub enum BindOutcome {
    /// Freshly bound; carries the initial render.
    Bound(RenderUpdate),
    /// The section was already bound; nothing was registered.
    AlreadyBound,
}

/// Registry of bound scroll sections and entry point for host callbacks.
///
/// Sections are independent: each owns its scheduler, listeners, and selector state. Host
/// callbacks for unknown or disposed sections are ignored so late events after a re-render
/// never fail.
///
/// Hosts mint section ids in increasing order. Disposal retires every id up to the highest one
/// disposed so far, so the registry stays bounded by the number of live sections.
#[derive(Debug, Default)]
pub struct ScrollRuntime {
    sections: BTreeMap<SectionId, ScrollBoundSection>,
    retired_through: Option<SectionId>,
}

impl ScrollRuntime {
    /// Empty runtime.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wire a section: detect its scrolling context, register listeners, render once.
    ///
    /// Binding an already-bound id is a no-op. Binding an id at or below the highest disposed
    /// id is an error: a re-rendered block must come with a fresh id.
    #[tracing::instrument(skip(self, host, spec), fields(section = %spec.id, kind = %spec.effect.kind()))]
    pub fn bind<H: ScrollHost>(
        &mut self,
        host: &mut H,
        spec: SectionSpec,
    ) -> ScrollyResult<BindOutcome> {
        if self.sections.contains_key(&spec.id) {
            tracing::debug!("already bound");
            return Ok(BindOutcome::AlreadyBound);
        }
        if let Some(last) = self.retired_through
            && spec.id <= last
        {
            return Err(ScrollyError::binding(format!(
                "{} is retired; bind the re-rendered node under an id above {last}",
                spec.id
            )));
        }

        let context = ScrollingContext::detect(&*host, spec.root);
        let kind = spec.effect.kind();
        let driver = match spec.effect {
            Effect::PinZoom { nodes, params } => {
                let spacer = find_spacer(&*host, nodes.section);
                if spacer.is_none() {
                    tracing::debug!("no spacer; using section-only progress");
                }
                Driver::PinZoom {
                    nodes,
                    params: params.sanitized(),
                    spacer,
                }
            }
            Effect::Cinematic { nodes, params } => {
                let present = nodes.panels.len();
                let slide_count = match params.slide_count {
                    0 => present,
                    n => n.min(present),
                };
                if slide_count == 0 {
                    tracing::warn!("cinematic section has no panels; selector disabled");
                }
                Driver::Cinematic {
                    nodes,
                    selector: SlideSelector::new(slide_count, params.scrub),
                }
            }
            Effect::WipePair { nodes, params } => Driver::WipePair {
                nodes,
                params: params.sanitized(),
            },
            Effect::FadeReveal { element } => {
                let geo = GeometryResolver::new(&*host, context);
                Driver::FadeReveal {
                    element,
                    gate: RevealGate::mount(geo.rect(element), geo.viewport_height()),
                }
            }
        };

        let mut section = ScrollBoundSection::new(spec.id, kind, context, driver);
        match &section.driver {
            Driver::FadeReveal { element, gate } => {
                if gate.needs_observer() {
                    let root = match context {
                        ScrollingContext::Window => None,
                        ScrollingContext::Nested(node) => Some(node),
                    };
                    let opts = ObserveOptions {
                        root,
                        threshold: REVEAL_THRESHOLD,
                        bottom_margin_frac: 1.0 - REVEAL_TRIGGER,
                    };
                    section.observer = Some(host.observe(*element, opts, spec.id));
                }
            }
            _ => {
                let scroll = host.add_listener(context.listen_target(), HostEvent::Scroll, spec.id);
                let resize = host.add_listener(ListenTarget::Window, HostEvent::Resize, spec.id);
                section.listeners.push(scroll);
                section.listeners.push(resize);
            }
        }

        let (state, patch) = section
            .refresh(&*host)
            .ok_or_else(|| ScrollyError::binding("initial render produced no state"))?;
        tracing::debug!(?context, "bound");
        self.sections.insert(spec.id, section);
        Ok(BindOutcome::Bound(RenderUpdate {
            section: spec.id,
            state,
            patch,
        }))
    }

    /// Native `scroll`/`resize` callback.
    ///
    /// Scroll bursts request one animation frame; resize recomputes immediately.
    pub fn on_event<H: ScrollHost>(
        &mut self,
        host: &mut H,
        id: SectionId,
        event: HostEvent,
    ) -> Option<RenderUpdate> {
        let section = self.sections.get_mut(&id)?;
        match section.scheduler.notify(event) {
            Dispatch::RequestFrame => {
                host.request_frame(id);
                None
            }
            Dispatch::Coalesced => None,
            Dispatch::RunNow => Self::refresh(section, &*host),
        }
    }

    /// Animation-frame callback.
    pub fn on_frame(&mut self, probe: &impl LayoutProbe, id: SectionId) -> Option<RenderUpdate> {
        let section = self.sections.get_mut(&id)?;
        if !section.scheduler.on_frame() {
            return None;
        }
        Self::refresh(section, probe)
    }

    /// Intersection-observer callback of a fade-reveal section.
    ///
    /// The first qualifying intersection reveals the element and drops the observer.
    pub fn on_intersection<H: ScrollHost>(
        &mut self,
        host: &mut H,
        id: SectionId,
    ) -> Option<RenderUpdate> {
        let section = self.sections.get_mut(&id)?;
        let context = section.context();
        let Driver::FadeReveal { element, gate } = &mut section.driver else {
            return None;
        };
        let geo = GeometryResolver::new(&*host, context);
        if !gate.on_intersection(geo.rect(*element), geo.viewport_height()) {
            return None;
        }
        if let Some(obs) = section.observer.take() {
            host.unobserve(obs);
        }
        tracing::debug!(section = %id, "revealed");
        Self::refresh(section, &*host)
    }

    fn refresh(section: &mut ScrollBoundSection, probe: &impl LayoutProbe) -> Option<RenderUpdate> {
        let id = section.id();
        section.refresh(probe).map(|(state, patch)| RenderUpdate {
            section: id,
            state,
            patch,
        })
    }

    /// Remove every listener and observer of a section and retire its id.
    #[tracing::instrument(skip(self, host))]
    pub fn dispose<H: EventHost>(&mut self, host: &mut H, id: SectionId) -> ScrollyResult<()> {
        let section = self
            .sections
            .remove(&id)
            .ok_or_else(|| ScrollyError::binding(format!("{id} is not bound")))?;
        self.dispose_section(host, section);
        Ok(())
    }

    /// Dispose every bound section.
    pub fn dispose_all<H: EventHost>(&mut self, host: &mut H) {
        for section in std::mem::take(&mut self.sections).into_values() {
            self.dispose_section(host, section);
        }
    }

    fn dispose_section<H: EventHost>(&mut self, host: &mut H, mut section: ScrollBoundSection) {
        for l in section.listeners.drain(..) {
            host.remove_listener(l);
        }
        if let Some(obs) = section.observer.take() {
            host.unobserve(obs);
        }
        let id = section.id();
        self.retired_through = Some(self.retired_through.map_or(id, |last| last.max(id)));
        tracing::debug!(section = %id, "disposed");
    }

    /// Highest disposed id; ids at or below it can no longer be bound.
    pub fn retired_through(&self) -> Option<SectionId> {
        self.retired_through
    }

    /// Whether `id` is currently bound.
    pub fn is_bound(&self, id: SectionId) -> bool {
        self.sections.contains_key(&id)
    }

    /// Bound section by id.
    pub fn section(&self, id: SectionId) -> Option<&ScrollBoundSection> {
        self.sections.get(&id)
    }

    /// Scheduler counters of a bound section.
    pub fn stats(&self, id: SectionId) -> Option<SchedulerStats> {
        self.sections.get(&id).map(ScrollBoundSection::stats)
    }

    /// Number of bound sections.
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Whether no section is bound.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/engine.rs"]
mod tests;
