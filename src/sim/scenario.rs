use std::collections::{BTreeMap, BTreeSet};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::effects::params::{CinematicParams, PinZoomParams, WipeParams};
use crate::effects::render::{RenderState, StylePatch};
use crate::foundation::core::{NodeRef, SectionId};
use crate::foundation::error::{ScrollyError, ScrollyResult};
use crate::runtime::engine::{BindOutcome, RenderUpdate, ScrollRuntime};
use crate::runtime::section::{
    CinematicNodes, Effect, PinZoomNodes, SectionKind, SectionSpec, WipeNodes,
};
use crate::scroll::context::ScrollingContext;
use crate::scroll::host::HostEvent;
use crate::scroll::scheduler::SchedulerStats;
use crate::sim::page::Page;

const MAX_SAMPLES: f64 = 1_000_000.0;

/// Window size of the simulated browser.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ViewportDef {
    /// Width in CSS pixels.
    pub width: f64,
    /// Height in CSS pixels.
    pub height: f64,
}

/// Which box scrolls the document.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ContextDef {
    /// Exported page: the window scrolls.
    #[default]
    Window,
    /// Live preview: a scroll container placed inside the window.
    Nested {
        /// Distance from the window top to the container top.
        top: f64,
        /// Container height.
        height: f64,
    },
}

/// A positioned child element of a block (media layer, text panel, ...).
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ChildDef {
    /// Unique node name.
    pub id: String,
    /// Offset from the parent block top.
    #[serde(default)]
    pub top: f64,
    /// Height in pixels.
    pub height: f64,
}

/// A top-level block in document flow.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct NodeDef {
    /// Unique node name.
    pub id: String,
    /// Height in pixels.
    pub height: f64,
    /// CSS classes (e.g. `pin-zoom-spacer`).
    #[serde(default)]
    pub classes: Vec<String>,
    /// Child elements.
    #[serde(default)]
    pub children: Vec<ChildDef>,
}

/// Effect declaration. `attrs`, when non-empty, replaces `params` with values parsed the way
/// the DOM data attributes are.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EffectDef {
    /// Pinned photo zoom on the section block.
    PinZoom {
        /// Phase thresholds.
        #[serde(default)]
        params: PinZoomParams,
        /// Data attributes.
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        /// Zooming photo node.
        #[serde(default)]
        media: Option<String>,
        /// Context panel node.
        #[serde(default)]
        panel: Option<String>,
    },
    /// Cinematic media crossfade.
    Cinematic {
        /// Selector parameters.
        #[serde(default)]
        params: CinematicParams,
        /// Data attributes.
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        /// Text panels in slide order.
        panels: Vec<String>,
        /// Media layers in slide order.
        #[serde(default)]
        media: Vec<String>,
    },
    /// Wipe/fade pair; the section block is the stacked region, resized from `wipe_height_vh`.
    WipePair {
        /// Region parameters.
        #[serde(default)]
        params: WipeParams,
        /// Data attributes.
        #[serde(default)]
        attrs: BTreeMap<String, String>,
        /// Block shown first.
        #[serde(default)]
        previous: Option<String>,
        /// Covering block.
        next: String,
    },
    /// Deferred fade reveal of the section block.
    FadeReveal {},
}

/// One bound section of a scenario.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SectionDef {
    /// Unique section name used in reports.
    pub name: String,
    /// Block the effect is bound to.
    pub block: String,
    /// The effect.
    pub effect: EffectDef,
}

/// A window resize delivered once the sweep reaches `at`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ResizeDef {
    /// Scroll offset at which the resize happens.
    pub at: f64,
    /// New window height.
    pub height: f64,
}

/// Scroll offsets to visit: `from`, `from + step`, ... up to and including `to`.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct SweepDef {
    /// First scroll offset.
    pub from: f64,
    /// Last scroll offset.
    pub to: f64,
    /// Distance between samples.
    pub step: f64,
}

fn default_events_per_frame() -> u32 {
    3
}

/// JSON-facing scenario document.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScenarioDef {
    /// Window size.
    pub viewport: ViewportDef,
    /// Scrolling box.
    #[serde(default)]
    pub context: ContextDef,
    /// Blocks in document order.
    pub blocks: Vec<NodeDef>,
    /// Sections to bind.
    pub sections: Vec<SectionDef>,
    /// Scroll sweep.
    pub sweep: SweepDef,
    /// Scroll events fired per sampled offset, before the frame runs.
    #[serde(default = "default_events_per_frame")]
    pub events_per_frame: u32,
    /// Window resizes along the sweep.
    #[serde(default)]
    pub resizes: Vec<ResizeDef>,
}

/// One emitted render update.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Sample {
    /// Scroll offset at which it was emitted.
    pub scroll_y: f64,
    /// Section name.
    pub section: String,
    /// Section id.
    pub id: SectionId,
    /// New render state.
    pub state: RenderState,
    /// DOM mutations.
    pub patch: StylePatch,
}

/// Section summary reported by [`Scenario::bindings`].
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct Binding {
    /// Section name.
    pub section: String,
    /// Assigned id.
    pub id: SectionId,
    /// Effect kind.
    pub kind: SectionKind,
    /// Detected scrolling context.
    pub context: ScrollingContext,
    /// Whether a pin-zoom spacer was found.
    pub spacer: bool,
}

/// Outcome of [`Scenario::run`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize)]
pub struct SimulationReport {
    /// Updates in emission order; unchanged frames emit nothing.
    pub samples: Vec<Sample>,
    /// Scheduler counters per section name.
    pub stats: BTreeMap<String, SchedulerStats>,
}

impl SimulationReport {
    /// Updates emitted for one section.
    pub fn for_section<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a Sample> + 'a {
        self.samples.iter().filter(move |s| s.section == name)
    }
}

/// A validated-on-demand scroll scenario.
#[derive(Clone, Debug)]
pub struct Scenario {
    def: ScenarioDef,
}

struct Mounted {
    page: Page,
    runtime: ScrollRuntime,
    sections: Vec<(String, SectionId)>,
    initial: Vec<RenderUpdate>,
}

impl Scenario {
    /// Wrap an in-memory definition.
    pub fn new(def: ScenarioDef) -> Self {
        Self { def }
    }

    /// Parse a scenario from a JSON reader.
    pub fn from_reader<R: std::io::Read>(r: R) -> ScrollyResult<Self> {
        let def: ScenarioDef = serde_json::from_reader(r)
            .map_err(|e| ScrollyError::serde(format!("parse scenario JSON: {e}")))?;
        Ok(Self { def })
    }

    /// Parse a scenario from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> ScrollyResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            ScrollyError::validation(format!("open scenario JSON '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    /// Underlying definition.
    pub fn def(&self) -> &ScenarioDef {
        &self.def
    }

    /// Check sizes, the sweep, and every node reference.
    pub fn validate(&self) -> ScrollyResult<()> {
        let d = &self.def;
        if !(d.viewport.width > 0.0 && d.viewport.height > 0.0) {
            return Err(ScrollyError::validation("viewport width/height must be > 0"));
        }
        if let ContextDef::Nested { top, height } = d.context
            && !(top.is_finite() && height > 0.0 && height.is_finite())
        {
            return Err(ScrollyError::validation(
                "nested context needs a finite top and height > 0",
            ));
        }

        let mut nodes = BTreeSet::new();
        for b in &d.blocks {
            if !(b.height > 0.0 && b.height.is_finite()) {
                return Err(ScrollyError::validation(format!(
                    "block '{}' height must be > 0",
                    b.id
                )));
            }
            if !nodes.insert(b.id.as_str()) {
                return Err(ScrollyError::validation(format!(
                    "duplicate node id '{}'",
                    b.id
                )));
            }
            for c in &b.children {
                if !(c.height >= 0.0 && c.height.is_finite() && c.top.is_finite()) {
                    return Err(ScrollyError::validation(format!(
                        "child '{}' needs a finite top and height >= 0",
                        c.id
                    )));
                }
                if !nodes.insert(c.id.as_str()) {
                    return Err(ScrollyError::validation(format!(
                        "duplicate node id '{}'",
                        c.id
                    )));
                }
            }
        }

        let mut names = BTreeSet::new();
        for s in &d.sections {
            if !names.insert(s.name.as_str()) {
                return Err(ScrollyError::validation(format!(
                    "duplicate section name '{}'",
                    s.name
                )));
            }
            let check = |node: &str| -> ScrollyResult<()> {
                if nodes.contains(node) {
                    Ok(())
                } else {
                    Err(ScrollyError::validation(format!(
                        "section '{}' references missing node '{node}'",
                        s.name
                    )))
                }
            };
            if !d.blocks.iter().any(|b| b.id == s.block) {
                return Err(ScrollyError::validation(format!(
                    "section '{}' must be bound to a top-level block, got '{}'",
                    s.name, s.block
                )));
            }
            match &s.effect {
                EffectDef::PinZoom { media, panel, .. } => {
                    for n in media.iter().chain(panel.iter()) {
                        check(n.as_str())?;
                    }
                }
                EffectDef::Cinematic { panels, media, .. } => {
                    for n in panels.iter().chain(media.iter()) {
                        check(n.as_str())?;
                    }
                }
                EffectDef::WipePair { previous, next, .. } => {
                    check(next.as_str())?;
                    for n in previous.iter() {
                        check(n.as_str())?;
                    }
                }
                EffectDef::FadeReveal {} => {}
            }
        }

        let sw = d.sweep;
        if !(sw.step > 0.0 && sw.step.is_finite()) {
            return Err(ScrollyError::validation("sweep step must be > 0"));
        }
        if !(sw.from.is_finite() && sw.to.is_finite() && sw.to >= sw.from) {
            return Err(ScrollyError::validation("sweep needs finite from <= to"));
        }
        if (sw.to - sw.from) / sw.step > MAX_SAMPLES {
            return Err(ScrollyError::validation("sweep has too many samples"));
        }
        if d.events_per_frame == 0 {
            return Err(ScrollyError::validation("events_per_frame must be >= 1"));
        }
        for r in &d.resizes {
            if !(r.height > 0.0 && r.height.is_finite() && r.at.is_finite()) {
                return Err(ScrollyError::validation("resize height must be > 0"));
            }
        }
        Ok(())
    }

    /// Validate, bind every section at the sweep start, and report what was bound.
    pub fn bindings(&self) -> ScrollyResult<Vec<Binding>> {
        self.validate()?;
        let m = self.mount()?;
        let mut out = Vec::with_capacity(m.sections.len());
        for (name, id) in m.sections {
            let section = m
                .runtime
                .section(id)
                .ok_or_else(|| ScrollyError::binding(format!("section '{name}' not bound")))?;
            out.push(Binding {
                section: name,
                id,
                kind: section.kind(),
                context: section.context(),
                spacer: section.spacer().is_some(),
            });
        }
        Ok(out)
    }

    /// Sweep the scroll offset through the runtime and collect every render update.
    ///
    /// Each offset fires `events_per_frame` scroll events, then runs the requested frames, then
    /// delivers intersection callbacks for observed elements in view.
    #[tracing::instrument(skip(self), fields(sections = self.def.sections.len()))]
    pub fn run(&self) -> ScrollyResult<SimulationReport> {
        self.validate()?;
        let Mounted {
            mut page,
            mut runtime,
            sections,
            initial,
        } = self.mount()?;
        let names: BTreeMap<SectionId, String> =
            sections.iter().map(|(n, id)| (*id, n.clone())).collect();

        let mut report = SimulationReport::default();
        let mut record = |scroll_y: f64, u: RenderUpdate| {
            let section = names.get(&u.section).cloned().unwrap_or_default();
            report.samples.push(Sample {
                scroll_y,
                section,
                id: u.section,
                state: u.state,
                patch: u.patch,
            });
        };

        let sw = self.def.sweep;
        for u in initial {
            record(sw.from, u);
        }
        self.deliver_intersections(&mut page, &mut runtime, sw.from, &mut record);

        let mut resizes = self.def.resizes.clone();
        resizes.sort_by(|a, b| a.at.total_cmp(&b.at));
        let mut resizes = resizes.into_iter().peekable();

        let steps = ((sw.to - sw.from) / sw.step).floor() as u64;
        for i in 1..=steps {
            let y = sw.from + sw.step * i as f64;
            page.scroll_to(y);

            while let Some(r) = resizes.next_if(|r| r.at <= y) {
                page.resize(r.height);
                for id in page.listeners_of(HostEvent::Resize) {
                    if let Some(u) = runtime.on_event(&mut page, id, HostEvent::Resize) {
                        record(y, u);
                    }
                }
            }

            for id in page.listeners_of(HostEvent::Scroll) {
                for _ in 0..self.def.events_per_frame {
                    if let Some(u) = runtime.on_event(&mut page, id, HostEvent::Scroll) {
                        record(y, u);
                    }
                }
            }
            for id in page.take_frames() {
                if let Some(u) = runtime.on_frame(&page, id) {
                    record(y, u);
                }
            }
            self.deliver_intersections(&mut page, &mut runtime, y, &mut record);
        }

        for (name, id) in &sections {
            if let Some(stats) = runtime.stats(*id) {
                report.stats.insert(name.clone(), stats);
            }
        }
        runtime.dispose_all(&mut page);
        tracing::debug!(samples = report.samples.len(), "simulation finished");
        Ok(report)
    }

    fn deliver_intersections(
        &self,
        page: &mut Page,
        runtime: &mut ScrollRuntime,
        y: f64,
        record: &mut impl FnMut(f64, RenderUpdate),
    ) {
        for id in page.intersecting_observers() {
            if let Some(u) = runtime.on_intersection(&mut *page, id) {
                record(y, u);
            }
        }
    }

    fn mount(&self) -> ScrollyResult<Mounted> {
        let d = &self.def;
        let mut page = match d.context {
            ContextDef::Window => Page::window(d.viewport.width, d.viewport.height),
            ContextDef::Nested { top, height } => {
                Page::nested(d.viewport.width, d.viewport.height, top, height)
            }
        };

        // wipe regions take their height from the pair's parameters
        let vh = match d.context {
            ContextDef::Window => d.viewport.height,
            ContextDef::Nested { height, .. } => height,
        };
        let region_heights: BTreeMap<&str, f64> = d
            .sections
            .iter()
            .filter_map(|s| match &s.effect {
                EffectDef::WipePair { params, attrs, .. } => Some((
                    s.block.as_str(),
                    wipe_params(params, attrs).region_height_px(vh),
                )),
                _ => None,
            })
            .collect();

        let mut refs: BTreeMap<&str, NodeRef> = BTreeMap::new();
        for b in &d.blocks {
            let classes: Vec<&str> = b.classes.iter().map(String::as_str).collect();
            let height = region_heights.get(b.id.as_str()).copied().unwrap_or(b.height);
            let node = page.push_block(height, &classes);
            refs.insert(b.id.as_str(), node);
            for c in &b.children {
                refs.insert(c.id.as_str(), page.push_child(node, c.top, c.height));
            }
        }
        page.scroll_to(d.sweep.from);

        let node = |name: &str| -> ScrollyResult<NodeRef> {
            refs.get(name)
                .copied()
                .ok_or_else(|| ScrollyError::validation(format!("unknown node '{name}'")))
        };

        let mut runtime = ScrollRuntime::new();
        let mut sections = Vec::with_capacity(d.sections.len());
        let mut initial = Vec::new();
        for (i, s) in d.sections.iter().enumerate() {
            let id = SectionId(i as u64 + 1);
            let block = node(s.block.as_str())?;
            let effect = match &s.effect {
                EffectDef::PinZoom {
                    params,
                    attrs,
                    media,
                    panel,
                } => Effect::PinZoom {
                    nodes: PinZoomNodes {
                        section: block,
                        media: media.as_deref().map(node).transpose()?,
                        panel: panel.as_deref().map(node).transpose()?,
                    },
                    params: if attrs.is_empty() {
                        *params
                    } else {
                        PinZoomParams::from_attrs(attrs)
                    },
                },
                EffectDef::Cinematic {
                    params,
                    attrs,
                    panels,
                    media,
                } => Effect::Cinematic {
                    nodes: CinematicNodes {
                        section: block,
                        panels: panels.iter().map(|n| node(n.as_str())).collect::<ScrollyResult<_>>()?,
                        media: media.iter().map(|n| node(n.as_str())).collect::<ScrollyResult<_>>()?,
                    },
                    params: if attrs.is_empty() {
                        *params
                    } else {
                        CinematicParams::from_attrs(attrs)
                    },
                },
                EffectDef::WipePair {
                    params,
                    attrs,
                    previous,
                    next,
                } => Effect::WipePair {
                    nodes: WipeNodes {
                        region: block,
                        previous: previous.as_deref().map(node).transpose()?,
                        next: node(next.as_str())?,
                    },
                    params: wipe_params(params, attrs),
                },
                EffectDef::FadeReveal {} => Effect::FadeReveal { element: block },
            };
            let spec = SectionSpec {
                id,
                root: page.root(),
                effect,
            };
            if let BindOutcome::Bound(u) = runtime.bind(&mut page, spec)? {
                initial.push(u);
            }
            sections.push((s.name.clone(), id));
        }

        Ok(Mounted {
            page,
            runtime,
            sections,
            initial,
        })
    }
}

fn wipe_params(params: &WipeParams, attrs: &BTreeMap<String, String>) -> WipeParams {
    if attrs.is_empty() {
        params.sanitized()
    } else {
        WipeParams::from_attrs(attrs)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/scenario.rs"]
mod tests;
