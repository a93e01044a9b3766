//! Headless simulation: a document model that stands in for the browser, and a JSON scenario
//! runner that sweeps scroll offsets through the runtime.

mod page;
mod scenario;

pub use page::Page;
pub use scenario::{
    Binding, ChildDef, ContextDef, EffectDef, NodeDef, ResizeDef, Sample, Scenario, ScenarioDef,
    SectionDef, SimulationReport, SweepDef, ViewportDef,
};
