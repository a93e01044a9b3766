//! Scrollytell is the scroll-progress animation engine of a scrollytelling page builder.
//!
//! It turns scroll position and element geometry into render state for four scroll-bound
//! effects: pinned photo zoom, cinematic media crossfade, block-to-block wipe/fade, and deferred
//! fade-in reveal. The same engine drives a live preview (nested scroll container) and exported
//! pages (window scroll).
//!
//! - Implement [`LayoutProbe`] and [`EventHost`] for your host, or use [`sim::Page`]
//! - [`ScrollRuntime::bind`] each section with a [`SectionSpec`]
//! - Forward `scroll`/`resize`, animation-frame, and intersection callbacks to the runtime and
//!   apply the returned [`StylePatch`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod animation;
pub(crate) mod effects;
pub(crate) mod runtime;
pub(crate) mod scroll;
/// Headless document model and JSON scenario runner.
pub mod sim;

pub use crate::foundation::core::{NodeRef, Point, Rect, SectionId};
pub use crate::foundation::error::{ScrollyError, ScrollyResult};
pub use crate::foundation::math::{clamp01, lerp, window_t};

pub use crate::animation::ease::Ease;

pub use crate::scroll::context::{ScrollingContext, Viewport};
pub use crate::scroll::geometry::{GeometryResolver, PinGeometry, SPACER_CLASS, find_spacer};
pub use crate::scroll::host::{
    EventHost, HostEvent, LayoutProbe, ListenTarget, ListenerId, ObserveOptions, Overflow,
    OverflowStyle, ScrollHost,
};
pub use crate::scroll::scheduler::{Dispatch, FrameScheduler, SchedulerStats};

pub use crate::effects::params::{
    CinematicParams, PinZoomParams, ScrubPolicy, WipeDir, WipeParams, WipeVariant,
    parse_wipe_kind_params,
};
pub use crate::effects::phase::{
    PANEL_RISE_PX, PanelFrame, fade_opacity, panel_frame, synthesize_pin, zoom_scale,
};
pub use crate::effects::progress::{
    POSITION_ANCHOR, PanelMetrics, PinPhase, PinProgress, REVEAL_TRIGGER, panel_metrics,
    pin_zoom_progress, reveal_intersects, reveal_needs_fade, wipe_progress,
};
pub use crate::effects::render::{
    CLASS_ACTIVE, CLASS_BOTTOM, CLASS_FIXED, CLASS_VISIBLE, CinematicState, ClipInset,
    PinZoomState, RenderState, RevealPhase, RevealState, StyleOp, StylePatch, WipePhase,
    WipeState,
};
pub use crate::effects::reveal::{REVEAL_OFFSET_PX, REVEAL_THRESHOLD, RevealGate};
pub use crate::effects::selector::{
    POSITION_WEIGHT, SCROLLED_AWAY, SlideChange, SlideSelector, VISIBILITY_FLOOR,
    VISIBILITY_WEIGHT, best_slide, forward_bias, slide_score,
};
pub use crate::effects::wipe::{clip_for_progress, compose_wipe, wipe_phase};

pub use crate::runtime::engine::{BindOutcome, RenderUpdate, ScrollRuntime};
pub use crate::runtime::section::{
    CinematicNodes, Effect, PinZoomNodes, ScrollBoundSection, SectionKind, SectionSpec,
    WipeNodes,
};
