use crate::foundation::core::{NodeRef, Point, rect_height};
use crate::scroll::host::{LayoutProbe, ListenTarget};

/// The box whose scrolling drives a section.
///
/// Resolved once at bind time and threaded through every geometry call afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize)]
pub enum ScrollingContext {
    /// Top-level document scroll (exported pages).
    Window,
    /// A nested scrollable container (the live preview surface).
    Nested(NodeRef),
}

/// The active viewport of a scrolling context, in window client coordinates.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    /// Top-left corner of the viewport.
    pub origin: Point,
    /// Visible height of the viewport.
    pub height: f64,
}

impl ScrollingContext {
    /// Pick the scrolling context for a section rendered under `root`.
    ///
    /// A root whose computed vertical overflow is scrollable becomes the context; anything else
    /// (including no root) falls back to the window.
    pub fn detect(probe: &impl LayoutProbe, root: Option<NodeRef>) -> Self {
        let Some(root) = root else {
            return Self::Window;
        };
        match probe.overflow(root).vertical() {
            Some(o) if o.is_scrollable() => Self::Nested(root),
            _ => Self::Window,
        }
    }

    /// Target that receives `scroll` events for this context.
    pub fn listen_target(self) -> ListenTarget {
        match self {
            Self::Window => ListenTarget::Window,
            Self::Nested(node) => ListenTarget::Element(node),
        }
    }

    /// Current viewport of this context.
    ///
    /// A nested scroller that can no longer be measured degrades to the window viewport.
    pub fn viewport(self, probe: &impl LayoutProbe) -> Viewport {
        let window = Viewport {
            origin: Point::ZERO,
            height: probe.window_height().max(0.0),
        };
        match self {
            Self::Window => window,
            Self::Nested(node) => match probe.client_rect(node) {
                Some(r) => Viewport {
                    origin: Point::new(r.x0, r.y0),
                    height: rect_height(r),
                },
                None => {
                    tracing::debug!(?node, "nested scroller not measurable; using window");
                    window
                }
            },
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/context.rs"]
mod tests;
