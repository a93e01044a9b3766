use crate::foundation::core::{NodeRef, Rect, rect_height};
use crate::scroll::context::{ScrollingContext, Viewport};
use crate::scroll::host::LayoutProbe;

/// Marker class carried by the scroll-distance spacer in front of a pinned zoom section.
pub const SPACER_CLASS: &str = "pin-zoom-spacer";

/// Geometry of a pin-zoom section relative to its scrolling context.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PinGeometry {
    /// The zoom section itself.
    pub section: Rect,
    /// The preceding spacer, when present and non-empty.
    pub spacer: Option<Rect>,
    /// Height of the active viewport.
    pub viewport_height: f64,
}

/// Measures nodes relative to one scrolling context.
///
/// `0` always means the top edge of the active viewport, whether that is the window or a nested
/// scroller.
pub struct GeometryResolver<'a, P: LayoutProbe> {
    probe: &'a P,
    viewport: Viewport,
}

impl<'a, P: LayoutProbe> GeometryResolver<'a, P> {
    /// Capture the current viewport of `ctx`.
    pub fn new(probe: &'a P, ctx: ScrollingContext) -> Self {
        let viewport = ctx.viewport(probe);
        Self { probe, viewport }
    }

    /// Height of the active viewport.
    pub fn viewport_height(&self) -> f64 {
        self.viewport.height
    }

    /// Rect of `node`, corrected by the scroller's own offset.
    pub fn rect(&self, node: NodeRef) -> Option<Rect> {
        let r = self.probe.client_rect(node)?;
        let o = self.viewport.origin;
        Some(Rect::new(r.x0 - o.x, r.y0 - o.y, r.x1 - o.x, r.y1 - o.y))
    }

    /// Section plus optional spacer. A spacer that cannot be measured or has no height drops
    /// the section to single-phase measurement.
    pub fn pin(&self, section: NodeRef, spacer: Option<NodeRef>) -> Option<PinGeometry> {
        let section = self.rect(section)?;
        let spacer = spacer
            .and_then(|s| self.rect(s))
            .filter(|r| rect_height(*r) > 0.0);
        Some(PinGeometry {
            section,
            spacer,
            viewport_height: self.viewport.height,
        })
    }

    /// Rects of a list of nodes; unmeasurable nodes yield `None` in place.
    pub fn rects(&self, nodes: &[NodeRef]) -> Vec<Option<Rect>> {
        nodes.iter().map(|&n| self.rect(n)).collect()
    }
}

/// Find the spacer immediately preceding `section`, identified by [`SPACER_CLASS`].
pub fn find_spacer(probe: &impl LayoutProbe, section: NodeRef) -> Option<NodeRef> {
    probe
        .previous_sibling(section)
        .filter(|&prev| probe.has_class(prev, SPACER_CLASS))
}

#[cfg(test)]
#[path = "../../tests/unit/scroll/geometry.rs"]
mod tests;
