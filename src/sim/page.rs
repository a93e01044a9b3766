use std::collections::BTreeMap;

use crate::foundation::core::{NodeRef, Rect, SectionId};
use crate::scroll::host::{
    EventHost, HostEvent, LayoutProbe, ListenTarget, ListenerId, ObserveOptions, Overflow,
    OverflowStyle,
};

#[derive(Clone, Debug)]
struct PageNode {
    /// Document-space rect (scroller: window-space rect).
    rect: Rect,
    classes: Vec<String>,
    prev: Option<NodeRef>,
    overflow: OverflowStyle,
    attached: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Listener {
    target: ListenTarget,
    event: HostEvent,
    section: SectionId,
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct Observer {
    node: NodeRef,
    section: SectionId,
}

/// Headless page: a vertical stack of blocks scrolled either by the window or by one nested
/// scroller, plus a recording listener registry.
///
/// Implements [`LayoutProbe`] and [`EventHost`] so the runtime can be driven without a browser.
#[derive(Clone, Debug)]
pub struct Page {
    width: f64,
    window_height: f64,
    scroller: Option<NodeRef>,
    nodes: Vec<PageNode>,
    last_block: Option<NodeRef>,
    flow_bottom: f64,
    scroll_y: f64,
    next_listener: u64,
    listeners: BTreeMap<ListenerId, Listener>,
    observers: BTreeMap<ListenerId, Observer>,
    frames: Vec<SectionId>,
}

impl Page {
    /// A page scrolled by the top-level window.
    pub fn window(width: f64, height: f64) -> Self {
        Self {
            width,
            window_height: height,
            scroller: None,
            nodes: Vec::new(),
            last_block: None,
            flow_bottom: 0.0,
            scroll_y: 0.0,
            next_listener: 1,
            listeners: BTreeMap::new(),
            observers: BTreeMap::new(),
            frames: Vec::new(),
        }
    }

    /// A page whose blocks live inside a scrollable container placed at `top` in the window.
    pub fn nested(width: f64, window_height: f64, top: f64, height: f64) -> Self {
        let mut page = Self::window(width, window_height);
        let node = page.alloc(PageNode {
            rect: Rect::new(0.0, top, width, top + height),
            classes: vec!["preview-scroller".to_string()],
            prev: None,
            overflow: OverflowStyle {
                overflow: Some(Overflow::Hidden),
                overflow_y: Some(Overflow::Auto),
            },
            attached: true,
        });
        page.scroller = Some(node);
        page
    }

    fn alloc(&mut self, node: PageNode) -> NodeRef {
        self.nodes.push(node);
        NodeRef(self.nodes.len() as u64 - 1)
    }

    /// Root passed to the runtime for context detection.
    pub fn root(&self) -> Option<NodeRef> {
        self.scroller
    }

    /// Append a block of `height` pixels to the document flow.
    pub fn push_block(&mut self, height: f64, classes: &[&str]) -> NodeRef {
        let top = self.flow_bottom;
        let node = self.alloc(PageNode {
            rect: Rect::new(0.0, top, self.width, top + height.max(0.0)),
            classes: classes.iter().map(|c| (*c).to_string()).collect(),
            prev: self.last_block,
            overflow: OverflowStyle::default(),
            attached: true,
        });
        self.flow_bottom = top + height.max(0.0);
        self.last_block = Some(node);
        node
    }

    /// Add a child element positioned `offset` pixels below the top of `parent`.
    pub fn push_child(&mut self, parent: NodeRef, offset: f64, height: f64) -> NodeRef {
        let top = self
            .nodes
            .get(parent.0 as usize)
            .map(|p| p.rect.y0)
            .unwrap_or(0.0)
            + offset;
        self.alloc(PageNode {
            rect: Rect::new(0.0, top, self.width, top + height.max(0.0)),
            classes: Vec::new(),
            prev: None,
            overflow: OverflowStyle::default(),
            attached: true,
        })
    }

    /// Mark `node` as removed from the document; it stops reporting geometry.
    pub fn detach(&mut self, node: NodeRef) {
        if let Some(n) = self.nodes.get_mut(node.0 as usize) {
            n.attached = false;
        }
    }

    /// Set the scroll offset of the active scrolling box.
    pub fn scroll_to(&mut self, y: f64) {
        self.scroll_y = y;
    }

    /// Current scroll offset.
    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    /// Resize the window (and the nested scroller, keeping its top edge).
    pub fn resize(&mut self, window_height: f64) {
        let delta = window_height - self.window_height;
        self.window_height = window_height;
        if let Some(s) = self.scroller
            && let Some(n) = self.nodes.get_mut(s.0 as usize)
        {
            n.rect.y1 = (n.rect.y1 + delta).max(n.rect.y0);
        }
    }

    /// Total height of the document flow.
    pub fn document_height(&self) -> f64 {
        self.flow_bottom
    }

    /// Number of live `scroll`/`resize` listeners.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Number of live intersection observers.
    pub fn observer_count(&self) -> usize {
        self.observers.len()
    }

    /// Sections listening for `event` on `target`, in registration order.
    pub fn listeners_for(&self, target: ListenTarget, event: HostEvent) -> Vec<SectionId> {
        self.listeners
            .values()
            .filter(|l| l.target == target && l.event == event)
            .map(|l| l.section)
            .collect()
    }

    /// Sections listening for `event` on any target.
    pub fn listeners_of(&self, event: HostEvent) -> Vec<SectionId> {
        self.listeners
            .values()
            .filter(|l| l.event == event)
            .map(|l| l.section)
            .collect()
    }

    /// Sections whose observed element currently intersects its viewport.
    pub fn intersecting_observers(&self) -> Vec<SectionId> {
        let vh = self.viewport_height();
        self.observers
            .values()
            .filter(|o| {
                self.client_rect(o.node).is_some_and(|r| {
                    let top = r.y0 - self.viewport_top();
                    let bottom = r.y1 - self.viewport_top();
                    top < vh && bottom > 0.0
                })
            })
            .map(|o| o.section)
            .collect()
    }

    /// Drain pending animation-frame requests.
    pub fn take_frames(&mut self) -> Vec<SectionId> {
        std::mem::take(&mut self.frames)
    }

    fn viewport_top(&self) -> f64 {
        self.scroller
            .and_then(|s| self.nodes.get(s.0 as usize))
            .map(|n| n.rect.y0)
            .unwrap_or(0.0)
    }

    fn viewport_height(&self) -> f64 {
        self.scroller
            .and_then(|s| self.nodes.get(s.0 as usize))
            .map(|n| n.rect.y1 - n.rect.y0)
            .unwrap_or(self.window_height)
    }

    fn next_id(&mut self) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;
        id
    }
}

impl LayoutProbe for Page {
    fn window_height(&self) -> f64 {
        self.window_height
    }

    fn client_rect(&self, node: NodeRef) -> Option<Rect> {
        let n = self.nodes.get(node.0 as usize)?;
        if !n.attached {
            return None;
        }
        if Some(node) == self.scroller {
            return Some(n.rect);
        }
        let dy = self.viewport_top() - self.scroll_y;
        Some(Rect::new(n.rect.x0, n.rect.y0 + dy, n.rect.x1, n.rect.y1 + dy))
    }

    fn overflow(&self, node: NodeRef) -> OverflowStyle {
        self.nodes
            .get(node.0 as usize)
            .map(|n| n.overflow)
            .unwrap_or_default()
    }

    fn previous_sibling(&self, node: NodeRef) -> Option<NodeRef> {
        self.nodes.get(node.0 as usize)?.prev
    }

    fn has_class(&self, node: NodeRef, class: &str) -> bool {
        self.nodes
            .get(node.0 as usize)
            .is_some_and(|n| n.classes.iter().any(|c| c == class))
    }
}

impl EventHost for Page {
    fn add_listener(
        &mut self,
        target: ListenTarget,
        event: HostEvent,
        section: SectionId,
    ) -> ListenerId {
        let id = self.next_id();
        self.listeners.insert(
            id,
            Listener {
                target,
                event,
                section,
            },
        );
        id
    }

    fn remove_listener(&mut self, id: ListenerId) {
        self.listeners.remove(&id);
    }

    fn request_frame(&mut self, section: SectionId) {
        self.frames.push(section);
    }

    fn observe(&mut self, node: NodeRef, _opts: ObserveOptions, section: SectionId) -> ListenerId {
        let id = self.next_id();
        self.observers.insert(id, Observer { node, section });
        id
    }

    fn unobserve(&mut self, id: ListenerId) {
        self.observers.remove(&id);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/sim/page.rs"]
mod tests;
