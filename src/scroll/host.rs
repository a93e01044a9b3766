//! Host seam.
//!
//! The engine never touches a DOM directly. Reads go through [`LayoutProbe`], listener
//! registration goes through [`EventHost`]. A browser adapter implements both against the real
//! document; [`crate::sim::Page`] implements both headlessly.

use crate::foundation::core::{NodeRef, Rect, SectionId};

/// Computed `overflow` keyword of an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Overflow {
    /// `visible`
    Visible,
    /// `hidden`
    Hidden,
    /// `clip`
    Clip,
    /// `scroll`
    Scroll,
    /// `auto`
    Auto,
    /// `overlay` (legacy alias of `auto`)
    Overlay,
}

impl Overflow {
    /// Parse a computed-style keyword. Unknown keywords yield `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "visible" => Some(Self::Visible),
            "hidden" => Some(Self::Hidden),
            "clip" => Some(Self::Clip),
            "scroll" => Some(Self::Scroll),
            "auto" => Some(Self::Auto),
            "overlay" => Some(Self::Overlay),
            _ => None,
        }
    }

    /// Whether this keyword makes the element a user-scrollable box.
    pub fn is_scrollable(self) -> bool {
        matches!(self, Self::Scroll | Self::Auto | Self::Overlay)
    }
}

/// Computed overflow of an element, as reported by the host.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct OverflowStyle {
    /// Shorthand `overflow` value.
    pub overflow: Option<Overflow>,
    /// Longhand `overflow-y` value; wins over the shorthand when set.
    pub overflow_y: Option<Overflow>,
}

impl OverflowStyle {
    /// Effective vertical overflow.
    pub fn vertical(self) -> Option<Overflow> {
        self.overflow_y.or(self.overflow)
    }
}

/// Read-only view of host layout.
pub trait LayoutProbe {
    /// Inner height of the top-level window, in CSS pixels.
    fn window_height(&self) -> f64;

    /// Bounding client rect of `node`, relative to the top-level window viewport.
    ///
    /// Returns `None` when the node is detached or unknown.
    fn client_rect(&self, node: NodeRef) -> Option<Rect>;

    /// Computed overflow of `node`.
    fn overflow(&self, node: NodeRef) -> OverflowStyle;

    /// Previous element sibling of `node`, if any.
    fn previous_sibling(&self, node: NodeRef) -> Option<NodeRef>;

    /// Whether `node` carries the class `class`.
    fn has_class(&self, node: NodeRef, class: &str) -> bool;
}

/// Handle of a registered listener or observer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct ListenerId(pub u64);

/// Where a listener is attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum ListenTarget {
    /// The top-level window.
    Window,
    /// A specific element (a nested scroller).
    Element(NodeRef),
}

/// Native events the engine listens to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize)]
pub enum HostEvent {
    /// `scroll`
    Scroll,
    /// `resize`
    Resize,
}

/// Intersection observer options.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
pub struct ObserveOptions {
    /// Observer root; `None` observes against the window viewport.
    pub root: Option<NodeRef>,
    /// Visibility ratio that fires the callback.
    pub threshold: f64,
    /// Fraction of the root height trimmed from the bottom edge.
    pub bottom_margin_frac: f64,
}

/// Listener registration surface of the host.
///
/// Every callback the host later delivers carries the [`SectionId`] it was registered for.
pub trait EventHost {
    /// Register a `scroll`/`resize` listener.
    fn add_listener(
        &mut self,
        target: ListenTarget,
        event: HostEvent,
        section: SectionId,
    ) -> ListenerId;

    /// Remove a listener previously returned by [`EventHost::add_listener`].
    fn remove_listener(&mut self, id: ListenerId);

    /// Ask for one animation-frame callback for `section`.
    fn request_frame(&mut self, section: SectionId);

    /// Start intersection-observing `node`.
    fn observe(&mut self, node: NodeRef, opts: ObserveOptions, section: SectionId) -> ListenerId;

    /// Stop an observer previously returned by [`EventHost::observe`].
    fn unobserve(&mut self, id: ListenerId);
}

/// Anything that can both measure and register listeners.
pub trait ScrollHost: LayoutProbe + EventHost {}

impl<T: LayoutProbe + EventHost> ScrollHost for T {}
