use super::*;
use crate::effects::params::{CinematicParams, PinZoomParams, WipeParams};
use crate::effects::render::RevealPhase;
use crate::foundation::core::{NodeRef, Rect};
use crate::runtime::section::{CinematicNodes, PinZoomNodes, WipeNodes};
use crate::scroll::host::{ListenerId, OverflowStyle};
use crate::sim::Page;

/// Wraps a [`Page`] and records every registration call.
struct CountingHost {
    page: Page,
    added: usize,
    removed: usize,
    frames: usize,
    observed: Vec<ObserveOptions>,
    unobserved: usize,
}

impl CountingHost {
    fn new(page: Page) -> Self {
        Self {
            page,
            added: 0,
            removed: 0,
            frames: 0,
            observed: Vec::new(),
            unobserved: 0,
        }
    }
}

impl LayoutProbe for CountingHost {
    fn window_height(&self) -> f64 {
        self.page.window_height()
    }
    fn client_rect(&self, node: NodeRef) -> Option<Rect> {
        self.page.client_rect(node)
    }
    fn overflow(&self, node: NodeRef) -> OverflowStyle {
        self.page.overflow(node)
    }
    fn previous_sibling(&self, node: NodeRef) -> Option<NodeRef> {
        self.page.previous_sibling(node)
    }
    fn has_class(&self, node: NodeRef, class: &str) -> bool {
        self.page.has_class(node, class)
    }
}

impl EventHost for CountingHost {
    fn add_listener(
        &mut self,
        target: ListenTarget,
        event: HostEvent,
        section: SectionId,
    ) -> ListenerId {
        self.added += 1;
        self.page.add_listener(target, event, section)
    }
    fn remove_listener(&mut self, id: ListenerId) {
        self.removed += 1;
        self.page.remove_listener(id);
    }
    fn request_frame(&mut self, section: SectionId) {
        self.frames += 1;
        self.page.request_frame(section);
    }
    fn observe(&mut self, node: NodeRef, opts: ObserveOptions, section: SectionId) -> ListenerId {
        self.observed.push(opts);
        self.page.observe(node, opts, section)
    }
    fn unobserve(&mut self, id: ListenerId) {
        self.unobserved += 1;
        self.page.unobserve(id);
    }
}

fn pin_spec(page: &mut Page, id: u64) -> SectionSpec {
    page.push_block(1000.0, &["pin-zoom-spacer"]);
    let section = page.push_block(800.0, &[]);
    SectionSpec {
        id: SectionId(id),
        root: page.root(),
        effect: Effect::PinZoom {
            nodes: PinZoomNodes {
                section,
                media: None,
                panel: None,
            },
            params: PinZoomParams::default(),
        },
    }
}

#[test]
fn binding_twice_registers_once() {
    let mut page = Page::window(1280.0, 800.0);
    let spec = pin_spec(&mut page, 1);
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();

    assert!(matches!(
        rt.bind(&mut host, spec.clone()).unwrap(),
        BindOutcome::Bound(_)
    ));
    assert_eq!(
        rt.bind(&mut host, spec).unwrap(),
        BindOutcome::AlreadyBound
    );
    assert_eq!(host.added, 2);
    assert_eq!(rt.len(), 1);
    assert!(rt.section(SectionId(1)).unwrap().spacer().is_some());
}

#[test]
fn dispose_removes_listeners_and_retires_id() {
    let mut page = Page::window(1280.0, 800.0);
    let spec = pin_spec(&mut page, 7);
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    rt.bind(&mut host, spec.clone()).unwrap();

    rt.dispose(&mut host, SectionId(7)).unwrap();
    assert_eq!(host.removed, 2);
    assert_eq!(host.page.listener_count(), 0);
    assert!(!rt.is_bound(SectionId(7)));
    assert!(rt.is_empty());

    let err = rt.bind(&mut host, spec).unwrap_err();
    assert!(matches!(err, ScrollyError::Binding(_)));
    assert!(rt.dispose(&mut host, SectionId(7)).is_err());

    // late callbacks after dispose are ignored
    assert!(
        rt.on_event(&mut host, SectionId(7), HostEvent::Scroll)
            .is_none()
    );
    assert!(rt.on_frame(&host, SectionId(7)).is_none());
}

#[test]
fn scroll_burst_coalesces_into_one_frame() {
    let mut page = Page::window(1280.0, 800.0);
    let spec = pin_spec(&mut page, 1);
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    rt.bind(&mut host, spec).unwrap();

    host.page.scroll_to(900.0);
    for _ in 0..5 {
        assert!(
            rt.on_event(&mut host, SectionId(1), HostEvent::Scroll)
                .is_none()
        );
    }
    assert_eq!(host.frames, 1);

    let update = rt.on_frame(&host, SectionId(1)).unwrap();
    assert_eq!(update.section, SectionId(1));
    assert!(rt.on_frame(&host, SectionId(1)).is_none());

    let stats = rt.stats(SectionId(1)).unwrap();
    assert_eq!(stats.events, 5);
    assert_eq!(stats.coalesced, 4);
    assert_eq!(stats.recomputes, 1);
}

#[test]
fn resize_recomputes_immediately() {
    let mut page = Page::window(1280.0, 800.0);
    let spec = pin_spec(&mut page, 1);
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    rt.bind(&mut host, spec).unwrap();

    host.page.scroll_to(900.0);
    host.page.resize(700.0);
    let update = rt.on_event(&mut host, SectionId(1), HostEvent::Resize);
    assert!(update.is_some());
    assert_eq!(host.frames, 0);
}

#[test]
fn cinematic_slide_count_is_capped_by_panels() {
    let mut page = Page::window(1280.0, 800.0);
    let section = page.push_block(2400.0, &[]);
    let panels: Vec<NodeRef> = (0..3)
        .map(|i| page.push_child(section, 800.0 * f64::from(i), 400.0))
        .collect();
    let spec = SectionSpec {
        id: SectionId(3),
        root: None,
        effect: Effect::Cinematic {
            nodes: CinematicNodes {
                section,
                panels,
                media: Vec::new(),
            },
            params: CinematicParams {
                slide_count: 5,
                ..CinematicParams::default()
            },
        },
    };
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    let BindOutcome::Bound(update) = rt.bind(&mut host, spec).unwrap() else {
        panic!("expected a fresh bind");
    };
    let RenderState::Cinematic(c) = update.state else {
        panic!("expected cinematic state");
    };
    assert_eq!(c.slide_count, 3);
    assert_eq!(c.active_slide, 0);
}

#[test]
fn wipe_listens_on_nested_scroller() {
    let mut page = Page::nested(1280.0, 1000.0, 100.0, 800.0);
    let root = page.root().unwrap();
    let region = page.push_block(1600.0, &[]);
    let next = page.push_child(region, 0.0, 800.0);
    let spec = SectionSpec {
        id: SectionId(4),
        root: Some(root),
        effect: Effect::WipePair {
            nodes: WipeNodes {
                region,
                previous: None,
                next,
            },
            params: WipeParams::default(),
        },
    };
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    rt.bind(&mut host, spec).unwrap();

    assert_eq!(
        rt.section(SectionId(4)).unwrap().context(),
        ScrollingContext::Nested(root)
    );
    assert_eq!(
        host.page
            .listeners_for(ListenTarget::Element(root), HostEvent::Scroll),
        vec![SectionId(4)]
    );
    assert_eq!(
        host.page
            .listeners_for(ListenTarget::Window, HostEvent::Resize),
        vec![SectionId(4)]
    );
}

#[test]
fn fade_reveal_observes_then_unobserves() {
    let mut page = Page::nested(1280.0, 1000.0, 0.0, 800.0);
    let root = page.root();
    page.push_block(1200.0, &[]);
    let el = page.push_block(300.0, &[]);
    let spec = SectionSpec {
        id: SectionId(5),
        root,
        effect: Effect::FadeReveal { element: el },
    };
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    rt.bind(&mut host, spec).unwrap();

    assert_eq!(host.added, 0);
    assert_eq!(host.observed.len(), 1);
    assert_eq!(host.observed[0].root, root);
    assert_eq!(host.observed[0].threshold, REVEAL_THRESHOLD);

    // not far enough yet
    host.page.scroll_to(500.0);
    assert!(rt.on_intersection(&mut host, SectionId(5)).is_none());

    host.page.scroll_to(800.0);
    let update = rt.on_intersection(&mut host, SectionId(5)).unwrap();
    let RenderState::FadeReveal(r) = update.state else {
        panic!("expected reveal state");
    };
    assert_eq!(r.phase, RevealPhase::Revealed);
    assert_eq!(host.unobserved, 1);
    assert_eq!(host.page.observer_count(), 0);

    host.page.scroll_to(0.0);
    assert!(rt.on_intersection(&mut host, SectionId(5)).is_none());
}

#[test]
fn on_screen_reveal_never_observes() {
    let mut page = Page::window(1280.0, 800.0);
    let el = page.push_block(300.0, &[]);
    let spec = SectionSpec {
        id: SectionId(6),
        root: None,
        effect: Effect::FadeReveal { element: el },
    };
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    rt.bind(&mut host, spec).unwrap();
    assert!(host.observed.is_empty());

    rt.dispose_all(&mut host);
    assert!(rt.is_empty());
    assert_eq!(host.unobserved, 0);
}

#[test]
fn bind_dispose_cycles_keep_registry_bounded() {
    let mut page = Page::window(1280.0, 800.0);
    let spec = pin_spec(&mut page, 1);
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();

    for id in 1..=10_000 {
        let spec = SectionSpec {
            id: SectionId(id),
            ..spec.clone()
        };
        rt.bind(&mut host, spec).unwrap();
        rt.dispose(&mut host, SectionId(id)).unwrap();
    }
    assert!(rt.sections.is_empty());
    assert_eq!(rt.retired_through(), Some(SectionId(10_000)));
    assert_eq!(host.page.listener_count(), 0);
    assert_eq!(host.added, host.removed);

    for stale in [0, 1, 9_999, 10_000] {
        let spec = SectionSpec {
            id: SectionId(stale),
            ..spec.clone()
        };
        assert!(matches!(
            rt.bind(&mut host, spec).unwrap_err(),
            ScrollyError::Binding(_)
        ));
    }
    let fresh = SectionSpec {
        id: SectionId(10_001),
        ..spec
    };
    assert!(matches!(
        rt.bind(&mut host, fresh).unwrap(),
        BindOutcome::Bound(_)
    ));
}

#[test]
fn dispose_all_retires_through_highest_id() {
    let mut page = Page::window(1280.0, 800.0);
    let low = pin_spec(&mut page, 3);
    let high = pin_spec(&mut page, 9);
    let mut host = CountingHost::new(page);
    let mut rt = ScrollRuntime::new();
    rt.bind(&mut host, low).unwrap();
    rt.bind(&mut host, high).unwrap();

    rt.dispose_all(&mut host);
    assert!(rt.is_empty());
    assert_eq!(host.removed, 4);
    assert_eq!(rt.retired_through(), Some(SectionId(9)));
}
