use super::*;

fn pin_zoom_json(context: &str) -> String {
    format!(
        r#"{{
            "viewport": {{ "width": 1280, "height": 800 }},
            "context": {context},
            "blocks": [
                {{ "id": "intro", "height": 600 }},
                {{ "id": "spacer", "height": 1000, "classes": ["pin-zoom-spacer"] }},
                {{ "id": "zoom", "height": 800, "children": [
                    {{ "id": "photo", "top": 0, "height": 800 }},
                    {{ "id": "panel", "top": 500, "height": 200 }}
                ] }},
                {{ "id": "outro", "height": 1200 }}
            ],
            "sections": [
                {{ "name": "zoom", "block": "zoom",
                   "effect": {{ "type": "pin_zoom", "media": "photo", "panel": "panel" }} }}
            ],
            "sweep": {{ "from": 0, "to": 3000, "step": 10 }}
        }}"#
    )
}

fn parse(json: &str) -> Scenario {
    Scenario::from_reader(json.as_bytes()).unwrap()
}

#[test]
fn pin_zoom_sweep_engages_after_delay() {
    let scenario = parse(&pin_zoom_json(r#"{ "mode": "window" }"#));
    scenario.validate().unwrap();
    let report = scenario.run().unwrap();

    let first_visible = report
        .for_section("zoom")
        .find(|s| matches!(&s.state, RenderState::PinZoom(p) if p.visible))
        .unwrap();
    // spacer starts at 600; pin engages once 80% of it has scrolled by
    assert_eq!(first_visible.scroll_y, 1400.0);

    for s in report.for_section("zoom") {
        let RenderState::PinZoom(p) = &s.state else {
            panic!("unexpected state kind");
        };
        assert!((0.0..=1.0).contains(&p.opacity));
        assert!((0.0..=1.0).contains(&p.panel_opacity));
        assert!((0.0..=1.0).contains(&p.progress));
    }
}

#[test]
fn scroll_bursts_are_coalesced_per_offset() {
    let report = parse(&pin_zoom_json(r#"{ "mode": "window" }"#))
        .run()
        .unwrap();
    let stats = report.stats["zoom"];
    assert_eq!(stats.events, 900);
    assert_eq!(stats.frames_requested, 300);
    assert_eq!(stats.coalesced, 600);
    assert_eq!(stats.recomputes, 300);
}

#[test]
fn nested_context_produces_the_same_states() {
    let window = parse(&pin_zoom_json(r#"{ "mode": "window" }"#))
        .run()
        .unwrap();
    let nested = parse(&pin_zoom_json(
        r#"{ "mode": "nested", "top": 120, "height": 800 }"#,
    ))
    .run()
    .unwrap();

    let a: Vec<_> = window.samples.iter().map(|s| (s.scroll_y, &s.state)).collect();
    let b: Vec<_> = nested.samples.iter().map(|s| (s.scroll_y, &s.state)).collect();
    assert_eq!(a, b);
}

#[test]
fn bindings_report_context_and_spacer() {
    let scenario = parse(&pin_zoom_json(
        r#"{ "mode": "nested", "top": 0, "height": 700 }"#,
    ));
    let bindings = scenario.bindings().unwrap();
    assert_eq!(bindings.len(), 1);
    assert_eq!(bindings[0].section, "zoom");
    assert_eq!(bindings[0].kind, SectionKind::PinZoom);
    assert!(matches!(bindings[0].context, ScrollingContext::Nested(_)));
    assert!(bindings[0].spacer);
}

#[test]
fn attrs_override_params() {
    let json = r#"{
        "viewport": { "width": 1280, "height": 800 },
        "blocks": [
            { "id": "region", "height": 1600, "children": [
                { "id": "next", "top": 0, "height": 800 }
            ] }
        ],
        "sections": [
            { "name": "wipe", "block": "region",
              "effect": { "type": "wipe_pair", "next": "next",
                          "attrs": { "data-wipe-variant": "fade" } } }
        ],
        "sweep": { "from": 0, "to": 800, "step": 400 }
    }"#;
    let report = parse(json).run().unwrap();
    let last = report.samples.last().unwrap();
    let RenderState::WipePair(w) = &last.state else {
        panic!("expected wipe state");
    };
    assert_eq!(w.progress, 1.0);
    assert_eq!(w.opacity, 1.0);
    assert!(last.patch.value_of(NodeRef(1), "clip-path").is_none());
}

#[test]
fn fade_reveal_fires_once_during_sweep() {
    let json = r#"{
        "viewport": { "width": 1280, "height": 800 },
        "blocks": [
            { "id": "top", "height": 1200 },
            { "id": "quote", "height": 300 },
            { "id": "tail", "height": 1200 }
        ],
        "sections": [
            { "name": "quote", "block": "quote", "effect": { "type": "fade_reveal" } }
        ],
        "sweep": { "from": 0, "to": 1500, "step": 50 }
    }"#;
    let report = parse(json).run().unwrap();
    let states: Vec<_> = report
        .for_section("quote")
        .map(|s| match &s.state {
            RenderState::FadeReveal(r) => r.phase,
            other => panic!("unexpected {other:?}"),
        })
        .collect();
    assert_eq!(
        states,
        vec![
            crate::effects::render::RevealPhase::Pending,
            crate::effects::render::RevealPhase::Revealed,
        ]
    );
}

#[test]
fn resize_recomputes_without_a_frame() {
    let mut def = parse(&pin_zoom_json(r#"{ "mode": "window" }"#)).def().clone();
    def.resizes = vec![ResizeDef {
        at: 1500.0,
        height: 700.0,
    }];
    let report = Scenario::new(def).run().unwrap();
    let stats = report.stats["zoom"];
    assert_eq!(stats.frames_requested, 300);
    assert_eq!(stats.recomputes, 301);
}

#[test]
fn validate_rejects_bad_references_and_sweeps() {
    let mut def = parse(&pin_zoom_json(r#"{ "mode": "window" }"#)).def().clone();
    def.sections[0].effect = EffectDef::PinZoom {
        params: PinZoomParams::default(),
        attrs: BTreeMap::new(),
        media: Some("missing".to_string()),
        panel: None,
    };
    assert!(Scenario::new(def.clone()).validate().is_err());

    let mut bad_step = parse(&pin_zoom_json(r#"{ "mode": "window" }"#)).def().clone();
    bad_step.sweep.step = 0.0;
    assert!(Scenario::new(bad_step).validate().is_err());

    let mut dup = parse(&pin_zoom_json(r#"{ "mode": "window" }"#)).def().clone();
    dup.sections.push(dup.sections[0].clone());
    assert!(Scenario::new(dup).validate().is_err());

    let mut child_block = parse(&pin_zoom_json(r#"{ "mode": "window" }"#)).def().clone();
    child_block.sections[0].block = "photo".to_string();
    assert!(Scenario::new(child_block).validate().is_err());
}

#[test]
fn malformed_json_is_a_serde_error() {
    let err = Scenario::from_reader("{ not json".as_bytes()).unwrap_err();
    assert!(matches!(err, ScrollyError::Serde(_)));
}

#[test]
fn wipe_region_is_sized_from_params() {
    let json = |vh: u32| {
        format!(
            r#"{{
                "viewport": {{ "width": 1280, "height": 800 }},
                "blocks": [
                    {{ "id": "region", "height": 1600, "children": [
                        {{ "id": "next", "top": 0, "height": 800 }}
                    ] }},
                    {{ "id": "after", "height": 800 }}
                ],
                "sections": [
                    {{ "name": "wipe", "block": "region",
                       "effect": {{ "type": "wipe_pair", "next": "next",
                                   "params": {{ "wipe_height_vh": {vh} }} }} }}
                ],
                "sweep": {{ "from": 0, "to": 2400, "step": 400 }}
            }}"#
        )
    };
    let progress = |vh: u32| -> Vec<(f64, f64)> {
        parse(&json(vh))
            .run()
            .unwrap()
            .for_section("wipe")
            .map(|s| match &s.state {
                RenderState::WipePair(w) => (s.scroll_y, w.progress),
                other => panic!("unexpected state {other:?}"),
            })
            .collect()
    };

    let tall = progress(400);
    // 3200px region: 2400px of travel before the release
    assert!(tall.contains(&(1200.0, 0.5)));
    assert!(tall.contains(&(2400.0, 1.0)));
    assert_ne!(tall, progress(100));

    let report = parse(&json(400)).run().unwrap();
    let first = report.for_section("wipe").next().unwrap();
    assert_eq!(first.patch.value_of(NodeRef(0), "height"), Some("400vh"));
}
