use super::*;

fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
        .collect()
}

#[test]
fn pin_zoom_attrs_parse_with_data_prefix_and_percent() {
    let p = PinZoomParams::from_attrs(&attrs(&[
        ("data-scale-end", "3"),
        ("focus-x", "30%"),
        ("activate-at", "0.5"),
    ]));
    assert_eq!(p.scale_end, 3.0);
    assert_eq!(p.focus_x, 30.0);
    assert_eq!(p.focus_y, 50.0);
    assert_eq!(p.activate_at, 0.5);
}

#[test]
fn malformed_attrs_fall_back_to_defaults() {
    let p = PinZoomParams::from_attrs(&attrs(&[
        ("scale-end", "huge"),
        ("fade-in", "NaN"),
        ("focus-y", "250"),
    ]));
    let d = PinZoomParams::default();
    assert_eq!(p.scale_end, d.scale_end);
    assert_eq!(p.fade_in, d.fade_in);
    assert_eq!(p.focus_y, 100.0);
}

#[test]
fn overlapping_fades_share_the_unit_range() {
    let p = PinZoomParams {
        fade_in: 0.8,
        fade_out: 0.8,
        ..PinZoomParams::default()
    }
    .sanitized();
    assert!((p.fade_in + p.fade_out - 1.0).abs() < 1e-12);
    assert!((p.fade_in - 0.5).abs() < 1e-12);
}

#[test]
fn inverted_panel_window_is_reordered() {
    let p = PinZoomParams {
        panel_start: 0.9,
        panel_end: 0.2,
        ..PinZoomParams::default()
    }
    .sanitized();
    assert_eq!((p.panel_start, p.panel_end), (0.2, 0.9));
}

#[test]
fn json_params_fill_missing_fields() {
    let p: PinZoomParams = serde_json::from_str(r#"{ "scale_end": 1.8 }"#).unwrap();
    assert_eq!(p.scale_end, 1.8);
    assert_eq!(p.fade_out, 0.18);

    let w: WipeParams = serde_json::from_str(r#"{ "variant": "fade" }"#).unwrap();
    assert_eq!(w.variant, WipeVariant::Fade);
    assert_eq!(w.wipe_height_vh, 200.0);
}

#[test]
fn wipe_variant_parses_aliases() {
    let params = serde_json::json!({ "dir": "ttb" });
    assert_eq!(
        parse_wipe_kind_params("dissolve", &params).unwrap(),
        (WipeVariant::Fade, WipeDir::TopToBottom)
    );
    assert!(parse_wipe_kind_params("spin", &serde_json::Value::Null).is_err());
    assert!(parse_wipe_kind_params("  ", &serde_json::Value::Null).is_err());
}

#[test]
fn wipe_region_never_shorter_than_viewport() {
    let w = WipeParams::from_attrs(&attrs(&[("wipe-height", "40"), ("wipe-variant", "bogus")]));
    assert_eq!(w.wipe_height_vh, 100.0);
    assert_eq!(w.variant, WipeVariant::Clip);
    assert_eq!(w.region_height_px(800.0), 800.0);
    assert_eq!(WipeParams::default().region_height_px(800.0), 1600.0);
}

#[test]
fn cinematic_attrs() {
    let c = CinematicParams::from_attrs(&attrs(&[("slide-count", "3"), ("scrub", "forward")]));
    assert_eq!(c.slide_count, 3);
    assert_eq!(c.scrub, ScrubPolicy::ForwardOnly);
    assert!(ScrubPolicy::parse("sideways").is_err());
}
