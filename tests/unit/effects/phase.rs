use super::*;

fn sweep() -> impl Iterator<Item = f64> {
    (0..=1000).map(|i| f64::from(i) / 1000.0)
}

#[test]
fn opacities_stay_in_unit_range() {
    for (fi, fo) in [(0.18, 0.18), (0.0, 0.0), (0.5, 0.5), (0.0, 1.0), (1.0, 0.0)] {
        for p in sweep() {
            let o = fade_opacity(p, fi, fo);
            assert!((0.0..=1.0).contains(&o), "fade {fi}/{fo} at {p}: {o}");
        }
    }
    for (a, b) in [(0.35, 0.8), (0.5, 0.5), (0.0, 1.0)] {
        for p in sweep() {
            let f = panel_frame(p, a, b);
            assert!((0.0..=1.0).contains(&f.opacity));
            assert!((0.0..=PANEL_RISE_PX).contains(&f.offset_y));
        }
    }
}

#[test]
fn opacity_phases() {
    assert_eq!(fade_opacity(0.0, 0.18, 0.18), 0.0);
    assert!(fade_opacity(0.09, 0.18, 0.18) > 0.5);
    assert_eq!(fade_opacity(0.5, 0.18, 0.18), 1.0);
    assert!(fade_opacity(0.95, 0.18, 0.18) < 0.5);
    assert!(fade_opacity(1.0, 0.18, 0.18).abs() < 1e-12);
}

#[test]
fn scale_is_monotonic_and_peaks_at_hold_end() {
    let mut prev = zoom_scale(0.18, 0.18, 0.18, 2.6);
    assert!((prev - 1.0).abs() < 1e-12);
    for i in 0..=640 {
        let p = 0.18 + f64::from(i) / 1000.0;
        let s = zoom_scale(p, 0.18, 0.18, 2.6);
        assert!(s + 1e-12 >= prev, "scale fell at {p}");
        prev = s;
    }
    assert!((zoom_scale(0.82, 0.18, 0.18, 2.6) - 2.6).abs() < 1e-9);
    assert!(zoom_scale(0.81, 0.18, 0.18, 2.6) < 2.6 - 1e-6);
    assert!((zoom_scale(0.95, 0.18, 0.18, 2.6) - 2.6).abs() < 1e-12);
    assert_eq!(zoom_scale(0.05, 0.18, 0.18, 2.6), 1.0);
}

#[test]
fn panel_timing_is_independent() {
    let before = panel_frame(0.2, 0.35, 0.8);
    assert_eq!(before.opacity, 0.0);
    assert_eq!(before.offset_y, PANEL_RISE_PX);

    let settled = panel_frame(0.6, 0.35, 0.8);
    assert_eq!(settled.opacity, 1.0);
    assert_eq!(settled.offset_y, 0.0);

    let leaving = panel_frame(0.78, 0.35, 0.8);
    assert!(leaving.opacity > 0.0 && leaving.opacity < 1.0);
    assert_eq!(panel_frame(0.8, 0.35, 0.8).opacity, 0.0);
}

#[test]
fn zero_width_windows_produce_no_nan() {
    for p in sweep() {
        assert!(fade_opacity(p, 0.0, 0.0).is_finite());
        assert!(zoom_scale(p, 0.5, 0.5, 2.0).is_finite());
        let f = panel_frame(p, 0.4, 0.4);
        assert!(f.opacity.is_finite() && f.offset_y.is_finite());
    }
}

#[test]
fn synthesize_hidden_and_pinned() {
    let params = PinZoomParams::default();
    let hidden = synthesize_pin(PinProgress::HIDDEN, &params);
    assert!(!hidden.visible);
    assert_eq!(hidden.opacity, 0.0);

    let pinned = synthesize_pin(
        PinProgress {
            phase: PinPhase::Pinned,
            progress: 0.5,
        },
        &params,
    );
    assert!(pinned.visible);
    assert_eq!(pinned.opacity, 1.0);
    assert!(pinned.scale > 1.0 && pinned.scale < 2.6);
    assert_eq!((pinned.origin_x, pinned.origin_y), (50.0, 50.0));
}
