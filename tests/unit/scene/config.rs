use super::*;

#[test]
fn range_from_measure_and_inversion() {
    let r = ScrollRange::from_measure(1000.0, 600.0, -200.0, 100.0);
    assert_eq!(r, ScrollRange { start: 800.0, end: 1700.0 });
    assert!(r.contains(800.0));
    assert!(!r.contains(1700.0));

    let inverted = ScrollRange::new(50.0, 10.0);
    assert!(inverted.is_empty());
    assert_eq!(inverted.len(), 0.0);
}

#[test]
fn placement_honors_scale_and_anchor() {
    let canvas = Rect::new(0.0, 0.0, 1000.0, 500.0);
    let mut t = SceneTuning {
        target_scale: 0.5,
        ..SceneTuning::default()
    };
    assert_eq!(t.placement(canvas), Rect::new(250.0, 125.0, 750.0, 375.0));

    t.target_anchor = Anchor::BottomRight;
    assert_eq!(t.placement(canvas), Rect::new(500.0, 250.0, 1000.0, 500.0));

    t.target_anchor = Anchor::TopLeft;
    assert_eq!(t.placement(canvas), Rect::new(0.0, 0.0, 500.0, 250.0));
}

#[test]
fn home_ease_respects_morph_speed() {
    let t = SceneTuning {
        home_snap_ms: 400.0,
        morph_speed_mult: 2.0,
        ..SceneTuning::default()
    };
    assert_eq!(t.home_ease_ms(), 200.0);
    let zero = SceneTuning {
        morph_speed_mult: 0.0,
        ..t
    };
    assert_eq!(zero.home_ease_ms(), 400.0);
}

#[test]
fn scene_config_json_defaults_tuning() {
    let cfg: SceneConfig = serde_json::from_str(
        r#"{
            "id": "hero",
            "range": {"start": 0, "end": 900},
            "provider": {"kind": "scatter"},
            "tuning": {"snap_on_enter": true, "target_anchor": "top_right"}
        }"#,
    )
    .unwrap();
    assert_eq!(cfg.id.as_str(), "hero");
    assert_eq!(cfg.order, 0);
    assert!(cfg.tuning.snap_on_enter);
    assert_eq!(cfg.tuning.target_anchor, Anchor::TopRight);
    assert_eq!(cfg.tuning.stiffness_mult, 1.0);
    assert_eq!(cfg.tuning.sway_style, SwayStyle::TargetOffset);
}
