use motion_core::{
    ease, neighbor_keyframes, parse_project_json, sample_background_color, sample_layer,
    sample_motion_path, BackgroundKeyframe, Document, Easing, Keyframe, Layer, LayerProperties,
    NoImages, Rgb,
};
use serde::Deserialize;

fn approx(a: f64, b: f64, eps: f64) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn approx_props(a: &LayerProperties, b: &LayerProperties, eps: f64) {
    approx(a.x, b.x, eps);
    approx(a.y, b.y, eps);
    approx(a.scale_x, b.scale_x, eps);
    approx(a.scale_y, b.scale_y, eps);
    approx(a.rotation, b.rotation, eps);
    assert_eq!(a.visible, b.visible);
}

fn mk_kf(time: f64, x: f64, easing: Easing) -> Keyframe {
    Keyframe {
        time,
        x,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
        visible: true,
        easing,
    }
}

fn mk_layer(keyframes: Vec<Keyframe>) -> Layer {
    let mut layer = Layer::new("Test", "test.png", None, 0.0, 0.0);
    layer.keyframes = keyframes;
    layer
}

fn mk_bg(time: f64, color: &str) -> BackgroundKeyframe {
    BackgroundKeyframe {
        time,
        color: color.to_string(),
    }
}

#[test]
fn linear_midpoint() {
    let layer = mk_layer(vec![
        mk_kf(0.0, 0.0, Easing::Linear),
        mk_kf(1000.0, 100.0, Easing::Linear),
    ]);
    let p = sample_layer(&layer, 500.0, false).expect("keyframes present");
    approx(p.x, 50.0, 1e-9);
}

#[test]
fn ease_in_quad_uses_left_keyframe_easing() {
    let layer = mk_layer(vec![
        mk_kf(0.0, 0.0, Easing::EaseInQuad),
        mk_kf(1000.0, 100.0, Easing::Linear),
    ]);
    let p = sample_layer(&layer, 500.0, false).unwrap();
    approx(p.x, 25.0, 1e-9);

    // The right keyframe's easing is irrelevant to this segment.
    let layer = mk_layer(vec![
        mk_kf(0.0, 0.0, Easing::Linear),
        mk_kf(1000.0, 100.0, Easing::EaseInQuad),
    ]);
    approx(sample_layer(&layer, 500.0, false).unwrap().x, 50.0, 1e-9);
}

#[test]
fn empty_layer_has_nothing_to_draw() {
    let layer = mk_layer(Vec::new());
    assert!(sample_layer(&layer, 0.0, false).is_none());
    assert!(sample_layer(&layer, 0.0, true).is_none());
}

#[test]
fn single_keyframe_holds_everywhere() {
    let k = mk_kf(2000.0, 42.0, Easing::EaseOutElastic);
    let layer = mk_layer(vec![k]);
    for t in [-100.0, 0.0, 2000.0, 99_999.0] {
        assert_eq!(sample_layer(&layer, t, false), Some(k.properties()));
        assert_eq!(sample_layer(&layer, t, true), Some(k.properties()));
    }
}

#[test]
fn keyframe_times_reproduce_keyframes() {
    let mut keys = Vec::new();
    for (i, e) in Easing::ALL.iter().enumerate() {
        let mut k = mk_kf(i as f64 * 500.0, (i * 7) as f64, *e);
        k.rotation = (i * 33) as f64;
        k.scale_y = 1.0 + i as f64 * 0.05;
        k.visible = i % 2 == 0;
        keys.push(k);
    }
    let layer = mk_layer(keys.clone());
    for k in &keys {
        assert_eq!(sample_layer(&layer, k.time, false), Some(k.properties()));
        approx_props(
            &sample_layer(&layer, k.time, true).unwrap(),
            &k.properties(),
            1e-9,
        );
    }
}

#[test]
fn clamps_outside_keyframe_range() {
    let layer = mk_layer(vec![
        mk_kf(1000.0, 10.0, Easing::Linear),
        mk_kf(2000.0, 20.0, Easing::Linear),
    ]);
    assert_eq!(sample_layer(&layer, 0.0, true).unwrap().x, 10.0);
    assert_eq!(sample_layer(&layer, 5000.0, true).unwrap().x, 20.0);
}

#[test]
fn smooth_playback_disables_snapping() {
    let layer = mk_layer(vec![
        mk_kf(0.0, 0.0, Easing::Linear),
        mk_kf(1000.0, 100.0, Easing::Linear),
    ]);
    assert_eq!(sample_layer(&layer, 60.0, false).unwrap().x, 0.0);
    approx(sample_layer(&layer, 60.0, true).unwrap().x, 6.0, 1e-9);
}

#[test]
fn overshooting_easing_is_not_clamped() {
    let layer = mk_layer(vec![
        mk_kf(0.0, 0.0, Easing::EaseOutBack),
        mk_kf(1000.0, 100.0, Easing::Linear),
    ]);
    assert!(sample_layer(&layer, 800.0, true).unwrap().x > 100.0);
}

#[test]
fn rotation_is_not_wrapped() {
    let mut a = mk_kf(0.0, 0.0, Easing::Linear);
    a.rotation = 350.0;
    let mut b = mk_kf(1000.0, 0.0, Easing::Linear);
    b.rotation = 10.0;
    let layer = mk_layer(vec![a, b]);
    approx(sample_layer(&layer, 500.0, true).unwrap().rotation, 180.0, 1e-9);
}

#[test]
fn background_midpoint_is_mid_gray() {
    let mut doc = Document::default();
    doc.background_keyframes = vec![mk_bg(0.0, "#000000"), mk_bg(1000.0, "#ffffff")];
    let c = sample_background_color(&doc, 500.0);
    for ch in [c.r, c.g, c.b] {
        assert!((0x7e..=0x80).contains(&ch), "channel {ch:#x}");
    }
}

#[test]
fn background_with_zero_or_one_keyframe() {
    let mut doc = Document::default();
    doc.settings.background_color = "#112233".into();
    assert_eq!(sample_background_color(&doc, 123.0), Rgb::new(0x11, 0x22, 0x33));

    doc.background_keyframes = vec![mk_bg(4000.0, "#aabbcc")];
    assert_eq!(sample_background_color(&doc, 0.0), Rgb::new(0xaa, 0xbb, 0xcc));
    assert_eq!(sample_background_color(&doc, 9000.0), Rgb::new(0xaa, 0xbb, 0xcc));
}

#[test]
fn background_has_no_snapping() {
    let mut doc = Document::default();
    doc.background_keyframes = vec![mk_bg(0.0, "#000000"), mk_bg(1000.0, "#ff0000")];
    // 50 ms from the first keyframe still blends.
    let c = sample_background_color(&doc, 50.0);
    assert_eq!(c.r, 13);
}

#[test]
fn ease_linear_is_identity() {
    for i in 0..=100 {
        let p = i as f64 / 100.0;
        assert_eq!(ease("linear", p), p);
        assert_eq!(ease("definitelyNotAnEasing", p), p);
    }
}

#[test]
fn onion_skin_neighbors_are_strict() {
    let layer = mk_layer(vec![
        mk_kf(0.0, 0.0, Easing::Linear),
        mk_kf(1000.0, 1.0, Easing::Linear),
        mk_kf(2000.0, 2.0, Easing::Linear),
    ]);
    let (before, after) = neighbor_keyframes(&layer, 1000.0);
    assert_eq!(before.map(|k| k.time), Some(0.0));
    assert_eq!(after.map(|k| k.time), Some(2000.0));

    let (before, after) = neighbor_keyframes(&layer, 0.0);
    assert!(before.is_none());
    assert_eq!(after.map(|k| k.time), Some(1000.0));

    let (before, after) = neighbor_keyframes(&layer, 2500.0);
    assert_eq!(before.map(|k| k.time), Some(2000.0));
    assert!(after.is_none());
}

#[test]
fn motion_path_spans_first_to_last() {
    let layer = mk_layer(vec![
        mk_kf(0.0, 0.0, Easing::Linear),
        mk_kf(1000.0, 100.0, Easing::Linear),
    ]);
    let xs: Vec<f64> = sample_motion_path(&layer, 4, false)
        .into_iter()
        .map(|(x, _)| x)
        .collect();
    assert_eq!(xs.len(), 5);
    for (got, want) in xs.iter().zip([0.0, 25.0, 50.0, 75.0, 100.0]) {
        approx(*got, want, 1e-9);
    }

    let single = mk_layer(vec![mk_kf(0.0, 0.0, Easing::Linear)]);
    assert!(sample_motion_path(&single, 50, false).is_empty());
}

#[derive(Debug, Deserialize)]
struct ExpectedSample {
    layer: usize,
    time: f64,
    #[serde(flatten)]
    props: LayerProperties,
}

#[test]
fn bouncing_ball_matches_expected_samples() {
    let json = motion_test_fixtures::samples::project_json("bouncing-ball")
        .expect("load bouncing-ball project");
    let expected: Vec<ExpectedSample> = motion_test_fixtures::samples::expected("bouncing-ball")
        .expect("load bouncing-ball expectations");
    let doc = parse_project_json(&json, &NoImages).expect("parse project");

    assert!(!expected.is_empty());
    for e in &expected {
        let got = sample_layer(&doc.layers[e.layer], e.time, doc.smooth_playback)
            .expect("layer has keyframes");
        approx_props(&got, &e.props, 1e-9);
    }

    let bg = sample_background_color(&doc, 500.0);
    assert!((127..=128).contains(&bg.r));
}
