use motion_core::{
    EditorError, EditorSession, GestureKind, HistoryStep, KeyframeValues, LayerProperties,
};

fn mk_values(x: f64) -> KeyframeValues {
    KeyframeValues {
        x,
        y: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        rotation: 0.0,
        visible: true,
        easing: Default::default(),
    }
}

fn props_at(x: f64, y: f64) -> LayerProperties {
    LayerProperties {
        x,
        y,
        ..LayerProperties::identity_at(0.0, 0.0)
    }
}

fn mk_session() -> EditorSession {
    let mut s = EditorSession::default();
    s.add_layer("Ball", "ball.png", None).unwrap();
    s
}

#[test]
fn drag_records_a_single_history_entry() {
    let mut s = mk_session();
    s.seek(1000.0).unwrap();
    let depth = s.history().undo_len();

    s.begin_gesture(GestureKind::Move).unwrap();
    assert_eq!(s.active_gesture_kind(), Some(GestureKind::Move));
    for i in 0..20 {
        s.commit_gesture_tick(props_at(i as f64 * 10.0, 5.0)).unwrap();
    }
    s.end_gesture().unwrap();
    assert!(!s.is_gesture_active());

    assert_eq!(s.history().undo_len(), depth + 1);
    assert_eq!(s.history().undo_label(), Some("Move Layer"));
    let keys = &s.document().layers[0].keyframes;
    assert_eq!(keys.len(), 2);
    assert_eq!((keys[1].time, keys[1].x), (1000.0, 190.0));

    assert_eq!(
        s.undo(),
        HistoryStep::Restored {
            label: "Move Layer".into()
        }
    );
    assert_eq!(s.document().layers[0].keyframes.len(), 1);
}

#[test]
fn gesture_labels_follow_kind() {
    let mut s = mk_session();
    for (kind, label) in [
        (GestureKind::Scale, "Scale Layer"),
        (GestureKind::Rotate, "Rotate Layer"),
    ] {
        s.begin_gesture(kind).unwrap();
        s.commit_gesture_tick(props_at(1.0, 1.0)).unwrap();
        s.end_gesture().unwrap();
        assert_eq!(s.history().undo_label(), Some(label));
    }
}

#[test]
fn gesture_requires_selected_layer() {
    let mut s = mk_session();
    s.clear_selection();
    assert_eq!(
        s.begin_gesture(GestureKind::Rotate),
        Err(EditorError::NoLayerSelected)
    );
    assert_eq!(
        s.commit_gesture_tick(props_at(0.0, 0.0)),
        Err(EditorError::NoActiveGesture)
    );
}

#[test]
fn gesture_ticks_keep_existing_easing() {
    let mut s = mk_session();
    s.add_keyframe(
        0,
        500.0,
        KeyframeValues {
            easing: motion_core::Easing::EaseOutQuart,
            ..mk_values(0.0)
        },
    )
    .unwrap();
    s.seek(530.0).unwrap();
    s.begin_gesture(GestureKind::Move).unwrap();
    let idx = s.commit_gesture_tick(props_at(99.0, 0.0)).unwrap();
    s.end_gesture().unwrap();

    let k = s.document().layers[0].keyframes[idx];
    assert_eq!(k.time, 530.0);
    assert_eq!(k.x, 99.0);
    assert_eq!(k.easing, motion_core::Easing::EaseOutQuart);
}

#[test]
fn keyframe_drag_is_clamped_to_workspace() {
    let mut s = mk_session();
    s.add_keyframe(0, 1000.0, mk_values(1.0)).unwrap();
    let depth = s.history().undo_len();

    s.begin_keyframe_drag(0, 1).unwrap();
    s.drag_keyframe_to(2500.0).unwrap();
    s.drag_keyframe_to(99_999.0).unwrap();
    // Growth waits for the drop.
    assert_eq!(s.workspace_duration(), 5000.0);
    let index = s.end_keyframe_drag().unwrap();

    assert_eq!(s.document().layers[0].keyframes[index].time, 5000.0);
    assert_eq!(s.current_time(), 5000.0);
    assert_eq!(s.workspace_duration(), 10000.0);
    assert_eq!(s.history().undo_len(), depth + 1);
    assert_eq!(s.history().undo_label(), Some("Drag keyframe"));

    s.undo();
    assert_eq!(s.document().layers[0].keyframes[1].time, 1000.0);
    assert_eq!(s.workspace_duration(), 5000.0);
}

#[test]
fn keyframe_drag_reorders_and_selection_follows() {
    let mut s = mk_session();
    s.add_keyframe(0, 1000.0, mk_values(1.0)).unwrap();
    s.add_keyframe(0, 2000.0, mk_values(2.0)).unwrap();

    s.begin_keyframe_drag(0, 0).unwrap();
    assert_eq!(s.drag_keyframe_to(1500.0).unwrap(), 1);
    assert_eq!(s.selection().keyframe, Some(1));
    assert_eq!(s.drag_keyframe_to(-40.0).unwrap(), 0);
    assert_eq!(s.drag_keyframe_to(2600.0).unwrap(), 2);
    s.end_gesture().unwrap();

    let keys = &s.document().layers[0].keyframes;
    let times: Vec<f64> = keys.iter().map(|k| k.time).collect();
    assert_eq!(times, vec![1000.0, 2000.0, 2600.0]);
    assert_eq!(keys[2].x, 400.0);
    assert_eq!(s.selection().keyframe, Some(2));
}

#[test]
fn starting_a_gesture_ends_the_previous_one() {
    let mut s = mk_session();
    s.add_keyframe(0, 1000.0, mk_values(1.0)).unwrap();
    let depth = s.history().undo_len();

    s.begin_keyframe_drag(0, 1).unwrap();
    s.drag_keyframe_to(1800.0).unwrap();
    s.begin_gesture(GestureKind::Move).unwrap();
    assert_eq!(s.active_gesture_kind(), Some(GestureKind::Move));
    assert_eq!(s.current_time(), 1800.0);
    s.end_gesture().unwrap();
    assert_eq!(s.history().undo_len(), depth + 2);
}

#[test]
fn undo_abandons_active_gesture() {
    let mut s = mk_session();
    s.seek(400.0).unwrap();
    s.begin_gesture(GestureKind::Move).unwrap();
    s.commit_gesture_tick(props_at(50.0, 50.0)).unwrap();
    s.undo();
    assert!(!s.is_gesture_active());
    assert_eq!(s.document().layers[0].keyframes.len(), 1);
    assert_eq!(s.end_gesture(), Err(EditorError::NoActiveGesture));
}

#[test]
fn edits_during_a_drag_drop_it_first() {
    let mut s = mk_session();
    s.add_keyframe(0, 1000.0, mk_values(1.0)).unwrap();
    s.begin_keyframe_drag(0, 1).unwrap();

    let removed = s.delete_keyframe_at(0, 1).unwrap();
    assert_eq!(removed.time, 1000.0);
    assert!(!s.is_gesture_active());
    assert_eq!(s.drag_keyframe_to(500.0), Err(EditorError::NoActiveGesture));
    assert_eq!(s.end_keyframe_drag(), Err(EditorError::NoActiveGesture));
    assert_eq!(s.document().layers[0].keyframes.len(), 1);
}

#[test]
fn insert_before_dragged_keyframe_does_not_retarget_it() {
    let mut s = mk_session();
    s.add_keyframe(0, 1000.0, mk_values(1.0)).unwrap();
    s.add_keyframe(0, 2000.0, mk_values(2.0)).unwrap();
    s.begin_keyframe_drag(0, 2).unwrap();
    s.drag_keyframe_to(2500.0).unwrap();

    s.add_keyframe(0, 500.0, mk_values(5.0)).unwrap();
    assert!(!s.is_gesture_active());
    assert!(s.drag_keyframe_to(3000.0).is_err());

    let keys = &s.document().layers[0].keyframes;
    let times: Vec<f64> = keys.iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 500.0, 1000.0, 2500.0]);
    assert_eq!((keys[2].x, keys[3].x), (1.0, 2.0));
}

#[test]
fn deleting_a_lower_layer_ends_the_transform() {
    let mut s = mk_session();
    s.add_layer("Other", "other.png", None).unwrap();
    s.seek(800.0).unwrap();
    s.begin_gesture(GestureKind::Move).unwrap();
    s.commit_gesture_tick(props_at(10.0, 10.0)).unwrap();

    s.delete_layer(0).unwrap();
    assert!(!s.is_gesture_active());
    assert_eq!(
        s.commit_gesture_tick(props_at(20.0, 20.0)),
        Err(EditorError::NoActiveGesture)
    );
    let layer = &s.document().layers[0];
    assert_eq!(layer.name, "Other");
    assert_eq!(layer.keyframes[1].x, 10.0);
}

#[test]
fn drop_removes_every_close_keyframe() {
    let mut s = mk_session();
    s.add_keyframe(0, 1000.0, mk_values(1.0)).unwrap();
    s.add_keyframe(0, 1180.0, mk_values(2.0)).unwrap();
    s.add_keyframe(0, 3000.0, mk_values(3.0)).unwrap();

    s.begin_keyframe_drag(0, 3).unwrap();
    assert_eq!(s.drag_keyframe_to(1090.0).unwrap(), 2);
    let index = s.end_keyframe_drag().unwrap();

    let keys = &s.document().layers[0].keyframes;
    let times: Vec<f64> = keys.iter().map(|k| k.time).collect();
    assert_eq!(times, vec![0.0, 1090.0]);
    assert_eq!(index, 1);
    assert_eq!(keys[1].x, 3.0);
    assert_eq!(s.selection().keyframe, Some(1));
}
