use motion_core::{
    EditorConfig, EditorEvent, EditorSession, HistoryStep, KeyframeValues, NoticeLevel,
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

fn notices(events: &[EditorEvent]) -> Vec<(NoticeLevel, String)> {
    events
        .iter()
        .filter_map(|e| match e {
            EditorEvent::Notice { level, message } => Some((*level, message.clone())),
            _ => None,
        })
        .collect()
}

#[test]
fn undo_restores_exact_prior_state() {
    let mut s = EditorSession::default();
    s.add_layer("A", "a.png", None).unwrap();
    s.seek(700.0).unwrap();
    let doc_before = s.document().clone();
    let sel_before = s.selection();

    s.add_keyframe(0, 4800.0, mk_values(3.0)).unwrap();
    assert_eq!(s.workspace_duration(), 10000.0);

    let step = s.undo();
    assert_eq!(
        step,
        HistoryStep::Restored {
            label: "Add Keyframe".into()
        }
    );
    assert_eq!(s.document(), &doc_before);
    assert_eq!(s.selection(), sel_before);
    assert_eq!(s.current_time(), 700.0);
    assert_eq!(s.workspace_duration(), 5000.0);
}

#[test]
fn redo_restores_post_action_state() {
    let mut s = EditorSession::default();
    s.add_layer("A", "a.png", None).unwrap();
    s.add_keyframe(0, 1000.0, mk_values(3.0)).unwrap();
    let doc_after = s.document().clone();
    let sel_after = s.selection();

    s.undo();
    assert_ne!(s.document(), &doc_after);
    assert!(s.can_redo());

    let step = s.redo();
    assert_eq!(
        step,
        HistoryStep::Restored {
            label: "Add Keyframe".into()
        }
    );
    assert_eq!(s.document(), &doc_after);
    assert_eq!(s.selection(), sel_after);
    assert!(!s.can_redo());
}

#[test]
fn empty_stacks_report_nothing_to_do() {
    let mut s = EditorSession::default();
    s.drain_events();
    assert_eq!(s.undo(), HistoryStep::Empty);
    assert_eq!(s.redo(), HistoryStep::Empty);
    assert_eq!((s.history().undo_len(), s.history().redo_len()), (0, 0));
    let n = notices(&s.drain_events());
    assert_eq!(
        n,
        vec![
            (NoticeLevel::Info, "Nothing to undo".to_string()),
            (NoticeLevel::Info, "Nothing to redo".to_string()),
        ]
    );
}

#[test]
fn undo_and_redo_announce_labels() {
    let mut s = EditorSession::default();
    s.add_layer("A", "a.png", None).unwrap();
    s.drain_events();
    s.undo();
    s.redo();
    let n: Vec<String> = notices(&s.drain_events())
        .into_iter()
        .map(|(_, m)| m)
        .collect();
    assert_eq!(n, vec!["Undo: Add Layer", "Redo: Add Layer"]);
}

#[test]
fn new_action_clears_redo() {
    let mut s = EditorSession::default();
    s.add_layer("A", "a.png", None).unwrap();
    s.add_layer("B", "b.png", None).unwrap();
    s.undo();
    assert_eq!(s.history().redo_len(), 1);
    s.toggle_layer_visibility(0).unwrap();
    assert_eq!(s.history().redo_len(), 0);
    assert!(!s.can_redo());
}

#[test]
fn oldest_entries_are_evicted() {
    let cfg = EditorConfig {
        max_history: 3,
        ..EditorConfig::default()
    };
    let mut s = EditorSession::new(cfg);
    for n in ["A", "B", "C", "D", "E"] {
        s.add_layer(n, "x.png", None).unwrap();
    }
    assert_eq!(s.history().undo_len(), 3);
    for _ in 0..3 {
        assert!(matches!(s.undo(), HistoryStep::Restored { .. }));
    }
    assert_eq!(s.undo(), HistoryStep::Empty);
    // Two layers were added before the retained window.
    assert_eq!(s.document().layers.len(), 2);
    assert_eq!(s.history().redo_len(), 3);
}

#[test]
fn redo_bounded_by_history_depth() {
    let cfg = EditorConfig {
        max_history: 2,
        ..EditorConfig::default()
    };
    let mut s = EditorSession::new(cfg);
    for n in ["A", "B", "C"] {
        s.add_layer(n, "x.png", None).unwrap();
    }
    s.undo();
    s.undo();
    s.redo();
    s.redo();
    assert_eq!(s.document().layers.len(), 3);
    assert_eq!(s.history().undo_len(), 2);
}

#[test]
fn history_events_track_availability() {
    let mut s = EditorSession::default();
    s.drain_events();
    s.add_layer("A", "a.png", None).unwrap();
    let events = s.drain_events();
    assert!(events.contains(&EditorEvent::HistoryChanged {
        can_undo: true,
        can_redo: false,
    }));

    s.undo();
    let events = s.drain_events();
    assert!(events.contains(&EditorEvent::DocumentReplaced));
    assert!(events.contains(&EditorEvent::HistoryChanged {
        can_undo: false,
        can_redo: true,
    }));
}

#[test]
fn restore_is_not_recorded() {
    let mut s = EditorSession::default();
    s.add_layer("A", "a.png", None).unwrap();
    s.add_layer("B", "b.png", None).unwrap();
    let depth = s.history().undo_len();
    s.undo();
    s.redo();
    assert_eq!(s.history().undo_len(), depth);
    assert_eq!(s.history().redo_len(), 0);
    assert!(!s.history().is_restoring());
}

#[test]
fn load_and_new_project_clear_history() {
    let mut s = EditorSession::default();
    s.add_layer("A", "a.png", None).unwrap();
    assert!(s.can_undo());
    s.new_project();
    assert!(!s.can_undo());
    assert!(s.document().layers.is_empty());
    assert_eq!(s.current_time(), 0.0);
}

#[test]
fn undrained_events_are_bounded() {
    let cfg = EditorConfig {
        max_pending_events: 8,
        ..EditorConfig::default()
    };
    let mut s = EditorSession::new(cfg);
    for i in 0..20 {
        s.add_layer(&format!("L{i}"), "x.png", None).unwrap();
    }
    assert!(s.dropped_events() > 0);
    let events = s.drain_events();
    assert_eq!(events.len(), 8);
    assert_eq!(
        events.last(),
        Some(&EditorEvent::SelectionChanged {
            selection: s.selection()
        })
    );
    assert_eq!(s.dropped_events(), 0);
}
