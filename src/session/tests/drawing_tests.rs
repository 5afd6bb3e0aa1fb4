//! Tests for box drawing, selection and labeling.

use super::*;
use crate::constants::UNLABELED_TEXT;
use crate::session::PointerEvent;

#[test]
fn test_box_created_only_above_threshold() {
    let cases = [
        // (dx, dy, created)
        (10.0, 10.0, true),
        (6.0, 6.0, true),
        (5.0, 10.0, false),
        (10.0, 5.0, false),
        (-6.0, -6.0, true),
        (-5.0, -20.0, false),
        (0.0, 0.0, false),
        (-30.0, 12.0, true),
    ];

    for (dx, dy, created) in cases {
        let mut session = session_with(&[("page.png", 200, 200)]);
        let id = draw(&mut session, 100.0, 100.0, 100.0 + dx, 100.0 + dy);

        assert_eq!(id.is_some(), created, "drag ({dx}, {dy})");
        assert_eq!(session.boxes().len(), usize::from(created));
        for b in session.boxes() {
            assert!(b.width >= 0.0 && b.height >= 0.0);
        }
        assert!(!session.is_drawing());
    }
}

#[test]
fn test_negative_drag_is_normalized() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    draw(&mut session, 100.0, 100.0, 80.0, 70.0).unwrap();

    let b = &session.boxes()[0];
    assert_eq!((b.x, b.y, b.width, b.height), (80.0, 70.0, 20.0, 30.0));
    assert_eq!(b.label, "");
}

#[test]
fn test_new_box_is_selected() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    let id = draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    assert_eq!(session.selected_id(), Some(id));
}

#[test]
fn test_press_inside_box_selects_without_drawing() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    let first = draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    draw(&mut session, 100.0, 100.0, 150.0, 150.0).unwrap();

    // Edges count as inside
    session.begin_box(40.0, 40.0);
    assert_eq!(session.selected_id(), Some(first));
    assert!(!session.is_drawing());

    // Releasing after a selection press does nothing
    assert_eq!(session.end_box(), None);
    assert_eq!(session.boxes().len(), 2);
}

#[test]
fn test_overlapping_boxes_select_first_in_list_order() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    let first = draw(&mut session, 10.0, 10.0, 60.0, 60.0).unwrap();
    // Start outside the first box and drag back over it
    let second = draw(&mut session, 80.0, 80.0, 30.0, 30.0).unwrap();
    assert_ne!(first, second);

    session.begin_box(45.0, 45.0);
    assert_eq!(session.selected_id(), Some(first));
}

#[test]
fn test_press_outside_clears_selection() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();

    session.begin_box(150.0, 150.0);
    assert_eq!(session.selected_id(), None);
    assert!(session.is_drawing());

    // Too small: discarded, selection stays cleared
    session.update_box(152.0, 152.0);
    assert_eq!(session.end_box(), None);
    assert_eq!(session.selected_id(), None);
    assert!(session.draft().is_none());
}

#[test]
fn test_update_tracks_signed_delta() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    session.begin_box(50.0, 60.0);
    session.update_box(40.0, 90.0);

    let draft = session.draft().unwrap();
    assert_eq!((draft.anchor_x, draft.anchor_y), (50.0, 60.0));
    assert_eq!((draft.width, draft.height), (-10.0, 30.0));
}

#[test]
fn test_update_without_press_is_ignored() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    session.update_box(50.0, 50.0);
    assert!(session.draft().is_none());
    assert_eq!(session.end_box(), None);
}

#[test]
fn test_pointer_ignored_without_image() {
    let mut session = LabelingSession::default();
    session.begin_box(10.0, 10.0);
    session.update_box(50.0, 50.0);
    assert!(session.draft().is_none());
    assert_eq!(session.end_box(), None);
    assert!(session.boxes().is_empty());
}

#[test]
fn test_pointer_leave_commits_like_release() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    session.handle_pointer(PointerEvent::Down { x: 10.0, y: 10.0 });
    session.handle_pointer(PointerEvent::Move { x: 30.0, y: 30.0 });
    let id = session.handle_pointer(PointerEvent::Leave);

    assert!(id.is_some());
    assert_eq!(session.boxes().len(), 1);
}

#[test]
fn test_box_ids_are_unique_and_increasing() {
    let mut session = session_with(&[("page.png", 500, 500)]);
    let mut ids = Vec::new();
    for i in 0..10 {
        let x = (i * 40) as f32;
        ids.push(draw(&mut session, x, 0.0, x + 30.0, 30.0).unwrap());
    }
    assert!(ids.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_set_label_requires_selection() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    session.reset_drawing();

    session.set_label("Z");
    assert_eq!(session.boxes()[0].label, "");
    assert_eq!(session.selected_label(), "");
}

#[test]
fn test_set_label_keeps_one_character() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();

    session.set_label("AB");
    assert_eq!(session.selected_label(), "A");

    session.set_label("");
    assert_eq!(session.selected_label(), "");
}

#[test]
fn test_delete_selected() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    let keep = draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    let gone = draw(&mut session, 100.0, 100.0, 140.0, 140.0).unwrap();

    let deleted = session.delete_selected().unwrap();
    assert_eq!(deleted.id, gone);
    assert_eq!(session.selected_id(), None);
    assert_eq!(session.boxes().len(), 1);
    assert_eq!(session.boxes()[0].id, keep);

    assert!(session.delete_selected().is_none());
    assert_eq!(session.boxes().len(), 1);
}

#[test]
fn test_select_box_by_id() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    let first = draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    draw(&mut session, 100.0, 100.0, 140.0, 140.0).unwrap();

    assert!(session.select_box(first));
    assert_eq!(session.selected_id(), Some(first));
    assert!(!session.select_box(first + 1_000_000));
    assert_eq!(session.selected_id(), Some(first));
}

#[test]
fn test_reset_drawing_drops_draft_and_selection() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    session.begin_box(100.0, 100.0);

    session.reset_drawing();
    assert!(!session.is_drawing());
    assert_eq!(session.selected_id(), None);
    assert_eq!(session.boxes().len(), 1);
}

#[test]
fn test_box_rows() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    draw(&mut session, 10.4, 10.5, 40.0, 40.0).unwrap();
    session.set_label("a");
    let second = draw(&mut session, 100.0, 100.0, 140.0, 130.0).unwrap();

    let rows = session.box_rows();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label, "a");
    assert_eq!((rows[0].x, rows[0].y), (10, 11));
    assert!(!rows[0].selected);

    assert_eq!(rows[1].id, second);
    assert_eq!(rows[1].label, UNLABELED_TEXT);
    assert_eq!((rows[1].width, rows[1].height), (40, 30));
    assert!(rows[1].selected);
}

#[test]
fn test_changed_threshold_applies_to_next_box() {
    let mut session = session_with(&[("page.png", 200, 200)]);
    assert_eq!(draw(&mut session, 10.0, 10.0, 13.0, 13.0), None);

    session.set_settings(crate::session::SessionSettings { min_box_size: 2.0 });
    assert!(draw(&mut session, 10.0, 10.0, 13.0, 13.0).is_some());
}
