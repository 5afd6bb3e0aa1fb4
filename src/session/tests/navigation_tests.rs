//! Tests for navigation, removal and resource release.

use super::*;
use crate::session::SessionError;

fn names(session: &LabelingSession) -> Vec<&str> {
    session.images().iter().map(|i| i.name.as_str()).collect()
}

#[test]
fn test_round_trip_restores_boxes() {
    let mut session = session_with(&[("a.png", 200, 200), ("b.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    session.set_label("x");
    draw(&mut session, 60.0, 60.0, 90.0, 95.0).unwrap();
    let before = session.boxes().to_vec();

    assert!(session.next_image().unwrap());
    assert_eq!(session.current_index(), Some(1));
    assert!(session.boxes().is_empty());

    assert!(session.previous_image().unwrap());
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.boxes(), before.as_slice());
}

#[test]
fn test_boxes_belong_to_their_image() {
    let mut session = session_with(&[("a.png", 200, 200), ("b.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    session.next_image().unwrap();
    draw(&mut session, 100.0, 100.0, 150.0, 150.0).unwrap();
    session.previous_image().unwrap();

    assert_eq!(session.boxes().len(), 1);
    assert_eq!(session.boxes()[0].x, 10.0);
    assert_eq!(session.images()[1].boxes.len(), 1);
    assert_eq!(session.images()[1].boxes[0].x, 100.0);
}

#[test]
fn test_navigation_at_bounds_is_noop() {
    let mut session = session_with(&[("a.png", 100, 100), ("b.png", 100, 100)]);
    assert!(!session.can_go_previous());
    assert!(!session.previous_image().unwrap());
    assert_eq!(session.current_index(), Some(0));

    session.next_image().unwrap();
    assert!(!session.can_go_next());
    assert!(!session.next_image().unwrap());
    assert_eq!(session.current_index(), Some(1));
}

#[test]
fn test_navigation_on_empty_session() {
    let mut session = LabelingSession::default();
    assert!(!session.next_image().unwrap());
    assert!(!session.previous_image().unwrap());
    assert_eq!(session.status_text(), "No images");
}

#[test]
fn test_navigation_clears_selection_and_draft() {
    let mut session = session_with(&[("a.png", 200, 200), ("b.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();
    session.begin_box(100.0, 100.0);
    session.next_image().unwrap();
    assert!(session.draft().is_none());
    assert_eq!(session.selected_id(), None);

    session.previous_image().unwrap();
    assert_eq!(session.selected_id(), None);
}

#[test]
fn test_navigation_probe_failure_stays_on_current() {
    let probe = SwitchableProbe::default();
    let mut session = LabelingSession::default().with_probe(probe.clone());
    session.upload_images([png_file("a.png", 200, 200), png_file("b.png", 200, 200)]);
    draw(&mut session, 10.0, 10.0, 40.0, 40.0).unwrap();

    probe.fail.set(true);
    let err = session.next_image().unwrap_err();

    assert!(matches!(err, SessionError::ProbeFailed { ref name, .. } if name == "b.png"));
    assert_eq!(session.current_index(), Some(0));
    assert!(session.is_image_loaded());
    assert_eq!(session.boxes().len(), 1);
    assert_eq!(session.error(), Some("Failed to load image: b.png"));

    probe.fail.set(false);
    assert!(session.next_image().unwrap());
    assert_eq!(session.current_index(), Some(1));
}

#[test]
fn test_status_text() {
    let mut session = session_with(&[("a.png", 50, 50), ("b.png", 50, 50), ("c.png", 50, 50)]);
    assert_eq!(session.status_text(), "Image 1 of 3");
    session.next_image().unwrap();
    assert_eq!(session.status_text(), "Image 2 of 3");
}

#[test]
fn test_remove_current_middle_shows_previous() {
    let mut session = session_with(&[("a.png", 50, 50), ("b.png", 50, 50), ("c.png", 50, 50)]);
    session.next_image().unwrap();

    assert!(session.remove_current_image());
    assert_eq!(names(&session), ["a.png", "c.png"]);
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.current_image().unwrap().name, "a.png");

    session.next_image().unwrap();
    assert_eq!(session.current_image().unwrap().name, "c.png");
}

#[test]
fn test_remove_current_first_shows_new_first() {
    let mut session = session_with(&[("a.png", 50, 50), ("b.png", 50, 50)]);
    assert!(session.remove_image(0));
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.current_image().unwrap().name, "b.png");
}

#[test]
fn test_remove_earlier_keeps_current_image() {
    let mut session = session_with(&[("a.png", 50, 50), ("b.png", 50, 50), ("c.png", 50, 50)]);
    session.next_image().unwrap();
    session.next_image().unwrap();
    draw(&mut session, 1.0, 1.0, 20.0, 20.0).unwrap();

    assert!(session.remove_image(0));
    assert_eq!(session.current_index(), Some(1));
    assert_eq!(session.current_image().unwrap().name, "c.png");
    // Unsaved boxes survive the removal of another image
    assert_eq!(session.boxes().len(), 1);
    assert_eq!(session.images()[1].boxes.len(), 1);
}

#[test]
fn test_remove_later_keeps_current_index() {
    let mut session = session_with(&[("a.png", 50, 50), ("b.png", 50, 50)]);
    assert!(session.remove_image(1));
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(names(&session), ["a.png"]);
}

#[test]
fn test_remove_last_remaining_image() {
    let mut session = session_with(&[("only.png", 50, 50)]);
    draw(&mut session, 1.0, 1.0, 20.0, 20.0).unwrap();

    assert!(session.remove_current_image());
    assert_eq!(session.current_index(), None);
    assert!(session.current_image().is_none());
    assert!(!session.is_image_loaded());
    assert!(session.boxes().is_empty());
    assert_eq!(session.status_text(), "No images");

    // Drawing is ignored with nothing loaded
    assert_eq!(draw(&mut session, 1.0, 1.0, 20.0, 20.0), None);
    assert!(!session.remove_current_image());
}

#[test]
fn test_remove_out_of_range() {
    let mut session = session_with(&[("a.png", 50, 50)]);
    assert!(!session.remove_image(1));
    assert_eq!(session.image_count(), 1);
    assert_eq!(session.host().released_count(), 0);
}

#[test]
fn test_resources_released_exactly_once() {
    let mut session = session_with(&[("a.png", 50, 50), ("b.png", 50, 50), ("c.png", 50, 50)]);
    assert_eq!(session.host().live_count(), 3);

    // Navigation never releases
    session.next_image().unwrap();
    session.previous_image().unwrap();
    assert_eq!(session.host().released_count(), 0);

    session.remove_image(1);
    assert_eq!(session.host().released_count(), 1);
    assert_eq!(session.host().live_count(), 2);

    session.teardown();
    assert_eq!(session.host().released_count(), 3);
    assert_eq!(session.host().live_count(), 0);
    assert_eq!(session.image_count(), 0);

    // A second teardown has nothing left to release
    session.teardown();
    assert_eq!(session.host().released_count(), 3);
    assert_eq!(session.host().allocated_count(), 3);
}
