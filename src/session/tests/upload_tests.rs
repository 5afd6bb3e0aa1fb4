//! Tests for image uploads.

use super::*;
use crate::session::SessionError;

#[test]
fn test_first_upload_shows_first_image() {
    let session = session_with(&[("a.png", 120, 80), ("b.png", 30, 40)]);

    assert_eq!(session.image_count(), 2);
    assert_eq!(session.current_index(), Some(0));
    assert!(session.is_image_loaded());

    let image = session.current_image().unwrap();
    assert_eq!(image.name, "a.png");
    assert_eq!(image.dimensions(), (120, 80));
    assert_eq!(session.images()[1].dimensions(), (30, 40));
}

#[test]
fn test_later_upload_keeps_current_image() {
    let mut session = session_with(&[("a.png", 50, 50)]);
    draw(&mut session, 1.0, 1.0, 20.0, 20.0).unwrap();

    let report = session.upload_images([png_file("b.png", 50, 50)]);
    assert_eq!(report.accepted, 1);
    assert_eq!(session.current_index(), Some(0));
    assert_eq!(session.boxes().len(), 1);
    assert_eq!(session.image_count(), 2);
}

#[test]
fn test_non_image_is_skipped() {
    let mut session = LabelingSession::default();
    let report = session.upload_images([
        UploadFile::new("notes.txt", "text/plain", b"hello".to_vec()),
        png_file("a.png", 10, 10),
    ]);

    assert_eq!(report.accepted, 1);
    assert!(report.has_errors());
    assert!(matches!(
        report.errors[0],
        SessionError::UnsupportedFile { ref name, .. } if name == "notes.txt"
    ));
    assert_eq!(
        session.error(),
        Some("Please upload only image files ('notes.txt' is text/plain)")
    );
    assert_eq!(session.current_image().unwrap().name, "a.png");
    // Rejected before any resource was allocated
    assert_eq!(session.host().allocated_count(), 1);
}

#[test]
fn test_unreadable_image_is_released() {
    let mut session = session_with(&[("good.png", 10, 10)]);
    let report = session.upload_images([UploadFile::new(
        "broken.png",
        "image/png",
        b"not really a png".to_vec(),
    )]);

    assert_eq!(report.accepted, 0);
    assert_eq!(report.errors[0].file_name(), "broken.png");
    assert_eq!(session.error(), Some("Failed to load image: broken.png"));

    assert_eq!(session.image_count(), 1);
    assert_eq!(session.current_image().unwrap().name, "good.png");
    assert_eq!(session.host().allocated_count(), 2);
    assert_eq!(session.host().released_count(), 1);
    assert_eq!(session.host().live_count(), 1);
}

#[test]
fn test_first_accepted_image_becomes_current() {
    let mut session = LabelingSession::default();
    session.upload_images([
        UploadFile::new("broken.png", "image/png", vec![0u8; 4]),
        png_file("a.png", 10, 10),
        png_file("b.png", 10, 10),
    ]);

    assert_eq!(session.image_count(), 2);
    assert_eq!(session.current_image().unwrap().name, "a.png");
}

#[test]
fn test_all_rejected_leaves_session_empty() {
    let mut session = LabelingSession::default();
    let report = session.upload_images([UploadFile::new("a.pdf", "application/pdf", vec![1u8])]);

    assert_eq!(report.accepted, 0);
    assert_eq!(session.current_index(), None);
    assert!(!session.is_image_loaded());
}

#[test]
fn test_upload_clears_previous_error() {
    let mut session = LabelingSession::default();
    session.upload_images([UploadFile::new("a.txt", "text/plain", vec![1u8])]);
    assert!(session.error().is_some());

    session.upload_images([png_file("a.png", 10, 10)]);
    assert_eq!(session.error(), None);
}

#[test]
fn test_probe_failure_from_custom_probe() {
    let probe = SwitchableProbe::default();
    probe.fail.set(true);
    let mut session = LabelingSession::default().with_probe(probe);

    let report = session.upload_images([png_file("a.png", 10, 10)]);
    assert_eq!(report.accepted, 0);
    assert!(matches!(report.errors[0], SessionError::ProbeFailed { .. }));
    assert_eq!(session.host().live_count(), 0);
}
