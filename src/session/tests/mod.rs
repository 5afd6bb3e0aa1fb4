//! Scenario tests for the labeling session.

mod drawing_tests;
mod navigation_tests;
mod upload_tests;

use std::cell::Cell;
use std::rc::Rc;

use crate::model::BoxId;
use crate::probe::test_images::png;
use crate::probe::{DimensionProbe, HeaderProbe, ProbeError};
use crate::session::{LabelingSession, UploadFile};

fn png_file(name: &str, width: u32, height: u32) -> UploadFile {
    UploadFile::new(name, "image/png", png(width, height))
}

/// Session with the given `(name, width, height)` images loaded.
fn session_with(images: &[(&str, u32, u32)]) -> LabelingSession {
    let mut session = LabelingSession::default();
    let report = session.upload_images(images.iter().map(|&(n, w, h)| png_file(n, w, h)));
    assert_eq!(report.accepted, images.len());
    session
}

/// Press, drag and release.
fn draw(session: &mut LabelingSession, x0: f32, y0: f32, x1: f32, y1: f32) -> Option<BoxId> {
    session.begin_box(x0, y0);
    session.update_box(x1, y1);
    session.end_box()
}

/// Header probe that can be told to fail.
#[derive(Clone, Default)]
struct SwitchableProbe {
    fail: Rc<Cell<bool>>,
}

impl DimensionProbe for SwitchableProbe {
    fn probe(&self, bytes: &[u8]) -> Result<(u32, u32), ProbeError> {
        if self.fail.get() {
            return Err(ProbeError::ZeroSized {
                width: 0,
                height: 0,
            });
        }
        HeaderProbe.probe(bytes)
    }
}
