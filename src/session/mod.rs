//! The labeling session controller.
//!
//! Owns the uploaded images and, for the image being edited, a working copy of
//! its box list. Pointer input drives a two-state machine:
//!
//! - **Idle → Drawing** on a press outside every box (starts a [`DraftBox`])
//! - **Drawing → Idle** on release or leave (commits the draft if both sides
//!   exceed the minimum size, otherwise discards it)
//! - **Idle → Idle** on a press inside a box (selects it)
//!
//! The working list is written back into the image record before every
//! navigation, removal and export, so switching images never loses boxes.

mod error;
mod upload;

#[cfg(test)]
mod tests;

use serde::Serialize;

use crate::constants::{MIN_BOX_SIZE, UNLABELED_TEXT};
use crate::format::{BoxFile, TesseractBoxFormat, round_half_up};
use crate::model::{BoxId, BoxIdGenerator, DraftBox, LabelBox, LabeledImage};
use crate::probe::{DimensionProbe, HeaderProbe};
use crate::resource::{MemoryResourceHost, ResourceHost};

pub use error::SessionError;
pub use upload::{UploadFile, UploadReport};

/// Tunables for the editor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SessionSettings {
    /// Drags must exceed this in both width and height to create a box.
    pub min_box_size: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            min_box_size: MIN_BOX_SIZE,
        }
    }
}

/// Pointer input on the drawing surface, in image pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f32, y: f32 },
    Move { x: f32, y: f32 },
    Up,
    Leave,
}

/// One row of the box table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BoxTableRow {
    pub id: BoxId,
    /// The label, or a placeholder for unlabeled boxes.
    pub label: String,
    pub x: i64,
    pub y: i64,
    pub width: i64,
    pub height: i64,
    pub selected: bool,
}

/// In-memory labeling session for one user.
pub struct LabelingSession<H: ResourceHost = MemoryResourceHost> {
    host: H,
    probe: Box<dyn DimensionProbe>,
    settings: SessionSettings,
    images: Vec<LabeledImage>,
    current: Option<usize>,
    /// Working copy of the current image's boxes.
    boxes: Vec<LabelBox>,
    selected: Option<BoxId>,
    draft: Option<DraftBox>,
    /// False while no image is shown, including mid-switch.
    image_loaded: bool,
    error: Option<String>,
    ids: BoxIdGenerator,
}

impl<H: ResourceHost> LabelingSession<H> {
    /// Create an empty session backed by `host`.
    pub fn new(host: H) -> Self {
        Self {
            host,
            probe: Box::new(HeaderProbe),
            settings: SessionSettings::default(),
            images: Vec::new(),
            current: None,
            boxes: Vec::new(),
            selected: None,
            draft: None,
            image_loaded: false,
            error: None,
            ids: BoxIdGenerator::new(),
        }
    }

    /// Replace the dimension probe.
    pub fn with_probe(mut self, probe: impl DimensionProbe + 'static) -> Self {
        self.probe = Box::new(probe);
        self
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    // ========================================================================
    // Uploads
    // ========================================================================

    /// Add the image files among `files` to the session.
    ///
    /// Non-image files and images whose size cannot be probed are skipped and
    /// reported; the rest are appended in order. If nothing was current, the
    /// first accepted image becomes current.
    pub fn upload_images(&mut self, files: impl IntoIterator<Item = UploadFile>) -> UploadReport {
        self.error = None;
        let first_new = self.images.len();
        let mut report = UploadReport::default();

        for file in files {
            match self.load_file(file) {
                Ok(image) => {
                    log::info!(
                        "Loaded image {} ({}x{})",
                        image.name,
                        image.width,
                        image.height
                    );
                    self.images.push(image);
                    report.accepted += 1;
                }
                Err(e) => {
                    log::warn!("Skipping {}: {}", e.file_name(), e);
                    self.error = Some(e.to_string());
                    report.errors.push(e);
                }
            }
        }

        if self.current.is_none() && report.accepted > 0 {
            self.show(first_new);
        }

        report
    }

    fn load_file(&mut self, file: UploadFile) -> Result<LabeledImage, SessionError> {
        if !file.is_image() {
            return Err(SessionError::UnsupportedFile {
                name: file.name,
                media_type: file.media_type,
            });
        }

        let handle = self.host.allocate(&file.name, &file.media_type, &file.bytes);
        match self.probe.probe(&file.bytes) {
            Ok((width, height)) => Ok(LabeledImage {
                name: file.name,
                media_type: file.media_type,
                source: file.bytes,
                handle,
                width,
                height,
                boxes: Vec::new(),
            }),
            Err(source) => {
                self.host.release(handle);
                Err(SessionError::ProbeFailed {
                    name: file.name,
                    source,
                })
            }
        }
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Press at `(px, py)`: select the first box containing the point, or
    /// start drawing a new one.
    pub fn begin_box(&mut self, px: f32, py: f32) {
        if !self.image_loaded {
            return;
        }

        if let Some(hit) = self.boxes.iter().find(|b| b.contains(px, py)) {
            log::trace!("Selected box {} at ({}, {})", hit.id, px, py);
            self.selected = Some(hit.id);
            return;
        }

        self.draft = Some(DraftBox::at(px, py));
        self.selected = None;
    }

    /// Drag to `(px, py)` while drawing.
    pub fn update_box(&mut self, px: f32, py: f32) {
        if !self.image_loaded {
            return;
        }
        if let Some(draft) = self.draft.as_mut() {
            draft.drag_to(px, py);
        }
    }

    /// Release (or leave): commit the draft if it is large enough.
    ///
    /// Returns the id of the new box, which is also selected.
    pub fn end_box(&mut self) -> Option<BoxId> {
        let draft = self.draft.take()?;
        if !self.image_loaded || !draft.exceeds(self.settings.min_box_size) {
            return None;
        }

        let new_box = draft.commit(self.ids.next_id(), self.settings.min_box_size)?;
        let id = new_box.id;
        log::debug!(
            "Added box {} at ({}, {}) {}x{}, {} boxes total",
            id,
            new_box.x,
            new_box.y,
            new_box.width,
            new_box.height,
            self.boxes.len() + 1
        );
        self.boxes.push(new_box);
        self.selected = Some(id);
        Some(id)
    }

    /// Route a pointer event to the drawing operations.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<BoxId> {
        match event {
            PointerEvent::Down { x, y } => {
                self.begin_box(x, y);
                None
            }
            PointerEvent::Move { x, y } => {
                self.update_box(x, y);
                None
            }
            PointerEvent::Up | PointerEvent::Leave => self.end_box(),
        }
    }

    /// Abandon any draft and clear the selection, ready for a new box.
    pub fn reset_drawing(&mut self) {
        self.draft = None;
        self.selected = None;
    }

    // ========================================================================
    // Box editing
    // ========================================================================

    /// Select a box of the current image by id.
    pub fn select_box(&mut self, id: BoxId) -> bool {
        if self.boxes.iter().any(|b| b.id == id) {
            self.selected = Some(id);
            true
        } else {
            false
        }
    }

    /// Label the selected box with the first character of `text`.
    pub fn set_label(&mut self, text: &str) {
        let Some(id) = self.selected else {
            return;
        };
        if let Some(b) = self.boxes.iter_mut().find(|b| b.id == id) {
            b.set_label(text);
        }
    }

    /// Delete the selected box.
    pub fn delete_selected(&mut self) -> Option<LabelBox> {
        let id = self.selected.take()?;
        let idx = self.boxes.iter().position(|b| b.id == id)?;
        log::debug!("Deleted box {}", id);
        Some(self.boxes.remove(idx))
    }

    // ========================================================================
    // Navigation
    // ========================================================================

    /// Move to the next image. Returns whether the current image changed.
    pub fn next_image(&mut self) -> Result<bool, SessionError> {
        match self.current {
            Some(i) if i + 1 < self.images.len() => self.switch_to(i + 1).map(|()| true),
            _ => Ok(false),
        }
    }

    /// Move to the previous image. Returns whether the current image changed.
    pub fn previous_image(&mut self) -> Result<bool, SessionError> {
        match self.current {
            Some(i) if i > 0 => self.switch_to(i - 1).map(|()| true),
            _ => Ok(false),
        }
    }

    /// Save the working boxes, then load `target` once its dimensions are
    /// known. On probe failure the session stays on the current image.
    fn switch_to(&mut self, target: usize) -> Result<(), SessionError> {
        self.persist_boxes();
        self.unload();

        match self.probe.probe(&self.images[target].source) {
            Ok((width, height)) => {
                let image = &mut self.images[target];
                image.width = width;
                image.height = height;
                log::debug!("Switched to image {} ({})", target + 1, image.name);
                self.show(target);
                Ok(())
            }
            Err(source) => {
                let name = self.images[target].name.clone();
                log::warn!("Could not switch to {}: {}", name, source);
                if let Some(i) = self.current {
                    self.show(i);
                }
                let err = SessionError::ProbeFailed { name, source };
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Remove the image at `index` and release its resource.
    ///
    /// Removing the current image shows the one before it (or the new first
    /// image); removing an earlier image keeps the same image current.
    pub fn remove_image(&mut self, index: usize) -> bool {
        if index >= self.images.len() {
            return false;
        }

        self.persist_boxes();
        let removed = self.images.remove(index);
        log::info!("Removed image {} ({})", index + 1, removed.name);
        self.host.release(removed.handle);

        match self.current {
            Some(cur) if cur == index => {
                self.unload();
                self.current = None;
                if !self.images.is_empty() {
                    self.show(index.saturating_sub(1));
                }
            }
            Some(cur) if index < cur => self.current = Some(cur - 1),
            _ => {}
        }

        true
    }

    /// Remove the current image, if any.
    pub fn remove_current_image(&mut self) -> bool {
        match self.current {
            Some(i) => self.remove_image(i),
            None => false,
        }
    }

    fn persist_boxes(&mut self) {
        if let Some(i) = self.current {
            self.images[i].boxes = self.boxes.clone();
        }
    }

    /// Enter the transitional "nothing loaded" state.
    fn unload(&mut self) {
        self.image_loaded = false;
        self.boxes.clear();
        self.selected = None;
        self.draft = None;
    }

    fn show(&mut self, index: usize) {
        self.current = Some(index);
        self.boxes = self.images[index].boxes.clone();
        self.selected = None;
        self.draft = None;
        self.image_loaded = true;
    }

    // ========================================================================
    // Export
    // ========================================================================

    /// Build the `.box` file for the current image.
    ///
    /// Returns `None` when there is no current image or it has no boxes.
    pub fn export(&mut self) -> Option<BoxFile> {
        let i = self.current?;
        if !self.image_loaded || self.boxes.is_empty() {
            return None;
        }

        self.persist_boxes();
        let image = &self.images[i];
        Some(TesseractBoxFormat.export(&image.name, image.height, &self.boxes))
    }

    // ========================================================================
    // Teardown
    // ========================================================================

    /// Release every image's resource and return to the empty state.
    pub fn teardown(&mut self) {
        self.unload();
        self.current = None;
        let images = std::mem::take(&mut self.images);
        if !images.is_empty() {
            log::info!("Releasing {} images", images.len());
        }
        for image in images {
            self.host.release(image.handle);
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    pub fn images(&self) -> &[LabeledImage] {
        &self.images
    }

    pub fn image_count(&self) -> usize {
        self.images.len()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// The image being edited, once loaded.
    pub fn current_image(&self) -> Option<&LabeledImage> {
        if !self.image_loaded {
            return None;
        }
        self.current.map(|i| &self.images[i])
    }

    /// Boxes of the current image, in creation order.
    pub fn boxes(&self) -> &[LabelBox] {
        &self.boxes
    }

    pub fn selected_id(&self) -> Option<BoxId> {
        self.selected
    }

    pub fn selected_box(&self) -> Option<&LabelBox> {
        let id = self.selected?;
        self.boxes.iter().find(|b| b.id == id)
    }

    /// Label of the selected box, empty when nothing is selected.
    pub fn selected_label(&self) -> &str {
        self.selected_box().map_or("", |b| b.label.as_str())
    }

    pub fn draft(&self) -> Option<&DraftBox> {
        self.draft.as_ref()
    }

    pub fn is_drawing(&self) -> bool {
        self.draft.is_some()
    }

    pub fn is_image_loaded(&self) -> bool {
        self.image_loaded
    }

    /// Most recent user-visible error message.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn can_go_next(&self) -> bool {
        self.current.is_some_and(|i| i + 1 < self.images.len())
    }

    pub fn can_go_previous(&self) -> bool {
        self.current.is_some_and(|i| i > 0)
    }

    /// `Image N of M`, or `No images`.
    pub fn status_text(&self) -> String {
        match self.current {
            Some(i) if !self.images.is_empty() => {
                format!("Image {} of {}", i + 1, self.images.len())
            }
            _ => "No images".to_string(),
        }
    }

    /// Box table rows for the current image.
    pub fn box_rows(&self) -> Vec<BoxTableRow> {
        self.boxes
            .iter()
            .map(|b| BoxTableRow {
                id: b.id,
                label: if b.is_labeled() {
                    b.label.clone()
                } else {
                    UNLABELED_TEXT.to_string()
                },
                x: round_half_up(b.x),
                y: round_half_up(b.y),
                width: round_half_up(b.width),
                height: round_half_up(b.height),
                selected: self.selected == Some(b.id),
            })
            .collect()
    }

    pub fn settings(&self) -> &SessionSettings {
        &self.settings
    }

    /// Change the settings. Applies to boxes drawn from now on.
    pub fn set_settings(&mut self, settings: SessionSettings) {
        self.settings = settings;
    }

    pub fn host(&self) -> &H {
        &self.host
    }
}

impl Default for LabelingSession<MemoryResourceHost> {
    fn default() -> Self {
        Self::new(MemoryResourceHost::new())
    }
}

impl<H: ResourceHost> Drop for LabelingSession<H> {
    fn drop(&mut self) {
        self.teardown();
    }
}
