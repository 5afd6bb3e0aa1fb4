//! Browser bindings.
//!
//! The page owns the DOM (file input, buttons, label field, table); it forwards
//! events to a [`WebLabelingSession`] and re-reads [`WebLabelingSession::state_json`]
//! to update its widgets.

use serde::Serialize;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use crate::config::AppConfig;
use crate::model::BoxId;
use crate::render::{DrawCommand, Frame, Renderer};
use crate::session::{BoxTableRow, LabelingSession, PointerEvent, UploadFile};
use crate::viewport::CanvasViewport;
use crate::wasm_file::{ObjectUrlHost, download_box_file};

#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    let config = AppConfig::load_from_local_storage();
    crate::logging::init(config.preferences.log_level);
    log::info!("ocrbox starting");
}

/// Snapshot of everything the page displays.
#[derive(Serialize)]
struct SessionView<'a> {
    status: String,
    image_count: usize,
    current_index: Option<usize>,
    image_loaded: bool,
    image_url: Option<&'a str>,
    image_name: Option<&'a str>,
    width: u32,
    height: u32,
    rows: Vec<BoxTableRow>,
    selected_id: Option<BoxId>,
    selected_label: &'a str,
    drawing: bool,
    can_go_next: bool,
    can_go_previous: bool,
    error: Option<&'a str>,
}

#[wasm_bindgen]
pub struct WebLabelingSession {
    session: LabelingSession<ObjectUrlHost>,
    config: AppConfig,
    renderer: Renderer,
    viewport: Option<CanvasViewport>,
}

#[wasm_bindgen]
impl WebLabelingSession {
    #[wasm_bindgen(constructor)]
    pub fn new() -> WebLabelingSession {
        let config = AppConfig::load_from_local_storage();
        let session = LabelingSession::new(ObjectUrlHost::default())
            .with_settings(config.preferences.session_settings());
        Self {
            session,
            config,
            renderer: Renderer::new(),
            viewport: None,
        }
    }

    /// Add one selected file. Returns the error message if it was skipped.
    pub fn upload(&mut self, name: String, media_type: String, bytes: Vec<u8>) -> Option<String> {
        let report = self
            .session
            .upload_images([UploadFile::new(name, media_type, bytes)]);
        report.errors.first().map(ToString::to_string)
    }

    /// Record where the canvas element is displayed (from `getBoundingClientRect`).
    pub fn set_viewport(&mut self, left: f32, top: f32, width: f32, height: f32) {
        let Some(image) = self.session.current_image() else {
            self.viewport = None;
            return;
        };
        self.viewport = Some(CanvasViewport {
            left,
            top,
            display_width: width,
            display_height: height,
            canvas_width: image.width,
            canvas_height: image.height,
        });
    }

    pub fn pointer_down(&mut self, client_x: f32, client_y: f32) {
        let (x, y) = self.to_image(client_x, client_y);
        self.session.handle_pointer(PointerEvent::Down { x, y });
    }

    pub fn pointer_move(&mut self, client_x: f32, client_y: f32) {
        let (x, y) = self.to_image(client_x, client_y);
        self.session.handle_pointer(PointerEvent::Move { x, y });
    }

    pub fn pointer_up(&mut self) {
        self.session.handle_pointer(PointerEvent::Up);
    }

    pub fn pointer_leave(&mut self) {
        self.session.handle_pointer(PointerEvent::Leave);
    }

    /// "New Box": drop any draft and selection.
    pub fn reset_drawing(&mut self) {
        self.session.reset_drawing();
    }

    pub fn select_box(&mut self, id: f64) -> bool {
        self.session.select_box(id as BoxId)
    }

    pub fn set_label(&mut self, text: &str) {
        self.session.set_label(text);
    }

    pub fn delete_selected(&mut self) -> bool {
        self.session.delete_selected().is_some()
    }

    pub fn next_image(&mut self) -> Result<bool, JsValue> {
        self.session
            .next_image()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn previous_image(&mut self) -> Result<bool, JsValue> {
        self.session
            .previous_image()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn remove_image(&mut self, index: usize) -> bool {
        self.session.remove_image(index)
    }

    pub fn remove_current_image(&mut self) -> bool {
        self.session.remove_current_image()
    }

    /// Export the current image's boxes and start the download.
    /// Returns false when there was nothing to export.
    pub fn export(&mut self) -> Result<bool, JsValue> {
        match self.session.export() {
            Some(file) => download_box_file(&file).map(|()| true),
            None => Ok(false),
        }
    }

    pub fn min_box_size(&self) -> f32 {
        self.session.settings().min_box_size
    }

    /// Change the minimum drag size and remember it in localStorage.
    pub fn set_min_box_size(&mut self, size: f32) -> Result<(), JsValue> {
        self.config.preferences.min_box_size = size;
        self.session
            .set_settings(self.config.preferences.session_settings());
        self.config
            .save_to_local_storage()
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    pub fn clear_error(&mut self) {
        self.session.clear_error();
    }

    /// Current state as JSON (see `SessionView`).
    pub fn state_json(&self) -> Result<String, JsValue> {
        let s = &self.session;
        let image = s.current_image();
        let view = SessionView {
            status: s.status_text(),
            image_count: s.image_count(),
            current_index: s.current_index(),
            image_loaded: s.is_image_loaded(),
            image_url: image.map(|i| i.handle.url()),
            image_name: image.map(|i| i.name.as_str()),
            width: image.map_or(0, |i| i.width),
            height: image.map_or(0, |i| i.height),
            rows: s.box_rows(),
            selected_id: s.selected_id(),
            selected_label: s.selected_label(),
            drawing: s.is_drawing(),
            can_go_next: s.can_go_next(),
            can_go_previous: s.can_go_previous(),
            error: s.error(),
        };
        serde_json::to_string(&view).map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Repaint the overlay canvas if anything changed.
    pub fn render(&mut self, canvas: &HtmlCanvasElement) -> Result<(), JsValue> {
        let Some(redraw) = self.renderer.update(&self.session) else {
            return Ok(());
        };

        if redraw.resize || canvas.width() != redraw.frame.width || canvas.height() != redraw.frame.height {
            canvas.set_width(redraw.frame.width);
            canvas.set_height(redraw.frame.height);
        }

        let ctx: CanvasRenderingContext2d = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into()?;
        paint_frame(&ctx, redraw.frame)
    }
}

impl WebLabelingSession {
    fn to_image(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        match self.viewport {
            Some(vp) => vp.to_image(client_x, client_y),
            None => (client_x, client_y),
        }
    }
}

impl Default for WebLabelingSession {
    fn default() -> Self {
        Self::new()
    }
}

fn paint_frame(ctx: &CanvasRenderingContext2d, frame: &Frame) -> Result<(), JsValue> {
    for command in &frame.commands {
        match command {
            DrawCommand::Clear => {
                ctx.clear_rect(0.0, 0.0, f64::from(frame.width), f64::from(frame.height));
            }
            DrawCommand::StrokeRect {
                x,
                y,
                width,
                height,
                color,
                line_width,
            } => {
                ctx.set_stroke_style_str(&color.to_css());
                ctx.set_line_width(f64::from(*line_width));
                ctx.stroke_rect(
                    f64::from(*x),
                    f64::from(*y),
                    f64::from(*width),
                    f64::from(*height),
                );
            }
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.fill_rect(
                    f64::from(*x),
                    f64::from(*y),
                    f64::from(*width),
                    f64::from(*height),
                );
            }
            DrawCommand::Text {
                text,
                x,
                y,
                color,
                font,
            } => {
                ctx.set_fill_style_str(&color.to_css());
                ctx.set_font(font);
                ctx.fill_text(text, f64::from(*x), f64::from(*y))?;
            }
        }
    }
    Ok(())
}
