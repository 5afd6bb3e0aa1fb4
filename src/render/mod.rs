//! Box overlay rendering.
//!
//! Rendering is a pure projection of session state: [`Frame::from_session`]
//! turns the current image's boxes, the selection and the draft into a display
//! list, and a backend paints it. The browser backend paints onto a 2D canvas;
//! [`Frame::rasterize`] paints into an RGBA buffer.
//!
//! [`Renderer`] remembers the last frame so callers only repaint (and only
//! resize the backing surface) when something changed.

mod raster;

use crate::constants::{
    BOX_STROKE, BOX_STROKE_WIDTH, DRAFT_STROKE, LABEL_FONT, LABEL_TAG_FILL, LABEL_TAG_SIZE,
    LABEL_TEXT_COLOR, LABEL_TEXT_OFFSET, Rgba, SELECTED_STROKE,
};
use crate::resource::ResourceHost;
use crate::session::LabelingSession;

/// One drawing operation, in image pixel coordinates.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Clear the whole surface to transparent.
    Clear,
    /// Outline a rectangle. Width and height may be negative (draft boxes).
    StrokeRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
        line_width: f32,
    },
    /// Fill a rectangle.
    FillRect {
        x: f32,
        y: f32,
        width: f32,
        height: f32,
        color: Rgba,
    },
    /// Draw text with its baseline starting at `(x, y)`.
    Text {
        text: String,
        x: f32,
        y: f32,
        color: Rgba,
        font: &'static str,
    },
}

/// A complete overlay for one image.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Required surface width (the image's pixel width).
    pub width: u32,
    /// Required surface height (the image's pixel height).
    pub height: u32,
    pub commands: Vec<DrawCommand>,
}

impl Frame {
    /// Project the session's current image. `None` when no image is loaded.
    pub fn from_session<H: ResourceHost>(session: &LabelingSession<H>) -> Option<Self> {
        let image = session.current_image()?;
        let mut commands = vec![DrawCommand::Clear];

        for b in session.boxes() {
            let color = if session.selected_id() == Some(b.id) {
                SELECTED_STROKE
            } else {
                BOX_STROKE
            };
            commands.push(DrawCommand::StrokeRect {
                x: b.x,
                y: b.y,
                width: b.width,
                height: b.height,
                color,
                line_width: BOX_STROKE_WIDTH,
            });

            if b.is_labeled() {
                commands.push(DrawCommand::FillRect {
                    x: b.x,
                    y: b.y - LABEL_TAG_SIZE,
                    width: LABEL_TAG_SIZE,
                    height: LABEL_TAG_SIZE,
                    color: LABEL_TAG_FILL,
                });
                commands.push(DrawCommand::Text {
                    text: b.label.clone(),
                    x: b.x + LABEL_TEXT_OFFSET.0,
                    y: b.y + LABEL_TEXT_OFFSET.1,
                    color: LABEL_TEXT_COLOR,
                    font: LABEL_FONT,
                });
            }
        }

        if let Some(draft) = session.draft() {
            commands.push(DrawCommand::StrokeRect {
                x: draft.anchor_x,
                y: draft.anchor_y,
                width: draft.width,
                height: draft.height,
                color: DRAFT_STROKE,
                line_width: BOX_STROKE_WIDTH,
            });
        }

        Some(Self {
            width: image.width,
            height: image.height,
            commands,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// A frame that needs painting.
#[derive(Debug)]
pub struct Redraw<'a> {
    pub frame: &'a Frame,
    /// The backing surface must be resized to the frame's size first.
    pub resize: bool,
}

/// Tracks the last painted frame.
#[derive(Debug, Default)]
pub struct Renderer {
    last: Option<Frame>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Compute the session's frame and return it if it differs from the last
    /// one painted.
    pub fn update<H: ResourceHost>(&mut self, session: &LabelingSession<H>) -> Option<Redraw<'_>> {
        let Some(frame) = Frame::from_session(session) else {
            self.last = None;
            return None;
        };

        if self.last.as_ref() == Some(&frame) {
            return None;
        }

        let resize = self.last.as_ref().map(Frame::size) != Some(frame.size());
        let frame = &*self.last.insert(frame);
        Some(Redraw { frame, resize })
    }
}
