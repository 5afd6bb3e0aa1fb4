//! Client-to-image coordinate mapping.
//!
//! The drawing canvas is sized to the image's pixels but displayed scaled to
//! fit its container, so pointer positions arrive in CSS pixels and must be
//! scaled back into image pixels before hit-testing or drawing.

/// Placement of the canvas element on the page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasViewport {
    /// Displayed left edge, in client coordinates.
    pub left: f32,
    /// Displayed top edge, in client coordinates.
    pub top: f32,
    /// Displayed width.
    pub display_width: f32,
    /// Displayed height.
    pub display_height: f32,
    /// Backing surface width (image pixels).
    pub canvas_width: u32,
    /// Backing surface height (image pixels).
    pub canvas_height: u32,
}

impl CanvasViewport {
    /// A canvas shown at its natural size at the origin.
    pub fn unscaled(width: u32, height: u32) -> Self {
        Self {
            left: 0.0,
            top: 0.0,
            display_width: width as f32,
            display_height: height as f32,
            canvas_width: width,
            canvas_height: height,
        }
    }

    /// Horizontal and vertical image pixels per displayed pixel.
    pub fn scale(&self) -> (f32, f32) {
        let sx = if self.display_width > 0.0 {
            self.canvas_width as f32 / self.display_width
        } else {
            1.0
        };
        let sy = if self.display_height > 0.0 {
            self.canvas_height as f32 / self.display_height
        } else {
            1.0
        };
        (sx, sy)
    }

    /// Map a client position to image pixel coordinates.
    pub fn to_image(&self, client_x: f32, client_y: f32) -> (f32, f32) {
        let (sx, sy) = self.scale();
        ((client_x - self.left) * sx, (client_y - self.top) * sy)
    }
}
