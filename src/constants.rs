//! Global constants for the OCR box labeler

/// Minimum absolute width and height (in image pixels) a drag must exceed
/// before it is committed as a box.
pub const MIN_BOX_SIZE: f32 = 5.0;

/// Maximum number of characters a box label may hold.
pub const MAX_LABEL_CHARS: usize = 1;

/// Stroke width for committed and in-progress boxes.
pub const BOX_STROKE_WIDTH: f32 = 2.0;

/// Stroke color of a selected box.
pub const SELECTED_STROKE: Rgba = Rgba::rgb(0xff, 0x00, 0x00);

/// Stroke color of an unselected box.
pub const BOX_STROKE: Rgba = Rgba::rgb(0x00, 0xff, 0x00);

/// Stroke color of the box being drawn.
pub const DRAFT_STROKE: Rgba = Rgba::rgb(0x00, 0x00, 0xff);

/// Side length of the label tag drawn above a labeled box.
pub const LABEL_TAG_SIZE: f32 = 20.0;

/// Background of the label tag (black at 70% opacity).
pub const LABEL_TAG_FILL: Rgba = Rgba::new(0, 0, 0, 178);

/// Label text color.
pub const LABEL_TEXT_COLOR: Rgba = Rgba::rgb(0xff, 0xff, 0xff);

/// Label font, CSS syntax.
pub const LABEL_FONT: &str = "12px Arial";

/// Offset of the label text baseline from the box's top-left corner.
pub const LABEL_TEXT_OFFSET: (f32, f32) = (5.0, -5.0);

/// Text shown in the box table for a box without a label.
pub const UNLABELED_TEXT: &str = "(unlabeled)";

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// CSS color string (`#rrggbb` when opaque, `rgba(...)` otherwise).
    pub fn to_css(&self) -> String {
        if self.a == 255 {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            format!(
                "rgba({}, {}, {}, {:.1})",
                self.r,
                self.g,
                self.b,
                f32::from(self.a) / 255.0
            )
        }
    }

    pub fn to_array(&self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}
