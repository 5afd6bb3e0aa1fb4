//! Box and draft-box data structures.

use serde::{Deserialize, Serialize};
use web_time::{SystemTime, UNIX_EPOCH};

use crate::constants::MAX_LABEL_CHARS;

/// Unique identifier for a box (milliseconds since the Unix epoch at creation).
pub type BoxId = u64;

/// A labeled rectangle over one character, in image pixel coordinates.
///
/// `width` and `height` are never negative once a box is stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabelBox {
    /// Unique identifier.
    pub id: BoxId,
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the box
    pub width: f32,
    /// Height of the box
    pub height: f32,
    /// Zero or one character.
    pub label: String,
}

impl LabelBox {
    /// Create an unlabeled box.
    pub fn new(id: BoxId, x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            id,
            x,
            y,
            width,
            height,
            label: String::new(),
        }
    }

    /// Builder-style label setter, truncating like [`LabelBox::set_label`].
    pub fn with_label(mut self, label: &str) -> Self {
        self.set_label(label);
        self
    }

    /// Check if a point is inside the box (edges included).
    pub fn contains(&self, px: f32, py: f32) -> bool {
        px >= self.x && px <= self.x + self.width && py >= self.y && py <= self.y + self.height
    }

    /// Overwrite the label with at most [`MAX_LABEL_CHARS`] characters of `text`.
    pub fn set_label(&mut self, text: &str) {
        self.label = text.chars().take(MAX_LABEL_CHARS).collect();
    }

    pub fn is_labeled(&self) -> bool {
        !self.label.is_empty()
    }
}

/// The rectangle being dragged out by the pointer.
///
/// Width and height are signed deltas from the anchor and may be negative
/// while the drag is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DraftBox {
    pub anchor_x: f32,
    pub anchor_y: f32,
    pub width: f32,
    pub height: f32,
}

impl DraftBox {
    /// Start a zero-sized draft at the press position.
    pub fn at(anchor_x: f32, anchor_y: f32) -> Self {
        Self {
            anchor_x,
            anchor_y,
            width: 0.0,
            height: 0.0,
        }
    }

    /// Stretch the draft so its far corner sits at the pointer.
    pub fn drag_to(&mut self, px: f32, py: f32) {
        self.width = px - self.anchor_x;
        self.height = py - self.anchor_y;
    }

    /// Whether both dimensions exceed `min_size` in absolute value.
    pub fn exceeds(&self, min_size: f32) -> bool {
        self.width.abs() > min_size && self.height.abs() > min_size
    }

    /// Top-left origin and non-negative size, shifting the anchor for
    /// negative deltas.
    pub fn normalized(&self) -> (f32, f32, f32, f32) {
        let (x, width) = if self.width < 0.0 {
            (self.anchor_x + self.width, -self.width)
        } else {
            (self.anchor_x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.anchor_y + self.height, -self.height)
        } else {
            (self.anchor_y, self.height)
        };
        (x, y, width, height)
    }

    /// Commit the draft as a box if it is large enough.
    pub fn commit(&self, id: BoxId, min_size: f32) -> Option<LabelBox> {
        if !self.exceeds(min_size) {
            return None;
        }
        let (x, y, width, height) = self.normalized();
        Some(LabelBox::new(id, x, y, width, height))
    }
}

/// Hands out box ids from the wall clock, never repeating or going backwards.
#[derive(Debug, Clone, Default)]
pub struct BoxIdGenerator {
    last: BoxId,
}

impl BoxIdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Next id: the current time in milliseconds, or one past the previous id
    /// when the clock has not advanced.
    pub fn next_id(&mut self) -> BoxId {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as BoxId)
            .unwrap_or(0);
        self.last = now.max(self.last + 1);
        self.last
    }
}
