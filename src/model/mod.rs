//! Data models for the OCR box labeler.

mod image;
mod label_box;

pub use self::image::{LabeledImage, base_name};
pub use label_box::{BoxId, BoxIdGenerator, DraftBox, LabelBox};
