//! Loaded image records.

use std::sync::Arc;

use crate::model::LabelBox;
use crate::resource::ResourceHandle;

/// An uploaded image together with its stored boxes.
///
/// Owns the displayable resource handle; the session releases it when the
/// image is removed or the session ends.
#[derive(Debug)]
pub struct LabeledImage {
    /// Original file name of the upload.
    pub name: String,
    /// Media type reported for the upload (e.g. `image/png`).
    pub media_type: String,
    /// Raw bytes of the upload.
    pub source: Arc<[u8]>,
    /// Displayable resource handle.
    pub handle: ResourceHandle,
    /// Intrinsic pixel width.
    pub width: u32,
    /// Intrinsic pixel height.
    pub height: u32,
    /// Boxes persisted for this image.
    pub boxes: Vec<LabelBox>,
}

impl LabeledImage {
    /// File name without its final extension.
    pub fn base_name(&self) -> &str {
        base_name(&self.name)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Strip the final `.ext` from a file name. Names without a dot, or whose only
/// dot is the leading one, are returned unchanged.
///
/// A plain "strip the last extension" would turn `.hidden` into an empty base
/// name and export a file called `.box`; here it exports `.hidden.box`.
pub fn base_name(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx > 0 && idx + 1 < name.len() => &name[..idx],
        _ => name,
    }
}
