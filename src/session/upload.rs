//! Upload inputs and results.

use std::sync::Arc;

use crate::session::SessionError;

/// A user-selected file.
#[derive(Debug, Clone)]
pub struct UploadFile {
    /// File name as selected (no directory components).
    pub name: String,
    /// Media type reported by the picker (e.g. `image/png`).
    pub media_type: String,
    /// Raw file contents.
    pub bytes: Arc<[u8]>,
}

impl UploadFile {
    pub fn new(name: impl Into<String>, media_type: impl Into<String>, bytes: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            media_type: media_type.into(),
            bytes: bytes.into(),
        }
    }

    /// Read a file from disk, guessing its media type from the extension.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_path(path: &std::path::Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unnamed")
            .to_string();
        let media_type = crate::probe::media_type_for_name(&name);
        Ok(Self::new(name, media_type, bytes))
    }

    pub fn is_image(&self) -> bool {
        self.media_type.starts_with("image/")
    }
}

/// Outcome of one upload batch.
#[derive(Debug, Default)]
pub struct UploadReport {
    /// Number of images appended to the session.
    pub accepted: usize,
    /// Files that were skipped, in selection order.
    pub errors: Vec<SessionError>,
}

impl UploadReport {
    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}
