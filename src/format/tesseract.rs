//! Tesseract box-file format.
//!
//! One row per labeled box: `<char> <left> <bottom> <right> <top> <page>`,
//! integer pixel coordinates with the vertical origin at the image's bottom
//! edge. The page is always 0.

use std::path::{Path, PathBuf};

use crate::format::error::FormatError;
use crate::model::{LabelBox, base_name};

/// File extension of Tesseract box files.
pub const BOX_EXTENSION: &str = "box";

/// Media type used when offering a box file for download.
pub const BOX_MEDIA_TYPE: &str = "text/plain";

/// A box converted to Tesseract coordinates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxRow {
    pub label: String,
    pub left: i64,
    pub bottom: i64,
    pub right: i64,
    pub top: i64,
    pub page: u32,
}

impl BoxRow {
    /// Convert an image-space box on an image `image_height` pixels tall.
    pub fn from_box(b: &LabelBox, image_height: u32) -> Self {
        let h = image_height as f32;
        Self {
            label: b.label.clone(),
            left: round_half_up(b.x),
            bottom: round_half_up(h - (b.y + b.height)),
            right: round_half_up(b.x + b.width),
            top: round_half_up(h - b.y),
            page: 0,
        }
    }
}

impl std::fmt::Display for BoxRow {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.label, self.left, self.bottom, self.right, self.top, self.page
        )
    }
}

/// Round to the nearest integer, halves toward positive infinity.
pub fn round_half_up(v: f32) -> i64 {
    (f64::from(v) + 0.5).floor() as i64
}

/// A serialized box file ready to be written or downloaded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoxFile {
    /// `<image base name>.box`
    pub filename: String,
    /// Rows joined by `\n`.
    pub content: String,
    /// Number of rows written.
    pub rows_exported: usize,
    /// Boxes left out because they carry no label.
    pub skipped_unlabeled: usize,
    /// Boxes left out because their label is whitespace, which would split
    /// the row into the wrong number of fields.
    pub skipped_whitespace: usize,
}

impl BoxFile {
    /// Write the file into `dir`, returning the full path.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, FormatError> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.content)?;
        log::info!(
            "Wrote {} rows to {:?} ({} unlabeled skipped)",
            self.rows_exported,
            path,
            self.skipped_unlabeled
        );
        Ok(path)
    }
}

/// Tesseract `.box` exporter.
#[derive(Debug, Clone, Copy, Default)]
pub struct TesseractBoxFormat;

impl TesseractBoxFormat {
    /// Output file name for an image: its base name plus `.box`.
    pub fn filename_for(&self, image_name: &str) -> String {
        format!("{}.{}", base_name(image_name), BOX_EXTENSION)
    }

    /// Convert the writable boxes, in order, to rows. Unlabeled boxes and
    /// boxes labeled with whitespace are skipped.
    pub fn rows(&self, boxes: &[LabelBox], image_height: u32) -> Vec<BoxRow> {
        boxes
            .iter()
            .filter(|b| b.is_labeled())
            .filter(|b| {
                let writable = !b.label.chars().any(char::is_whitespace);
                if !writable {
                    log::warn!("Skipping box {} with whitespace label {:?}", b.id, b.label);
                }
                writable
            })
            .map(|b| BoxRow::from_box(b, image_height))
            .collect()
    }

    /// Serialize an image's boxes into a box file.
    pub fn export(&self, image_name: &str, image_height: u32, boxes: &[LabelBox]) -> BoxFile {
        let rows = self.rows(boxes, image_height);
        let content = rows
            .iter()
            .map(BoxRow::to_string)
            .collect::<Vec<_>>()
            .join("\n");

        let skipped_unlabeled = boxes.iter().filter(|b| !b.is_labeled()).count();
        let file = BoxFile {
            filename: self.filename_for(image_name),
            content,
            rows_exported: rows.len(),
            skipped_unlabeled,
            skipped_whitespace: boxes.len() - rows.len() - skipped_unlabeled,
        };

        log::info!(
            "Exported {} with {} rows ({} unlabeled skipped)",
            file.filename,
            file.rows_exported,
            file.skipped_unlabeled
        );

        file
    }
}
