//! Box-file export.
//!
//! Converts an image's boxes into Tesseract's `.box` training format. The
//! session produces a [`BoxFile`]; the platform layer either writes it to disk
//! (native) or offers it as a download (browser).
//!
//! ## Usage
//!
//! ```rust,ignore
//! use ocrbox::format::TesseractBoxFormat;
//!
//! let file = TesseractBoxFormat.export("page.png", image_height, &boxes);
//! file.write_to(Path::new("out"))?;
//! ```

mod error;
mod tesseract;

pub use error::FormatError;
pub use tesseract::{
    BOX_EXTENSION, BOX_MEDIA_TYPE, BoxFile, BoxRow, TesseractBoxFormat, round_half_up,
};
