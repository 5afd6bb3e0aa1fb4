//! OCRBOX - OCR bounding-box labeler
//!
//! Draw boxes around characters in uploaded images, label each with a single
//! character, and export Tesseract `.box` training files. Runs in the browser
//! (wasm32) or as a native, line-driven tool.

pub mod config;
pub mod constants;
pub mod format;
pub mod logging;
pub mod model;
pub mod probe;
pub mod render;
pub mod resource;
pub mod session;
pub mod viewport;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;

pub use format::{BoxFile, TesseractBoxFormat};
pub use session::{LabelingSession, PointerEvent, UploadFile};

// WASM entry point
#[cfg(target_arch = "wasm32")]
mod wasm;
#[cfg(target_arch = "wasm32")]
mod wasm_file;

#[cfg(target_arch = "wasm32")]
pub use wasm::*;
