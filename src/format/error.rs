//! Error types for box-file export.

use thiserror::Error;

/// Errors that can occur while writing a box file.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
