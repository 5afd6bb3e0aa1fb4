//! Per-file errors raised by the labeling session.

use thiserror::Error;

use crate::probe::ProbeError;

/// Errors for a single image file. None of them are fatal to the session.
#[derive(Error, Debug)]
pub enum SessionError {
    /// The upload's media type is not `image/*`
    #[error("Please upload only image files ('{name}' is {media_type})")]
    UnsupportedFile {
        /// File name of the rejected upload
        name: String,
        /// Media type that was reported for it
        media_type: String,
    },

    /// The image's dimensions could not be determined
    #[error("Failed to load image: {name}")]
    ProbeFailed {
        /// File name of the image
        name: String,
        /// Underlying probe failure
        #[source]
        source: ProbeError,
    },
}

impl SessionError {
    /// Name of the file the error relates to.
    pub fn file_name(&self) -> &str {
        match self {
            SessionError::UnsupportedFile { name, .. } | SessionError::ProbeFailed { name, .. } => {
                name
            }
        }
    }
}
