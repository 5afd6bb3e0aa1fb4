//! Image dimension probing.
//!
//! Only the image header is read; pixels are never decoded.

use std::io::Cursor;

use image::ImageReader;
use thiserror::Error;

/// Errors reported while probing an image's size.
#[derive(Error, Debug)]
pub enum ProbeError {
    /// The bytes are not a readable image
    #[error("Unreadable image: {0}")]
    Image(#[from] image::ImageError),

    /// I/O error while sniffing the format
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The image reports a zero width or height
    #[error("Image has no pixels ({width}x{height})")]
    ZeroSized { width: u32, height: u32 },
}

/// Reports the intrinsic pixel size of an image.
pub trait DimensionProbe {
    fn probe(&self, bytes: &[u8]) -> Result<(u32, u32), ProbeError>;
}

/// Probe backed by the `image` crate's header readers.
#[derive(Debug, Clone, Copy, Default)]
pub struct HeaderProbe;

impl DimensionProbe for HeaderProbe {
    fn probe(&self, bytes: &[u8]) -> Result<(u32, u32), ProbeError> {
        let (width, height) = ImageReader::new(Cursor::new(bytes))
            .with_guessed_format()?
            .into_dimensions()?;

        if width == 0 || height == 0 {
            return Err(ProbeError::ZeroSized { width, height });
        }

        log::trace!("Probed image: {}x{}", width, height);
        Ok((width, height))
    }
}

/// Guess an upload's media type from its file name.
///
/// Returns `application/octet-stream` for unknown extensions so the caller's
/// `image/*` filter rejects it.
pub fn media_type_for_name(name: &str) -> &'static str {
    image::ImageFormat::from_path(name)
        .map(|format| format.to_mime_type())
        .unwrap_or("application/octet-stream")
}
