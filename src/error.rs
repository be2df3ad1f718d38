//! Error types for the dwt-text-watermark crate.

/// Errors that can occur while embedding, extracting or measuring watermarks.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Malformed input rejected before any transform runs: empty or
    /// odd-sized image, empty watermark text, zero render size.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Two images that must share a shape do not.
    #[error("shape mismatch: {}x{} vs {}x{}", left.0, left.1, right.0, right.1)]
    ShapeMismatch {
        /// `(width, height)` of the first image.
        left: (u32, u32),
        /// `(width, height)` of the second image.
        right: (u32, u32),
    },

    /// The input bytes could not be decoded as an image.
    #[error("failed to decode image: {0}")]
    Decode(image::ImageError),

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The image format is not supported.
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),

    /// An error occurred while encoding or saving an image.
    #[error("image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// The text recognizer failed or produced unreadable output.
    #[error("OCR failed: {0}")]
    Ocr(String),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Fail with [`Error::ShapeMismatch`] unless both images share `(width, height)`.
pub(crate) fn ensure_same_shape(left: (u32, u32), right: (u32, u32)) -> Result<()> {
    if left == right {
        Ok(())
    } else {
        Err(Error::ShapeMismatch { left, right })
    }
}
