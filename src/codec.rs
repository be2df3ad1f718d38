//! Image codec boundary.
//!
//! All decoding funnels through here and is the only place colour is
//! dropped: everything past this module sees 8-bit grayscale.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use image::{GrayImage, ImageFormat};

use crate::error::{Error, Result};

/// Decode PNG/JPEG/... bytes into a grayscale image.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the bytes are not a readable image.
pub fn decode_gray(bytes: &[u8]) -> Result<GrayImage> {
    let img = image::load_from_memory(bytes).map_err(Error::Decode)?;
    Ok(img.to_luma8())
}

/// Load an image file as grayscale.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file cannot be read and [`Error::Decode`]
/// if it is not a readable image.
pub fn load_gray(path: &Path) -> Result<GrayImage> {
    let bytes = std::fs::read(path)?;
    decode_gray(&bytes)
}

/// Encode a grayscale image as PNG.
///
/// # Errors
///
/// Returns [`Error::Image`] if encoding fails.
pub fn encode_png(img: &GrayImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)?;
    Ok(buf.into_inner())
}

/// Drop the last row and/or column so both dimensions are even.
///
/// Returns the image unchanged when it is already even-sized.
#[must_use]
pub fn crop_to_even(img: GrayImage) -> GrayImage {
    let (w, h) = img.dimensions();
    let (even_w, even_h) = (w & !1, h & !1);
    if (even_w, even_h) == (w, h) {
        return img;
    }
    log::debug!("cropping {w}x{h} to {even_w}x{even_h}");
    image::imageops::crop_imm(&img, 0, 0, even_w, even_h).to_image()
}

/// Whether [`save_image`] keeps every sample intact in this format.
///
/// Watermarks only survive lossless storage. WebP counts as lossless
/// because the encoder only writes lossless WebP.
#[must_use]
pub fn is_lossless(format: ImageFormat) -> bool {
    matches!(
        format,
        ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff | ImageFormat::WebP
    )
}

/// Save a grayscale image, choosing the format from the file extension.
///
/// Lossy formats are written at maximum quality but still destroy the
/// watermark, so they are logged as a warning.
///
/// # Errors
///
/// Returns an error if the format is unsupported or writing fails.
pub fn save_image(img: &GrayImage, path: &Path) -> Result<()> {
    let format =
        ImageFormat::from_path(path).map_err(|e| Error::UnsupportedFormat(e.to_string()))?;

    if !is_lossless(format) {
        log::warn!(
            "{} uses lossy {format:?}; the watermark will not survive re-encoding",
            path.display()
        );
    }

    match format {
        ImageFormat::Jpeg => {
            let file = std::fs::File::create(path)?;
            let mut encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(file, 100);
            encoder.encode_image(img)?;
        }
        ImageFormat::Png | ImageFormat::Bmp | ImageFormat::Tiff | ImageFormat::WebP => {
            img.save_with_format(path, format)?;
        }
        _ => {
            return Err(Error::UnsupportedFormat(format!("{format:?}")));
        }
    }

    Ok(())
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "jpg" | "jpeg" | "png" | "webp" | "bmp" | "tif" | "tiff"
        ),
        None => false,
    }
}

/// Generate a default output path from an input path.
///
/// Example: `"photo.jpg"` becomes `"photo_watermarked.png"`. The output is
/// always PNG so the watermark survives.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_watermarked.png"))
}
