//! Recover the embedded bitmap by differencing diagonal bands.
//!
//! `bitmap = (diagonal_watermarked - diagonal_original) / EMBED_STRENGTH`,
//! bilinearly resized back to full resolution and clamped to `[0, 255]`.
//! Because the strength is small, any lossy step between embedding and
//! extraction is amplified by `1 / EMBED_STRENGTH` in the result.

use image::{GrayImage, Luma};
use ndarray::Array2;

use crate::embed::EMBED_STRENGTH;
use crate::error::{ensure_same_shape, Result};
use crate::haar::{self, to_u8};
use crate::resample;

/// Recover the raw watermark bitmap from a watermarked/original pair.
///
/// The result has the original image's size and is meant for OCR or
/// diagnostic display.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`](crate::Error::InvalidInput) if either
/// image is empty or odd-sized, and
/// [`Error::ShapeMismatch`](crate::Error::ShapeMismatch) if the two
/// images differ in size.
pub fn extract(watermarked: &GrayImage, original: &GrayImage) -> Result<GrayImage> {
    let diff = extract_raw(watermarked, original)?;
    let (width, height) = original.dimensions();
    let full = resample::resize_bilinear(&diff, height as usize, width as usize);

    Ok(GrayImage::from_fn(width, height, |x, y| {
        Luma([to_u8(full[[y as usize, x as usize]])])
    }))
}

/// Scaled diagonal-band difference at sub-band resolution, unclamped.
///
/// # Errors
///
/// Same as [`extract`].
pub fn extract_raw(watermarked: &GrayImage, original: &GrayImage) -> Result<Array2<f64>> {
    haar::check_decomposable(watermarked.width(), watermarked.height())?;
    haar::check_decomposable(original.width(), original.height())?;
    ensure_same_shape(watermarked.dimensions(), original.dimensions())?;

    let marked = haar::decompose(watermarked)?;
    let base = haar::decompose(original)?;
    log::debug!("differencing diagonal bands of shape {:?}", base.dim());

    Ok((marked.diagonal - base.diagonal) / EMBED_STRENGTH)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::embed::embed;
    use crate::error::Error;

    #[test]
    fn identical_pair_recovers_blank_bitmap() {
        let img = GrayImage::from_fn(32, 32, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let value = (x * 8 + y) as u8;
            Luma([value])
        });
        let out = extract(&img, &img).unwrap();
        assert_eq!(out.dimensions(), (32, 32));
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn recovers_strokes_where_text_was_drawn() {
        let img = GrayImage::from_pixel(128, 64, Luma([128]));
        let marked = embed(&img, "T").unwrap().image;
        let out = extract(&marked, &img).unwrap();

        // The T's crossbar sits 21 px above the baseline (y = 33).
        let bar: u32 = (12..22).map(|x| u32::from(out.get_pixel(x, 33)[0])).sum();
        assert!(bar > 10 * 100, "crossbar too faint: {bar}");
        // Far from the text nothing is recovered.
        assert!(out.get_pixel(100, 5)[0] == 0);
    }

    #[test]
    fn raw_difference_can_be_negative() {
        let original = GrayImage::from_pixel(4, 4, Luma([128]));
        let mut tampered = original.clone();
        tampered.put_pixel(1, 0, Luma([140]));
        let raw = extract_raw(&tampered, &original).unwrap();
        assert!(raw[[0, 0]] < 0.0);
        assert!(extract(&tampered, &original).unwrap().pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn rejects_mismatched_and_odd_inputs() {
        let a = GrayImage::new(16, 16);
        let b = GrayImage::new(16, 18);
        assert!(matches!(extract(&a, &b), Err(Error::ShapeMismatch { .. })));
        let odd = GrayImage::new(15, 16);
        assert!(matches!(extract(&odd, &a), Err(Error::InvalidInput(_))));
        assert!(matches!(extract(&a, &odd), Err(Error::InvalidInput(_))));
    }
}
