//! Embed a rendered text bitmap into the diagonal detail band.
//!
//! `diagonal' = diagonal + EMBED_STRENGTH * bitmap`, where the bitmap is
//! rendered at full resolution and bilinearly halved to sub-band size.

use image::GrayImage;
use ndarray::Array2;

use crate::error::{Error, Result};
use crate::haar;
use crate::metrics::{self, Metrics, SSIM_WINDOW};
use crate::render;
use crate::resample;

/// Perturbation weight applied to the bitmap before it is added to the
/// diagonal band.
pub const EMBED_STRENGTH: f64 = 0.02;

/// A watermarked image together with its fidelity against the original.
#[derive(Debug, Clone)]
pub struct Embedded {
    /// The watermarked image, same size as the input.
    pub image: GrayImage,
    /// Fidelity of `image` relative to the original.
    pub metrics: Metrics,
}

/// Embed `text` into `image`.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `text` is empty, or if the image is
/// empty, has an odd dimension, or is smaller than the SSIM window.
pub fn embed(image: &GrayImage, text: &str) -> Result<Embedded> {
    let (width, height) = image.dimensions();
    haar::check_decomposable(width, height)?;
    if text.is_empty() {
        return Err(Error::InvalidInput("watermark text is empty".to_string()));
    }
    if width < SSIM_WINDOW || height < SSIM_WINDOW {
        return Err(Error::InvalidInput(format!(
            "image too small ({width}x{height}) to measure, need at least {SSIM_WINDOW}x{SSIM_WINDOW}"
        )));
    }

    let bitmap = render::render(text, width, height)?;
    let mut bands = haar::decompose(image)?;
    let (rows, cols) = bands.dim();
    let projected = resample::resize_bilinear(&to_plane(&bitmap), rows, cols);
    log::debug!(
        "embedding {:?} into {width}x{height} image, diagonal band {rows}x{cols}",
        text
    );

    bands.diagonal.scaled_add(EMBED_STRENGTH, &projected);
    let watermarked = haar::reconstruct(&bands)?;
    let metrics = metrics::compute(image, &watermarked)?;
    log::debug!(
        "psnr={:.2} dB ssim={:.4} mse={:.4}",
        metrics.psnr,
        metrics.ssim,
        metrics.mse
    );

    Ok(Embedded {
        image: watermarked,
        metrics,
    })
}

/// Lift an 8-bit image into a `(height, width)` real-valued plane.
pub(crate) fn to_plane(image: &GrayImage) -> Array2<f64> {
    let (width, height) = image.dimensions();
    Array2::from_shape_fn((height as usize, width as usize), |(r, c)| {
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = (c as u32, r as u32);
        f64::from(image.get_pixel(x, y)[0])
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_text() {
        let img = GrayImage::from_pixel(32, 32, image::Luma([128]));
        assert!(matches!(embed(&img, ""), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn rejects_undecomposable_images() {
        let odd = GrayImage::from_pixel(33, 32, image::Luma([128]));
        assert!(matches!(embed(&odd, "A"), Err(Error::InvalidInput(_))));
        let empty = GrayImage::new(0, 0);
        assert!(matches!(embed(&empty, "A"), Err(Error::InvalidInput(_))));
        let tiny = GrayImage::from_pixel(4, 4, image::Luma([128]));
        assert!(matches!(embed(&tiny, "A"), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn only_the_diagonal_band_changes() {
        let img = GrayImage::from_pixel(64, 64, image::Luma([128]));
        let out = embed(&img, "HI").unwrap();
        let before = haar::decompose(&img).unwrap();
        let after = haar::decompose(&out.image).unwrap();

        // Other bands only pick up 8-bit rounding error: at most 0.5 per
        // pixel, so at most 1.0 per coefficient.
        for (b, a) in [
            (&before.approx, &after.approx),
            (&before.horizontal, &after.horizontal),
            (&before.vertical, &after.vertical),
        ] {
            assert!(b.iter().zip(a.iter()).all(|(x, y)| (x - y).abs() <= 1.0));
        }
        let max_diag = before
            .diagonal
            .iter()
            .zip(after.diagonal.iter())
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max);
        assert!(max_diag >= 4.0, "diagonal barely moved: {max_diag}");
    }

    #[test]
    fn output_keeps_input_size_and_reports_metrics() {
        let img = GrayImage::from_fn(96, 64, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let value = (60 + (x + y) % 120) as u8;
            image::Luma([value])
        });
        let out = embed(&img, "WM").unwrap();
        assert_eq!(out.image.dimensions(), img.dimensions());
        assert!(out.metrics.mse > 0.0);
        assert!(out.metrics.psnr > 30.0);
        assert!(out.metrics.ssim > 0.9);
    }

    #[test]
    fn to_plane_is_row_major() {
        let mut img = GrayImage::new(3, 2);
        img.put_pixel(2, 1, image::Luma([9]));
        let plane = to_plane(&img);
        assert_eq!(plane.dim(), (2, 3));
        assert!((plane[[1, 2]] - 9.0).abs() < f64::EPSILON);
    }
}
