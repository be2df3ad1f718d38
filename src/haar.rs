//! Single-level 2D Haar wavelet transform.
//!
//! Each non-overlapping 2x2 pixel block `a b / c d` maps to one coefficient
//! in each of four sub-bands:
//!
//! ```text
//! approx     = (a + b + c + d) / 2
//! horizontal = (a + b - c - d) / 2
//! vertical   = (a - b + c - d) / 2
//! diagonal   = (a - b - c + d) / 2
//! ```
//!
//! The transform is orthonormal, so [`reconstruct`] applied to an untouched
//! [`Subbands`] returns the original image exactly; the only loss comes from
//! the final clamp-and-round back to 8 bits.

use image::GrayImage;
use ndarray::Array2;

use crate::error::{Error, Result};

/// The four half-resolution sub-bands of a single-level decomposition.
///
/// Every band has shape `(height / 2, width / 2)`, indexed `[row, col]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Subbands {
    /// Low-low approximation.
    pub approx: Array2<f64>,
    /// Horizontal detail (low-pass along rows, high-pass down columns).
    pub horizontal: Array2<f64>,
    /// Vertical detail (high-pass along rows, low-pass down columns).
    pub vertical: Array2<f64>,
    /// Diagonal detail, the least perceptually salient band.
    pub diagonal: Array2<f64>,
}

impl Subbands {
    /// Shape `(rows, cols)` shared by all four bands.
    #[must_use]
    pub fn dim(&self) -> (usize, usize) {
        self.approx.dim()
    }
}

/// Check the decomposition precondition: non-empty with even dimensions.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if either dimension is zero or odd.
pub fn check_decomposable(width: u32, height: u32) -> Result<()> {
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "image is empty ({width}x{height})"
        )));
    }
    if width % 2 != 0 || height % 2 != 0 {
        return Err(Error::InvalidInput(format!(
            "image dimensions must be even for the Haar transform: {width}x{height}"
        )));
    }
    Ok(())
}

/// Decompose an image into its four Haar sub-bands.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the image is empty or has an odd
/// dimension.
pub fn decompose(image: &GrayImage) -> Result<Subbands> {
    let (width, height) = image.dimensions();
    check_decomposable(width, height)?;

    let rows = (height / 2) as usize;
    let cols = (width / 2) as usize;
    let mut approx = Array2::zeros((rows, cols));
    let mut horizontal = Array2::zeros((rows, cols));
    let mut vertical = Array2::zeros((rows, cols));
    let mut diagonal = Array2::zeros((rows, cols));

    let px = |x: usize, y: usize| -> f64 {
        #[allow(clippy::cast_possible_truncation)]
        let (x, y) = (x as u32, y as u32);
        f64::from(image.get_pixel(x, y)[0])
    };

    for r in 0..rows {
        for c in 0..cols {
            let a = px(2 * c, 2 * r);
            let b = px(2 * c + 1, 2 * r);
            let cc = px(2 * c, 2 * r + 1);
            let d = px(2 * c + 1, 2 * r + 1);

            approx[[r, c]] = (a + b + cc + d) / 2.0;
            horizontal[[r, c]] = (a + b - cc - d) / 2.0;
            vertical[[r, c]] = (a - b + cc - d) / 2.0;
            diagonal[[r, c]] = (a - b - cc + d) / 2.0;
        }
    }

    Ok(Subbands {
        approx,
        horizontal,
        vertical,
        diagonal,
    })
}

/// Rebuild an 8-bit image from its sub-bands.
///
/// Reconstructed samples are clamped to `[0, 255]` and rounded to the
/// nearest integer. Out-of-range values are truncated, never wrapped.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if the bands are empty or do not all
/// share one shape.
pub fn reconstruct(bands: &Subbands) -> Result<GrayImage> {
    let (rows, cols) = bands.dim();
    if rows == 0 || cols == 0 {
        return Err(Error::InvalidInput("sub-bands are empty".to_string()));
    }
    for band in [&bands.horizontal, &bands.vertical, &bands.diagonal] {
        if band.dim() != (rows, cols) {
            return Err(Error::InvalidInput(format!(
                "sub-band shape {:?} does not match approximation shape {:?}",
                band.dim(),
                (rows, cols)
            )));
        }
    }

    let width = u32::try_from(cols * 2)
        .map_err(|_| Error::InvalidInput(format!("sub-band width {cols} too large")))?;
    let height = u32::try_from(rows * 2)
        .map_err(|_| Error::InvalidInput(format!("sub-band height {rows} too large")))?;
    let mut out = GrayImage::new(width, height);

    for r in 0..rows {
        for c in 0..cols {
            let ll = bands.approx[[r, c]];
            let lh = bands.horizontal[[r, c]];
            let hl = bands.vertical[[r, c]];
            let hh = bands.diagonal[[r, c]];

            let block = [
                (ll + lh + hl + hh) / 2.0,
                (ll + lh - hl - hh) / 2.0,
                (ll - lh + hl - hh) / 2.0,
                (ll - lh - hl + hh) / 2.0,
            ];
            #[allow(clippy::cast_possible_truncation)]
            let (x, y) = ((2 * c) as u32, (2 * r) as u32);
            out.put_pixel(x, y, image::Luma([to_u8(block[0])]));
            out.put_pixel(x + 1, y, image::Luma([to_u8(block[1])]));
            out.put_pixel(x, y + 1, image::Luma([to_u8(block[2])]));
            out.put_pixel(x + 1, y + 1, image::Luma([to_u8(block[3])]));
        }
    }

    Ok(out)
}

/// Clamp to `[0, 255]` and round half away from zero.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub(crate) fn to_u8(value: f64) -> u8 {
    value.clamp(0.0, 255.0).round() as u8
}

#[cfg(test)]
mod tests {
    use super::*;

    fn textured(width: u32, height: u32) -> GrayImage {
        GrayImage::from_fn(width, height, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let value = ((x * 37 + y * 91 + x * y) % 256) as u8;
            image::Luma([value])
        })
    }

    #[test]
    fn decompose_rejects_odd_and_empty_images() {
        assert!(matches!(
            decompose(&GrayImage::new(5, 4)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            decompose(&GrayImage::new(4, 7)),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            decompose(&GrayImage::new(0, 0)),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn decompose_produces_half_resolution_bands() {
        let bands = decompose(&textured(16, 10)).unwrap();
        assert_eq!(bands.dim(), (5, 8));
        assert_eq!(bands.diagonal.dim(), (5, 8));
    }

    #[test]
    fn single_block_coefficients() {
        let mut img = GrayImage::new(2, 2);
        img.put_pixel(0, 0, image::Luma([10]));
        img.put_pixel(1, 0, image::Luma([20]));
        img.put_pixel(0, 1, image::Luma([30]));
        img.put_pixel(1, 1, image::Luma([40]));

        let bands = decompose(&img).unwrap();
        assert!((bands.approx[[0, 0]] - 50.0).abs() < 1e-12);
        assert!((bands.horizontal[[0, 0]] + 20.0).abs() < 1e-12);
        assert!((bands.vertical[[0, 0]] + 10.0).abs() < 1e-12);
        assert!(bands.diagonal[[0, 0]].abs() < 1e-12);
    }

    #[test]
    fn constant_image_has_no_detail() {
        let img = GrayImage::from_pixel(8, 8, image::Luma([128]));
        let bands = decompose(&img).unwrap();
        assert!(bands.horizontal.iter().all(|v| v.abs() < 1e-12));
        assert!(bands.vertical.iter().all(|v| v.abs() < 1e-12));
        assert!(bands.diagonal.iter().all(|v| v.abs() < 1e-12));
        assert!(bands.approx.iter().all(|v| (v - 256.0).abs() < 1e-12));
    }

    #[test]
    fn round_trip_is_exact_for_unmodified_bands() {
        let img = textured(34, 22);
        let back = reconstruct(&decompose(&img).unwrap()).unwrap();
        assert_eq!(back.dimensions(), img.dimensions());
        for (a, b) in img.pixels().zip(back.pixels()) {
            assert!((i16::from(a[0]) - i16::from(b[0])).abs() <= 1);
        }
    }

    #[test]
    fn reconstruct_clamps_instead_of_wrapping() {
        let img = GrayImage::from_pixel(2, 2, image::Luma([250]));
        let mut bands = decompose(&img).unwrap();
        bands.approx[[0, 0]] += 40.0;
        let out = reconstruct(&bands).unwrap();
        assert!(out.pixels().all(|p| p[0] == 255));

        let img = GrayImage::from_pixel(2, 2, image::Luma([3]));
        let mut bands = decompose(&img).unwrap();
        bands.approx[[0, 0]] -= 40.0;
        let out = reconstruct(&bands).unwrap();
        assert!(out.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn reconstruct_rejects_mismatched_bands() {
        let mut bands = decompose(&textured(8, 8)).unwrap();
        bands.diagonal = Array2::zeros((3, 4));
        assert!(matches!(reconstruct(&bands), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn to_u8_rounds_to_nearest() {
        assert_eq!(to_u8(127.49), 127);
        assert_eq!(to_u8(127.5), 128);
        assert_eq!(to_u8(-3.0), 0);
        assert_eq!(to_u8(300.0), 255);
    }
}
