//! Fidelity metrics between an original and a watermarked image.
//!
//! - **MSE**: mean of squared per-pixel differences.
//! - **PSNR**: `20 * log10(255 / sqrt(MSE))`, or [`PSNR_IDENTICAL`] when the
//!   images are bit-identical.
//! - **SSIM**: mean structural similarity over every fully contained 7x7
//!   uniform window (`K1 = 0.01`, `K2 = 0.03`, `L = 255`, sample covariance).

use image::GrayImage;
use serde::Serialize;

use crate::error::{ensure_same_shape, Error, Result};

/// PSNR reported for identical images, where the true value is infinite.
pub const PSNR_IDENTICAL: f64 = 100.0;

/// Side length of the SSIM window.
pub const SSIM_WINDOW: u32 = 7;

const DATA_RANGE: f64 = 255.0;
const K1: f64 = 0.01;
const K2: f64 = 0.03;

/// Quality of a watermarked image relative to its original.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Metrics {
    /// Peak signal-to-noise ratio in dB.
    pub psnr: f64,
    /// Structural similarity in `[-1, 1]`.
    pub ssim: f64,
    /// Mean squared error, `>= 0`.
    pub mse: f64,
}

/// Compute PSNR, SSIM and MSE in one call.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the images differ in size and
/// [`Error::InvalidInput`] if they are smaller than the SSIM window.
pub fn compute(original: &GrayImage, watermarked: &GrayImage) -> Result<Metrics> {
    let mse = mse(original, watermarked)?;
    Ok(Metrics {
        psnr: psnr_from_mse(mse),
        ssim: ssim(original, watermarked)?,
        mse,
    })
}

/// Mean squared error.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the images differ in size and
/// [`Error::InvalidInput`] if they are empty.
pub fn mse(a: &GrayImage, b: &GrayImage) -> Result<f64> {
    ensure_same_shape(a.dimensions(), b.dimensions())?;
    if a.width() == 0 || a.height() == 0 {
        return Err(Error::InvalidInput("cannot compare empty images".to_string()));
    }

    let sum: f64 = a
        .as_raw()
        .iter()
        .zip(b.as_raw())
        .map(|(&x, &y)| {
            let d = f64::from(x) - f64::from(y);
            d * d
        })
        .sum();
    #[allow(clippy::cast_precision_loss)]
    let count = a.as_raw().len() as f64;
    Ok(sum / count)
}

/// Peak signal-to-noise ratio in dB.
///
/// # Errors
///
/// Same as [`mse`].
pub fn psnr(a: &GrayImage, b: &GrayImage) -> Result<f64> {
    mse(a, b).map(psnr_from_mse)
}

fn psnr_from_mse(mse: f64) -> f64 {
    if mse == 0.0 {
        PSNR_IDENTICAL
    } else {
        20.0 * (DATA_RANGE / mse.sqrt()).log10()
    }
}

/// Mean structural similarity over 7x7 uniform windows.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the images differ in size and
/// [`Error::InvalidInput`] if either dimension is below [`SSIM_WINDOW`].
#[allow(clippy::cast_precision_loss)]
pub fn ssim(a: &GrayImage, b: &GrayImage) -> Result<f64> {
    ensure_same_shape(a.dimensions(), b.dimensions())?;
    let (width, height) = a.dimensions();
    if width < SSIM_WINDOW || height < SSIM_WINDOW {
        return Err(Error::InvalidInput(format!(
            "SSIM needs at least {SSIM_WINDOW}x{SSIM_WINDOW} pixels, got {width}x{height}"
        )));
    }

    let tables = IntegralTables::new(a, b);
    let win = SSIM_WINDOW as usize;
    let n = (win * win) as f64;
    let cov_norm = n / (n - 1.0);
    let c1 = (K1 * DATA_RANGE).powi(2);
    let c2 = (K2 * DATA_RANGE).powi(2);

    let rows = height as usize - win + 1;
    let cols = width as usize - win + 1;
    let mut total = 0.0;

    for y in 0..rows {
        for x in 0..cols {
            let [sx, sy, sxx, syy, sxy] = tables.window(x, y, win);
            let ux = sx / n;
            let uy = sy / n;
            let vx = cov_norm * (sxx / n - ux * ux);
            let vy = cov_norm * (syy / n - uy * uy);
            let vxy = cov_norm * (sxy / n - ux * uy);

            let num = (2.0 * ux * uy + c1) * (2.0 * vxy + c2);
            let den = (ux * ux + uy * uy + c1) * (vx + vy + c2);
            total += num / den;
        }
    }

    Ok(total / (rows * cols) as f64)
}

/// Summed-area tables of `x`, `y`, `x^2`, `y^2` and `x*y`.
struct IntegralTables {
    stride: usize,
    sums: Vec<[f64; 5]>,
}

impl IntegralTables {
    fn new(a: &GrayImage, b: &GrayImage) -> Self {
        let (width, height) = (a.width() as usize, a.height() as usize);
        let stride = width + 1;
        let mut sums = vec![[0.0; 5]; stride * (height + 1)];

        for y in 0..height {
            let mut row = [0.0; 5];
            for x in 0..width {
                let i = y * width + x;
                let va = f64::from(a.as_raw()[i]);
                let vb = f64::from(b.as_raw()[i]);
                let terms = [va, vb, va * va, vb * vb, va * vb];
                let above = sums[y * stride + x + 1];
                let cell = &mut sums[(y + 1) * stride + x + 1];
                for (k, term) in terms.iter().enumerate() {
                    row[k] += term;
                    cell[k] = above[k] + row[k];
                }
            }
        }

        Self { stride, sums }
    }

    fn window(&self, x: usize, y: usize, size: usize) -> [f64; 5] {
        let at = |xx: usize, yy: usize| self.sums[yy * self.stride + xx];
        let (tl, tr) = (at(x, y), at(x + size, y));
        let (bl, br) = (at(x, y + size), at(x + size, y + size));
        std::array::from_fn(|k| br[k] - bl[k] - tr[k] + tl[k])
    }
}

/// Zero-mean normalized cross-correlation of two equal-sized images.
///
/// Returns 0.0 when either image is constant.
///
/// # Errors
///
/// Returns [`Error::ShapeMismatch`] if the images differ in size.
pub fn normalized_cross_correlation(a: &GrayImage, b: &GrayImage) -> Result<f64> {
    ensure_same_shape(a.dimensions(), b.dimensions())?;
    #[allow(clippy::cast_precision_loss)]
    let n = a.as_raw().len() as f64;
    if n < 1.0 {
        return Ok(0.0);
    }

    let mean_a = a.as_raw().iter().map(|&v| f64::from(v)).sum::<f64>() / n;
    let mean_b = b.as_raw().iter().map(|&v| f64::from(v)).sum::<f64>() / n;

    let mut numerator = 0.0_f64;
    let mut denom_a = 0.0_f64;
    let mut denom_b = 0.0_f64;

    for (&va, &vb) in a.as_raw().iter().zip(b.as_raw()) {
        let da = f64::from(va) - mean_a;
        let db = f64::from(vb) - mean_b;
        numerator += da * db;
        denom_a += da * da;
        denom_b += db * db;
    }

    let denom = (denom_a * denom_b).sqrt();
    if denom < 1e-10 {
        Ok(0.0)
    } else {
        Ok(numerator / denom)
    }
}
