//! Deterministic bilinear resizing of real-valued planes.
//!
//! Uses half-pixel-centre mapping (`src = (dst + 0.5) * scale - 0.5`) and
//! clamps sample coordinates to the source edge, so an exact 2x downscale
//! averages each 2x2 block and upscaling never reads outside the source.

use ndarray::Array2;

/// Resize `src` to `(rows, cols)` with bilinear interpolation.
///
/// Values are not clamped, so negative or >255 inputs survive resizing.
/// An empty source or target yields an all-zero array of the target shape.
#[must_use]
pub fn resize_bilinear(src: &Array2<f64>, rows: usize, cols: usize) -> Array2<f64> {
    let (src_rows, src_cols) = src.dim();
    if src_rows == 0 || src_cols == 0 || rows == 0 || cols == 0 {
        return Array2::zeros((rows, cols));
    }
    if (src_rows, src_cols) == (rows, cols) {
        return src.clone();
    }

    #[allow(clippy::cast_precision_loss)]
    let scale_y = src_rows as f64 / rows as f64;
    #[allow(clippy::cast_precision_loss)]
    let scale_x = src_cols as f64 / cols as f64;

    let ys: Vec<(usize, usize, f64)> = (0..rows)
        .map(|r| axis_sample(r, scale_y, src_rows))
        .collect();
    let xs: Vec<(usize, usize, f64)> = (0..cols)
        .map(|c| axis_sample(c, scale_x, src_cols))
        .collect();

    Array2::from_shape_fn((rows, cols), |(r, c)| {
        let (y0, y1, fy) = ys[r];
        let (x0, x1, fx) = xs[c];
        let top = src[[y0, x0]] * (1.0 - fx) + src[[y0, x1]] * fx;
        let bottom = src[[y1, x0]] * (1.0 - fx) + src[[y1, x1]] * fx;
        top * (1.0 - fy) + bottom * fy
    })
}

/// Source indices and blend weight for destination index `i` along one axis.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn axis_sample(i: usize, scale: f64, len: usize) -> (usize, usize, f64) {
    let max = (len - 1) as f64;
    let pos = ((i as f64 + 0.5) * scale - 0.5).clamp(0.0, max);
    let lo = pos.floor();
    let i0 = lo as usize;
    let i1 = (i0 + 1).min(len - 1);
    (i0, i1, pos - lo)
}
