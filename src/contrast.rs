//! Contrast-limited adaptive histogram equalization (CLAHE).
//!
//! Recovered bitmaps are often faint and uneven; equalizing them tile by
//! tile before OCR makes the strokes stand out. Each tile gets its own
//! clipped-histogram lookup table and pixels blend the four nearest tables
//! bilinearly, so there are no seams at tile borders.

use image::{GrayImage, Luma};

/// Histogram clip limit, relative to a flat histogram.
pub const CLIP_LIMIT: f64 = 3.0;

/// Number of tiles along each axis.
pub const TILE_GRID: u32 = 8;

/// Equalize `image` with [`CLIP_LIMIT`] over a [`TILE_GRID`] x [`TILE_GRID`] grid.
#[must_use]
pub fn clahe(image: &GrayImage) -> GrayImage {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return image.clone();
    }
    let tiles_x = TILE_GRID.min(width) as usize;
    let tiles_y = TILE_GRID.min(height) as usize;

    let x_bounds = tile_bounds(width as usize, tiles_x);
    let y_bounds = tile_bounds(height as usize, tiles_y);

    let mut luts = Vec::with_capacity(tiles_x * tiles_y);
    for ty in 0..tiles_y {
        for tx in 0..tiles_x {
            luts.push(tile_lut(
                image,
                (x_bounds[tx], x_bounds[tx + 1]),
                (y_bounds[ty], y_bounds[ty + 1]),
            ));
        }
    }

    #[allow(clippy::cast_precision_loss)]
    let tile_w = width as f64 / tiles_x as f64;
    #[allow(clippy::cast_precision_loss)]
    let tile_h = height as f64 / tiles_y as f64;

    GrayImage::from_fn(width, height, |x, y| {
        let (tx0, tx1, fx) = neighbours(x, tile_w, tiles_x);
        let (ty0, ty1, fy) = neighbours(y, tile_h, tiles_y);
        let v = image.get_pixel(x, y)[0] as usize;

        let lut = |tx: usize, ty: usize| luts[ty * tiles_x + tx][v];
        let top = lut(tx0, ty0) * (1.0 - fx) + lut(tx1, ty0) * fx;
        let bottom = lut(tx0, ty1) * (1.0 - fx) + lut(tx1, ty1) * fx;
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = (top * (1.0 - fy) + bottom * fy).round().clamp(0.0, 255.0) as u8;
        Luma([value])
    })
}

/// Split `len` pixels into `tiles` contiguous spans; returns `tiles + 1` edges.
fn tile_bounds(len: usize, tiles: usize) -> Vec<usize> {
    (0..=tiles).map(|i| i * len / tiles).collect()
}

/// The two tile centres surrounding pixel `p` and the blend weight between them.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn neighbours(p: u32, tile_size: f64, tiles: usize) -> (usize, usize, f64) {
    let pos = ((f64::from(p) + 0.5) / tile_size - 0.5).clamp(0.0, (tiles - 1) as f64);
    let lo = pos.floor();
    let t0 = lo as usize;
    (t0, (t0 + 1).min(tiles - 1), pos - lo)
}

/// Clipped, redistributed cumulative histogram of one tile, scaled to `[0, 255]`.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss
)]
fn tile_lut(image: &GrayImage, (x0, x1): (usize, usize), (y0, y1): (usize, usize)) -> [f64; 256] {
    let mut hist = [0u32; 256];
    for y in y0..y1 {
        for x in x0..x1 {
            hist[image.get_pixel(x as u32, y as u32)[0] as usize] += 1;
        }
    }

    let area = ((x1 - x0) * (y1 - y0)) as u32;
    let limit = ((CLIP_LIMIT * f64::from(area) / 256.0) as u32).max(1);

    let mut excess = 0u32;
    for bin in &mut hist {
        if *bin > limit {
            excess += *bin - limit;
            *bin = limit;
        }
    }
    let share = excess / 256;
    let remainder = (excess % 256) as usize;
    for bin in &mut hist {
        *bin += share;
    }
    if remainder > 0 {
        for bin in hist.iter_mut().step_by(256 / remainder).take(remainder) {
            *bin += 1;
        }
    }

    let scale = 255.0 / f64::from(area.max(1));
    let mut lut = [0.0; 256];
    let mut cumulative = 0u32;
    for (slot, &count) in lut.iter_mut().zip(hist.iter()) {
        cumulative += count;
        *slot = f64::from(cumulative) * scale;
    }
    lut
}

#[cfg(test)]
mod tests {
    use super::*;

    fn spread(img: &GrayImage) -> u8 {
        let min = img.pixels().map(|p| p[0]).min().unwrap_or(0);
        let max = img.pixels().map(|p| p[0]).max().unwrap_or(0);
        max - min
    }

    #[test]
    fn stretches_low_contrast_images() {
        let img = GrayImage::from_fn(128, 128, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let value = (100 + (x + y) % 8) as u8;
            Luma([value])
        });
        let out = clahe(&img);
        assert_eq!(out.dimensions(), img.dimensions());
        assert!(spread(&out) > spread(&img), "{} <= {}", spread(&out), spread(&img));
    }

    #[test]
    fn handles_tiny_and_empty_images() {
        assert_eq!(clahe(&GrayImage::new(0, 0)).dimensions(), (0, 0));
        assert_eq!(clahe(&GrayImage::new(3, 2)).dimensions(), (3, 2));
    }

    #[test]
    fn lut_is_monotonic_and_ends_at_full_scale() {
        let img = GrayImage::from_fn(16, 16, |x, y| {
            #[allow(clippy::cast_possible_truncation)]
            let value = ((x * 16 + y) % 256) as u8;
            Luma([value])
        });
        let lut = tile_lut(&img, (0, 16), (0, 16));
        assert!(lut.windows(2).all(|w| w[0] <= w[1]));
        assert!((lut[255] - 255.0).abs() < 1e-9);
    }
}
