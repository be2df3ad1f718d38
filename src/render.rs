//! Rasterize watermark text into a bitmap.
//!
//! Text is drawn with the built-in stroke font, left edge at
//! [`ANCHOR_MARGIN`] and baseline [`ANCHOR_MARGIN`] pixels above the bottom
//! of the image. Strokes are [`STROKE_THICKNESS`] pixels wide with
//! coverage anti-aliasing: stroke cores are 255, edges fade, the rest is 0.

use image::{GrayImage, Luma};

use crate::error::{Error, Result};
use crate::font::{self, Stroke};

/// Distance in pixels from the left and bottom image edges to the text origin.
pub const ANCHOR_MARGIN: u32 = 10;

/// Stroke width in pixels.
pub const STROKE_THICKNESS: f32 = 2.0;

/// Pixels per glyph unit.
const SCALE: f32 = 3.5;

/// Cap height of rendered text in pixels.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub const GLYPH_HEIGHT: u32 = (font::CAP_HEIGHT * SCALE) as u32;

/// Render `text` into a `width` x `height` bitmap.
///
/// Characters without a glyph are drawn as a hollow box. Text running
/// past the right edge is clipped.
///
/// # Errors
///
/// Returns [`Error::InvalidInput`] if `text` is empty or either dimension
/// is zero.
pub fn render(text: &str, width: u32, height: u32) -> Result<GrayImage> {
    if text.is_empty() {
        return Err(Error::InvalidInput("watermark text is empty".to_string()));
    }
    if width == 0 || height == 0 {
        return Err(Error::InvalidInput(format!(
            "render target must be non-empty, got {width}x{height}"
        )));
    }

    let mut canvas = vec![0.0f32; width as usize * height as usize];
    #[allow(clippy::cast_precision_loss)]
    let origin_x = ANCHOR_MARGIN as f32;
    #[allow(clippy::cast_precision_loss)]
    let origin_y = height as f32 - ANCHOR_MARGIN as f32;
    #[allow(clippy::cast_precision_loss)]
    let right_edge = width as f32;

    for (i, ch) in text.chars().enumerate() {
        let strokes = font::glyph(ch).unwrap_or_else(font::missing_glyph);
        #[allow(clippy::cast_precision_loss)]
        let cell_x = origin_x + i as f32 * font::ADVANCE * SCALE;
        if cell_x > right_edge {
            break;
        }
        for stroke in strokes {
            draw_polyline(&mut canvas, width, height, stroke, cell_x, origin_y);
        }
    }

    Ok(GrayImage::from_fn(width, height, |x, y| {
        let coverage = canvas[y as usize * width as usize + x as usize];
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        let value = (coverage * 255.0).round() as u8;
        Luma([value])
    }))
}

fn draw_polyline(
    canvas: &mut [f32],
    width: u32,
    height: u32,
    stroke: Stroke,
    cell_x: f32,
    baseline: f32,
) {
    let to_px = |(x, y): (f32, f32)| (cell_x + x * SCALE, baseline - y * SCALE);
    for pair in stroke.windows(2) {
        draw_segment(canvas, width, height, to_px(pair[0]), to_px(pair[1]));
    }
}

/// Accumulate the coverage of one thick segment, keeping the maximum per pixel.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
fn draw_segment(canvas: &mut [f32], width: u32, height: u32, p0: (f32, f32), p1: (f32, f32)) {
    let radius = STROKE_THICKNESS / 2.0;
    let reach = radius + 1.0;

    let min_x = (p0.0.min(p1.0) - reach).floor().max(0.0) as i64;
    let max_x = (p0.0.max(p1.0) + reach).ceil().min(width as f32 - 1.0) as i64;
    let min_y = (p0.1.min(p1.1) - reach).floor().max(0.0) as i64;
    let max_y = (p0.1.max(p1.1) + reach).ceil().min(height as f32 - 1.0) as i64;

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            // Pixel centres sit at half-integer coordinates.
            let d = distance_to_segment((x as f32 + 0.5, y as f32 + 0.5), p0, p1);
            let coverage = (radius + 0.5 - d).clamp(0.0, 1.0);
            if coverage > 0.0 {
                let idx = y as usize * width as usize + x as usize;
                canvas[idx] = canvas[idx].max(coverage);
            }
        }
    }
}

fn distance_to_segment(p: (f32, f32), a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > f32::EPSILON {
        (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((p.0 - cx).powi(2) + (p.1 - cy).powi(2)).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lit(img: &GrayImage) -> usize {
        img.pixels().filter(|p| p[0] > 0).count()
    }

    #[test]
    fn rejects_empty_text_and_zero_size() {
        assert!(matches!(render("", 64, 64), Err(Error::InvalidInput(_))));
        assert!(matches!(render("A", 0, 64), Err(Error::InvalidInput(_))));
        assert!(matches!(render("A", 64, 0), Err(Error::InvalidInput(_))));
    }

    #[test]
    fn output_matches_requested_size() {
        let bmp = render("TEST", 120, 48).unwrap();
        assert_eq!(bmp.dimensions(), (120, 48));
    }

    #[test]
    fn strokes_reach_full_intensity() {
        let bmp = render("TEST", 128, 64).unwrap();
        assert!(bmp.pixels().any(|p| p[0] == 255));
        assert!(lit(&bmp) > 50);
    }

    #[test]
    fn glyphs_sit_in_bottom_left_band() {
        let (w, h) = (256, 256);
        let bmp = render("TEST", w, h).unwrap();
        for (x, y, p) in bmp.enumerate_pixels() {
            if p[0] > 0 {
                assert!(x + 2 >= ANCHOR_MARGIN, "pixel left of anchor at x={x}");
                assert!(y + 2 >= h - ANCHOR_MARGIN - GLYPH_HEIGHT, "pixel above text at y={y}");
                assert!(y <= h - ANCHOR_MARGIN + 2, "pixel below baseline at y={y}");
            }
        }
    }

    #[test]
    fn whitespace_only_text_is_blank() {
        let bmp = render("   ", 64, 64).unwrap();
        assert_eq!(lit(&bmp), 0);
    }

    #[test]
    fn unknown_characters_draw_a_box() {
        let bmp = render("#", 64, 64).unwrap();
        assert!(lit(&bmp) > 0);
    }

    #[test]
    fn long_text_is_clipped_not_rejected() {
        let bmp = render("A VERY LONG WATERMARK THAT DOES NOT FIT", 40, 40).unwrap();
        assert_eq!(bmp.dimensions(), (40, 40));
        assert!(lit(&bmp) > 0);
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(render("Hello 42", 200, 50).unwrap(), render("Hello 42", 200, 50).unwrap());
    }
}
