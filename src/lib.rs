//! Invisible text watermarks in the Haar wavelet domain.
//!
//! A text string is rendered into a bitmap, halved to sub-band resolution
//! and added, scaled by [`EMBED_STRENGTH`], to the diagonal detail band of a
//! single-level 2D Haar decomposition. Reconstructing the image leaves it
//! visually unchanged (high PSNR/SSIM). Given the untouched original, the
//! bitmap is recovered by differencing the two diagonal bands, and an OCR
//! collaborator turns it back into text.
//!
//! # Quick Start
//!
//! ```no_run
//! use dwt_text_watermark::{embed, extract, load_gray, save_image};
//! use std::path::Path;
//!
//! let original = load_gray(Path::new("photo.png")).unwrap();
//! let marked = embed(&original, "ALICE 2024").unwrap();
//! println!("PSNR {:.2} dB, SSIM {:.4}", marked.metrics.psnr, marked.metrics.ssim);
//! save_image(&marked.image, Path::new("photo_watermarked.png")).unwrap();
//!
//! let bitmap = extract(&marked.image, &original).unwrap();
//! bitmap.save("recovered.png").unwrap();
//! ```
//!
//! # Fragility
//!
//! Recovery divides by a small strength, so any lossy step between
//! embedding and extraction (JPEG, resizing) is amplified fifty-fold and
//! usually wipes out the watermark. Store watermarked images losslessly.
//!
//! # Text recovery
//!
//! ```no_run
//! use dwt_text_watermark::{ProcessOptions, TesseractCli, WatermarkEngine};
//!
//! let engine = WatermarkEngine::new(TesseractCli::default(), ProcessOptions::default());
//! let marked = std::fs::read("photo_watermarked.png").unwrap();
//! let original = std::fs::read("photo.png").unwrap();
//! let report = engine.extract_and_recognize(&marked, &original).unwrap();
//! println!("{} {:?}", report.text, report.ocr.confidences());
//! ```

#![deny(missing_docs)]

pub mod codec;
pub mod contrast;
pub mod embed;
mod engine;
pub mod error;
pub mod extract;
mod font;
pub mod haar;
pub mod metrics;
pub mod ocr;
pub mod render;
pub mod resample;

pub use codec::{
    crop_to_even, decode_gray, default_output_path, encode_png, is_supported_image, load_gray,
    save_image,
};
pub use embed::{embed, Embedded, EMBED_STRENGTH};
pub use engine::{EmbedReport, ExtractReport, ProcessOptions, ProcessResult, WatermarkEngine};
pub use error::{Error, Result};
pub use extract::extract;
pub use haar::{decompose, reconstruct, Subbands};
pub use metrics::Metrics;
pub use ocr::{Detection, OcrResult, TesseractCli, TextRecognizer};
pub use render::render;
