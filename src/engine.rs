//! High-level watermarking engine.

use std::path::{Path, PathBuf};

use image::GrayImage;
use serde::Serialize;

use crate::codec;
use crate::contrast;
use crate::embed::{self, Embedded};
use crate::error::Result;
use crate::extract;
use crate::metrics::Metrics;
use crate::ocr::{self, OcrResult, TextRecognizer};

/// Options controlling how the engine prepares inputs and outputs.
#[derive(Debug, Clone, Default)]
pub struct ProcessOptions {
    /// Run CLAHE over the recovered bitmap before OCR.
    pub enhance_contrast: bool,
    /// Trim odd-sized inputs to even dimensions instead of rejecting them.
    pub crop_to_even: bool,
}

/// Result of embedding into an encoded image.
#[derive(Debug, Clone, Serialize)]
pub struct EmbedReport {
    /// PNG-encoded watermarked image.
    #[serde(skip)]
    pub png: Vec<u8>,
    /// Width of the watermarked image.
    pub width: u32,
    /// Height of the watermarked image.
    pub height: u32,
    /// Fidelity against the (possibly cropped) original.
    pub metrics: Metrics,
}

/// Result of extracting and reading a watermark.
#[derive(Debug, Clone, Serialize)]
pub struct ExtractReport {
    /// Recognized text, detections joined by spaces.
    pub text: String,
    /// Individual detections with confidences.
    pub ocr: OcrResult,
    /// Raw recovered bitmap, for diagnostic display.
    #[serde(skip)]
    pub bitmap: GrayImage,
}

/// Result of processing a single image file.
#[derive(Debug, Serialize)]
pub struct ProcessResult {
    /// Path of the processed file.
    pub path: PathBuf,
    /// Where the watermarked image was written, if it was.
    pub output: Option<PathBuf>,
    /// Whether processing succeeded.
    pub success: bool,
    /// Fidelity metrics when embedding succeeded.
    pub metrics: Option<Metrics>,
    /// Human-readable status message.
    pub message: String,
}

/// Embeds and extracts watermarks, reading recovered text with `R`.
///
/// Create once with its recognizer and reuse it for every image; the
/// engine holds no per-call state.
pub struct WatermarkEngine<R> {
    recognizer: R,
    options: ProcessOptions,
}

impl<R: TextRecognizer> WatermarkEngine<R> {
    /// Create an engine around a recognizer handle.
    pub fn new(recognizer: R, options: ProcessOptions) -> Self {
        Self {
            recognizer,
            options,
        }
    }

    /// The options this engine was built with.
    #[must_use]
    pub fn options(&self) -> &ProcessOptions {
        &self.options
    }

    /// The recognizer handle.
    pub fn recognizer(&self) -> &R {
        &self.recognizer
    }

    fn prepare(&self, image: GrayImage) -> GrayImage {
        if self.options.crop_to_even {
            codec::crop_to_even(image)
        } else {
            image
        }
    }

    /// Embed `text` into an already decoded image.
    ///
    /// # Errors
    ///
    /// See [`embed::embed`].
    pub fn embed_image(&self, image: GrayImage, text: &str) -> Result<Embedded> {
        let image = self.prepare(image);
        embed::embed(&image, text)
    }

    /// Decode `bytes`, embed `text` and return the PNG-encoded result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) for unreadable input
    /// and the errors of [`embed::embed`] otherwise.
    pub fn embed_bytes(&self, bytes: &[u8], text: &str) -> Result<EmbedReport> {
        let embedded = self.embed_image(codec::decode_gray(bytes)?, text)?;
        let (width, height) = embedded.image.dimensions();
        Ok(EmbedReport {
            png: codec::encode_png(&embedded.image)?,
            width,
            height,
            metrics: embedded.metrics,
        })
    }

    /// Decode both images and recover the raw watermark bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`](crate::Error::Decode) for unreadable input
    /// and the errors of [`extract::extract`] otherwise.
    pub fn extract_bytes(&self, watermarked: &[u8], original: &[u8]) -> Result<GrayImage> {
        let watermarked = self.prepare(codec::decode_gray(watermarked)?);
        let original = self.prepare(codec::decode_gray(original)?);
        extract::extract(&watermarked, &original)
    }

    /// Read text from a recovered bitmap.
    ///
    /// # Errors
    ///
    /// Propagates recognizer failures.
    pub fn recognize(&self, bitmap: &GrayImage) -> Result<OcrResult> {
        if self.options.enhance_contrast {
            ocr::recognize_text(&self.recognizer, &contrast::clahe(bitmap))
        } else {
            ocr::recognize_text(&self.recognizer, bitmap)
        }
    }

    /// Extract the watermark from an encoded pair and read it.
    ///
    /// The recognizer runs exactly once.
    ///
    /// # Errors
    ///
    /// See [`Self::extract_bytes`] and [`Self::recognize`].
    pub fn extract_and_recognize(
        &self,
        watermarked: &[u8],
        original: &[u8],
    ) -> Result<ExtractReport> {
        let bitmap = self.extract_bytes(watermarked, original)?;
        let ocr = self.recognize(&bitmap)?;
        Ok(ExtractReport {
            text: ocr.text(),
            ocr,
            bitmap,
        })
    }

    /// Watermark a single image file: load, embed, save.
    ///
    /// Failures are reported in the returned [`ProcessResult`].
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path, text: &str) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            output: None,
            success: false,
            metrics: None,
            message: String::new(),
        };

        let image = match codec::load_gray(input) {
            Ok(img) => img,
            Err(e) => {
                result.message = format!("Failed to load: {e}");
                return result;
            }
        };

        let embedded = match self.embed_image(image, text) {
            Ok(e) => e,
            Err(e) => {
                result.message = format!("Failed to embed: {e}");
                return result;
            }
        };
        result.metrics = Some(embedded.metrics);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                if let Err(e) = std::fs::create_dir_all(parent) {
                    result.message = format!("Failed to create output directory: {e}");
                    return result;
                }
            }
        }

        match codec::save_image(&embedded.image, output) {
            Ok(()) => {
                result.success = true;
                result.output = Some(output.to_path_buf());
                result.message = format!(
                    "Watermark embedded (PSNR {:.2} dB, SSIM {:.4}, MSE {:.4})",
                    embedded.metrics.psnr, embedded.metrics.ssim, embedded.metrics.mse
                );
            }
            Err(e) => {
                result.message = format!("Failed to save: {e}");
            }
        }

        result
    }

    /// Watermark every supported image in a directory.
    ///
    /// Outputs are written to `output_dir` as `{stem}_watermarked.png`.
    /// Uses parallel iteration when the `cli` feature is enabled (via rayon).
    #[must_use]
    pub fn process_directory(
        &self,
        input_dir: &Path,
        output_dir: &Path,
        text: &str,
    ) -> Vec<ProcessResult> {
        let failure = |path: &Path, message: String| ProcessResult {
            path: path.to_path_buf(),
            output: None,
            success: false,
            metrics: None,
            message,
        };

        let mut inputs: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| codec::is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![failure(input_dir, format!("Failed to read directory: {e}"))];
            }
        };
        inputs.sort();

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![failure(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let output_for = |input: &PathBuf| {
            let name = codec::default_output_path(input)
                .file_name()
                .map(std::ffi::OsStr::to_os_string)
                .unwrap_or_default();
            output_dir.join(name)
        };

        log::debug!(
            "embedding into {} image(s) from {}",
            inputs.len(),
            input_dir.display()
        );

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            inputs
                .par_iter()
                .map(|input| self.process_file(input, &output_for(input), text))
                .collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            inputs
                .iter()
                .map(|input| self.process_file(input, &output_for(input), text))
                .collect()
        }
    }
}
