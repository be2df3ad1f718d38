//! Text recovery from extracted bitmaps.
//!
//! OCR itself is an external collaborator behind the [`TextRecognizer`]
//! trait. A recognizer is built once, at startup, and shared by reference
//! across operations. [`TesseractCli`] drives a local `tesseract` binary.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use image::GrayImage;
use serde::Serialize;

use crate::codec;
use crate::error::{Error, Result};

/// One piece of recognized text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Bounding box as `[left, top, width, height]` in bitmap pixels.
    pub bbox: [u32; 4],
    /// Recognized text.
    pub text: String,
    /// Recognition confidence in `[0, 1]`.
    pub confidence: f32,
}

/// Ordered detections produced for one bitmap. May be empty.
///
/// Built by [`recognize_text`], which keeps the recognizer's order but
/// drops detections whose text is blank.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct OcrResult {
    /// Detections in reading order, as reported by the recognizer.
    pub detections: Vec<Detection>,
}

impl OcrResult {
    /// All detected text joined by single spaces.
    #[must_use]
    pub fn text(&self) -> String {
        self.detections
            .iter()
            .map(|d| d.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Per-detection confidence scores, in detection order.
    #[must_use]
    pub fn confidences(&self) -> Vec<f32> {
        self.detections.iter().map(|d| d.confidence).collect()
    }

    /// Whether nothing was recognized.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }
}

/// A text recognition service.
///
/// Implementations are read-only handles: `recognize` must not depend on
/// earlier calls, and the handle may be shared between threads.
pub trait TextRecognizer: Send + Sync {
    /// Recognize text in a single-channel bitmap.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Ocr`] when the underlying engine fails.
    fn recognize(&self, bitmap: &GrayImage) -> Result<Vec<Detection>>;
}

/// Run `recognizer` once over `bitmap`.
///
/// Detections with blank text are dropped and confidences are clamped to
/// `[0, 1]`.
///
/// # Errors
///
/// Propagates the recognizer's error unchanged.
pub fn recognize_text<R: TextRecognizer + ?Sized>(
    recognizer: &R,
    bitmap: &GrayImage,
) -> Result<OcrResult> {
    let detections = recognizer
        .recognize(bitmap)?
        .into_iter()
        .filter(|d| !d.text.trim().is_empty())
        .map(|d| Detection {
            confidence: d.confidence.clamp(0.0, 1.0),
            ..d
        })
        .collect::<Vec<_>>();
    log::debug!("OCR returned {} detection(s)", detections.len());
    Ok(OcrResult { detections })
}

/// Recognizer backed by the `tesseract` command-line program.
///
/// The bitmap is written to a temporary PNG file, passed to `tesseract`
/// by path, and word-level results are read back in TSV form.
#[derive(Debug, Clone)]
pub struct TesseractCli {
    program: PathBuf,
    language: String,
    page_segmentation: Option<u8>,
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self {
            program: PathBuf::from("tesseract"),
            language: "eng".to_string(),
            page_segmentation: None,
        }
    }
}

impl TesseractCli {
    /// Use `program` instead of `tesseract` from `PATH`.
    #[must_use]
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Recognition language, e.g. `"eng"`.
    #[must_use]
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    /// Page segmentation mode passed as `--psm`.
    #[must_use]
    pub fn with_page_segmentation(mut self, psm: u8) -> Self {
        self.page_segmentation = Some(psm);
        self
    }

    fn command(&self, input: &Path) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.arg(input);
        cmd.args(["stdout", "-l", &self.language]);
        if let Some(psm) = self.page_segmentation {
            cmd.args(["--psm", &psm.to_string()]);
        }
        cmd.arg("tsv");
        cmd
    }
}

impl TextRecognizer for TesseractCli {
    fn recognize(&self, bitmap: &GrayImage) -> Result<Vec<Detection>> {
        let png = codec::encode_png(bitmap)?;
        let stage = |e: std::io::Error| Error::Ocr(format!("failed to stage bitmap: {e}"));
        let mut input = tempfile::Builder::new()
            .prefix("dwt-ocr-")
            .suffix(".png")
            .tempfile()
            .map_err(stage)?;
        input.write_all(&png).map_err(stage)?;
        input.flush().map_err(stage)?;

        let output = self
            .command(input.path())
            .stdin(Stdio::null())
            .output()
            .map_err(|e| Error::Ocr(format!("failed to start {}: {e}", self.program.display())))?;
        if !output.status.success() {
            return Err(Error::Ocr(format!(
                "{} exited with {}: {}",
                self.program.display(),
                output.status,
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        parse_tsv(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Column count of tesseract's TSV output.
const TSV_COLUMNS: usize = 12;
/// TSV `level` value for word rows.
const WORD_LEVEL: &str = "5";

/// Parse tesseract TSV output into word detections.
///
/// Only word rows with non-negative confidence and non-blank text are kept;
/// confidence is rescaled from `0..=100` to `0..=1`.
///
/// # Errors
///
/// Returns [`Error::Ocr`] if a row is truncated or has non-numeric fields.
pub fn parse_tsv(tsv: &str) -> Result<Vec<Detection>> {
    let mut detections = Vec::new();

    for (line_no, line) in tsv.lines().enumerate() {
        if line.trim().is_empty() || line.starts_with("level") {
            continue;
        }
        let fields: Vec<&str> = line.splitn(TSV_COLUMNS, '\t').collect();
        if fields.len() < TSV_COLUMNS - 1 {
            return Err(Error::Ocr(format!(
                "TSV line {} has {} columns, expected {TSV_COLUMNS}",
                line_no + 1,
                fields.len()
            )));
        }
        if fields[0] != WORD_LEVEL {
            continue;
        }

        let text = fields.get(11).map_or("", |t| t.trim());
        let confidence: f32 = parse_field(fields[10], line_no)?;
        if text.is_empty() || confidence < 0.0 {
            continue;
        }

        let bbox = [
            parse_field(fields[6], line_no)?,
            parse_field(fields[7], line_no)?,
            parse_field(fields[8], line_no)?,
            parse_field(fields[9], line_no)?,
        ];
        detections.push(Detection {
            bbox,
            text: text.to_string(),
            confidence: (confidence / 100.0).clamp(0.0, 1.0),
        });
    }

    Ok(detections)
}

fn parse_field<T: std::str::FromStr>(field: &str, line_no: usize) -> Result<T> {
    field.trim().parse().map_err(|_| {
        Error::Ocr(format!(
            "TSV line {}: cannot parse field {field:?}",
            line_no + 1
        ))
    })
}
