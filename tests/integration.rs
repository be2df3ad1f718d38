use std::sync::Mutex;

use dwt_text_watermark::{
    encode_png, render, Detection, Error, ProcessOptions, Result, TesseractCli, TextRecognizer,
    WatermarkEngine,
};
use image::{GrayImage, Luma};

/// Records every bitmap it is shown and answers with a fixed reading.
#[derive(Default)]
struct Recording {
    seen: Mutex<Vec<GrayImage>>,
}

impl TextRecognizer for Recording {
    fn recognize(&self, bitmap: &GrayImage) -> Result<Vec<Detection>> {
        self.seen.lock().unwrap().push(bitmap.clone());
        Ok(vec![
            Detection {
                bbox: [10, 200, 40, 22],
                text: "HELLO".to_string(),
                confidence: 0.93,
            },
            Detection {
                bbox: [60, 200, 40, 22],
                text: "WORLD".to_string(),
                confidence: 0.71,
            },
        ])
    }
}

fn textured_png(width: u32, height: u32) -> Vec<u8> {
    let img = GrayImage::from_fn(width, height, |x, y| {
        #[allow(clippy::cast_possible_truncation)]
        let value = (64 + (x * 3 + y * 7) % 128) as u8;
        Luma([value])
    });
    encode_png(&img).unwrap()
}

#[test]
fn engine_embeds_and_reads_back_through_the_recognizer() {
    let engine = WatermarkEngine::new(Recording::default(), ProcessOptions::default());
    let original = textured_png(256, 128);

    let embedded = engine.embed_bytes(&original, "HELLO WORLD").unwrap();
    assert!(embedded.metrics.psnr > 30.0);
    assert!(embedded.metrics.ssim > 0.95);

    let report = engine
        .extract_and_recognize(&embedded.png, &original)
        .unwrap();
    assert_eq!(report.text, "HELLO WORLD");
    assert_eq!(report.ocr.confidences(), vec![0.93, 0.71]);

    let seen = engine.recognizer().seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0], report.bitmap);
}

#[test]
fn recognizer_sees_the_rendered_text() {
    let engine = WatermarkEngine::new(Recording::default(), ProcessOptions::default());
    let original = textured_png(128, 64);
    let embedded = engine.embed_bytes(&original, "AB").unwrap();
    let bitmap = engine.extract_bytes(&embedded.png, &original).unwrap();

    let reference = render("AB", 128, 64).unwrap();
    let ncc = dwt_text_watermark::metrics::normalized_cross_correlation(&bitmap, &reference)
        .unwrap();
    assert!(ncc > 0.5, "ncc {ncc}");
}

#[test]
fn extract_rejects_pairs_of_different_size() {
    let engine = WatermarkEngine::new(Recording::default(), ProcessOptions::default());
    let err = engine
        .extract_and_recognize(&textured_png(64, 64), &textured_png(64, 32))
        .unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { .. }));
    assert!(engine.recognizer().seen.lock().unwrap().is_empty());
}

#[test]
fn process_directory_embeds_every_supported_image() {
    let input = tempfile::tempdir().unwrap();
    let output = tempfile::tempdir().unwrap();
    std::fs::write(input.path().join("a.png"), textured_png(64, 64)).unwrap();
    std::fs::write(input.path().join("b.png"), textured_png(96, 48)).unwrap();
    std::fs::write(input.path().join("c.png"), textured_png(63, 48)).unwrap();
    std::fs::write(input.path().join("notes.txt"), b"ignore me").unwrap();

    let engine = WatermarkEngine::new(Recording::default(), ProcessOptions::default());
    let results = engine.process_directory(input.path(), output.path(), "BATCH");

    assert_eq!(results.len(), 3);
    let ok: Vec<_> = results.iter().filter(|r| r.success).collect();
    assert_eq!(ok.len(), 2);
    assert!(output.path().join("a_watermarked.png").exists());
    assert!(output.path().join("b_watermarked.png").exists());

    let odd = results
        .iter()
        .find(|r| r.path.ends_with("c.png"))
        .unwrap();
    assert!(!odd.success);
    assert!(odd.message.contains("even"), "{}", odd.message);
}

#[test]
fn process_directory_reports_missing_input() {
    let engine = WatermarkEngine::new(Recording::default(), ProcessOptions::default());
    let out = tempfile::tempdir().unwrap();
    let results = engine.process_directory(
        &out.path().join("does-not-exist"),
        out.path(),
        "X",
    );
    assert_eq!(results.len(), 1);
    assert!(!results[0].success);
}

#[test]
fn missing_tesseract_surfaces_as_ocr_error() {
    let engine = WatermarkEngine::new(
        TesseractCli::default().with_program("/definitely/not/tesseract"),
        ProcessOptions::default(),
    );
    let err = engine.recognize(&GrayImage::new(16, 16)).unwrap_err();
    assert!(matches!(err, Error::Ocr(_)));
}

#[cfg(unix)]
#[test]
fn recognizer_exiting_early_surfaces_as_ocr_error() {
    let engine = WatermarkEngine::new(
        TesseractCli::default().with_program("/bin/false"),
        ProcessOptions::default(),
    );
    let mut state = 0x2545_f491_u32;
    let noisy = GrayImage::from_fn(1024, 1024, |_, _| {
        state ^= state << 13;
        state ^= state >> 17;
        state ^= state << 5;
        #[allow(clippy::cast_possible_truncation)]
        let value = (state >> 24) as u8;
        Luma([value])
    });
    let err = engine.recognize(&noisy).unwrap_err();
    assert!(matches!(err, Error::Ocr(_)), "{err}");
}
