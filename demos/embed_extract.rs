//! Embed a text watermark into one image and recover the bitmap again.
//!
//! Usage:
//! ```sh
//! cargo run --example embed_extract -- input.png output.png "ALICE 2024"
//! ```
//!
//! Writes the watermarked image to `output` and the recovered bitmap next
//! to it as `{stem}_recovered.png`.

use std::env;
use std::path::{Path, PathBuf};
use std::process;

use dwt_text_watermark::{embed, extract, load_gray, save_image, Result};

fn main() {
    let args: Vec<String> = env::args().collect();
    if args.len() < 4 {
        eprintln!("Usage: {} <input> <output> <text>", args[0]);
        process::exit(1);
    }

    match run(Path::new(&args[1]), Path::new(&args[2]), &args[3]) {
        Ok(recovered) => println!("Recovered bitmap: {}", recovered.display()),
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    }
}

fn run(input: &Path, output: &Path, text: &str) -> Result<PathBuf> {
    let original = load_gray(input)?;
    let marked = embed(&original, text)?;
    save_image(&marked.image, output)?;
    println!(
        "Embedded: PSNR {:.2} dB, SSIM {:.4}, MSE {:.4}",
        marked.metrics.psnr, marked.metrics.ssim, marked.metrics.mse
    );

    let reloaded = load_gray(output)?;
    let bitmap = extract(&reloaded, &original)?;
    let stem = output
        .file_stem()
        .map_or_else(|| "output".into(), |s| s.to_string_lossy());
    let recovered = output.with_file_name(format!("{stem}_recovered.png"));
    save_image(&bitmap, &recovered)?;
    Ok(recovered)
}
