use std::path::{Path, PathBuf};
use std::process;

use clap::{Args, Parser, Subcommand};
use log::LevelFilter;

use dwt_text_watermark::{
    default_output_path, load_gray, metrics, save_image, ExtractReport, Metrics, ProcessOptions,
    ProcessResult, TesseractCli, WatermarkEngine,
};

#[derive(Parser)]
#[command(
    name = "dwt-watermark",
    about = "Embed and recover invisible text watermarks in the Haar wavelet domain",
    version,
    after_help = "Watermarks survive only lossless storage: keep watermarked images as PNG.\n\
                  Extraction needs the exact original image."
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress all non-error output
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Embed a text watermark into an image or a directory of images
    Embed(EmbedArgs),
    /// Recover the watermark from a watermarked/original pair
    Extract(ExtractArgs),
    /// Compare two images (PSNR, SSIM, MSE)
    Metrics(MetricsArgs),
}

#[derive(Args)]
struct EmbedArgs {
    /// Input image file or directory
    input: PathBuf,

    /// Watermark text
    #[arg(short, long)]
    text: String,

    /// Output file or directory (default: {name}_watermarked.png)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Trim odd-sized images to even dimensions instead of rejecting them
    #[arg(long)]
    crop_even: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct ExtractArgs {
    /// Watermarked image
    watermarked: PathBuf,

    /// Original, unwatermarked image
    original: PathBuf,

    /// Where to write the recovered bitmap
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Only recover the bitmap, skip text recognition
    #[arg(long)]
    no_ocr: bool,

    /// Equalize the recovered bitmap (CLAHE) before OCR
    #[arg(long)]
    enhance_contrast: bool,

    /// Path to the tesseract executable
    #[arg(long, default_value = "tesseract")]
    tesseract: PathBuf,

    /// OCR language
    #[arg(long, default_value = "eng")]
    lang: String,

    /// Trim odd-sized images to even dimensions instead of rejecting them
    #[arg(long)]
    crop_even: bool,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct MetricsArgs {
    /// Reference image
    original: PathBuf,

    /// Image to compare against the reference
    other: PathBuf,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);

    let code = match &cli.command {
        Command::Embed(args) => run_embed(args, cli.quiet),
        Command::Extract(args) => run_extract(args, cli.quiet),
        Command::Metrics(args) => run_metrics(args),
    };
    process::exit(code);
}

fn init_logging(cli: &Cli) {
    let level = if cli.quiet {
        LevelFilter::Error
    } else if cli.verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .format_timestamp(None)
        .init();
}

fn engine(
    recognizer: TesseractCli,
    crop_even: bool,
    enhance_contrast: bool,
) -> WatermarkEngine<TesseractCli> {
    WatermarkEngine::new(
        recognizer,
        ProcessOptions {
            enhance_contrast,
            crop_to_even: crop_even,
        },
    )
}

fn run_embed(args: &EmbedArgs, quiet: bool) -> i32 {
    if args.text.is_empty() {
        eprintln!("Error: Watermark text must not be empty");
        return 1;
    }
    if !args.input.exists() {
        eprintln!("Error: Input path does not exist: {}", args.input.display());
        return 1;
    }

    let engine = engine(TesseractCli::default(), args.crop_even, false);

    let results = if args.input.is_dir() {
        let Some(output_dir) = &args.output else {
            eprintln!("Error: Output directory is required for batch processing");
            eprintln!("Usage: dwt-watermark embed <input_dir> -t <text> -o <output_dir>");
            return 1;
        };
        engine.process_directory(&args.input, output_dir, &args.text)
    } else {
        let output = args
            .output
            .clone()
            .unwrap_or_else(|| default_output_path(&args.input));
        vec![engine.process_file(&args.input, &output, &args.text)]
    };

    if args.json {
        print_json(&results);
    } else {
        for r in &results {
            print_result(r, quiet);
        }
    }

    let failed = results.iter().filter(|r| !r.success).count();
    if results.len() > 1 && !quiet {
        eprintln!();
        eprint!("[Summary] Processed: {}", results.len() - failed);
        if failed > 0 {
            eprint!(", Failed: {failed}");
        }
        eprintln!(" (Total: {})", results.len());
    }

    i32::from(failed > 0)
}

fn run_extract(args: &ExtractArgs, quiet: bool) -> i32 {
    let recognizer = TesseractCli::default()
        .with_program(&args.tesseract)
        .with_language(args.lang.clone());
    let engine = engine(recognizer, args.crop_even, args.enhance_contrast);

    let inputs = (
        std::fs::read(&args.watermarked),
        std::fs::read(&args.original),
    );
    let (watermarked, original) = match inputs {
        (Ok(w), Ok(o)) => (w, o),
        (Err(e), _) => return fail(&args.watermarked, &e),
        (_, Err(e)) => return fail(&args.original, &e),
    };

    let bitmap = match engine.extract_bytes(&watermarked, &original) {
        Ok(b) => b,
        Err(e) => {
            eprintln!("[FAIL] {}: {e}", args.watermarked.display());
            return 1;
        }
    };

    if let Some(out) = &args.output {
        if let Err(e) = save_image(&bitmap, out) {
            return fail(out, &e);
        }
        if !quiet && !args.json {
            eprintln!("[OK] Recovered bitmap written to {}", out.display());
        }
    }

    if args.no_ocr {
        return 0;
    }

    let ocr = match engine.recognize(&bitmap) {
        Ok(r) => r,
        Err(e) => {
            eprintln!("[FAIL] {e}");
            return 1;
        }
    };

    if args.json {
        print_json(&ExtractReport {
            text: ocr.text(),
            ocr,
            bitmap,
        });
    } else if ocr.is_empty() {
        if !quiet {
            eprintln!("[SKIP] No readable text found in the recovered watermark");
        }
    } else {
        println!("{}", ocr.text());
        if !quiet {
            for d in &ocr.detections {
                eprintln!("  -> {:?} ({:.0}% confidence)", d.text, d.confidence * 100.0);
            }
        }
    }
    0
}

fn run_metrics(args: &MetricsArgs) -> i32 {
    let (a, b) = match (load_gray(&args.original), load_gray(&args.other)) {
        (Ok(a), Ok(b)) => (a, b),
        (Err(e), _) => return fail(&args.original, &e),
        (_, Err(e)) => return fail(&args.other, &e),
    };

    let m: Metrics = match metrics::compute(&a, &b) {
        Ok(m) => m,
        Err(e) => {
            eprintln!("Error: {e}");
            return 1;
        }
    };

    if args.json {
        print_json(&m);
    } else {
        println!("PSNR: {:.2} dB", m.psnr);
        println!("SSIM: {:.4}", m.ssim);
        println!("MSE:  {:.4}", m.mse);
    }
    0
}

fn fail(path: &Path, err: &dyn std::fmt::Display) -> i32 {
    eprintln!("[FAIL] {}: {err}", path.display());
    1
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("Error: failed to serialize output: {e}"),
    }
}

fn print_result(result: &ProcessResult, quiet: bool) {
    if quiet && result.success {
        return;
    }

    let filename = result.path.file_name().map_or_else(
        || result.path.display().to_string(),
        |f| f.to_string_lossy().to_string(),
    );

    if result.success {
        let target = result
            .output
            .as_deref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        eprintln!("[OK] {filename} -> {target}");
        log::info!("{}", result.message);
        if let Some(m) = &result.metrics {
            eprintln!("  PSNR {:.2} dB | SSIM {:.4} | MSE {:.4}", m.psnr, m.ssim, m.mse);
        }
    } else {
        eprintln!("[FAIL] {filename}: {}", result.message);
    }
}
