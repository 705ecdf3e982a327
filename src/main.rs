#![warn(unused_extern_crates)]
use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use clap::{Args, Parser};
use emojify_img::config::EmojifyConfig;
use emojify_img::emoji::EmojiSet;
use emojify_img::pipeline::{AnnotationDetector, Emojified, Pipeline};
use image::{DynamicImage, ImageFormat, RgbaImage};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{Level, debug, info, span, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::format::FmtSpan;

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct CmdArgs {
    /// Photo to emojify
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// JSON document listing the faces in the photo
    #[arg(short, long, value_name = "FILE")]
    faces: PathBuf,

    #[command(flatten)]
    out: Out,

    /// Directory of <expression>.png emoji to use instead of the bundled set
    #[arg(short, long, value_name = "DIR")]
    emoji_dir: Option<PathBuf>,

    /// Edge length of the bundled emoji
    #[arg(long, default_value = "256")]
    emoji_size: u32,

    /// Config file to read from
    #[arg(short, long, value_name = "FILE", default_value = "emojify.json")]
    config: PathBuf,

    /// Delete the input photo once the result is written
    #[arg(long)]
    remove_input: bool,

    /// Outline detected faces on the result
    #[arg(short, long)]
    trace: bool,
}

#[derive(Args, Debug)]
#[group(multiple = false)]
struct Out {
    /// File to write the result to
    #[arg(group = "dest", short, long)]
    output: Option<PathBuf>,

    /// Directory to save a timestamped result in
    #[arg(group = "dest", short, long, default_value = ".")]
    save_dir: PathBuf,
}

fn main() -> Result<()> {
    let filter = EnvFilter::from_default_env();
    tracing_subscriber::fmt()
        .with_span_events(FmtSpan::CLOSE)
        .with_target(false)
        .with_env_filter(filter)
        .init();

    let args = CmdArgs::parse();

    let config = EmojifyConfig::load(&args.config)?;
    let emojis = match args.emoji_dir {
        Some(ref dir) => EmojiSet::from_dir(dir)?,
        None => EmojiSet::builtin(args.emoji_size)?,
    };
    let detector = AnnotationDetector::load(&args.faces)?;
    let mut pipeline = Pipeline::new(Box::new(detector), emojis, config);

    let dest = output_path(&args.out, Local::now());
    let result = process_image(&args.input, &dest, &mut pipeline, args.trace)?;

    for notice in result.notices.iter() {
        eprintln!("{notice}");
    }
    println!("{}", dest.display());

    if args.remove_input && !remove_input(&args.input, &dest)? {
        eprintln!(
            "Kept {}, the result was written over it",
            args.input.display()
        );
    }

    Ok(())
}

/// Deletes the input photo unless the result was saved to the same file.
/// Returns whether anything was removed.
fn remove_input(input: &Path, dest: &Path) -> Result<bool> {
    let input_canon = input
        .canonicalize()
        .with_context(|| format!("Failed to resolve {}", input.display()))?;
    if dest.canonicalize().is_ok_and(|d| d == input_canon) {
        warn!("Not removing {}, it holds the result", input.display());
        return Ok(false);
    }

    std::fs::remove_file(input)
        .with_context(|| format!("Failed to remove {}", input.display()))?;
    debug!("Removed {}", input.display());
    Ok(true)
}

fn output_path(out: &Out, now: DateTime<Local>) -> PathBuf {
    match out.output {
        Some(ref path) => path.clone(),
        None => out
            .save_dir
            .join(now.format("EMOJIFY_%Y%m%d_%H%M%S.png").to_string()),
    }
}

fn process_image(
    src: &Path,
    dest: &Path,
    pipeline: &mut Pipeline,
    trace: bool,
) -> Result<Emojified> {
    let span = span!(Level::DEBUG, "process_image");
    let _guard = span.enter();
    let start = Instant::now();

    let img: RgbaImage = image::open(src)
        .with_context(|| format!("Failed to open photo {}", src.display()))?
        .into_rgba8();

    let result = if trace {
        pipeline.run_trace(&img)?
    } else {
        pipeline.run(&img)?
    };
    debug!("Took {:?}", start.elapsed());

    if let Some(dir) = dest.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
        }
    }
    save(&result.image, dest).with_context(|| format!("Failed to write {}", dest.display()))?;
    info!("Result at {:?}", dest);

    Ok(result)
}

fn save(img: &RgbaImage, dest: &Path) -> Result<()> {
    // JPEG has no alpha channel
    match ImageFormat::from_path(dest) {
        Ok(ImageFormat::Jpeg) => DynamicImage::ImageRgba8(img.clone()).to_rgb8().save(dest)?,
        _ => img.save(dest)?,
    }

    Ok(())
}
