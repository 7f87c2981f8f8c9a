//! CLI tool for building PowerPoint files from slide templates.

use anyhow::{bail, Context, Result};
use clap::Parser;
use deck_core::{ImageAsset, ImageAssets, Template};
use deck_pptx::{Compression, PptxWriter};
use std::fs;
use std::path::{Path, PathBuf};

/// Build a single-slide .pptx from a JSON template.
#[derive(Parser, Debug)]
#[command(name = "deck-build")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Template JSON file
    input: PathBuf,

    /// Output file (default: input path with a .pptx extension)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Image to embed, as ID=PATH (repeatable)
    #[arg(short, long = "image", value_name = "ID=PATH")]
    images: Vec<String>,

    /// Deflate level, 0-9
    #[arg(short = 'l', long)]
    compression_level: Option<i32>,

    /// Store entries without compression
    #[arg(long, conflicts_with = "compression_level")]
    store: bool,

    /// Re-open the written package and check its manifest
    #[arg(long)]
    verify: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    let json = fs::read_to_string(&args.input)
        .with_context(|| format!("Failed to read {}", args.input.display()))?;
    let template = Template::from_json(&json)
        .with_context(|| format!("Invalid template in {}", args.input.display()))?;

    let images = load_images(&args.images)?;

    let writer = PptxWriter::new()
        .with_compression(if args.store {
            Compression::Stored
        } else {
            Compression::Deflated
        })
        .with_compression_level(args.compression_level);

    let bytes = writer
        .build_with_images(&template, &images)
        .context("Failed to build presentation")?;

    if args.verify {
        let report = deck_pptx::inspect(&bytes).context("Failed to re-open package")?;
        if !report.is_consistent() {
            bail!("Package failed verification:\n{}", report);
        }
        if args.verbose {
            eprint!("Verified: {}", report);
        }
    }

    let output_path = get_output_path(&args.input, args.output.as_deref());
    fs::write(&output_path, &bytes)
        .with_context(|| format!("Failed to write {}", output_path.display()))?;

    if args.verbose {
        eprintln!(
            "Written {} elements to {} ({} bytes)",
            template.elements.len(),
            output_path.display(),
            bytes.len()
        );
    }

    Ok(())
}

/// Read every `ID=PATH` image argument.
fn load_images(args: &[String]) -> Result<ImageAssets> {
    let mut images = ImageAssets::new();
    for arg in args {
        let (id, path) = arg
            .split_once('=')
            .with_context(|| format!("Expected ID=PATH, got {:?}", arg))?;
        let data = fs::read(path).with_context(|| format!("Failed to read image {}", path))?;
        let asset = ImageAsset::from_bytes(data)
            .with_context(|| format!("Cannot embed image {}", path))?;
        if images.insert(id.to_string(), asset).is_some() {
            log::warn!("Image id '{}' given more than once; using {}", id, path);
        }
    }
    Ok(images)
}

/// Determine the output path for a template file.
fn get_output_path(input_path: &Path, output: Option<&Path>) -> PathBuf {
    match output {
        Some(path) => path.to_path_buf(),
        None => input_path.with_extension("pptx"),
    }
}
