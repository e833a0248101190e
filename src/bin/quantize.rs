use anyhow::{Context, Result};
use clap::Parser;
use image_quantize_wasm::codec::{convolve_bytes, decode, encode_png, quantize_bytes};
use image_quantize_wasm::kmeans::DEFAULT_MAX_ITERATIONS;
use image_quantize_wasm::{Kernel, QuantizeConfig, SeedStrategy, reduce_to_eight};
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Reduce images to a handful of colors, or run 3×3 convolution filters.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// One or more input image paths
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Number of colors for k-means when no custom palette is provided
    #[arg(short = 'k', long, default_value_t = 8)]
    n_colors: usize,

    /// Comma-separated list of hex colors to map onto (skip k-means)
    #[arg(short = 'c', long, conflicts_with_all = ["kernel", "eight"])]
    palette: Option<String>,

    /// Apply a 3×3 kernel instead of quantizing: identity, blur, edges, sharpen
    #[arg(long, conflicts_with = "eight")]
    kernel: Option<String>,

    /// Posterize to eight colors with a fixed per-channel threshold
    #[arg(long)]
    eight: bool,

    /// RNG seed for a reproducible palette
    #[arg(long)]
    seed: Option<u64>,

    /// Give up on k-means convergence after this many passes
    #[arg(long, default_value_t = DEFAULT_MAX_ITERATIONS)]
    max_iterations: usize,

    /// Seed k-means with the first distinct colors of the image instead of random ones
    #[arg(long)]
    first_pixels: bool,

    /// Output directory
    #[arg(short = 'd', long)]
    out_dir: Option<PathBuf>,

    /// Output filename prefix (ignored when --out-dir supplied)
    #[arg(short = 'p', long, default_value = "quantized_")]
    prefix: String,

    /// Print a JSON summary of every written file and its palette
    #[arg(long)]
    json: bool,
}

fn output_path(args: &Args, input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    if let Some(dir) = &args.out_dir {
        dir.join(format!("{stem}.png"))
    } else {
        let parent = input.parent().unwrap_or(Path::new(""));
        parent.join(format!("{}{}.png", args.prefix, stem))
    }
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    let palette_vec: Option<Vec<&str>> = args.palette.as_deref().map(|s| s.split(',').collect());
    let kernel = args
        .kernel
        .as_deref()
        .map(Kernel::from_name)
        .transpose()
        .context("invalid --kernel")?;

    let mut config = QuantizeConfig::new().max_iterations(args.max_iterations);
    if let Some(seed) = args.seed {
        config = config.seed(seed);
    }
    if args.first_pixels {
        config = config.seed_strategy(SeedStrategy::FirstPixels);
    }

    let mut summary = Vec::new();
    for input in &args.inputs {
        let bytes = fs::read(input).with_context(|| format!("reading {}", input.display()))?;

        let (png, palette) = if let Some(kernel) = &kernel {
            (convolve_bytes(&bytes, kernel).context("convolution failed")?, Vec::new())
        } else if args.eight {
            let raster = decode(&bytes).context("decoding image")?;
            (encode_png(&reduce_to_eight(&raster))?, Vec::new())
        } else {
            quantize_bytes(&bytes, args.n_colors, palette_vec.as_deref(), &config)
                .context("quantize processing failed")?
        };

        let out_path = output_path(&args, input);
        if let Some(parent) = out_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&out_path, png)?;
        tracing::info!(input = %input.display(), output = %out_path.display(), colors = palette.len(), "saved");

        summary.push(serde_json::json!({
            "input": input.display().to_string(),
            "output": out_path.display().to_string(),
            "palette": palette,
        }));
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    }

    Ok(())
}
