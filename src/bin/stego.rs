//! # Stego Binary Entry Point
//!
//! Command-line front end for hiding images inside carrier images and recovering them.
//!
//! ## Usage
//!
//! ```bash
//! cargo run --bin stego -- encode --carrier a.png,b.png --hidden secret.jpg
//! cargo run --bin stego -- decode --carrier dist/encoded_image_1.png,dist/encoded_image_2.png
//! cargo run --bin stego -- compare --original a.png --modified dist/encoded_image_1.png
//! cargo run --bin stego -- capacity --carrier a.png,b.png
//! ```
//!
//! Carriers must be given in the same order for decode as for encode.

use anyhow::Context;
use clap::{Parser, Subcommand};
use log::{info, LevelFilter};
use std::path::PathBuf;

use lsb_stego::common::config::{load_config, StegoConfig};
use lsb_stego::common::logging::{init_logger, parse_level};
use lsb_stego::imaging::metrics::{CarrierQuality, MetricsReport};
use lsb_stego::imaging::{self, compare};
use lsb_stego::processing::{self, bitcodec, framer};

/// Command-line arguments for the stego binary
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to a configuration file (TOML format)
    ///
    /// Example: config/stego.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// More logging (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Hide images inside one or more carriers
    Encode {
        /// Carrier images, in order (comma-separated or repeated)
        #[arg(long = "carrier", required = true, value_delimiter = ',')]
        carriers: Vec<PathBuf>,

        /// Images to hide, in order
        #[arg(long = "hidden", required = true, value_delimiter = ',')]
        hidden: Vec<PathBuf>,

        /// Output directory (overrides the config file)
        #[arg(short, long)]
        out_dir: Option<String>,

        /// Write a JSON quality report comparing encoded and original carriers
        #[arg(long)]
        report: Option<PathBuf>,
    },
    /// Recover hidden images from encoded carriers
    Decode {
        /// Encoded carriers, in the order used for encoding
        #[arg(long = "carrier", required = true, value_delimiter = ',')]
        carriers: Vec<PathBuf>,

        /// Output directory (overrides the config file)
        #[arg(short, long)]
        out_dir: Option<String>,
    },
    /// Print MSE, PSNR and accuracy between two images
    Compare {
        #[arg(long)]
        original: PathBuf,
        #[arg(long)]
        modified: PathBuf,
    },
    /// Print how many payload bytes each carrier can hold
    Capacity {
        #[arg(long = "carrier", required = true, value_delimiter = ',')]
        carriers: Vec<PathBuf>,
    },
}

fn log_level(args: &Args, config: &StegoConfig) -> LevelFilter {
    if args.quiet {
        return LevelFilter::Error;
    }
    match args.verbose {
        0 => parse_level(&config.logging.level),
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    }
}

async fn run_encode(
    config: &StegoConfig,
    carrier_paths: Vec<PathBuf>,
    hidden_paths: Vec<PathBuf>,
    report: Option<PathBuf>,
) -> anyhow::Result<()> {
    let carriers = imaging::load_all(&carrier_paths).context("failed to load carrier images")?;
    let hidden: Vec<_> = imaging::load_all(&hidden_paths)
        .context("failed to load hidden images")?
        .iter()
        .map(|img| imaging::downscale(img, config.hidden.downscale))
        .collect();

    let payload_bytes = framer::serialized_len(&hidden);
    let capacity: usize = processing::pipeline::capacities(&carriers).iter().sum();
    info!(
        "📦 Payload {} bytes, carrier capacity {} bytes",
        payload_bytes, capacity
    );

    let encoded =
        processing::encode_concurrent(carriers.clone(), hidden.clone(), config.pipeline.workers)
            .await?;

    for (index, img) in encoded.iter().enumerate() {
        let path = config.output.encoded_path(index);
        imaging::save_image(img, &path)?;
        info!("✅ Encoded image saved as {}", path.display());
    }

    if let Some(report_path) = report {
        let mut metrics = MetricsReport {
            hidden_images: hidden.len(),
            payload_bytes,
            ..MetricsReport::default()
        };
        for ((original, modified), path) in carriers.iter().zip(&encoded).zip(&carrier_paths) {
            metrics.carriers.push(CarrierQuality {
                path: path.display().to_string(),
                width: original.width(),
                height: original.height(),
                capacity_bytes: bitcodec::capacity(original.width(), original.height()),
                quality: compare(original, modified)?,
            });
        }
        metrics.export_to_json(&report_path)?;
        info!("📊 Metrics exported to: {}", report_path.display());
    }

    Ok(())
}

async fn run_decode(config: &StegoConfig, carrier_paths: Vec<PathBuf>) -> anyhow::Result<()> {
    let carriers = imaging::load_all(&carrier_paths).context("failed to load encoded carriers")?;
    let hidden = processing::decode_concurrent(carriers, config.pipeline.workers).await?;

    for (index, img) in hidden.iter().enumerate() {
        let path = config.output.decoded_path(index);
        imaging::save_image(img, &path)?;
        info!(
            "✅ Hidden image {} ({}x{}) saved as {}",
            index + 1,
            img.width(),
            img.height(),
            path.display()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let args = Args::parse();

    let mut config: StegoConfig = match &args.config {
        Some(path) => load_config(path)
            .with_context(|| format!("failed to read config {}", path.display()))?,
        None => StegoConfig::default(),
    };

    // Initialize logging
    init_logger(log_level(&args, &config));

    match args.command {
        Command::Encode {
            carriers,
            hidden,
            out_dir,
            report,
        } => {
            if let Some(dir) = out_dir {
                config.output.directory = dir;
            }
            run_encode(&config, carriers, hidden, report).await?;
        }
        Command::Decode { carriers, out_dir } => {
            if let Some(dir) = out_dir {
                config.output.directory = dir;
            }
            run_decode(&config, carriers).await?;
        }
        Command::Compare { original, modified } => {
            let report = compare(&imaging::load_rgb(&original)?, &imaging::load_rgb(&modified)?)?;
            println!("{}", report);
        }
        Command::Capacity { carriers } => {
            let images = imaging::load_all(&carriers)?;
            let capacities = processing::pipeline::capacities(&images);
            for (path, capacity) in carriers.iter().zip(&capacities) {
                println!("{}: {} bytes", path.display(), capacity);
            }
            println!("total: {} bytes", capacities.iter().sum::<usize>());
        }
    }

    Ok(())
}
