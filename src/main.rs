mod client;
mod config;
mod dedup;
mod ledger;
mod normalize;
mod parser;
mod pipeline;
mod score;
mod signal;
mod table;

use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::warn;

use client::DeepSeekClient;

const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "tiff"];

#[derive(Parser)]
#[command(
    name = "signal_ledger",
    about = "Extract trading signals from chat answers and screenshots into a CSV ledger"
)]
struct Cli {
    /// API key override (otherwise config file, then DEEPSEEK_API_KEY)
    #[arg(long, global = true)]
    api_key: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract a signal from one screenshot and append it to the ledger
    Image {
        image: PathBuf,
        /// Ledger CSV output path
        #[arg(short, long, default_value = "outputs.csv")]
        ledger: PathBuf,
        /// Never prompt for manual input when extraction fails
        #[arg(long)]
        auto_only: bool,
    },
    /// Process every image in a directory, continuing past failures
    Dir {
        dir: PathBuf,
        #[arg(short, long, default_value = "outputs.csv")]
        ledger: PathBuf,
    },
    /// Parse a text answer from a file ("-" reads stdin)
    Text {
        path: PathBuf,
        #[arg(short, long, default_value = "outputs.csv")]
        ledger: PathBuf,
        #[arg(long)]
        auto_only: bool,
        /// Skip the model-backed reformatting fallback
        #[arg(long)]
        no_model: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let client = DeepSeekClient::new(cli.api_key.as_deref());

    match cli.command {
        Commands::Image { image, ledger, auto_only } => {
            let ok = pipeline::process_image_file(&client, &image, &ledger, auto_only).await?;
            if ok {
                println!("Signal data written to {}", ledger.display());
            } else {
                println!("No trading signal could be extracted from {}", image.display());
            }
            Ok(())
        }
        Commands::Dir { dir, ledger } => {
            let images = list_images(&dir)?;
            if images.is_empty() {
                println!("No images found in {}", dir.display());
                return Ok(());
            }
            println!("Processing {} images...", images.len());

            let pb = ProgressBar::new(images.len() as u64);
            pb.set_style(
                ProgressStyle::default_bar()
                    .template("[{elapsed_precise}] {bar:40} {pos}/{len} ({per_sec})")?
                    .progress_chars("=> "),
            );

            let mut ok = 0usize;
            let mut failed = 0usize;
            for image in images {
                // Directory runs never block on a prompt.
                match pipeline::process_image_file(&client, &image, &ledger, true).await {
                    Ok(true) => ok += 1,
                    Ok(false) => failed += 1,
                    Err(e) => {
                        warn!(image = %image.display(), error = %e, "image failed");
                        failed += 1;
                    }
                }
                pb.inc(1);
            }
            pb.finish_and_clear();

            println!("Done: {ok} ok, {failed} failed.");
            Ok(())
        }
        Commands::Text { path, ledger, auto_only, no_model } => {
            let text = read_text(&path)?;
            let ok = pipeline::process_text(&client, &text, &ledger, auto_only, !no_model).await?;
            if ok {
                println!("Signal data written to {}", ledger.display());
            } else {
                println!("No trading signal could be extracted from the text");
            }
            Ok(())
        }
    }
}

/// Images in a directory, name-sorted for stable processing order.
fn list_images(dir: &Path) -> Result<Vec<PathBuf>> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("reading directory {}", dir.display()))?;

    let mut images: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.extension()
                .and_then(|ext| ext.to_str())
                .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .collect();
    images.sort();
    Ok(images)
}

fn read_text(path: &Path) -> Result<String> {
    if path == Path::new("-") {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))
    }
}
