pub mod commands;
pub mod config;
pub mod error;
pub mod models;
pub mod services;

use clap::Parser;
use commands::analyze::{analyze_file, AnalyzeRequest};
use commands::report::render_report;
use config::Config;
use models::upload_types::UploadSlot;
use std::path::PathBuf;
use tracing::{debug, info};

/// Deepscan - submit a media file for deepfake analysis
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Audio, image or video file to analyze
    file: PathBuf,

    /// Upload slot to use (default: detected from the file extension)
    #[arg(short, long, value_enum)]
    slot: Option<UploadSlot>,

    /// Analysis endpoint (overrides DEEPSCAN_ENDPOINT)
    #[arg(short, long)]
    endpoint: Option<String>,

    /// Print the normalized result as JSON instead of a report
    #[arg(long)]
    json: bool,

    /// Write suspicious frames returned for videos into this directory
    #[arg(long)]
    frames_dir: Option<PathBuf>,
}

pub async fn run() -> anyhow::Result<()> {
    let dotenv_loaded = dotenvy::dotenv().is_ok();
    let mut config = Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_new(&config.rust_log)
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_line_number(true)
        .init();

    if dotenv_loaded {
        debug!("Environment variables loaded from .env file");
    }

    let args = Args::parse();

    if let Some(endpoint) = args.endpoint {
        debug!("Using endpoint from --endpoint argument: {}", endpoint);
        config.endpoint = endpoint;
    }
    config.validate()?;

    info!("Submitting {}", args.file.display());
    let result = analyze_file(
        &config,
        AnalyzeRequest {
            path: args.file,
            slot: args.slot,
            frames_dir: args.frames_dir,
        },
    )
    .await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print!("{}", render_report(&result));
    }
    Ok(())
}
