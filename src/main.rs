use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use apod_wallpaper::{
    config::Config,
    pipeline::{ApodPipeline, RunOutcome},
    utils::{StandardHttpClient, parse_date_key, today_key},
};

#[derive(Parser)]
#[command(name = "apod-wallpaper")]
#[command(version)]
#[command(about = "Caches the Astronomy Picture of the Day with a wallpaper crop and a thumbnail")]
#[command(long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, default_value = "apod.toml")]
    config: String,

    /// Cache directory (overrides config file)
    #[arg(short, long, value_name = "DIR")]
    base_path: Option<PathBuf>,

    /// Fetch this day instead of today (YYYY-MM-DD)
    #[arg(short, long, value_name = "DATE")]
    date: Option<String>,

    /// Log level
    #[arg(short = 'v', long, default_value = "info")]
    log_level: String,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr; stdout carries only the manifest path
    let log_filter = format!("apod_wallpaper={}", cli.log_level);
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| log_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    match run(cli).await {
        Ok(outcome) => {
            if let Some(manifest) = outcome.manifest_path() {
                println!("{}", manifest.display());
            }
            ExitCode::from(outcome.exit_code())
        }
        Err(e) => {
            tracing::error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<RunOutcome> {
    info!("Starting apod-wallpaper v{}", env!("CARGO_PKG_VERSION"));

    let mut config = Config::load_from_file(&cli.config)?;
    info!("Configuration loaded from: {}", cli.config);

    if let Some(base_path) = cli.base_path {
        config.storage.base_path = Some(base_path);
    }
    let base_path = config.base_path()?;
    std::fs::create_dir_all(&base_path)?;
    info!("Using cache directory: {}", base_path.display());

    let date_key = match cli.date {
        Some(date) => parse_date_key(&date)?,
        None => today_key(config.cache.tz()?),
    };
    info!("Date key: {} ({})", date_key, config.cache.timezone);

    let client = StandardHttpClient::new(&config.api)?;
    let pipeline = ApodPipeline::new(&config, base_path, client)?;

    let outcome = pipeline.run(&date_key).await?;

    match &outcome {
        RunOutcome::Cached(_) => info!("I have today's APOD"),
        RunOutcome::Fetched(_) => info!("Fetched today's APOD"),
        RunOutcome::FellBack { reason, .. } => warn!("Using an earlier APOD: {}", reason),
        RunOutcome::Unavailable { reason } => warn!("No APOD available: {}", reason),
    }

    Ok(outcome)
}
