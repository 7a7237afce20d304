//! Model Stager - Main entry point

use anyhow::Result;
use clap::Parser;
use model_stager::{Fetcher, HubSource, StagerConfig, stage};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "model-stager")]
#[command(about = "Stages model artifacts from HuggingFace Hub", long_about = None)]
#[command(version)]
struct Cli {
    /// Override the model repository id (defaults to $MODEL_NAME)
    #[arg(long)]
    model: Option<String>,

    /// Override the model revision
    #[arg(long)]
    revision: Option<String>,

    /// Override the exact filename (gguf path)
    #[arg(long)]
    filename: Option<String>,

    /// Override the quantization mode
    #[arg(long)]
    quantization: Option<String>,

    /// Override the download cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,

    /// Override the manifest output directory
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log format (json or pretty)
    #[arg(long, default_value = "json")]
    log_format: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    match cli.log_format.as_str() {
        "pretty" => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .init();
        }
        _ => {
            tracing_subscriber::fmt()
                .with_env_filter(&cli.log_level)
                .json()
                .init();
        }
    }

    tracing::info!("Starting model stager");

    // Load configuration
    let mut config = StagerConfig::from_env();

    // CLI overrides
    if let Some(model) = cli.model {
        config.model_name = model;
    }
    if let Some(revision) = cli.revision {
        config.model_revision = Some(revision);
    }
    if let Some(filename) = cli.filename {
        config.model_filename = Some(filename);
    }
    if let Some(quantization) = cli.quantization {
        config.quantization = Some(quantization);
    }
    if let Some(cache_dir) = cli.cache_dir {
        config.cache_dir = cache_dir;
    }
    if let Some(output_dir) = cli.output_dir {
        config.output_dir = output_dir;
    }

    config.validate()?;

    tracing::info!(
        model = %config.model_name,
        revision = ?config.model_revision,
        filename = ?config.model_filename,
        quantization = ?config.quantization,
        cache_dir = ?config.cache_dir,
        "Configuration loaded"
    );

    let source = Arc::new(HubSource::new(config.cache_dir.clone())?);
    let fetcher = Fetcher::new(source);

    let manifest = stage::run(&config, &fetcher).await?;
    let manifest_path = manifest.write(&config.output_dir).await?;

    tracing::info!(manifest = ?manifest_path, "Staging complete");

    Ok(())
}
