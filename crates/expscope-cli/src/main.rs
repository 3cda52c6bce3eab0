use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;
mod commands;

use cli::Cli;
use expscope_storage::{Storage, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expscope=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Parse CLI arguments
    let cli = Cli::parse();

    // Resolve the storage descriptor before dispatching; every
    // command needs a live backend.
    let config = StorageConfig::from_file(&cli.storage_config).with_context(|| {
        format!(
            "Error loading storage configuration: {}",
            cli.storage_config.display()
        )
    })?;
    let storage = Storage::connect(&config)
        .await
        .context("Error connecting to results backend")?;

    commands::execute(cli.command, storage).await
}
