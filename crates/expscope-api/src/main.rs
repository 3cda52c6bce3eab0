use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use expscope_api::{create_router, ApiState};
use expscope_storage::{Storage, StorageConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "expscope_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    // Get configuration
    let port = env::var("API_PORT")
        .unwrap_or_else(|_| "8000".to_string())
        .parse::<u16>()?;

    let config_path =
        env::var("EXPSCOPE_STORAGE_CONFIG").unwrap_or_else(|_| "storage/sqlite.json".to_string());

    // Connect to the results backend. A bad descriptor or unreachable
    // backend is a startup error; there is nothing to serve without it.
    let config = StorageConfig::from_file(&config_path)
        .with_context(|| format!("Error loading storage configuration: {}", config_path))?;
    let storage = Storage::connect(&config)
        .await
        .context("Error connecting to results backend")?;

    let state = ApiState {
        storage: Arc::new(storage),
    };

    // Build router
    let app = create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", port);
    tracing::info!("expscope API listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
