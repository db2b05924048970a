//! Courier API Server
//!
//! Main entry point for the text generation and file relay service.

use std::sync::Arc;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use courier_api::{AppState, create_router};
use courier_core::completion::{CompletionClient, OpenAiCompletionClient};
use courier_core::storage::{self, StorageProvider};
use courier_core::upload::UploadPolicy;
use courier_shared::{AppConfig, StorageBackend};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    if config.storage.backend == StorageBackend::LocalFs {
        std::fs::create_dir_all(&config.storage.local_root).with_context(|| {
            format!(
                "Failed to create storage root {}",
                config.storage.local_root.display()
            )
        })?;
    }
    let provider = StorageProvider::from_settings(&config.storage)?;
    let storage = storage::connect(provider)?;

    let completion = OpenAiCompletionClient::from_config(&config.openai)?;
    info!(model = %completion.model(), "Completion client ready");
    let completion: Arc<dyn CompletionClient> = Arc::new(completion);

    std::fs::create_dir_all(&config.upload.temp_dir).with_context(|| {
        format!(
            "Failed to create upload directory {}",
            config.upload.temp_dir.display()
        )
    })?;
    let policy = UploadPolicy::from_config(&config.upload);
    info!(
        max_file_size = policy.max_file_size,
        temp_dir = %config.upload.temp_dir.display(),
        "Upload intake configured"
    );

    let state = AppState::new(storage, completion, policy, config.upload.temp_dir.clone());
    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
