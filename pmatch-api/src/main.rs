//! pmatch-api - photo to character matching service
//!
//! Accepts a photo, asks Google Cloud Vision for face, label and color signals,
//! scores the six archetypes and answers with one of fourteen characters.

use anyhow::{Context, Result};
use clap::Parser;
use std::sync::Arc;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pmatch_api::cli::Args;
use pmatch_api::vision::GoogleVisionClient;
use pmatch_api::{build_router, AppState, MODULE_NAME};
use pmatch_common::config::load_module_config;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let toml_config = load_module_config(args.config.as_deref(), MODULE_NAME)
        .context("Failed to load configuration")?;

    // RUST_LOG wins over the configured level
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| toml_config.logging.level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting PMATCH API ({}) v{} [{}] built {} ({})",
        MODULE_NAME,
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    let config = args.resolve(toml_config).context("Invalid configuration")?;

    if !config.static_dir.is_dir() {
        warn!(
            "Static assets directory {} does not exist; character images will 404",
            config.static_dir.display()
        );
    }
    info!("Static assets: {}", config.static_dir.display());

    let analyzer = GoogleVisionClient::new(
        config.vision_api_key.clone(),
        &config.vision_endpoint,
        config.vision_timeout,
    )
    .context("Failed to create Vision API client")?;
    info!("Vision API endpoint: {}", analyzer.annotate_url());

    let state = AppState::new(Arc::new(analyzer), config.static_dir.clone(), config.max_upload_bytes);
    let app = build_router(state);

    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("Received Ctrl+C, shutting down"),
        _ = terminate => info!("Received SIGTERM, shutting down"),
    }
}
