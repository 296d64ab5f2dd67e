//! PDF Split Server
//!
//! Accepts a PDF plus page ranges over HTTP and returns the extracted pages,
//! as a single PDF or a zip with one PDF per range.

use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use pdf_split_server::config::Config;
use pdf_split_server::routes;
use pdf_split_server::split::{QpdfExtractor, SplitConfig, SplitService};
use pdf_split_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "pdf_split_server=debug,tower_http=debug".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env().unwrap_or_else(|e| {
        tracing::warn!("Failed to load config from env: {}, using defaults", e);
        Config::default()
    });

    tracing::info!("Starting PDF Split Server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Upload root: {}", config.storage.upload_root.display());

    // Probe the page extractor
    let extractor = QpdfExtractor::new(config.extractor.qpdf_path.clone());
    match extractor.version().await {
        Ok(version) => tracing::info!("Using {}", version),
        Err(e) => tracing::warn!(
            "{}. /split will fail until qpdf is installed (QPDF_PATH={})",
            e,
            extractor.qpdf_path()
        ),
    }

    let split_service = SplitService::new(
        SplitConfig {
            upload_root: config.storage.upload_root.clone(),
        },
        Arc::new(extractor),
    );
    split_service
        .ensure_upload_root()
        .await
        .context("Failed to create upload root")?;

    let app_state = AppState::new(config.clone(), split_service);

    let app = routes::router(app_state).layer(TraceLayer::new_for_http());

    // Start server with graceful shutdown
    let addr = config.bind_address();
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    tracing::info!("PDF Split Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
