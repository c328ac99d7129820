mod analysis;
mod config;
mod errors;
mod extraction;
mod llm_client;
mod models;
mod ocr;
mod routes;
mod state;
mod upload;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::analysis::LlmResumeAnalyzer;
use crate::config::Config;
use crate::extraction::PatternExtractor;
use crate::llm_client::LlmClient;
use crate::ocr::build_recognizer;
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume scorer v{}", env!("CARGO_PKG_VERSION"));

    // Scoped temp files are created here; it must exist before the first request
    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| {
            format!(
                "Failed to create upload directory {}",
                config.upload_dir.display()
            )
        })?;
    info!("Upload directory: {}", config.upload_dir.display());

    // Initialize LLM client
    let llm = LlmClient::new(
        config.gemini_api_key.clone(),
        config.analysis_model.clone(),
        config.analysis_api_base.clone(),
    )?;
    info!("LLM client initialized (model: {})", llm.model());

    // Initialize OCR engine
    let recognizer = build_recognizer(&config.ocr);
    info!(
        "OCR: {} + {} at {} DPI (text layer first: {})",
        config.ocr.pdftoppm_path,
        config.ocr.tesseract_path,
        config.ocr.dpi,
        config.ocr.prefer_text_layer
    );

    // Build app state
    let state = AppState {
        config: config.clone(),
        recognizer,
        extractor: Arc::new(PatternExtractor),
        analyzer: Arc::new(LlmResumeAnalyzer::new(llm)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
