//! Application entry point: Video Tutor web server.
//!
//! # Startup sequence
//!
//! 1. Initialise logging.
//! 2. Load [`AppConfig`] from disk (default on first run), then apply
//!    environment overrides.
//! 3. Create the [`tokio`] runtime.
//! 4. Build the transcript provider ([`HttpTranscriptProvider`]) and wrap it
//!    in a [`TranscriptBridge`].
//! 5. Bind the listener and serve the router until the process is stopped.

use std::sync::Arc;

use anyhow::Context;
use video_tutor::{
    config::AppConfig,
    transcript::{HttpTranscriptProvider, TranscriptBridge},
    web::{build_router, AppState},
};

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

async fn serve(config: AppConfig) -> anyhow::Result<()> {
    let provider = HttpTranscriptProvider::from_config(&config.transcript);
    log::info!("Transcript provider: {}", provider.endpoint());
    let bridge = TranscriptBridge::new(Arc::new(provider), &config.transcript.language);

    if config.voice.agent_id.is_none() {
        log::warn!("No voice agent configured; conversations will fail to start");
    }

    let bind_addr = config.server.bind_addr.clone();
    let app = build_router(AppState::new(config, bridge));

    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    log::info!("Listening on http://{bind_addr}");

    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}

// ---------------------------------------------------------------------------
// main
// ---------------------------------------------------------------------------

fn main() -> anyhow::Result<()> {
    // 1. Logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Video Tutor starting up");

    // 2. Configuration
    let config = AppConfig::load()
        .unwrap_or_else(|e| {
            log::warn!("Failed to load config ({e}); using defaults");
            AppConfig::default()
        })
        .with_env_overrides();

    // 3. Tokio runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to create tokio runtime")?;

    // 4-5. Provider, router, listener
    rt.block_on(serve(config))
}
