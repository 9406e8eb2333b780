// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use anyhow::{Context, Result};
use clap::Parser;
use std::env;
use waste_analyzer::{
    api::{start_server, AppState},
    config::ServerConfig,
    vision::load_detector,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = ServerConfig::parse();
    config.validate().context("Invalid configuration")?;
    let addr = config.listen_addr()?;

    println!("🚀 Starting {}...\n", waste_analyzer::version::get_version_string());
    println!("🌍 Environment: {}", config.environment);
    println!("🧠 Loading detector from {}", config.model_path.display());

    let detector = load_detector(&config.detector_config(), config.model_url.as_deref())
        .await
        .context("Failed to load object detector")?;
    println!("✅ Detector ready: {}", detector.name());

    let state = AppState::new(detector, config.environment.clone())
        .with_max_upload_bytes(config.max_upload_bytes);

    println!("🌐 Listening on http://{}", addr);
    println!("   POST /api/analyze-waste");
    println!("   GET  /api/health");
    println!("   GET  /api/categories");
    println!();

    start_server(state, addr).await
}
