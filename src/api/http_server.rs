// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! HTTP server wiring

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::{net::SocketAddr, sync::Arc};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::analyze::analyze_waste_handler;
use super::handlers::{categories_handler, health_handler};
use crate::vision::image_utils::MAX_IMAGE_SIZE;
use crate::vision::ObjectDetector;

/// Shared, read-only state for every request
#[derive(Clone)]
pub struct AppState {
    /// Detector loaded at startup
    pub detector: Arc<dyn ObjectDetector>,
    /// Deployment environment reported by the health endpoint
    pub environment: String,
    /// Request body limit in bytes
    pub max_upload_bytes: usize,
}

impl AppState {
    pub fn new(detector: Arc<dyn ObjectDetector>, environment: impl Into<String>) -> Self {
        Self {
            detector,
            environment: environment.into(),
            max_upload_bytes: MAX_IMAGE_SIZE,
        }
    }

    pub fn with_max_upload_bytes(mut self, max_upload_bytes: usize) -> Self {
        self.max_upload_bytes = max_upload_bytes;
        self
    }
}

/// Build the application router
pub fn create_app(state: Arc<AppState>) -> Router {
    let body_limit = state.max_upload_bytes;

    Router::new()
        .route("/api/analyze-waste", post(analyze_waste_handler))
        .route("/api/health", get(health_handler))
        .route("/api/categories", get(categories_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until Ctrl+C
pub async fn start_server(state: AppState, addr: SocketAddr) -> anyhow::Result<()> {
    let app = create_app(Arc::new(state));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("⏹️  Shutting down...");
}
