// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector model acquisition and loading
//!
//! The model file is resolved once at startup. A missing file is fetched from
//! the configured URL; with no URL, startup fails.

use anyhow::{Context, Result};
use futures::StreamExt;
use indicatif::{ProgressBar, ProgressStyle};
use std::path::Path;
use std::sync::Arc;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::vision::detection::{DetectorConfig, ObjectDetector, YoloDetector};

/// Make sure the model file exists locally, downloading it if needed.
///
/// The download goes to a `.part` file next to the target and is renamed into
/// place once complete, so an interrupted fetch never leaves a truncated model.
pub async fn ensure_model_file(model_path: &Path, model_url: Option<&str>) -> Result<()> {
    if model_path.exists() {
        info!("Using detection model at {}", model_path.display());
        return Ok(());
    }

    let url = model_url.ok_or_else(|| {
        anyhow::anyhow!(
            "Detection model not found at {} and no MODEL_URL configured",
            model_path.display()
        )
    })?;

    if let Some(parent) = model_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("Failed to create model directory {}", parent.display()))?;
    }

    info!("Downloading detection model from {}", url);

    let response = reqwest::get(url)
        .await
        .with_context(|| format!("Failed to request model from {}", url))?
        .error_for_status()
        .with_context(|| format!("Model download from {} was rejected", url))?;

    let progress = match response.content_length() {
        Some(total) => {
            let bar = ProgressBar::new(total);
            bar.set_style(
                ProgressStyle::with_template("{bar:40} {bytes}/{total_bytes} ({eta})")?,
            );
            bar
        }
        None => ProgressBar::new_spinner(),
    };

    let partial_path = model_path.with_extension("part");
    let mut file = tokio::fs::File::create(&partial_path)
        .await
        .with_context(|| format!("Failed to create {}", partial_path.display()))?;

    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.context("Model download interrupted")?;
        file.write_all(&chunk)
            .await
            .with_context(|| format!("Failed to write {}", partial_path.display()))?;
        progress.inc(chunk.len() as u64);
    }
    file.flush().await?;
    drop(file);
    progress.finish_and_clear();

    tokio::fs::rename(&partial_path, model_path)
        .await
        .with_context(|| format!("Failed to move model into {}", model_path.display()))?;

    info!("✅ Detection model saved to {}", model_path.display());
    Ok(())
}

/// Acquire the model file and build the shared detector
pub async fn load_detector(
    config: &DetectorConfig,
    model_url: Option<&str>,
) -> Result<Arc<dyn ObjectDetector>> {
    ensure_model_file(&config.model_path, model_url).await?;

    let config = config.clone();
    let detector = tokio::task::spawn_blocking(move || YoloDetector::new(&config))
        .await
        .context("Detector loading task failed")??;

    Ok(Arc::new(detector))
}
