// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Waste analysis endpoint handler

use axum::{body::Bytes, extract::State, Json};
use axum_extra::extract::multipart::{Multipart, MultipartRejection};
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::api::errors::ApiError;
use crate::api::http_server::AppState;
use crate::vision::{decode_image_bytes_with_limit, ObjectDetector};
use crate::waste::AnalysisResult;

/// Multipart field carrying the uploaded image
pub const IMAGE_FIELD: &str = "image";

/// POST /api/analyze-waste - Score the main object in an uploaded image
///
/// # Request
/// Multipart form with a file field named `image`.
///
/// # Response
/// - `detected_class`: Detector label of the highest-confidence object
/// - `category`: Waste category for that object
/// - `confidence`: Detection confidence (0.0-1.0)
/// - `is_diy_usable`: Whether the category is reusable in DIY projects
/// - `total_points`: Points for the category
///
/// # Errors
/// - 400 Bad Request: No image file provided
/// - 400 Bad Request: No objects detected in the image
/// - 500 Internal Server Error: Anything else, with the failure message
pub async fn analyze_waste_handler(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<AnalysisResult>, ApiError> {
    match analyze_upload(&state, multipart).await {
        Ok(result) => {
            info!("Sending response: {:?}", result);
            Ok(Json(result))
        }
        Err(e) => {
            match &e {
                ApiError::Internal(_) => error!("Error processing image: {}", e),
                _ => warn!("Rejected analysis request: {}", e),
            }
            Err(e)
        }
    }
}

async fn analyze_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<AnalysisResult, ApiError> {
    let image_bytes = read_image_field(multipart).await?;
    debug!("Received image upload: {} bytes", image_bytes.len());

    let detector = state.detector.clone();
    let max_image_bytes = state.max_upload_bytes;
    tokio::task::spawn_blocking(move || {
        run_analysis(detector.as_ref(), &image_bytes, max_image_bytes)
    })
        .await
        .map_err(|e| ApiError::Internal(e.to_string()))?
}

/// Pull the bytes of the first file part named `image`.
///
/// A body that is not multipart at all counts as a missing image.
async fn read_image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Bytes, ApiError> {
    let mut multipart = multipart.map_err(|rejection| {
        debug!("Request is not multipart: {}", rejection);
        ApiError::MissingImage
    })?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() == Some(IMAGE_FIELD) && field.file_name().is_some() {
            return Ok(field.bytes().await?);
        }
    }

    Err(ApiError::MissingImage)
}

/// Decode, detect, pick the best detection and score it.
///
/// `max_image_bytes` is the configured upload limit.
pub fn run_analysis(
    detector: &dyn ObjectDetector,
    image_bytes: &[u8],
    max_image_bytes: usize,
) -> Result<AnalysisResult, ApiError> {
    let (image, image_info) = decode_image_bytes_with_limit(image_bytes, max_image_bytes)?;

    debug!(
        "Decoded image: {}x{} {:?}, {} bytes",
        image_info.width, image_info.height, image_info.format, image_info.size_bytes
    );

    let detections = detector.detect(&image)?;
    info!(
        "Inference results ({}): {} detections {:?}",
        detector.name(),
        detections.len(),
        detections
    );

    let best = detections.best().ok_or(ApiError::NoObjectsDetected)?;

    let detected_class = detector.class_name(best.class_id).ok_or_else(|| {
        ApiError::Internal(format!(
            "Class id {} is not in the {} vocabulary",
            best.class_id,
            detector.name()
        ))
    })?;

    Ok(AnalysisResult::from_detection(detected_class, best))
}
