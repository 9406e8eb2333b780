// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request-level error boundary
//!
//! Every failure inside a request ends up as one of these variants and is
//! rendered as `{"error": "<message>"}` with the matching status code.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use axum_extra::extract::multipart::MultipartError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::vision::ImageError;

/// JSON error body
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// No file part named `image` in the request
    #[error("No image file provided")]
    MissingImage,

    /// The detector found nothing in the image
    #[error("No objects detected in the image")]
    NoObjectsDetected,

    /// Any other failure, message passed through to the caller
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::MissingImage | ApiError::NoObjectsDetected => StatusCode::BAD_REQUEST,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            error: self.to_string(),
        }
    }
}

impl From<ImageError> for ApiError {
    fn from(err: ImageError) -> Self {
        ApiError::Internal(err.to_string())
    }
}

/// Multipart read failures keep their cause chain, e.g.
/// "failed to read stream: length limit exceeded"
impl From<MultipartError> for ApiError {
    fn from(err: MultipartError) -> Self {
        let mut message = err.body_text();
        let mut cause = std::error::Error::source(&err).and_then(|multer| multer.source());
        while let Some(source) = cause {
            let text = source.to_string();
            if !message.ends_with(&text) {
                message = format!("{}: {}", message, text);
            }
            cause = source.source();
        }
        ApiError::Internal(message)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::Internal(format!("{:#}", err))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code(), Json(self.to_response())).into_response()
    }
}
