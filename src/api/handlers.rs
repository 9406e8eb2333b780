// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use super::http_server::AppState;
use crate::waste::{is_diy_usable, POINTS_TABLE};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub environment: String,
    pub timestamp: String,
    pub detector: String,
    pub version: String,
}

/// Scoring rule for one category
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CategoryInfo {
    pub category: String,
    pub points: i64,
    pub is_diy_usable: bool,
}

/// GET /api/health
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "success".to_string(),
        message: "API is running".to_string(),
        environment: state.environment.clone(),
        timestamp: chrono::Utc::now().to_rfc3339(),
        detector: state.detector.name().to_string(),
        version: crate::version::VERSION.to_string(),
    })
}

/// GET /api/categories - every scored category with its points
pub async fn categories_handler() -> Json<Vec<CategoryInfo>> {
    Json(category_catalogue())
}

pub fn category_catalogue() -> Vec<CategoryInfo> {
    POINTS_TABLE
        .iter()
        .map(|(category, points)| CategoryInfo {
            category: category.to_string(),
            points: *points,
            is_diy_usable: is_diy_usable(category),
        })
        .collect()
}
