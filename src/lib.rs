// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod config;
pub mod version;
pub mod vision;
pub mod waste;

pub use api::{create_app, start_server, ApiError, AppState};
pub use config::{ConfigError, ServerConfig};
pub use vision::{Detection, DetectionSet, ObjectDetector, YoloDetector};
pub use waste::{calculate_points, map_category, AnalysisResult};
