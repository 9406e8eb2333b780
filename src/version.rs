// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
// Version information for the waste analyzer

/// Semantic version number
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Service name reported in logs
pub const SERVICE_NAME: &str = "Waste Analyzer";

/// Supported features in this version
pub const FEATURES: &[&str] = &[
    "yolov8-onnx",
    "waste-categories",
    "diy-scoring",
    "model-download",
];

/// Get formatted version string for logging
pub fn get_version_string() -> String {
    format!("{} {}", SERVICE_NAME, VERSION)
}
