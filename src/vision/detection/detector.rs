// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detector seam

use anyhow::Result;
use image::DynamicImage;

use super::types::DetectionSet;

/// A pretrained object detector.
///
/// Loaded once at startup and shared read-only by every request, so
/// implementations serialize any internal state that needs `&mut` access.
pub trait ObjectDetector: Send + Sync {
    /// Detector identifier, used in logs and the health endpoint
    fn name(&self) -> &'static str;

    /// Run detection on a decoded image
    fn detect(&self, image: &DynamicImage) -> Result<DetectionSet>;

    /// Vocabulary label for a class id
    fn class_name(&self, class_id: usize) -> Option<String>;
}
