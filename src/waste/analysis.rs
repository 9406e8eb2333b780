// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Analysis result returned by POST /api/analyze-waste

use serde::{Deserialize, Serialize};

use super::categories::{is_diy_usable, map_category};
use super::points::calculate_points;
use crate::vision::detection::Detection;

/// Scored outcome for the best detection in one image
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Label from the detector's own vocabulary (e.g. "person", "car")
    pub detected_class: String,
    /// Waste category resolved from the class id
    pub category: String,
    /// Detector confidence for the selected detection
    pub confidence: f64,
    /// Whether the category is reusable in DIY projects
    pub is_diy_usable: bool,
    /// Points awarded for the category
    pub total_points: i64,
}

impl AnalysisResult {
    /// Score a detection. `detected_class` is the detector's label for
    /// `detection.class_id`.
    pub fn from_detection(detected_class: impl Into<String>, detection: &Detection) -> Self {
        let category = map_category(detection.class_id);

        Self {
            detected_class: detected_class.into(),
            category: category.to_string(),
            confidence: f64::from(detection.confidence),
            is_diy_usable: is_diy_usable(category),
            total_points: calculate_points(category),
        }
    }
}
