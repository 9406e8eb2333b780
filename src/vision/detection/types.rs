// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detection result types

use serde::Serialize;

/// Axis-aligned box in source-image pixel coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub x1: f32,
    pub y1: f32,
    pub x2: f32,
    pub y2: f32,
}

impl BoundingBox {
    pub fn new(x1: f32, y1: f32, x2: f32, y2: f32) -> Self {
        Self { x1, y1, x2, y2 }
    }

    /// Build from a center point plus width and height
    pub fn from_center(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Self {
            x1: cx - width / 2.0,
            y1: cy - height / 2.0,
            x2: cx + width / 2.0,
            y2: cy + height / 2.0,
        }
    }

    pub fn width(&self) -> f32 {
        (self.x2 - self.x1).max(0.0)
    }

    pub fn height(&self) -> f32 {
        (self.y2 - self.y1).max(0.0)
    }

    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Intersection over union, 0.0 for disjoint or degenerate boxes
    pub fn iou(&self, other: &BoundingBox) -> f32 {
        let x1 = self.x1.max(other.x1);
        let y1 = self.y1.max(other.y1);
        let x2 = self.x2.min(other.x2);
        let y2 = self.y2.min(other.y2);

        let intersection = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
        let union = self.area() + other.area() - intersection;

        if union > 0.0 {
            intersection / union
        } else {
            0.0
        }
    }
}

/// One object found in an image
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Detection {
    /// Index into the detector's vocabulary
    pub class_id: usize,
    /// Detection confidence (0.0-1.0)
    pub confidence: f32,
    /// Object location
    pub bounding_box: BoundingBox,
}

/// All detections for a single image. May be empty.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DetectionSet {
    detections: Vec<Detection>,
}

impl DetectionSet {
    pub fn new(detections: Vec<Detection>) -> Self {
        Self { detections }
    }

    pub fn is_empty(&self) -> bool {
        self.detections.is_empty()
    }

    pub fn len(&self) -> usize {
        self.detections.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Detection> {
        self.detections.iter()
    }

    /// Highest-confidence detection. On exact ties the earliest one wins.
    pub fn best(&self) -> Option<&Detection> {
        self.detections.iter().fold(None, |best, candidate| match best {
            Some(current) if current.confidence >= candidate.confidence => Some(current),
            _ => Some(candidate),
        })
    }

    pub fn into_vec(self) -> Vec<Detection> {
        self.detections
    }
}

impl From<Vec<Detection>> for DetectionSet {
    fn from(detections: Vec<Detection>) -> Self {
        Self::new(detections)
    }
}

impl<'a> IntoIterator for &'a DetectionSet {
    type Item = &'a Detection;
    type IntoIter = std::slice::Iter<'a, Detection>;

    fn into_iter(self) -> Self::IntoIter {
        self.detections.iter()
    }
}
