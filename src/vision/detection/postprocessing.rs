// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 output decoding and non-maximum suppression

use anyhow::Result;
use ndarray::{ArrayViewD, IxDyn};
use std::cmp::Ordering;
use tracing::debug;

use super::preprocessing::LetterboxInfo;
use super::types::{BoundingBox, Detection};

/// Box coordinates (cx, cy, w, h) precede the class scores in each candidate
const BOX_ATTRIBUTES: usize = 4;

/// Thresholds applied when decoding raw model output
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PostprocessParams {
    /// Minimum class score for a candidate to be kept
    pub confidence_threshold: f32,
    /// Same-class boxes overlapping a kept box above this IoU are dropped
    pub iou_threshold: f32,
    /// Maximum detections returned per image
    pub max_detections: usize,
}

impl Default for PostprocessParams {
    fn default() -> Self {
        Self {
            confidence_threshold: 0.25,
            iou_threshold: 0.7,
            max_detections: 300,
        }
    }
}

/// Decode a YOLOv8 detection head into detections in source-image space.
///
/// Accepts `[1, 4 + C, N]` (the default export) or the transposed
/// `[1, N, 4 + C]`, where `C` is `num_classes`. The attribute axis is the one
/// of length `4 + C`; when neither axis matches, the smaller one is used.
pub fn decode_yolo_output(
    output: ArrayViewD<f32>,
    num_classes: usize,
    letterbox: &LetterboxInfo,
    params: &PostprocessParams,
) -> Result<Vec<Detection>> {
    let shape = output.shape();
    if shape.len() != 3 || shape[0] != 1 {
        anyhow::bail!("Unexpected detector output shape: {:?}, expected [1, A, N]", shape);
    }

    let attributes_first = attributes_on_first_axis(shape[1], shape[2], num_classes);
    let (num_attributes, num_candidates) = if attributes_first {
        (shape[1], shape[2])
    } else {
        (shape[2], shape[1])
    };

    if num_attributes <= BOX_ATTRIBUTES {
        anyhow::bail!(
            "Detector output has {} attributes per candidate, expected more than {}",
            num_attributes,
            BOX_ATTRIBUTES
        );
    }

    let value = |candidate: usize, attribute: usize| -> f32 {
        if attributes_first {
            output[IxDyn(&[0, attribute, candidate])]
        } else {
            output[IxDyn(&[0, candidate, attribute])]
        }
    };

    let mut candidates = Vec::new();
    for i in 0..num_candidates {
        let (class_id, confidence) = (BOX_ATTRIBUTES..num_attributes)
            .map(|attribute| (attribute - BOX_ATTRIBUTES, value(i, attribute)))
            .fold((0, f32::MIN), |best, current| {
                if current.1 > best.1 {
                    current
                } else {
                    best
                }
            });

        if confidence <= params.confidence_threshold {
            continue;
        }

        let model_box = BoundingBox::from_center(value(i, 0), value(i, 1), value(i, 2), value(i, 3));
        let (x1, y1) = letterbox.map_to_original(model_box.x1, model_box.y1);
        let (x2, y2) = letterbox.map_to_original(model_box.x2, model_box.y2);

        candidates.push(Detection {
            class_id,
            confidence,
            bounding_box: BoundingBox::new(x1, y1, x2, y2),
        });
    }

    Ok(non_max_suppression(
        candidates,
        params.iou_threshold,
        params.max_detections,
    ))
}

fn attributes_on_first_axis(first: usize, second: usize, num_classes: usize) -> bool {
    let expected = BOX_ATTRIBUTES + num_classes;
    if first == expected {
        true
    } else if second == expected {
        false
    } else {
        debug!(
            "Output axes {} and {} do not match {} classes, assuming the smaller holds attributes",
            first, second, num_classes
        );
        first <= second
    }
}

/// Greedy per-class NMS. Output is sorted by descending confidence.
pub fn non_max_suppression(
    mut candidates: Vec<Detection>,
    iou_threshold: f32,
    max_detections: usize,
) -> Vec<Detection> {
    candidates.sort_by(|a, b| {
        b.confidence
            .partial_cmp(&a.confidence)
            .unwrap_or(Ordering::Equal)
    });

    let mut kept: Vec<Detection> = Vec::new();
    for candidate in candidates {
        if kept.len() >= max_detections {
            break;
        }

        let suppressed = kept.iter().any(|existing| {
            existing.class_id == candidate.class_id
                && existing.bounding_box.iou(&candidate.bounding_box) > iou_threshold
        });

        if !suppressed {
            kept.push(candidate);
        }
    }

    kept
}
