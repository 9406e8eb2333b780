// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Object detection
//!
//! Components:
//! - `detector` - The `ObjectDetector` seam the request handler depends on
//! - `model` - YOLOv8 ONNX implementation
//! - `preprocessing` - Letterboxing and tensor layout
//! - `postprocessing` - Output decoding and NMS
//! - `labels` - Class vocabulary

pub mod detector;
pub mod labels;
pub mod model;
pub mod postprocessing;
pub mod preprocessing;
pub mod types;

pub use detector::ObjectDetector;
pub use labels::{coco_labels, load_labels, COCO_LABELS};
pub use model::{DetectorConfig, YoloDetector};
pub use postprocessing::{decode_yolo_output, non_max_suppression, PostprocessParams};
pub use preprocessing::{letterbox, preprocess_for_detection, LetterboxInfo, YOLO_INPUT_SIZE};
pub use types::{BoundingBox, Detection, DetectionSet};
