// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Vision processing: image decoding and object detection
//!
//! Detection runs on CPU through ONNX Runtime.

pub mod detection;
pub mod image_utils;
pub mod model_manager;

pub use detection::{Detection, DetectionSet, DetectorConfig, ObjectDetector, YoloDetector};
pub use image_utils::{
    decode_image_bytes, decode_image_bytes_with_limit, detect_format, ImageError, ImageInfo,
};
pub use model_manager::{ensure_model_file, load_detector};
