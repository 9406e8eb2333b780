// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! YOLOv8 object detection model
//!
//! Runs a pretrained YOLOv8 ONNX export on CPU via ONNX Runtime and decodes
//! its head into [`DetectionSet`]s.

use anyhow::{anyhow, Context, Result};
use image::DynamicImage;
use ort::execution_providers::CPUExecutionProvider;
use ort::session::builder::GraphOptimizationLevel;
use ort::session::Session;
use ort::value::Value;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::{debug, info};

use super::detector::ObjectDetector;
use super::labels::{coco_labels, load_labels};
use super::postprocessing::{decode_yolo_output, PostprocessParams};
use super::preprocessing::{preprocess_for_detection, YOLO_INPUT_SIZE};
use super::types::DetectionSet;

/// Settings for loading the detector
#[derive(Debug, Clone, PartialEq)]
pub struct DetectorConfig {
    /// Path to the ONNX model file
    pub model_path: PathBuf,
    /// Optional vocabulary file; COCO labels when absent
    pub labels_path: Option<PathBuf>,
    /// Square model input size
    pub input_size: u32,
    /// Output decoding thresholds
    pub params: PostprocessParams,
    /// ONNX Runtime intra-op threads
    pub intra_threads: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            model_path: PathBuf::from("./models/yolov8n.onnx"),
            labels_path: None,
            input_size: YOLO_INPUT_SIZE,
            params: PostprocessParams::default(),
            intra_threads: 4,
        }
    }
}

/// YOLOv8 detector backed by ONNX Runtime.
///
/// The session needs `&mut` to run, so inference is serialized through the
/// mutex; cloning shares the same session.
#[derive(Clone)]
pub struct YoloDetector {
    /// ONNX Runtime session (thread-safe)
    session: Arc<Mutex<Session>>,
    /// Model input name
    input_name: String,
    /// Class id → label
    labels: Arc<Vec<String>>,
    input_size: u32,
    params: PostprocessParams,
}

impl std::fmt::Debug for YoloDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("YoloDetector")
            .field("input_name", &self.input_name)
            .field("labels", &self.labels.len())
            .field("input_size", &self.input_size)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl YoloDetector {
    /// Load the detector
    ///
    /// # Errors
    /// Returns error if:
    /// - Model file not found
    /// - Labels file is set but unreadable or empty
    /// - ONNX Runtime initialization fails
    pub fn new(config: &DetectorConfig) -> Result<Self> {
        let model_path = config.model_path.as_path();

        if !model_path.exists() {
            anyhow::bail!("Detection model not found: {}", model_path.display());
        }

        let labels = match config.labels_path {
            Some(ref path) => load_labels(path)?,
            None => coco_labels(),
        };

        info!("Loading detection model from {}", model_path.display());
        let session = build_session(model_path, config.intra_threads)?;

        let input_name = session
            .inputs
            .first()
            .map(|input| input.name.clone())
            .unwrap_or_else(|| "images".to_string());

        if let Some(input) = session.inputs.first() {
            debug!("Detection model input: {} {:?}", input_name, input.input_type);
        }

        info!(
            "✅ Detection model loaded ({} classes, {}px input, CPU-only)",
            labels.len(),
            config.input_size
        );

        Ok(Self {
            session: Arc::new(Mutex::new(session)),
            input_name,
            labels: Arc::new(labels),
            input_size: config.input_size,
            params: config.params,
        })
    }

    /// Class vocabulary in index order
    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn params(&self) -> &PostprocessParams {
        &self.params
    }
}

fn build_session(model_path: &Path, intra_threads: usize) -> Result<Session> {
    Session::builder()
        .context("Failed to create session builder")?
        .with_execution_providers([CPUExecutionProvider::default().build()])
        .context("Failed to set CPU execution provider")?
        .with_optimization_level(GraphOptimizationLevel::Level3)
        .context("Failed to set optimization level")?
        .with_intra_threads(intra_threads)
        .context("Failed to set intra threads")?
        .commit_from_file(model_path)
        .context(format!(
            "Failed to load detection model from {}",
            model_path.display()
        ))
}

impl ObjectDetector for YoloDetector {
    fn name(&self) -> &'static str {
        "yolov8"
    }

    fn detect(&self, image: &DynamicImage) -> Result<DetectionSet> {
        let (input, letterbox) = preprocess_for_detection(image, self.input_size);

        let input_value =
            Value::from_array(input).context("Failed to create input tensor")?;

        let mut session = self
            .session
            .lock()
            .map_err(|_| anyhow!("Detection session lock poisoned"))?;

        let outputs = session
            .run(ort::inputs![&self.input_name => input_value])
            .context("Detection inference failed")?;

        let output_tensor = outputs[0]
            .try_extract_array::<f32>()
            .context("Failed to extract output tensor")?;

        debug!("Detection output shape: {:?}", output_tensor.shape());

        let detections = decode_yolo_output(
            output_tensor.view(),
            self.labels.len(),
            &letterbox,
            &self.params,
        )?;

        Ok(DetectionSet::new(detections))
    }

    fn class_name(&self, class_id: usize) -> Option<String> {
        self.labels.get(class_id).cloned()
    }
}
