// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Server configuration
//!
//! Every option is a CLI flag with an environment variable fallback.

use clap::Parser;
use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use thiserror::Error;

use crate::vision::detection::{DetectorConfig, PostprocessParams, YOLO_INPUT_SIZE};
use crate::vision::image_utils::MAX_IMAGE_SIZE;

pub const DEFAULT_PORT: u16 = 5002;
pub const DEFAULT_MODEL_PATH: &str = "./models/yolov8n.onnx";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Invalid host address: {0}")]
    InvalidHost(String),

    #[error("Port must be non-zero")]
    ZeroPort,

    #[error("{name} must be between 0.0 and 1.0, got {value}")]
    ThresholdOutOfRange { name: &'static str, value: f32 },

    #[error("max_detections must be at least 1")]
    ZeroMaxDetections,

    #[error("max_upload_bytes must be at least 1")]
    ZeroUploadLimit,

    #[error("intra_threads must be at least 1")]
    ZeroThreads,
}

/// Waste analyzer server
#[derive(Parser, Debug, Clone)]
#[command(name = "waste-analyzer")]
#[command(version)]
#[command(about = "Scores uploaded images by the waste category of the main detected object", long_about = None)]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// YOLOv8 ONNX model file
    #[arg(long, env = "MODEL_PATH", default_value = DEFAULT_MODEL_PATH)]
    pub model_path: PathBuf,

    /// Download URL used when the model file is missing
    #[arg(long, env = "MODEL_URL")]
    pub model_url: Option<String>,

    /// Class labels file, one per line (defaults to COCO)
    #[arg(long, env = "LABELS_PATH")]
    pub labels_path: Option<PathBuf>,

    /// Minimum detection confidence
    #[arg(long, env = "CONFIDENCE_THRESHOLD", default_value_t = 0.25)]
    pub confidence_threshold: f32,

    /// IoU above which overlapping boxes are suppressed
    #[arg(long, env = "IOU_THRESHOLD", default_value_t = 0.7)]
    pub iou_threshold: f32,

    /// Detections kept per image
    #[arg(long, env = "MAX_DETECTIONS", default_value_t = 300)]
    pub max_detections: usize,

    /// ONNX Runtime intra-op threads
    #[arg(long, env = "INTRA_THREADS", default_value_t = 4)]
    pub intra_threads: usize,

    /// Request body limit in bytes
    #[arg(long, env = "MAX_UPLOAD_BYTES", default_value_t = MAX_IMAGE_SIZE)]
    pub max_upload_bytes: usize,

    /// Deployment environment reported by /api/health
    #[arg(long, env = "APP_ENV", default_value = "development")]
    pub environment: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        let params = PostprocessParams::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            model_url: None,
            labels_path: None,
            confidence_threshold: params.confidence_threshold,
            iou_threshold: params.iou_threshold,
            max_detections: params.max_detections,
            intra_threads: 4,
            max_upload_bytes: MAX_IMAGE_SIZE,
            environment: "development".to_string(),
        }
    }
}

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.host
            .parse::<IpAddr>()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;

        if self.port == 0 {
            return Err(ConfigError::ZeroPort);
        }

        for (name, value) in [
            ("confidence_threshold", self.confidence_threshold),
            ("iou_threshold", self.iou_threshold),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::ThresholdOutOfRange { name, value });
            }
        }

        if self.max_detections == 0 {
            return Err(ConfigError::ZeroMaxDetections);
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::ZeroUploadLimit);
        }
        if self.intra_threads == 0 {
            return Err(ConfigError::ZeroThreads);
        }

        Ok(())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr, ConfigError> {
        let ip: IpAddr = self
            .host
            .parse()
            .map_err(|_| ConfigError::InvalidHost(self.host.clone()))?;
        Ok(SocketAddr::new(ip, self.port))
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            model_path: self.model_path.clone(),
            labels_path: self.labels_path.clone(),
            input_size: YOLO_INPUT_SIZE,
            params: PostprocessParams {
                confidence_threshold: self.confidence_threshold,
                iou_threshold: self.iou_threshold,
                max_detections: self.max_detections,
            },
            intra_threads: self.intra_threads,
        }
    }
}
