// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Waste analysis endpoint module
//!
//! Provides POST /api/analyze-waste for scoring an uploaded image.

pub mod handler;

pub use handler::{analyze_waste_handler, run_analysis, IMAGE_FIELD};
