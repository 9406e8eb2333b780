// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod analyze;
pub mod errors;
pub mod handlers;
pub mod http_server;

pub use analyze::{analyze_waste_handler, run_analysis};
pub use errors::{ApiError, ErrorResponse};
pub use handlers::{CategoryInfo, HealthResponse};
pub use http_server::{create_app, start_server, AppState};
