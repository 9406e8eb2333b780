// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Waste scoring: maps detector classes onto waste categories and points
//!
//! Both lookup tables are constant data. Nothing here allocates shared state
//! or fails; every lookup has a default.

pub mod analysis;
pub mod categories;
pub mod points;

pub use analysis::AnalysisResult;
pub use categories::{is_diy_usable, map_category, CATEGORY_TABLE, DEFAULT_CATEGORY, DIY_USABLE_CATEGORIES};
pub use points::{calculate_points, DEFAULT_POINTS, POINTS_TABLE};
