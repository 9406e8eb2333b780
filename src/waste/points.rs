// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Points awarded per waste category

/// Points for any category missing from [`POINTS_TABLE`]
pub const DEFAULT_POINTS: i64 = 5;

/// Category → points
pub const POINTS_TABLE: &[(&str, i64)] = &[
    ("Recyclable", 10),
    ("Electronic", 7),
    ("Metal", 8),
    ("Paper", 5),
    ("Plastic", 6),
    ("General Waste", 3),
];

/// Points for a category, [`DEFAULT_POINTS`] when the category is unknown
pub fn calculate_points(category: &str) -> i64 {
    POINTS_TABLE
        .iter()
        .find(|(name, _)| *name == category)
        .map(|(_, points)| *points)
        .unwrap_or(DEFAULT_POINTS)
}
