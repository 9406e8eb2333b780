// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Detector class id to waste category mapping

/// Category for every class id missing from [`CATEGORY_TABLE`]
pub const DEFAULT_CATEGORY: &str = "General Waste";

/// Sparse class id → waste category table.
///
/// Demonstration mapping over the COCO vocabulary: 0 is "person",
/// 1 is "bicycle" and 2 is "car". Keep it as is; clients score against it.
pub const CATEGORY_TABLE: &[(usize, &str)] = &[
    (0, "Recyclable"),
    (1, "Electronic"),
    (2, "Metal"),
];

/// Categories whose items can be reused in DIY projects
pub const DIY_USABLE_CATEGORIES: &[&str] = &["Recyclable", "Paper", "Plastic"];

/// Resolve the waste category for a detector class id
pub fn map_category(class_id: usize) -> &'static str {
    CATEGORY_TABLE
        .iter()
        .find(|(id, _)| *id == class_id)
        .map(|(_, category)| *category)
        .unwrap_or(DEFAULT_CATEGORY)
}

/// Exact, case-sensitive membership in [`DIY_USABLE_CATEGORIES`]
pub fn is_diy_usable(category: &str) -> bool {
    DIY_USABLE_CATEGORIES.contains(&category)
}
