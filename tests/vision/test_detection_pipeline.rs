// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! Preprocessing and postprocessing without a model
//!
//! Builds a synthetic YOLOv8 head for a letterboxed image and checks that
//! decoding lands boxes back in source coordinates.

use image::{DynamicImage, Rgb, RgbImage};
use ndarray::Array3;
use waste_analyzer::vision::detection::{
    decode_yolo_output, preprocess_for_detection, Detection, DetectionSet, LetterboxInfo,
    PostprocessParams, YOLO_INPUT_SIZE,
};

const NUM_CLASSES: usize = 3;

/// Head of shape [1, 4 + C, N] from (cx, cy, w, h, class, score) rows
fn yolo_head(candidates: &[(f32, f32, f32, f32, usize, f32)]) -> Array3<f32> {
    let mut head = Array3::<f32>::zeros((1, 4 + NUM_CLASSES, candidates.len()));
    for (i, &(cx, cy, w, h, class_id, score)) in candidates.iter().enumerate() {
        head[[0, 0, i]] = cx;
        head[[0, 1, i]] = cy;
        head[[0, 2, i]] = w;
        head[[0, 3, i]] = h;
        head[[0, 4 + class_id, i]] = score;
    }
    head
}

fn decode(head: &Array3<f32>, info: &LetterboxInfo) -> Vec<Detection> {
    decode_yolo_output(
        head.view().into_dyn(),
        NUM_CLASSES,
        info,
        &PostprocessParams::default(),
    )
    .unwrap()
}

#[test]
fn test_wide_image_round_trip_through_letterbox() {
    let image = DynamicImage::ImageRgb8(RgbImage::from_pixel(1280, 640, Rgb([0, 0, 0])));
    let (tensor, info) = preprocess_for_detection(&image, YOLO_INPUT_SIZE);

    assert_eq!(tensor.shape(), &[1, 3, 640, 640]);
    assert_eq!(info.scale, 0.5);
    assert_eq!(info.offset_x, 0);
    assert_eq!(info.offset_y, 160);

    // Object centred at (640, 320) in the source, 200x100 there
    let head = yolo_head(&[(320.0, 320.0, 100.0, 50.0, 2, 0.9)]);
    let detections = decode(&head, &info);

    assert_eq!(detections.len(), 1);
    let bbox = &detections[0].bounding_box;
    assert!((bbox.x1 - 540.0).abs() < 1e-3);
    assert!((bbox.y1 - 270.0).abs() < 1e-3);
    assert!((bbox.x2 - 740.0).abs() < 1e-3);
    assert!((bbox.y2 - 370.0).abs() < 1e-3);
}

#[test]
fn test_decoded_set_selects_best() {
    let image = DynamicImage::ImageRgb8(RgbImage::new(640, 640));
    let (_, info) = preprocess_for_detection(&image, YOLO_INPUT_SIZE);

    let head = yolo_head(&[
        (100.0, 100.0, 40.0, 40.0, 0, 0.2),
        (300.0, 300.0, 40.0, 40.0, 1, 0.95),
        (500.0, 500.0, 40.0, 40.0, 2, 0.4),
    ]);
    let detections = DetectionSet::new(decode(&head, &info));

    // 0.2 falls under the default threshold
    assert_eq!(detections.len(), 2);
    let best = detections.best().unwrap();
    assert_eq!(best.class_id, 1);
    assert_eq!(best.confidence, 0.95);
}

#[test]
fn test_everything_below_threshold_is_empty() {
    let image = DynamicImage::ImageRgb8(RgbImage::new(320, 320));
    let (_, info) = preprocess_for_detection(&image, YOLO_INPUT_SIZE);

    let head = yolo_head(&[
        (100.0, 100.0, 40.0, 40.0, 0, 0.1),
        (300.0, 300.0, 40.0, 40.0, 1, 0.25),
    ]);
    let detections = DetectionSet::new(decode(&head, &info));

    assert!(detections.is_empty());
    assert!(detections.best().is_none());
}

#[test]
fn test_single_candidate_coco_head() {
    let image = DynamicImage::ImageRgb8(RgbImage::new(640, 640));
    let (_, info) = preprocess_for_detection(&image, YOLO_INPUT_SIZE);

    let mut head = Array3::<f32>::zeros((1, 84, 1));
    head[[0, 0, 0]] = 320.0;
    head[[0, 1, 0]] = 320.0;
    head[[0, 2, 0]] = 64.0;
    head[[0, 3, 0]] = 64.0;
    head[[0, 4 + 39, 0]] = 0.7;

    let detections = DetectionSet::new(
        decode_yolo_output(head.view().into_dyn(), 80, &info, &PostprocessParams::default())
            .unwrap(),
    );

    let best = detections.best().unwrap();
    assert_eq!(best.class_id, 39);
    assert_eq!(best.confidence, 0.7);
}
