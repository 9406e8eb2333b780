// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1

//! POST /api/analyze-waste tests
//!
//! Drives the router with a scripted detector so every branch of the
//! handler is reachable without model weights.

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
};
use serde_json::json;
use tower::util::ServiceExt; // for `oneshot`

use super::support::{
    analyze_request, app_with, app_with_upload_limit, detection, image_upload_request, json_body,
    multipart_body, png_bytes, ScriptedDetector,
};

#[tokio::test]
async fn test_success_returns_scored_detection() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.875)]));

    let response = app.oneshot(image_upload_request(&png_bytes())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(
        body,
        json!({
            "detected_class": "person",
            "category": "Recyclable",
            "confidence": 0.875,
            "is_diy_usable": true,
            "total_points": 10
        })
    );
}

#[tokio::test]
async fn test_highest_confidence_detection_wins() {
    let app = app_with(ScriptedDetector::returning(vec![
        detection(2, 0.2),
        detection(1, 0.95),
        detection(0, 0.4),
    ]));

    let response = app.oneshot(image_upload_request(&png_bytes())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["detected_class"], "bicycle");
    assert_eq!(body["category"], "Electronic");
    assert_eq!(body["total_points"], 7);
    assert_eq!(body["is_diy_usable"], false);
    let confidence = body["confidence"].as_f64().unwrap();
    assert!((confidence - 0.95).abs() < 1e-6);
}

#[tokio::test]
async fn test_unmapped_class_is_general_waste() {
    let app = app_with(ScriptedDetector::returning(vec![detection(39, 0.6)]));

    let response = app.oneshot(image_upload_request(&png_bytes())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["detected_class"], "bottle");
    assert_eq!(body["category"], "General Waste");
    assert_eq!(body["total_points"], 3);
    assert_eq!(body["is_diy_usable"], false);
}

#[tokio::test]
async fn test_metal_class_scores_eight() {
    let app = app_with(ScriptedDetector::returning(vec![detection(2, 0.7)]));

    let body = json_body(app.oneshot(image_upload_request(&png_bytes())).await.unwrap()).await;
    assert_eq!(body["detected_class"], "car");
    assert_eq!(body["category"], "Metal");
    assert_eq!(body["total_points"], 8);
}

#[tokio::test]
async fn test_missing_image_field() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let request = analyze_request(multipart_body("photo", Some("upload.png"), &png_bytes()));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "No image file provided"})
    );
}

#[tokio::test]
async fn test_image_field_without_file_is_missing() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let request = analyze_request(multipart_body("image", None, b"not a file"));
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No image file provided");
}

#[tokio::test]
async fn test_non_multipart_body_is_missing_image() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/analyze-waste")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(r#"{"image": "abc"}"#))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], "No image file provided");
}

#[tokio::test]
async fn test_no_detections() {
    let app = app_with(ScriptedDetector::returning(vec![]));

    let response = app.oneshot(image_upload_request(&png_bytes())).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        json_body(response).await,
        json!({"error": "No objects detected in the image"})
    );
}

#[tokio::test]
async fn test_undecodable_upload_is_server_error() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let response = app
        .oneshot(image_upload_request(b"definitely not an image"))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Unsupported image format");
}

#[tokio::test]
async fn test_empty_upload_is_server_error() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let response = app.oneshot(image_upload_request(b"")).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json_body(response).await["error"], "Image data is empty");
}

#[tokio::test]
async fn test_upload_over_body_limit_is_server_error() {
    let app = app_with_upload_limit(ScriptedDetector::returning(vec![detection(0, 0.9)]), 1024);

    let response = app
        .oneshot(image_upload_request(&vec![0u8; 4 * 1024]))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("length limit exceeded"), "{}", message);
}

#[tokio::test]
async fn test_upload_under_body_limit_is_analyzed() {
    let app = app_with_upload_limit(
        ScriptedDetector::returning(vec![detection(0, 0.9)]),
        64 * 1024,
    );

    let response = app.oneshot(image_upload_request(&png_bytes())).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["category"], "Recyclable");
}

#[tokio::test]
async fn test_truncated_multipart_body_is_server_error() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let content = vec![7u8; 256];
    let mut body = multipart_body("image", Some("upload.png"), &content);
    // Cut inside the file data, before the closing boundary
    body.truncate(body.len() - content.len() / 2);

    let response = app.oneshot(analyze_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body = json_body(response).await;
    let message = body["error"].as_str().unwrap();
    assert!(message.contains("incomplete"), "{}", message);
}

#[tokio::test]
async fn test_detector_failure_message_is_returned() {
    let app = app_with(ScriptedDetector::failing("onnx session failed"));

    let response = app.oneshot(image_upload_request(&png_bytes())).await.unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        json_body(response).await,
        json!({"error": "onnx session failed"})
    );
}

#[tokio::test]
async fn test_same_image_gives_same_result() {
    let app = app_with(ScriptedDetector::returning(vec![
        detection(0, 0.3),
        detection(2, 0.8),
    ]));

    let first = json_body(
        app.clone()
            .oneshot(image_upload_request(&png_bytes()))
            .await
            .unwrap(),
    )
    .await;
    let second = json_body(app.oneshot(image_upload_request(&png_bytes())).await.unwrap()).await;

    assert_eq!(first["detected_class"], second["detected_class"]);
    assert_eq!(first["category"], second["category"]);
    assert_eq!(first["total_points"], second["total_points"]);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let mut request = image_upload_request(&png_bytes());
    request
        .headers_mut()
        .insert(header::ORIGIN, "http://localhost:3000".parse().unwrap());
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_get_is_not_allowed() {
    let app = app_with(ScriptedDetector::returning(vec![detection(0, 0.9)]));

    let request = Request::builder()
        .method(Method::GET)
        .uri("/api/analyze-waste")
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}
