//! Integration tests for the HTTP API
//!
//! Tests API endpoints against a shared router

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use laughmeter::core::create_router;
use laughmeter::LaughConfig;
use serde_json::{json, Value};
use tower::ServiceExt;

fn create_test_router() -> axum::Router {
    create_router(LaughConfig::default())
}

async fn send(app: &axum::Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn new_session(app: &axum::Router) -> String {
    let (status, json) = send(app, "POST", "/session/new", Some(json!({}))).await;
    assert_eq!(status, StatusCode::OK);
    json["session_id"].as_str().unwrap().to_string()
}

async fn frame(app: &axum::Router, id: &str, body: Value) -> (StatusCode, Value) {
    send(app, "POST", &format!("/session/{}/frame", id), Some(body)).await
}

#[tokio::test]
async fn test_health_endpoint() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert_eq!(json["sessions_active"], 0);
    assert!(json["version"].is_string());
}

#[tokio::test]
async fn test_create_session() {
    let app = create_test_router();
    let (status, json) = send(&app, "POST", "/session/new", Some(json!({}))).await;

    assert_eq!(status, StatusCode::OK);
    let id = json["session_id"].as_str().unwrap();
    assert!(id.starts_with("session_"));
    assert_eq!(json["websocket_url"], format!("/ws/{}", id));
    assert_eq!(json["config"]["price_per_laugh"], 30);
    assert_eq!(json["config"]["max_charge"], 2400);

    let (_, health) = send(&app, "GET", "/health", None).await;
    assert_eq!(health["sessions_active"], 1);
}

#[tokio::test]
async fn test_create_session_rejects_bad_config() {
    let app = create_test_router();
    let (status, json) = send(
        &app,
        "POST",
        "/session/new",
        Some(json!({ "config": { "price_per_laugh": 0 } })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_CONFIG");
}

#[tokio::test]
async fn test_session_not_found() {
    let app = create_test_router();
    let (status, json) = send(&app, "GET", "/session/nonexistent", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_full_session_flow() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let (status, json) = send(&app, "POST", &format!("/session/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "SHOWTIME");

    // laugh, held smile, laugh again
    let (_, first) = frame(&app, &id, json!({ "timestamp_ms": 0, "smile_score": 0.9 })).await;
    assert_eq!(first["laugh_event_emitted"], true);
    assert_eq!(first["acknowledging"], true);

    let (_, held) = frame(&app, &id, json!({ "timestamp_ms": 500, "smile_score": 0.9 })).await;
    assert_eq!(held["is_smiling"], true);
    assert_eq!(held["laugh_event_emitted"], false);
    assert_eq!(held["reason"], "L003_COOLDOWN_ACTIVE");

    let (_, again) = frame(&app, &id, json!({ "timestamp_ms": 1001, "smile_score": 0.9 })).await;
    assert_eq!(again["laugh_event_emitted"], true);
    assert_eq!(again["stats"]["laugh_count"], 2);
    assert_eq!(again["stats"]["amount_due"], 60);

    // no face
    let (_, none) = frame(&app, &id, json!({ "timestamp_ms": 1100 })).await;
    assert_eq!(none["is_smiling"], false);
    assert_eq!(none["reason"], "L001_NO_FACE");

    let (status, receipt) = send(&app, "POST", &format!("/session/{}/finish", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(receipt["laugh_count"], 2);
    assert_eq!(receipt["total_due"], 60);
    assert_eq!(receipt["cap_applied"], false);
    assert_eq!(receipt["transaction_id"].as_str().unwrap().len(), 8);

    let (status, stored) = send(&app, "GET", &format!("/session/{}/receipt", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["transaction_id"], receipt["transaction_id"]);

    let (status, settlement) = send(&app, "POST", &format!("/session/{}/settle", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(settlement["status"], "demo_redirect");

    let (status, json) = send(&app, "POST", &format!("/session/{}/restart", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "IDLE");
    assert_eq!(json["stats"]["laugh_count"], 0);
    assert_eq!(json["receipt_available"], false);
}

#[tokio::test]
async fn test_frame_from_blendshapes() {
    let app = create_test_router();
    let id = new_session(&app).await;
    send(&app, "POST", &format!("/session/{}/start", id), None).await;

    let face = json!({
        "blendshapes": [
            { "categoryName": "mouthSmileLeft", "score": 0.8 },
            { "categoryName": "mouthSmileRight", "score": 0.7 }
        ]
    });
    let (status, report) = frame(&app, &id, json!({ "timestamp_ms": 0, "face": face })).await;

    assert_eq!(status, StatusCode::OK);
    assert!((report["smile_score"].as_f64().unwrap() - 0.75).abs() < 1e-9);
    assert_eq!(report["laugh_event_emitted"], true);
}

#[tokio::test]
async fn test_frame_rejected_outside_showtime() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let (status, json) = frame(&app, &id, json!({ "smile_score": 0.9 })).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_frame_rejects_out_of_range_score() {
    let app = create_test_router();
    let id = new_session(&app).await;
    send(&app, "POST", &format!("/session/{}/start", id), None).await;

    let (status, json) = frame(&app, &id, json!({ "smile_score": 1.5 })).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["code"], "INVALID_SCORE");
}

#[tokio::test]
async fn test_fail_and_retry() {
    let app = create_test_router();
    let id = new_session(&app).await;
    send(&app, "POST", &format!("/session/{}/start", id), None).await;
    frame(&app, &id, json!({ "timestamp_ms": 0, "smile_score": 0.9 })).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/fail", id),
        Some(json!({ "kind": "camera_permission_denied", "detail": "NotAllowedError" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["phase"], "IDLE");
    assert_eq!(json["fault"]["code"], "CAMERA_PERMISSION_DENIED");
    assert_eq!(json["stats"]["laugh_count"], 0);

    let (_, json) = send(&app, "POST", &format!("/session/{}/retry", id), None).await;
    assert_eq!(json["fault"], Value::Null);

    let (status, _) = send(&app, "POST", &format!("/session/{}/start", id), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_receipt_not_found_before_finish() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let (status, json) = send(&app, "GET", &format!("/session/{}/receipt", id), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "NO_RECEIPT");
}

#[tokio::test]
async fn test_finish_requires_showtime() {
    let app = create_test_router();
    let id = new_session(&app).await;

    let (status, _) = send(&app, "POST", &format!("/session/{}/finish", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_fail_after_finish_is_rejected() {
    let app = create_test_router();
    let id = new_session(&app).await;
    send(&app, "POST", &format!("/session/{}/start", id), None).await;
    frame(&app, &id, json!({ "timestamp_ms": 0, "smile_score": 0.9 })).await;
    let (_, receipt) = send(&app, "POST", &format!("/session/{}/finish", id), None).await;

    let (status, json) = send(
        &app,
        "POST",
        &format!("/session/{}/fail", id),
        Some(json!({ "kind": "camera_unavailable", "detail": "unplugged" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "INVALID_TRANSITION");

    let (status, stored) = send(&app, "GET", &format!("/session/{}/receipt", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stored["transaction_id"], receipt["transaction_id"]);
    assert_eq!(stored["total_due"], 30);
}

#[tokio::test]
async fn test_start_after_fault_requires_retry() {
    let app = create_test_router();
    let id = new_session(&app).await;
    send(
        &app,
        "POST",
        &format!("/session/{}/fail", id),
        Some(json!({ "kind": "inference_init_failure" })),
    )
    .await;

    let (status, json) = send(&app, "POST", &format!("/session/{}/start", id), None).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["code"], "RETRY_REQUIRED");
}

#[tokio::test]
async fn test_unknown_session_wins_over_bad_score() {
    let app = create_test_router();
    let (status, json) = frame(&app, "nonexistent", json!({ "smile_score": 1.5 })).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn test_frame_with_landmarks_reports_face_box() {
    let app = create_test_router();
    let id = new_session(&app).await;
    send(&app, "POST", &format!("/session/{}/start", id), None).await;

    let face = json!({
        "blendshapes": [{ "categoryName": "mouthSmileLeft", "score": 0.2 }],
        "landmarks": [{ "x": 0.25, "y": 0.5 }, { "x": 0.75, "y": 1.0 }]
    });
    let (status, report) = frame(&app, &id, json!({ "timestamp_ms": 0, "face": face })).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(report["face_box"]["min_x"], 0.25);
    assert_eq!(report["face_box"]["max_y"], 1.0);
}
