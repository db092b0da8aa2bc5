//! Integration tests for the health check endpoint and general HTTP behaviour.

mod common;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use common::{body_json, get};
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Test: GET /health returns 200 with expected JSON fields
// ---------------------------------------------------------------------------

#[tokio::test]
async fn health_check_returns_ok_with_json() {
    let root = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(root.path().join("static/frames")).unwrap();
    let app = common::build_test_app(root.path());

    let response = get(app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
    assert!(json["version"].is_string());
    assert_eq!(json["frames_readable"], true);
}

#[tokio::test]
async fn health_check_degraded_without_frames_dir() {
    let root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(root.path());

    let json = body_json(get(app, "/health").await).await;
    assert_eq!(json["status"], "degraded");
    assert_eq!(json["frames_readable"], false);
}

// ---------------------------------------------------------------------------
// Test: Unknown route returns 404
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_route_returns_404() {
    let root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(root.path());
    let response = get(app, "/this-route-does-not-exist").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Test: x-request-id header is present in response
// ---------------------------------------------------------------------------

#[tokio::test]
async fn response_contains_x_request_id_header() {
    let root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(root.path());
    let response = get(app, "/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("Response must contain an x-request-id header");

    // The value should be a UUID string (36 chars with hyphens).
    assert_eq!(request_id.to_str().unwrap().len(), 36);
}

// ---------------------------------------------------------------------------
// Test: CORS preflight OPTIONS request returns correct headers
// ---------------------------------------------------------------------------

#[tokio::test]
async fn cors_preflight_returns_correct_headers() {
    let root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(root.path());

    let request = Request::builder()
        .method(Method::OPTIONS)
        .uri("/api/annotate")
        .header("Origin", "http://localhost:5173")
        .header("Access-Control-Request-Method", "POST")
        .header("Access-Control-Request-Headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    let allow_origin = headers
        .get("access-control-allow-origin")
        .expect("Missing Access-Control-Allow-Origin header")
        .to_str()
        .unwrap();
    assert_eq!(allow_origin, "http://localhost:5173");

    let allow_methods = headers
        .get("access-control-allow-methods")
        .expect("Missing Access-Control-Allow-Methods header")
        .to_str()
        .unwrap();
    assert!(
        allow_methods.contains("POST"),
        "Allow-Methods should contain POST, got: {allow_methods}"
    );
}

// ---------------------------------------------------------------------------
// Test: frame images are served under /static
// ---------------------------------------------------------------------------

#[tokio::test]
async fn frame_images_are_served() {
    let root = tempfile::tempdir().unwrap();
    common::seed_video(root.path(), "v_VIDEO", &["0_999"]);
    std::fs::write(
        root.path().join("static/frames/v_VIDEO/0_999/000042.jpg"),
        b"\xff\xd8\xff",
    )
    .unwrap();
    let app = common::build_test_app(root.path());

    let response = get(app.clone(), "/static/frames/v_VIDEO/0_999/000042.jpg").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");

    let missing = get(app, "/static/frames/v_VIDEO/0_999/000043.jpg").await;
    assert_eq!(missing.status(), StatusCode::NOT_FOUND);
}
