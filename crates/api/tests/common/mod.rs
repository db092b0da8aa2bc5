#![allow(dead_code)]

use std::path::Path;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use framemark_api::config::ServerConfig;
use framemark_api::router::build_app_router;
use framemark_api::state::AppState;

/// Build a test `ServerConfig` rooted at `root`.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and a 30-second request timeout.
pub fn test_config(root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        static_dir: root.join("static"),
        label_dir: root.join("label"),
        annotations_dir: root.join("annotations"),
    }
}

/// Build the full application router over a data tree rooted at `root`.
///
/// Uses the same [`build_app_router`] as `main.rs`, so tests exercise the
/// production middleware stack.
pub fn build_test_app(root: &Path) -> Router {
    let config = test_config(root);
    build_app_router(AppState::new(config.clone()), &config)
}

/// Create `static/frames/{video}/{folder}` for every folder.
pub fn seed_video(root: &Path, video: &str, folders: &[&str]) {
    let video_dir = root.join("static/frames").join(video);
    std::fs::create_dir_all(&video_dir).unwrap();
    for folder in folders {
        std::fs::create_dir_all(video_dir.join(folder)).unwrap();
    }
}

/// Write `label/{name}` with the given CSV text.
pub fn write_labels(root: &Path, name: &str, csv: &str) {
    let dir = root.join("label");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(name), csv).unwrap();
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
