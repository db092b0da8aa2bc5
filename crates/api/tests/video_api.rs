//! Integration tests for `/api/videos` and `/api/video_data/{video}`.

mod common;

use axum::http::StatusCode;
use common::{body_json, get, seed_video, write_labels};
use serde_json::json;

// ---------------------------------------------------------------------------
// Listing
// ---------------------------------------------------------------------------

#[tokio::test]
async fn empty_frames_root_lists_no_videos() {
    let root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(root.path());

    let response = get(app, "/api/videos").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
    assert!(root.path().join("static/frames").is_dir());
}

#[tokio::test]
async fn videos_are_listed_sorted() {
    let root = tempfile::tempdir().unwrap();
    seed_video(root.path(), "match2_VIDEO", &[]);
    seed_video(root.path(), "match1_VIDEO", &[]);
    let app = common::build_test_app(root.path());

    let json = body_json(get(app, "/api/videos").await).await;
    assert_eq!(json, json!(["match1_VIDEO", "match2_VIDEO"]));
}

// ---------------------------------------------------------------------------
// Video data assembly
// ---------------------------------------------------------------------------

#[tokio::test]
async fn video_data_assembles_folders_tasks_and_annotations() {
    let root = tempfile::tempdir().unwrap();
    seed_video(root.path(), "match_VIDEO", &["1000_1999", "0_999", "extras"]);
    write_labels(
        root.path(),
        "match_label_combined.csv",
        "frame,name,team\n1500,Alice,A\n50,Bob,B\nbad,Alice,A\n",
    );
    std::fs::create_dir_all(root.path().join("annotations")).unwrap();
    std::fs::write(
        root.path().join("annotations/match_VIDEO_annotations.json"),
        json!([
            {"video": "match_VIDEO", "folder": "0_999", "image_file": "000052.jpg",
             "absolute_frame": 52, "name": "Bob", "timestamp": "t", "task_index": 1},
            {"video": "match_VIDEO", "folder": "0_999", "image_file": "000010.jpg",
             "absolute_frame": 10, "name": "Ann", "timestamp": "t"}
        ])
        .to_string(),
    )
    .unwrap();
    let app = common::build_test_app(root.path());

    let response = get(app, "/api/video_data/match_VIDEO").await;
    assert_eq!(response.status(), StatusCode::OK);

    let json = body_json(response).await;
    assert_eq!(json["folders"], json!(["0_999", "1000_1999"]));
    assert_eq!(
        json["tasks"],
        json!([
            {"name": "Alice", "frame": 1500},
            {"name": "Bob", "frame": 50},
            {"name": "Alice", "frame": 0}
        ])
    );
    assert_eq!(json["names"], json!(["Alice", "Bob"]));
    assert_eq!(
        json["existing_annotations"],
        json!({"1": {"frame": 52, "name": "Bob"}})
    );
}

#[tokio::test]
async fn video_without_label_sheet_has_no_tasks() {
    let root = tempfile::tempdir().unwrap();
    seed_video(root.path(), "solo_VIDEO", &["0_999"]);
    let app = common::build_test_app(root.path());

    let json = body_json(get(app, "/api/video_data/solo_VIDEO").await).await;
    assert_eq!(json["folders"], json!(["0_999"]));
    assert_eq!(json["tasks"], json!([]));
    assert_eq!(json["names"], json!([]));
    assert_eq!(json["existing_annotations"], json!({}));
}

// ---------------------------------------------------------------------------
// Rejections
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_video_returns_404() {
    let root = tempfile::tempdir().unwrap();
    seed_video(root.path(), "match_VIDEO", &["0_999"]);
    let app = common::build_test_app(root.path());

    let response = get(app, "/api/video_data/other_VIDEO").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let json = body_json(response).await;
    assert_eq!(json["status"], "error");
    assert_eq!(json["code"], "NOT_FOUND");
}

#[tokio::test]
async fn path_traversal_returns_400() {
    let root = tempfile::tempdir().unwrap();
    let app = common::build_test_app(root.path());

    let response = get(app, "/api/video_data/..%2Fsecrets").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let json = body_json(response).await;
    assert_eq!(json["message"], "Invalid video directory name.");
}
