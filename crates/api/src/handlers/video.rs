//! Handlers for video discovery and per-video data assembly.

use axum::extract::{Path, State};
use axum::Json;
use framemark_core::contract::VideoData;
use framemark_core::error::CoreError;

use crate::error::AppResult;
use crate::state::AppState;
use crate::store::validate_video_name;

/// GET /videos
///
/// Sorted names of the directories under the frames root.
pub async fn list_videos(State(state): State<AppState>) -> AppResult<Json<Vec<String>>> {
    let videos = state.store.list_videos().await?;
    tracing::debug!(count = videos.len(), "Listed videos");
    Ok(Json(videos))
}

/// GET /video_data/{video}
///
/// Frame folders, tasks and names from the label sheet, and the annotations
/// already saved for the video.
pub async fn get_video_data(
    State(state): State<AppState>,
    Path(video): Path<String>,
) -> AppResult<Json<VideoData>> {
    validate_video_name(&video)?;

    if !state.store.video_exists(&video).await? {
        return Err(CoreError::NotFound {
            entity: "Video",
            id: video,
        }
        .into());
    }

    let folders = state.store.list_folders(&video).await?;
    let labels = state.store.read_labels(&video).await;
    let existing_annotations = state.store.existing_annotations(&video).await;

    tracing::info!(
        video = %video,
        folders = folders.len(),
        tasks = labels.tasks.len(),
        names = labels.names.len(),
        annotations = existing_annotations.len(),
        "Assembled video data"
    );

    Ok(Json(VideoData {
        folders,
        tasks: labels.tasks,
        names: labels.names,
        existing_annotations,
    }))
}
