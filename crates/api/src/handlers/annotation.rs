//! Handler for saving frame annotations.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use framemark_core::contract::{AnnotateRequest, AnnotateResponse};

use crate::error::{AppError, AppResult};
use crate::state::AppState;
use crate::store::validate_video_name;

const MISSING_DATA: &str = "Missing data for annotation.";

/// POST /annotate
///
/// Append an annotation record to the video's annotation file. A record
/// carrying a task index replaces any earlier record for that task.
pub async fn save_annotation(
    State(state): State<AppState>,
    payload: Result<Json<AnnotateRequest>, JsonRejection>,
) -> AppResult<Json<AnnotateResponse>> {
    let Json(input) = payload.map_err(|rejection| {
        tracing::debug!(error = %rejection, "Rejected annotation body");
        AppError::BadRequest(MISSING_DATA.into())
    })?;

    if input.name.trim().is_empty() || input.folder.is_empty() || input.image_file.is_empty() {
        return Err(AppError::BadRequest(MISSING_DATA.into()));
    }
    validate_video_name(&input.video)?;

    let path = state.store.save_annotation(&input).await?;

    tracing::info!(
        video = %input.video,
        frame = input.absolute_frame,
        name = %input.name,
        task = ?input.task_index,
        "Annotation saved"
    );

    let task_info = input
        .task_index
        .map(|index| format!(" for task {}", index + 1))
        .unwrap_or_default();

    Ok(Json(AnnotateResponse {
        status: "success".into(),
        message: format!(
            "Annotation for frame {}{task_info} saved to {}.",
            input.absolute_frame,
            path.display()
        ),
    }))
}
