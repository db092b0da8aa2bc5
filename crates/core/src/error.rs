use crate::types::AbsoluteFrame;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Frame {frame} is outside any known folder range.")]
    FrameOutOfRange { frame: AbsoluteFrame },

    #[error("Invalid folder name '{0}'. Expected '<start>_<end>'")]
    InvalidFolderName(String),

    #[error("Please select a video first")]
    NoVideoSelected,

    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: String },

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
