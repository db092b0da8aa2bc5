//! Folder range descriptors for the sharded frame layout.
//!
//! Extracted frames are stored in folders of exactly [`FRAMES_PER_FOLDER`]
//! images, each folder named `"<start>_<end>"` after the inclusive absolute
//! frame bounds it covers (e.g. `000000_000999`). Image files inside a folder
//! are named by their zero-padded in-folder offset (`000042.jpg`).

use serde::Serialize;

use crate::error::CoreError;
use crate::types::AbsoluteFrame;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Number of frame slots in every folder.
pub const FRAMES_PER_FOLDER: u32 = 1000;

/// Largest valid in-folder offset.
pub const MAX_FRAME_OFFSET: u32 = FRAMES_PER_FOLDER - 1;

/// File extension of extracted frame images.
pub const IMAGE_EXTENSION: &str = "jpg";

// ---------------------------------------------------------------------------
// FolderRange
// ---------------------------------------------------------------------------

/// One shard of the frame sequence, covering `start_frame..=end_frame`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FolderRange {
    pub name: String,
    pub start_frame: AbsoluteFrame,
    pub end_frame: AbsoluteFrame,
}

impl FolderRange {
    /// Parse a folder name of the form `"<start>_<end>"`.
    ///
    /// Leading zeros are accepted. The end must not precede the start.
    pub fn parse(name: &str) -> Result<Self, CoreError> {
        let invalid = || CoreError::InvalidFolderName(name.to_string());

        let (start, end) = name.split_once('_').ok_or_else(invalid)?;
        let start_frame: AbsoluteFrame = start.parse().map_err(|_| invalid())?;
        let end_frame: AbsoluteFrame = end.parse().map_err(|_| invalid())?;

        if end_frame < start_frame {
            return Err(invalid());
        }
        // Every offset of the folder must stay addressable.
        if start_frame.checked_add(AbsoluteFrame::from(MAX_FRAME_OFFSET)).is_none() {
            return Err(invalid());
        }

        Ok(Self {
            name: name.to_string(),
            start_frame,
            end_frame,
        })
    }

    /// Whether `frame` falls inside this range (both bounds inclusive).
    pub fn contains(&self, frame: AbsoluteFrame) -> bool {
        self.start_frame <= frame && frame <= self.end_frame
    }
}

/// Parse folder names for `video`, ordered by start frame.
///
/// Names that do not parse are skipped with a warning.
pub fn parse_folder_names<S: AsRef<str>>(video: &str, names: &[S]) -> Vec<FolderRange> {
    let mut folders: Vec<FolderRange> = names
        .iter()
        .filter_map(|name| match FolderRange::parse(name.as_ref()) {
            Ok(folder) => Some(folder),
            Err(e) => {
                tracing::warn!(video = %video, error = %e, "Skipping unparsable folder");
                None
            }
        })
        .collect();
    folders.sort_by_key(|f| f.start_frame);
    folders
}

/// Image file name for an in-folder offset, zero-padded to six digits.
pub fn image_file(frame_offset: u32) -> String {
    format!("{frame_offset:06}.{IMAGE_EXTENSION}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
