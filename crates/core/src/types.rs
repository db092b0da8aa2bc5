use serde::Serialize;

/// Global frame index into a video's full frame sequence, independent of
/// how frames are sharded into folders.
pub type AbsoluteFrame = u64;

/// Index of a task in the list returned for a video.
pub type TaskIndex = usize;

/// A location in the sharded layout: which folder, and which offset inside it.
///
/// Offsets are always in `0..=999`; see [`crate::folder::MAX_FRAME_OFFSET`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
pub struct Position {
    pub folder_index: usize,
    pub frame_offset: u32,
}

impl Position {
    pub fn new(folder_index: usize, frame_offset: u32) -> Self {
        Self {
            folder_index,
            frame_offset,
        }
    }
}
