use crate::prefetch::Direction;
use crate::types::TaskIndex;

/// A user action, independent of whatever surface produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// Folder slider dragged to an index. Refreshes without prefetching.
    FolderSliderInput(usize),
    /// Frame slider dragged to an offset. Refreshes without prefetching.
    FrameSliderInput(u32),
    /// Either slider released.
    SliderCommit,
    /// Folder step button (e.g. `-10`, `-1`, `+1`, `+10`).
    FolderStep(i64),
    /// Frame step button.
    FrameStep(i64),
    /// Directional scrub control pressed.
    ScrubStart(Direction),
    /// Directional scrub control released.
    ScrubStop,
    /// The surface lost input focus.
    FocusLost,
    SelectTask(TaskIndex),
    /// Label the current frame with a name.
    SelectName(String),
    SelectVideo(String),
}
