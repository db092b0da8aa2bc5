//! Absolute frame to wall-clock conversion.

use crate::types::AbsoluteFrame;

/// Sampling rate of extracted frames.
pub const FRAMES_PER_SECOND: u64 = 25;

/// Whole seconds elapsed at `frame`.
pub fn frame_to_seconds(frame: AbsoluteFrame) -> u64 {
    frame / FRAMES_PER_SECOND
}

/// Format `frame` as `HH:MM:SS`. Hours are not wrapped.
pub fn format_timecode(frame: AbsoluteFrame) -> String {
    let seconds = frame_to_seconds(frame);
    format!(
        "{:02}:{:02}:{:02}",
        seconds / 3600,
        (seconds % 3600) / 60,
        seconds % 60
    )
}
