//! Navigation Controller: owns the current position and clamps every move.
//!
//! Out-of-range requests are clamped silently, never rejected. The only
//! fallible operation is [`NavigationController::jump_to_absolute_frame`],
//! which leaves the position untouched when the frame cannot be located.

use crate::error::CoreError;
use crate::folder::MAX_FRAME_OFFSET;
use crate::locator::FrameLocator;
use crate::types::{AbsoluteFrame, Position};

#[derive(Debug, Clone)]
pub struct NavigationController {
    position: Position,
    folder_count: usize,
}

impl NavigationController {
    /// Start at `(0, 0)` over a layout of `folder_count` folders.
    pub fn new(folder_count: usize) -> Self {
        Self {
            position: Position::default(),
            folder_count,
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn folder_count(&self) -> usize {
        self.folder_count
    }

    fn max_folder_index(&self) -> usize {
        self.folder_count.saturating_sub(1)
    }

    pub fn set_folder_index(&mut self, index: usize) -> Position {
        self.position.folder_index = index.min(self.max_folder_index());
        self.position
    }

    pub fn set_frame_offset(&mut self, offset: u32) -> Position {
        self.position.frame_offset = offset.min(MAX_FRAME_OFFSET);
        self.position
    }

    /// Step the in-folder offset by `delta`. Never crosses into another folder.
    pub fn move_frame(&mut self, delta: i64) -> Position {
        let target = i64::from(self.position.frame_offset)
            .saturating_add(delta)
            .clamp(0, i64::from(MAX_FRAME_OFFSET));
        self.position.frame_offset = target as u32;
        self.position
    }

    /// Step the folder index by `delta`, keeping the in-folder offset.
    pub fn move_folder(&mut self, delta: i64) -> Position {
        let max = i64::try_from(self.max_folder_index()).unwrap_or(i64::MAX);
        let current = i64::try_from(self.position.folder_index).unwrap_or(i64::MAX);
        self.position.folder_index = current.saturating_add(delta).clamp(0, max) as usize;
        self.position
    }

    /// Move to the folder and offset holding `frame`.
    pub fn jump_to_absolute_frame(
        &mut self,
        locator: &FrameLocator,
        frame: AbsoluteFrame,
    ) -> Result<Position, CoreError> {
        let target = locator
            .locate(frame)
            .ok_or(CoreError::FrameOutOfRange { frame })?;
        self.set_folder_index(target.folder_index);
        self.set_frame_offset(target.frame_offset);
        Ok(self.position)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
