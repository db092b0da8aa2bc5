//! What the core asks the outside world to do.
//!
//! A [`Step`] is the result of feeding one event into the core: render
//! commands for the surface, in order, plus effects for the driver to run.
//! Effects that complete asynchronously report back through the
//! [`crate::workbench::Workbench`] methods named after them.

use std::fmt;

use crate::contract::AnnotateRequest;
use crate::session::SessionId;
use crate::types::{AbsoluteFrame, Position, TaskIndex};
use crate::workbench::LoadTicket;

// ---------------------------------------------------------------------------
// View models
// ---------------------------------------------------------------------------

/// Everything shown next to the current frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameInfo {
    pub position: Position,
    pub folder_count: usize,
    pub folder_name: String,
    pub absolute_frame: AbsoluteFrame,
    pub timecode: String,
}

impl FrameInfo {
    /// `"Folder (i+1 / n)"`.
    pub fn folder_label(&self) -> String {
        format!(
            "Folder ({} / {})",
            self.position.folder_index + 1,
            self.folder_count
        )
    }

    /// `"Frame (offset)"`.
    pub fn frame_label(&self) -> String {
        format!("Frame ({})", self.position.frame_offset)
    }

    /// `"Time: HH:MM:SS | Absolute Frame: N"`.
    pub fn summary(&self) -> String {
        format!(
            "Time: {} | Absolute Frame: {}",
            self.timecode, self.absolute_frame
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskItem {
    pub index: TaskIndex,
    pub label: String,
    /// Has a confirmed annotation.
    pub done: bool,
    /// Is the selected task.
    pub current: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameItem {
    pub name: String,
    pub selected: bool,
}

/// Completed tasks out of all tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Progress {
    pub done: usize,
    pub total: usize,
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.done, self.total)
    }
}

// ---------------------------------------------------------------------------
// Commands and effects
// ---------------------------------------------------------------------------

/// An instruction for the display surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderCommand {
    ShowFrame { url: String },
    ShowPlaceholder { text: String },
    FrameInfo(FrameInfo),
    TaskList { items: Vec<TaskItem>, progress: Progress },
    NameList(Vec<NameItem>),
    Toast(String),
    /// Inline failure text for the task and name panels.
    PanelError { tasks: String, names: String },
    VideoList(Vec<String>),
}

/// Placeholder shown when a video has no folders.
pub fn no_data_text(video: &str) -> String {
    format!("No Data For {video}")
}

pub const IMAGE_NOT_FOUND: &str = "Image Not Found";

/// A save that has been dispatched but not yet answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSave {
    pub session_id: SessionId,
    pub request: AnnotateRequest,
}

/// Work for the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Fetch `GET /api/video_data/{video}` and report through `video_loaded`.
    FetchVideoData(LoadTicket),
    /// Post the request and report through `save_completed`.
    SaveAnnotation(PendingSave),
    /// Best-effort background image loads. Results are never reported.
    Prefetch(Vec<String>),
}

/// Output of one turn of the core.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Step {
    pub commands: Vec<RenderCommand>,
    pub effects: Vec<Effect>,
}

impl Step {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty() && self.effects.is_empty()
    }

    pub fn render(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    pub fn toast(&mut self, message: impl Into<String>) {
        self.commands.push(RenderCommand::Toast(message.into()));
    }

    pub fn effect(&mut self, effect: Effect) {
        self.effects.push(effect);
    }

    /// Queue a prefetch batch. Empty batches are dropped.
    pub fn prefetch(&mut self, urls: Vec<String>) {
        if !urls.is_empty() {
            self.effects.push(Effect::Prefetch(urls));
        }
    }

    pub fn extend(&mut self, other: Step) {
        self.commands.extend(other.commands);
        self.effects.extend(other.effects);
    }

    /// Toast messages in emission order.
    pub fn toasts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|c| match c {
            RenderCommand::Toast(message) => Some(message.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_info_labels() {
        let info = FrameInfo {
            position: Position::new(1, 500),
            folder_count: 2,
            folder_name: "1000_1999".into(),
            absolute_frame: 1500,
            timecode: "00:01:00".into(),
        };
        assert_eq!(info.folder_label(), "Folder (2 / 2)");
        assert_eq!(info.frame_label(), "Frame (500)");
        assert_eq!(info.summary(), "Time: 00:01:00 | Absolute Frame: 1500");
    }

    #[test]
    fn progress_display() {
        assert_eq!(Progress { done: 1, total: 3 }.to_string(), "1/3");
    }

    #[test]
    fn empty_prefetch_batches_are_dropped() {
        let mut step = Step::new();
        step.prefetch(Vec::new());
        assert!(step.is_empty());
        step.prefetch(vec!["/static/frames/v/0_999/000001.jpg".into()]);
        assert_eq!(step.effects.len(), 1);
    }
}
