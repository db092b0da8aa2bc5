//! Session: all state scoped to one opened video.
//!
//! A fresh [`Session`] is built for every video load and dropped on switch,
//! which resets the selection, the prefetch cache, and any running scrub in
//! one move. The session never performs I/O. It turns [`InputEvent`]s into a
//! [`Step`] and learns about completed work through [`Session::tick`],
//! [`Session::complete_save`], and [`Session::image_failed`].

use std::time::Duration;

use crate::contract::{AnnotateRequest, Annotation, Task, VideoData};
use crate::error::CoreError;
use crate::folder::image_file;
use crate::input::InputEvent;
use crate::locator::FrameLocator;
use crate::motion::{BoxedMotionHandle, ContinuousMotion, MotionId, SCRUB_INTERVAL};
use crate::navigation::NavigationController;
use crate::output::{
    no_data_text, Effect, FrameInfo, PendingSave, RenderCommand, Step, IMAGE_NOT_FOUND,
};
use crate::prefetch::{Direction, PrefetchCache};
use crate::reconciler::{success_message, AnnotationReconciler};
use crate::timecode::format_timecode;
use crate::types::{AbsoluteFrame, Position, TaskIndex};

/// Identity of one video load. Responses tagged with an older id are stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl SessionId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// Starts the repeating timer behind a continuous scrub.
///
/// The timer must deliver `(session, motion)` back to the core every
/// `interval` until the returned handle is cancelled. The first tick is due
/// one interval after scheduling; the immediate step is taken by the session.
pub trait MotionScheduler {
    fn schedule(
        &mut self,
        session: SessionId,
        motion: MotionId,
        interval: Duration,
    ) -> BoxedMotionHandle;
}

#[derive(Debug)]
pub struct Session {
    id: SessionId,
    locator: FrameLocator,
    navigation: NavigationController,
    reconciler: AnnotationReconciler,
    prefetch: PrefetchCache,
    tasks: Vec<Task>,
    names: Vec<String>,
    motion: ContinuousMotion,
    on_screen: Option<String>,
}

impl Session {
    /// Build the session for `video` and render its initial view.
    ///
    /// With tasks and folders the first task is selected. With folders only,
    /// the view opens at `(0, 0)`. Without folders a placeholder is shown.
    pub fn open(id: SessionId, video: impl Into<String>, data: VideoData) -> (Self, Step) {
        let locator = FrameLocator::from_names(video, &data.folders);
        let reconciler = AnnotationReconciler::new(data.annotations_by_task());

        tracing::info!(
            session = %id,
            video = %locator.video(),
            folders = locator.folder_count(),
            tasks = data.tasks.len(),
            annotations = reconciler.annotations().len(),
            "Session opened"
        );

        let mut session = Self {
            id,
            navigation: NavigationController::new(locator.folder_count()),
            locator,
            reconciler,
            prefetch: PrefetchCache::new(),
            tasks: data.tasks,
            names: data.names,
            motion: ContinuousMotion::new(),
            on_screen: None,
        };

        let mut step = Step::new();
        if !session.tasks.is_empty() && !session.locator.is_empty() {
            step.extend(session.select_task(0));
        } else {
            session.refresh_view(&mut step);
            if !session.locator.is_empty() {
                session.queue_prefetch(&mut step, Direction::Static);
            }
            step.render(session.task_list());
        }
        (session, step)
    }

    // -- Accessors -----------------------------------------------------------

    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn video(&self) -> &str {
        self.locator.video()
    }

    pub fn locator(&self) -> &FrameLocator {
        &self.locator
    }

    pub fn position(&self) -> Position {
        self.navigation.position()
    }

    /// Absolute frame at the current position, if any folder is loaded.
    pub fn current_frame(&self) -> Option<AbsoluteFrame> {
        self.locator.absolute_frame(self.navigation.position())
    }

    pub fn reconciler(&self) -> &AnnotationReconciler {
        &self.reconciler
    }

    pub fn prefetch_cache(&self) -> &PrefetchCache {
        &self.prefetch
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn is_scrubbing(&self) -> bool {
        self.motion.is_active()
    }

    /// URL of the frame currently displayed.
    pub fn on_screen(&self) -> Option<&str> {
        self.on_screen.as_deref()
    }

    // -- Input ---------------------------------------------------------------

    pub fn handle(&mut self, event: &InputEvent, scheduler: &mut dyn MotionScheduler) -> Step {
        let mut step = Step::new();
        match event {
            InputEvent::FolderSliderInput(index) => {
                self.navigation.set_folder_index(*index);
                self.refresh_view(&mut step);
            }
            InputEvent::FrameSliderInput(offset) => {
                self.navigation.set_frame_offset(*offset);
                self.refresh_view(&mut step);
            }
            InputEvent::SliderCommit => {
                self.queue_prefetch(&mut step, Direction::Static);
            }
            InputEvent::FolderStep(delta) => {
                self.navigation.move_folder(*delta);
                self.refresh_view(&mut step);
                self.queue_prefetch(&mut step, Direction::Static);
            }
            InputEvent::FrameStep(delta) => {
                self.step_frame(&mut step, *delta);
            }
            InputEvent::ScrubStart(direction) => {
                let session = self.id;
                let started = self.motion.start(*direction, |motion| {
                    scheduler.schedule(session, motion, SCRUB_INTERVAL)
                });
                if let Some(motion) = started {
                    tracing::debug!(session = %session, ?motion, ?direction, "Scrub started");
                    self.step_frame(&mut step, direction.step());
                }
            }
            InputEvent::ScrubStop | InputEvent::FocusLost => {
                self.stop_motion();
            }
            InputEvent::SelectTask(index) => {
                step = self.select_task(*index);
            }
            InputEvent::SelectName(name) => match self.prepare_save(name) {
                Ok(pending) => step.effect(Effect::SaveAnnotation(pending)),
                Err(e) => step.toast(e.to_string()),
            },
            InputEvent::SelectVideo(_) => {
                tracing::debug!("Video selection is handled above the session");
            }
        }
        step
    }

    /// One repeated step of the live scrub. Ticks from a cancelled or
    /// replaced motion produce nothing.
    pub fn tick(&mut self, motion: MotionId) -> Step {
        let mut step = Step::new();
        match self.motion.accepts(motion) {
            Some(direction) => self.step_frame(&mut step, direction.step()),
            None => tracing::debug!(session = %self.id, ?motion, "Dropping stale scrub tick"),
        }
        step
    }

    /// Cancel any live scrub. Returns `false` when none was running.
    pub fn stop_motion(&mut self) -> bool {
        let stopped = self.motion.stop();
        if stopped {
            tracing::debug!(session = %self.id, "Scrub stopped");
        }
        stopped
    }

    // -- Saving --------------------------------------------------------------

    /// Build the save request for labelling the current frame with `name`.
    pub fn prepare_save(&self, name: &str) -> Result<PendingSave, CoreError> {
        let position = self.navigation.position();
        let folder = self
            .locator
            .folder(position.folder_index)
            .ok_or_else(|| CoreError::Validation("No frame folders are loaded for this video".into()))?;
        let absolute_frame = self
            .locator
            .absolute_frame(position)
            .ok_or_else(|| CoreError::Internal(format!("Unaddressable position {position:?}")))?;

        Ok(PendingSave {
            session_id: self.id,
            request: AnnotateRequest {
                video: self.locator.video().to_string(),
                folder: folder.name.clone(),
                image_file: image_file(position.frame_offset),
                absolute_frame,
                name: name.to_string(),
                task_index: self.reconciler.selected(),
            },
        })
    }

    /// Apply the server's answer to a save.
    ///
    /// Only a success touches the annotation map, and only for the task index
    /// carried by the request.
    pub fn complete_save(&mut self, pending: &PendingSave, result: Result<(), String>) -> Step {
        let mut step = Step::new();
        let request = &pending.request;
        match result {
            Ok(()) => {
                tracing::info!(
                    video = %request.video,
                    frame = request.absolute_frame,
                    name = %request.name,
                    task = ?request.task_index,
                    "Annotation saved"
                );
                step.toast(success_message(request));
                if let Some(index) = request.task_index {
                    self.reconciler.confirm(
                        index,
                        Annotation {
                            frame: request.absolute_frame,
                            name: request.name.clone(),
                        },
                    );
                }
                step.render(self.task_list());
                step.render(self.name_list());
            }
            Err(message) => {
                tracing::warn!(video = %request.video, error = %message, "Annotation save failed");
                step.toast(format!("Save failed: {message}"));
            }
        }
        step
    }

    // -- Images --------------------------------------------------------------

    /// A frame image failed to load. Only the frame on screen is reported;
    /// prefetch misses are ignored.
    pub fn image_failed(&self, url: &str) -> Step {
        let mut step = Step::new();
        if self.on_screen.as_deref() == Some(url) {
            tracing::warn!(url = %url, "Frame image not found");
            step.render(RenderCommand::ShowPlaceholder {
                text: IMAGE_NOT_FOUND.to_string(),
            });
        }
        step
    }

    // -- Internals -----------------------------------------------------------

    fn select_task(&mut self, index: TaskIndex) -> Step {
        let mut step = Step::new();
        let frame = match self.reconciler.select(index, &self.tasks) {
            Ok(frame) => frame,
            Err(e) => {
                tracing::warn!(session = %self.id, error = %e, "Task selection rejected");
                step.toast(format!("Error: {e}"));
                return step;
            }
        };

        match self.navigation.jump_to_absolute_frame(&self.locator, frame) {
            Ok(_) => {
                self.refresh_view(&mut step);
                self.queue_prefetch(&mut step, Direction::Static);
            }
            Err(e) => {
                tracing::warn!(task = index, frame, "Task frame is outside every folder");
                step.toast(format!("Error: {e}"));
                step.render(self.name_list());
            }
        }
        step.render(self.task_list());
        step
    }

    fn step_frame(&mut self, step: &mut Step, delta: i64) {
        self.navigation.move_frame(delta);
        self.refresh_view(step);
        self.queue_prefetch(step, Direction::from_delta(delta));
    }

    fn refresh_view(&mut self, step: &mut Step) {
        let position = self.navigation.position();
        let (Some(url), Some(folder), Some(absolute_frame)) = (
            self.locator.image_url(position),
            self.locator.folder(position.folder_index),
            self.locator.absolute_frame(position),
        ) else {
            self.on_screen = None;
            step.render(RenderCommand::ShowPlaceholder {
                text: no_data_text(self.locator.video()),
            });
            step.render(self.name_list());
            return;
        };

        let info = FrameInfo {
            position,
            folder_count: self.locator.folder_count(),
            folder_name: folder.name.clone(),
            absolute_frame,
            timecode: format_timecode(absolute_frame),
        };
        self.on_screen = Some(url.clone());
        step.render(RenderCommand::ShowFrame { url });
        step.render(RenderCommand::FrameInfo(info));
        step.render(self.name_list());
    }

    fn queue_prefetch(&mut self, step: &mut Step, direction: Direction) {
        let Some(center) = self.current_frame() else {
            return;
        };
        let urls = self.prefetch.plan(&self.locator, center, direction);
        step.prefetch(urls);
    }

    fn task_list(&self) -> RenderCommand {
        RenderCommand::TaskList {
            items: self.reconciler.task_items(&self.tasks),
            progress: self.reconciler.progress(self.tasks.len()),
        }
    }

    fn name_list(&self) -> RenderCommand {
        RenderCommand::NameList(self.reconciler.name_items(&self.names, self.current_frame()))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
