//! Workbench: the top-level state of the annotation client.
//!
//! Owns the video list and at most one [`Session`]. Every asynchronous result
//! comes back tagged with the [`SessionId`] it was issued for; results for a
//! session that has since been replaced are dropped.

use crate::contract::VideoData;
use crate::error::CoreError;
use crate::input::InputEvent;
use crate::motion::MotionId;
use crate::output::{Effect, PendingSave, RenderCommand, Step};
use crate::session::{MotionScheduler, Session, SessionId};

pub const INIT_FAILED: &str = "Initialization failed, please check if backend service is running.";
pub const NO_VIDEOS: &str = "Error: No video folders found in static/frames/ directory.";

/// A video load that has been requested but not answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadTicket {
    pub session_id: SessionId,
    pub video: String,
}

#[derive(Debug, Default)]
pub struct Workbench {
    videos: Vec<String>,
    session: Option<Session>,
    pending_load: Option<LoadTicket>,
    next_session: u64,
}

impl Workbench {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn videos(&self) -> &[String] {
        &self.videos
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn pending_load(&self) -> Option<&LoadTicket> {
        self.pending_load.as_ref()
    }

    /// Apply the answer to `GET /api/videos`. The first video is opened.
    pub fn videos_listed(&mut self, result: Result<Vec<String>, String>) -> Step {
        let mut step = Step::new();
        match result {
            Ok(videos) => {
                tracing::info!(count = videos.len(), "Videos listed");
                self.videos = videos;
                step.render(RenderCommand::VideoList(self.videos.clone()));
                match self.videos.first().cloned() {
                    Some(first) => step.extend(self.select_video(first)),
                    None => step.toast(NO_VIDEOS),
                }
            }
            Err(message) => {
                tracing::error!(error = %message, "Failed to list videos");
                step.toast(INIT_FAILED);
            }
        }
        step
    }

    pub fn handle(&mut self, event: &InputEvent, scheduler: &mut dyn MotionScheduler) -> Step {
        match event {
            InputEvent::SelectVideo(video) if video.is_empty() => Step::new(),
            InputEvent::SelectVideo(video) => self.select_video(video.clone()),
            InputEvent::SelectName(_) if self.session.is_none() => {
                let mut step = Step::new();
                step.toast(CoreError::NoVideoSelected.to_string());
                step
            }
            _ => match self.session.as_mut() {
                Some(session) => session.handle(event, scheduler),
                None => {
                    tracing::debug!(?event, "No video open, ignoring input");
                    Step::new()
                }
            },
        }
    }

    /// Drop the current session and request data for `video`.
    fn select_video(&mut self, video: String) -> Step {
        if let Some(mut previous) = self.session.take() {
            previous.stop_motion();
            tracing::debug!(session = %previous.id(), video = %previous.video(), "Session closed");
        }

        let ticket = LoadTicket {
            session_id: SessionId::new(self.next_session),
            video,
        };
        self.next_session += 1;
        self.pending_load = Some(ticket.clone());
        tracing::info!(session = %ticket.session_id, video = %ticket.video, "Loading video");

        let mut step = Step::new();
        step.effect(Effect::FetchVideoData(ticket));
        step
    }

    /// Apply the answer to `GET /api/video_data/{video}`.
    pub fn video_loaded(&mut self, ticket: &LoadTicket, result: Result<VideoData, String>) -> Step {
        if self.pending_load.as_ref() != Some(ticket) {
            tracing::debug!(session = %ticket.session_id, video = %ticket.video, "Dropping stale video data");
            return Step::new();
        }
        self.pending_load = None;

        match result {
            Ok(data) => {
                let (session, step) = Session::open(ticket.session_id, ticket.video.clone(), data);
                self.session = Some(session);
                step
            }
            Err(message) => {
                tracing::warn!(video = %ticket.video, error = %message, "Video data load failed");
                let mut step = Step::new();
                step.toast(format!("Failed to load video data: {message}"));
                step.render(RenderCommand::PanelError {
                    tasks: format!("Loading failed: {message}"),
                    names: "Loading failed".to_string(),
                });
                step
            }
        }
    }

    /// Apply the answer to `POST /api/annotate`.
    pub fn save_completed(&mut self, pending: &PendingSave, result: Result<(), String>) -> Step {
        match self.live_session(pending.session_id) {
            Some(session) if session.video() == pending.request.video => {
                session.complete_save(pending, result)
            }
            _ => {
                tracing::debug!(
                    session = %pending.session_id,
                    video = %pending.request.video,
                    "Dropping stale save response"
                );
                Step::new()
            }
        }
    }

    /// Deliver a scrub timer tick.
    pub fn tick(&mut self, session_id: SessionId, motion: MotionId) -> Step {
        match self.live_session(session_id) {
            Some(session) => session.tick(motion),
            None => Step::new(),
        }
    }

    pub fn image_failed(&self, url: &str) -> Step {
        self.session
            .as_ref()
            .map_or_else(Step::new, |session| session.image_failed(url))
    }

    fn live_session(&mut self, id: SessionId) -> Option<&mut Session> {
        self.session.as_mut().filter(|session| session.id() == id)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
