//! Event loop that runs a [`Workbench`] against a [`Backend`] and a
//! [`Surface`].
//!
//! All state lives on one task. User input, network results, image failures
//! and scrub ticks are funnelled through a single unbounded channel, so the
//! workbench only ever sees one event at a time. Network calls and timers run
//! on their own tasks and report back through the same channel.

use std::sync::Arc;
use std::time::Duration;

use framemark_core::contract::VideoData;
use framemark_core::input::InputEvent;
use framemark_core::motion::{BoxedMotionHandle, MotionHandle, MotionId};
use framemark_core::output::{Effect, PendingSave, RenderCommand, Step};
use framemark_core::session::{MotionScheduler, SessionId};
use framemark_core::workbench::LoadTicket;
use framemark_core::Workbench;
use tokio::sync::mpsc;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::api::Backend;
use crate::surface::Surface;

enum LoopEvent {
    Input(InputEvent),
    ImageFailed(String),
    VideosListed(Result<Vec<String>, String>),
    VideoLoaded(LoadTicket, Result<VideoData, String>),
    SaveCompleted(PendingSave, Result<(), String>),
    Tick(SessionId, MotionId),
    Shutdown,
}

// ---------------------------------------------------------------------------
// DriverHandle
// ---------------------------------------------------------------------------

/// Sending side of a running [`Driver`]. Cheap to clone.
#[derive(Clone)]
pub struct DriverHandle {
    tx: mpsc::UnboundedSender<LoopEvent>,
}

impl DriverHandle {
    /// Queue a user action. Returns `false` once the driver has stopped.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(LoopEvent::Input(event)).is_ok()
    }

    /// Report that the surface could not display `url`.
    pub fn image_failed(&self, url: impl Into<String>) -> bool {
        self.tx.send(LoopEvent::ImageFailed(url.into())).is_ok()
    }

    /// Ask the driver to stop after the events already queued.
    pub fn shutdown(&self) {
        let _ = self.tx.send(LoopEvent::Shutdown);
    }
}

// ---------------------------------------------------------------------------
// Scrub timer
// ---------------------------------------------------------------------------

struct TickerHandle(CancellationToken);

impl MotionHandle for TickerHandle {
    fn cancel(&self) {
        self.0.cancel();
    }
}

/// Spawns one interval task per scrub. Each task posts a tick per interval
/// until its token is cancelled.
struct TokioScheduler {
    tx: mpsc::UnboundedSender<LoopEvent>,
}

impl MotionScheduler for TokioScheduler {
    fn schedule(
        &mut self,
        session: SessionId,
        motion: MotionId,
        interval: Duration,
    ) -> BoxedMotionHandle {
        let token = CancellationToken::new();
        let cancel = token.clone();
        let tx = self.tx.clone();

        tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = cancel.cancelled() => break,
                    _ = ticker.tick() => {
                        if tx.send(LoopEvent::Tick(session, motion)).is_err() {
                            break;
                        }
                    }
                }
            }
            tracing::trace!(session = %session, ?motion, "Scrub timer finished");
        });

        Box::new(TickerHandle(token))
    }
}

// ---------------------------------------------------------------------------
// Driver
// ---------------------------------------------------------------------------

pub struct Driver<B: Backend, S: Surface> {
    workbench: Workbench,
    backend: Arc<B>,
    surface: S,
    tx: mpsc::UnboundedSender<LoopEvent>,
    rx: mpsc::UnboundedReceiver<LoopEvent>,
}

impl<B: Backend, S: Surface> Driver<B, S> {
    pub fn new(backend: Arc<B>, surface: S) -> (Self, DriverHandle) {
        let (tx, rx) = mpsc::unbounded_channel();
        let handle = DriverHandle { tx: tx.clone() };
        let driver = Self {
            workbench: Workbench::new(),
            backend,
            surface,
            tx,
            rx,
        };
        (driver, handle)
    }

    /// Run until [`DriverHandle::shutdown`] is called. Lists the server's
    /// videos first. Returns the surface so callers can inspect it.
    pub async fn run(mut self) -> S {
        self.spawn_list_videos();

        while let Some(event) = self.rx.recv().await {
            let step = match event {
                LoopEvent::Input(event) => {
                    let mut scheduler = TokioScheduler {
                        tx: self.tx.clone(),
                    };
                    self.workbench.handle(&event, &mut scheduler)
                }
                LoopEvent::ImageFailed(url) => self.workbench.image_failed(&url),
                LoopEvent::VideosListed(result) => self.workbench.videos_listed(result),
                LoopEvent::VideoLoaded(ticket, result) => {
                    self.workbench.video_loaded(&ticket, result)
                }
                LoopEvent::SaveCompleted(pending, result) => {
                    self.workbench.save_completed(&pending, result)
                }
                LoopEvent::Tick(session, motion) => self.workbench.tick(session, motion),
                LoopEvent::Shutdown => break,
            };
            self.apply(step);
        }

        tracing::info!("Driver stopped");
        self.surface
    }

    fn apply(&mut self, step: Step) {
        for command in step.commands {
            if let RenderCommand::ShowFrame { url } = &command {
                self.spawn_image_load(url.clone());
            }
            self.surface.render(command);
        }
        for effect in step.effects {
            match effect {
                Effect::FetchVideoData(ticket) => self.spawn_fetch(ticket),
                Effect::SaveAnnotation(pending) => self.spawn_save(pending),
                Effect::Prefetch(urls) => self.spawn_prefetch(urls),
            }
        }
    }

    // ---- effects ----

    fn spawn_list_videos(&self) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend.list_videos().await.map_err(|e| e.user_message());
            let _ = tx.send(LoopEvent::VideosListed(result));
        });
    }

    fn spawn_fetch(&self, ticket: LoadTicket) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = backend
                .video_data(&ticket.video)
                .await
                .map_err(|e| e.user_message());
            let _ = tx.send(LoopEvent::VideoLoaded(ticket, result));
        });
    }

    fn spawn_save(&self, pending: PendingSave) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            let result = match backend.annotate(&pending.request).await {
                Ok(response) => {
                    tracing::info!(message = %response.message, "Server accepted annotation");
                    Ok(())
                }
                Err(e) => Err(e.user_message()),
            };
            let _ = tx.send(LoopEvent::SaveCompleted(pending, result));
        });
    }

    /// Load the frame on screen. Only failures are reported back.
    fn spawn_image_load(&self, url: String) {
        let backend = Arc::clone(&self.backend);
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Err(e) = backend.preload_image(&url).await {
                tracing::debug!(url = %url, error = %e, "Frame image failed to load");
                let _ = tx.send(LoopEvent::ImageFailed(url));
            }
        });
    }

    fn spawn_prefetch(&self, urls: Vec<String>) {
        tracing::trace!(count = urls.len(), "Prefetching frames");
        for url in urls {
            let backend = Arc::clone(&self.backend);
            tokio::spawn(async move {
                if let Err(e) = backend.preload_image(&url).await {
                    tracing::trace!(url = %url, error = %e, "Prefetch miss");
                }
            });
        }
    }
}
