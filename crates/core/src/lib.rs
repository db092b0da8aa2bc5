//! Framemark core: frame addressing, navigation, prefetch planning, and
//! annotation reconciliation for the frame-annotation client.
//!
//! Nothing in this crate performs I/O. The building blocks are:
//!
//! - [`FrameLocator`] translates absolute frames to `(folder, offset)` pairs.
//! - [`PrefetchCache`] plans direction-aware background image loads.
//! - [`NavigationController`] owns the clamped current position.
//! - [`AnnotationReconciler`] tracks confirmed annotations and highlight state.
//! - [`Workbench`] ties them together per video [`Session`], consuming
//!   [`InputEvent`]s and producing [`Step`]s for a driver to execute.

pub mod contract;
pub mod error;
pub mod folder;
pub mod input;
pub mod labels;
pub mod locator;
pub mod motion;
pub mod navigation;
pub mod output;
pub mod prefetch;
pub mod reconciler;
pub mod session;
pub mod timecode;
pub mod types;
pub mod workbench;

pub use error::CoreError;
pub use input::InputEvent;
pub use locator::FrameLocator;
pub use navigation::NavigationController;
pub use output::{Effect, RenderCommand, Step};
pub use prefetch::{Direction, PrefetchCache};
pub use reconciler::AnnotationReconciler;
pub use session::{MotionScheduler, Session, SessionId};
pub use workbench::Workbench;
