//! Framemark annotation client.
//!
//! Drives a [`framemark_core::Workbench`] from a single tokio task: user input
//! and network results arrive on one channel, render commands go to a
//! [`Surface`], and effects are executed against a [`Backend`].

pub mod api;
pub mod commands;
pub mod config;
pub mod driver;
pub mod error;
pub mod surface;

pub use api::{Backend, FramemarkApi};
pub use driver::{Driver, DriverHandle};
pub use surface::{Surface, TextSurface};
