//! Core engine-facing contracts.
//!
//! This module defines the interface between the runtime (platform loop) and
//! the application: a one-time [`InitCtx`] for loading resources and a
//! per-frame [`FrameCtx`] for input, camera updates and drawing.

mod app;
mod ctx;

pub use app::{App, AppControl};
pub use ctx::{FrameCtx, InitCtx, WindowCtx};
