//! Renderer-facing handles.
//!
//! [`RenderCtx`] bundles what resource constructors need (device, queue,
//! formats, registry); [`RenderTarget`] is what a frame draws into.

mod ctx;
mod viewport;

pub use ctx::{RenderCtx, RenderTarget};
pub use viewport::Viewport;
