//! Window + runtime loop.
//!
//! Owns the `winit` EventLoop and the window, and wires them to the GPU layer,
//! the shared render resources, and the application callbacks.

mod runtime;

pub use runtime::{Runtime, RuntimeConfig, RuntimeCtx};
