//! GPU device + surface management.
//!
//! - [`Gpu`] creates the wgpu Instance/Adapter/Device/Queue, configures the
//!   surface, and owns the depth buffer.
//! - Frames are acquired with [`Gpu::begin_frame`] and presented with [`Gpu::submit`].

mod depth;
mod error;
mod frame;
mod gpu;
mod init;
mod surface;

pub use depth::DepthTarget;
pub use error::SurfaceErrorAction;
pub use frame::GpuFrame;
pub use gpu::Gpu;
pub use init::GpuInit;
