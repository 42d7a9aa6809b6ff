//! 3D resources and immediate-mode drawing.
//!
//! - [`Mesh`] uploads geometry, [`Texture`] uploads pixels,
//!   [`ShaderProgramBuilder`] compiles and links WGSL.
//! - [`Material`] and [`Model`] tie them together with a model matrix.
//! - [`Camera`] writes the [`ViewState`] that every draw in a frame reads.
//! - [`Frame`] records `draw_model` calls and submits them in one pass.
//!
//! [`Resources`] holds the shared layouts and defaults; the runtime builds it
//! once per window and exposes it through [`RenderCtx`](crate::render::RenderCtx).

mod camera;
mod error;
mod frame;
mod material;
mod mesh;
mod model;
mod resources;
mod shader;
#[cfg(test)]
mod testing;
mod texture;
mod view;

pub use camera::{Camera, FpsControls, FpsSettings};
pub use error::GfxError;
pub use frame::{Frame, Uniforms, pack_uniforms};
pub use material::Material;
pub use mesh::{Mesh, MeshData};
pub use model::Model;
pub use resources::Resources;
pub use shader::{AttributeSet, FRAGMENT_ENTRY, ShaderProgram, ShaderProgramBuilder, ShaderStage, VERTEX_ENTRY};
pub use texture::{PixelFormat, Texture, to_rgba};
pub use view::ViewState;
