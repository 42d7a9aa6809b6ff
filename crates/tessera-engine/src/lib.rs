//! Tessera engine crate.
//!
//! A small immediate-mode 3D toolkit: a winit/wgpu runtime, a math library
//! with a fixed matrix layout, meshes loaded from Wavefront OBJ, textured
//! materials, and a first-person camera.
//!
//! | module     | purpose                                                |
//! |------------|--------------------------------------------------------|
//! | `math`     | `Vec2`, `Vec3`, `Mat4`, Euler extraction                |
//! | `gfx`      | mesh, texture, shader, material, model, camera, frame  |
//! | `core`     | `App` contract and per-callback contexts               |
//! | `window`   | event loop and window lifecycle                        |
//! | `device`   | wgpu instance, surface and depth buffer                |
//! | `render`   | `RenderCtx`, `RenderTarget`, `Viewport`                |
//! | `input`    | platform-agnostic keyboard and mouse state             |
//! | `time`     | frame clock                                            |
//! | `logging`  | `env_logger` setup                                     |

pub mod core;
pub mod device;
pub mod gfx;
pub mod input;
pub mod logging;
pub mod math;
pub mod render;
pub mod time;
pub mod window;
