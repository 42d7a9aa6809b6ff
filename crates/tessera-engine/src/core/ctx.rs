use winit::window::{CursorGrabMode, Window, WindowId};

use crate::device::{Gpu, SurfaceErrorAction};
use crate::gfx::{FpsControls, Frame, Resources, ViewState};
use crate::input::{InputFrame, InputState};
use crate::render::{RenderCtx, RenderTarget, Viewport};
use crate::time::FrameTime;
use crate::window::RuntimeCtx;

use super::app::AppControl;

/// Per-window handles and immutable window metadata.
pub struct WindowCtx<'a> {
    pub id: WindowId,
    pub window: &'a Window,
}

impl<'a> WindowCtx<'a> {
    /// Drawable size in physical pixels.
    pub fn viewport(&self) -> Viewport {
        Viewport::from(self.window.inner_size())
    }

    /// Grabs and hides the cursor (relative mouse mode), or releases it.
    ///
    /// Tries `Locked` first and falls back to `Confined` where locking is
    /// unsupported. Raw mouse motion keeps arriving either way.
    pub fn set_cursor_captured(&self, captured: bool) {
        let result = if captured {
            self.window
                .set_cursor_grab(CursorGrabMode::Locked)
                .or_else(|_| self.window.set_cursor_grab(CursorGrabMode::Confined))
        } else {
            self.window.set_cursor_grab(CursorGrabMode::None)
        };

        if let Err(err) = result {
            log::warn!("cursor grab (captured: {captured}) failed: {err}");
        }
        self.window.set_cursor_visible(!captured);
    }
}

/// Context passed to [`App::init`](super::App::init).
pub struct InitCtx<'a> {
    pub window: WindowCtx<'a>,
    pub render: RenderCtx<'a>,
    pub view: &'a mut ViewState,
}

/// Per-frame context passed to `core::App::on_frame`.
///
/// Lifetimes:
/// - `'a` is the duration of the callback invocation
/// - `'w` is the window-borrow lifetime carried by `Gpu<'w>`
pub struct FrameCtx<'a, 'w> {
    pub window: WindowCtx<'a>,
    pub gpu: &'a mut Gpu<'w>,
    pub resources: &'a Resources,
    pub view: &'a mut ViewState,
    pub input: &'a InputState,
    pub input_frame: &'a InputFrame,
    pub time: FrameTime,
    pub runtime: &'a mut RuntimeCtx,
}

impl<'a, 'w> FrameCtx<'a, 'w> {
    /// Current drawable size in physical pixels.
    pub fn viewport(&self) -> Viewport {
        Viewport::from(self.gpu.size())
    }

    /// Context for creating meshes, textures, and programs.
    pub fn render_ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            self.gpu.device(),
            self.gpu.queue(),
            self.gpu.surface_format(),
            self.viewport(),
            self.resources,
        )
    }

    /// WASD and mouse-look input for this frame.
    pub fn fps_controls(&self) -> FpsControls {
        FpsControls::from_input(self.input, self.input_frame, self.viewport())
    }

    /// Clears color and depth, lets `draw` record models, then submits and
    /// presents.
    ///
    /// A lost or outdated surface skips the frame; an out-of-memory surface
    /// returns [`AppControl::Exit`].
    pub fn render<F>(&mut self, clear: wgpu::Color, draw: F) -> AppControl
    where
        F: FnOnce(&mut Frame<'_>),
    {
        let mut frame = match self.gpu.begin_frame() {
            Ok(f) => f,
            Err(err) => {
                let action = self.gpu.handle_surface_error(err);
                if action == SurfaceErrorAction::Fatal {
                    log::error!("surface lost beyond recovery; exiting");
                    return AppControl::Exit;
                }
                return AppControl::Continue;
            }
        };

        let gpu: &Gpu<'w> = self.gpu;
        let rctx = RenderCtx::new(
            gpu.device(),
            gpu.queue(),
            gpu.surface_format(),
            Viewport::from(gpu.size()),
            self.resources,
        );

        let mut recorded = Frame::new(rctx, *self.view);
        draw(&mut recorded);

        // RenderTarget borrows frame.encoder; dropped before submit() takes frame.
        {
            let mut target = RenderTarget::new(&mut frame.encoder, &frame.view, gpu.depth_view());
            recorded.finish(&mut target, clear);
        }

        self.window.window.pre_present_notify();
        gpu.submit(frame);

        AppControl::Continue
    }
}
