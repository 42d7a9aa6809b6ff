//! Walk through a grid of models with a first-person camera.
//!
//! Usage: `tessera-demo [model.obj] [texture.png|jpg]`
//!
//! Without arguments a built-in cube is drawn with the placeholder texture.
//! WASD moves, the mouse looks around, Tab toggles cursor capture, Escape
//! quits.

use std::path::PathBuf;

use anyhow::Context;
use tessera_engine::core::{App, AppControl, FrameCtx, InitCtx};
use tessera_engine::device::GpuInit;
use tessera_engine::gfx::{Camera, Model, Texture};
use tessera_engine::input::Key;
use tessera_engine::logging::{LoggingConfig, init_logging};
use tessera_engine::math::{Mat4, Vec3};
use tessera_engine::window::{Runtime, RuntimeConfig};

const CUBE_OBJ: &[u8] = include_bytes!("../assets/cube.obj");

/// Models per grid axis.
const GRID: i32 = 10;

const CLEAR: wgpu::Color = wgpu::Color {
    r: 0.1,
    g: 0.1,
    b: 0.1,
    a: 1.0,
};

struct Demo {
    obj_path: Option<PathBuf>,
    texture_path: Option<PathBuf>,

    model: Option<Model>,
    camera: Option<Camera>,
    captured: bool,
}

impl Demo {
    fn from_args() -> Self {
        let mut args = std::env::args_os().skip(1).map(PathBuf::from);
        Self {
            obj_path: args.next(),
            texture_path: args.next(),
            model: None,
            camera: None,
            captured: false,
        }
    }
}

impl App for Demo {
    fn init(&mut self, ctx: &mut InitCtx<'_>) -> anyhow::Result<()> {
        let obj = match &self.obj_path {
            Some(path) => {
                std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?
            }
            None => CUBE_OBJ.to_vec(),
        };
        let mut model = Model::from_obj(&ctx.render, &obj).context("failed to load model")?;

        if let Some(path) = &self.texture_path {
            let bytes =
                std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
            let texture = Texture::from_image_bytes(&ctx.render, &bytes)
                .with_context(|| format!("failed to load texture {}", path.display()))?;
            model.put_texture(&texture);
        }

        let camera = Camera::create(
            ctx.view,
            ctx.render.viewport,
            Vec3::new(0.0, 0.0, -1.0),
            1.5,
            0.1,
            100.0,
        );

        ctx.window.set_cursor_captured(true);
        self.captured = true;

        self.model = Some(model);
        self.camera = Some(camera);
        log::info!("WASD to move, mouse to look, Tab to release the cursor, Escape to quit");
        Ok(())
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        if ctx.input_frame.key_pressed(Key::Escape) {
            return AppControl::Exit;
        }
        if ctx.input_frame.key_pressed(Key::Tab) {
            self.captured = !self.captured;
            ctx.window.set_cursor_captured(self.captured);
        }

        let (Some(camera), Some(model)) = (self.camera.as_mut(), self.model.as_mut()) else {
            return AppControl::Exit;
        };

        if self.captured {
            let controls = ctx.fps_controls();
            camera.update_fps(ctx.view, &controls);
        }

        ctx.render(CLEAR, |frame| {
            for x in 0..GRID {
                for y in 0..GRID {
                    for z in 0..GRID {
                        model.put_model_matrix(Mat4::translate(
                            (x - GRID / 2) as f32 * 5.0,
                            (y - GRID / 2) as f32 * 5.0,
                            (z - GRID / 2) as f32 * 3.0,
                        ));
                        frame.draw_model(model);
                    }
                }
            }
        })
    }
}

fn main() -> anyhow::Result<()> {
    init_logging(LoggingConfig::default());

    let config = RuntimeConfig {
        title: "tessera demo".to_string(),
        ..Default::default()
    };

    Runtime::run(config, GpuInit::default(), Demo::from_args())
}
