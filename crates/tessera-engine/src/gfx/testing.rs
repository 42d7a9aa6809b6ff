//! Headless device for tests that need real GPU objects.
//!
//! Returns `None` when no adapter is available so those tests pass trivially
//! on machines without a GPU or software rasterizer.

use crate::render::{RenderCtx, Viewport};

use super::resources::Resources;

pub(crate) const COLOR_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
pub(crate) const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

pub(crate) struct Headless {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub resources: Resources,
}

impl Headless {
    pub fn new() -> Option<Headless> {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = pollster::block_on(instance.request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::LowPower,
            compatible_surface: None,
            force_fallback_adapter: false,
        }))
        .ok()?;

        let (device, queue) = pollster::block_on(adapter.request_device(&wgpu::DeviceDescriptor {
            label: Some("tessera test device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::downlevel_defaults(),
            experimental_features: wgpu::ExperimentalFeatures::disabled(),
            memory_hints: wgpu::MemoryHints::Performance,
            trace: wgpu::Trace::Off,
        }))
        .ok()?;

        let resources = Resources::new(&device, &queue, COLOR_FORMAT, DEPTH_FORMAT)
            .expect("default resources build on a working device");
        Some(Headless { device, queue, resources })
    }

    pub fn ctx(&self) -> RenderCtx<'_> {
        RenderCtx::new(
            &self.device,
            &self.queue,
            COLOR_FORMAT,
            Viewport::new(64.0, 64.0),
            &self.resources,
        )
    }
}
