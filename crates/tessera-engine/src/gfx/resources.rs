use std::num::NonZeroU64;

use wgpu::util::DeviceExt;

use super::error::GfxError;
use super::frame::Uniforms;
use super::shader::{PipelineTargets, ShaderProgram, ShaderProgramBuilder, ShaderStage, compile};
use super::texture::{PixelFormat, Texture, to_rgba};

const DEFAULT_SHADER: &str = include_str!("shaders/default.wgsl");

/// 4x1 magenta/black checkerboard: the "no texture assigned" marker.
const DEFAULT_TEXTURE_RGB: [u8; 12] = [
    0xff, 0x00, 0xff, //
    0x00, 0x00, 0x00, //
    0xff, 0x00, 0xff, //
    0x00, 0x00, 0x00,
];

/// Shared GPU objects created once per window and handed out by reference.
///
/// Holds the bind-group layouts every program is linked against, the default
/// shader program and texture that new materials start with, and the zero
/// buffer bound in place of absent vertex attributes.
pub struct Resources {
    uniform_layout: wgpu::BindGroupLayout,
    texture_layout: wgpu::BindGroupLayout,
    pipeline_layout: wgpu::PipelineLayout,

    linear_sampler: wgpu::Sampler,

    zero_attribute: wgpu::Buffer,
    uniform_stride: u64,
    depth_format: wgpu::TextureFormat,

    default_shader: ShaderProgram,
    default_texture: Texture,
}

impl Resources {
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        surface_format: wgpu::TextureFormat,
        depth_format: wgpu::TextureFormat,
    ) -> Result<Resources, GfxError> {
        let uniform_size = std::mem::size_of::<Uniforms>() as u64;

        let uniform_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera uniforms layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: NonZeroU64::new(uniform_size),
                },
                count: None,
            }],
        });

        let texture_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("tessera texture layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("tessera pipeline layout"),
            bind_group_layouts: &[&uniform_layout, &texture_layout],
            immediate_size: 0,
        });

        let linear_sampler = create_sampler(device, "tessera linear sampler", wgpu::FilterMode::Linear);
        let nearest_sampler =
            create_sampler(device, "tessera nearest sampler", wgpu::FilterMode::Nearest);

        // One instance worth of the widest optional attribute (vec3<f32>), rounded up.
        let zero_attribute = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("tessera zero attribute"),
            contents: &[0u8; 16],
            usage: wgpu::BufferUsages::VERTEX,
        });

        let align = u64::from(device.limits().min_uniform_buffer_offset_alignment);
        let uniform_stride = uniform_size.div_ceil(align) * align;

        let rgba = to_rgba(&DEFAULT_TEXTURE_RGB, 4, 1, PixelFormat::Rgb8)?;
        let default_texture = Texture::upload(
            device,
            queue,
            &texture_layout,
            &nearest_sampler,
            &rgba,
            4,
            1,
            "tessera default texture",
        );

        let mut builder = ShaderProgramBuilder::new("tessera default shader");
        for stage in [ShaderStage::Vertex, ShaderStage::Fragment] {
            builder.put_module(stage, compile(device, "tessera default shader", DEFAULT_SHADER, stage)?);
        }
        let default_shader = builder.link(
            device,
            &PipelineTargets {
                layout: &pipeline_layout,
                color_format: surface_format,
                depth_format,
            },
        )?;

        log::info!(
            "render resources ready: color {surface_format:?}, depth {depth_format:?}, uniform stride {uniform_stride}"
        );

        Ok(Resources {
            uniform_layout,
            texture_layout,
            pipeline_layout,
            linear_sampler,
            zero_attribute,
            uniform_stride,
            depth_format,
            default_shader,
            default_texture,
        })
    }

    #[inline]
    pub fn default_shader(&self) -> &ShaderProgram {
        &self.default_shader
    }

    #[inline]
    pub fn default_texture(&self) -> &Texture {
        &self.default_texture
    }

    #[inline]
    pub fn depth_format(&self) -> wgpu::TextureFormat {
        self.depth_format
    }

    pub(crate) fn pipeline_layout(&self) -> &wgpu::PipelineLayout {
        &self.pipeline_layout
    }

    pub(crate) fn uniform_layout(&self) -> &wgpu::BindGroupLayout {
        &self.uniform_layout
    }

    pub(crate) fn texture_layout(&self) -> &wgpu::BindGroupLayout {
        &self.texture_layout
    }

    pub(crate) fn linear_sampler(&self) -> &wgpu::Sampler {
        &self.linear_sampler
    }

    pub(crate) fn zero_attribute_buffer(&self) -> &wgpu::Buffer {
        &self.zero_attribute
    }

    /// Distance in bytes between consecutive per-draw uniform blocks.
    pub(crate) fn uniform_stride(&self) -> u64 {
        self.uniform_stride
    }
}

fn create_sampler(device: &wgpu::Device, label: &str, filter: wgpu::FilterMode) -> wgpu::Sampler {
    device.create_sampler(&wgpu::SamplerDescriptor {
        label: Some(label),
        address_mode_u: wgpu::AddressMode::Repeat,
        address_mode_v: wgpu::AddressMode::Repeat,
        address_mode_w: wgpu::AddressMode::Repeat,
        mag_filter: filter,
        min_filter: filter,
        mipmap_filter: wgpu::MipmapFilterMode::Nearest,
        ..Default::default()
    })
}
