use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use wgpu::util::DeviceExt;

use crate::render::{RenderCtx, RenderTarget};

use super::mesh::Mesh;
use super::model::Model;
use super::shader::ShaderProgram;
use super::texture::Texture;
use super::view::ViewState;

/// Per-draw uniform block (group 0, binding 0). Matches `Uniforms` in
/// `shaders/default.wgsl`.
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct Uniforms {
    pub model: [f32; 16],
    pub view: [f32; 16],
    pub projection: [f32; 16],
    pub tint: [f32; 4],
    pub flags: [f32; 4],
}

/// Lays `blocks` out at `stride`-byte intervals for dynamic-offset binding.
pub fn pack_uniforms(blocks: &[Uniforms], stride: u64) -> Vec<u8> {
    let stride = stride as usize;
    let mut out = vec![0u8; blocks.len() * stride];
    for (block, chunk) in blocks.iter().zip(out.chunks_exact_mut(stride)) {
        let bytes = bytemuck::bytes_of(block);
        chunk[..bytes.len()].copy_from_slice(bytes);
    }
    out
}

struct DrawCall {
    mesh: Mesh,
    shader: ShaderProgram,
    texture: Texture,
    uniforms: Uniforms,
}

/// Draws recorded during one frame.
///
/// `draw_model` snapshots the current view state and model matrix; nothing
/// reaches the GPU until [`Frame::finish`].
pub struct Frame<'a> {
    ctx: RenderCtx<'a>,
    view: ViewState,
    calls: Vec<DrawCall>,
}

impl<'a> Frame<'a> {
    pub fn new(ctx: RenderCtx<'a>, view: ViewState) -> Self {
        Self {
            ctx,
            view,
            calls: Vec::new(),
        }
    }

    /// Context for creating meshes, textures, or programs mid-frame.
    #[inline]
    pub fn ctx(&self) -> &RenderCtx<'a> {
        &self.ctx
    }

    #[inline]
    pub fn view_state(&self) -> &ViewState {
        &self.view
    }

    /// Replaces the view and projection used by subsequent draws.
    pub fn set_view_state(&mut self, view: ViewState) {
        self.view = view;
    }

    /// Records every mesh of `model` with its material.
    pub fn draw_model(&mut self, model: &Model) {
        let model_matrix = model.model_matrix();
        for (mesh, material) in model.draw_list() {
            if mesh.draw_count() == 0 {
                log::debug!("skipping empty mesh");
                continue;
            }
            let (tint, flags) = material.tint_and_flags();
            self.calls.push(DrawCall {
                mesh: mesh.clone(),
                shader: material.shader.clone(),
                texture: material.tex_diffuse.clone(),
                uniforms: Uniforms {
                    model: model_matrix.d,
                    view: self.view.view.d,
                    projection: self.view.projection.d,
                    tint,
                    flags,
                },
            });
        }
    }

    /// Number of draws recorded so far.
    #[inline]
    pub fn draw_count(&self) -> usize {
        self.calls.len()
    }

    /// Uploads uniforms and records one pass that clears color and depth and
    /// issues every recorded draw.
    pub fn finish(self, target: &mut RenderTarget<'_>, clear: wgpu::Color) {
        let res = self.ctx.resources;
        let device = self.ctx.device;
        let stride = res.uniform_stride();

        let uniforms = if self.calls.is_empty() {
            None
        } else {
            let blocks: Vec<Uniforms> = self.calls.iter().map(|c| c.uniforms).collect();
            let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("tessera frame uniforms"),
                contents: &pack_uniforms(&blocks, stride),
                usage: wgpu::BufferUsages::UNIFORM,
            });
            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("tessera frame uniforms"),
                layout: res.uniform_layout(),
                entries: &[wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                        buffer: &buffer,
                        offset: 0,
                        size: NonZeroU64::new(std::mem::size_of::<Uniforms>() as u64),
                    }),
                }],
            });
            Some((buffer, bind_group))
        };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("tessera frame pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(clear),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: target.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        let Some((_buffer, uniform_group)) = &uniforms else {
            return;
        };

        let zero = res.zero_attribute_buffer();
        for (i, call) in self.calls.iter().enumerate() {
            let mesh = &call.mesh;
            let Some(positions) = mesh.position_buffer() else {
                continue;
            };
            let offset = (i as u64 * stride) as u32;

            rpass.set_pipeline(call.shader.pipeline(mesh.attributes()));
            rpass.set_bind_group(0, uniform_group, &[offset]);
            rpass.set_bind_group(1, call.texture.bind_group(), &[]);

            rpass.set_vertex_buffer(0, positions.slice(..));
            rpass.set_vertex_buffer(1, mesh.uv_buffer().unwrap_or(zero).slice(..));
            rpass.set_vertex_buffer(2, mesh.normal_buffer().unwrap_or(zero).slice(..));

            match mesh.index_buffer() {
                Some(indices) => {
                    rpass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                    rpass.draw_indexed(0..mesh.index_count(), 0, 0..1);
                }
                None => rpass.draw(0..mesh.vertex_count(), 0..1),
            }
        }
    }
}
