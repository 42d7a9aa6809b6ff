use std::fmt;
use std::sync::Arc;

use crate::render::RenderCtx;

use super::error::GfxError;

/// Entry point every vertex stage must export.
pub const VERTEX_ENTRY: &str = "vs_main";
/// Entry point every fragment stage must export.
pub const FRAGMENT_ENTRY: &str = "fs_main";

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ShaderStage::Vertex => "vertex",
            ShaderStage::Fragment => "fragment",
        })
    }
}

// ── attribute sets ────────────────────────────────────────────────────────

/// Which optional vertex attributes a mesh provides.
///
/// Position is always present. A missing attribute is fed from a constant
/// zero buffer stepped per instance, so the shader reads `0` for it.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub struct AttributeSet {
    pub uv: bool,
    pub normal: bool,
}

impl AttributeSet {
    pub const ALL: [AttributeSet; 4] = [
        AttributeSet { uv: false, normal: false },
        AttributeSet { uv: true, normal: false },
        AttributeSet { uv: false, normal: true },
        AttributeSet { uv: true, normal: true },
    ];

    /// Position of `self` in [`AttributeSet::ALL`].
    #[inline]
    pub fn index(self) -> usize {
        self.uv as usize | (self.normal as usize) << 1
    }
}

const POSITION_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
const UV_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![1 => Float32x2];
const NORMAL_ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![2 => Float32x3];

/// Buffer slots: 0 = position, 1 = uv, 2 = normal.
pub(crate) fn vertex_layouts(set: AttributeSet) -> [wgpu::VertexBufferLayout<'static>; 3] {
    let step = |present: bool| {
        if present {
            wgpu::VertexStepMode::Vertex
        } else {
            wgpu::VertexStepMode::Instance
        }
    };

    [
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &POSITION_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 2]>() as u64,
            step_mode: step(set.uv),
            attributes: &UV_ATTRS,
        },
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<[f32; 3]>() as u64,
            step_mode: step(set.normal),
            attributes: &NORMAL_ATTRS,
        },
    ]
}

// ── program ───────────────────────────────────────────────────────────────

/// A linked vertex + fragment program: one render pipeline per [`AttributeSet`].
///
/// Cheap to clone; clones share the pipelines.
#[derive(Clone)]
pub struct ShaderProgram {
    inner: Arc<ProgramInner>,
}

struct ProgramInner {
    label: String,
    pipelines: Vec<wgpu::RenderPipeline>,
}

impl ShaderProgram {
    pub fn label(&self) -> &str {
        &self.inner.label
    }

    pub(crate) fn pipeline(&self, set: AttributeSet) -> &wgpu::RenderPipeline {
        &self.inner.pipelines[set.index()]
    }
}

impl fmt::Debug for ShaderProgram {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShaderProgram").field("label", &self.inner.label).finish()
    }
}

/// Pipeline state shared by every program on a surface.
pub(crate) struct PipelineTargets<'a> {
    pub layout: &'a wgpu::PipelineLayout,
    pub color_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

/// Compiles WGSL stages and links them into a [`ShaderProgram`].
///
/// Stages follow a fixed convention: the vertex stage exports `vs_main`, the
/// fragment stage `fs_main`; bindings and attribute locations are those of
/// `shaders/default.wgsl`.
pub struct ShaderProgramBuilder {
    label: String,
    vertex: Option<wgpu::ShaderModule>,
    fragment: Option<wgpu::ShaderModule>,
}

impl ShaderProgramBuilder {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            vertex: None,
            fragment: None,
        }
    }

    /// Compiles `source` for `stage`. A second source for the same stage
    /// replaces the first.
    pub fn add_shader(
        &mut self,
        ctx: &RenderCtx<'_>,
        source: &str,
        stage: ShaderStage,
    ) -> Result<&mut Self, GfxError> {
        let module = compile(ctx.device, &self.label, source, stage)?;
        self.put_module(stage, module);
        Ok(self)
    }

    /// Links the vertex and fragment stages for every attribute layout.
    pub fn build(self, ctx: &RenderCtx<'_>) -> Result<ShaderProgram, GfxError> {
        let res = ctx.resources;
        self.link(
            ctx.device,
            &PipelineTargets {
                layout: res.pipeline_layout(),
                color_format: ctx.surface_format,
                depth_format: res.depth_format(),
            },
        )
    }

    pub(crate) fn put_module(&mut self, stage: ShaderStage, module: wgpu::ShaderModule) {
        let slot = match stage {
            ShaderStage::Vertex => &mut self.vertex,
            ShaderStage::Fragment => &mut self.fragment,
        };
        if slot.replace(module).is_some() {
            log::warn!("shader program {:?}: {stage} stage replaced", self.label);
        }
    }

    pub(crate) fn link(
        self,
        device: &wgpu::Device,
        targets: &PipelineTargets<'_>,
    ) -> Result<ShaderProgram, GfxError> {
        let vertex = self.vertex.ok_or(GfxError::MissingStage(ShaderStage::Vertex))?;
        let fragment = self.fragment.ok_or(GfxError::MissingStage(ShaderStage::Fragment))?;

        let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

        let pipelines: Vec<wgpu::RenderPipeline> = AttributeSet::ALL
            .iter()
            .map(|set| create_pipeline(device, &self.label, &vertex, &fragment, *set, targets))
            .collect();

        if let Some(err) = pollster::block_on(scope.pop()) {
            return Err(GfxError::Link(err.to_string()));
        }

        log::debug!("shader program {:?} linked", self.label);

        Ok(ShaderProgram {
            inner: Arc::new(ProgramInner {
                label: self.label,
                pipelines,
            }),
        })
    }
}

/// Compiles one WGSL stage, returning validation errors instead of raising
/// them on the device.
pub(crate) fn compile(
    device: &wgpu::Device,
    label: &str,
    source: &str,
    stage: ShaderStage,
) -> Result<wgpu::ShaderModule, GfxError> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(&format!("{label} ({stage})")),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });

    match pollster::block_on(scope.pop()) {
        Some(err) => Err(GfxError::ShaderCompile {
            stage,
            message: err.to_string(),
        }),
        None => Ok(module),
    }
}

fn create_pipeline(
    device: &wgpu::Device,
    label: &str,
    vertex: &wgpu::ShaderModule,
    fragment: &wgpu::ShaderModule,
    set: AttributeSet,
    targets: &PipelineTargets<'_>,
) -> wgpu::RenderPipeline {
    let buffers = vertex_layouts(set);

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(&format!("{label} pipeline (uv: {}, normal: {})", set.uv, set.normal)),
        layout: Some(targets.layout),
        vertex: wgpu::VertexState {
            module: vertex,
            entry_point: Some(VERTEX_ENTRY),
            compilation_options: Default::default(),
            buffers: &buffers,
        },
        fragment: Some(wgpu::FragmentState {
            module: fragment,
            entry_point: Some(FRAGMENT_ENTRY),
            compilation_options: Default::default(),
            targets: &[Some(wgpu::ColorTargetState {
                format: targets.color_format,
                blend: Some(wgpu::BlendState::ALPHA_BLENDING),
                write_mask: wgpu::ColorWrites::ALL,
            })],
        }),
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: None,
            polygon_mode: wgpu::PolygonMode::Fill,
            unclipped_depth: false,
            conservative: false,
        },
        depth_stencil: Some(wgpu::DepthStencilState {
            format: targets.depth_format,
            depth_write_enabled: true,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }),
        multisample: wgpu::MultisampleState::default(),
        multiview_mask: None,
        cache: None,
    })
}
