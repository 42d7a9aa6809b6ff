use thiserror::Error;

use super::shader::ShaderStage;
use super::texture::PixelFormat;

/// Errors raised while creating or combining GPU resources.
#[derive(Debug, Error)]
pub enum GfxError {
    #[error("mesh has {found} {attribute} entries for {expected} vertices")]
    AttributeCountMismatch {
        attribute: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("index {index} (at position {at}) is out of range for {vertex_count} vertices")]
    IndexOutOfRange {
        at: usize,
        index: u32,
        vertex_count: usize,
    },

    #[error("index count {0} is not a multiple of 3")]
    IncompleteTriangle(usize),

    #[error("{stage} shader failed to compile: {message}")]
    ShaderCompile { stage: ShaderStage, message: String },

    #[error("shader program failed to link: {0}")]
    Link(String),

    #[error("shader program has no {0} stage")]
    MissingStage(ShaderStage),

    #[error("texture has zero size ({width}x{height})")]
    EmptyTexture { width: u32, height: u32 },

    #[error("{format:?} texture of {width}x{height} needs {expected} bytes, got {actual}")]
    TextureSize {
        format: PixelFormat,
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("failed to decode texture image")]
    TextureDecode(#[from] image::ImageError),

    #[error("model has {meshes} meshes but the material mapping has {mapping} entries")]
    MappingLength { meshes: usize, mapping: usize },

    #[error("mesh {mesh} maps to material {material}, but the model has {count} materials")]
    MaterialOutOfRange {
        mesh: usize,
        material: usize,
        count: usize,
    },

    #[error(transparent)]
    Obj(#[from] tessera_obj::ObjError),
}
