use std::fmt;
use std::sync::Arc;

use tessera_obj::ObjMesh;
use wgpu::util::DeviceExt;

use crate::render::RenderCtx;

use super::error::GfxError;
use super::shader::AttributeSet;

/// CPU-side geometry ready for upload.
///
/// `uvs` and `normals`, when present, carry one entry per position.
/// `indices`, when present, index into `positions` in groups of three. No
/// positions at all is a valid, empty mesh that draws nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshData {
    pub positions: Vec<[f32; 3]>,
    pub indices: Option<Vec<u32>>,
    pub normals: Option<Vec<[f32; 3]>>,
    pub uvs: Option<Vec<[f32; 2]>>,
}

impl MeshData {
    /// Checks the invariants `Mesh::create` relies on.
    ///
    /// An empty index list is treated as "no indices".
    pub fn validate(&mut self) -> Result<(), GfxError> {
        let n = self.positions.len();
        check_count("uv", n, self.uvs.as_ref().map(Vec::len))?;
        check_count("normal", n, self.normals.as_ref().map(Vec::len))?;

        if self.indices.as_ref().is_some_and(Vec::is_empty) {
            self.indices = None;
        }

        if let Some(indices) = &self.indices {
            if indices.len() % 3 != 0 {
                return Err(GfxError::IncompleteTriangle(indices.len()));
            }
            if let Some((at, &index)) = indices.iter().enumerate().find(|(_, i)| **i as usize >= n) {
                return Err(GfxError::IndexOutOfRange {
                    at,
                    index,
                    vertex_count: n,
                });
            }
        }

        Ok(())
    }
}

fn check_count(attribute: &'static str, expected: usize, found: Option<usize>) -> Result<(), GfxError> {
    match found {
        Some(found) if found != expected => Err(GfxError::AttributeCountMismatch {
            attribute,
            expected,
            found,
        }),
        _ => Ok(()),
    }
}

impl From<ObjMesh> for MeshData {
    fn from(obj: ObjMesh) -> Self {
        MeshData {
            positions: obj.positions,
            indices: None,
            normals: obj.normals,
            uvs: obj.uvs,
        }
    }
}

/// Immutable GPU geometry. Clones share the buffers; they are released when
/// the last clone drops.
#[derive(Clone)]
pub struct Mesh {
    inner: Arc<MeshBuffers>,
}

struct MeshBuffers {
    positions: Option<wgpu::Buffer>,
    uvs: Option<wgpu::Buffer>,
    normals: Option<wgpu::Buffer>,
    indices: Option<wgpu::Buffer>,
    vertex_count: u32,
    index_count: u32,
}

impl fmt::Debug for Mesh {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mesh")
            .field("vertex_count", &self.inner.vertex_count)
            .field("index_count", &self.inner.index_count)
            .field("attributes", &self.attributes())
            .finish()
    }
}

impl Mesh {
    /// Validates `data` and uploads one vertex buffer per attribute, plus an
    /// index buffer when indices are given.
    pub fn create(ctx: &RenderCtx<'_>, mut data: MeshData) -> Result<Mesh, GfxError> {
        data.validate()?;
        if data.positions.is_empty() {
            log::warn!("mesh created with no vertices; it will not be drawn");
            return Ok(Mesh::empty());
        }

        let device = ctx.device;
        let vertex = |label: &str, bytes: &[u8]| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(label),
                contents: bytes,
                usage: wgpu::BufferUsages::VERTEX,
            })
        };

        let positions = vertex("mesh positions", bytemuck::cast_slice(&data.positions));
        let uvs = data.uvs.as_ref().map(|v| vertex("mesh uvs", bytemuck::cast_slice(v)));
        let normals = data.normals.as_ref().map(|v| vertex("mesh normals", bytemuck::cast_slice(v)));
        let indices = data.indices.as_ref().map(|v| {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mesh indices"),
                contents: bytemuck::cast_slice(v),
                usage: wgpu::BufferUsages::INDEX,
            })
        });

        let vertex_count = data.positions.len() as u32;
        let index_count = data.indices.as_ref().map_or(0, |v| v.len() as u32);

        log::info!(
            "mesh created: {vertex_count} vertices, {index_count} indices, {} normals, {} uvs",
            data.normals.as_ref().map_or(0, Vec::len),
            data.uvs.as_ref().map_or(0, Vec::len),
        );

        Ok(Mesh {
            inner: Arc::new(MeshBuffers {
                positions: Some(positions),
                uvs,
                normals,
                indices,
                vertex_count,
                index_count,
            }),
        })
    }

    /// Mesh with no vertices and no buffers.
    pub fn empty() -> Mesh {
        Mesh {
            inner: Arc::new(MeshBuffers {
                positions: None,
                uvs: None,
                normals: None,
                indices: None,
                vertex_count: 0,
                index_count: 0,
            }),
        }
    }

    /// Parses Wavefront OBJ text and uploads the resulting mesh.
    pub fn from_obj(ctx: &RenderCtx<'_>, bytes: &[u8]) -> Result<Mesh, GfxError> {
        let obj = tessera_obj::parse(bytes)?;
        Mesh::create(ctx, obj.into())
    }

    #[inline]
    pub fn vertex_count(&self) -> u32 {
        self.inner.vertex_count
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.inner.index_count
    }

    #[inline]
    pub fn is_indexed(&self) -> bool {
        self.inner.indices.is_some()
    }

    /// Number of vertices the draw call will process.
    #[inline]
    pub fn draw_count(&self) -> u32 {
        if self.is_indexed() { self.inner.index_count } else { self.inner.vertex_count }
    }

    pub fn attributes(&self) -> AttributeSet {
        AttributeSet {
            uv: self.inner.uvs.is_some(),
            normal: self.inner.normals.is_some(),
        }
    }

    pub(crate) fn position_buffer(&self) -> Option<&wgpu::Buffer> {
        self.inner.positions.as_ref()
    }

    pub(crate) fn uv_buffer(&self) -> Option<&wgpu::Buffer> {
        self.inner.uvs.as_ref()
    }

    pub(crate) fn normal_buffer(&self) -> Option<&wgpu::Buffer> {
        self.inner.normals.as_ref()
    }

    pub(crate) fn index_buffer(&self) -> Option<&wgpu::Buffer> {
        self.inner.indices.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> MeshData {
        MeshData {
            positions: vec![[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [0.0, 1.0, 0.0]],
            ..Default::default()
        }
    }

    #[test]
    fn plain_triangle_is_valid() {
        assert!(triangle().validate().is_ok());
    }

    #[test]
    fn no_positions_is_an_empty_mesh() {
        assert!(MeshData::default().validate().is_ok());
    }

    #[test]
    fn obj_without_faces_validates_empty() {
        for src in ["", "# only a comment\n", "v 0 0 0\nv 1 1 1\n"] {
            let mut data = MeshData::from(tessera_obj::parse_str(src).unwrap());
            assert!(data.positions.is_empty(), "{src:?}");
            assert!(data.validate().is_ok(), "{src:?}");
        }
    }

    #[test]
    fn empty_mesh_draws_nothing() {
        let mesh = Mesh::empty();
        assert_eq!(mesh.draw_count(), 0);
        assert!(!mesh.is_indexed());
        assert!(mesh.position_buffer().is_none());
        assert_eq!(mesh.attributes(), AttributeSet::default());
    }

    #[test]
    fn empty_index_list_on_empty_positions_is_valid() {
        let mut data = MeshData {
            indices: Some(Vec::new()),
            ..Default::default()
        };
        assert!(data.validate().is_ok());
        assert_eq!(data.indices, None);
    }

    #[test]
    fn indices_into_empty_positions_are_rejected() {
        let mut data = MeshData {
            indices: Some(vec![0, 0, 0]),
            ..Default::default()
        };
        assert!(matches!(data.validate(), Err(GfxError::IndexOutOfRange { vertex_count: 0, .. })));
    }

    #[test]
    fn uv_count_must_match() {
        let mut data = triangle();
        data.uvs = Some(vec![[0.0, 0.0]; 2]);
        assert!(matches!(
            data.validate(),
            Err(GfxError::AttributeCountMismatch { attribute: "uv", expected: 3, found: 2 })
        ));
    }

    #[test]
    fn normal_count_must_match() {
        let mut data = triangle();
        data.normals = Some(vec![[0.0, 0.0, 1.0]; 4]);
        assert!(matches!(
            data.validate(),
            Err(GfxError::AttributeCountMismatch { attribute: "normal", found: 4, .. })
        ));
    }

    #[test]
    fn out_of_range_index_is_rejected() {
        let mut data = triangle();
        data.indices = Some(vec![0, 1, 3]);
        assert!(matches!(
            data.validate(),
            Err(GfxError::IndexOutOfRange { at: 2, index: 3, vertex_count: 3 })
        ));
    }

    #[test]
    fn partial_triangle_is_rejected() {
        let mut data = triangle();
        data.indices = Some(vec![0, 1]);
        assert!(matches!(data.validate(), Err(GfxError::IncompleteTriangle(2))));
    }

    #[test]
    fn empty_indices_become_none() {
        let mut data = triangle();
        data.indices = Some(Vec::new());
        data.validate().unwrap();
        assert_eq!(data.indices, None);
    }

    #[test]
    fn obj_mesh_converts_without_indices() {
        let obj = tessera_obj::parse(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nvn 0 0 1\nf 1//1 2//1 3//1\n").unwrap();
        let data = MeshData::from(obj);
        assert_eq!(data.positions.len(), 3);
        assert_eq!(data.indices, None);
        assert_eq!(data.uvs, None);
        assert_eq!(data.normals.as_ref().map(Vec::len), Some(3));
    }
}
