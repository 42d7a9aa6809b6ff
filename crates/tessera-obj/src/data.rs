use crate::error::ObjError;

/// One face-vertex reference into the attribute pools.
///
/// Indices are 0-based. `None` means the sub-index was absent in the source
/// (`f 1//3` has no UV), which is distinct from a reference to element 0.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct FaceIndex {
    pub vertex: Option<usize>,
    pub uv: Option<usize>,
    pub normal: Option<usize>,
}

/// Raw attribute pools and triangulated face indices, as declared in the file.
///
/// `faces.len()` is always a multiple of 3.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjData {
    pub vertices: Vec<[f32; 3]>,
    pub uvs: Vec<[f32; 2]>,
    pub normals: Vec<[f32; 3]>,
    pub faces: Vec<FaceIndex>,
}

/// Axis-aligned bounds of a vertex pool.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Bounds {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl Bounds {
    /// Returns the extent along each axis.
    #[inline]
    pub fn size(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }
}

/// Face-vertex-expanded geometry, ready for upload.
///
/// Every array has one entry per face-vertex (3 per triangle); shared vertices
/// are duplicated. An attribute array is `None` when the file declared no such
/// attribute at all.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjMesh {
    pub positions: Vec<[f32; 3]>,
    pub uvs: Option<Vec<[f32; 2]>>,
    pub normals: Option<Vec<[f32; 3]>>,
}

impl ObjMesh {
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.positions.len() / 3
    }
}

impl ObjData {
    /// Computes the min/max of the vertex pool per axis.
    ///
    /// Returns `None` for an empty pool.
    pub fn bounds(&self) -> Option<Bounds> {
        let first = *self.vertices.first()?;
        let mut b = Bounds { min: first, max: first };

        for v in &self.vertices[1..] {
            for axis in 0..3 {
                b.min[axis] = b.min[axis].min(v[axis]);
                b.max[axis] = b.max[axis].max(v[axis]);
            }
        }

        Some(b)
    }

    /// Centers the vertex pool on its bounding-box midpoint and divides every
    /// axis by the X extent.
    ///
    /// Y and Z are divided by the X extent too, so the model keeps its aspect
    /// ratio: the result spans exactly 1.0 along X, not a unit cube.
    /// An empty pool is left untouched.
    pub fn normalize(&mut self) -> Result<(), ObjError> {
        let Some(bounds) = self.bounds() else {
            return Ok(());
        };

        let size = bounds.size();
        let x_size = size[0];
        if x_size == 0.0 || !x_size.is_finite() {
            return Err(ObjError::DegenerateExtent {
                x_min: bounds.min[0],
                x_max: bounds.max[0],
            });
        }

        for v in &mut self.vertices {
            for axis in 0..3 {
                v[axis] = (v[axis] - size[axis] / 2.0 - bounds.min[axis]) / x_size;
            }
        }

        Ok(())
    }

    /// Copies pool entries into flat arrays in face-vertex order.
    ///
    /// A face-vertex with no sub-index for an attribute the file does declare
    /// receives zeros for that attribute.
    pub fn expand(&self) -> ObjMesh {
        let n = self.faces.len();

        let mut positions = Vec::with_capacity(n);
        let mut uvs = (!self.uvs.is_empty()).then(|| Vec::with_capacity(n));
        let mut normals = (!self.normals.is_empty()).then(|| Vec::with_capacity(n));

        for f in &self.faces {
            positions.push(lookup(&self.vertices, f.vertex));
            if let Some(out) = uvs.as_mut() {
                out.push(lookup(&self.uvs, f.uv));
            }
            if let Some(out) = normals.as_mut() {
                out.push(lookup(&self.normals, f.normal));
            }
        }

        ObjMesh { positions, uvs, normals }
    }
}

fn lookup<const N: usize>(pool: &[[f32; N]], index: Option<usize>) -> [f32; N] {
    index.and_then(|i| pool.get(i).copied()).unwrap_or([0.0; N])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(vertices: &[[f32; 3]]) -> ObjData {
        ObjData { vertices: vertices.to_vec(), ..ObjData::default() }
    }

    #[test]
    fn bounds_of_empty_pool() {
        assert_eq!(data(&[]).bounds(), None);
    }

    #[test]
    fn bounds_track_each_axis() {
        let b = data(&[[1.0, -2.0, 3.0], [-1.0, 4.0, 0.5]]).bounds().unwrap();
        assert_eq!(b.min, [-1.0, -2.0, 0.5]);
        assert_eq!(b.max, [1.0, 4.0, 3.0]);
        assert_eq!(b.size(), [2.0, 6.0, 2.5]);
    }

    #[test]
    fn normalize_divides_all_axes_by_x_extent() {
        let mut d = data(&[[0.0, 0.0, 0.0], [4.0, 2.0, 8.0]]);
        d.normalize().unwrap();
        assert_eq!(d.vertices[0], [-0.5, -0.25, -1.0]);
        assert_eq!(d.vertices[1], [0.5, 0.25, 1.0]);
    }

    #[test]
    fn normalize_empty_pool_is_noop() {
        let mut d = data(&[]);
        d.normalize().unwrap();
        assert!(d.vertices.is_empty());
    }

    #[test]
    fn normalize_rejects_zero_x_extent() {
        let mut d = data(&[[1.0, 0.0, 0.0], [1.0, 5.0, 2.0]]);
        assert!(matches!(d.normalize(), Err(ObjError::DegenerateExtent { .. })));
    }

    #[test]
    fn expand_fills_missing_subindex_with_zeros() {
        let d = ObjData {
            vertices: vec![[1.0, 2.0, 3.0]],
            uvs: vec![[0.5, 0.5]],
            normals: vec![],
            faces: vec![
                FaceIndex { vertex: Some(0), uv: Some(0), normal: None },
                FaceIndex { vertex: Some(0), uv: None, normal: None },
                FaceIndex { vertex: Some(0), uv: Some(0), normal: None },
            ],
        };
        let m = d.expand();
        assert_eq!(m.positions.len(), 3);
        assert_eq!(m.uvs.unwrap(), vec![[0.5, 0.5], [0.0, 0.0], [0.5, 0.5]]);
        assert!(m.normals.is_none());
    }
}
