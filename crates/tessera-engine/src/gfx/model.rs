use crate::math::Mat4;
use crate::render::RenderCtx;

use super::error::GfxError;
use super::material::Material;
use super::mesh::Mesh;
use super::resources::Resources;
use super::shader::ShaderProgram;
use super::texture::Texture;

/// Meshes, the materials they are drawn with, and a model matrix.
///
/// `mesh_to_material[i]` is the index into `materials` used for `meshes[i]`.
#[derive(Debug, Clone)]
pub struct Model {
    meshes: Vec<Mesh>,
    materials: Vec<Material>,
    mesh_to_material: Vec<usize>,
    model_matrix: Mat4,
}

impl Model {
    /// Single-mesh model with the default material and an identity matrix.
    pub fn create(mesh: Mesh, resources: &Resources) -> Model {
        Model {
            meshes: vec![mesh],
            materials: vec![Material::default_with(resources)],
            mesh_to_material: vec![0],
            model_matrix: Mat4::identity(),
        }
    }

    pub fn with_materials(
        meshes: Vec<Mesh>,
        materials: Vec<Material>,
        mesh_to_material: Vec<usize>,
    ) -> Result<Model, GfxError> {
        validate_mapping(meshes.len(), materials.len(), &mesh_to_material)?;
        Ok(Model {
            meshes,
            materials,
            mesh_to_material,
            model_matrix: Mat4::identity(),
        })
    }

    /// Parses OBJ text into a single-mesh model with the default material.
    pub fn from_obj(ctx: &RenderCtx<'_>, bytes: &[u8]) -> Result<Model, GfxError> {
        let mesh = Mesh::from_obj(ctx, bytes)?;
        Ok(Model::create(mesh, ctx.resources))
    }

    pub fn put_model_matrix(&mut self, m: Mat4) -> &mut Self {
        self.model_matrix = m;
        self
    }

    /// Sets the diffuse texture of every material.
    pub fn put_texture(&mut self, texture: &Texture) -> &mut Self {
        for material in &mut self.materials {
            material.set_texture(texture.clone());
        }
        self
    }

    /// Sets the program of every material.
    pub fn put_shader_program(&mut self, shader: &ShaderProgram) -> &mut Self {
        for material in &mut self.materials {
            material.set_shader(shader.clone());
        }
        self
    }

    #[inline]
    pub fn model_matrix(&self) -> Mat4 {
        self.model_matrix
    }

    pub fn meshes(&self) -> &[Mesh] {
        &self.meshes
    }

    pub fn materials(&self) -> &[Material] {
        &self.materials
    }

    pub fn materials_mut(&mut self) -> &mut [Material] {
        &mut self.materials
    }

    /// Material used for `meshes()[mesh]`.
    pub fn material_for(&self, mesh: usize) -> Option<&Material> {
        self.mesh_to_material
            .get(mesh)
            .and_then(|&m| self.materials.get(m))
    }

    /// `(mesh, material)` pairs in draw order.
    pub fn draw_list(&self) -> impl Iterator<Item = (&Mesh, &Material)> {
        self.meshes
            .iter()
            .zip(&self.mesh_to_material)
            .filter_map(|(mesh, &m)| self.materials.get(m).map(|mat| (mesh, mat)))
    }
}

fn validate_mapping(meshes: usize, materials: usize, mapping: &[usize]) -> Result<(), GfxError> {
    if mapping.len() != meshes {
        return Err(GfxError::MappingLength {
            meshes,
            mapping: mapping.len(),
        });
    }
    match mapping.iter().enumerate().find(|(_, m)| **m >= materials) {
        Some((mesh, &material)) => Err(GfxError::MaterialOutOfRange {
            mesh,
            material,
            count: materials,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mapping_accepts_shared_materials() {
        assert!(validate_mapping(3, 2, &[0, 1, 0]).is_ok());
    }

    #[test]
    fn mapping_length_must_match_meshes() {
        assert!(matches!(
            validate_mapping(2, 1, &[0]),
            Err(GfxError::MappingLength { meshes: 2, mapping: 1 })
        ));
    }

    #[test]
    fn mapping_rejects_unknown_material() {
        assert!(matches!(
            validate_mapping(2, 1, &[0, 1]),
            Err(GfxError::MaterialOutOfRange { mesh: 1, material: 1, count: 1 })
        ));
    }

    #[test]
    fn empty_model_is_valid() {
        assert!(validate_mapping(0, 0, &[]).is_ok());
    }
}
