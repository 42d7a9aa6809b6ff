use crate::math::Vec3;

use super::resources::Resources;
use super::shader::ShaderProgram;
use super::texture::Texture;

/// Surface description attached to one or more meshes of a model.
///
/// Colors and scalar terms mirror the usual MTL fields. The default program
/// samples `tex_diffuse` and, when `enable_color` is set, multiplies it by
/// `diffuse` and `opacity`; the other slots are carried for custom programs.
#[derive(Debug, Clone)]
pub struct Material {
    pub shader: ShaderProgram,

    pub ambient: Vec3,
    pub diffuse: Vec3,
    pub specular: Vec3,
    pub transmittance: Vec3,
    pub emission: Vec3,

    pub specular_exponent: f32,
    pub index_of_refraction: f32,
    pub opacity: f32,

    pub enable_color: bool,

    pub tex_diffuse: Texture,
    pub tex_ambient: Option<Texture>,
    pub tex_specular: Option<Texture>,
    pub tex_specular_highlight: Option<Texture>,
    pub tex_bump: Option<Texture>,
    pub tex_displacement: Option<Texture>,
    pub tex_alpha: Option<Texture>,
}

impl Material {
    /// White, opaque, untinted; default program and placeholder texture.
    pub fn default_with(resources: &Resources) -> Material {
        Material {
            shader: resources.default_shader().clone(),
            ambient: Vec3::new(1.0, 1.0, 1.0),
            diffuse: Vec3::new(1.0, 1.0, 1.0),
            specular: Vec3::zero(),
            transmittance: Vec3::zero(),
            emission: Vec3::zero(),
            specular_exponent: 1.0,
            index_of_refraction: 1.0,
            opacity: 1.0,
            enable_color: false,
            tex_diffuse: resources.default_texture().clone(),
            tex_ambient: None,
            tex_specular: None,
            tex_specular_highlight: None,
            tex_bump: None,
            tex_displacement: None,
            tex_alpha: None,
        }
    }

    pub fn set_texture(&mut self, texture: Texture) -> &mut Self {
        self.tex_diffuse = texture;
        self
    }

    pub fn set_shader(&mut self, shader: ShaderProgram) -> &mut Self {
        self.shader = shader;
        self
    }

    /// Enables the diffuse tint with the given color.
    pub fn set_color(&mut self, diffuse: Vec3) -> &mut Self {
        self.diffuse = diffuse;
        self.enable_color = true;
        self
    }

    pub fn set_opacity(&mut self, opacity: f32) -> &mut Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// `(rgb, a)` tint and `x` flag consumed by the default program.
    pub(crate) fn tint_and_flags(&self) -> ([f32; 4], [f32; 4]) {
        tint_and_flags(self.diffuse, self.opacity, self.enable_color)
    }
}

fn tint_and_flags(diffuse: Vec3, opacity: f32, enable_color: bool) -> ([f32; 4], [f32; 4]) {
    let flag = if enable_color { 1.0 } else { 0.0 };
    ([diffuse.x, diffuse.y, diffuse.z, opacity], [flag, 0.0, 0.0, 0.0])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tint_carries_color_and_opacity() {
        let (tint, flags) = tint_and_flags(Vec3::new(0.5, 0.25, 1.0), 0.75, true);
        assert_eq!(tint, [0.5, 0.25, 1.0, 0.75]);
        assert_eq!(flags[0], 1.0);
    }

    #[test]
    fn disabled_color_clears_flag() {
        let (_, flags) = tint_and_flags(Vec3::new(1.0, 0.0, 0.0), 1.0, false);
        assert_eq!(flags, [0.0; 4]);
    }
}
