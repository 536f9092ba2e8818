use crate::draw2d::Color;

/// Shading parameters shared by every mesh that references the material.
///
/// Mutating a material changes all of its meshes on the next frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StandardMaterial {
    /// Base (albedo) color.
    pub color: Color,
    /// 0 = dielectric, 1 = metal.
    pub metalness: f32,
    /// 0 = mirror, 1 = fully diffuse.
    pub roughness: f32,
    /// Alpha used when `transparent` is set.
    pub opacity: f32,
    pub transparent: bool,
    /// Draw triangle edges instead of filled faces.
    pub wireframe: bool,
    /// Strength of the environment reflection.
    pub env_map_intensity: f32,
    /// Whether the scene's environment cube map is sampled.
    pub env_map: bool,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            metalness: 0.8,
            roughness: 0.05,
            opacity: 1.0,
            transparent: false,
            wireframe: false,
            env_map_intensity: 1.0,
            env_map: false,
        }
    }
}

impl StandardMaterial {
    /// Alpha actually used for shading.
    pub fn effective_opacity(&self) -> f32 {
        if self.transparent { self.opacity } else { 1.0 }
    }
}
