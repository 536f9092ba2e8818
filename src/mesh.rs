//! Vertex format, GPU meshes and spatial transforms.
//!
//! - [`Vertex3d`]: position, normal and UV, 32 bytes per vertex
//! - [`Transform`]: position, Euler rotation and scale of a scene node
//! - [`Mesh`]: GPU-resident geometry with a triangle index buffer and an
//!   edge index buffer used for wireframe drawing
//! - [`MeshCache`]: lazily uploads the scene's CPU geometry library
//!
//! # Vertex Layout
//!
//! | Attribute | Format    | Offset | Shader Location |
//! |-----------|-----------|--------|-----------------|
//! | position  | Float32x3 | 0      | 0               |
//! | normal    | Float32x3 | 12     | 1               |
//! | uv        | Float32x2 | 24     | 2               |

use crate::ecs::GeometryId;
use crate::geometry::RawGeometry;
use crate::gpu::GpuContext;
use glam::{EulerRot, Mat4, Quat, Vec3};

/// A vertex with position, normal, and texture coordinates.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex3d {
    /// Position in model space.
    pub position: [f32; 3],
    /// Surface normal (normalized).
    pub normal: [f32; 3],
    /// Texture coordinates, typically in [0, 1].
    pub uv: [f32; 2],
}

impl Vertex3d {
    /// The wgpu vertex buffer layout for this vertex type.
    pub const LAYOUT: wgpu::VertexBufferLayout<'static> = wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<Vertex3d>() as u64,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &[
            // position
            wgpu::VertexAttribute {
                offset: 0,
                shader_location: 0,
                format: wgpu::VertexFormat::Float32x3,
            },
            // normal
            wgpu::VertexAttribute {
                offset: 12,
                shader_location: 1,
                format: wgpu::VertexFormat::Float32x3,
            },
            // uv
            wgpu::VertexAttribute {
                offset: 24,
                shader_location: 2,
                format: wgpu::VertexFormat::Float32x2,
            },
        ],
    };

    pub fn new(position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> Self {
        Self {
            position,
            normal,
            uv,
        }
    }
}

/// Position, rotation and scale of a scene node.
///
/// Rotation is stored as Euler angles in radians, applied in XYZ order, so
/// the frame driver can assign individual axes directly.
///
/// ```
/// use vitrine::{Transform, Vec3};
///
/// let transform = Transform::new()
///     .position(Vec3::new(0.0, 2.0, -5.0))
///     .rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_4, 0.0))
///     .uniform_scale(2.0);
/// assert_eq!(transform.scale, Vec3::splat(2.0));
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    /// World-space position.
    pub position: Vec3,
    /// Euler angles in radians (XYZ order).
    pub rotation: Vec3,
    /// Scale factors per axis.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Default::default()
        }
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn rotation(mut self, rotation: Vec3) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn uniform_scale(mut self, scale: f32) -> Self {
        self.scale = Vec3::splat(scale);
        self
    }

    /// The rotation as a quaternion.
    pub fn quat(&self) -> Quat {
        Quat::from_euler(
            EulerRot::XYZ,
            self.rotation.x,
            self.rotation.y,
            self.rotation.z,
        )
    }

    /// Model matrix applying scale, then rotation, then translation.
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.quat(), self.position)
    }
}

/// GPU-resident mesh geometry.
#[derive(Debug)]
pub struct Mesh {
    pub(crate) vertex_buffer: wgpu::Buffer,
    pub(crate) index_buffer: wgpu::Buffer,
    pub(crate) index_count: u32,
    /// Line-list indices over unique triangle edges.
    pub(crate) edge_buffer: wgpu::Buffer,
    pub(crate) edge_count: u32,
}

impl Mesh {
    /// Upload CPU geometry to GPU buffers.
    pub fn new(gpu: &GpuContext, geometry: &RawGeometry) -> Self {
        use wgpu::util::DeviceExt;

        let create = |label: &str, contents: &[u8], usage: wgpu::BufferUsages| {
            gpu.device
                .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some(label),
                    contents,
                    usage,
                })
        };

        let edges = geometry.edges();

        Self {
            vertex_buffer: create(
                "Mesh Vertex Buffer",
                bytemuck::cast_slice(&geometry.vertices),
                wgpu::BufferUsages::VERTEX,
            ),
            index_buffer: create(
                "Mesh Index Buffer",
                bytemuck::cast_slice(&geometry.indices),
                wgpu::BufferUsages::INDEX,
            ),
            index_count: geometry.indices.len() as u32,
            edge_buffer: create(
                "Mesh Edge Buffer",
                bytemuck::cast_slice(&edges),
                wgpu::BufferUsages::INDEX,
            ),
            edge_count: edges.len() as u32,
        }
    }
}

/// GPU meshes for the scene's geometry library, uploaded on first use.
#[derive(Default)]
pub struct MeshCache {
    meshes: Vec<Option<Mesh>>,
}

impl MeshCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Upload any geometry in `library` that has no GPU mesh yet.
    pub fn sync(&mut self, gpu: &GpuContext, library: &[RawGeometry]) {
        if self.meshes.len() < library.len() {
            self.meshes.resize_with(library.len(), || None);
        }
        for (slot, geometry) in self.meshes.iter_mut().zip(library) {
            if slot.is_none() && !geometry.indices.is_empty() {
                *slot = Some(Mesh::new(gpu, geometry));
            }
        }
    }

    pub fn get(&self, id: GeometryId) -> Option<&Mesh> {
        self.meshes.get(id.0).and_then(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn vertex_is_32_bytes() {
        assert_eq!(std::mem::size_of::<Vertex3d>(), 32);
    }

    #[test]
    fn matrix_applies_scale_before_translation() {
        let transform = Transform::new()
            .position(Vec3::new(1.0, 0.0, 0.0))
            .uniform_scale(2.0);
        let p = transform.matrix().transform_point3(Vec3::new(1.0, 0.0, 0.0));
        assert_relative_eq!(p.x, 3.0);
    }

    #[test]
    fn euler_rotation_about_y() {
        let transform = Transform::new().rotation(Vec3::new(0.0, std::f32::consts::FRAC_PI_2, 0.0));
        let p = transform.matrix().transform_point3(Vec3::X);
        assert_relative_eq!(p.x, 0.0, epsilon = 1e-6);
        assert_relative_eq!(p.z, -1.0, epsilon = 1e-6);
    }
}
