//! 3D scene rendering with depth testing and metalness/roughness shading.
//!
//! [`MeshPass`] draws every [`RenderMesh`] node of a [`SceneContext`] into
//! the frame, clearing to the scene background first.
//!
//! # Architecture
//!
//! The mesh pass uses three bind groups:
//! - **Group 0**: Frame uniforms (view-projection, camera position, lights)
//! - **Group 1**: Material uniforms, environment cube map and sampler
//! - **Group 2**: Model uniforms, one 256-byte slot per node selected with
//!   a dynamic offset
//!
//! Three pipelines share the shader: opaque (depth write, back-face
//! culling), transparent (alpha blended, no depth write) and wireframe
//! (line list over each mesh's unique edges).
//!
//! Opaque meshes are drawn first, then transparent meshes from farthest to
//! nearest.

use crate::ecs::{AmbientLight, GeometryId, MaterialId, PointLight, RenderMesh};
use crate::gpu::GpuContext;
use crate::mesh::{MeshCache, Transform, Vertex3d};
use crate::scene::{SceneContext, StandardMaterial};
use crate::texture::{CubeMapData, CubeTexture};
use glam::Vec3;

/// Point lights beyond this count are ignored by the shader.
pub const MAX_POINT_LIGHTS: usize = 4;

/// Size of one model uniform slot; matches the minimum uniform buffer
/// offset alignment guaranteed by wgpu's default limits.
const MODEL_SLOT_SIZE: u64 = 256;

#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct PointLightUniform {
    pub position: [f32; 3],
    /// Cut-off distance; 0 = unlimited.
    pub distance: f32,
    /// Color premultiplied by intensity.
    pub color: [f32; 3],
    pub decay: f32,
}

/// Per-frame camera and lighting uniforms.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 3],
    pub point_light_count: u32,
    /// Summed ambient color premultiplied by intensity.
    pub ambient: [f32; 4],
    pub point_lights: [PointLightUniform; MAX_POINT_LIGHTS],
}

impl FrameUniforms {
    /// Gather camera and lights from the scene. Returns `None` if the scene
    /// has no camera.
    pub fn from_scene(scene: &SceneContext) -> Option<Self> {
        let (position, camera) = scene.camera()?;
        let view_proj = camera.projection() * camera.view_matrix(position);

        let mut ambient = Vec3::ZERO;
        for (_, light) in scene.world.query::<&AmbientLight>().iter() {
            ambient += Vec3::from(light.color.to_rgb_array()) * light.intensity;
        }

        let mut point_lights = [PointLightUniform::default(); MAX_POINT_LIGHTS];
        let mut count = 0;
        for (_, (light, transform)) in scene
            .world
            .query::<(&PointLight, &Transform)>()
            .iter()
            .take(MAX_POINT_LIGHTS)
        {
            let color = Vec3::from(light.color.to_rgb_array()) * light.intensity;
            point_lights[count] = PointLightUniform {
                position: transform.position.to_array(),
                distance: light.distance,
                color: color.to_array(),
                decay: light.decay,
            };
            count += 1;
        }

        Some(Self {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: position.to_array(),
            point_light_count: count as u32,
            ambient: ambient.extend(1.0).to_array(),
            point_lights,
        })
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MaterialUniforms {
    /// Base color with the effective opacity in alpha.
    pub color: [f32; 4],
    /// Metalness, roughness, env-map intensity, env-map enabled (0 or 1).
    pub params: [f32; 4],
    /// Average environment color, the reflection of a fully rough surface.
    pub env_average: [f32; 4],
}

impl MaterialUniforms {
    pub fn new(material: &StandardMaterial, env_average: [f32; 3]) -> Self {
        let c = material.color;
        Self {
            color: [c.r, c.g, c.b, material.effective_opacity()],
            params: [
                material.metalness,
                material.roughness,
                material.env_map_intensity,
                if material.env_map { 1.0 } else { 0.0 },
            ],
            env_average: [env_average[0], env_average[1], env_average[2], 1.0],
        }
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ModelUniforms {
    pub model: [[f32; 4]; 4],
    /// Inverse transpose of the model matrix, for normals.
    pub normal_matrix: [[f32; 4]; 4],
}

impl ModelUniforms {
    pub fn new(transform: &Transform) -> Self {
        let model = transform.matrix();
        // Degenerate (zero) scale has no inverse
        let normal_matrix = if model.determinant().abs() > f32::EPSILON {
            model.inverse().transpose()
        } else {
            glam::Mat4::IDENTITY
        };
        Self {
            model: model.to_cols_array_2d(),
            normal_matrix: normal_matrix.to_cols_array_2d(),
        }
    }
}

/// One mesh node prepared for drawing.
#[derive(Clone, Copy, Debug)]
pub struct DrawItem {
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub model: ModelUniforms,
    pub transparent: bool,
    pub wireframe: bool,
    /// Distance from the camera to the node origin.
    pub distance: f32,
}

/// Collect mesh nodes in draw order: opaque first, then transparent from
/// back to front.
pub fn collect_draws(scene: &SceneContext, camera_pos: Vec3) -> Vec<DrawItem> {
    let mut draws: Vec<DrawItem> = scene
        .world
        .query::<(&RenderMesh, &Transform)>()
        .iter()
        .filter_map(|(_, (mesh, transform))| {
            let material = scene.material(mesh.material)?;
            Some(DrawItem {
                geometry: mesh.geometry,
                material: mesh.material,
                model: ModelUniforms::new(transform),
                transparent: material.transparent,
                wireframe: material.wireframe,
                distance: transform.position.distance(camera_pos),
            })
        })
        .collect();

    draws.sort_by(|a, b| {
        a.transparent.cmp(&b.transparent).then_with(|| {
            if a.transparent {
                b.distance.total_cmp(&a.distance)
            } else {
                std::cmp::Ordering::Equal
            }
        })
    });
    draws
}

struct MaterialBinding {
    buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
}

/// Handles 3D mesh rendering with depth testing.
pub struct MeshPass {
    opaque_pipeline: wgpu::RenderPipeline,
    transparent_pipeline: wgpu::RenderPipeline,
    wireframe_pipeline: wgpu::RenderPipeline,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    material_layout: wgpu::BindGroupLayout,
    materials: Vec<MaterialBinding>,
    environment: CubeTexture,
    env_average: [f32; 3],
    model_layout: wgpu::BindGroupLayout,
    model_buffer: wgpu::Buffer,
    model_bind_group: wgpu::BindGroup,
    model_capacity: usize,
    depth_view: wgpu::TextureView,
    depth_size: (u32, u32),
}

impl MeshPass {
    /// Creates the mesh pass, uploading the environment cube map if there
    /// is one. Without it a white placeholder is bound and reflections are
    /// disabled per material.
    pub fn new(gpu: &GpuContext, environment: Option<&CubeMapData>) -> Self {
        let device = &gpu.device;

        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Standard Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("shaders/standard.wgsl").into()),
        });

        // Frame uniforms (group 0)
        let frame_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Frame Uniforms"),
            size: std::mem::size_of::<FrameUniforms>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let frame_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Frame Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });

        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Frame Bind Group"),
            layout: &frame_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        // Material uniforms + environment (group 1)
        let material_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Material Bind Group Layout"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::Cube,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let (environment, env_average) = match environment {
            Some(data) => (CubeTexture::new(gpu, data), data.average_rgb()),
            None => (CubeTexture::placeholder(gpu), [1.0; 3]),
        };

        // Model slots (group 2)
        let model_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Model Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(
                        std::mem::size_of::<ModelUniforms>() as u64,
                    ),
                },
                count: None,
            }],
        });
        let model_capacity = 64;
        let (model_buffer, model_bind_group) =
            Self::create_model_slots(gpu, &model_layout, model_capacity);

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Mesh Pipeline Layout"),
            bind_group_layouts: &[&frame_layout, &material_layout, &model_layout],
            push_constant_ranges: &[],
        });

        let pipeline = |label, topology, blend, depth_write_enabled, cull_mode| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&pipeline_layout),
                vertex: wgpu::VertexState {
                    module: &shader,
                    entry_point: Some("vs"),
                    buffers: &[Vertex3d::LAYOUT],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: &shader,
                    entry_point: Some("fs"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: gpu.config.format,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology,
                    cull_mode,
                    front_face: wgpu::FrontFace::Ccw,
                    ..Default::default()
                },
                depth_stencil: Some(wgpu::DepthStencilState {
                    format: wgpu::TextureFormat::Depth32Float,
                    depth_write_enabled,
                    depth_compare: wgpu::CompareFunction::Less,
                    stencil: wgpu::StencilState::default(),
                    bias: wgpu::DepthBiasState::default(),
                }),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let opaque_pipeline = pipeline(
            "Opaque Mesh Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::REPLACE,
            true,
            Some(wgpu::Face::Back),
        );
        let transparent_pipeline = pipeline(
            "Transparent Mesh Pipeline",
            wgpu::PrimitiveTopology::TriangleList,
            wgpu::BlendState::ALPHA_BLENDING,
            false,
            Some(wgpu::Face::Back),
        );
        let wireframe_pipeline = pipeline(
            "Wireframe Mesh Pipeline",
            wgpu::PrimitiveTopology::LineList,
            wgpu::BlendState::ALPHA_BLENDING,
            true,
            None,
        );

        let depth_view = Self::create_depth_view(gpu);

        Self {
            opaque_pipeline,
            transparent_pipeline,
            wireframe_pipeline,
            frame_buffer,
            frame_bind_group,
            material_layout,
            materials: Vec::new(),
            environment,
            env_average,
            model_layout,
            model_buffer,
            model_bind_group,
            model_capacity,
            depth_view,
            depth_size: (gpu.width(), gpu.height()),
        }
    }

    fn create_model_slots(
        gpu: &GpuContext,
        layout: &wgpu::BindGroupLayout,
        capacity: usize,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Model Uniform Slots"),
            size: MODEL_SLOT_SIZE * capacity as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Model Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ModelUniforms>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_depth_view(gpu: &GpuContext) -> wgpu::TextureView {
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width: gpu.width(),
                height: gpu.height(),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Depth32Float,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Recreate the depth buffer if the surface size changed.
    pub fn ensure_depth_size(&mut self, gpu: &GpuContext) {
        if self.depth_size != (gpu.width(), gpu.height()) {
            self.depth_view = Self::create_depth_view(gpu);
            self.depth_size = (gpu.width(), gpu.height());
        }
    }

    fn ensure_model_capacity(&mut self, gpu: &GpuContext, count: usize) {
        if count <= self.model_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        let (buffer, bind_group) = Self::create_model_slots(gpu, &self.model_layout, capacity);
        self.model_buffer = buffer;
        self.model_bind_group = bind_group;
        self.model_capacity = capacity;
        log::debug!("grew model uniform slots to {}", capacity);
    }

    /// Upload current material values, creating bindings for new materials.
    fn sync_materials(&mut self, gpu: &GpuContext, scene: &SceneContext) {
        let mut index = 0;
        while let Some(material) = scene.material(MaterialId(index)) {
            if index == self.materials.len() {
                let buffer = gpu.device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Material Uniforms"),
                    size: std::mem::size_of::<MaterialUniforms>() as u64,
                    usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                let bind_group = gpu.device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some("Material Bind Group"),
                    layout: &self.material_layout,
                    entries: &[
                        wgpu::BindGroupEntry {
                            binding: 0,
                            resource: buffer.as_entire_binding(),
                        },
                        wgpu::BindGroupEntry {
                            binding: 1,
                            resource: wgpu::BindingResource::TextureView(&self.environment.view),
                        },
                        wgpu::BindGroupEntry {
                            binding: 2,
                            resource: wgpu::BindingResource::Sampler(&self.environment.sampler),
                        },
                    ],
                });
                self.materials.push(MaterialBinding { buffer, bind_group });
            }

            let uniforms = MaterialUniforms::new(material, self.env_average);
            gpu.queue.write_buffer(
                &self.materials[index].buffer,
                0,
                bytemuck::cast_slice(&[uniforms]),
            );
            index += 1;
        }
    }

    /// Render the scene into `target`, clearing it to the scene background.
    pub fn render(
        &mut self,
        gpu: &GpuContext,
        encoder: &mut wgpu::CommandEncoder,
        target: &wgpu::TextureView,
        scene: &SceneContext,
        meshes: &MeshCache,
    ) {
        self.ensure_depth_size(gpu);

        let frame = FrameUniforms::from_scene(scene);
        let draws = match &frame {
            Some(frame) => collect_draws(scene, Vec3::from(frame.camera_pos)),
            None => Vec::new(),
        };

        if let Some(frame) = frame {
            gpu.queue
                .write_buffer(&self.frame_buffer, 0, bytemuck::cast_slice(&[frame]));
        }
        self.sync_materials(gpu, scene);

        self.ensure_model_capacity(gpu, draws.len());
        let mut slots = vec![0u8; draws.len() * MODEL_SLOT_SIZE as usize];
        for (i, draw) in draws.iter().enumerate() {
            let bytes = bytemuck::bytes_of(&draw.model);
            let start = i * MODEL_SLOT_SIZE as usize;
            slots[start..start + bytes.len()].copy_from_slice(bytes);
        }
        if !slots.is_empty() {
            gpu.queue.write_buffer(&self.model_buffer, 0, &slots);
        }

        let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Mesh Render Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(scene.background.to_wgpu()),
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        render_pass.set_bind_group(0, &self.frame_bind_group, &[]);

        for (i, draw) in draws.iter().enumerate() {
            let Some(mesh) = meshes.get(draw.geometry) else {
                continue;
            };
            let Some(material) = self.materials.get(draw.material.0) else {
                continue;
            };

            render_pass.set_bind_group(1, &material.bind_group, &[]);
            render_pass.set_bind_group(
                2,
                &self.model_bind_group,
                &[(i as u64 * MODEL_SLOT_SIZE) as u32],
            );
            render_pass.set_vertex_buffer(0, mesh.vertex_buffer.slice(..));

            if draw.wireframe {
                render_pass.set_pipeline(&self.wireframe_pipeline);
                render_pass.set_index_buffer(mesh.edge_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.edge_count, 0, 0..1);
            } else {
                render_pass.set_pipeline(if draw.transparent {
                    &self.transparent_pipeline
                } else {
                    &self.opaque_pipeline
                });
                render_pass
                    .set_index_buffer(mesh.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
                render_pass.draw_indexed(0..mesh.index_count, 0, 0..1);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::draw2d::Color;
    use crate::ecs::Shape;
    use crate::geometry::RawGeometry;

    #[test]
    fn uniform_sizes_match_shader() {
        assert_eq!(std::mem::size_of::<PointLightUniform>(), 32);
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 224);
        assert_eq!(std::mem::size_of::<MaterialUniforms>(), 48);
        assert!(std::mem::size_of::<ModelUniforms>() as u64 <= MODEL_SLOT_SIZE);
    }

    fn lit_scene() -> SceneContext {
        let mut scene = SceneContext::new(Color::BLACK);
        scene.spawn_ambient_light(
            "ambient",
            AmbientLight {
                color: Color::WHITE,
                intensity: 0.5,
            },
        );
        scene.spawn_point_light(
            "point",
            PointLight {
                intensity: 30.0,
                ..Default::default()
            },
            Vec3::new(2.0, 3.0, 4.0),
        );
        scene.spawn_camera(
            "camera",
            PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0),
            Vec3::new(0.0, 0.0, 10.0),
        );
        scene
    }

    #[test]
    fn frame_uniforms_gather_lights() {
        let frame = FrameUniforms::from_scene(&lit_scene()).unwrap();
        assert_eq!(frame.camera_pos, [0.0, 0.0, 10.0]);
        assert_eq!(frame.ambient, [0.5, 0.5, 0.5, 1.0]);
        assert_eq!(frame.point_light_count, 1);
        assert_eq!(frame.point_lights[0].position, [2.0, 3.0, 4.0]);
        assert_eq!(frame.point_lights[0].color, [30.0, 30.0, 30.0]);
        assert_eq!(frame.point_lights[0].decay, 2.0);
    }

    #[test]
    fn no_camera_no_frame() {
        assert!(FrameUniforms::from_scene(&SceneContext::new(Color::BLACK)).is_none());
    }

    #[test]
    fn opacity_applies_only_when_transparent() {
        let mut material = StandardMaterial {
            opacity: 0.25,
            ..Default::default()
        };
        assert_eq!(MaterialUniforms::new(&material, [1.0; 3]).color[3], 1.0);
        material.transparent = true;
        assert_eq!(MaterialUniforms::new(&material, [1.0; 3]).color[3], 0.25);
    }

    #[test]
    fn zero_scale_has_finite_normal_matrix() {
        let model = ModelUniforms::new(&Transform::new().uniform_scale(0.0));
        assert!(model.normal_matrix.iter().flatten().all(|v| v.is_finite()));
    }

    #[test]
    fn transparent_draws_sorted_back_to_front() {
        let mut scene = lit_scene();
        let geometry = scene.add_geometry(RawGeometry::tetrahedron(0.5));
        let solid = scene.add_material(StandardMaterial::default());
        let glass = scene.add_material(StandardMaterial {
            transparent: true,
            opacity: 0.5,
            ..Default::default()
        });

        let at = |z: f32| Transform::from_position(Vec3::new(0.0, 0.0, z));
        scene.spawn_mesh("near glass", Shape::Sphere, at(8.0), geometry, glass);
        scene.spawn_mesh("solid", Shape::Box, at(0.0), geometry, solid);
        scene.spawn_mesh("far glass", Shape::Sphere, at(-5.0), geometry, glass);

        let draws = collect_draws(&scene, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(draws.len(), 3);
        assert!(!draws[0].transparent);
        assert_eq!(draws[1].distance, 15.0);
        assert_eq!(draws[2].distance, 2.0);
    }
}
