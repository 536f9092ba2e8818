use crate::camera::PerspectiveCamera;
use crate::draw2d::Color;
use crate::ecs::{AmbientLight, GeometryId, MaterialId, Name, PointLight, RenderMesh, Shape};
use crate::geometry::RawGeometry;
use crate::mesh::Transform;
use crate::scene::StandardMaterial;
use crate::texture::{CubeMapData, TextureData};
use glam::Vec3;
use hecs::{Entity, World};

/// The scene state shared by the composer, the frame driver, the
/// navigation controls and the debug panel.
///
/// Nodes live in [`world`](Self::world) as entities. They are spawned once
/// during composition and never despawned, so entity handles stay valid for
/// the lifetime of the context.
pub struct SceneContext {
    pub world: World,
    geometries: Vec<RawGeometry>,
    materials: Vec<StandardMaterial>,
    /// Clear color behind the scene.
    pub background: Color,
    /// Environment cube map sampled for reflections, if it loaded.
    pub environment: Option<CubeMapData>,
    /// Auxiliary textures loaded alongside the scene (not bound to any
    /// material).
    pub textures: Vec<TextureData>,
    camera: Option<Entity>,
}

impl SceneContext {
    pub fn new(background: Color) -> Self {
        Self {
            world: World::new(),
            geometries: Vec::new(),
            materials: Vec::new(),
            background,
            environment: None,
            textures: Vec::new(),
            camera: None,
        }
    }

    /// Add geometry to the library; nodes reference it by the returned id.
    pub fn add_geometry(&mut self, geometry: RawGeometry) -> GeometryId {
        self.geometries.push(geometry);
        GeometryId(self.geometries.len() - 1)
    }

    pub fn geometry(&self, id: GeometryId) -> Option<&RawGeometry> {
        self.geometries.get(id.0)
    }

    /// The whole geometry library, indexed by [`GeometryId`].
    pub fn geometries(&self) -> &[RawGeometry] {
        &self.geometries
    }

    pub fn add_material(&mut self, material: StandardMaterial) -> MaterialId {
        self.materials.push(material);
        MaterialId(self.materials.len() - 1)
    }

    pub fn material(&self, id: MaterialId) -> Option<&StandardMaterial> {
        self.materials.get(id.0)
    }

    pub fn material_mut(&mut self, id: MaterialId) -> Option<&mut StandardMaterial> {
        self.materials.get_mut(id.0)
    }

    /// Spawn a mesh node.
    pub fn spawn_mesh(
        &mut self,
        name: impl Into<String>,
        shape: Shape,
        transform: Transform,
        geometry: GeometryId,
        material: MaterialId,
    ) -> Entity {
        self.world.spawn((
            Name::new(name),
            shape,
            transform,
            RenderMesh::new(geometry, material),
        ))
    }

    pub fn spawn_ambient_light(&mut self, name: impl Into<String>, light: AmbientLight) -> Entity {
        self.world
            .spawn((Name::new(name), Transform::default(), light))
    }

    pub fn spawn_point_light(
        &mut self,
        name: impl Into<String>,
        light: PointLight,
        position: Vec3,
    ) -> Entity {
        self.world
            .spawn((Name::new(name), Transform::from_position(position), light))
    }

    /// Spawn the camera node. A scene has one camera; spawning another
    /// makes the new one active.
    pub fn spawn_camera(
        &mut self,
        name: impl Into<String>,
        camera: PerspectiveCamera,
        position: Vec3,
    ) -> Entity {
        let entity = self
            .world
            .spawn((Name::new(name), Transform::from_position(position), camera));
        self.camera = Some(entity);
        entity
    }

    pub fn camera_entity(&self) -> Option<Entity> {
        self.camera
    }

    /// Position and camera component of the active camera.
    pub fn camera(&self) -> Option<(Vec3, PerspectiveCamera)> {
        let entity = self.camera?;
        let transform = self.world.get::<&Transform>(entity).ok()?;
        let camera = self.world.get::<&PerspectiveCamera>(entity).ok()?;
        Some((transform.position, *camera))
    }

    /// Number of top-level nodes (meshes, lights and camera).
    pub fn node_count(&self) -> usize {
        self.world.len() as usize
    }

    /// Number of mesh nodes tagged with `shape`.
    pub fn count_shape(&self, shape: Shape) -> usize {
        self.world
            .query::<&Shape>()
            .iter()
            .filter(|(_, s)| **s == shape)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_share_geometry_and_material() {
        let mut scene = SceneContext::new(Color::BLACK);
        let geometry = scene.add_geometry(RawGeometry::tetrahedron(0.5));
        let material = scene.add_material(StandardMaterial::default());

        let a = scene.spawn_mesh("a", Shape::Tetrahedron, Transform::new(), geometry, material);
        let b = scene.spawn_mesh("b", Shape::Tetrahedron, Transform::new(), geometry, material);

        let mesh_a = *scene.world.get::<&RenderMesh>(a).unwrap();
        let mesh_b = *scene.world.get::<&RenderMesh>(b).unwrap();
        assert_eq!(mesh_a, mesh_b);
        assert_eq!(scene.geometries().len(), 1);
        assert_eq!(scene.count_shape(Shape::Tetrahedron), 2);
        assert_eq!(scene.count_shape(Shape::Box), 0);
    }

    #[test]
    fn every_spawn_is_a_node() {
        let mut scene = SceneContext::new(Color::BLACK);
        scene.spawn_ambient_light(
            "ambient",
            AmbientLight {
                color: Color::WHITE,
                intensity: 0.5,
            },
        );
        scene.spawn_point_light("point", PointLight::default(), Vec3::new(2.0, 3.0, 4.0));
        let camera = scene.spawn_camera(
            "camera",
            PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0),
            Vec3::new(1.0, 1.0, 2.0),
        );

        assert_eq!(scene.node_count(), 3);
        assert_eq!(scene.camera_entity(), Some(camera));
        let (position, _) = scene.camera().unwrap();
        assert_eq!(position, Vec3::new(1.0, 1.0, 2.0));
    }

    #[test]
    fn material_edits_are_shared() {
        let mut scene = SceneContext::new(Color::BLACK);
        let id = scene.add_material(StandardMaterial::default());
        scene.material_mut(id).unwrap().roughness = 0.7;
        assert_eq!(scene.material(id).unwrap().roughness, 0.7);
    }
}
