//! One-shot construction of the showcase scene.
//!
//! [`SceneComposer::compose`] runs the whole setup in a fixed order: start
//! the title worker, load images, create the shared material, scatter the
//! primitives, add lights and the camera, wait for the title, and register
//! the debug panel. Missing assets are logged and skipped; composition
//! itself never fails.

use crate::camera::PerspectiveCamera;
use crate::config::ShowcaseConfig;
use crate::draw2d::Color;
use crate::ecs::{AmbientLight, GeometryId, MaterialId, PointLight, Shape};
use crate::geometry::RawGeometry;
use crate::mesh::Transform;
use crate::panel::{DebugPanel, register_bindings};
use crate::scene::{SceneContext, StandardMaterial};
use crate::text::{PendingTitle, TitleLoader};
use crate::texture::{CubeMapData, TextureData};
use glam::Vec3;
use hecs::Entity;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Entities and ids created during composition.
#[derive(Clone, Debug)]
pub struct SceneHandles {
    /// The material shared by every mesh.
    pub material: MaterialId,
    pub ambient_light: Entity,
    pub point_light: Entity,
    pub camera: Entity,
    /// Absent when the title font failed to load.
    pub title: Option<Entity>,
    /// Scattered primitives per shape, in spawn order.
    pub shapes: BTreeMap<Shape, Vec<Entity>>,
}

/// A finished scene with its debug panel.
pub struct Composition {
    pub scene: SceneContext,
    pub panel: DebugPanel,
    pub handles: SceneHandles,
}

/// Random placement for a scattered primitive: each position axis in
/// `[-extent / 2, extent / 2)`, rotation about x and y in `[0, π)`, and a
/// uniform scale in `[0, 1)`.
pub fn random_transform(rng: &mut impl Rng, extent: f32) -> Transform {
    let mut axis = || (rng.gen_range(0.0..1.0) - 0.5) * extent;
    let position = Vec3::new(axis(), axis(), axis());
    let rotation = Vec3::new(
        rng.gen_range(0.0..std::f32::consts::PI),
        rng.gen_range(0.0..std::f32::consts::PI),
        0.0,
    );
    Transform::new()
        .position(position)
        .rotation(rotation)
        .uniform_scale(rng.gen_range(0.0..1.0))
}

fn load_environment(paths: &[PathBuf; 6]) -> Option<CubeMapData> {
    match CubeMapData::load(paths) {
        Ok(cube) => {
            log::debug!("loaded environment map ({}px faces)", cube.size);
            Some(cube)
        }
        Err(e) => {
            log::warn!("environment map unavailable, reflections disabled: {}", e);
            None
        }
    }
}

fn load_textures(paths: &[PathBuf]) -> Vec<TextureData> {
    paths
        .iter()
        .filter_map(|path| match TextureData::load(path) {
            Ok(texture) => {
                log::debug!(
                    "loaded texture {} ({}x{})",
                    path.display(),
                    texture.width,
                    texture.height
                );
                Some(texture)
            }
            Err(e) => {
                log::warn!("skipping texture: {}", e);
                None
            }
        })
        .collect()
}

/// Builds the showcase scene from a [`ShowcaseConfig`].
pub struct SceneComposer {
    config: ShowcaseConfig,
    aspect: f32,
}

impl SceneComposer {
    pub fn new(config: ShowcaseConfig) -> Self {
        let aspect = config.window.width as f32 / config.window.height.max(1) as f32;
        Self { config, aspect }
    }

    /// Initial camera aspect ratio; defaults to the configured window size.
    pub fn aspect(mut self, aspect: f32) -> Self {
        self.aspect = aspect;
        self
    }

    /// Compose the scene, deriving the title from the configured font on a
    /// worker thread while the rest of the scene is built.
    pub fn compose(self) -> Composition {
        let title = TitleLoader::spawn(&self.config.assets.title_font, self.config.title.clone());
        self.compose_with_title(title)
    }

    /// Compose the scene with an already started title derivation.
    pub fn compose_with_title(self, title: PendingTitle) -> Composition {
        let config = &self.config;
        let mut scene = SceneContext::new(Color::from(config.background));

        scene.environment = load_environment(&config.assets.environment_map);
        scene.textures = load_textures(&config.assets.textures);

        let material = scene.add_material(StandardMaterial {
            env_map: scene.environment.is_some(),
            ..Default::default()
        });

        let mut rng = match config.scatter.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut shapes = BTreeMap::new();
        for shape in Shape::SCATTERED {
            let geometry = scene.add_geometry(Self::primitive(shape));
            let entities = (0..config.scatter.counts.get(shape))
                .map(|i| {
                    scene.spawn_mesh(
                        format!("{} {}", shape.label(), i),
                        shape,
                        random_transform(&mut rng, config.scatter.extent),
                        geometry,
                        material,
                    )
                })
                .collect::<Vec<_>>();
            shapes.insert(shape, entities);
        }

        let ambient_light = scene.spawn_ambient_light(
            "ambient light",
            AmbientLight {
                color: Color::WHITE,
                intensity: config.lights.ambient_intensity,
            },
        );
        let point_light = scene.spawn_point_light(
            "point light",
            PointLight {
                intensity: config.lights.point_intensity,
                ..Default::default()
            },
            Vec3::from(config.lights.point_position),
        );

        let camera = scene.spawn_camera(
            "camera",
            PerspectiveCamera::new(
                config.camera.fov_degrees,
                self.aspect,
                config.camera.near,
                config.camera.far,
            )
            .looking_at(Vec3::ZERO),
            Vec3::from(config.camera.position),
        );

        let title = match title.wait() {
            Ok(geometry) => {
                log::debug!("title mesh has {} triangles", geometry.triangle_count());
                let geometry = scene.add_geometry(geometry);
                Some(Self::spawn_title(&mut scene, geometry, material))
            }
            Err(e) => {
                log::warn!("title unavailable: {}", e);
                None
            }
        };

        let handles = SceneHandles {
            material,
            ambient_light,
            point_light,
            camera,
            title,
            shapes,
        };
        let panel = register_bindings(&handles);

        log::info!(
            "composed scene: {} nodes, {} panel controls",
            scene.node_count(),
            panel.control_count()
        );

        Composition {
            scene,
            panel,
            handles,
        }
    }

    fn primitive(shape: Shape) -> RawGeometry {
        match shape {
            Shape::Box => RawGeometry::cuboid(1.0, 1.0, 1.0, 1, 20, 45),
            Shape::Sphere => RawGeometry::sphere(0.5, 32, 16),
            Shape::Tetrahedron => RawGeometry::tetrahedron(0.5),
            Shape::Title => RawGeometry::default(),
        }
    }

    fn spawn_title(scene: &mut SceneContext, geometry: GeometryId, material: MaterialId) -> Entity {
        scene.spawn_mesh("title", Shape::Title, Transform::new(), geometry, material)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ScatterCounts;
    use crate::text::TextError;

    fn seeded() -> ShowcaseConfig {
        ShowcaseConfig::default().seed(42)
    }

    fn compose_with(config: ShowcaseConfig, title: Result<RawGeometry, TextError>) -> Composition {
        SceneComposer::new(config).compose_with_title(PendingTitle::resolved(title))
    }

    #[test]
    fn full_scene_has_54_nodes() {
        let composition = compose_with(seeded(), Ok(RawGeometry::cuboid(3.0, 0.7, 0.6, 1, 1, 1)));
        let scene = &composition.scene;

        assert_eq!(scene.count_shape(Shape::Box), 35);
        assert_eq!(scene.count_shape(Shape::Sphere), 10);
        assert_eq!(scene.count_shape(Shape::Tetrahedron), 5);
        assert_eq!(scene.count_shape(Shape::Title), 1);
        assert_eq!(scene.node_count(), 54);
    }

    #[test]
    fn title_is_the_last_node() {
        let composition = compose_with(seeded(), Ok(RawGeometry::tetrahedron(1.0)));
        let title = composition.handles.title.unwrap();
        let newest = composition
            .scene
            .world
            .iter()
            .map(|e| e.entity().id())
            .max()
            .unwrap();
        assert_eq!(title.id(), newest);
    }

    #[test]
    fn failed_title_leaves_it_absent() {
        let composition = compose_with(
            seeded(),
            Err(TextError::Empty {
                text: String::new(),
            }),
        );
        assert!(composition.handles.title.is_none());
        assert_eq!(composition.scene.node_count(), 53);
    }

    #[test]
    fn primitives_stay_inside_the_volume() {
        let composition = compose_with(seeded(), Err(TextError::WorkerGone));
        let mut checked = 0;
        for (_, (shape, transform)) in composition
            .scene
            .world
            .query::<(&Shape, &Transform)>()
            .iter()
        {
            assert_ne!(*shape, Shape::Title);
            let p = transform.position;
            assert!(p.abs().max_element() <= 5.0, "position {:?}", p);
            for angle in [transform.rotation.x, transform.rotation.y] {
                assert!((0.0..std::f32::consts::PI).contains(&angle));
            }
            assert_eq!(transform.rotation.z, 0.0);
            let s = transform.scale;
            assert!((0.0..1.0).contains(&s.x));
            assert!(s.x == s.y && s.y == s.z);
            checked += 1;
        }
        assert_eq!(checked, 50);
    }

    #[test]
    fn counts_follow_config() {
        let config = seeded().counts(ScatterCounts {
            boxes: 2,
            spheres: 0,
            tetrahedra: 7,
        });
        let composition = compose_with(config, Err(TextError::WorkerGone));
        assert_eq!(composition.handles.shapes[&Shape::Box].len(), 2);
        assert_eq!(composition.handles.shapes[&Shape::Sphere].len(), 0);
        assert_eq!(composition.scene.count_shape(Shape::Tetrahedron), 7);
    }

    #[test]
    fn same_seed_same_layout() {
        let positions = |composition: &Composition| {
            composition.handles.shapes[&Shape::Box]
                .iter()
                .map(|&e| composition.scene.world.get::<&Transform>(e).unwrap().position)
                .collect::<Vec<_>>()
        };
        let a = compose_with(seeded(), Err(TextError::WorkerGone));
        let b = compose_with(seeded(), Err(TextError::WorkerGone));
        assert_eq!(positions(&a), positions(&b));
    }

    #[test]
    fn defaults_match_the_showcase() {
        let composition = compose_with(seeded(), Err(TextError::WorkerGone));
        let scene = &composition.scene;
        let handles = &composition.handles;

        let material = scene.material(handles.material).unwrap();
        assert_eq!(material.metalness, 0.8);
        assert_eq!(material.roughness, 0.05);
        // no environment map ships with the crate
        assert!(!material.env_map);

        let point = *scene.world.get::<&PointLight>(handles.point_light).unwrap();
        assert_eq!(point.intensity, 30.0);
        assert_eq!(point.decay, 2.0);
        assert_eq!(
            scene.world.get::<&Transform>(handles.point_light).unwrap().position,
            Vec3::new(2.0, 3.0, 4.0)
        );
        assert_eq!(
            scene.world.get::<&AmbientLight>(handles.ambient_light).unwrap().intensity,
            0.5
        );

        let (position, camera) = scene.camera().unwrap();
        assert_eq!(position, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(camera.fov_degrees, 75.0);
    }
}
