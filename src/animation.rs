//! Per-frame rotation of the scattered primitives.

use crate::ecs::Shape;
use crate::mesh::Transform;
use crate::scene::SceneContext;

/// Angular speed in radians per second on each axis; `None` leaves that
/// axis alone.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RotationRule {
    pub x: Option<f32>,
    pub y: Option<f32>,
    pub z: Option<f32>,
}

impl RotationRule {
    const STILL: RotationRule = RotationRule {
        x: None,
        y: None,
        z: None,
    };

    /// Assign `coefficient * elapsed` on every axis the rule names.
    pub fn apply(&self, transform: &mut Transform, elapsed: f32) {
        if let Some(speed) = self.x {
            transform.rotation.x = speed * elapsed;
        }
        if let Some(speed) = self.y {
            transform.rotation.y = speed * elapsed;
        }
        if let Some(speed) = self.z {
            transform.rotation.z = speed * elapsed;
        }
    }
}

pub fn rotation_rule(shape: Shape) -> RotationRule {
    match shape {
        Shape::Box => RotationRule {
            x: Some(0.15),
            y: Some(0.10),
            z: None,
        },
        Shape::Sphere => RotationRule {
            y: Some(0.10),
            ..RotationRule::STILL
        },
        Shape::Tetrahedron => RotationRule {
            x: Some(0.15),
            z: Some(0.10),
            ..RotationRule::STILL
        },
        Shape::Title => RotationRule::STILL,
    }
}

/// Set every tagged node's rotation from `elapsed` seconds. The result
/// depends only on `elapsed`, never on previous frames.
pub fn animate(scene: &mut SceneContext, elapsed: f32) {
    for (_, (shape, transform)) in scene.world.query_mut::<(&Shape, &mut Transform)>() {
        rotation_rule(*shape).apply(transform, elapsed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw2d::Color;
    use crate::geometry::RawGeometry;
    use crate::scene::StandardMaterial;
    use approx::assert_relative_eq;
    use glam::Vec3;

    fn scene() -> (SceneContext, [hecs::Entity; 4]) {
        let mut scene = SceneContext::new(Color::BLACK);
        let geometry = scene.add_geometry(RawGeometry::tetrahedron(0.5));
        let material = scene.add_material(StandardMaterial::default());
        let start = Transform::new().rotation(Vec3::new(1.0, 2.0, 3.0));
        let entities = [Shape::Box, Shape::Sphere, Shape::Tetrahedron, Shape::Title]
            .map(|shape| scene.spawn_mesh(shape.label(), shape, start, geometry, material));
        (scene, entities)
    }

    fn rotation(scene: &SceneContext, entity: hecs::Entity) -> Vec3 {
        scene.world.get::<&Transform>(entity).unwrap().rotation
    }

    #[test]
    fn rules_assign_named_axes_only() {
        let (mut scene, [cube, sphere, tetra, title]) = scene();
        animate(&mut scene, 10.0);

        let r = rotation(&scene, cube);
        assert_relative_eq!(r.x, 1.5, epsilon = 1e-6);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(r.z, 3.0, epsilon = 1e-6);

        let r = rotation(&scene, sphere);
        assert_relative_eq!(r.x, 1.0, epsilon = 1e-6);
        assert_relative_eq!(r.y, 1.0, epsilon = 1e-6);
        assert_relative_eq!(r.z, 3.0, epsilon = 1e-6);

        let r = rotation(&scene, tetra);
        assert_relative_eq!(r.x, 1.5, epsilon = 1e-6);
        assert_relative_eq!(r.y, 2.0, epsilon = 1e-6);
        assert_relative_eq!(r.z, 1.0, epsilon = 1e-6);

        assert_eq!(rotation(&scene, title), Vec3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn rotation_depends_only_on_elapsed() {
        let (mut once, entities) = scene();
        animate(&mut once, 4.0);

        let (mut stepped, _) = scene();
        for t in [0.5, 1.0, 7.0, 2.0, 4.0] {
            animate(&mut stepped, t);
        }

        for entity in entities {
            assert_eq!(rotation(&once, entity), rotation(&stepped, entity));
        }
    }
}
