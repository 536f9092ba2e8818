use glam::{Vec2, Vec3};
use winit::event::MouseButton;

use crate::camera::PerspectiveCamera;
use crate::input::Input;
use crate::mesh::Transform;
use crate::scene::SceneContext;

/// Keeps the polar angle off the poles, where the view direction would be
/// parallel to the up vector.
const POLAR_EPSILON: f32 = 1e-6;

/// Reference frame rate for `damping_factor`.
const DAMPING_RATE: f32 = 60.0;

/// A camera controller that orbits the scene camera around its target.
///
/// Left-drag rotates, the scroll wheel zooms. Each [`update`](Self::update)
/// starts from the camera's current position, so edits made elsewhere
/// (the debug panel) are kept. With damping enabled, input is applied
/// gradually and motion eases out after the pointer stops.
///
/// # Example
/// ```ignore
/// let mut controls = OrbitControls::new().damping(true);
///
/// // In frame loop:
/// controls.update(&mut scene, &input, dt);
/// ```
#[derive(Clone, Debug)]
pub struct OrbitControls {
    pub enable_damping: bool,
    /// Fraction of the pending motion applied per frame at 60 Hz.
    pub damping_factor: f32,
    /// Radians per pixel of drag.
    pub rotate_speed: f32,
    /// World units per scroll line.
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    /// Pending (azimuth, polar) rotation in radians.
    pending_rotation: Vec2,
    pending_zoom: f32,
    dragging: bool,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            enable_damping: false,
            damping_factor: 0.05,
            rotate_speed: 0.005,
            zoom_speed: 0.5,
            min_distance: 0.0,
            max_distance: 100.0,
            pending_rotation: Vec2::ZERO,
            pending_zoom: 0.0,
            dragging: false,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn damping(mut self, enabled: bool) -> Self {
        self.enable_damping = enabled;
        self
    }

    pub fn damping_factor(mut self, factor: f32) -> Self {
        self.damping_factor = factor.clamp(0.0, 1.0);
        self
    }

    /// Set distance limits. They bound zooming only; a camera placed
    /// outside them by other code stays where it is until zoomed.
    pub fn distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min;
        self.max_distance = max;
        self
    }

    /// Queue a rotation: `azimuth` around the up axis, `polar` away from it.
    pub fn rotate(&mut self, azimuth: f32, polar: f32) {
        self.pending_rotation += Vec2::new(azimuth, polar);
    }

    /// Queue a change of distance to the target.
    pub fn zoom(&mut self, distance: f32) {
        self.pending_zoom += distance;
    }

    /// Whether a rotate drag that started off the panel is in progress.
    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    fn accumulate(&mut self, input: &Input) {
        if input.mouse_pressed(MouseButton::Left) && !input.pointer_captured() {
            self.dragging = true;
        }
        if !input.mouse_down(MouseButton::Left) {
            self.dragging = false;
        }

        if self.dragging {
            let delta = input.mouse_delta();
            self.rotate(-delta.x * self.rotate_speed, -delta.y * self.rotate_speed);
        }

        let scroll = input.scroll_delta();
        if scroll.y != 0.0 && !input.pointer_captured() {
            self.zoom(-scroll.y * self.zoom_speed);
        }
    }

    /// Read input, then move the scene camera by this frame's share of the
    /// pending motion.
    pub fn update(&mut self, scene: &mut SceneContext, input: &Input, dt: f32) {
        self.accumulate(input);

        let Some(entity) = scene.camera_entity() else {
            return;
        };
        let Ok((transform, camera)) = scene
            .world
            .query_one_mut::<(&mut Transform, &PerspectiveCamera)>(entity)
        else {
            return;
        };

        let target = camera.target;
        let offset = transform.position - target;
        let radius = offset.length();
        let (mut azimuth, mut polar, mut radius) = if radius > 1e-6 {
            (
                offset.x.atan2(offset.z),
                (offset.y / radius).clamp(-1.0, 1.0).acos(),
                radius,
            )
        } else {
            (0.0, std::f32::consts::FRAC_PI_2, 0.0)
        };

        let share = if self.enable_damping {
            // Scale to frame time so easing does not depend on refresh rate
            1.0 - (1.0 - self.damping_factor).powf((dt * DAMPING_RATE).max(0.0))
        } else {
            1.0
        };

        azimuth += self.pending_rotation.x * share;
        polar += self.pending_rotation.y * share;
        let zoom = self.pending_zoom * share;
        if zoom != 0.0 {
            // Zooming never crosses a limit, but never snaps a camera that
            // already sits beyond one
            let floor = self.min_distance.min(radius);
            let ceiling = self.max_distance.max(radius);
            radius = (radius + zoom).clamp(floor, ceiling);
        }
        self.pending_rotation *= 1.0 - share;
        self.pending_zoom *= 1.0 - share;

        let polar = polar.clamp(POLAR_EPSILON, std::f32::consts::PI - POLAR_EPSILON);

        transform.position = target
            + radius
                * Vec3::new(
                    polar.sin() * azimuth.sin(),
                    polar.cos(),
                    polar.sin() * azimuth.cos(),
                );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::SceneComposer;
    use crate::config::ShowcaseConfig;
    use crate::draw2d::Color;
    use crate::panel::{CAMERA_RANGE, ControlValue};
    use crate::text::{PendingTitle, TextError};
    use approx::assert_relative_eq;

    const FRAME: f32 = 1.0 / 60.0;

    fn scene_at(position: Vec3) -> SceneContext {
        let mut scene = SceneContext::new(Color::BLACK);
        scene.spawn_camera("camera", PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0), position);
        scene
    }

    fn camera_position(scene: &SceneContext) -> Vec3 {
        scene.camera().unwrap().0
    }

    #[test]
    fn idle_update_keeps_position() {
        let start = Vec3::new(1.0, 1.0, 2.0);
        let mut scene = scene_at(start);
        let mut controls = OrbitControls::new().damping(true);
        controls.update(&mut scene, &Input::new(), FRAME);

        let p = camera_position(&scene);
        assert_relative_eq!(p.x, start.x, epsilon = 1e-5);
        assert_relative_eq!(p.y, start.y, epsilon = 1e-5);
        assert_relative_eq!(p.z, start.z, epsilon = 1e-5);
    }

    #[test]
    fn damping_eases_toward_full_rotation() {
        let mut scene = scene_at(Vec3::new(0.0, 0.0, 3.0));
        let mut controls = OrbitControls::new().damping(true);
        controls.rotate(1.0, 0.0);

        controls.update(&mut scene, &Input::new(), FRAME);
        let p = camera_position(&scene);
        assert_relative_eq!(p.x.atan2(p.z), 0.05, epsilon = 1e-4);

        for _ in 0..600 {
            controls.update(&mut scene, &Input::new(), FRAME);
        }
        let p = camera_position(&scene);
        assert_relative_eq!(p.x.atan2(p.z), 1.0, epsilon = 1e-3);
        assert_relative_eq!(p.length(), 3.0, epsilon = 1e-4);
    }

    #[test]
    fn without_damping_motion_is_immediate() {
        let mut scene = scene_at(Vec3::new(0.0, 0.0, 3.0));
        let mut controls = OrbitControls::new();
        controls.zoom(-1.0);
        controls.update(&mut scene, &Input::new(), FRAME);
        assert_relative_eq!(camera_position(&scene).length(), 2.0, epsilon = 1e-5);
    }

    #[test]
    fn zoom_stops_at_distance_limits() {
        let mut scene = scene_at(Vec3::new(0.0, 0.0, 3.0));
        let mut controls = OrbitControls::new().distance_limits(1.0, 4.0);

        controls.zoom(5.0);
        controls.update(&mut scene, &Input::new(), FRAME);
        assert_relative_eq!(camera_position(&scene).length(), 4.0, epsilon = 1e-5);

        controls.zoom(-10.0);
        controls.update(&mut scene, &Input::new(), FRAME);
        assert_relative_eq!(camera_position(&scene).length(), 1.0, epsilon = 1e-5);
    }

    #[test]
    fn zoom_does_not_snap_camera_beyond_limit() {
        let mut scene = scene_at(Vec3::new(0.0, 0.0, 6.0));
        let mut controls = OrbitControls::new().distance_limits(1.0, 4.0);

        controls.zoom(1.0);
        controls.update(&mut scene, &Input::new(), FRAME);
        assert_relative_eq!(camera_position(&scene).length(), 6.0, epsilon = 1e-5);

        controls.zoom(-0.5);
        controls.update(&mut scene, &Input::new(), FRAME);
        assert_relative_eq!(camera_position(&scene).length(), 5.5, epsilon = 1e-5);
    }

    #[test]
    fn pole_position_stays_finite() {
        let mut scene = scene_at(Vec3::new(0.0, 0.0, 5.0));
        let mut controls = OrbitControls::new();
        controls.rotate(0.0, -10.0);
        controls.update(&mut scene, &Input::new(), FRAME);

        let p = camera_position(&scene);
        assert!(p.is_finite());
        assert_relative_eq!(p.length(), 5.0, epsilon = 1e-4);
        assert_relative_eq!(p.y, 5.0, epsilon = 1e-4);
    }

    #[test]
    fn panel_camera_edits_survive_idle_update() {
        let mut c = SceneComposer::new(ShowcaseConfig::default().seed(3))
            .compose_with_title(PendingTitle::resolved(Err(TextError::WorkerGone)));
        let mut controls = OrbitControls::new()
            .damping(true)
            .distance_limits(0.0, CAMERA_RANGE);

        for target in [
            Vec3::new(0.1, 0.1, 0.1),
            Vec3::new(0.0, 3.0, 0.0),
            Vec3::new(-10.0, 10.0, -10.0),
        ] {
            for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
                c.panel
                    .set(&mut c.scene, "Camera Position", name, ControlValue::Number(target[axis]))
                    .unwrap();
            }
            controls.update(&mut c.scene, &Input::new(), FRAME);

            let p = camera_position(&c.scene);
            assert_relative_eq!(p.x, target.x, epsilon = 1e-4);
            assert_relative_eq!(p.y, target.y, epsilon = 1e-4);
            assert_relative_eq!(p.z, target.z, epsilon = 1e-4);
        }
    }

    #[test]
    fn zoomed_out_camera_stays_inside_panel_range() {
        let mut scene = scene_at(Vec3::new(0.0, 0.0, 9.0));
        let mut controls = OrbitControls::new().distance_limits(0.0, CAMERA_RANGE);
        controls.zoom(50.0);
        controls.update(&mut scene, &Input::new(), FRAME);

        let p = camera_position(&scene);
        assert!(p.abs().max_element() <= CAMERA_RANGE + 1e-4);
    }

    #[test]
    fn drags_starting_on_panel_are_ignored() {
        let start = Vec3::new(0.0, 0.0, 3.0);
        let mut scene = scene_at(start);
        let mut controls = OrbitControls::new();

        let mut input = Input::new();
        input.set_pointer_captured(true);
        input.press(MouseButton::Left);
        input.move_to(Vec2::new(200.0, 0.0));
        controls.update(&mut scene, &input, FRAME);

        assert!(!controls.is_dragging());
        assert_relative_eq!(camera_position(&scene).x, 0.0, epsilon = 1e-5);
    }

    #[test]
    fn drag_rotates_camera() {
        let mut scene = scene_at(Vec3::new(0.0, 0.0, 3.0));
        let mut controls = OrbitControls::new();

        let mut input = Input::new();
        input.press(MouseButton::Left);
        input.move_to(Vec2::new(-100.0, 0.0));
        controls.update(&mut scene, &input, FRAME);

        assert!(controls.is_dragging());
        let p = camera_position(&scene);
        assert_relative_eq!(p.x.atan2(p.z), 0.5, epsilon = 1e-5);
    }
}
