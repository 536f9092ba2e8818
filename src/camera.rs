use glam::{Mat4, Vec3};

/// Perspective camera component.
///
/// The camera's position is the position of its node's
/// [`Transform`](crate::Transform); it always looks at `target`. The
/// projection matrix is cached and only recomputed by
/// [`update_projection`](Self::update_projection), so changing `aspect`
/// or `fov_degrees` takes effect after that call.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    /// Width / height of the output surface.
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    /// Point the camera looks at.
    pub target: Vec3,
    projection: Mat4,
}

impl PerspectiveCamera {
    pub fn new(fov_degrees: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            fov_degrees,
            aspect,
            near,
            far,
            target: Vec3::ZERO,
            projection: Mat4::IDENTITY,
        };
        camera.update_projection();
        camera
    }

    pub fn looking_at(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Recompute the cached projection from the current parameters.
    pub fn update_projection(&mut self) {
        let aspect = if self.aspect.is_finite() && self.aspect > 0.0 {
            self.aspect
        } else {
            1.0
        };
        self.projection =
            Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect, self.near, self.far);
    }

    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// World-to-view matrix for a camera placed at `position`.
    pub fn view_matrix(&self, position: Vec3) -> Mat4 {
        let target = if (self.target - position).length_squared() > 1e-12 {
            self.target
        } else {
            position + Vec3::NEG_Z
        };
        Mat4::look_at_rh(position, target, Vec3::Y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn projection_follows_aspect_after_update() {
        let mut camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let before = camera.projection();
        camera.aspect = 2.0;
        assert_eq!(camera.projection(), before);
        camera.update_projection();
        assert_ne!(camera.projection(), before);
        assert_eq!(camera.projection(), PerspectiveCamera::new(75.0, 2.0, 0.1, 100.0).projection());
    }

    #[test]
    fn view_matrix_handles_camera_on_target() {
        let camera = PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0);
        let view = camera.view_matrix(Vec3::ZERO);
        assert!(view.is_finite());
    }
}
