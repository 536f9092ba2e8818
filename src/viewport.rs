use crate::camera::PerspectiveCamera;
use crate::scene::SceneContext;

/// Output surface state in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
    /// Physical pixels per logical pixel reported by the window.
    pub device_pixel_ratio: f32,
}

impl Viewport {
    /// Upper bound on the rendering pixel ratio.
    pub const MAX_PIXEL_RATIO: f32 = 2.0;

    pub fn new(width: f32, height: f32, device_pixel_ratio: f32) -> Self {
        Self {
            width,
            height,
            device_pixel_ratio,
        }
    }

    /// Pixel ratio used for rendering, capped at 2 so high-density
    /// displays don't render at full resolution.
    pub fn pixel_ratio(&self) -> f32 {
        self.device_pixel_ratio.min(Self::MAX_PIXEL_RATIO)
    }

    /// Surface size in physical pixels, at least 1x1.
    pub fn surface_size(&self) -> (u32, u32) {
        let ratio = self.pixel_ratio();
        let scale = |v: f32| ((v * ratio).round() as u32).max(1);
        (scale(self.width), scale(self.height))
    }

    /// Width over height, or 1 when either side is empty.
    pub fn aspect(&self) -> f32 {
        if self.width > 0.0 && self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// False while the window is minimized to a zero-sized area.
    pub fn is_visible(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// Apply a window size change: update the viewport and the active camera's
/// aspect and projection. Returns the new surface size for the renderer.
/// A zero-sized window keeps the camera's previous aspect.
///
/// Calling this twice with the same arguments leaves the same state.
pub fn resize(
    scene: &mut SceneContext,
    viewport: &mut Viewport,
    width: f32,
    height: f32,
    scale_factor: f32,
) -> (u32, u32) {
    *viewport = Viewport::new(width, height, scale_factor);
    if !viewport.is_visible() {
        return viewport.surface_size();
    }

    if let Some(entity) = scene.camera_entity() {
        if let Ok(mut camera) = scene.world.get::<&mut PerspectiveCamera>(entity) {
            camera.aspect = viewport.aspect();
            camera.update_projection();
        }
    }

    viewport.surface_size()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::draw2d::Color;
    use glam::Vec3;

    fn scene_with_camera() -> SceneContext {
        let mut scene = SceneContext::new(Color::BLACK);
        scene.spawn_camera(
            "camera",
            PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0),
            Vec3::new(1.0, 1.0, 2.0),
        );
        scene
    }

    #[test]
    fn pixel_ratio_is_capped() {
        assert_eq!(Viewport::new(100.0, 100.0, 3.0).pixel_ratio(), 2.0);
        assert_eq!(Viewport::new(100.0, 100.0, 1.5).pixel_ratio(), 1.5);
        assert_eq!(Viewport::new(100.0, 50.0, 3.0).surface_size(), (200, 100));
    }

    #[test]
    fn surface_never_zero() {
        assert_eq!(Viewport::new(0.0, 0.0, 1.0).surface_size(), (1, 1));
        assert_eq!(Viewport::new(10.0, 0.0, 1.0).aspect(), 1.0);
        assert_eq!(Viewport::new(0.0, 0.0, 1.0).aspect(), 1.0);
    }

    #[test]
    fn resize_is_idempotent() {
        let mut scene = scene_with_camera();
        let mut viewport = Viewport::new(1.0, 1.0, 1.0);

        let first = resize(&mut scene, &mut viewport, 1280.0, 720.0, 2.5);
        let (_, camera_once) = scene.camera().unwrap();
        let viewport_once = viewport;

        let second = resize(&mut scene, &mut viewport, 1280.0, 720.0, 2.5);
        let (_, camera_twice) = scene.camera().unwrap();

        assert_eq!(first, (2560, 1440));
        assert_eq!(first, second);
        assert_eq!(viewport_once, viewport);
        assert_eq!(camera_once, camera_twice);
        assert_eq!(camera_twice.aspect, 1280.0 / 720.0);
    }

    #[test]
    fn minimized_window_keeps_camera_projection() {
        let mut scene = scene_with_camera();
        let mut viewport = Viewport::new(1.0, 1.0, 1.0);
        resize(&mut scene, &mut viewport, 1280.0, 720.0, 1.0);
        let (_, before) = scene.camera().unwrap();

        assert_eq!(resize(&mut scene, &mut viewport, 0.0, 0.0, 1.0), (1, 1));
        let (_, after) = scene.camera().unwrap();
        assert_eq!(before, after);
        assert!(after.projection().is_finite());
    }
}
