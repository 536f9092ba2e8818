use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton, MouseScrollDelta, WindowEvent};

/// Tracks pointer state for the orbit controls and the debug panel.
///
/// Positions are physical window pixels, matching the surface the panel is
/// drawn on.
#[derive(Debug, Default)]
pub struct Input {
    buttons_down: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    buttons_released: HashSet<MouseButton>,
    position: Vec2,
    delta: Vec2,
    scroll: Vec2,
    captured: bool,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call at the end of each frame to reset per-frame state.
    pub fn end_frame(&mut self) {
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.delta = Vec2::ZERO;
        self.scroll = Vec2::ZERO;
    }

    /// Process a window event and update input state.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press(*button),
                ElementState::Released => self.release(*button),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.move_to(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::MouseWheel { delta, .. } => {
                let d = match delta {
                    MouseScrollDelta::LineDelta(x, y) => Vec2::new(*x, *y),
                    MouseScrollDelta::PixelDelta(pos) => {
                        Vec2::new(pos.x as f32, pos.y as f32) / 120.0
                    }
                };
                self.scroll_by(d);
            }
            _ => {}
        }
    }

    pub fn press(&mut self, button: MouseButton) {
        if self.buttons_down.insert(button) {
            self.buttons_pressed.insert(button);
        }
    }

    pub fn release(&mut self, button: MouseButton) {
        self.buttons_down.remove(&button);
        self.buttons_released.insert(button);
    }

    pub fn move_to(&mut self, position: Vec2) {
        self.delta += position - self.position;
        self.position = position;
    }

    /// Add wheel movement in lines.
    pub fn scroll_by(&mut self, delta: Vec2) {
        self.scroll += delta;
    }

    /// Returns true if the mouse button is currently held down.
    pub fn mouse_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Returns true if the mouse button was pressed this frame.
    pub fn mouse_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Returns true if the mouse button was released this frame.
    pub fn mouse_released(&self, button: MouseButton) -> bool {
        self.buttons_released.contains(&button)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.position
    }

    /// Mouse movement delta this frame.
    pub fn mouse_delta(&self) -> Vec2 {
        self.delta
    }

    /// Scroll wheel delta this frame (in "lines").
    pub fn scroll_delta(&self) -> Vec2 {
        self.scroll
    }

    /// Mark the pointer as owned by the debug panel this frame; the orbit
    /// controls ignore presses and scrolling while it is set.
    pub fn set_pointer_captured(&mut self, captured: bool) {
        self.captured = captured;
    }

    pub fn pointer_captured(&self) -> bool {
        self.captured
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_reported_for_one_frame() {
        let mut input = Input::new();
        input.press(MouseButton::Left);
        assert!(input.mouse_pressed(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));

        input.end_frame();
        input.press(MouseButton::Left);
        assert!(!input.mouse_pressed(MouseButton::Left));
        assert!(input.mouse_down(MouseButton::Left));
    }

    #[test]
    fn deltas_accumulate_until_frame_end() {
        let mut input = Input::new();
        input.move_to(Vec2::new(10.0, 0.0));
        input.move_to(Vec2::new(15.0, 5.0));
        assert_eq!(input.mouse_delta(), Vec2::new(15.0, 5.0));

        input.end_frame();
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse_position(), Vec2::new(15.0, 5.0));
    }

    #[test]
    fn release_is_reported_for_one_frame() {
        let mut input = Input::new();
        input.press(MouseButton::Left);
        input.end_frame();
        input.release(MouseButton::Left);
        assert!(input.mouse_released(MouseButton::Left));
        assert!(!input.mouse_down(MouseButton::Left));

        input.end_frame();
        assert!(!input.mouse_released(MouseButton::Left));
    }
}
