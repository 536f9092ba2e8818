//! Debug panel overlay: pointer interaction and drawing.
//!
//! [`PanelState`] owns the panel's placement and any slider drag in
//! progress. It turns pointer input into control writes and needs no GPU.
//! [`PanelOverlay`] adds a [`Draw2d`] batch and the label font and draws the
//! panel on top of the scene.

use std::path::Path;

use winit::event::MouseButton;

use crate::assets::{Assets, FontId};
use crate::draw2d::{Color, Draw2d};
use crate::gpu::GpuContext;
use crate::input::Input;
use crate::panel::{
    ControlKind, ControlValue, DebugPanel, PanelLayout, Row, RowKind, slider_fraction,
    slider_value,
};
use crate::scene::SceneContext;

/// Step used when dragging one channel of a color control.
const CHANNEL_STEP: f32 = 1.0 / 255.0;

/// Panel placement and drag state.
#[derive(Clone, Debug)]
pub struct PanelState {
    /// Panel width in physical pixels.
    pub width: f32,
    /// Gap between the panel and the window's top-right corner.
    pub margin: f32,
    drag: Option<RowKind>,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            width: 280.0,
            margin: 8.0,
            drag: None,
        }
    }
}

impl PanelState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Layout for the panel anchored to the top-right of a surface.
    pub fn layout(&self, panel: &DebugPanel, surface_width: f32) -> PanelLayout {
        let x = (surface_width - self.width - self.margin).max(0.0);
        PanelLayout::compute(panel, (x, self.margin), self.width)
    }

    /// The row being dragged, if any.
    pub fn dragging(&self) -> Option<RowKind> {
        self.drag
    }

    /// Apply this frame's pointer input to the panel.
    ///
    /// Marks the pointer as captured while it is over the panel or dragging
    /// a slider, so camera controls ignore it.
    pub fn interact(
        &mut self,
        panel: &mut DebugPanel,
        scene: &mut SceneContext,
        input: &mut Input,
        surface_width: f32,
    ) {
        let layout = self.layout(panel, surface_width);
        let pointer = input.mouse_position();

        if input.mouse_pressed(MouseButton::Left) {
            if let Some(row) = layout.hit(pointer.x, pointer.y).copied() {
                self.press(panel, scene, &row, pointer.x);
            }
        } else if let Some(kind) = self.drag {
            if input.mouse_down(MouseButton::Left) {
                if let Some(row) = layout.rows.iter().find(|r| r.kind == kind) {
                    drag_to(panel, scene, row, pointer.x);
                }
            }
        }

        if input.mouse_released(MouseButton::Left) {
            self.drag = None;
        }

        let hovered = layout.bounds.contains(pointer.x, pointer.y);
        input.set_pointer_captured(hovered || self.drag.is_some());
    }

    fn press(&mut self, panel: &mut DebugPanel, scene: &mut SceneContext, row: &Row, x: f32) {
        match row.kind {
            RowKind::Header { folder } => panel.toggle_folder(folder),
            RowKind::Control { folder, control } => {
                let Some(control) = panel.folders()[folder].controls().get(control) else {
                    return;
                };
                match control.kind() {
                    ControlKind::Toggle => {
                        if let ControlValue::Bool(on) = control.get(scene) {
                            log_write(control.name(), control.set(scene, ControlValue::Bool(!on)));
                        }
                    }
                    ControlKind::Slider { .. } if row.widget.contains(x, row.widget.y) => {
                        self.drag = Some(row.kind);
                        drag_to(panel, scene, row, x);
                    }
                    _ => {}
                }
            }
            RowKind::Channel { .. } if row.widget.contains(x, row.widget.y) => {
                self.drag = Some(row.kind);
                drag_to(panel, scene, row, x);
            }
            RowKind::Channel { .. } => {}
        }
    }
}

fn track_fraction(row: &Row, x: f32) -> f32 {
    if row.widget.w > 0.0 {
        (x - row.widget.x) / row.widget.w
    } else {
        0.0
    }
}

/// Set the slider or color channel in `row` from a pointer x position.
fn drag_to(panel: &DebugPanel, scene: &mut SceneContext, row: &Row, x: f32) {
    let fraction = track_fraction(row, x);
    match row.kind {
        RowKind::Control { folder, control } => {
            let Some(control) = panel.folders()[folder].controls().get(control) else {
                return;
            };
            if let ControlKind::Slider { min, max, step } = control.kind() {
                let value = slider_value(min, max, step, fraction);
                log_write(control.name(), control.set(scene, ControlValue::Number(value)));
            }
        }
        RowKind::Channel {
            folder,
            control,
            channel,
        } => {
            let Some(control) = panel.folders()[folder].controls().get(control) else {
                return;
            };
            if let ControlValue::Color(mut color) = control.get(scene) {
                let value = slider_value(0.0, 1.0, CHANNEL_STEP, fraction);
                match channel {
                    0 => color.r = value,
                    1 => color.g = value,
                    _ => color.b = value,
                }
                log_write(control.name(), control.set(scene, ControlValue::Color(color)));
            }
        }
        RowKind::Header { .. } => {}
    }
}

fn log_write(name: &str, result: Result<(), crate::panel::PanelError>) {
    if let Err(e) = result {
        log::warn!("panel control '{}': {}", name, e);
    }
}

/// Display precision for a slider value, from its step.
pub fn format_number(value: f32, step: f32) -> String {
    let decimals = if step >= 1.0 {
        0
    } else if step >= 0.1 {
        1
    } else if step >= 0.01 {
        2
    } else {
        3
    };
    format!("{:.*}", decimals, value)
}

/// Draws the debug panel over the scene.
pub struct PanelOverlay {
    pub state: PanelState,
    draw: Draw2d,
    assets: Assets,
    font: Option<FontId>,
}

impl PanelOverlay {
    /// Create the overlay. A font that fails to load is logged and labels
    /// are left out; the widgets still draw and respond.
    pub fn new(gpu: &GpuContext, font_path: &Path, font_size: f32) -> Self {
        let mut assets = Assets::new();
        let font = match assets.load_font(gpu, font_path, font_size) {
            Ok(id) => Some(id),
            Err(e) => {
                log::warn!("panel labels disabled: {}", e);
                None
            }
        };

        let mut draw = Draw2d::new(gpu);
        draw.update_font_bind_groups(gpu, &assets);

        Self {
            state: PanelState::new(),
            draw,
            assets,
            font,
        }
    }

    fn label(&mut self, x: f32, y: f32, text: &str, color: Color) {
        if let Some(font) = self.font {
            self.draw.text(&self.assets, font, x, y, text, color);
        }
    }

    /// Rebuild the overlay's draw batch for this frame.
    pub fn prepare(&mut self, panel: &DebugPanel, scene: &SceneContext, surface_width: f32) {
        self.draw.clear();
        let layout = self.state.layout(panel, surface_width);
        let b = layout.bounds;
        self.draw.rect(b.x, b.y, b.w, b.h, Color::PANEL_BG);

        let text_y = |row: &Row| row.rect.y + 4.0;
        let text_x = |row: &Row| row.rect.x + PanelLayout::PADDING;

        for row in &layout.rows {
            let w = row.widget;
            match row.kind {
                RowKind::Header { folder } => {
                    let folder = &panel.folders()[folder];
                    let r = row.rect;
                    self.draw.rect(r.x, r.y, r.w, r.h - 1.0, Color::PANEL_HEADER);
                    let marker = if folder.open { "-" } else { "+" };
                    let text = format!("{} {}", marker, folder.name());
                    self.label(text_x(row), text_y(row), &text, Color::PANEL_TEXT);
                }
                RowKind::Control { folder, control } => {
                    let control = &panel.folders()[folder].controls()[control];
                    self.label(text_x(row), text_y(row), control.name(), Color::PANEL_TEXT);

                    match (control.kind(), control.get(scene)) {
                        (ControlKind::Slider { min, max, step }, ControlValue::Number(v)) => {
                            let fill = slider_fraction(min, max, v) * w.w;
                            self.draw.rect(w.x, w.y, w.w, w.h, Color::PANEL_WIDGET);
                            self.draw.rect(w.x, w.y, fill, w.h, Color::PANEL_ACCENT);
                            let text = format_number(v, step);
                            self.label(w.x + 4.0, text_y(row), &text, Color::PANEL_TEXT);
                        }
                        (ControlKind::Toggle, ControlValue::Bool(on)) => {
                            let size = w.h;
                            self.draw.rect(w.x, w.y, size, size, Color::PANEL_WIDGET);
                            if on {
                                self.draw.rect(
                                    w.x + 3.0,
                                    w.y + 3.0,
                                    size - 6.0,
                                    size - 6.0,
                                    Color::PANEL_ACCENT,
                                );
                            }
                        }
                        (ControlKind::Color, ControlValue::Color(c)) => {
                            self.draw.rect(w.x, w.y, w.w, w.h, c.with_alpha(1.0));
                            self.draw.rect_outline(w.x, w.y, w.w, w.h, Color::PANEL_WIDGET);
                            let text = c.to_hex_string();
                            let luminance = 0.299 * c.r + 0.587 * c.g + 0.114 * c.b;
                            let ink = if luminance > 0.5 {
                                Color::BLACK
                            } else {
                                Color::WHITE
                            };
                            self.label(w.x + 4.0, text_y(row), &text, ink);
                        }
                        _ => {}
                    }
                }
                RowKind::Channel {
                    folder,
                    control,
                    channel,
                } => {
                    let control = &panel.folders()[folder].controls()[control];
                    let ControlValue::Color(c) = control.get(scene) else {
                        continue;
                    };
                    let (name, value, tint) = match channel {
                        0 => ("R", c.r, Color::rgb(0.8, 0.25, 0.25)),
                        1 => ("G", c.g, Color::rgb(0.25, 0.7, 0.3)),
                        _ => ("B", c.b, Color::rgb(0.25, 0.4, 0.85)),
                    };
                    self.label(text_x(row) + 12.0, text_y(row), name, Color::PANEL_TEXT);
                    self.draw.rect(w.x, w.y, w.w, w.h, Color::PANEL_WIDGET);
                    self.draw.rect(w.x, w.y, value.clamp(0.0, 1.0) * w.w, w.h, tint);
                    let text = format!("{}", (value * 255.0).round() as u8);
                    self.label(w.x + 4.0, text_y(row), &text, Color::PANEL_TEXT);
                }
            }
        }
    }

    /// Draw the prepared batch into an open render pass.
    pub fn render(&self, gpu: &GpuContext, render_pass: &mut wgpu::RenderPass) {
        self.draw.render(gpu, render_pass);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::composer::{Composition, SceneComposer};
    use crate::config::ShowcaseConfig;
    use crate::text::{PendingTitle, TextError};
    use approx::assert_relative_eq;
    use glam::Vec2;

    const SURFACE_WIDTH: f32 = 1280.0;

    fn composition() -> Composition {
        SceneComposer::new(ShowcaseConfig::default().seed(3))
            .compose_with_title(PendingTitle::resolved(Err(TextError::WorkerGone)))
    }

    fn row(state: &PanelState, panel: &DebugPanel, kind: RowKind) -> Row {
        *state
            .layout(panel, SURFACE_WIDTH)
            .rows
            .iter()
            .find(|r| r.kind == kind)
            .unwrap()
    }

    fn click(input: &mut Input, at: Vec2) {
        input.end_frame();
        input.move_to(at);
        input.press(MouseButton::Left);
    }

    fn material_number(c: &Composition, name: &str) -> f32 {
        match c.panel.get(&c.scene, "Material", name) {
            Some(ControlValue::Number(v)) => v,
            other => panic!("unexpected value {:?}", other),
        }
    }

    #[test]
    fn panel_sits_in_top_right_corner() {
        let c = composition();
        let state = PanelState::new();
        let layout = state.layout(&c.panel, SURFACE_WIDTH);
        assert_eq!(layout.bounds.x + layout.bounds.w + state.margin, SURFACE_WIDTH);
        assert_eq!(layout.bounds.y, state.margin);
    }

    #[test]
    fn slider_press_and_drag_write_values() {
        let mut c = composition();
        let mut state = PanelState::new();
        let mut input = Input::new();
        let kind = RowKind::Control {
            folder: 1,
            control: 0,
        };
        let slider = row(&state, &c.panel, kind);
        let y = slider.widget.y + slider.widget.h / 2.0;

        click(&mut input, Vec2::new(slider.widget.x + slider.widget.w * 0.25, y));
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert_eq!(state.dragging(), Some(kind));
        assert!(input.pointer_captured());
        assert_relative_eq!(material_number(&c, "metalness"), 0.25, epsilon = 1e-3);

        // Dragging past the end of the track clamps to the maximum
        input.end_frame();
        input.move_to(Vec2::new(slider.widget.x + slider.widget.w * 2.0, y));
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert_relative_eq!(material_number(&c, "metalness"), 1.0, epsilon = 1e-6);

        input.end_frame();
        input.release(MouseButton::Left);
        input.move_to(Vec2::new(0.0, 600.0));
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert_eq!(state.dragging(), None);
        assert!(!input.pointer_captured());
    }

    #[test]
    fn click_and_release_in_one_frame_sets_without_dragging() {
        let mut c = composition();
        let mut state = PanelState::new();
        let mut input = Input::new();
        let kind = RowKind::Control {
            folder: 1,
            control: 1,
        };
        let slider = row(&state, &c.panel, kind);
        let y = slider.widget.y + slider.widget.h * 0.5;

        click(&mut input, Vec2::new(slider.widget.x + slider.widget.w * 0.5, y));
        input.release(MouseButton::Left);
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert_relative_eq!(material_number(&c, "roughness"), 0.5, epsilon = 1e-3);
        assert_eq!(state.dragging(), None);

        input.end_frame();
        input.move_to(Vec2::new(slider.widget.x, y));
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert_relative_eq!(material_number(&c, "roughness"), 0.5, epsilon = 1e-3);
    }

    #[test]
    fn toggles_flip_and_headers_collapse() {
        let mut c = composition();
        let mut state = PanelState::new();
        let mut input = Input::new();

        let toggle = row(
            &state,
            &c.panel,
            RowKind::Control {
                folder: 1,
                control: 4,
            },
        );
        click(&mut input, Vec2::new(toggle.widget.x + 2.0, toggle.widget.y + 2.0));
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert_eq!(
            c.panel.get(&c.scene, "Material", "wireframe"),
            Some(ControlValue::Bool(true))
        );

        let header = row(&state, &c.panel, RowKind::Header { folder: 0 });
        input.release(MouseButton::Left);
        click(&mut input, Vec2::new(header.rect.x + 10.0, header.rect.y + 5.0));
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert!(!c.panel.folders()[0].open);
    }

    #[test]
    fn channel_drag_changes_one_component() {
        let mut c = composition();
        let mut state = PanelState::new();
        let mut input = Input::new();
        let before = c.scene.background;

        let green = row(
            &state,
            &c.panel,
            RowKind::Channel {
                folder: 4,
                control: 0,
                channel: 1,
            },
        );
        click(
            &mut input,
            Vec2::new(green.widget.x + green.widget.w - 0.1, green.widget.y + 2.0),
        );
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);

        let after = c.scene.background;
        assert_relative_eq!(after.g, 1.0, epsilon = 1e-5);
        assert_eq!(after.r, before.r);
        assert_eq!(after.b, before.b);
    }

    #[test]
    fn press_outside_panel_is_not_captured() {
        let mut c = composition();
        let mut state = PanelState::new();
        let mut input = Input::new();
        let metalness = material_number(&c, "metalness");

        click(&mut input, Vec2::new(10.0, 10.0));
        state.interact(&mut c.panel, &mut c.scene, &mut input, SURFACE_WIDTH);
        assert!(!input.pointer_captured());
        assert_eq!(state.dragging(), None);
        assert_eq!(material_number(&c, "metalness"), metalness);
    }

    #[test]
    fn numbers_use_step_precision() {
        assert_eq!(format_number(30.04, 0.1), "30.0");
        assert_eq!(format_number(-3.456, 0.01), "-3.46");
        assert_eq!(format_number(0.12345, 0.0001), "0.123");
        assert_eq!(format_number(4.0, 1.0), "4");
    }
}
