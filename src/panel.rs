//! Debug panel model: folders of controls bound to scene fields.
//!
//! A [`Control`] never owns scene state. It holds a getter and a setter
//! closure that read and write a [`SceneContext`] passed in by the caller,
//! so the panel can live next to the scene without borrowing it.
//!
//! [`PanelLayout`] turns the panel into screen rows for drawing and
//! hit-testing; the [`overlay`](crate::overlay) module does the drawing.

use crate::composer::SceneHandles;
use crate::draw2d::Color;
use crate::ecs::{AmbientLight, PointLight};
use crate::mesh::Transform;
use crate::scene::{SceneContext, StandardMaterial};
use hecs::Entity;

/// Errors from [`DebugPanel::set`].
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum PanelError {
    #[error("no folder named '{0}'")]
    UnknownFolder(String),
    #[error("no control named '{name}' in folder '{folder}'")]
    UnknownControl { folder: String, name: String },
    #[error("control '{name}' expects a {expected} value")]
    KindMismatch { name: String, expected: &'static str },
}

/// What kind of widget a control is, and its value constraints.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlKind {
    /// A number in `[min, max]`; `step` quantizes pointer dragging.
    Slider { min: f32, max: f32, step: f32 },
    Toggle,
    Color,
}

impl ControlKind {
    fn expected(&self) -> &'static str {
        match self {
            ControlKind::Slider { .. } => "number",
            ControlKind::Toggle => "boolean",
            ControlKind::Color => "color",
        }
    }
}

/// Value read from or written to a control.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ControlValue {
    Number(f32),
    Bool(bool),
    Color(Color),
}

/// Value of a slider at `fraction` of its track, snapped to `step` and
/// kept inside the range.
pub fn slider_value(min: f32, max: f32, step: f32, fraction: f32) -> f32 {
    let range = max - min;
    let raw = fraction.clamp(0.0, 1.0) * range;
    let snapped = if step > 0.0 {
        (raw / step).round() * step
    } else {
        raw
    };
    (min + snapped).clamp(min, max)
}

/// Position of `value` along a slider track, in `[0, 1]`.
pub fn slider_fraction(min: f32, max: f32, value: f32) -> f32 {
    if max > min {
        ((value - min) / (max - min)).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

type Getter = Box<dyn Fn(&SceneContext) -> ControlValue>;
type Setter = Box<dyn Fn(&mut SceneContext, ControlValue)>;

/// A named control with explicit accessors into the scene.
pub struct Control {
    name: String,
    kind: ControlKind,
    getter: Getter,
    setter: Setter,
}

impl Control {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> ControlKind {
        self.kind
    }

    pub fn get(&self, scene: &SceneContext) -> ControlValue {
        (self.getter)(scene)
    }

    /// Write `value` through the setter. Numbers are clamped to the slider
    /// range and colors to `[0, 1]` per channel; nothing else is changed.
    pub fn set(&self, scene: &mut SceneContext, value: ControlValue) -> Result<(), PanelError> {
        let value = match (self.kind, value) {
            (ControlKind::Slider { min, max, .. }, ControlValue::Number(v)) => {
                ControlValue::Number(v.clamp(min, max))
            }
            (ControlKind::Toggle, ControlValue::Bool(v)) => ControlValue::Bool(v),
            (ControlKind::Color, ControlValue::Color(c)) => ControlValue::Color(Color::rgba(
                c.r.clamp(0.0, 1.0),
                c.g.clamp(0.0, 1.0),
                c.b.clamp(0.0, 1.0),
                c.a.clamp(0.0, 1.0),
            )),
            (kind, _) => {
                return Err(PanelError::KindMismatch {
                    name: self.name.clone(),
                    expected: kind.expected(),
                });
            }
        };
        (self.setter)(scene, value);
        Ok(())
    }
}

/// A titled group of controls that can be collapsed.
pub struct Folder {
    name: String,
    controls: Vec<Control>,
    pub open: bool,
}

impl Folder {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn controls(&self) -> &[Control] {
        &self.controls
    }

    pub fn control(&self, name: &str) -> Option<&Control> {
        self.controls.iter().find(|c| c.name == name)
    }

    fn push(&mut self, name: &str, kind: ControlKind, getter: Getter, setter: Setter) -> &mut Self {
        self.controls.push(Control {
            name: name.to_string(),
            kind,
            getter,
            setter,
        });
        self
    }

    pub fn slider(
        &mut self,
        name: &str,
        min: f32,
        max: f32,
        step: f32,
        get: impl Fn(&SceneContext) -> f32 + 'static,
        set: impl Fn(&mut SceneContext, f32) + 'static,
    ) -> &mut Self {
        self.push(
            name,
            ControlKind::Slider { min, max, step },
            Box::new(move |scene| ControlValue::Number(get(scene))),
            Box::new(move |scene, value| {
                if let ControlValue::Number(v) = value {
                    set(scene, v);
                }
            }),
        )
    }

    pub fn toggle(
        &mut self,
        name: &str,
        get: impl Fn(&SceneContext) -> bool + 'static,
        set: impl Fn(&mut SceneContext, bool) + 'static,
    ) -> &mut Self {
        self.push(
            name,
            ControlKind::Toggle,
            Box::new(move |scene| ControlValue::Bool(get(scene))),
            Box::new(move |scene, value| {
                if let ControlValue::Bool(v) = value {
                    set(scene, v);
                }
            }),
        )
    }

    pub fn color(
        &mut self,
        name: &str,
        get: impl Fn(&SceneContext) -> Color + 'static,
        set: impl Fn(&mut SceneContext, Color) + 'static,
    ) -> &mut Self {
        self.push(
            name,
            ControlKind::Color,
            Box::new(move |scene| ControlValue::Color(get(scene))),
            Box::new(move |scene, value| {
                if let ControlValue::Color(c) = value {
                    set(scene, c);
                }
            }),
        )
    }
}

/// Folders of live-tweak controls.
#[derive(Default)]
pub struct DebugPanel {
    folders: Vec<Folder>,
}

impl DebugPanel {
    pub fn new() -> Self {
        Self::default()
    }

    /// The folder named `name`, created (open) if it does not exist yet.
    pub fn folder(&mut self, name: &str) -> &mut Folder {
        let index = match self.folders.iter().position(|f| f.name == name) {
            Some(index) => index,
            None => {
                self.folders.push(Folder {
                    name: name.to_string(),
                    controls: Vec::new(),
                    open: true,
                });
                self.folders.len() - 1
            }
        };
        &mut self.folders[index]
    }

    pub fn folders(&self) -> &[Folder] {
        &self.folders
    }

    /// Flip a folder between open and collapsed.
    pub fn toggle_folder(&mut self, index: usize) {
        if let Some(folder) = self.folders.get_mut(index) {
            folder.open = !folder.open;
        }
    }

    pub fn control_count(&self) -> usize {
        self.folders.iter().map(|f| f.controls.len()).sum()
    }

    fn find(&self, folder: &str, name: &str) -> Result<&Control, PanelError> {
        let group = self
            .folders
            .iter()
            .find(|f| f.name == folder)
            .ok_or_else(|| PanelError::UnknownFolder(folder.to_string()))?;
        group.control(name).ok_or_else(|| PanelError::UnknownControl {
            folder: folder.to_string(),
            name: name.to_string(),
        })
    }

    pub fn get(&self, scene: &SceneContext, folder: &str, name: &str) -> Option<ControlValue> {
        self.find(folder, name).ok().map(|c| c.get(scene))
    }

    pub fn set(
        &self,
        scene: &mut SceneContext,
        folder: &str,
        name: &str,
        value: ControlValue,
    ) -> Result<(), PanelError> {
        self.find(folder, name)?.set(scene, value)
    }
}

fn transform_axis(scene: &SceneContext, entity: Entity, axis: usize) -> f32 {
    scene
        .world
        .get::<&Transform>(entity)
        .map(|t| t.position[axis])
        .unwrap_or_default()
}

fn set_transform_axis(scene: &mut SceneContext, entity: Entity, axis: usize, value: f32) {
    if let Ok(mut transform) = scene.world.get::<&mut Transform>(entity) {
        transform.position[axis] = value;
    }
}

fn position_sliders(folder: &mut Folder, entity: Entity, min: f32, max: f32, step: f32) {
    for (axis, name) in ["x", "y", "z"].into_iter().enumerate() {
        folder.slider(
            name,
            min,
            max,
            step,
            move |scene| transform_axis(scene, entity, axis),
            move |scene, v| set_transform_axis(scene, entity, axis, v),
        );
    }
}

fn material_field<T: Copy + Default + 'static>(
    handles: &SceneHandles,
    field: fn(&mut StandardMaterial) -> &mut T,
) -> (
    impl Fn(&SceneContext) -> T + 'static,
    impl Fn(&mut SceneContext, T) + 'static,
) {
    let id = handles.material;
    (
        move |scene: &SceneContext| {
            scene
                .material(id)
                .map(|m| {
                    let mut copy = *m;
                    *field(&mut copy)
                })
                .unwrap_or_default()
        },
        move |scene: &mut SceneContext, value: T| {
            if let Some(material) = scene.material_mut(id) {
                *field(material) = value;
            }
        },
    )
}

/// Bound of each Camera Position slider. The orbit controls zoom no farther
/// than this, so the panel can always show the camera's position.
pub const CAMERA_RANGE: f32 = 10.0;

/// Build the showcase panel: camera position, shared material, lights and
/// background.
pub fn register_bindings(handles: &SceneHandles) -> DebugPanel {
    let mut panel = DebugPanel::new();

    position_sliders(
        panel.folder("Camera Position"),
        handles.camera,
        -CAMERA_RANGE,
        CAMERA_RANGE,
        0.01,
    );

    {
        let folder = panel.folder("Material");
        let (get, set) = material_field(handles, |m| &mut m.metalness);
        folder.slider("metalness", 0.0, 1.0, 0.0001, get, set);
        let (get, set) = material_field(handles, |m| &mut m.roughness);
        folder.slider("roughness", 0.0, 1.0, 0.0001, get, set);
        let (get, set) = material_field(handles, |m| &mut m.transparent);
        folder.toggle("transparent", get, set);
        let (get, set) = material_field(handles, |m| &mut m.opacity);
        folder.slider("opacity", 0.0, 1.0, 0.001, get, set);
        let (get, set) = material_field(handles, |m| &mut m.wireframe);
        folder.toggle("wireframe", get, set);
        let (get, set) = material_field(handles, |m| &mut m.color);
        folder.color("color", get, set);
    }

    let ambient = handles.ambient_light;
    panel.folder("Ambient Light").slider(
        "intensity",
        0.0,
        3.0,
        0.001,
        move |scene| {
            scene
                .world
                .get::<&AmbientLight>(ambient)
                .map(|l| l.intensity)
                .unwrap_or_default()
        },
        move |scene, v| {
            if let Ok(mut light) = scene.world.get::<&mut AmbientLight>(ambient) {
                light.intensity = v;
            }
        },
    );

    let point = handles.point_light;
    let folder = panel.folder("Point Light");
    position_sliders(folder, point, -10.0, 10.0, 0.01);
    folder.slider(
        "intensity",
        0.0,
        100.0,
        0.1,
        move |scene| {
            scene
                .world
                .get::<&PointLight>(point)
                .map(|l| l.intensity)
                .unwrap_or_default()
        },
        move |scene, v| {
            if let Ok(mut light) = scene.world.get::<&mut PointLight>(point) {
                light.intensity = v;
            }
        },
    );

    panel.folder("Scene").color(
        "background",
        |scene| scene.background,
        |scene, color| scene.background = color,
    );

    panel
}

/// Screen rectangle in physical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub w: f32,
    pub h: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self { x, y, w, h }
    }

    pub fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x && y >= self.y && x < self.x + self.w && y < self.y + self.h
    }
}

/// What a layout row shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RowKind {
    Header { folder: usize },
    Control { folder: usize, control: usize },
    /// One channel (0 = R, 1 = G, 2 = B) of a color control.
    Channel {
        folder: usize,
        control: usize,
        channel: usize,
    },
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Row {
    pub kind: RowKind,
    pub rect: Rect,
    /// Interactive part of the row (slider track, checkbox, swatch).
    pub widget: Rect,
}

/// Row geometry for a panel: one header per folder and, for open folders,
/// one row per control plus R/G/B rows under each color control.
#[derive(Clone, Debug, PartialEq)]
pub struct PanelLayout {
    pub rows: Vec<Row>,
    pub bounds: Rect,
}

impl PanelLayout {
    pub const ROW_HEIGHT: f32 = 22.0;
    pub const HEADER_HEIGHT: f32 = 24.0;
    pub const PADDING: f32 = 6.0;
    /// Share of the row width given to the label.
    pub const LABEL_FRACTION: f32 = 0.4;

    pub fn compute(panel: &DebugPanel, origin: (f32, f32), width: f32) -> Self {
        let (x, mut y) = origin;
        let mut rows = Vec::new();
        let label_w = width * Self::LABEL_FRACTION;
        let widget = |rect: Rect| {
            Rect::new(
                rect.x + label_w,
                rect.y + 3.0,
                rect.w - label_w - Self::PADDING,
                rect.h - 6.0,
            )
        };

        for (fi, folder) in panel.folders().iter().enumerate() {
            let rect = Rect::new(x, y, width, Self::HEADER_HEIGHT);
            rows.push(Row {
                kind: RowKind::Header { folder: fi },
                rect,
                widget: rect,
            });
            y += Self::HEADER_HEIGHT;

            if !folder.open {
                continue;
            }

            for (ci, control) in folder.controls().iter().enumerate() {
                let rect = Rect::new(x, y, width, Self::ROW_HEIGHT);
                rows.push(Row {
                    kind: RowKind::Control {
                        folder: fi,
                        control: ci,
                    },
                    rect,
                    widget: widget(rect),
                });
                y += Self::ROW_HEIGHT;

                if control.kind() == ControlKind::Color {
                    for channel in 0..3 {
                        let rect = Rect::new(x, y, width, Self::ROW_HEIGHT);
                        rows.push(Row {
                            kind: RowKind::Channel {
                                folder: fi,
                                control: ci,
                                channel,
                            },
                            rect,
                            widget: widget(rect),
                        });
                        y += Self::ROW_HEIGHT;
                    }
                }
            }
        }

        let bounds = Rect::new(x, origin.1, width, y - origin.1);
        Self { rows, bounds }
    }

    /// The row under a pointer position.
    pub fn hit(&self, x: f32, y: f32) -> Option<&Row> {
        if !self.bounds.contains(x, y) {
            return None;
        }
        self.rows.iter().find(|row| row.rect.contains(x, y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::PerspectiveCamera;
    use crate::composer::SceneHandles;
    use crate::ecs::Shape;
    use glam::Vec3;
    use std::collections::BTreeMap;

    fn fixture() -> (SceneContext, DebugPanel) {
        let mut scene = SceneContext::new(Color::BLACK);
        let material = scene.add_material(StandardMaterial::default());
        let ambient_light = scene.spawn_ambient_light(
            "ambient",
            AmbientLight {
                color: Color::WHITE,
                intensity: 0.5,
            },
        );
        let point_light = scene.spawn_point_light(
            "point",
            PointLight {
                intensity: 30.0,
                ..Default::default()
            },
            Vec3::new(2.0, 3.0, 4.0),
        );
        let camera = scene.spawn_camera(
            "camera",
            PerspectiveCamera::new(75.0, 1.0, 0.1, 100.0),
            Vec3::new(1.0, 1.0, 2.0),
        );
        let handles = SceneHandles {
            material,
            ambient_light,
            point_light,
            camera,
            title: None,
            shapes: BTreeMap::<Shape, Vec<Entity>>::new(),
        };
        let panel = register_bindings(&handles);
        (scene, panel)
    }

    #[test]
    fn registers_every_folder() {
        let (_, panel) = fixture();
        let names: Vec<&str> = panel.folders().iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            ["Camera Position", "Material", "Ambient Light", "Point Light", "Scene"]
        );
        assert_eq!(panel.control_count(), 3 + 6 + 1 + 4 + 1);
    }

    #[test]
    fn set_writes_exact_value() {
        let (mut scene, panel) = fixture();
        panel
            .set(&mut scene, "Material", "roughness", ControlValue::Number(0.12345))
            .unwrap();
        assert_eq!(scene.material(crate::ecs::MaterialId(0)).unwrap().roughness, 0.12345);
        assert_eq!(
            panel.get(&scene, "Material", "roughness"),
            Some(ControlValue::Number(0.12345))
        );

        panel
            .set(&mut scene, "Camera Position", "y", ControlValue::Number(-3.21))
            .unwrap();
        assert_eq!(scene.camera().unwrap().0.y, -3.21);
    }

    #[test]
    fn set_clamps_to_range() {
        let (mut scene, panel) = fixture();
        panel
            .set(&mut scene, "Ambient Light", "intensity", ControlValue::Number(7.0))
            .unwrap();
        assert_eq!(
            panel.get(&scene, "Ambient Light", "intensity"),
            Some(ControlValue::Number(3.0))
        );

        panel
            .set(&mut scene, "Point Light", "x", ControlValue::Number(-20.0))
            .unwrap();
        assert_eq!(
            panel.get(&scene, "Point Light", "x"),
            Some(ControlValue::Number(-10.0))
        );
    }

    #[test]
    fn toggles_and_colors() {
        let (mut scene, panel) = fixture();
        panel
            .set(&mut scene, "Material", "wireframe", ControlValue::Bool(true))
            .unwrap();
        assert!(scene.material(crate::ecs::MaterialId(0)).unwrap().wireframe);

        let teal = Color::rgb(0.0, 0.5, 0.5);
        panel
            .set(&mut scene, "Scene", "background", ControlValue::Color(teal))
            .unwrap();
        assert_eq!(scene.background, teal);
    }

    #[test]
    fn errors_name_the_problem() {
        let (mut scene, panel) = fixture();
        assert_eq!(
            panel.set(&mut scene, "Nope", "x", ControlValue::Number(0.0)),
            Err(PanelError::UnknownFolder("Nope".into()))
        );
        assert!(matches!(
            panel.set(&mut scene, "Material", "shininess", ControlValue::Number(0.0)),
            Err(PanelError::UnknownControl { .. })
        ));
        assert!(matches!(
            panel.set(&mut scene, "Material", "wireframe", ControlValue::Number(1.0)),
            Err(PanelError::KindMismatch { expected: "boolean", .. })
        ));
        assert_eq!(panel.get(&scene, "Material", "shininess"), None);
    }

    #[test]
    fn slider_snaps_to_step() {
        assert_eq!(slider_value(-10.0, 10.0, 0.5, 0.53), 0.5);
        assert_eq!(slider_value(0.0, 3.0, 0.001, 2.0), 3.0);
        assert_eq!(slider_value(0.0, 1.0, 0.25, -1.0), 0.0);
        assert_eq!(slider_fraction(0.0, 100.0, 25.0), 0.25);
    }

    #[test]
    fn layout_expands_colors_and_hides_collapsed_folders() {
        let (_, mut panel) = fixture();
        let open = PanelLayout::compute(&panel, (0.0, 0.0), 300.0);
        // 5 headers, 15 controls, 2 color controls with 3 channel rows each
        assert_eq!(open.rows.len(), 5 + 15 + 6);

        panel.toggle_folder(1);
        let collapsed = PanelLayout::compute(&panel, (0.0, 0.0), 300.0);
        assert_eq!(collapsed.rows.len(), 5 + 9 + 3);
        assert!(collapsed.bounds.h < open.bounds.h);
    }

    #[test]
    fn hit_test_finds_rows() {
        let (_, panel) = fixture();
        let layout = PanelLayout::compute(&panel, (10.0, 10.0), 300.0);

        let header = layout.hit(20.0, 12.0).unwrap();
        assert_eq!(header.kind, RowKind::Header { folder: 0 });

        let y = 10.0 + PanelLayout::HEADER_HEIGHT + PanelLayout::ROW_HEIGHT + 1.0;
        let row = layout.hit(200.0, y).unwrap();
        assert_eq!(row.kind, RowKind::Control { folder: 0, control: 1 });

        assert!(layout.hit(5.0, 12.0).is_none());
        assert!(layout.hit(20.0, layout.bounds.y + layout.bounds.h + 1.0).is_none());
    }
}
