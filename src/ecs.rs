//! Components attached to scene-graph nodes.
//!
//! The scene graph is a [`hecs::World`]; each top-level node is one entity
//! carrying a [`Transform`](crate::Transform), a [`Name`], and the
//! components for what it is: a mesh ([`RenderMesh`] + [`Shape`]), a light
//! ([`AmbientLight`], [`PointLight`]) or the camera
//! ([`PerspectiveCamera`](crate::PerspectiveCamera)).

use crate::draw2d::Color;

/// Handle to a geometry in the scene's geometry library.
///
/// Nodes of the same shape share one geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct GeometryId(pub(crate) usize);

/// Handle to a material in the scene's material list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MaterialId(pub(crate) usize);

/// Renderable mesh: which geometry to draw and with which material.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderMesh {
    pub geometry: GeometryId,
    pub material: MaterialId,
}

impl RenderMesh {
    pub fn new(geometry: GeometryId, material: MaterialId) -> Self {
        Self { geometry, material }
    }
}

/// Shape category, recorded on each mesh node when it is created.
///
/// Per-frame animation switches on this tag rather than inspecting the
/// geometry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Shape {
    Box,
    Sphere,
    Tetrahedron,
    /// The extruded title text.
    Title,
}

impl Shape {
    /// Categories scattered randomly through the scene.
    pub const SCATTERED: [Shape; 3] = [Shape::Box, Shape::Sphere, Shape::Tetrahedron];

    pub fn label(self) -> &'static str {
        match self {
            Shape::Box => "box",
            Shape::Sphere => "sphere",
            Shape::Tetrahedron => "tetrahedron",
            Shape::Title => "title",
        }
    }
}

/// Human-readable node label.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Name(pub String);

impl Name {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }
}

/// Non-positional light added uniformly to every surface.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

/// Positional light; its position is the node's transform position.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointLight {
    pub color: Color,
    pub intensity: f32,
    /// Cut-off distance; `0.0` means unlimited range.
    pub distance: f32,
    /// Falloff exponent; `2.0` is physically correct inverse-square.
    pub decay: f32,
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            intensity: 1.0,
            distance: 0.0,
            decay: 2.0,
        }
    }
}
