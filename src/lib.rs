//! # Vitrine
//!
//! **A lit 3D showcase scene with a live-tweak debug panel.**
//!
//! Vitrine scatters boxes, spheres and tetrahedra around an extruded 3D
//! title, lights them with an ambient and a point light, and renders them
//! with a shared metalness/roughness material. Every primitive spins on its
//! own rule, the camera orbits with damping, and a panel in the corner edits
//! the camera, material, lights and background while the scene runs.
//!
//! ## Quick Start
//!
//! ```no_run
//! use vitrine::ShowcaseConfig;
//!
//! fn main() {
//!     let config = ShowcaseConfig::new().seed(7);
//!     vitrine::run(config).unwrap();
//! }
//! ```
//!
//! The scene can also be built without a window, for inspection or tests:
//!
//! ```no_run
//! use vitrine::{SceneComposer, ShowcaseConfig};
//!
//! let composition = SceneComposer::new(ShowcaseConfig::default()).compose();
//! println!("{} nodes", composition.scene.node_count());
//! ```

mod animation;
mod app;
mod assets;
mod camera;
mod clock;
mod composer;
mod config;
mod controls;
mod draw2d;
mod ecs;
mod geometry;
mod gpu;
mod input;
mod mesh;
mod mesh_pass;
mod overlay;
mod panel;
pub mod scene;
mod text;
mod texture;
mod viewport;

pub use animation::{RotationRule, animate, rotation_rule};
pub use app::{AppError, run};
pub use assets::{AssetError, Assets, FontAtlas, FontId};
pub use camera::PerspectiveCamera;
pub use clock::Clock;
pub use composer::{Composition, SceneComposer, SceneHandles, random_transform};
pub use config::{
    AssetPaths, CameraConfig, ConfigError, LightConfig, ScatterConfig, ScatterCounts,
    ShowcaseConfig, WindowConfig,
};
pub use controls::OrbitControls;
pub use draw2d::{Color, Draw2d};
pub use ecs::{AmbientLight, GeometryId, MaterialId, Name, PointLight, RenderMesh, Shape};
pub use geometry::RawGeometry;
pub use gpu::{GpuContext, GpuError};
pub use input::Input;
pub use mesh::{Mesh, MeshCache, Transform, Vertex3d};
pub use mesh_pass::{MAX_POINT_LIGHTS, MeshPass};
pub use overlay::{PanelOverlay, PanelState};
pub use panel::{
    Control, ControlKind, ControlValue, DebugPanel, Folder, PanelError, PanelLayout, Rect,
    CAMERA_RANGE, register_bindings, slider_fraction, slider_value,
};
pub use scene::{SceneContext, StandardMaterial};
pub use text::{
    Footprint, PendingTitle, TextError, TitleLoader, TitleParams, extrude, extrude_title,
};
pub use texture::{CubeMapData, CubeTexture, TextureData};
pub use viewport::Viewport;

// Re-export glam math types for convenience
pub use glam::{Mat4, Quat, Vec2, Vec3, Vec4};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;

pub use hecs::{Entity, World};
