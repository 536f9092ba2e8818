//! Scene state: the node world, geometry library and shared materials.
//!
//! A [`SceneContext`] is built once by the
//! [`SceneComposer`](crate::SceneComposer) and then threaded by `&mut`
//! through the frame driver, the orbit controls and the debug panel.

mod context;
mod material;

pub use context::SceneContext;
pub use material::StandardMaterial;
